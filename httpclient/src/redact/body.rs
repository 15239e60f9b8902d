//! Redaction of JSON bodies by dotted selectors.
//!
//! A selector is a `.`-separated path. Each segment is resolved against the
//! current value:
//!
//! | Current value | Segment | Result |
//! |---------------|---------|--------|
//! | object | any | the member with that key |
//! | array | `usize` | the element at that index |
//! | array | other | the rest of the path applied to every element |
//! | scalar | any | unresolved, nothing is redacted |
//!
//! Selectors that do not resolve are ignored: they are a best-effort policy,
//! not a schema.

use serde_json::{Map, Value};
use thiserror::Error;

use super::REDACTION_MARKER;

const SELECTOR_SEPARATOR: char = '.';

/// Reasons a body could not be redacted.
///
/// A body that cannot be redacted must never be logged as-is.
#[derive(Debug, Error)]
pub enum BodyRedactionError {
    /// The body is valid JSON but its top level is not an object.
    #[error("body must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    /// The raw body is not valid JSON.
    #[error("body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Replaces the values addressed by a fixed list of selectors.
#[derive(Clone, Debug, Default)]
pub struct BodyRedactor {
    selectors: Vec<Vec<String>>,
}

impl BodyRedactor {
    /// Splits every selector once, keeping their order. Empty selectors are dropped.
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = selectors
            .into_iter()
            .filter(|selector| !selector.as_ref().is_empty())
            .map(|selector| {
                selector
                    .as_ref()
                    .split(SELECTOR_SEPARATOR)
                    .map(str::to_owned)
                    .collect()
            })
            .collect();
        Self { selectors }
    }

    /// Redacts an owned working copy in place and hands it back.
    ///
    /// `None` means "no body" and is returned unchanged. Any top-level value
    /// other than an object is an error.
    pub fn redact(&self, body: Option<Value>) -> Result<Option<Value>, BodyRedactionError> {
        let Some(mut body) = body else {
            return Ok(None);
        };

        let object = match &mut body {
            Value::Object(object) => object,
            other => {
                return Err(BodyRedactionError::NotAnObject {
                    found: kind_of(other),
                })
            }
        };

        for selector in &self.selectors {
            redact_in_object(object, selector);
        }

        Ok(Some(body))
    }

    /// Parses `raw` and redacts the result. An empty payload or a literal
    /// `null` counts as no body.
    pub fn redact_bytes(&self, raw: &[u8]) -> Result<Option<Value>, BodyRedactionError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice::<Value>(raw)? {
            Value::Null => Ok(None),
            parsed => self.redact(Some(parsed)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

fn redact_in_object(object: &mut Map<String, Value>, path: &[String]) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    if let Some(child) = object.get_mut(head) {
        redact_at(child, rest);
    }
}

fn redact_at(value: &mut Value, path: &[String]) {
    let Some((head, rest)) = path.split_first() else {
        *value = Value::String(REDACTION_MARKER.to_owned());
        return;
    };

    match value {
        Value::Object(object) => {
            if let Some(child) = object.get_mut(head) {
                redact_at(child, rest);
            }
        }
        Value::Array(items) => match head.parse::<usize>() {
            Ok(index) => {
                if let Some(item) = items.get_mut(index) {
                    redact_at(item, rest);
                }
            }
            Err(_) => {
                for item in items {
                    redact_at(item, path);
                }
            }
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BodyRedactionError, BodyRedactor};

    #[test]
    fn only_selected_locations_change() {
        let redactor = BodyRedactor::new(["user.ssn", "token"]);
        let body = json!({
            "user": {"ssn": "123-45-6789", "name": "Ann", "age": 41},
            "token": "abc",
            "other": [1, 2, 3]
        });

        let redacted = redactor.redact(Some(body)).unwrap().unwrap();

        assert_eq!(
            redacted,
            json!({
                "user": {"ssn": "XXX", "name": "Ann", "age": 41},
                "token": "XXX",
                "other": [1, 2, 3]
            })
        );
    }

    #[test]
    fn missing_selector_is_a_no_op() {
        let redactor = BodyRedactor::new(["does.not.exist", "user.name.first"]);
        let body = json!({"user": {"name": "Ann"}, "does": {"not": {}}});

        let redacted = redactor.redact(Some(body.clone())).unwrap();

        assert_eq!(redacted, Some(body));
    }

    #[test]
    fn absent_body_stays_absent() {
        let redactor = BodyRedactor::new(["token"]);
        assert!(redactor.redact(None).unwrap().is_none());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let redactor = BodyRedactor::new(["token"]);

        let err = redactor.redact(Some(json!(["token"]))).unwrap_err();
        assert!(matches!(err, BodyRedactionError::NotAnObject { found: "array" }));

        let err = redactor.redact(Some(json!("token"))).unwrap_err();
        assert!(matches!(err, BodyRedactionError::NotAnObject { found: "string" }));
    }

    #[test]
    fn whole_subtree_can_be_redacted() {
        let redactor = BodyRedactor::new(["card"]);
        let body = json!({"card": {"number": "4111", "cvv": "123"}, "id": 7});

        let redacted = redactor.redact(Some(body)).unwrap().unwrap();

        assert_eq!(redacted, json!({"card": "XXX", "id": 7}));
    }

    #[test]
    fn numeric_segment_selects_array_index() {
        let redactor = BodyRedactor::new(["cards.1.number"]);
        let body = json!({"cards": [{"number": "1111"}, {"number": "2222"}]});

        let redacted = redactor.redact(Some(body)).unwrap().unwrap();

        assert_eq!(
            redacted,
            json!({"cards": [{"number": "1111"}, {"number": "XXX"}]})
        );
    }

    #[test]
    fn named_segment_fans_out_over_arrays() {
        let redactor = BodyRedactor::new(["users.email"]);
        let body = json!({
            "users": [
                {"email": "a@example.com", "id": 1},
                {"id": 2},
                "not-an-object"
            ]
        });

        let redacted = redactor.redact(Some(body)).unwrap().unwrap();

        assert_eq!(
            redacted,
            json!({"users": [{"email": "XXX", "id": 1}, {"id": 2}, "not-an-object"]})
        );
    }

    #[test]
    fn out_of_bounds_index_is_a_no_op() {
        let redactor = BodyRedactor::new(["items.5"]);
        let body = json!({"items": [1, 2]});

        let redacted = redactor.redact(Some(body.clone())).unwrap();

        assert_eq!(redacted, Some(body));
    }

    #[test]
    fn empty_selectors_are_ignored() {
        let redactor = BodyRedactor::new(["", "token"]);
        let body = json!({"": "kept", "token": "abc"});

        let redacted = redactor.redact(Some(body)).unwrap().unwrap();

        assert_eq!(redacted, json!({"": "kept", "token": "XXX"}));
    }

    #[test]
    fn raw_bytes_are_parsed_before_redaction() {
        let redactor = BodyRedactor::new(["password"]);

        let redacted = redactor
            .redact_bytes(br#"{"user":"ann","password":"hunter2"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(redacted, json!({"user": "ann", "password": "XXX"}));

        assert!(redactor.redact_bytes(b"").unwrap().is_none());
        assert!(redactor.redact_bytes(b"  \n").unwrap().is_none());
        assert!(redactor.redact_bytes(b" null ").unwrap().is_none());
        assert!(matches!(
            redactor.redact_bytes(b"<html>"),
            Err(BodyRedactionError::Parse(_))
        ));
    }

    #[test]
    fn selectors_apply_in_order() {
        // The first selector replaces `a`, so `a.b` no longer resolves.
        let redactor = BodyRedactor::new(["a", "a.b"]);
        let body = json!({"a": {"b": 1}});

        let redacted = redactor.redact(Some(body)).unwrap().unwrap();

        assert_eq!(redacted, json!({"a": "XXX"}));
    }
}
