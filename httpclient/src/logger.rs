//! The logging seam between the interceptors and a concrete sink.
//!
//! Interceptors only produce records: a [`Severity`], a message and a list of
//! [`Field`]s, plus the per-call [`LogContext`]. What happens to a record
//! afterwards is up to the [`Logger`] implementation. The `slog` feature ships
//! one that forwards to a `slog::Logger`.

use std::{error::Error as StdError, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Record severity, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Logged, then the current thread unwinds.
    Panic,
    /// Logged, then the process exits.
    Fatal,
}

impl Severity {
    /// Returns `true` if a sink whose minimum level is `self` accepts `level`.
    pub fn enables(self, level: Severity) -> bool {
        level >= self
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a level name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log level `{0}`")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "panic" | "dpanic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(ParseSeverityError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = ParseSeverityError;

    fn try_from(value: String) -> Result<Self, ParseSeverityError> {
        value.parse()
    }
}

/// A single key/value pair attached to a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub value: Value,
}

impl Field {
    pub fn str<V>(key: &'static str, value: V) -> Self
    where
        V: Into<String>,
    {
        Self {
            key,
            value: Value::String(value.into()),
        }
    }

    pub fn uint(key: &'static str, value: u64) -> Self {
        Self {
            key,
            value: Value::from(value),
        }
    }

    /// Serializes `value` into the field.
    ///
    /// Logging must not fail, so a value that cannot be represented as JSON
    /// is replaced with a fixed string.
    pub fn json<V>(key: &'static str, value: V) -> Self
    where
        V: Serialize,
    {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|_| Value::String("Failed to serialize value".to_owned()));
        Self { key, value }
    }

    /// The `error` field, rendered with its display form.
    pub fn error(err: &dyn StdError) -> Self {
        Self::str("error", err.to_string())
    }
}

/// Extra fields supplied by the caller for a single call.
///
/// Empty unless the caller adds entries. A non-empty context is attached to
/// every record of that call as one nested `context` field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogContext {
    fields: Map<String, Value>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The `context` field, or `None` when there is nothing to attach.
    pub fn as_field(&self) -> Option<Field> {
        if self.fields.is_empty() {
            return None;
        }
        Some(Field {
            key: "context",
            value: Value::Object(self.fields.clone()),
        })
    }
}

/// Structured logging sink used by the interceptors.
///
/// Implementations must be callable from many requests at once.
pub trait Logger: Send + Sync {
    fn log(&self, severity: Severity, ctx: &LogContext, msg: &str, fields: &[Field]);

    fn debug(&self, ctx: &LogContext, msg: &str, fields: &[Field]) {
        self.log(Severity::Debug, ctx, msg, fields);
    }

    fn info(&self, ctx: &LogContext, msg: &str, fields: &[Field]) {
        self.log(Severity::Info, ctx, msg, fields);
    }

    fn warn(&self, ctx: &LogContext, msg: &str, fields: &[Field]) {
        self.log(Severity::Warn, ctx, msg, fields);
    }

    fn error(&self, ctx: &LogContext, msg: &str, fields: &[Field]) {
        self.log(Severity::Error, ctx, msg, fields);
    }

    fn panic(&self, ctx: &LogContext, msg: &str, fields: &[Field]) {
        self.log(Severity::Panic, ctx, msg, fields);
    }

    fn fatal(&self, ctx: &LogContext, msg: &str, fields: &[Field]) {
        self.log(Severity::Fatal, ctx, msg, fields);
    }
}
