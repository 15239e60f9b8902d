//! Redaction for headers and query parameters.

use std::collections::{BTreeMap, HashSet};

use super::REDACTION_MARKER;

/// Keyed multi-value map: each key holds its values in insertion order.
pub type Multimap = BTreeMap<String, Vec<String>>;

const VALUE_SEPARATOR: &str = ",";

/// Membership index over a configured list of names.
///
/// Duplicates collapse; matching is exact and case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: HashSet<String>,
}

impl FieldSet {
    /// Returns `true` if `name` was configured.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names were configured.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S> FromIterator<S> for FieldSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flattens a [`Multimap`] into `key -> string`, masking configured keys.
///
/// Keys in the field set map to [`REDACTION_MARKER`]; every other key maps to
/// its values joined with `,` in their original order. The output carries
/// exactly the keys of the input.
#[derive(Clone, Debug, Default)]
pub struct ParamsRedactor {
    fields: FieldSet,
}

impl ParamsRedactor {
    pub fn new(fields: FieldSet) -> Self {
        Self { fields }
    }

    /// Redacts `input` into a new map. `input` is left untouched.
    pub fn redact(&self, input: &Multimap) -> BTreeMap<String, String> {
        input
            .iter()
            .map(|(key, values)| {
                let value = if self.fields.contains(key) {
                    REDACTION_MARKER.to_owned()
                } else {
                    values.join(VALUE_SEPARATOR)
                };
                (key.clone(), value)
            })
            .collect()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }
}
