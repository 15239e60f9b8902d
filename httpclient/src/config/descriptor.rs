//! Serialized form of the client configuration.
//!
//! Every field is optional. Missing numeric settings deserialize to zero and
//! are resolved by the range clamps when the descriptor is converted into a
//! [`Config`](super::Config).

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::logger::Severity;

/// Raw configuration as found in a JSON or YAML document.
///
/// ```yaml
/// integration: payments
/// host: https://api.example.com
/// timeout: 15s
/// retry:
///   count: 2
///   wait_time: 500ms
///   max_wait_time: 3s
/// log_level: info
/// ofuscate:
///   headers: [Authorization]
///   response: [user.ssn]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigDescriptor {
    pub integration: String,
    pub host: String,
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub timeout: Duration,
    pub retry: RetryDescriptor,
    pub log_level: Severity,
    pub ofuscate: RedactionDescriptor,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RetryDescriptor {
    #[serde(deserialize_with = "count_format::deserialize")]
    pub count: u32,
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub wait_time: Duration,
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub max_wait_time: Duration,
}

/// Names and selectors whose values must never reach the logs.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RedactionDescriptor {
    pub query_params: Vec<String>,
    pub headers: Vec<String>,
    pub request: Vec<String>,
    pub response: Vec<String>,
}

/// Integers in a descriptor may be negative or wider than the target type.
#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Signed(i64),
    Unsigned(u64),
}

/// Retry counts as any JSON/YAML integer.
///
/// Values that do not fit a `u32` saturate to `u32::MAX` so that the range
/// clamp replaces them.
mod count_format {
    use super::{Deserialize, Deserializer, Integer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let count = match Integer::deserialize(deserializer)? {
            Integer::Signed(n) => u32::try_from(n).ok(),
            Integer::Unsigned(n) => u32::try_from(n).ok(),
        };
        Ok(count.unwrap_or(u32::MAX))
    }
}

/// Durations as humantime strings (`"10s"`, `"1m 30s"`) or integer nanoseconds.
///
/// Negative integers become zero so that the range clamps replace them.
mod duration_format {
    use super::{Deserialize, Deserializer, Duration, Integer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Nanos(Integer),
        Text(String),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Nanos(Integer::Signed(nanos)) => {
                Ok(u64::try_from(nanos).map_or(Duration::ZERO, Duration::from_nanos))
            }
            Repr::Nanos(Integer::Unsigned(nanos)) => Ok(Duration::from_nanos(nanos)),
            Repr::Text(text) => humantime::parse_duration(text.trim()).map_err(|err| {
                serde::de::Error::custom(format!("invalid duration '{text}': {err}"))
            }),
        }
    }
}
