//! Field-selective redaction of traffic data.
//!
//! - **`params`**: keyed multi-value maps such as headers and query parameters
//!   (`FieldSet`, `ParamsRedactor`)
//! - **`body`**: nested JSON bodies addressed by dotted selectors (`BodyRedactor`)
//!
//! Every redactor is built once from an immutable list of names and is safe to
//! share between threads. Redaction only ever touches the working copy handed
//! to it.

mod body;
mod params;

pub use body::{BodyRedactionError, BodyRedactor};
pub use params::{FieldSet, Multimap, ParamsRedactor};

/// Sentinel substituted for every redacted value.
pub const REDACTION_MARKER: &str = "XXX";
