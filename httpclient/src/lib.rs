//! Redaction-aware logging around an HTTP client.
//!
//! This crate separates:
//! - **Configuration**: host, integration name, timeout and retry shape, the
//!   minimum log level and four redaction lists. Out-of-range numbers are
//!   clamped to fixed defaults; a missing host or integration is an error.
//! - **Redaction**: headers and query parameters are masked by exact name,
//!   JSON bodies by dotted selectors (`user.ssn`, `items.0.card`).
//! - **Interception**: request and response loggers that build their
//!   redactors once and emit one structured record per call.
//!
//! Key rules:
//! - Redaction only ever touches a working copy. What goes over the wire and
//!   what is returned to the caller is never modified.
//! - Logging never fails a call. A body that cannot be redacted is logged as
//!   `null` after a warning.
//! - Masked values are replaced with [`REDACTION_MARKER`].
//!
//! What this crate does not do:
//! - perform network I/O: that is the [`Transport`]'s job, including retries
//! - configure log output: records go to a [`Logger`], with a `slog` adapter
//!   behind the `slog` feature
//!
//! ```
//! use std::sync::Arc;
//!
//! use httpclient::{
//!     Client, Config, Field, LogContext, Logger, RawResponse, Request, Severity, Transport,
//!     TransportError, TransportSettings,
//! };
//!
//! struct Echo;
//!
//! impl Transport for Echo {
//!     fn send(
//!         &self,
//!         _settings: &TransportSettings,
//!         _request: &Request,
//!     ) -> Result<RawResponse, TransportError> {
//!         Ok(RawResponse::new(http::StatusCode::OK, r#"{"ok":true}"#))
//!     }
//! }
//!
//! struct Discard;
//!
//! impl Logger for Discard {
//!     fn log(&self, _: Severity, _: &LogContext, _: &str, _: &[Field]) {}
//! }
//!
//! let config = Config::builder("https://api.example.com", "billing")
//!     .redact_header("Authorization")
//!     .build()
//!     .unwrap();
//! let client = Client::from_config(Echo, Arc::new(Discard), &config);
//!
//! let request = client
//!     .request(http::Method::GET, "/invoices")
//!     .header("Authorization", "Bearer secret");
//! let response = client.execute(request).unwrap();
//! assert_eq!(&response.body()[..], br#"{"ok":true}"#);
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::cargo_common_metadata
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod client;
mod config;
mod interceptor;
mod logger;
mod redact;
mod settings;
#[cfg(feature = "slog")]
pub mod slog;

// Re-exports
pub use client::{
    Body, Client, ClientError, RawResponse, Request, Response, Transport, TransportError,
    TransportSettings,
};
pub use config::{
    Config, ConfigBuilder, ConfigDescriptor, ConfigError, RedactionConfig, RedactionDescriptor,
    RetryConfig, RetryDescriptor,
};
pub use interceptor::{
    InterceptorError, RequestInterceptor, RequestLogger, ResponseInterceptor, ResponseLogger,
};
pub use logger::{Field, LogContext, Logger, ParseSeverityError, Severity};
pub use redact::{
    BodyRedactionError, BodyRedactor, FieldSet, Multimap, ParamsRedactor, REDACTION_MARKER,
};
pub use settings::{RangeSetting, RETRY_COUNT, RETRY_MAX_WAIT_TIME, RETRY_WAIT_TIME, TIMEOUT};
