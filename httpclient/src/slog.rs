//! [`Logger`] implementation backed by `slog`.
//!
//! This module exists to connect the interceptors' records with a
//! `slog::Logger`. It is responsible for:
//! - Mapping [`Severity`] onto `slog` levels. `slog` has no fatal levels, so
//!   [`Severity::Panic`] and [`Severity::Fatal`] are both logged as
//!   `Critical` before unwinding or exiting.
//! - Emitting scalar fields through the matching `slog::Serializer` method and
//!   nested fields as structured JSON via `slog`'s nested-value support.
//!
//! It does not configure drains. Default fields belong on the `slog::Logger`
//! passed in (`logger.new(o!(...))`).

use serde_json::Value as JsonValue;
use slog::{
    BorrowedKV, Key, Level, Record, RecordStatic, Result as SlogResult, Serializer,
    Value as SlogValue, KV,
};

use crate::logger::{Field, LogContext, Logger, Severity};

/// Forwards records to a `slog::Logger`.
#[derive(Clone)]
pub struct SlogLogger {
    inner: slog::Logger,
}

impl SlogLogger {
    pub fn new(inner: slog::Logger) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &slog::Logger {
        &self.inner
    }
}

impl From<slog::Logger> for SlogLogger {
    fn from(inner: slog::Logger) -> Self {
        Self::new(inner)
    }
}

// `RecordStatic` must be a static, so each level gets its own.
macro_rules! emit {
    ($logger:expr, $level:expr, $msg:expr, $kv:expr) => {{
        static RS: RecordStatic<'static> = slog::record_static!($level, "");
        $logger.log(&Record::new(
            &RS,
            &format_args!("{}", $msg),
            BorrowedKV($kv),
        ));
    }};
}

impl Logger for SlogLogger {
    fn log(&self, severity: Severity, ctx: &LogContext, msg: &str, fields: &[Field]) {
        let context = ctx.as_field();
        let kv = FieldsKv {
            fields,
            context: context.as_ref(),
        };

        match severity {
            Severity::Debug => emit!(self.inner, Level::Debug, msg, &kv),
            Severity::Info => emit!(self.inner, Level::Info, msg, &kv),
            Severity::Warn => emit!(self.inner, Level::Warning, msg, &kv),
            Severity::Error => emit!(self.inner, Level::Error, msg, &kv),
            Severity::Panic | Severity::Fatal => emit!(self.inner, Level::Critical, msg, &kv),
        }

        match severity {
            Severity::Panic => panic!("{msg}"),
            Severity::Fatal => std::process::exit(1),
            _ => {}
        }
    }
}

/// Borrowed view of a record's fields as `slog` key/value pairs.
struct FieldsKv<'a> {
    fields: &'a [Field],
    context: Option<&'a Field>,
}

impl KV for FieldsKv<'_> {
    fn serialize(&self, record: &Record<'_>, serializer: &mut dyn Serializer) -> SlogResult {
        for field in self.fields.iter().chain(self.context) {
            emit_json(record, field.key, &field.value, serializer)?;
        }
        Ok(())
    }
}

fn emit_json(
    record: &Record<'_>,
    key: Key,
    value: &JsonValue,
    serializer: &mut dyn Serializer,
) -> SlogResult {
    match value {
        JsonValue::Null => serializer.emit_none(key),
        JsonValue::Bool(b) => serializer.emit_bool(key, *b),
        JsonValue::String(s) => serializer.emit_str(key, s),
        JsonValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                serializer.emit_u64(key, u)
            } else if let Some(i) = n.as_i64() {
                serializer.emit_i64(key, i)
            } else {
                serializer.emit_f64(key, n.as_f64().unwrap_or_default())
            }
        }
        JsonValue::Array(_) | JsonValue::Object(_) => {
            let nested = slog::Serde(value.clone());
            SlogValue::serialize(&nested, record, key, serializer)
        }
    }
}
