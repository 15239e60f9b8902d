//! Request and response interceptors.
//!
//! [`RequestLogger`] and [`ResponseLogger`] build their redactors once from a
//! [`Config`] and then log one record per call. Logging never fails a call: a
//! body that cannot be redacted produces a warning and is logged as `null`.

use std::{error::Error as StdError, sync::Arc};

use serde_json::Value;
use thiserror::Error;

use crate::{
    client::{Body, Request, Response},
    config::Config,
    logger::{Field, Logger},
    redact::{BodyRedactionError, BodyRedactor, ParamsRedactor},
};

/// Failure reported by a caller-supplied interceptor. Aborts the call.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InterceptorError(Box<dyn StdError + Send + Sync>);

impl InterceptorError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self(err.into())
    }
}

/// Invoked with every request right before it is handed to the transport.
pub trait RequestInterceptor: Send + Sync {
    fn before_request(&self, request: &Request) -> Result<(), InterceptorError>;
}

/// Invoked with every response right after the transport returns it.
pub trait ResponseInterceptor: Send + Sync {
    fn after_response(&self, response: &Response) -> Result<(), InterceptorError>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(&Request) -> Result<(), InterceptorError> + Send + Sync,
{
    fn before_request(&self, request: &Request) -> Result<(), InterceptorError> {
        self(request)
    }
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&Response) -> Result<(), InterceptorError> + Send + Sync,
{
    fn after_response(&self, response: &Response) -> Result<(), InterceptorError> {
        self(response)
    }
}

/// Logs outbound requests with headers, query and body redacted.
pub struct RequestLogger {
    logger: Arc<dyn Logger>,
    integration: String,
    headers: ParamsRedactor,
    query: ParamsRedactor,
    body: BodyRedactor,
}

impl RequestLogger {
    pub fn new(logger: Arc<dyn Logger>, config: &Config) -> Self {
        Self {
            logger,
            integration: config.integration().to_owned(),
            headers: config.header_redactor(),
            query: config.query_redactor(),
            body: config.request_body_redactor(),
        }
    }

    fn redact_body(&self, body: Option<&Body>) -> Result<Option<Value>, BodyRedactionError> {
        match body {
            None => Ok(None),
            // The request keeps its own copy; only the clone is redacted.
            Some(Body::Json(value)) => self.body.redact(Some(value.clone())),
            Some(Body::Raw(raw)) => self.body.redact_bytes(raw),
        }
    }
}

impl RequestInterceptor for RequestLogger {
    fn before_request(&self, request: &Request) -> Result<(), InterceptorError> {
        let ctx = request.log_context();
        let body = self.redact_body(request.body()).unwrap_or_else(|err| {
            self.logger.warn(
                ctx,
                "couldn't redact body of the request",
                &[
                    Field::str("integration", self.integration.as_str()),
                    Field::error(&err),
                ],
            );
            None
        });

        self.logger.info(
            ctx,
            "http request",
            &[
                Field::str("integration", self.integration.as_str()),
                Field::str("method", request.method().as_str()),
                Field::str("path", request.path()),
                Field::json("headers", self.headers.redact(request.headers())),
                Field::json("query", self.query.redact(request.query_params())),
                Field::json("body", body),
            ],
        );

        Ok(())
    }
}

/// Logs inbound responses with headers, query and body redacted.
pub struct ResponseLogger {
    logger: Arc<dyn Logger>,
    integration: String,
    headers: ParamsRedactor,
    query: ParamsRedactor,
    body: BodyRedactor,
}

impl ResponseLogger {
    pub fn new(logger: Arc<dyn Logger>, config: &Config) -> Self {
        Self {
            logger,
            integration: config.integration().to_owned(),
            headers: config.header_redactor(),
            query: config.query_redactor(),
            body: config.response_body_redactor(),
        }
    }
}

impl ResponseInterceptor for ResponseLogger {
    fn after_response(&self, response: &Response) -> Result<(), InterceptorError> {
        let request = response.request();
        let ctx = request.log_context();

        let body = self.body.redact_bytes(response.body()).unwrap_or_else(|err| {
            self.logger.warn(
                ctx,
                "couldn't parse body of the response",
                &[
                    Field::str("integration", self.integration.as_str()),
                    Field::error(&err),
                ],
            );
            None
        });

        self.logger.info(
            ctx,
            "http response",
            &[
                Field::str("integration", self.integration.as_str()),
                Field::uint("status_code", u64::from(response.status().as_u16())),
                Field::str(
                    "time",
                    humantime::format_duration(response.elapsed()).to_string(),
                ),
                Field::str("method", request.method().as_str()),
                Field::str("path", request.path()),
                Field::json("headers", self.headers.redact(response.headers())),
                Field::json("query", self.query.redact(request.query_params())),
                Field::json("body", body),
            ],
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use bytes::Bytes;
    use http::{Method, StatusCode};
    use serde_json::{json, Value};

    use super::{RequestInterceptor, RequestLogger, ResponseInterceptor, ResponseLogger};
    use crate::{
        client::{Request, Response},
        config::Config,
        logger::{Field, LogContext, Logger, Severity},
    };

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Severity, String, Vec<Field>)>>);

    impl Logger for Recorder {
        fn log(&self, severity: Severity, _ctx: &LogContext, msg: &str, fields: &[Field]) {
            self.0
                .lock()
                .unwrap()
                .push((severity, msg.to_owned(), fields.to_vec()));
        }
    }

    impl Recorder {
        fn field(&self, index: usize, key: &str) -> Value {
            let records = self.0.lock().unwrap();
            records[index]
                .2
                .iter()
                .find(|field| field.key == key)
                .map(|field| field.value.clone())
                .unwrap()
        }
    }

    fn config() -> Config {
        Config::builder("http://x", "svc")
            .redact_request_field("password")
            .redact_response_field("token")
            .build()
            .unwrap()
    }

    #[test]
    fn json_request_body_is_redacted_on_a_copy() {
        let recorder = Arc::new(Recorder::default());
        let interceptor = RequestLogger::new(recorder.clone(), &config());
        let request = Request::new(Method::POST, "/login")
            .json(json!({"user": "ann", "password": "hunter2"}));

        interceptor.before_request(&request).unwrap();

        assert_eq!(
            recorder.field(0, "body"),
            json!({"user": "ann", "password": "XXX"})
        );
        assert_eq!(
            request.body().and_then(|body| body.as_json()),
            Some(&json!({"user": "ann", "password": "hunter2"}))
        );
    }

    #[test]
    fn unredactable_request_body_warns_and_logs_null() {
        let recorder = Arc::new(Recorder::default());
        let interceptor = RequestLogger::new(recorder.clone(), &config());
        let request = Request::new(Method::POST, "/bulk").json(json!([{"password": "x"}]));

        interceptor.before_request(&request).unwrap();

        let records = recorder.0.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Severity::Warn);
        assert_eq!(records[0].1, "couldn't redact body of the request");
        assert_eq!(records[1].0, Severity::Info);
        drop(records);
        assert_eq!(recorder.field(1, "body"), Value::Null);
        assert_eq!(recorder.field(1, "path"), json!("/bulk"));
    }

    #[test]
    fn raw_request_body_is_parsed() {
        let recorder = Arc::new(Recorder::default());
        let interceptor = RequestLogger::new(recorder.clone(), &config());
        let request =
            Request::new(Method::PUT, "/users/1").raw_body(r#"{"password":"p","name":"n"}"#);

        interceptor.before_request(&request).unwrap();

        assert_eq!(
            recorder.field(0, "body"),
            json!({"password": "XXX", "name": "n"})
        );
    }

    #[test]
    fn response_record_carries_status_and_time() {
        let recorder = Arc::new(Recorder::default());
        let interceptor = ResponseLogger::new(recorder.clone(), &config());
        let response = Response::new(
            Request::new(Method::GET, "/session").query("page", "2"),
            StatusCode::CREATED,
            Default::default(),
            Bytes::from_static(br#"{"token":"abc","ttl":60}"#),
            Duration::from_millis(15),
        );

        interceptor.after_response(&response).unwrap();

        assert_eq!(recorder.field(0, "status_code"), json!(201));
        assert_eq!(recorder.field(0, "time"), json!("15ms"));
        assert_eq!(recorder.field(0, "method"), json!("GET"));
        assert_eq!(recorder.field(0, "query"), json!({"page": "2"}));
        assert_eq!(recorder.field(0, "body"), json!({"token": "XXX", "ttl": 60}));
        assert_eq!(
            response.body(),
            &Bytes::from_static(br#"{"token":"abc","ttl":60}"#)
        );
    }

    #[test]
    fn empty_response_body_logs_null_without_warning() {
        let recorder = Arc::new(Recorder::default());
        let interceptor = ResponseLogger::new(recorder.clone(), &config());
        let response = Response::new(
            Request::new(Method::DELETE, "/users/1"),
            StatusCode::NO_CONTENT,
            Default::default(),
            Bytes::new(),
            Duration::ZERO,
        );

        interceptor.after_response(&response).unwrap();

        assert_eq!(recorder.0.lock().unwrap().len(), 1);
        assert_eq!(recorder.field(0, "body"), Value::Null);
    }
}
