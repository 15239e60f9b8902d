//! The client shell around an external [`Transport`].
//!
//! [`Client`] owns the validated settings and the interceptor chains. It never
//! performs network I/O itself: every call goes through the transport, with
//! request interceptors run before it and response interceptors after it.

use std::{
    error::Error as StdError,
    sync::Arc,
    time::{Duration, Instant},
};

use bytes::Bytes;
use http::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::{Config, ConfigError, RetryConfig},
    interceptor::{
        InterceptorError, RequestInterceptor, RequestLogger, ResponseInterceptor, ResponseLogger,
    },
    logger::{LogContext, Logger, Severity},
    redact::Multimap,
};

/// Request payload as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// An already-decoded JSON document.
    Json(Value),
    /// Raw bytes, sent as-is.
    Raw(Bytes),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }
}

/// An outbound request.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: Multimap,
    query: Multimap,
    body: Option<Body>,
    context: LogContext,
}

impl Request {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Multimap::new(),
            query: Multimap::new(),
            body: None,
            context: LogContext::default(),
        }
    }

    /// Appends a header value, keeping earlier values for the same name.
    #[must_use]
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Appends a query parameter value, keeping earlier values for the same name.
    #[must_use]
    pub fn query<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.query.entry(name.into()).or_default().push(value.into());
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    #[must_use]
    pub fn raw_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    /// Attaches extra fields to every record logged for this call.
    #[must_use]
    pub fn context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &Multimap {
        &self.headers
    }

    pub fn query_params(&self) -> &Multimap {
        &self.query
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn log_context(&self) -> &LogContext {
        &self.context
    }
}

/// What a transport hands back for a request.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: Multimap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new<B: Into<Bytes>>(status: StatusCode, body: B) -> Self {
        Self {
            status,
            headers: Multimap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }
}

/// A completed call as returned to the caller.
#[derive(Clone, Debug)]
pub struct Response {
    request: Request,
    status: StatusCode,
    headers: Multimap,
    body: Bytes,
    elapsed: Duration,
}

impl Response {
    pub fn new(
        request: Request,
        status: StatusCode,
        headers: Multimap,
        body: Bytes,
        elapsed: Duration,
    ) -> Self {
        Self {
            request,
            status,
            headers,
            body,
            elapsed,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Multimap {
        &self.headers
    }

    /// The payload exactly as received.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Time spent in the transport.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Connection settings passed to the transport on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl From<&Config> for TransportSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.host().to_owned(),
            timeout: config.timeout(),
            retry: config.retry(),
        }
    }
}

/// Failure reported by a transport.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(Box<dyn StdError + Send + Sync>);

impl TransportError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self(err.into())
    }
}

/// Performs the actual network call, including any retries.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        settings: &TransportSettings,
        request: &Request,
    ) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request interceptor failed: {0}")]
    RequestInterceptor(#[source] InterceptorError),
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),
    #[error("response interceptor failed: {0}")]
    ResponseInterceptor(#[source] InterceptorError),
}

/// HTTP client with logging interceptors.
pub struct Client {
    settings: TransportSettings,
    transport: Arc<dyn Transport>,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
}

impl Client {
    /// Client with default settings and no redaction that always logs traffic.
    pub fn new<T, H, I>(
        transport: T,
        logger: Arc<dyn Logger>,
        host: H,
        integration: I,
    ) -> Result<Self, ConfigError>
    where
        T: Transport + 'static,
        H: Into<String>,
        I: Into<String>,
    {
        let config = Config::builder(host, integration).build()?;
        Ok(Self::bare(transport, &config).with_logging(logger, &config))
    }

    /// Client for a validated config.
    ///
    /// The logging interceptors are only installed when the configured level
    /// lets `info` records through.
    pub fn from_config<T>(transport: T, logger: Arc<dyn Logger>, config: &Config) -> Self
    where
        T: Transport + 'static,
    {
        let client = Self::bare(transport, config);
        if config.log_level().enables(Severity::Info) {
            client.with_logging(logger, config)
        } else {
            client
        }
    }

    fn bare<T>(transport: T, config: &Config) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            settings: TransportSettings::from(config),
            transport: Arc::new(transport),
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        }
    }

    fn with_logging(self, logger: Arc<dyn Logger>, config: &Config) -> Self {
        self.with_request_interceptor(RequestLogger::new(Arc::clone(&logger), config))
            .with_response_interceptor(ResponseLogger::new(logger, config))
    }

    #[must_use]
    pub fn with_request_interceptor<R>(mut self, interceptor: R) -> Self
    where
        R: RequestInterceptor + 'static,
    {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    #[must_use]
    pub fn with_response_interceptor<R>(mut self, interceptor: R) -> Self
    where
        R: ResponseInterceptor + 'static,
    {
        self.response_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    pub fn request_interceptor_count(&self) -> usize {
        self.request_interceptors.len()
    }

    pub fn response_interceptor_count(&self) -> usize {
        self.response_interceptors.len()
    }

    pub fn request<P: Into<String>>(&self, method: Method, path: P) -> Request {
        Request::new(method, path)
    }

    /// Runs the request interceptors, the transport, then the response interceptors.
    pub fn execute(&self, request: Request) -> Result<Response, ClientError> {
        for interceptor in &self.request_interceptors {
            interceptor
                .before_request(&request)
                .map_err(ClientError::RequestInterceptor)?;
        }

        let started = Instant::now();
        let raw = self
            .transport
            .send(&self.settings, &request)
            .map_err(ClientError::Transport)?;
        let response = Response::new(request, raw.status, raw.headers, raw.body, started.elapsed());

        for interceptor in &self.response_interceptors {
            interceptor
                .after_response(&response)
                .map_err(ClientError::ResponseInterceptor)?;
        }

        Ok(response)
    }
}
