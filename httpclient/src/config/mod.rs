//! Client configuration.
//!
//! A [`Config`] only exists in validated form: every construction path
//! (builder, descriptor, JSON/YAML text) clamps the numeric settings and then
//! rejects an empty `host` or `integration`. Once built it is read-only and
//! can be shared freely between threads.

mod descriptor;
mod error;

use std::time::Duration;

pub use descriptor::{ConfigDescriptor, RedactionDescriptor, RetryDescriptor};
pub use error::ConfigError;

use crate::{
    logger::Severity,
    redact::{BodyRedactor, ParamsRedactor},
    settings::{RETRY_COUNT, RETRY_MAX_WAIT_TIME, RETRY_WAIT_TIME, TIMEOUT},
};

/// Retry shape handed to the transport untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub count: u32,
    pub wait_time: Duration,
    pub max_wait_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            count: RETRY_COUNT.default_value(),
            wait_time: RETRY_WAIT_TIME.default_value(),
            max_wait_time: RETRY_MAX_WAIT_TIME.default_value(),
        }
    }
}

/// The four independent redaction lists. Order is kept, duplicates are harmless.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedactionConfig {
    pub query_params: Vec<String>,
    pub headers: Vec<String>,
    pub request: Vec<String>,
    pub response: Vec<String>,
}

impl From<RedactionDescriptor> for RedactionConfig {
    fn from(descriptor: RedactionDescriptor) -> Self {
        Self {
            query_params: descriptor.query_params,
            headers: descriptor.headers,
            request: descriptor.request,
            response: descriptor.response,
        }
    }
}

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    integration: String,
    host: String,
    timeout: Duration,
    retry: RetryConfig,
    log_level: Severity,
    redaction: RedactionConfig,
}

impl Config {
    /// Starts a builder for the given base URL and integration name.
    ///
    /// ```
    /// use std::time::Duration;
    /// use httpclient::Config;
    ///
    /// let config = Config::builder("https://api.example.com", "payments")
    ///     .timeout(Duration::from_secs(20))
    ///     .redact_header("Authorization")
    ///     .redact_response_field("card.number")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.timeout(), Duration::from_secs(20));
    /// ```
    pub fn builder<H, I>(host: H, integration: I) -> ConfigBuilder
    where
        H: Into<String>,
        I: Into<String>,
    {
        ConfigBuilder {
            config: Config {
                integration: integration.into(),
                host: host.into(),
                timeout: TIMEOUT.default_value(),
                retry: RetryConfig::default(),
                log_level: Severity::default(),
                redaction: RedactionConfig::default(),
            },
        }
    }

    /// Parses and validates a JSON descriptor.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let descriptor: ConfigDescriptor = serde_json::from_str(input)?;
        Self::try_from(descriptor)
    }

    /// Parses and validates a YAML descriptor.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let descriptor: ConfigDescriptor = serde_yaml::from_str(input)?;
        Self::try_from(descriptor)
    }

    /// Clamps the numeric settings, then requires `host` and `integration`.
    ///
    /// Running it on an already valid config changes nothing.
    fn validate(mut self) -> Result<Self, ConfigError> {
        self.timeout = TIMEOUT.apply(self.timeout);
        self.retry.count = RETRY_COUNT.apply(self.retry.count);
        self.retry.wait_time = RETRY_WAIT_TIME.apply(self.retry.wait_time);
        self.retry.max_wait_time = RETRY_MAX_WAIT_TIME.apply(self.retry.max_wait_time);

        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.integration.trim().is_empty() {
            return Err(ConfigError::MissingIntegration);
        }
        Ok(self)
    }

    pub fn integration(&self) -> &str {
        &self.integration
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> RetryConfig {
        self.retry
    }

    pub fn log_level(&self) -> Severity {
        self.log_level
    }

    pub fn redaction(&self) -> &RedactionConfig {
        &self.redaction
    }

    pub fn query_redactor(&self) -> ParamsRedactor {
        ParamsRedactor::new(self.redaction.query_params.iter().cloned().collect())
    }

    pub fn header_redactor(&self) -> ParamsRedactor {
        ParamsRedactor::new(self.redaction.headers.iter().cloned().collect())
    }

    pub fn request_body_redactor(&self) -> BodyRedactor {
        BodyRedactor::new(&self.redaction.request)
    }

    pub fn response_body_redactor(&self) -> BodyRedactor {
        BodyRedactor::new(&self.redaction.response)
    }
}

impl TryFrom<ConfigDescriptor> for Config {
    type Error = ConfigError;

    fn try_from(descriptor: ConfigDescriptor) -> Result<Self, Self::Error> {
        Config {
            integration: descriptor.integration,
            host: descriptor.host,
            timeout: descriptor.timeout,
            retry: RetryConfig {
                count: descriptor.retry.count,
                wait_time: descriptor.retry.wait_time,
                max_wait_time: descriptor.retry.max_wait_time,
            },
            log_level: descriptor.log_level,
            redaction: descriptor.ofuscate.into(),
        }
        .validate()
    }
}

/// Chained construction of a [`Config`]; nothing is checked until [`build`](Self::build).
#[derive(Clone, Debug)]
#[must_use]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry_count(mut self, count: u32) -> Self {
        self.config.retry.count = count;
        self
    }

    pub fn retry_wait_time(mut self, wait_time: Duration) -> Self {
        self.config.retry.wait_time = wait_time;
        self
    }

    pub fn retry_max_wait_time(mut self, max_wait_time: Duration) -> Self {
        self.config.retry.max_wait_time = max_wait_time;
        self
    }

    pub fn log_level(mut self, log_level: Severity) -> Self {
        self.config.log_level = log_level;
        self
    }

    pub fn redact_query_param<S: Into<String>>(mut self, name: S) -> Self {
        self.config.redaction.query_params.push(name.into());
        self
    }

    pub fn redact_query_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .redaction
            .query_params
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn redact_header<S: Into<String>>(mut self, name: S) -> Self {
        self.config.redaction.headers.push(name.into());
        self
    }

    pub fn redact_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .redaction
            .headers
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds a request body selector, such as `"user.password"`.
    pub fn redact_request_field<S: Into<String>>(mut self, selector: S) -> Self {
        self.config.redaction.request.push(selector.into());
        self
    }

    pub fn redact_request_fields<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .redaction
            .request
            .extend(selectors.into_iter().map(Into::into));
        self
    }

    /// Adds a response body selector, such as `"user.ssn"`.
    pub fn redact_response_field<S: Into<String>>(mut self, selector: S) -> Self {
        self.config.redaction.response.push(selector.into());
        self
    }

    pub fn redact_response_fields<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .redaction
            .response
            .extend(selectors.into_iter().map(Into::into));
        self
    }

    /// Clamps out-of-range settings and validates the result.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Config, ConfigError, RetryConfig};
    use crate::logger::Severity;

    #[test]
    fn builder_defaults_match_policy() {
        let config = Config::builder("http://x", "svc").build().unwrap();

        assert_eq!(config.host(), "http://x");
        assert_eq!(config.integration(), "svc");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry(), RetryConfig::default());
        assert_eq!(config.retry().count, 3);
        assert_eq!(config.log_level(), Severity::Info);
    }

    #[test]
    fn in_range_values_are_kept() {
        let config = Config::builder("http://x", "svc")
            .timeout(Duration::from_secs(5))
            .retry_count(0)
            .retry_wait_time(Duration::from_secs(5))
            .retry_max_wait_time(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.retry(),
            RetryConfig {
                count: 0,
                wait_time: Duration::from_secs(5),
                max_wait_time: Duration::from_secs(10),
            }
        );
    }

    #[test]
    fn out_of_range_values_fall_back_to_defaults() {
        let config = Config::builder("http://x", "svc")
            .timeout(Duration::from_secs(61))
            .retry_count(6)
            .retry_wait_time(Duration::from_millis(99))
            .retry_max_wait_time(Duration::from_millis(999))
            .build()
            .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry(), RetryConfig::default());
    }

    #[test]
    fn validation_is_idempotent() {
        let config = Config::builder("http://x", "svc")
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap();

        assert_eq!(config.clone().validate().unwrap(), config);
    }

    #[test]
    fn blank_host_is_rejected() {
        for host in ["", "   ", "\t\n"] {
            let err = Config::builder(host, "svc").build().unwrap_err();
            assert!(matches!(err, ConfigError::MissingHost));
        }
    }

    #[test]
    fn blank_integration_is_rejected() {
        for integration in ["", "  "] {
            let err = Config::builder("http://x", integration).build().unwrap_err();
            assert!(matches!(err, ConfigError::MissingIntegration));
        }
    }

    #[test]
    fn host_is_checked_before_integration() {
        let err = Config::builder("", "").build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingHost));
    }

    #[test]
    fn error_messages() {
        assert_eq!(ConfigError::MissingHost.to_string(), "host attribute is needed");
        assert_eq!(
            ConfigError::MissingIntegration.to_string(),
            "integration attribute is needed"
        );
    }

    #[test]
    fn redaction_lists_accumulate_in_order() {
        let config = Config::builder("http://x", "svc")
            .redact_header("Authorization")
            .redact_headers(["Cookie", "Authorization"])
            .redact_query_param("api_key")
            .redact_query_params(["sig"])
            .redact_request_fields(["password", "card.cvv"])
            .redact_request_field("pin")
            .redact_response_field("user.ssn")
            .redact_response_fields(["token"])
            .build()
            .unwrap();

        let redaction = config.redaction();
        assert_eq!(redaction.headers, ["Authorization", "Cookie", "Authorization"]);
        assert_eq!(redaction.query_params, ["api_key", "sig"]);
        assert_eq!(redaction.request, ["password", "card.cvv", "pin"]);
        assert_eq!(redaction.response, ["user.ssn", "token"]);
        assert_eq!(config.header_redactor().fields().len(), 2);
    }

    #[test]
    fn json_descriptor_is_validated() {
        let config = Config::from_json_str(
            r#"{
                "integration": "svc",
                "host": "http://x",
                "timeout": "30s",
                "retry": {"count": 9, "wait_time": "200ms"},
                "log_level": "debug",
                "ofuscate": {"headers": ["Authorization"]}
            }"#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry().count, 3);
        assert_eq!(config.retry().wait_time, Duration::from_millis(200));
        assert_eq!(config.retry().max_wait_time, Duration::from_secs(2));
        assert_eq!(config.log_level(), Severity::Debug);
        assert_eq!(config.redaction().headers, ["Authorization"]);
    }

    #[test]
    fn json_descriptor_negative_retry_count_falls_back_to_default() {
        let config = Config::from_json_str(
            r#"{"integration": "svc", "host": "http://x", "retry": {"count": -1}}"#,
        )
        .unwrap();
        assert_eq!(config.retry().count, 3);
    }

    #[test]
    fn json_descriptor_oversized_timeout_falls_back_to_default() {
        let config = Config::from_json_str(
            r#"{"integration": "svc", "host": "http://x", "timeout": 18446744073709551615}"#,
        )
        .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_descriptor_negative_numbers_fall_back_to_defaults() {
        let config = Config::from_yaml_str(
            "integration: svc\n\
             host: http://x\n\
             timeout: -5\n\
             retry:\n  count: -1\n",
        )
        .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry().count, 3);
    }

    #[test]
    fn json_descriptor_without_host_fails() {
        let err = Config::from_json_str(r#"{"integration": "svc"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingHost));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = Config::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_descriptor_is_validated() {
        let config = Config::from_yaml_str(
            "integration: svc\n\
             host: http://x\n\
             timeout: 1m\n\
             retry:\n  count: 1\n  max_wait_time: 5s\n\
             log_level: warn\n\
             ofuscate:\n  response:\n    - user.ssn\n",
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.retry().count, 1);
        assert_eq!(config.retry().max_wait_time, Duration::from_secs(5));
        assert_eq!(config.log_level(), Severity::Warn);
        assert_eq!(config.redaction().response, ["user.ssn"]);
    }
}
