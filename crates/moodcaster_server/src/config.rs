//! Endpoint configuration loaded from the environment.

use derive_getters::Getters;
use moodcaster_error::ConfigError;
use moodcaster_models::GROQ_CHAT_COMPLETIONS_URL;
use std::net::SocketAddr;
use std::time::Duration;

/// Model used when `GROQ_MODEL_ID` is unset.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Upstream deadline used when `MOODCASTER_UPSTREAM_TIMEOUT_SECS` is unset.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(18);

/// Listen address used when `MOODCASTER_BIND` is unset.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Configuration for the generation endpoint.
///
/// A missing API key is not a configuration error: the endpoint still starts
/// and reports the missing credential on each generation request.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct EndpointConfig {
    /// Upstream API key
    #[builder(default)]
    api_key: Option<String>,
    /// Upstream model identifier
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    model: String,
    /// Full URL of the chat completions endpoint
    #[builder(default = "GROQ_CHAT_COMPLETIONS_URL.to_string()")]
    upstream_url: String,
    /// Deadline for one upstream call
    #[builder(default = "DEFAULT_UPSTREAM_TIMEOUT")]
    upstream_timeout: Duration,
    /// Request server-sent events from the upstream
    #[builder(default)]
    stream: bool,
    /// Listen address
    #[builder(default = "SocketAddr::from(([127, 0, 0, 1], 8787))")]
    bind: SocketAddr,
}

impl EndpointConfig {
    /// Creates a builder with every field at its default.
    pub fn builder() -> EndpointConfigBuilder {
        EndpointConfigBuilder::default()
    }

    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `GROQ_API_KEY` (optional here, required to generate)
    /// - `GROQ_MODEL_ID` (default: `llama-3.1-8b-instant`)
    /// - `MOODCASTER_UPSTREAM_URL` (default: Groq chat completions)
    /// - `MOODCASTER_UPSTREAM_TIMEOUT_SECS` (default: 18)
    /// - `MOODCASTER_UPSTREAM_STREAM` (default: false)
    /// - `MOODCASTER_BIND` (default: `127.0.0.1:8787`)
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric, boolean or address value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodcaster_server::EndpointConfig;
    ///
    /// let config = EndpointConfig::from_lookup(|key| match key {
    ///     "GROQ_API_KEY" => Some("gsk-test".to_string()),
    ///     "MOODCASTER_UPSTREAM_TIMEOUT_SECS" => Some("5".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.api_key().as_deref(), Some("gsk-test"));
    /// assert_eq!(config.model(), "llama-3.1-8b-instant");
    /// assert_eq!(config.upstream_timeout().as_secs(), 5);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut builder = Self::builder();
        builder.api_key(var("GROQ_API_KEY"));

        if let Some(model) = var("GROQ_MODEL_ID") {
            builder.model(model);
        }
        if let Some(url) = var("MOODCASTER_UPSTREAM_URL") {
            builder.upstream_url(url);
        }
        if let Some(secs) = var("MOODCASTER_UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ConfigError::new(format!(
                    "MOODCASTER_UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            if secs == 0 {
                return Err(ConfigError::new(
                    "MOODCASTER_UPSTREAM_TIMEOUT_SECS must be greater than zero",
                ));
            }
            builder.upstream_timeout(Duration::from_secs(secs));
        }
        if let Some(flag) = var("MOODCASTER_UPSTREAM_STREAM") {
            builder.stream(parse_flag(&flag).ok_or_else(|| {
                ConfigError::new(format!(
                    "MOODCASTER_UPSTREAM_STREAM must be a boolean, got '{}'",
                    flag
                ))
            })?);
        }
        let bind = var("MOODCASTER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        builder.bind(bind.parse::<SocketAddr>().map_err(|_| {
            ConfigError::new(format!("MOODCASTER_BIND is not a socket address: '{}'", bind))
        })?);

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build endpoint config: {}", e)))
    }

    /// Returns a copy listening on a different address.
    pub fn with_bind(self, bind: SocketAddr) -> Self {
        Self { bind, ..self }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = EndpointConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_key(), &None);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.upstream_url(), GROQ_CHAT_COMPLETIONS_URL);
        assert_eq!(*config.upstream_timeout(), Duration::from_secs(18));
        assert!(!config.stream());
        assert_eq!(config.bind().to_string(), DEFAULT_BIND);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = EndpointConfig::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk-1"),
            ("GROQ_MODEL_ID", "mixtral"),
            ("MOODCASTER_UPSTREAM_URL", "http://localhost:9000/v1/chat/completions"),
            ("MOODCASTER_UPSTREAM_STREAM", "yes"),
            ("MOODCASTER_BIND", "0.0.0.0:3000"),
        ]))
        .unwrap();

        assert_eq!(config.model(), "mixtral");
        assert!(config.stream());
        assert_eq!(config.bind().port(), 3000);
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = EndpointConfig::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        for (key, value) in [
            ("MOODCASTER_UPSTREAM_TIMEOUT_SECS", "soon"),
            ("MOODCASTER_UPSTREAM_TIMEOUT_SECS", "0"),
            ("MOODCASTER_UPSTREAM_STREAM", "maybe"),
            ("MOODCASTER_BIND", "localhost"),
        ] {
            let err = EndpointConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(err.message.contains(key), "{}", err);
        }
    }
}
