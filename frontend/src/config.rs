use log::LevelFilter;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TOKEN_KEY: &str = "token";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid API base URL `{0}`: {1}")]
    InvalidBaseUrl(String, String),
    #[error("API base URL `{0}` cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("token storage key must not be empty")]
    EmptyTokenKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub token_key: String,
    pub log_level: LevelFilter,
}

impl ClientConfig {
    /// Reads `TODO_API_BASE_URL`, `TODO_TOKEN_KEY` and `TODO_LOG_LEVEL` as
    /// they were set when the wasm bundle was built.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            option_env!("TODO_API_BASE_URL"),
            option_env!("TODO_TOKEN_KEY"),
            option_env!("TODO_LOG_LEVEL"),
        )
    }

    pub fn from_parts(
        base_url: Option<&str>,
        token_key: Option<&str>,
        log_level: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let raw = base_url.unwrap_or(DEFAULT_API_BASE_URL).trim();
        let api_base_url =
            Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl(raw.to_string(), e.to_string()))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(raw.to_string()));
        }

        let token_key = token_key.unwrap_or(DEFAULT_TOKEN_KEY).trim();
        if token_key.is_empty() {
            return Err(ConfigError::EmptyTokenKey);
        }

        let log_level = log_level
            .and_then(|level| level.trim().parse().ok())
            .unwrap_or(LevelFilter::Info);

        Ok(Self {
            api_base_url,
            token_key: token_key.to_string(),
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::from_parts(None, None, None).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.token_key, "token");
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn overrides_are_applied() {
        let config =
            ClientConfig::from_parts(Some("https://todo.example.com/app/"), Some("session"), Some("debug"))
                .unwrap();
        assert_eq!(config.api_base_url.host_str(), Some("todo.example.com"));
        assert_eq!(config.token_key, "session");
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = ClientConfig::from_parts(None, None, Some("chatty")).unwrap();
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_parts(Some("not a url"), None, None),
            Err(ConfigError::InvalidBaseUrl(..))
        ));
        assert_eq!(
            ClientConfig::from_parts(Some("mailto:ops@example.com"), None, None),
            Err(ConfigError::OpaqueBaseUrl("mailto:ops@example.com".into()))
        );
        assert_eq!(
            ClientConfig::from_parts(None, Some(" "), None),
            Err(ConfigError::EmptyTokenKey)
        );
    }
}
