use std::{env, path::PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::{builtin_credentials, parse_credentials},
    errors::{AppError, AppResult},
    models::domain::CredentialRecord,
};

pub const DEFAULT_STORAGE_DIR: &str = ".studysmarts";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub credentials: Vec<CredentialRecord>,
    pub openai_api_key: Option<SecretString>,
    pub openai_api_base: String,
    pub llm_model: String,
    pub event_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            storage_dir: env::var("STUDYSMARTS_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR)),
            credentials: env::var("STUDYSMARTS_CREDENTIALS")
                .map(|entries| parse_credentials(&entries))
                .unwrap_or_else(|_| builtin_credentials()),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_BASE.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            event_capacity: env::var("STUDYSMARTS_EVENT_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }

    /// Checks what the app needs to be fully functional. A missing API key
    /// only disables generation; the caller decides whether that is fatal.
    pub fn validate(&self) -> AppResult<()> {
        if self.credentials.is_empty() {
            return Err(AppError::ValidationError(
                "No valid credentials configured; check STUDYSMARTS_CREDENTIALS".to_string(),
            ));
        }

        match &self.openai_api_key {
            Some(key) if !key.expose_secret().is_empty() => Ok(()),
            _ => Err(AppError::ValidationError(
                "OPENAI_API_KEY is not set; study aid generation is unavailable".to_string(),
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            credentials: builtin_credentials(),
            openai_api_key: None,
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage_dir, PathBuf::from(".studysmarts"));
        assert_eq!(config.credentials.len(), 2);
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = Config::default();
        assert_eq!(config.validate().unwrap_err().error_code(), "VALIDATION_ERROR");

        let config = Config {
            openai_api_key: Some(SecretString::from("sk-test".to_string())),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = Config {
            credentials: Vec::new(),
            openai_api_key: Some(SecretString::from("sk-test".to_string())),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("STUDYSMARTS_CREDENTIALS"));
    }

    #[test]
    fn test_debug_does_not_leak_secrets() {
        let config = Config {
            openai_api_key: Some(SecretString::from("sk-very-secret".to_string())),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(!debug.contains("vikas123"));
    }
}
