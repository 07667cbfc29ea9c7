use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Model the original deployment was pinned to.
pub const DEFAULT_MODEL: &str = "gemma3";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub provider: ProviderKind,
    pub ollama: OllamaConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    pub provider: ProviderKind,
    pub ollama: OllamaConfig,
    /// Pause between the end of one generation and the start of the next.
    pub interval_secs: u64,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown GENERATE_PROVIDER '{}', expected 'ollama' or 'mock'",
                other
            ))),
        }
    }
}

impl OllamaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn from_lookup<F>(lookup: &F, is_prod: bool) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(OllamaConfig {
            base_url: get_env(lookup, "OLLAMA_BASE_URL", Some(DEFAULT_OLLAMA_BASE_URL), is_prod)?
                .trim_end_matches('/')
                .to_string(),
            model: get_env(lookup, "OLLAMA_MODEL", Some(DEFAULT_MODEL), is_prod)?,
            request_timeout_secs: parse_positive_env(
                lookup,
                "OLLAMA_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        })
    }
}

impl GenerateConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, is_prod(), &|key: &str| env::var(key).ok())
    }

    pub fn from_lookup<F>(
        common: core_config::Config,
        is_prod: bool,
        lookup: &F,
    ) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(GenerateConfig {
            common,
            provider: get_env(lookup, "GENERATE_PROVIDER", Some("ollama"), false)?.parse()?,
            ollama: OllamaConfig::from_lookup(lookup, is_prod)?,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }
}

impl PollerConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(is_prod(), &|key: &str| env::var(key).ok())
    }

    pub fn from_lookup<F>(is_prod: bool, lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(PollerConfig {
            provider: get_env(lookup, "GENERATE_PROVIDER", Some("ollama"), false)?.parse()?,
            ollama: OllamaConfig::from_lookup(lookup, is_prod)?,
            interval_secs: parse_env(lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn is_prod() -> bool {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod"
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a whole number: {}", key, e))
        }),
        None => Ok(default),
    }
}

fn parse_positive_env<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_env(lookup, key, default)? {
        0 => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be greater than zero",
            key
        ))),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_original_deployment() {
        let config = GenerateConfig::from_lookup(
            core_config::Config { port: 3000 },
            false,
            &lookup_from(&[]),
        )
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.ollama.model, "gemma3");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.ollama.request_timeout(), Duration::from_secs(300));
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn poller_interval_defaults_to_three_seconds() {
        let config = PollerConfig::from_lookup(false, &lookup_from(&[])).unwrap();
        assert_eq!(config.interval(), Duration::from_secs(3));
    }

    #[test]
    fn overrides_are_applied() {
        let lookup = lookup_from(&[
            ("OLLAMA_BASE_URL", "http://ollama:11434/"),
            ("OLLAMA_MODEL", "llama3.2"),
            ("GENERATE_PROVIDER", "Mock"),
            ("POLL_INTERVAL_SECS", "10"),
            ("OTLP_ENDPOINT", "http://tempo:4317"),
        ]);
        let config = PollerConfig::from_lookup(false, &lookup).unwrap();

        assert_eq!(config.ollama.base_url, "http://ollama:11434");
        assert_eq!(config.ollama.model, "llama3.2");
        assert_eq!(config.provider, ProviderKind::Mock);
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://tempo:4317"));
    }

    #[test]
    fn production_requires_explicit_ollama_settings() {
        let err = PollerConfig::from_lookup(true, &lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("OLLAMA_BASE_URL"));
    }

    #[test]
    fn rejects_unknown_provider_and_bad_numbers() {
        assert!(PollerConfig::from_lookup(false, &lookup_from(&[("GENERATE_PROVIDER", "gpt")]))
            .is_err());
        assert!(
            PollerConfig::from_lookup(false, &lookup_from(&[("POLL_INTERVAL_SECS", "soon")]))
                .is_err()
        );
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let err = PollerConfig::from_lookup(
            false,
            &lookup_from(&[("OLLAMA_REQUEST_TIMEOUT_SECS", "0")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("OLLAMA_REQUEST_TIMEOUT_SECS must be greater than zero"));

        let config = PollerConfig::from_lookup(
            false,
            &lookup_from(&[("OLLAMA_REQUEST_TIMEOUT_SECS", "30")]),
        )
        .unwrap();
        assert_eq!(config.ollama.request_timeout(), Duration::from_secs(30));
    }
}
