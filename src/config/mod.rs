//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `VECFLOW_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::executor::{ExecutorConfig, ExecutorError};
use crate::rerank::{RerankConfig, RerankError};

/// Settings for every component, loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VECFLOW_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub cache: CacheConfig,
    pub rerank: RerankConfig,
}

impl Config {
    const ENV_BATCH_SIZE: &'static str = "VECFLOW_BATCH_SIZE";
    const ENV_BATCH_DELAY_MS: &'static str = "VECFLOW_BATCH_DELAY_MS";
    const ENV_YIELD_AFTER: &'static str = "VECFLOW_YIELD_AFTER";
    const ENV_ITEM_TIMEOUT_MS: &'static str = "VECFLOW_ITEM_TIMEOUT_MS";

    const ENV_MESSAGE_CACHE_SIZE: &'static str = "VECFLOW_MESSAGE_CACHE_SIZE";
    const ENV_TAG_CACHE_SIZE: &'static str = "VECFLOW_TAG_CACHE_SIZE";
    const ENV_VECTOR_CACHE_SIZE: &'static str = "VECFLOW_VECTOR_CACHE_SIZE";
    const ENV_CACHE_SWEEP_SECS: &'static str = "VECFLOW_CACHE_SWEEP_SECS";

    const ENV_RERANK_ENABLED: &'static str = "VECFLOW_RERANK_ENABLED";
    const ENV_RERANK_URL: &'static str = "VECFLOW_RERANK_URL";
    const ENV_RERANK_API_KEY: &'static str = "VECFLOW_RERANK_API_KEY";
    const ENV_RERANK_MODEL: &'static str = "VECFLOW_RERANK_MODEL";
    const ENV_RERANK_TOP_N: &'static str = "VECFLOW_RERANK_TOP_N";
    const ENV_RERANK_ALPHA: &'static str = "VECFLOW_RERANK_ALPHA";
    const ENV_RERANK_SUCCESS_NOTIFY: &'static str = "VECFLOW_RERANK_SUCCESS_NOTIFY";
    const ENV_RERANK_DEDUP: &'static str = "VECFLOW_RERANK_DEDUP";
    const ENV_RERANK_DEDUP_INSTRUCTION: &'static str = "VECFLOW_RERANK_DEDUP_INSTRUCTION";
    const ENV_RERANK_TIMEOUT_MS: &'static str = "VECFLOW_RERANK_TIMEOUT_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Malformed values are errors; unset or blank variables keep the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            executor: Self::executor_from_env(defaults.executor)?,
            cache: Self::cache_from_env(defaults.cache)?,
            rerank: Self::rerank_from_env(defaults.rerank)?,
        })
    }

    /// Checks every section. The rerank section is only checked when enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.executor.validate().map_err(|e| match e {
            ExecutorError::InvalidConfig { reason } => ConfigError::Invalid {
                section: "executor",
                reason,
            },
            other => ConfigError::Invalid {
                section: "executor",
                reason: other.to_string(),
            },
        })?;

        self.cache
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                section: "cache",
                reason,
            })?;

        if self.rerank.enabled {
            self.rerank.validate().map_err(|e| match e {
                RerankError::InvalidConfig { reason } => ConfigError::Invalid {
                    section: "rerank",
                    reason,
                },
                other => ConfigError::Invalid {
                    section: "rerank",
                    reason: other.to_string(),
                },
            })?;
        }

        Ok(())
    }

    fn executor_from_env(defaults: ExecutorConfig) -> Result<ExecutorConfig, ConfigError> {
        Ok(ExecutorConfig {
            batch_size: Self::parse_from_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?,
            batch_delay: Self::parse_millis_from_env(
                Self::ENV_BATCH_DELAY_MS,
                defaults.batch_delay,
            )?,
            yield_after: Self::parse_from_env(Self::ENV_YIELD_AFTER, defaults.yield_after)?,
            item_timeout: Self::parse_millis_from_env(
                Self::ENV_ITEM_TIMEOUT_MS,
                defaults.item_timeout,
            )?,
            call_timeout: defaults.call_timeout,
        })
    }

    fn cache_from_env(defaults: CacheConfig) -> Result<CacheConfig, ConfigError> {
        let sweep_secs = Self::parse_from_env(
            Self::ENV_CACHE_SWEEP_SECS,
            defaults.sweep_interval.as_secs(),
        )?;

        Ok(CacheConfig {
            message_capacity: Self::parse_from_env(
                Self::ENV_MESSAGE_CACHE_SIZE,
                defaults.message_capacity,
            )?,
            tag_capacity: Self::parse_from_env(Self::ENV_TAG_CACHE_SIZE, defaults.tag_capacity)?,
            vector_capacity: Self::parse_from_env(
                Self::ENV_VECTOR_CACHE_SIZE,
                defaults.vector_capacity,
            )?,
            sweep_interval: Duration::from_secs(sweep_secs),
            min_hit_rate: defaults.min_hit_rate,
        })
    }

    fn rerank_from_env(defaults: RerankConfig) -> Result<RerankConfig, ConfigError> {
        Ok(RerankConfig {
            enabled: Self::parse_bool_from_env(Self::ENV_RERANK_ENABLED, defaults.enabled)?,
            url: Self::parse_string_from_env(Self::ENV_RERANK_URL, defaults.url),
            api_key: Self::parse_string_from_env(Self::ENV_RERANK_API_KEY, defaults.api_key),
            model: Self::parse_string_from_env(Self::ENV_RERANK_MODEL, defaults.model),
            top_n: Self::parse_from_env(Self::ENV_RERANK_TOP_N, defaults.top_n)?,
            hybrid_alpha: Self::parse_from_env(Self::ENV_RERANK_ALPHA, defaults.hybrid_alpha)?,
            success_notify: Self::parse_bool_from_env(
                Self::ENV_RERANK_SUCCESS_NOTIFY,
                defaults.success_notify,
            )?,
            deduplication_enabled: Self::parse_bool_from_env(
                Self::ENV_RERANK_DEDUP,
                defaults.deduplication_enabled,
            )?,
            deduplication_instruction: Self::parse_string_from_env(
                Self::ENV_RERANK_DEDUP_INSTRUCTION,
                defaults.deduplication_instruction,
            ),
            timeout_ms: Self::parse_from_env(Self::ENV_RERANK_TIMEOUT_MS, defaults.timeout_ms)?,
        })
    }

    fn read_env(var_name: &'static str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::read_env(var_name) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name: var_name,
                reason: e.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }

    fn parse_millis_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        let millis = Self::parse_from_env(var_name, default_ms)?;
        Ok(Duration::from_millis(millis))
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match Self::read_env(var_name) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name: var_name,
                    value,
                    reason: "expected a boolean (true/false, 1/0, yes/no, on/off)".to_string(),
                }),
            },
            None => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &'static str, default: String) -> String {
        Self::read_env(var_name).unwrap_or(default)
    }
}
