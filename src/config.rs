//! Runtime configuration
//!
//! Read once from `NUTRILABEL_*` environment variables at startup.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::parser::sanitize::{InputLimits, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_INPUT_LINES};

pub const DEFAULT_FDC_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_SEARCH_LIMIT: usize = 25;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// FoodData Central API key; the database tools are disabled without it
    pub fdc_api_key: Option<String>,
    pub fdc_base_url: String,
    /// Candidates requested per ingredient search
    pub search_limit: usize,
    pub input_limits: InputLimits,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fdc_api_key: None,
            fdc_base_url: DEFAULT_FDC_BASE_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            input_limits: InputLimits::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

fn positive<T: PartialOrd + Default + ToString>(key: &str, value: T) -> Result<T, ConfigError> {
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup; missing or blank keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let fdc_api_key = lookup("NUTRILABEL_FDC_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let fdc_base_url = lookup("NUTRILABEL_FDC_BASE_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_FDC_BASE_URL.to_string());

        let search_limit = positive(
            "NUTRILABEL_SEARCH_LIMIT",
            parse_var(&lookup, "NUTRILABEL_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?,
        )?;
        let max_bytes = positive(
            "NUTRILABEL_MAX_INPUT_BYTES",
            parse_var(&lookup, "NUTRILABEL_MAX_INPUT_BYTES", DEFAULT_MAX_INPUT_BYTES)?,
        )?;
        let max_lines = positive(
            "NUTRILABEL_MAX_INPUT_LINES",
            parse_var(&lookup, "NUTRILABEL_MAX_INPUT_LINES", DEFAULT_MAX_INPUT_LINES)?,
        )?;
        let http_timeout_secs = positive(
            "NUTRILABEL_HTTP_TIMEOUT_SECS",
            parse_var(&lookup, "NUTRILABEL_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        )?;

        Ok(Self {
            fdc_api_key,
            fdc_base_url,
            search_limit,
            input_limits: InputLimits { max_bytes, max_lines },
            http_timeout_secs,
        })
    }

    pub fn food_database_configured(&self) -> bool {
        self.fdc_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.food_database_configured());
        assert_eq!(config.input_limits.max_bytes, 50_000);
        assert_eq!(config.input_limits.max_lines, 500);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("NUTRILABEL_FDC_API_KEY", " abc123 "),
            ("NUTRILABEL_SEARCH_LIMIT", "10"),
            ("NUTRILABEL_MAX_INPUT_LINES", "200"),
            ("NUTRILABEL_HTTP_TIMEOUT_SECS", ""),
        ])
        .unwrap();
        assert_eq!(config.fdc_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.input_limits.max_lines, 200);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("NUTRILABEL_SEARCH_LIMIT", "lots")]),
            Err(ConfigError::InvalidValue {
                key: "NUTRILABEL_SEARCH_LIMIT".to_string(),
                value: "lots".to_string(),
            })
        );
        assert!(config_from(&[("NUTRILABEL_MAX_INPUT_BYTES", "0")]).is_err());
        assert!(config_from(&[("NUTRILABEL_HTTP_TIMEOUT_SECS", "-5")]).is_err());
    }
}
