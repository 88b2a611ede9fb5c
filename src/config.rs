//! Runtime configuration, read from environment variables.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Default chart width when a request does not give one.
pub const DEFAULT_CHART_WIDTH: u32 = 800;

/// Default chart height; the console's chart container is 300px tall.
pub const DEFAULT_CHART_HEIGHT: u32 = 300;

/// Largest width or height a chart request may ask for.
pub const DEFAULT_MAX_CHART_DIMENSION: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub port: u16,
    pub chart_width: u32,
    pub chart_height: u32,
    pub max_chart_dimension: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            max_chart_dimension: DEFAULT_MAX_CHART_DIMENSION,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            port: parse_var(&lookup, "SOS_CONSOLE_PORT", defaults.port)?,
            chart_width: parse_var(&lookup, "SOS_CONSOLE_CHART_WIDTH", defaults.chart_width)?,
            chart_height: parse_var(&lookup, "SOS_CONSOLE_CHART_HEIGHT", defaults.chart_height)?,
            max_chart_dimension: parse_var(
                &lookup,
                "SOS_CONSOLE_MAX_CHART_DIMENSION",
                defaults.max_chart_dimension,
            )?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.chart_height, 300);
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("SOS_CONSOLE_PORT", "8080"),
            ("SOS_CONSOLE_CHART_WIDTH", " 1024 "),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.chart_width, 1024);
        assert_eq!(config.max_chart_dimension, DEFAULT_MAX_CHART_DIMENSION);
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = ConsoleConfig::from_lookup(lookup(&[("SOS_CONSOLE_CHART_HEIGHT", "tall")]))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid value \"tall\" for SOS_CONSOLE_CHART_HEIGHT"
        );
    }
}
