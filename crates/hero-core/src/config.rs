#![forbid(unsafe_code)]

//! View configuration for the windowed list and message search.
//!
//! Defaults match the message views shipped in the apps: 80px rows in a
//! 400px container, five rows of overscan, a near-end sentinel at 80% of the
//! list, a 100px sentinel root margin, and a 300ms search debounce.
//!
//! # Environment Variables
//! - `HERO_ITEM_HEIGHT` (f64, > 0)
//! - `HERO_CONTAINER_HEIGHT` (f64, > 0)
//! - `HERO_OVERSCAN` (usize)
//! - `HERO_END_REACHED_THRESHOLD` (f64, 0..=1)
//! - `HERO_ROOT_MARGIN` (f64, >= 0)
//! - `HERO_SEARCH_DEBOUNCE_MS` (u64)
//!
//! Values that fail to parse or validate are reported as [`ConfigError`]s and
//! the default is kept for that field.

use std::env;
use std::fmt;
use std::time::Duration;

const ENV_ITEM_HEIGHT: &str = "HERO_ITEM_HEIGHT";
const ENV_CONTAINER_HEIGHT: &str = "HERO_CONTAINER_HEIGHT";
const ENV_OVERSCAN: &str = "HERO_OVERSCAN";
const ENV_END_REACHED_THRESHOLD: &str = "HERO_END_REACHED_THRESHOLD";
const ENV_ROOT_MARGIN: &str = "HERO_ROOT_MARGIN";
const ENV_SEARCH_DEBOUNCE_MS: &str = "HERO_SEARCH_DEBOUNCE_MS";

/// Windowed list and search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Fixed per-item height in pixels.
    pub item_height: f64,
    /// Visible container height in pixels.
    pub container_height: f64,
    /// Extra items rendered beyond each visible edge.
    pub overscan: usize,
    /// Fraction of the total height at which the near-end sentinel sits.
    pub end_reached_threshold: f64,
    /// Pixels added around the viewport when testing sentinel visibility.
    pub root_margin: f64,
    /// Quiet period before a typed query is applied.
    pub search_debounce: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            item_height: 80.0,
            container_height: 400.0,
            overscan: 5,
            end_reached_threshold: 0.8,
            root_margin: 100.0,
            search_debounce: Duration::from_millis(300),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: ViewConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ViewConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> ViewConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse config through a custom variable lookup.
    #[must_use]
    pub fn from_lookup<F>(get: F) -> ConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        from_env_with(get)
    }

    /// Set the item height.
    #[must_use]
    pub fn with_item_height(mut self, height: f64) -> Self {
        self.item_height = height;
        self
    }

    /// Set the container height.
    #[must_use]
    pub fn with_container_height(mut self, height: f64) -> Self {
        self.container_height = height;
        self
    }

    /// Set the overscan count.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Set the end-reached threshold.
    #[must_use]
    pub fn with_end_reached_threshold(mut self, threshold: f64) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    /// Set the sentinel root margin.
    #[must_use]
    pub fn with_root_margin(mut self, margin: f64) -> Self {
        self.root_margin = margin;
        self
    }

    /// Set the search debounce period.
    #[must_use]
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if let Err(err) = check_positive("item_height", self.item_height) {
            errors.push(err);
        }
        if let Err(err) = check_positive("container_height", self.container_height) {
            errors.push(err);
        }
        if let Err(err) = check_fraction("end_reached_threshold", self.end_reached_threshold) {
            errors.push(err);
        }
        if let Err(err) = check_non_negative("root_margin", self.root_margin) {
            errors.push(err);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short human-readable summary for debug output.
    #[must_use]
    pub fn summary_short(&self) -> String {
        format!(
            "rows {}px · view {}px · overscan {} · end {:.0}% · debounce {}ms",
            self.item_height,
            self.container_height,
            self.overscan,
            self.end_reached_threshold * 100.0,
            self.search_debounce.as_millis()
        )
    }
}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = ViewConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_ITEM_HEIGHT) {
        match parse_f64(&value).map(|v| check_positive("item_height", v)) {
            Some(Ok(parsed)) => config.item_height = parsed,
            Some(Err(err)) => errors.push(err),
            None => errors.push(ConfigError::new("item_height", value, "expected number")),
        }
    }

    if let Some(value) = get(ENV_CONTAINER_HEIGHT) {
        match parse_f64(&value).map(|v| check_positive("container_height", v)) {
            Some(Ok(parsed)) => config.container_height = parsed,
            Some(Err(err)) => errors.push(err),
            None => errors.push(ConfigError::new(
                "container_height",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_OVERSCAN) {
        match parse_usize(&value) {
            Some(parsed) => config.overscan = parsed,
            None => errors.push(ConfigError::new(
                "overscan",
                value,
                "expected non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_END_REACHED_THRESHOLD) {
        match parse_f64(&value).map(|v| check_fraction("end_reached_threshold", v)) {
            Some(Ok(parsed)) => config.end_reached_threshold = parsed,
            Some(Err(err)) => errors.push(err),
            None => errors.push(ConfigError::new(
                "end_reached_threshold",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_ROOT_MARGIN) {
        match parse_f64(&value).map(|v| check_non_negative("root_margin", v)) {
            Some(Ok(parsed)) => config.root_margin = parsed,
            Some(Err(err)) => errors.push(err),
            None => errors.push(ConfigError::new("root_margin", value, "expected number")),
        }
    }

    if let Some(value) = get(ENV_SEARCH_DEBOUNCE_MS) {
        match value.trim().parse::<u64>() {
            Ok(ms) => config.search_debounce = Duration::from_millis(ms),
            Err(_) => errors.push(ConfigError::new(
                "search_debounce",
                value,
                "expected milliseconds",
            )),
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            count = errors.len(),
            "view config: ignoring invalid environment overrides"
        );
    }

    ConfigParse { config, errors }
}

#[inline]
fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn check_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::new(field, value.to_string(), "must be > 0"))
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::new(field, value.to_string(), "must be >= 0"))
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::new(
            field,
            value.to_string(),
            "must be within 0..=1",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(env: &HashMap<&str, &str>) -> ConfigParse {
        from_env_with(|key| env.get(key).map(|value| value.to_string()))
    }

    #[test]
    fn defaults_match_message_views() {
        let config = ViewConfig::default();
        assert_eq!(config.item_height, 80.0);
        assert_eq!(config.container_height, 400.0);
        assert_eq!(config.overscan, 5);
        assert_eq!(config.end_reached_threshold, 0.8);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_parsing() {
        let mut env = HashMap::new();
        env.insert(ENV_ITEM_HEIGHT, "64");
        env.insert(ENV_CONTAINER_HEIGHT, " 720.5 ");
        env.insert(ENV_OVERSCAN, "3");
        env.insert(ENV_END_REACHED_THRESHOLD, "0.9");
        env.insert(ENV_ROOT_MARGIN, "0");
        env.insert(ENV_SEARCH_DEBOUNCE_MS, "150");

        let parsed = parse(&env);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let config = parsed.config;
        assert_eq!(config.item_height, 64.0);
        assert_eq!(config.container_height, 720.5);
        assert_eq!(config.overscan, 3);
        assert_eq!(config.end_reached_threshold, 0.9);
        assert_eq!(config.root_margin, 0.0);
        assert_eq!(config.search_debounce, Duration::from_millis(150));
    }

    #[test]
    fn invalid_values_reported_and_defaults_kept() {
        let mut env = HashMap::new();
        env.insert(ENV_ITEM_HEIGHT, "0");
        env.insert(ENV_CONTAINER_HEIGHT, "tall");
        env.insert(ENV_OVERSCAN, "-1");
        env.insert(ENV_END_REACHED_THRESHOLD, "1.5");
        env.insert(ENV_SEARCH_DEBOUNCE_MS, "soon");

        let parsed = parse(&env);
        let fields: Vec<_> = parsed.errors.iter().map(|err| err.field).collect();
        assert!(fields.contains(&"item_height"));
        assert!(fields.contains(&"container_height"));
        assert!(fields.contains(&"overscan"));
        assert!(fields.contains(&"end_reached_threshold"));
        assert!(fields.contains(&"search_debounce"));
        assert_eq!(parsed.config, ViewConfig::default());
    }

    #[test]
    fn validate_reports_every_violation() {
        let config = ViewConfig::default()
            .with_item_height(-1.0)
            .with_container_height(f64::NAN)
            .with_end_reached_threshold(2.0)
            .with_root_margin(-5.0);
        let errors = config.validate().expect_err("invalid config");
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn error_display_names_field() {
        let err = ConfigError::new("overscan", "x", "expected non-negative integer");
        assert_eq!(err.to_string(), "overscan=x (expected non-negative integer)");
    }

    #[test]
    fn summary_mentions_key_values() {
        let summary = ViewConfig::default().summary_short();
        assert!(summary.contains("80px"));
        assert!(summary.contains("300ms"));
    }
}
