//! Engine configuration
//!
//! Every field has a default, so a TOML file only needs the keys it
//! overrides:
//!
//! ```toml
//! default_base_url = "https://staging.example.com"
//! page_load_wait_ms = 3000
//!
//! [credentials]
//! email = "qa@example.com"
//!
//! [fragility]
//! seed = 7
//! ```

use crate::error::ConfigError;
use qae_analysis::{FragilityOptions, VariationOptions};
use qae_interpret::{Credentials, DEFAULT_PAGE_LOAD_WAIT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted fragility jitter
pub const MAX_FRAGILITY_JITTER: u8 = 20;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL used when a parse call supplies none
    pub default_base_url: Option<String>,
    /// Values used by the login shorthand
    pub credentials: Credentials,
    /// Wait inserted by page-load checks and the bare-navigation fallback
    pub page_load_wait_ms: u64,
    /// Variation filtering and truncation
    pub variations: VariationOptions,
    /// Fragility scan options
    pub fragility: FragilityOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_base_url: None,
            credentials: Credentials::default(),
            page_load_wait_ms: DEFAULT_PAGE_LOAD_WAIT_MS,
            variations: VariationOptions::default(),
            fragility: FragilityOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded engine config");
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_load_wait_ms == 0 {
            return Err(ConfigError::invalid("page_load_wait_ms must be positive"));
        }
        if self.variations.max_variations == 0 {
            return Err(ConfigError::invalid(
                "variations.max_variations must be positive",
            ));
        }
        if self.fragility.min_confidence > 100 {
            return Err(ConfigError::invalid(format!(
                "fragility.min_confidence must be at most 100, got {}",
                self.fragility.min_confidence
            )));
        }
        if self.fragility.max_jitter > MAX_FRAGILITY_JITTER {
            return Err(ConfigError::invalid(format!(
                "fragility.max_jitter must be at most {MAX_FRAGILITY_JITTER}, got {}",
                self.fragility.max_jitter
            )));
        }
        Ok(())
    }

    /// With default base URL
    #[inline]
    #[must_use]
    pub fn with_default_base_url(mut self, url: impl Into<String>) -> Self {
        self.default_base_url = Some(url.into());
        self
    }

    /// With login credentials
    #[inline]
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// With page-load wait
    #[inline]
    #[must_use]
    pub fn with_page_load_wait_ms(mut self, ms: u64) -> Self {
        self.page_load_wait_ms = ms;
        self
    }

    /// With variation options
    #[inline]
    #[must_use]
    pub fn with_variations(mut self, variations: VariationOptions) -> Self {
        self.variations = variations;
        self
    }

    /// With fragility options
    #[inline]
    #[must_use]
    pub fn with_fragility(mut self, fragility: FragilityOptions) -> Self {
        self.fragility = fragility;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.page_load_wait_ms, 2000);
        assert_eq!(config.credentials.email, "test@example.com");
        assert_eq!(config.credentials.password, "password123");
        assert_eq!(config.variations.max_variations, 10);
        assert!(!config.fragility.include_passing);
        assert_eq!(config.fragility.limit, 50);
        assert_eq!(config.fragility.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_base_url = "https://staging.example.com"

            [credentials]
            email = "qa@example.com"

            [fragility]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(
            config.default_base_url.as_deref(),
            Some("https://staging.example.com")
        );
        assert_eq!(config.credentials.email, "qa@example.com");
        assert_eq!(config.credentials.password, "password123");
        assert_eq!(config.fragility.seed, 7);
        assert_eq!(config.fragility.limit, 50);
        assert_eq!(config.page_load_wait_ms, 2000);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for text in [
            "page_load_wait_ms = 0",
            "[variations]\nmax_variations = 0",
            "[fragility]\nmin_confidence = 101",
            "[fragility]\nmax_jitter = 21",
        ] {
            let err = EngineConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}: {err}");
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml_str("page_load_wait_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_load_wait_ms = 1500").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.page_load_wait_ms, 1500);

        let err = EngineConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EngineConfig::new()
            .with_default_base_url("https://app.test")
            .with_page_load_wait_ms(1000);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
