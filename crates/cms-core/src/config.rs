//! Executor configuration
//!
//! Loaded from TOML by the admin binary; every key is optional.
//!
//! ```toml
//! schema_cache_capacity = 1024
//! schema_cache_ttl_secs = 600
//! reject_unknown_tags = true
//! contact_list_default_limit = 50
//! contact_list_max_limit = 200
//! ```

use cms_schema::SchemaCache;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are inconsistent
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// CMS executor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Maximum memoized compiled schemas
    pub schema_cache_capacity: u64,
    /// Time-to-live for memoized schemas, 0 disables expiry
    pub schema_cache_ttl_secs: u64,
    /// Fail commands whose schemas use unknown primitive tags
    pub reject_unknown_tags: bool,
    /// `list_contacts` limit when the payload gives none
    pub contact_list_default_limit: usize,
    /// Upper bound for `list_contacts`
    pub contact_list_max_limit: usize,
}

impl CmsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With schema cache capacity
    #[inline]
    #[must_use]
    pub fn with_schema_cache_capacity(mut self, capacity: u64) -> Self {
        self.schema_cache_capacity = capacity;
        self
    }

    /// With strict handling of unknown schema tags
    #[inline]
    #[must_use]
    pub fn with_reject_unknown_tags(mut self, reject: bool) -> Self {
        self.reject_unknown_tags = reject;
        self
    }

    /// With contact listing limits
    #[inline]
    #[must_use]
    pub fn with_contact_limits(mut self, default_limit: usize, max_limit: usize) -> Self {
        self.contact_list_default_limit = default_limit;
        self.contact_list_max_limit = max_limit;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError`] for malformed TOML or inconsistent values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value consistency
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "schema_cache_capacity must be positive".into(),
            ));
        }
        if self.contact_list_default_limit == 0 {
            return Err(ConfigError::Invalid(
                "contact_list_default_limit must be positive".into(),
            ));
        }
        if self.contact_list_max_limit < self.contact_list_default_limit {
            return Err(ConfigError::Invalid(format!(
                "contact_list_max_limit ({}) is below contact_list_default_limit ({})",
                self.contact_list_max_limit, self.contact_list_default_limit
            )));
        }
        Ok(())
    }

    /// Build the schema cache this configuration describes
    #[must_use]
    pub fn schema_cache(&self) -> SchemaCache {
        match self.schema_cache_ttl_secs {
            0 => SchemaCache::new(self.schema_cache_capacity),
            secs => SchemaCache::with_ttl(self.schema_cache_capacity, Duration::from_secs(secs)),
        }
    }

    /// Effective contact listing limit for a requested value
    #[must_use]
    pub fn contact_limit(&self, requested: Option<u64>) -> usize {
        match requested {
            Some(0) | None => self.contact_list_default_limit,
            Some(n) => usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.contact_list_max_limit),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            schema_cache_capacity: 1_024,
            schema_cache_ttl_secs: 0,
            reject_unknown_tags: false,
            contact_list_default_limit: 50,
            contact_list_max_limit: 200,
        }
    }
}
