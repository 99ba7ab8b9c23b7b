//! Packaging configuration.

use serde::{Deserialize, Serialize};

/// What to do with an entry whose source file does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSourcePolicy {
    /// Record the entry as failed.
    #[default]
    Fail,
    /// Skip the entry and record a warning.
    Skip,
}

impl MissingSourcePolicy {
    /// Returns the policy as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }
}

impl std::fmt::Display for MissingSourcePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the packaging engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Maximum number of entries read concurrently.
    pub concurrency: usize,
    /// Deflate level (0-9). 0 stores entries uncompressed.
    pub compression_level: u8,
    /// Handling of entries whose source file is absent.
    pub missing_source: MissingSourcePolicy,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            compression_level: 6,
            missing_source: MissingSourcePolicy::Fail,
        }
    }
}

impl PackConfig {
    /// Sets the maximum number of concurrent reads.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the deflate level, clamped to 0-9.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// Sets the missing-source policy.
    #[must_use]
    pub const fn with_missing_source(mut self, policy: MissingSourcePolicy) -> Self {
        self.missing_source = policy;
        self
    }

    /// Returns the effective concurrency (never zero).
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
