use crate::error::{Result, TaxonError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STALE_IDS_ENV: &str = "TAXON_STALE_IDS";

/// What to do with selected ids that are missing from the current tree snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaleIdPolicy {
    /// Keep them as depth-0 orphans; they never win a depth comparison.
    #[default]
    Keep,
    /// Drop them whenever the committed selection is recomputed, as long as
    /// a non-empty tree is installed.
    Prune,
}

impl FromStr for StaleIdPolicy {
    type Err = TaxonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "prune" => Ok(Self::Prune),
            other => Err(TaxonError::Config(format!(
                "unknown stale id policy '{}' (expected 'keep' or 'prune')",
                other
            ))),
        }
    }
}

impl fmt::Display for StaleIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => f.write_str("keep"),
            Self::Prune => f.write_str("prune"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    #[serde(default)]
    pub stale_ids: StaleIdPolicy,
}

impl ResolverConfig {
    /// Defaults overridden by `TAXON_STALE_IDS` when set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(STALE_IDS_ENV) {
            config.stale_ids = value.parse()?;
        }
        Ok(config)
    }

    pub fn with_stale_ids(mut self, policy: StaleIdPolicy) -> Self {
        self.stale_ids = policy;
        self
    }
}
