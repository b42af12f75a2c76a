//! Library configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Partitions at or below this many elements are finished with insertion sort.
pub const DEFAULT_SMALL_SORT_THRESHOLD: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeqConfig {
    /// Hard byte budget for the buffer pool. Stages never lease beyond this.
    pub pool_cap_bytes: usize,

    /// Insertion-sort cutoff used by partial sort and quickselect.
    pub small_sort_threshold: usize,
}

impl Default for SeqConfig {
    fn default() -> Self {
        Self {
            pool_cap_bytes: 512 * 1024 * 1024, // 512 MiB default
            small_sort_threshold: DEFAULT_SMALL_SORT_THRESHOLD,
        }
    }
}

impl SeqConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `PULLSEQ_POOL_CAP_BYTES`: buffer pool budget in bytes
    /// - `PULLSEQ_SMALL_SORT_THRESHOLD`: insertion-sort cutoff
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("PULLSEQ_POOL_CAP_BYTES") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.pool_cap_bytes = v;
            }
        }

        if let Ok(s) = std::env::var("PULLSEQ_SMALL_SORT_THRESHOLD") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.small_sort_threshold = v;
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields are an error.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no pipeline can run with.
    pub fn validate(&self) -> Result<()> {
        if self.pool_cap_bytes == 0 {
            return Err(Error::Config("pool_cap_bytes must be non-zero".into()));
        }
        if self.small_sort_threshold == 0 {
            return Err(Error::Config(
                "small_sort_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn sort_options(&self) -> SortOptions {
        SortOptions {
            small_sort_threshold: self.small_sort_threshold.max(1),
        }
    }
}

/// Tuning knobs handed to ordering stages at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    pub small_sort_threshold: usize,
}

impl SortOptions {
    pub fn new(small_sort_threshold: usize) -> Result<Self> {
        if small_sort_threshold == 0 {
            return Err(Error::InvalidArgument(
                "small_sort_threshold must be at least 1".into(),
            ));
        }
        Ok(Self {
            small_sort_threshold,
        })
    }
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            small_sort_threshold: DEFAULT_SMALL_SORT_THRESHOLD,
        }
    }
}
