// src/authority.rs
//! # Domain Authority
//!
//! Configurable mapping from news hosts (e.g. "valor.globo.com",
//! "reuters.com") to normalized trust weights in `[0.0, 1.0]`.
//!
//! - Loads from JSON config; ships a built-in seed of high-trust outlets.
//! - Case-insensitive lookup on the canonical host.
//! - Fallback order: exact host → substring match → default.
//! - Unknown hosts get a conservative default (0.60).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

#[derive(Debug, Clone, Deserialize)]
pub struct DomainAuthority {
    /// Weight for hosts not present in the table.
    #[serde(default = "default_default_weight")]
    pub default_weight: f64,
    /// Weights keyed by host or host fragment ("valor", "reuters.com").
    /// Ordered map so substring fallback is deterministic.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

fn default_default_weight() -> f64 {
    0.60
}

impl DomainAuthority {
    /// Load the table from a JSON file. Malformed tables are a startup
    /// error, not a silent fallback.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading domain authority from {}", path.display()))?;
        let table: Self = serde_json::from_str(&s)
            .with_context(|| format!("parsing domain authority from {}", path.display()))?;
        Ok(table)
    }

    /// Weight for a host.
    ///
    /// 1. Exact match on the normalized host.
    /// 2. Substring fallback ("valor" matches "valor.globo.com").
    /// 3. Default weight.
    pub fn weight_for(&self, host: &str) -> f64 {
        let h = host.trim().to_ascii_lowercase();

        if let Some(&w) = self.weights.get(&h) {
            return clamp01(w);
        }
        for (k, &w) in &self.weights {
            if h.contains(k.as_str()) {
                return clamp01(w);
            }
        }
        clamp01(self.default_weight)
    }

    /// Built-in seed of financial-news outlets, used when no table is
    /// configured.
    pub fn default_seed() -> Self {
        let mut weights = BTreeMap::new();
        for (k, v) in [
            ("valor", 0.95),
            ("infomoney", 0.90),
            ("reuters", 0.98),
            ("bloomberg", 0.98),
            ("wsj", 0.90),
            ("cnbc", 0.88),
            ("bbc", 0.90),
            ("g1.globo.com", 0.85),
        ] {
            weights.insert(k.to_string(), v);
        }
        Self {
            default_weight: 0.60,
            weights,
        }
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
