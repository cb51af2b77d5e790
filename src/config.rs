// src/config.rs
//! Root configuration: scan window, scoring weights, cutoffs, signal
//! backends and keyword-table paths. Every tunable lives here; validation
//! is fail-fast so an inconsistent deployment never scores a single item.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/triage.toml";
pub const ENV_CONFIG_PATH: &str = "TRIAGE_CONFIG_PATH";

/// Weights sum tolerance: beyond this the operator has mistyped something.
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("score weights must sum to ~1.0, got {0:.4}")]
    WeightSum(f64),
    #[error("score weight `{0}` must be non-negative")]
    NegativeWeight(&'static str),
    #[error("post_cutoff ({post}) must be >= watch_cutoff ({watch})")]
    InvertedCutoffs { post: f64, watch: f64 },
    #[error("freshness tau must be > 0, got {0}")]
    NonPositiveTau(f64),
    #[error("risk_penalty must be in (0, 1], got {0}")]
    RiskPenaltyRange(f64),
    #[error("scan window must be positive, got {0} minutes")]
    EmptyScanWindow(i64),
    #[error("novelty capacity must be > 0")]
    ZeroNoveltyCapacity,
    #[error("signal backend `http` requires engagement_url and trends_url")]
    MissingHttpEndpoints,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub freshness: f64,
    pub authority: f64,
    pub social_velocity: f64,
    pub engagement: f64,
    pub brand_fit: f64,
    pub novelty: f64,
    pub sentiment: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            freshness: 0.20,
            authority: 0.15,
            social_velocity: 0.20,
            engagement: 0.10,
            brand_fit: 0.15,
            novelty: 0.10,
            sentiment: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.freshness
            + self.authority
            + self.social_velocity
            + self.engagement
            + self.brand_fit
            + self.novelty
            + self.sentiment
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, w) in [
            ("freshness", self.freshness),
            ("authority", self.authority),
            ("social_velocity", self.social_velocity),
            ("engagement", self.engagement),
            ("brand_fit", self.brand_fit),
            ("novelty", self.novelty),
            ("sentiment", self.sentiment),
        ] {
            if w < 0.0 {
                return Err(ConfigError::NegativeWeight(name));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Cutoffs {
    pub post: f64,
    pub watch: f64,
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self {
            post: 70.0,
            watch: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalBackend {
    /// No backend: every cluster gets the zero signal.
    None,
    /// Deterministic double, for offline runs and tests.
    Mock,
    /// Plain-JSON HTTP endpoints (see `signals::http`).
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalSettings {
    pub backend: SignalBackend,
    pub engagement_url: Option<String>,
    pub trends_url: Option<String>,
    /// Pre-existing signal records (JSON, `SocialSignals` shape).
    pub recorded_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    /// Parallel signal fetches in flight.
    pub concurrency: usize,
    /// Fixed delay before each fetch, the rate-limit courtesy knob.
    pub inter_request_delay_ms: u64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            backend: SignalBackend::None,
            engagement_url: None,
            trends_url: None,
            recorded_path: None,
            fetch_timeout_secs: 20,
            concurrency: 4,
            inter_request_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub skip_patterns: Vec<String>,
    pub skip_keywords: Vec<String>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        let v = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            skip_patterns: v(&[
                r"^vídeos?:",
                r"^videos?:",
                r"^\s*jornal\s",
                r"^\s*bom dia\s",
                r"^\s*eptv\s",
                r"^\s*jl1\s",
                r"^\s*df1\s",
                r"^\s*jl2\s",
                r"^\s*jornal anhanguera",
            ]),
            skip_keywords: v(&[
                "vídeos:", "videos:", "ao vivo", "edição", "1ª edição", "2ª edição",
                "programa", "telejornal", "coletânea", "resumo do dia", "agenda cultural",
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Collection window in minutes; items published earlier are stale.
    pub scan_minutes: i64,
    /// Freshness decay constant in hours (smaller = live feed, larger =
    /// historical backfill).
    pub tau_hours: f64,
    /// Fixed dampening for unmodeled legal/compliance risk.
    pub risk_penalty: f64,
    pub novelty_capacity: usize,
    /// Score brand-fit from entity presence only, ignoring the profile.
    pub general_brand_fit: bool,
    pub weights: ScoreWeights,
    pub cutoffs: Cutoffs,
    pub signals: SignalSettings,
    pub ingest: IngestSettings,
    /// Optional keyword-table files; built-in seeds when absent.
    pub brand_profile_path: Option<PathBuf>,
    pub noise_lists_path: Option<PathBuf>,
    pub domain_authority_path: Option<PathBuf>,
    /// Topic vocabulary override for the entity extractor.
    pub topics: Option<Vec<String>>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            scan_minutes: 360,
            tau_hours: 6.0,
            risk_penalty: 0.85,
            novelty_capacity: crate::novelty::DEFAULT_CAPACITY,
            general_brand_fit: false,
            weights: ScoreWeights::default(),
            cutoffs: Cutoffs::default(),
            signals: SignalSettings::default(),
            ingest: IngestSettings::default(),
            brand_profile_path: None,
            noise_lists_path: None,
            domain_authority_path: None,
            topics: None,
        }
    }
}

impl TriageConfig {
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: Self = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path, or `TRIAGE_CONFIG_PATH`, or the default
    /// path; validated defaults when no file exists at the default path.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        if !path.exists() {
            if explicit.is_some() || std::env::var(ENV_CONFIG_PATH).is_ok() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            tracing::debug!("no config file at {}, using defaults", path.display());
            let cfg = Self::default();
            cfg.validate()?;
            return Ok(cfg);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        let cfg = Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("in config {}: {e}", path.display()))?;
        Ok(cfg)
    }

    /// Operator-error checks. Fatal before any data is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.cutoffs.post < self.cutoffs.watch {
            return Err(ConfigError::InvertedCutoffs {
                post: self.cutoffs.post,
                watch: self.cutoffs.watch,
            });
        }
        if self.tau_hours <= 0.0 {
            return Err(ConfigError::NonPositiveTau(self.tau_hours));
        }
        if self.risk_penalty <= 0.0 || self.risk_penalty > 1.0 {
            return Err(ConfigError::RiskPenaltyRange(self.risk_penalty));
        }
        if self.scan_minutes <= 0 {
            return Err(ConfigError::EmptyScanWindow(self.scan_minutes));
        }
        if self.novelty_capacity == 0 {
            return Err(ConfigError::ZeroNoveltyCapacity);
        }
        if self.signals.backend == SignalBackend::Http
            && (self.signals.engagement_url.is_none() || self.signals.trends_url.is_none())
        {
            return Err(ConfigError::MissingHttpEndpoints);
        }
        Ok(())
    }
}
