// src/signals/source.rs
//! Capability interfaces for external signal backends. Implementations are
//! selected by configuration (never probed at runtime inside business
//! logic); every failure is a typed value the fuser pattern-matches on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One sampled engagement post (like/share counts plus a text snippet used
/// for sentiment).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementRecord {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub shares: u32,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("signal fetch timed out")]
    Timeout,
    /// No backend configured for this capability. Expected in offline runs;
    /// the fuser degrades to the zero record without a warning.
    #[error("no backend configured")]
    Unconfigured,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Engagement backend: returns raw posts matching a derived query.
#[async_trait::async_trait]
pub trait EngagementSource: Send + Sync {
    async fn fetch(&self, terms: &[String]) -> Result<Vec<EngagementRecord>, FetchError>;
    fn name(&self) -> &'static str;
}

/// Interest-over-time backend: returns a series of 0..100 interest points
/// for up to 3 keywords (newest point last).
#[async_trait::async_trait]
pub trait TrendSource: Send + Sync {
    async fn interest_over_time(&self, keywords: &[String]) -> Result<Vec<f64>, FetchError>;
    fn name(&self) -> &'static str;
}

/// Stand-in for an absent backend; always reports `Unconfigured`.
pub struct NullSource;

#[async_trait::async_trait]
impl EngagementSource for NullSource {
    async fn fetch(&self, _terms: &[String]) -> Result<Vec<EngagementRecord>, FetchError> {
        Err(FetchError::Unconfigured)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}

#[async_trait::async_trait]
impl TrendSource for NullSource {
    async fn interest_over_time(&self, _keywords: &[String]) -> Result<Vec<f64>, FetchError> {
        Err(FetchError::Unconfigured)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
