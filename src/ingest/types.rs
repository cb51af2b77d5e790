// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One raw article as handed over by a feed collaborator. Immutable once read.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub url: String,
    /// Feed host, e.g. "valor.globo.com". Filled from the URL when missing.
    #[serde(default)]
    pub source: String,
    /// `None` means the feed carried no usable timestamp; intake substitutes
    /// the batch reference time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: String,
}

/// Hand-off point for feed collectors (RSS poller, dump reader, test fixture).
/// Fetching itself lives outside the core; the pipeline only consumes items.
#[async_trait::async_trait]
pub trait ItemProvider: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<RawItem>>;
    fn name(&self) -> &'static str;
}
