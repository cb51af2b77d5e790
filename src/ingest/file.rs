// src/ingest/file.rs
//! File-backed item provider: reads a JSON array of raw items, the standard
//! hand-off format from the feed collectors.

use crate::ingest::types::{ItemProvider, RawItem};
use crate::normalize::parse_timestamp;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Wire shape of one item in the dump. `published_at` stays a free-form
/// string here; parsing is best-effort and failure maps to `None`.
#[derive(Debug, serde::Deserialize)]
struct WireItem {
    title: String,
    url: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    summary: String,
}

pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl ItemProvider for FileProvider {
    async fn fetch_items(&self) -> Result<Vec<RawItem>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading items from {}", self.path.display()))?;
        let wire: Vec<WireItem> = serde_json::from_str(&content)
            .with_context(|| format!("parsing items from {}", self.path.display()))?;
        Ok(wire
            .into_iter()
            .map(|w| RawItem {
                title: w.title,
                url: w.url,
                source: w.source,
                published_at: parse_timestamp(&w.published_at),
                summary: w.summary,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "FileProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_items_and_parses_dates_best_effort() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[
  {{"title": "Selic sobe para 10.5%", "url": "https://valor.globo.com/x?utm=1",
    "source": "valor.globo.com", "published_at": "2025-01-01T10:00:00Z"}},
  {{"title": "Sem data", "url": "https://a.com/y", "published_at": "???"}}
]"#
        )
        .unwrap();

        let provider = FileProvider::new(f.path());
        let items = provider.fetch_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].published_at.is_some());
        assert!(items[1].published_at.is_none());
        assert_eq!(items[1].summary, "");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let provider = FileProvider::new("definitely/not/here.json");
        assert!(provider.fetch_items().await.is_err());
    }
}
