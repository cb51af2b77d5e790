// src/signals/recorded.rs
//! Pre-existing signal records, keyed by cluster id, loaded from a JSON
//! file. Used when a real API client (or an earlier run) already produced
//! signals in the `SocialSignals` shape; clusters without a record fall
//! through to the live fuser.

use super::SocialSignals;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct RecordedSignals {
    by_cluster: HashMap<String, SocialSignals>,
}

impl RecordedSignals {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading recorded signals from {}", path.display()))?;
        let records: Vec<SocialSignals> = serde_json::from_str(&content)
            .with_context(|| format!("parsing recorded signals from {}", path.display()))?;
        let by_cluster = records
            .into_iter()
            .map(|s| (s.cluster_id.clone(), s))
            .collect();
        Ok(Self { by_cluster })
    }

    pub fn get(&self, cluster_id: &str) -> Option<&SocialSignals> {
        self.by_cluster.get(cluster_id)
    }

    pub fn len(&self) -> usize {
        self.by_cluster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cluster.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_records_and_looks_up_by_cluster() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[{{"cluster_id": "abc", "volume": 42, "engagement_rate": 0.12,
                 "velocity": 0.8, "sentiment_mean": 0.1, "sentiment_var": 0.02,
                 "trends_interest": 0.3, "trends_velocity": 0.6}}]"#
        )
        .unwrap();

        let rec = RecordedSignals::load(f.path()).unwrap();
        assert_eq!(rec.len(), 1);
        let s = rec.get("abc").unwrap();
        assert_eq!(s.volume, 42);
        assert!(rec.get("missing").is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(RecordedSignals::load(f.path()).is_err());
    }
}
