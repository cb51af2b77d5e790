// src/signals/mock.rs
//! Deterministic test doubles for the signal backends. Values derive from a
//! hash of the query, so repeated runs over the same batch are bit-identical
//! — there is no randomness anywhere in the scoring path.

use super::source::{EngagementRecord, EngagementSource, FetchError, TrendSource};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

const PHRASES: &[&str] = &[
    "mercado reage bem, lucro à vista",
    "cenário de incerteza preocupa investidores",
    "sem grandes novidades no pregão de hoje",
    "alta forte após o anúncio, otimismo geral",
    "risco de queda ainda no radar",
];

fn digest_of(parts: &[String]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p.as_bytes());
        hasher.update(b"|");
    }
    hasher.finalize().into()
}

/// Engagement double: a small synthetic post sample spread over the last
/// six hours, sized and weighted by the query hash.
pub struct MockEngagement {
    now: DateTime<Utc>,
}

impl MockEngagement {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

#[async_trait::async_trait]
impl EngagementSource for MockEngagement {
    async fn fetch(&self, terms: &[String]) -> Result<Vec<EngagementRecord>, FetchError> {
        let d = digest_of(terms);
        let count = (d[0] % 24) as usize;
        let mut records = Vec::with_capacity(count);
        for i in 0..count {
            let b = d[(i + 1) % d.len()];
            records.push(EngagementRecord {
                date: Some(self.now - Duration::minutes((b as i64 * 7) % 360)),
                user: format!("user_{i}"),
                likes: (b as u32) % 90,
                shares: (d[(i + 2) % d.len()] as u32) % 40,
                content: PHRASES[(b as usize) % PHRASES.len()].to_string(),
            });
        }
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "mock-engagement"
    }
}

/// Trends double: a 16-point series whose level and late-window tilt come
/// from the keyword hash.
pub struct MockTrends;

#[async_trait::async_trait]
impl TrendSource for MockTrends {
    async fn interest_over_time(&self, keywords: &[String]) -> Result<Vec<f64>, FetchError> {
        let d = digest_of(keywords);
        let base = (d[0] % 50) as f64 + 10.0;
        let tilt = (d[1] % 41) as f64 - 20.0; // -20..=20 applied to the tail
        let mut series = Vec::with_capacity(16);
        for i in 0..16 {
            let wobble = (d[(i + 2) % d.len()] % 11) as f64 - 5.0;
            let lift = if i >= 12 { tilt } else { 0.0 };
            series.push((base + wobble + lift).clamp(0.0, 100.0));
        }
        Ok(series)
    }

    fn name(&self) -> &'static str {
        "mock-trends"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn mock_engagement_is_deterministic() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let src = MockEngagement::new(now);
        let terms = vec!["selic".to_string(), "juros".to_string()];
        let a = src.fetch(&terms).await.unwrap();
        let b = src.fetch(&terms).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_queries_differ() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let src = MockEngagement::new(now);
        let a = src.fetch(&["selic".to_string()]).await.unwrap();
        let b = src.fetch(&["dólar".to_string()]).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn mock_trends_series_is_bounded() {
        let series = MockTrends
            .interest_over_time(&["selic".to_string()])
            .await
            .unwrap();
        assert_eq!(series.len(), 16);
        assert!(series.iter().all(|p| (0.0..=100.0).contains(p)));
    }
}
