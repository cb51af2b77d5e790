// src/signals/mod.rs
//! Signal fusion: per-cluster engagement + trend features, normalized to
//! [0,1] and tolerant of missing or degraded backends. A failed fetch
//! becomes the documented zero record, never a batch error.

pub mod http;
pub mod mock;
pub mod query;
pub mod recorded;
pub mod source;
pub mod trends;

use crate::cluster::Cluster;
use crate::sentiment::{sample_stats, SentimentAnalyzer};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use self::source::{EngagementRecord, EngagementSource, FetchError, TrendSource};
use std::sync::Arc;
use std::time::Duration;

/// Engagement sample retained for the output tables.
const SAMPLE_CAP: usize = 10;
/// Likes+shares normalization divisor (per-post expected ceiling).
const ENGAGEMENT_NORM: f64 = 100.0;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "triage_signal_errors_total",
            "Signal fetches degraded to the zero record."
        );
    });
}

/// Fused social/trend features for one cluster. One-to-one with the cluster
/// for a given batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSignals {
    pub cluster_id: String,
    pub volume: u64,
    pub engagement_rate: f64,
    /// Fused velocity: engagement-weighted 0.7, trends 0.3.
    pub velocity: f64,
    pub sentiment_mean: f64,
    pub sentiment_var: f64,
    pub trends_interest: f64,
    pub trends_velocity: f64,
    #[serde(default)]
    pub sample: Vec<EngagementRecord>,
    #[serde(default)]
    pub trends_topics: Vec<String>,
}

impl SocialSignals {
    /// The neutral fallback: every feature at zero. Deliberately indistinct
    /// from "nobody engaged" so degraded batches stay comparable.
    pub fn zero(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            volume: 0,
            engagement_rate: 0.0,
            velocity: 0.0,
            sentiment_mean: 0.0,
            sentiment_var: 0.0,
            trends_interest: 0.0,
            trends_velocity: 0.0,
            sample: Vec::new(),
            trends_topics: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct EngagementMetrics {
    volume: u64,
    engagement_rate: f64,
    velocity: f64,
    sentiment_mean: f64,
    sentiment_var: f64,
    sample: Vec<EngagementRecord>,
}

/// Aggregate raw engagement posts into normalized features.
///
/// Velocity is the share of the last-6h posts that landed in the last 2h:
/// 1.0 means everything is brand new, 0.0 means the wave already passed.
fn engagement_metrics(
    records: Vec<EngagementRecord>,
    now: DateTime<Utc>,
    analyzer: &SentimentAnalyzer,
) -> EngagementMetrics {
    if records.is_empty() {
        return EngagementMetrics::default();
    }

    let volume = records.len() as u64;
    let interactions: u64 = records
        .iter()
        .map(|r| r.likes as u64 + r.shares as u64)
        .sum();
    let engagement_rate = interactions as f64 / (records.len() as f64 * ENGAGEMENT_NORM);

    let mut last2 = 0usize;
    let mut last6 = 0usize;
    for r in &records {
        if let Some(ts) = r.date {
            let age = (now - ts).num_seconds();
            if (0..=2 * 3600).contains(&age) {
                last2 += 1;
            }
            if (0..=6 * 3600).contains(&age) {
                last6 += 1;
            }
        }
    }
    let velocity = if last6 == 0 {
        0.0
    } else {
        (last2 as f64 / last6 as f64).clamp(0.0, 1.0)
    };

    let polarities: Vec<f64> = records.iter().map(|r| analyzer.polarity(&r.content)).collect();
    let (sentiment_mean, sentiment_var) = sample_stats(&polarities);

    let mut sample: Vec<EngagementRecord> = records.into_iter().take(SAMPLE_CAP).collect();
    for r in &mut sample {
        if r.content.chars().count() > 200 {
            r.content = r.content.chars().take(200).collect();
        }
    }

    EngagementMetrics {
        volume,
        engagement_rate,
        velocity,
        sentiment_mean,
        sentiment_var,
        sample,
    }
}

/// Fuses one cluster's signals from the configured backends.
pub struct SignalFuser {
    engagement: Arc<dyn EngagementSource>,
    trends: Arc<dyn TrendSource>,
    analyzer: SentimentAnalyzer,
    fetch_timeout: Duration,
}

impl SignalFuser {
    pub fn new(
        engagement: Arc<dyn EngagementSource>,
        trends: Arc<dyn TrendSource>,
        fetch_timeout: Duration,
    ) -> Self {
        ensure_metrics_described();
        Self {
            engagement,
            trends,
            analyzer: SentimentAnalyzer::new(),
            fetch_timeout,
        }
    }

    /// Fetch + fuse. Never fails: each backend degrades independently to its
    /// zero contribution, and a timeout behaves exactly like a fetch error.
    pub async fn fuse(&self, cluster: &Cluster, now: DateTime<Utc>) -> SocialSignals {
        let terms = query::engagement_terms(cluster);
        let kws = query::trend_keywords(cluster);

        let eng = match self.bounded(self.engagement.fetch(&terms)).await {
            Ok(records) => engagement_metrics(records, now, &self.analyzer),
            Err(e) => {
                self.note_degraded(&cluster.id, "engagement", &e);
                EngagementMetrics::default()
            }
        };

        let (trends_interest, trends_velocity) =
            match self.bounded(self.trends.interest_over_time(&kws)).await {
                Ok(series) => trends::trend_metrics(&series),
                Err(e) => {
                    self.note_degraded(&cluster.id, "trends", &e);
                    (0.0, 0.0)
                }
            };

        let velocity = (0.7 * eng.velocity + 0.3 * trends_velocity).clamp(0.0, 1.0);

        SocialSignals {
            cluster_id: cluster.id.clone(),
            volume: eng.volume,
            engagement_rate: eng.engagement_rate,
            velocity,
            sentiment_mean: eng.sentiment_mean,
            sentiment_var: eng.sentiment_var,
            trends_interest,
            trends_velocity,
            sample: eng.sample,
            trends_topics: kws,
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(FetchError::Timeout),
        }
    }

    fn note_degraded(&self, cluster_id: &str, kind: &'static str, err: &FetchError) {
        match err {
            FetchError::Unconfigured => {
                tracing::debug!(cluster = %cluster_id, kind, "no backend configured, zero signal");
            }
            _ => {
                tracing::warn!(cluster = %cluster_id, kind, error = %err, "signal fetch degraded to zero");
                counter!("triage_signal_errors_total").increment(1);
            }
        }
    }
}
