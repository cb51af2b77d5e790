// src/engine.rs
//! # Batch Engine
//! Orchestrates one triage run: intake → clustering → signal fan-out →
//! sequential scoring against the novelty memory.
//!
//! Signal fetches run concurrently under a bounded semaphore with a fixed
//! inter-request delay (rate-limit courtesy) and a per-fetch timeout.
//! Scoring stays strictly sequential in cluster order so every cluster sees
//! the memory state left by the previous one — that is what keeps duplicate
//! detection deterministic. Dropping the run future between clusters aborts
//! the batch cleanly; a cluster is never emitted half-scored.

use crate::cluster::{make_clusters, Cluster};
use crate::config::{SignalBackend, TriageConfig};
use crate::entities::EntityExtractor;
use crate::ingest::types::{ItemProvider, RawItem};
use crate::ingest::{IngestSummary, SkipFilter};
use crate::novelty::{headline_tokens, NoveltyMemory};
use crate::score::{ScoreBreakdown, Scorer};
use crate::signals::recorded::RecordedSignals;
use crate::signals::source::{EngagementSource, NullSource, TrendSource};
use crate::signals::{SignalFuser, SocialSignals};
use crate::{authority::DomainAuthority, brand::BrandProfile, noise::NoiseLists};
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Everything one run produces; consumed by the report writer and tests.
#[derive(Debug)]
pub struct BatchOutput {
    pub clusters: Vec<Cluster>,
    pub signals: Vec<SocialSignals>,
    pub scores: Vec<ScoreBreakdown>,
    pub summary: IngestSummary,
}

pub struct TriageEngine {
    config: TriageConfig,
    extractor: EntityExtractor,
    scorer: Scorer,
    fuser: Arc<SignalFuser>,
    recorded: Option<RecordedSignals>,
    skip_filter: SkipFilter,
}

impl TriageEngine {
    /// Build the engine from validated configuration: load keyword tables,
    /// pick signal backends, compile filters. Any error here is fatal —
    /// nothing has been scored yet.
    pub fn from_config(config: TriageConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let authority = match &config.domain_authority_path {
            Some(p) => DomainAuthority::load_from_file(p)?,
            None => DomainAuthority::default_seed(),
        };
        let brand = match &config.brand_profile_path {
            Some(p) => BrandProfile::load_from_file(p)?,
            None => BrandProfile::default_seed(),
        };
        let noise = match &config.noise_lists_path {
            Some(p) => NoiseLists::load_from_file(p)?,
            None => NoiseLists::default_seed(),
        };
        let extractor = match &config.topics {
            Some(topics) => EntityExtractor::new(topics.iter().cloned()),
            None => EntityExtractor::default_seed(),
        };

        let timeout = Duration::from_secs(config.signals.fetch_timeout_secs);
        let (engagement, trends): (Arc<dyn EngagementSource>, Arc<dyn TrendSource>) =
            match config.signals.backend {
                SignalBackend::None => (Arc::new(NullSource), Arc::new(NullSource)),
                SignalBackend::Mock => (
                    Arc::new(crate::signals::mock::MockEngagement::new(Utc::now())),
                    Arc::new(crate::signals::mock::MockTrends),
                ),
                SignalBackend::Http => (
                    Arc::new(crate::signals::http::HttpEngagement::new(
                        config.signals.engagement_url.clone().unwrap_or_default(),
                        timeout,
                    )),
                    Arc::new(crate::signals::http::HttpTrends::new(
                        config.signals.trends_url.clone().unwrap_or_default(),
                        timeout,
                    )),
                ),
            };

        let recorded = match &config.signals.recorded_path {
            Some(p) => {
                let rec = RecordedSignals::load(p)?;
                tracing::info!(records = rec.len(), "recorded signals loaded");
                Some(rec)
            }
            None => None,
        };

        Self::with_sources(config, engagement, trends, authority, brand, noise, extractor, recorded)
    }

    /// Wiring-level constructor used by `from_config` and by tests that
    /// inject their own backends.
    #[allow(clippy::too_many_arguments)]
    pub fn with_sources(
        config: TriageConfig,
        engagement: Arc<dyn EngagementSource>,
        trends: Arc<dyn TrendSource>,
        authority: DomainAuthority,
        brand: BrandProfile,
        noise: NoiseLists,
        extractor: EntityExtractor,
        recorded: Option<RecordedSignals>,
    ) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let skip_filter = SkipFilter::compile(
            &config.ingest.skip_patterns,
            &config.ingest.skip_keywords,
        )
        .context("compiling skip filter")?;
        let timeout = Duration::from_secs(config.signals.fetch_timeout_secs);
        let scorer = Scorer::new(&config, authority, brand, noise);
        Ok(Self {
            fuser: Arc::new(SignalFuser::new(engagement, trends, timeout)),
            config,
            extractor,
            scorer,
            recorded,
            skip_filter,
        })
    }

    /// Collect items from providers and run the full batch.
    pub async fn run(&self, providers: &[Box<dyn ItemProvider>]) -> Result<BatchOutput> {
        let window = ChronoDuration::minutes(self.config.scan_minutes);
        let (items, summary) = crate::ingest::run_once(providers, &self.skip_filter, window).await;
        tracing::info!(
            kept = summary.kept,
            skipped = summary.missing_field,
            filtered = summary.boilerplate + summary.stale,
            "intake finished"
        );
        self.run_items(items, summary).await
    }

    /// Run clustering, signal fusion and scoring over already-ingested items.
    pub async fn run_items(
        &self,
        items: Vec<RawItem>,
        summary: IngestSummary,
    ) -> Result<BatchOutput> {
        let now = Utc::now();
        let clusters = make_clusters(&items, &self.extractor);
        tracing::info!(items = items.len(), clusters = clusters.len(), "clustering finished");

        let signals = self.collect_signals(&clusters).await;

        // Sequential scoring in cluster order; the novelty memory is updated
        // after each cluster so near-duplicates later in the batch lose
        // their novelty component.
        let mut memory = NoveltyMemory::with_capacity(self.config.novelty_capacity);
        let mut scores = Vec::with_capacity(clusters.len());
        for (cluster, sig) in clusters.iter().zip(&signals) {
            let breakdown = self.scorer.score(cluster, sig, &memory, now);
            memory.push(headline_tokens(&cluster.headline));
            scores.push(breakdown);
        }
        tracing::info!(scored = scores.len(), "scoring finished");

        Ok(BatchOutput {
            clusters,
            signals,
            scores,
            summary,
        })
    }

    /// Fetch signals for every cluster, bounded and rate-limited. Recorded
    /// signals short-circuit the fetch; order follows the cluster list.
    async fn collect_signals(&self, clusters: &[Cluster]) -> Vec<SocialSignals> {
        let now = Utc::now();
        let semaphore = Arc::new(Semaphore::new(self.config.signals.concurrency.max(1)));
        let delay = Duration::from_millis(self.config.signals.inter_request_delay_ms);

        let mut out: Vec<Option<SocialSignals>> = vec![None; clusters.len()];
        let mut set: JoinSet<(usize, SocialSignals)> = JoinSet::new();

        for (idx, cluster) in clusters.iter().enumerate() {
            if let Some(rec) = self
                .recorded
                .as_ref()
                .and_then(|r| r.get(&cluster.id))
            {
                out[idx] = Some(rec.clone());
                continue;
            }

            let fuser = Arc::clone(&self.fuser);
            let semaphore = Arc::clone(&semaphore);
            let cluster = cluster.clone();
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore open");
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let sig = fuser.fuse(&cluster, now).await;
                (idx, sig)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, sig)) => out[idx] = Some(sig),
                Err(e) => tracing::warn!(error = ?e, "signal task failed"),
            }
        }

        // A crashed task leaves its slot empty; fill with the zero record so
        // the batch still completes.
        out.into_iter()
            .enumerate()
            .map(|(idx, sig)| sig.unwrap_or_else(|| SocialSignals::zero(clusters[idx].id.clone())))
            .collect()
    }
}
