// src/score.rs
//! Composite scoring: weighted fusion of freshness, authority, social
//! velocity, engagement, brand-fit, novelty and sentiment, dampened by the
//! fixed risk multiplier and the noise penalty, then thresholded into the
//! editorial decision.
//!
//! Pure and deterministic: for fixed inputs, weights and novelty memory the
//! total is bit-identical across runs. All tables are injected at
//! construction.

use crate::authority::DomainAuthority;
use crate::brand::{general_fit, BrandProfile};
use crate::cluster::Cluster;
use crate::config::{Cutoffs, ScoreWeights, TriageConfig};
use crate::decision::{classify, Decision};
use crate::noise::NoiseLists;
use crate::normalize::{domain_from_url, hours_since};
use crate::novelty::{headline_tokens, NoveltyMemory};
use crate::signals::SocialSignals;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Share of the total removed at full noise (`total *= 1 - 0.4 * penalty`).
const NOISE_WEIGHT: f64 = 0.4;

/// Per-cluster score components and verdict. Derived, recomputed every run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub cluster_id: String,
    pub freshness: f64,
    pub authority: f64,
    pub social_velocity: f64,
    pub engagement: f64,
    pub sentiment: f64,
    pub brand_fit: f64,
    pub novelty: f64,
    pub risk_penalty: f64,
    pub total: f64,
    pub decision: Decision,
}

pub struct Scorer {
    weights: ScoreWeights,
    cutoffs: Cutoffs,
    tau_hours: f64,
    risk_penalty: f64,
    general_brand_fit: bool,
    authority: DomainAuthority,
    brand: BrandProfile,
    noise: NoiseLists,
}

impl Scorer {
    pub fn new(
        config: &TriageConfig,
        authority: DomainAuthority,
        brand: BrandProfile,
        noise: NoiseLists,
    ) -> Self {
        Self {
            weights: config.weights,
            cutoffs: config.cutoffs,
            tau_hours: config.tau_hours,
            risk_penalty: config.risk_penalty,
            general_brand_fit: config.general_brand_fit,
            authority,
            brand,
            noise,
        }
    }

    /// Exponential decay so very recent items dominate without a hard cliff.
    pub fn freshness(&self, hours: f64) -> f64 {
        (-hours / self.tau_hours).exp()
    }

    /// Score one cluster against a read-only snapshot of the novelty memory.
    /// No error conditions: every missing input already degraded upstream to
    /// a neutral value.
    pub fn score(
        &self,
        cluster: &Cluster,
        signals: &SocialSignals,
        memory: &NoveltyMemory,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        let hours = hours_since(cluster.published_at, now);
        let freshness = self.freshness(hours);

        let first_url = cluster.urls.first().map(String::as_str).unwrap_or("");
        let host = domain_from_url(first_url);
        let authority = self.authority.weight_for(&host);

        let social_velocity = signals.velocity.clamp(0.0, 1.0);
        let engagement = signals.engagement_rate.clamp(0.0, 0.5);
        let sentiment = (1.0 - signals.sentiment_mean.abs()).clamp(0.0, 1.0);

        let brand_fit = if self.general_brand_fit {
            general_fit(&cluster.entities)
        } else {
            self.brand.fit_score(&cluster.headline, &cluster.entities)
        };

        let novelty = memory.novelty_of(&headline_tokens(&cluster.headline));

        let w = &self.weights;
        let base = w.freshness * freshness
            + w.authority * authority
            + w.social_velocity * social_velocity
            + w.engagement * engagement
            + w.brand_fit * brand_fit
            + w.novelty * novelty
            + w.sentiment * sentiment;

        let noise = self.noise.penalty(&cluster.headline, &host, first_url);
        let total = 100.0 * base * self.risk_penalty * (1.0 - NOISE_WEIGHT * noise);

        if noise > 0.0 {
            tracing::debug!(cluster = %cluster.id, noise, "noise penalty applied");
        }

        let decision = classify(total, self.cutoffs.post, self.cutoffs.watch);

        ScoreBreakdown {
            cluster_id: cluster.id.clone(),
            freshness,
            authority,
            social_velocity,
            engagement,
            sentiment,
            brand_fit,
            novelty,
            risk_penalty: self.risk_penalty,
            total,
            decision,
        }
    }
}
