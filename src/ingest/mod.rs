// src/ingest/mod.rs
pub mod file;
pub mod types;

use crate::ingest::types::{ItemProvider, RawItem};
use crate::normalize::{domain_from_url, normalize_text};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use regex::Regex;

/// One-time metrics registration so series show up with descriptions.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("triage_items_total", "Raw items handed over by providers.");
        describe_counter!(
            "triage_items_kept_total",
            "Items kept after validation + filtering."
        );
        describe_counter!(
            "triage_items_skipped_total",
            "Items skipped for a missing required field."
        );
        describe_counter!(
            "triage_items_filtered_total",
            "Items dropped by boilerplate filters or the scan window."
        );
        describe_counter!(
            "triage_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_gauge!("triage_intake_last_run_ts", "Unix ts when intake last ran.");
    });
}

/// Early drop rules for TV-newscast/video boilerplate that never makes a
/// postable story. Patterns anchor on the lowercased title.
#[derive(Debug)]
pub struct SkipFilter {
    patterns: Vec<Regex>,
    keywords: Vec<String>,
}

impl SkipFilter {
    pub fn compile(patterns: &[String], keywords: &[String]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("skip pattern `{p}`")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns: compiled,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
    }

    /// Empty filter that keeps everything.
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        let t = title.to_lowercase();
        self.patterns.iter().any(|re| re.is_match(&t))
            || self.keywords.iter().any(|k| t.contains(k.as_str()))
    }
}

/// Per-batch intake accounting, reported alongside the decision records so a
/// run that degraded is visible instead of silently smaller.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestSummary {
    pub items_total: usize,
    pub kept: usize,
    /// Missing title or url (input contract violation; item skipped).
    pub missing_field: usize,
    /// Dropped by the boilerplate skip filter.
    pub boilerplate: usize,
    /// Published before the scan window.
    pub stale: usize,
    pub provider_errors: usize,
}

/// Normalize, validate and filter raw items. Single pass, order preserving.
///
/// Items without a parseable timestamp get `now` (they just arrived, so the
/// feed time is the best guess); items older than `window` are dropped.
pub fn prepare_items(
    now: DateTime<Utc>,
    raw_items: Vec<RawItem>,
    filter: &SkipFilter,
    window: Duration,
) -> (Vec<RawItem>, IngestSummary) {
    let cutoff = now - window;
    let mut summary = IngestSummary {
        items_total: raw_items.len(),
        ..Default::default()
    };
    let mut kept = Vec::with_capacity(raw_items.len());

    for mut item in raw_items {
        item.title = normalize_text(&item.title);
        item.summary = normalize_text(&item.summary);

        if item.title.is_empty() || item.url.trim().is_empty() {
            summary.missing_field += 1;
            tracing::debug!(url = %item.url, "item skipped: missing title or url");
            continue;
        }
        if filter.matches(&item.title) {
            summary.boilerplate += 1;
            continue;
        }

        let published = match item.published_at {
            Some(ts) => ts,
            None => {
                tracing::debug!(url = %item.url, "item without timestamp, assuming now");
                now
            }
        };
        if published < cutoff {
            summary.stale += 1;
            continue;
        }
        item.published_at = Some(published);

        if item.source.trim().is_empty() {
            let host = domain_from_url(&item.url);
            item.source = if host.is_empty() { "unknown".to_string() } else { host };
        }

        kept.push(item);
    }

    summary.kept = kept.len();
    (kept, summary)
}

/// Collect from all providers and run intake once. A failing provider is
/// logged and counted, never fatal to the batch.
pub async fn run_once(
    providers: &[Box<dyn ItemProvider>],
    filter: &SkipFilter,
    window: Duration,
) -> (Vec<RawItem>, IngestSummary) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    let mut provider_errors = 0usize;
    for p in providers {
        match p.fetch_items().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("triage_provider_errors_total").increment(1);
                provider_errors += 1;
            }
        }
    }

    let now = Utc::now();
    let (kept, mut summary) = prepare_items(now, raw, filter, window);
    summary.provider_errors = provider_errors;

    counter!("triage_items_total").increment(summary.items_total as u64);
    counter!("triage_items_kept_total").increment(summary.kept as u64);
    counter!("triage_items_skipped_total").increment(summary.missing_field as u64);
    counter!("triage_items_filtered_total")
        .increment((summary.boilerplate + summary.stale) as u64);
    gauge!("triage_intake_last_run_ts").set(now.timestamp() as f64);

    (kept, summary)
}
