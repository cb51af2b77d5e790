// src/cluster.rs
//! Fingerprint-based deduplication: raw items sharing a fingerprint collapse
//! into one cluster that represents the underlying story.

use crate::entities::{Entities, EntityExtractor};
use crate::ingest::types::RawItem;
use crate::normalize::canonical_url;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Title prefix length for the fingerprint. Long enough to merge restated
/// headlines, short enough not to false-merge on generic URLs.
const TITLE_PREFIX_CHARS: usize = 140;

/// A set of raw items judged to be the same story.
///
/// `urls`/`sources`/`titles` keep every member value in input order,
/// duplicates included; consumers dedupe for display. The representative
/// headline and timestamp come from the most recently published member.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub id: String,
    pub headline: String,
    pub published_at: DateTime<Utc>,
    pub urls: Vec<String>,
    pub sources: Vec<String>,
    pub titles: Vec<String>,
    pub entities: Entities,
}

/// Deterministic dedup key: canonical URL + truncated title + source.
pub fn fingerprint(item: &RawItem) -> String {
    let title_prefix: String = item.title.chars().take(TITLE_PREFIX_CHARS).collect();
    let canon = format!("{}|{}|{}", canonical_url(&item.url), title_prefix, item.source);

    let mut hasher = Sha256::new();
    hasher.update(canon.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(32);
    for b in digest.iter().take(16) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Group items by fingerprint into clusters. Cluster order follows the first
/// appearance of each fingerprint; empty input yields empty output.
///
/// Items reaching this point always carry a timestamp (intake guarantees it);
/// a missing one is treated as the epoch so it never wins representative.
pub fn make_clusters(items: &[RawItem], extractor: &EntityExtractor) -> Vec<Cluster> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<&RawItem>> = HashMap::new();

    for item in items {
        let fp = fingerprint(item);
        if !buckets.contains_key(&fp) {
            order.push(fp.clone());
            buckets.insert(fp.clone(), Vec::new());
        }
        buckets.get_mut(&fp).expect("bucket just ensured").push(item);
    }

    let mut clusters = Vec::with_capacity(order.len());
    for fp in order {
        let group = &buckets[&fp];

        // Latest published member wins; ties keep the earlier input position.
        let mut chosen = group[0];
        for &candidate in &group[1..] {
            if ts(candidate) > ts(chosen) {
                chosen = candidate;
            }
        }

        let joined_titles = group
            .iter()
            .map(|a| a.title.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        clusters.push(Cluster {
            id: fp,
            headline: chosen.title.clone(),
            published_at: ts(chosen),
            urls: group.iter().map(|a| a.url.clone()).collect(),
            sources: group.iter().map(|a| a.source.clone()).collect(),
            titles: group.iter().map(|a| a.title.clone()).collect(),
            entities: extractor.extract(&joined_titles),
        });
    }
    clusters
}

fn ts(item: &RawItem) -> DateTime<Utc> {
    item.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}
