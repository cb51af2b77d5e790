// tests/scoring_batch.rs
//! Batch-level scoring behavior through the public engine API: novelty
//! feedback, noise ordering and the worked Selic scenario.

use chrono::Utc;
use newsroom_triage::authority::DomainAuthority;
use newsroom_triage::brand::BrandProfile;
use newsroom_triage::config::TriageConfig;
use newsroom_triage::decision::Decision;
use newsroom_triage::engine::TriageEngine;
use newsroom_triage::entities::EntityExtractor;
use newsroom_triage::ingest::types::RawItem;
use newsroom_triage::ingest::IngestSummary;
use newsroom_triage::noise::NoiseLists;
use newsroom_triage::signals::source::NullSource;
use std::sync::Arc;

fn zero_signal_engine(config: TriageConfig) -> TriageEngine {
    TriageEngine::with_sources(
        config,
        Arc::new(NullSource),
        Arc::new(NullSource),
        DomainAuthority::default_seed(),
        BrandProfile::default_seed(),
        NoiseLists::default_seed(),
        EntityExtractor::default_seed(),
        None,
    )
    .unwrap()
}

fn raw(title: &str, url: &str) -> RawItem {
    RawItem {
        title: title.to_string(),
        url: url.to_string(),
        source: String::new(),
        published_at: Some(Utc::now()),
        summary: String::new(),
    }
}

#[tokio::test]
async fn second_telling_of_a_story_loses_novelty() {
    let engine = zero_signal_engine(TriageConfig::default());
    let out = engine
        .run_items(
            vec![
                raw("Copom mantém juros no patamar atual", "https://valor.globo.com/a"),
                raw("Copom mantém juros no patamar atual", "https://infomoney.com.br/b"),
                raw("Chuva forte atinge o litoral", "https://g1.globo.com/economia/c"),
            ],
            IngestSummary::default(),
        )
        .await
        .unwrap();

    assert_eq!(out.scores.len(), 3);
    assert!((out.scores[0].novelty - 1.0).abs() < 1e-9);
    assert!(out.scores[1].novelty.abs() < 1e-9);
    // Disjoint vocabulary stays fully novel.
    assert!((out.scores[2].novelty - 1.0).abs() < 1e-9);
    // And the duplicate's total is strictly below the first telling.
    assert!(out.scores[1].total < out.scores[0].total);
}

#[tokio::test]
async fn crime_headline_ranks_strictly_below_clean_twin() {
    let engine = zero_signal_engine(TriageConfig::default());
    let out = engine
        .run_items(
            vec![
                raw("Cidade anuncia novo hospital", "https://valor.globo.com/a"),
                raw("Cidade anuncia novo hospital após homicídio", "https://valor.globo.com/b"),
            ],
            IngestSummary::default(),
        )
        .await
        .unwrap();
    assert!(out.scores[1].total < out.scores[0].total);
}

#[tokio::test]
async fn selic_example_is_reproducible_from_the_formula() {
    let engine = zero_signal_engine(TriageConfig::default());
    let out = engine
        .run_items(
            vec![raw("Selic sobe para 10.5%", "https://valor.globo.com/x?utm=1")],
            IngestSummary::default(),
        )
        .await
        .unwrap();

    let c = &out.clusters[0];
    let sb = &out.scores[0];

    assert!(c.entities.topics.contains("selic"));
    assert!((sb.authority - 0.95).abs() < 1e-9);
    assert!(sb.freshness > 0.99);

    // Zero signals, no noise: total = 100 * Σ(w_i * f_i) * risk.
    let expected = 100.0
        * (0.20 * sb.freshness
            + 0.15 * sb.authority
            + 0.15 * sb.brand_fit
            + 0.10 * sb.novelty
            + 0.10 * sb.sentiment)
        * 0.85;
    assert!((sb.total - expected).abs() < 1e-9);

    // With default cutoffs 70/50 and no social lift this lands in WATCH.
    assert_eq!(sb.decision, Decision::Watch);
}

#[tokio::test]
async fn raising_a_cutoff_never_raises_a_tier() {
    let lenient = zero_signal_engine(TriageConfig::default());
    let mut strict_cfg = TriageConfig::default();
    strict_cfg.cutoffs.post = 95.0;
    strict_cfg.cutoffs.watch = 90.0;
    let strict = zero_signal_engine(strict_cfg);

    let items = vec![raw("Selic sobe para 10.5%", "https://valor.globo.com/x")];
    let a = lenient
        .run_items(items.clone(), IngestSummary::default())
        .await
        .unwrap();
    let b = strict
        .run_items(items, IngestSummary::default())
        .await
        .unwrap();

    let rank = |d: Decision| match d {
        Decision::Drop => 0,
        Decision::Watch => 1,
        Decision::Post => 2,
    };
    assert!(rank(b.scores[0].decision) <= rank(a.scores[0].decision));
}
