// tests/pipeline_smoke.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use newsroom_triage::config::{SignalBackend, TriageConfig};
use newsroom_triage::engine::TriageEngine;
use newsroom_triage::ingest::types::{ItemProvider, RawItem};
use newsroom_triage::report;

struct MockProvider;

#[async_trait]
impl ItemProvider for MockProvider {
    async fn fetch_items(&self) -> Result<Vec<RawItem>> {
        let item = |title: &str, url: &str| RawItem {
            title: title.to_string(),
            url: url.to_string(),
            source: String::new(),
            published_at: Some(Utc::now()),
            summary: String::new(),
        };
        Ok(vec![
            item("Selic sobe para 10.5%", "https://valor.globo.com/selic?utm=1"),
            item("Selic sobe para 10.5%", "https://valor.globo.com/selic"),
            item("D&oacute;lar recua com exterior", "https://www.infomoney.com.br/dolar"),
            item("", "https://g1.globo.com/sem-titulo"),
            item("Vídeos: melhores momentos da rodada", "https://g1.globo.com/videos"),
        ])
    }
    fn name(&self) -> &'static str {
        "MockProvider"
    }
}

fn engine() -> TriageEngine {
    let mut config = TriageConfig::default();
    config.signals.backend = SignalBackend::Mock;
    TriageEngine::from_config(config).unwrap()
}

#[tokio::test]
async fn smoke_pipeline_runs_and_outputs() {
    let providers: Vec<Box<dyn ItemProvider>> = vec![Box::new(MockProvider)];
    let out = engine().run(&providers).await.unwrap();

    // utm variant merged with its twin; empty title and boilerplate dropped.
    assert_eq!(out.clusters.len(), 2);
    assert_eq!(out.summary.missing_field, 1);
    assert_eq!(out.summary.boilerplate, 1);
    assert_eq!(out.summary.kept, 3);

    // HTML entities decoded at intake.
    assert!(out.clusters.iter().any(|c| c.headline.starts_with("Dólar")));

    // One signal record and one score per cluster, aligned by id.
    assert_eq!(out.signals.len(), out.clusters.len());
    assert_eq!(out.scores.len(), out.clusters.len());
    for (c, s) in out.clusters.iter().zip(&out.signals) {
        assert_eq!(c.id, s.cluster_id);
    }
}

#[tokio::test]
async fn outputs_are_written_and_sorted() {
    let providers: Vec<Box<dyn ItemProvider>> = vec![Box::new(MockProvider)];
    let out = engine().run(&providers).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    report::write_outputs(dir.path(), &out).unwrap();

    let decisions = std::fs::read_to_string(dir.path().join("decisions.csv")).unwrap();
    let totals: Vec<f64> = decisions
        .lines()
        .skip(1)
        .map(|l| l.split(',').nth(9).unwrap().parse().unwrap())
        .collect();
    assert!(totals.windows(2).all(|w| w[0] >= w[1]), "not sorted: {totals:?}");

    let raw = std::fs::read_to_string(dir.path().join("raw.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["summary"]["kept"], serde_json::json!(3));
}

#[tokio::test]
async fn failing_provider_does_not_abort_the_batch() {
    struct Broken;
    #[async_trait]
    impl ItemProvider for Broken {
        async fn fetch_items(&self) -> Result<Vec<RawItem>> {
            anyhow::bail!("feed unreachable")
        }
        fn name(&self) -> &'static str {
            "Broken"
        }
    }

    let providers: Vec<Box<dyn ItemProvider>> = vec![Box::new(Broken), Box::new(MockProvider)];
    let out = engine().run(&providers).await.unwrap();
    assert_eq!(out.summary.provider_errors, 1);
    assert_eq!(out.clusters.len(), 2);
}
