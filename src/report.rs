// src/report.rs
//! Output tables for downstream collaborators (dashboards, labeling UI,
//! content generators): three CSVs plus a full JSON dump. Intermediate
//! factors are rounded to 4 decimals, totals to 2; decisions are sorted by
//! total, best first.

use crate::engine::BatchOutput;
use crate::score::ScoreBreakdown;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// CSV field quoting: quote when the value contains a delimiter, quote or
/// newline; embedded quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn clusters_csv(output: &BatchOutput) -> String {
    let mut s = String::new();
    s.push_str("cluster_id,headline,published_at,urls,sources,tickers,topics\n");
    for c in &output.clusters {
        let row = csv_row(&[
            c.id.clone(),
            c.headline.clone(),
            c.published_at.to_rfc3339(),
            c.urls.join(" | "),
            c.sources.join(" | "),
            c.entities.tickers.iter().cloned().collect::<Vec<_>>().join(" "),
            c.entities.topics.iter().cloned().collect::<Vec<_>>().join(" "),
        ]);
        s.push_str(&row);
        s.push('\n');
    }
    s
}

pub fn signals_csv(output: &BatchOutput) -> String {
    let mut s = String::new();
    s.push_str(
        "cluster_id,volume,engagement_rate,velocity,sentiment_mean,sentiment_var,\
         trends_interest,trends_velocity,trends_topics,sample_users\n",
    );
    for sig in &output.signals {
        let users: BTreeSet<&str> = sig
            .sample
            .iter()
            .map(|r| r.user.as_str())
            .filter(|u| !u.is_empty())
            .collect();
        let row = csv_row(&[
            sig.cluster_id.clone(),
            sig.volume.to_string(),
            format!("{:.4}", sig.engagement_rate),
            format!("{:.4}", sig.velocity),
            format!("{:.4}", sig.sentiment_mean),
            format!("{:.4}", sig.sentiment_var),
            format!("{:.4}", sig.trends_interest),
            format!("{:.4}", sig.trends_velocity),
            sig.trends_topics.join(" | "),
            users.into_iter().collect::<Vec<_>>().join(" | "),
        ]);
        s.push_str(&row);
        s.push('\n');
    }
    s
}

/// Decision rows sorted by total, best first. Ordering is stable for equal
/// totals (input order), which keeps reruns diffable.
pub fn decisions_csv(output: &BatchOutput) -> String {
    let mut sorted: Vec<&ScoreBreakdown> = output.scores.iter().collect();
    sorted.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    let mut s = String::new();
    s.push_str(
        "cluster_id,freshness,authority,social_velocity,engagement,sentiment,\
         brand_fit,novelty,risk_penalty,total,decision\n",
    );
    for sb in sorted {
        let row = csv_row(&[
            sb.cluster_id.clone(),
            format!("{:.4}", sb.freshness),
            format!("{:.4}", sb.authority),
            format!("{:.4}", sb.social_velocity),
            format!("{:.4}", sb.engagement),
            format!("{:.4}", sb.sentiment),
            format!("{:.4}", sb.brand_fit),
            format!("{:.4}", sb.novelty),
            format!("{:.4}", sb.risk_penalty),
            format!("{:.2}", sb.total),
            sb.decision.to_string(),
        ]);
        s.push_str(&row);
        s.push('\n');
    }
    s
}

/// Full dump for debugging and the labeling dataset builder.
pub fn raw_json(output: &BatchOutput) -> Result<String> {
    let value = serde_json::json!({
        "clusters": output.clusters,
        "socials": output.signals,
        "scores": output.scores,
        "summary": output.summary,
    });
    serde_json::to_string_pretty(&value).context("serializing raw dump")
}

/// Write all four artifacts into `out_dir`, creating it if needed.
pub fn write_outputs<P: AsRef<Path>>(out_dir: P, output: &BatchOutput) -> Result<()> {
    let dir = out_dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    fs::write(dir.join("clusters.csv"), clusters_csv(output))?;
    fs::write(dir.join("social_signals.csv"), signals_csv(output))?;
    fs::write(dir.join("decisions.csv"), decisions_csv(output))?;
    fs::write(dir.join("raw.json"), raw_json(output)?)?;

    tracing::info!(dir = %dir.display(), "batch outputs written");
    Ok(())
}

/// Compact console table of the best-scored clusters.
pub fn render_top(output: &BatchOutput, top: usize) -> String {
    let mut sorted: Vec<(&ScoreBreakdown, &str)> = output
        .scores
        .iter()
        .map(|sb| {
            let headline = output
                .clusters
                .iter()
                .find(|c| c.id == sb.cluster_id)
                .map(|c| c.headline.as_str())
                .unwrap_or("");
            (sb, headline)
        })
        .collect();
    sorted.sort_by(|a, b| b.0.total.partial_cmp(&a.0.total).unwrap_or(std::cmp::Ordering::Equal));

    let mut s = String::new();
    let _ = writeln!(s, "{:>7}  {:<6}  headline", "total", "tier");
    for (sb, headline) in sorted.into_iter().take(top) {
        let mut h = headline.to_string();
        if h.chars().count() > 80 {
            h = h.chars().take(80).collect();
        }
        let _ = writeln!(s, "{:>7.2}  {:<6}  {}", sb.total, sb.decision.as_str(), h);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;
    use crate::decision::Decision;
    use crate::entities::EntityExtractor;
    use crate::ingest::IngestSummary;
    use crate::signals::SocialSignals;
    use chrono::{TimeZone, Utc};

    fn output() -> BatchOutput {
        let headline = "Selic sobe, mercado reage";
        let cluster = Cluster {
            id: "c1".to_string(),
            headline: headline.to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            urls: vec!["https://valor.globo.com/x".to_string()],
            sources: vec!["valor.globo.com".to_string()],
            titles: vec![headline.to_string()],
            entities: EntityExtractor::default_seed().extract(headline),
        };
        let low = ScoreBreakdown {
            cluster_id: "c1".to_string(),
            freshness: 0.123456,
            authority: 0.95,
            social_velocity: 0.0,
            engagement: 0.0,
            sentiment: 1.0,
            brand_fit: 0.65,
            novelty: 1.0,
            risk_penalty: 0.85,
            total: 42.123,
            decision: Decision::Drop,
        };
        let high = ScoreBreakdown {
            cluster_id: "c2".to_string(),
            total: 88.5,
            decision: Decision::Post,
            ..low.clone()
        };
        BatchOutput {
            clusters: vec![cluster],
            signals: vec![SocialSignals::zero("c1")],
            scores: vec![low, high],
            summary: IngestSummary::default(),
        }
    }

    #[test]
    fn decisions_are_sorted_desc_and_rounded() {
        let csv = decisions_csv(&output());
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("cluster_id,freshness"));
        let first = lines.next().unwrap();
        let second = lines.next().unwrap();
        assert!(first.starts_with("c2,"));
        assert!(second.starts_with("c1,"));
        assert!(first.ends_with("88.50,POST"));
        assert!(second.contains("0.1235")); // freshness rounded to 4 decimals
    }

    #[test]
    fn headline_with_comma_is_quoted() {
        let csv = clusters_csv(&output());
        assert!(csv.contains("\"Selic sobe, mercado reage\""));
    }

    #[test]
    fn raw_json_round_trips() {
        let json = raw_json(&output()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["scores"].as_array().unwrap().len(), 2);
        assert_eq!(v["scores"][0]["decision"], serde_json::json!("DROP"));
    }

    #[test]
    fn writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_outputs(dir.path(), &output()).unwrap();
        for f in ["clusters.csv", "social_signals.csv", "decisions.csv", "raw.json"] {
            assert!(dir.path().join(f).exists(), "{f} missing");
        }
    }

    #[test]
    fn render_top_limits_rows() {
        let s = render_top(&output(), 1);
        assert_eq!(s.lines().count(), 2); // header + one row
        assert!(s.contains("POST"));
    }
}
