// src/signals/query.rs
//! Query derivation: turn a cluster into search terms for the engagement
//! backend and up to three keywords for the trends backend.

use crate::cluster::Cluster;
use once_cell::sync::Lazy;
use regex::Regex;

/// Headline tokens worth searching for: 3+ chars, letters/digits/$/dot,
/// accents included, pure numbers excluded.
static RE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9áéíóúâêôãõçÁÉÍÓÚÂÊÔÃÕÇ$\.]{3,}").expect("token regex"));

const MAX_TERMS: usize = 10;
const MAX_TREND_KEYWORDS: usize = 3;

fn headline_tokens(headline: &str) -> Vec<String> {
    RE_TOKEN
        .find_iter(headline)
        .map(|m| m.as_str().to_string())
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit() || c == '.'))
        .collect()
}

/// Engagement search terms: top headline tokens plus extracted entities,
/// capped at ten terms.
pub fn engagement_terms(cluster: &Cluster) -> Vec<String> {
    let mut terms: Vec<String> = headline_tokens(&cluster.headline)
        .into_iter()
        .take(6)
        .collect();
    terms.extend(
        cluster
            .entities
            .tickers
            .iter()
            .chain(cluster.entities.topics.iter())
            .take(4)
            .cloned(),
    );
    terms.truncate(MAX_TERMS);
    terms
}

/// Trend keywords: tickers first (exchange suffix stripped, uppercased),
/// then topics, then lowercased headline tokens as a fallback. Never empty.
pub fn trend_keywords(cluster: &Cluster) -> Vec<String> {
    let mut kws: Vec<String> = Vec::new();
    for t in &cluster.entities.tickers {
        let cleaned = t.replace(".sa", "").replace('$', "").to_uppercase();
        if cleaned.len() >= 3 {
            kws.push(cleaned);
        }
        if kws.len() >= MAX_TREND_KEYWORDS {
            return kws;
        }
    }
    for topic in &cluster.entities.topics {
        if kws.len() >= MAX_TREND_KEYWORDS {
            break;
        }
        kws.push(topic.clone());
    }
    if kws.is_empty() {
        kws = headline_tokens(&cluster.headline)
            .into_iter()
            .map(|t| t.to_lowercase())
            .take(2)
            .collect();
    }
    if kws.is_empty() {
        kws.push("mercado financeiro".to_string());
    }
    kws.truncate(MAX_TREND_KEYWORDS);
    kws
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityExtractor;
    use chrono::Utc;

    fn cluster(headline: &str) -> Cluster {
        Cluster {
            id: "c1".to_string(),
            headline: headline.to_string(),
            published_at: Utc::now(),
            urls: vec![],
            sources: vec![],
            titles: vec![headline.to_string()],
            entities: EntityExtractor::default_seed().extract(headline),
        }
    }

    #[test]
    fn terms_are_capped_and_skip_bare_numbers() {
        let c = cluster("Selic sobe para 10.5% e mercado reage com cautela enquanto dólar avança");
        let terms = engagement_terms(&c);
        assert!(terms.len() <= 10);
        assert!(terms.iter().all(|t| t != "10.5"));
        assert!(terms.iter().any(|t| t == "Selic"));
    }

    #[test]
    fn trend_keywords_prefer_tickers() {
        let c = cluster("PETR4.SA dispara após balanço");
        let kws = trend_keywords(&c);
        assert_eq!(kws[0], "PETR4");
        assert!(kws.len() <= 3);
    }

    #[test]
    fn trend_keywords_fall_back_to_headline() {
        let c = cluster("Feriado prolongado altera expediente");
        let kws = trend_keywords(&c);
        assert!(!kws.is_empty());
        assert!(kws.len() <= 3);
        assert_eq!(kws[0], "feriado");
    }

    #[test]
    fn trend_keywords_never_empty() {
        let c = cluster("? !");
        assert_eq!(trend_keywords(&c), vec!["mercado financeiro".to_string()]);
    }
}
