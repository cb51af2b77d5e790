// src/entities.rs
//! Cheap rule-based entity extraction over cluster text: ticker codes, a
//! closed topic vocabulary, and all-caps terms as a weak supplementary hint.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

static RE_TICKER_B3: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]{4}\d)\.SA\b").expect("b3 ticker regex"));
static RE_CASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Z]{1,5})\b").expect("cashtag regex"));
static RE_CAPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,6}\b").expect("caps regex"));

/// Entities derived purely from cluster text. Sets are sorted for stable
/// output; absence of matches is an empty set, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    pub tickers: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    pub caps: BTreeSet<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty() && self.topics.is_empty() && self.caps.is_empty()
    }
}

/// Extractor with an injected topic vocabulary. The vocabulary is closed: a
/// topic counts iff it appears as a substring of the lowercased text.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    topics: BTreeSet<String>,
}

impl EntityExtractor {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(|t| t.into().to_lowercase()).collect(),
        }
    }

    /// Built-in macro/finance vocabulary, used when no config overrides it.
    pub fn default_seed() -> Self {
        Self::new([
            "selic", "ipca", "juros", "inflação", "inflacao", "câmbio", "cambio",
            "dólar", "dolar", "fed", "copom", "cvm", "sec", "balanço", "balanco",
            "guidance", "dividendos", "resultado", "pib", "gdp", "payroll",
            "petrobras", "vale", "itau", "ambev", "magalu", "b3", "ibovespa",
            "nasdaq", "s&p500", "opec",
        ])
    }

    pub fn extract(&self, text: &str) -> Entities {
        let text_low = text.to_lowercase();

        let mut tickers = BTreeSet::new();
        for caps in RE_TICKER_B3.captures_iter(text) {
            tickers.insert(caps[1].to_lowercase());
        }
        for caps in RE_CASHTAG.captures_iter(text) {
            tickers.insert(caps[1].to_lowercase());
        }

        let topics = self
            .topics
            .iter()
            .filter(|t| text_low.contains(t.as_str()))
            .cloned()
            .collect();

        let caps = RE_CAPS
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        Entities {
            tickers,
            topics,
            caps,
        }
    }
}
