// src/sentiment.rs
//! Lexicon-based polarity scoring for sampled engagement text (pt-BR + en).
//! Negation within the previous 1..=3 tokens inverts a word's sign.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Raw lexicon sum plus the number of scored tokens.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;
        let mut hits: usize = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
            hits += 1;
        }

        (score, hits)
    }

    /// Squashed polarity in (-1, 1); 0.0 for text with no lexicon hits.
    /// tanh keeps a single strong word below saturation while a pile-up of
    /// loaded words approaches ±1.
    pub fn polarity(&self, text: &str) -> f64 {
        let (score, hits) = self.score_text(text);
        if hits == 0 {
            return 0.0;
        }
        (score as f64 / 3.0).tanh()
    }
}

/// Mean and population variance of polarities over a sample of texts.
/// Empty sample yields (0.0, 0.0).
pub fn sample_stats(polarities: &[f64]) -> (f64, f64) {
    if polarities.is_empty() {
        return (0.0, 0.0);
    }
    let n = polarities.len() as f64;
    let mean = polarities.iter().sum::<f64>() / n;
    let var = polarities.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

/// Alphanumeric tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not" | "no" | "never" | "isn't" | "wasn't" | "aren't" | "won't" | "can't"
            | "cannot" | "without" | "não" | "nao" | "nunca" | "sem" | "nem"
    )
}
