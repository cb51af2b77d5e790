// src/novelty.rs
//! # Novelty Memory
//! Bounded FIFO of headline token-sets from clusters already scored in this
//! run. Novelty is 1 minus the best Jaccard similarity against the window.
//!
//! Owned by the orchestrating loop: the scorer reads it, the orchestrator
//! pushes after each cluster is scored. The linear scan is O(batch × cap),
//! fine for the window sizes involved; exact Jaccard semantics must be
//! preserved for scoring reproducibility.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashSet, VecDeque};

/// Default window capacity.
pub const DEFAULT_CAPACITY: usize = 5000;

static RE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9áéíóúâêôãõç$\.]{2,}").expect("novelty token regex"));

/// Token-set for similarity: lowercased alphanumeric runs of 2+ chars.
pub fn headline_tokens(headline: &str) -> HashSet<String> {
    RE_TOKEN
        .find_iter(&headline.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

#[derive(Debug)]
pub struct NoveltyMemory {
    window: VecDeque<HashSet<String>>,
    capacity: usize,
}

impl Default for NoveltyMemory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NoveltyMemory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
        }
    }

    /// 1 minus the best similarity against every remembered set; 1.0 when
    /// the memory is empty (fully novel).
    pub fn novelty_of(&self, tokens: &HashSet<String>) -> f64 {
        let max_sim = self
            .window
            .iter()
            .map(|past| jaccard(tokens, past))
            .fold(0.0_f64, f64::max);
        1.0 - max_sim
    }

    /// Remember a scored headline, evicting the oldest entry past capacity.
    pub fn push(&mut self, tokens: HashSet<String>) {
        self.window.push_back(tokens);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_memory_is_fully_novel() {
        let mem = NoveltyMemory::default();
        assert_eq!(mem.novelty_of(&headline_tokens("Selic sobe")), 1.0);
    }

    #[test]
    fn identical_headline_has_zero_novelty() {
        let mut mem = NoveltyMemory::default();
        mem.push(headline_tokens("Selic sobe para 10.5%"));
        let n = mem.novelty_of(&headline_tokens("Selic sobe para 10.5%"));
        assert!(n.abs() < 1e-9);
    }

    #[test]
    fn disjoint_vocabulary_is_fully_novel() {
        let mut mem = NoveltyMemory::default();
        mem.push(headline_tokens("Selic sobe para 10.5%"));
        let n = mem.novelty_of(&headline_tokens("Chuva atinge litoral norte"));
        assert_eq!(n, 1.0);
    }

    #[test]
    fn partial_overlap_lands_between() {
        let mut mem = NoveltyMemory::default();
        mem.push(headline_tokens("Selic sobe juros"));
        let n = mem.novelty_of(&headline_tokens("Selic cai juros"));
        assert!(n > 0.0 && n < 1.0);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut mem = NoveltyMemory::with_capacity(2);
        mem.push(headline_tokens("primeira manchete do dia"));
        mem.push(headline_tokens("segunda manchete do dia"));
        assert!(mem.novelty_of(&headline_tokens("primeira manchete do dia")) < 1e-9);

        mem.push(headline_tokens("terceira manchete do dia"));
        assert_eq!(mem.len(), 2);
        // The oldest entry is gone; its exact twin no longer fully matches.
        assert!(mem.novelty_of(&headline_tokens("primeira manchete do dia")) > 0.0);
    }

    #[test]
    fn jaccard_of_two_empty_sets_is_zero() {
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }
}
