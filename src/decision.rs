// src/decision.rs
//! Editorial verdict: POST (publish), WATCH (monitor), DROP (discard).
//! A pure threshold function over the composite score; ties go to the
//! higher tier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Post,
    Watch,
    Drop,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Post => "POST",
            Decision::Watch => "WATCH",
            Decision::Drop => "DROP",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a 0–100 composite score against the two ordered cutoffs.
/// Monotonic by construction: raising `total` never lowers the tier.
pub fn classify(total: f64, post_cutoff: f64, watch_cutoff: f64) -> Decision {
    if total >= post_cutoff {
        Decision::Post
    } else if total >= watch_cutoff {
        Decision::Watch
    } else {
        Decision::Drop
    }
}
