//! Backend recommendation engine.
//!
//! A pure, deterministic heuristic classifier: maps a prompt string to a
//! ranked list of backend scores using the static pattern table in
//! [`patterns`]. Performs no I/O; an advisory step invoked before or
//! alongside orchestration.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::backend::BackendId;

pub mod patterns;

use patterns::{Candidate, DEFAULT_CANDIDATES, PATTERNS};

/// Maximum number of recommendations returned.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Damping factor for diminishing-returns accumulation. Tunable, not
/// load-bearing: higher values flatten the contribution of repeated
/// matches faster.
const DAMPING: f64 = 0.5;

/// Score for one backend, with every reason that contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub backend: BackendId,
    /// Display name for UI surfaces.
    pub name: String,
    /// Rounded to 2 decimal places, always in [0, 1].
    pub score: f64,
    /// Deduplicated, in the order reasons were first seen.
    pub reasons: Vec<String>,
}

/// Result of a recommendation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Top backends, descending by score. Ties keep first-seen order.
    pub scores: Vec<ModelScore>,
    /// Names of the patterns that matched, or `["general"]` if none did.
    pub features: Vec<String>,
}

/// Running score table entry. Insertion order is preserved so that ties
/// sort deterministically by first appearance.
struct ScoreEntry {
    backend: BackendId,
    score: f64,
    reasons: Vec<String>,
}

/// Diminishing-returns score update.
///
/// `new = min(1, old + base * (1 - old * DAMPING))`
///
/// A single strong match dominates; repeated weaker matches raise the
/// score monotonically toward, but never past, 1.
fn accumulate(old: f64, base: f64) -> f64 {
    (old + base * (1.0 - old * DAMPING)).min(1.0)
}

fn apply_candidate(table: &mut Vec<ScoreEntry>, candidate: &Candidate) {
    let index = match table.iter().position(|e| e.backend == candidate.backend) {
        Some(index) => index,
        None => {
            table.push(ScoreEntry {
                backend: candidate.backend,
                score: 0.0,
                reasons: Vec::new(),
            });
            table.len() - 1
        }
    };
    let entry = &mut table[index];

    entry.score = accumulate(entry.score, candidate.base_score);
    let reason = candidate.reason.to_string();
    if !entry.reasons.contains(&reason) {
        entry.reasons.push(reason);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rank candidate backends for a prompt.
///
/// Pure and deterministic: identical input always yields identical
/// output. Matching is case-insensitive; when no pattern matches, a
/// fixed default ranking is returned under the `general` feature.
pub fn recommend(prompt: &str) -> Recommendation {
    let normalized = prompt.to_lowercase();

    let mut table: Vec<ScoreEntry> = Vec::new();
    let mut features: Vec<String> = Vec::new();

    for pattern in PATTERNS.iter() {
        if !pattern.matcher.is_match(&normalized) {
            continue;
        }
        features.push(pattern.name.to_string());
        for candidate in pattern.candidates {
            apply_candidate(&mut table, candidate);
        }
    }

    if features.is_empty() {
        features.push("general".to_string());
        for candidate in DEFAULT_CANDIDATES {
            apply_candidate(&mut table, candidate);
        }
    }

    let mut scores: Vec<ModelScore> = table
        .into_iter()
        .map(|entry| ModelScore {
            backend: entry.backend,
            name: entry.backend.display_name().to_string(),
            score: round2(entry.score),
            reasons: entry.reasons,
        })
        .collect();

    // Stable sort: equal scores keep first-insertion order
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scores.truncate(MAX_RECOMMENDATIONS);

    Recommendation { scores, features }
}
