//! Token-overlap similarity between context paragraphs

use std::collections::HashSet;

/// Jaccard overlap of lowercase whitespace tokens, in [0, 1]
///
/// Two empty texts score 0.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let lower_a = a.to_lowercase();
    let lower_b = b.to_lowercase();
    let set_a: HashSet<&str> = lower_a.split_whitespace().collect();
    let set_b: HashSet<&str> = lower_b.split_whitespace().collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union.max(1) as f64
}
