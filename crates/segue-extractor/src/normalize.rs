//! Normalization, deduplication and sampling of transition candidates
//!
//! Normalized text is only ever an equality key. Output keeps the first-seen
//! surface form of each candidate.

use crate::error::ExtractorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use segue_domain::DuplicateEntry;
use std::collections::HashMap;

/// Collapse whitespace runs to one space and trim both ends
///
/// # Examples
///
/// ```
/// use segue_extractor::normalize;
///
/// assert_eq!(normalize("  Dans un\t autre\nregistre "), "Dans un autre registre");
/// ```
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase with typographic apostrophes folded to ASCII, for prefix tests
pub(crate) fn fold_lower(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02bc}' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Unique candidates plus a report of repeated ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dedupe {
    /// First-seen surface forms, in first-occurrence order
    pub unique: Vec<String>,

    /// Normalized forms seen more than once, in first-occurrence order
    pub duplicates: Vec<DuplicateEntry>,
}

/// Remove candidates whose normalized forms repeat
pub fn dedupe<S: AsRef<str>>(candidates: &[S]) -> Dedupe {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: Vec<(String, usize)> = Vec::new();
    let mut unique = Vec::new();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let key = normalize(candidate);
        match index.get(&key) {
            Some(&slot) => seen[slot].1 += 1,
            None => {
                index.insert(key.clone(), seen.len());
                seen.push((key, 1));
                unique.push(candidate.to_string());
            }
        }
    }

    let duplicates = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(text, count)| DuplicateEntry::new(text, count))
        .collect();

    Dedupe { unique, duplicates }
}

/// Number of items a sample of `percent` keeps from `len`
///
/// `max(1, floor(len * percent / 100))`, or 0 for an empty set.
pub fn sample_size(len: usize, percent: u8) -> usize {
    if len == 0 {
        return 0;
    }
    (len * percent as usize / 100).max(1)
}

/// Draw `percent` of `unique` without replacement
///
/// The subset keeps the input order. An empty input yields an empty subset.
pub fn sample<R: Rng + ?Sized>(
    unique: &[String],
    percent: u8,
    rng: &mut R,
) -> Result<Vec<String>, ExtractorError> {
    if !(1..=100).contains(&percent) {
        return Err(ExtractorError::Config(format!(
            "sample percent {} out of range [1, 100]",
            percent
        )));
    }

    let amount = sample_size(unique.len(), percent);
    if amount == unique.len() {
        return Ok(unique.to_vec());
    }

    let mut picked = rand::seq::index::sample(rng, unique.len(), amount).into_vec();
    picked.sort_unstable();
    Ok(picked.into_iter().map(|i| unique[i].clone()).collect())
}

/// [`sample`] with a reproducible seed, or entropy when `seed` is `None`
pub fn sample_seeded(
    unique: &[String],
    percent: u8,
    seed: Option<u64>,
) -> Result<Vec<String>, ExtractorError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    sample(unique, percent, &mut rng)
}
