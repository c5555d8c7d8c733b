//! Near-duplicate scoring over semantic keys.
//!
//! The score is the maximum of three cheap measures so that containment,
//! token rearrangement, and small inflection differences are each caught
//! by at least one of them.

use std::collections::HashMap;

/// Two semantic keys at or above this score are the same memory.
pub const SIMILARITY_THRESHOLD: f64 = 0.82;

/// Max of containment ratio, token-multiset overlap, and character-bigram
/// Dice coefficient.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    containment_ratio(a, b)
        .max(token_overlap(a, b))
        .max(bigram_dice(a, b))
}

/// shorter/longer length ratio when one key contains the other, else 0.
fn containment_ratio(a: &str, b: &str) -> f64 {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if a.contains(b) || b.contains(a) {
        let shorter = len_a.min(len_b) as f64;
        let longer = len_a.max(len_b) as f64;
        shorter / longer
    } else {
        0.0
    }
}

/// Multiset token intersection over the smaller token-count total.
fn token_overlap(a: &str, b: &str) -> f64 {
    let counts_a = token_counts(a);
    let counts_b = token_counts(b);
    let total_a: usize = counts_a.values().sum();
    let total_b: usize = counts_b.values().sum();
    if total_a == 0 || total_b == 0 {
        return 0.0;
    }

    let intersection: usize = counts_a
        .iter()
        .map(|(token, count)| count.min(counts_b.get(token).unwrap_or(&0)))
        .sum();
    intersection as f64 / total_a.min(total_b) as f64
}

fn token_counts(key: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in key.split_whitespace() {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Dice coefficient over character-bigram multisets (spaces included, so
/// token boundaries count). Keys shorter than two chars only match
/// exactly, which `similarity` already handles.
fn bigram_dice(a: &str, b: &str) -> f64 {
    let bigrams_a = bigrams(a);
    let bigrams_b = bigrams(b);
    if bigrams_a.is_empty() || bigrams_b.is_empty() {
        return 0.0;
    }

    let mut counts_b: HashMap<(char, char), usize> = HashMap::new();
    for bigram in &bigrams_b {
        *counts_b.entry(*bigram).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for bigram in &bigrams_a {
        if let Some(count) = counts_b.get_mut(bigram) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    2.0 * shared as f64 / (bigrams_a.len() + bigrams_b.len()) as f64
}

fn bigrams(key: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = key.chars().collect();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}
