//! Name normalization and fuzzy respondent matching.
//!
//! Names arrive from three sources (submission rows, a typed starting name,
//! and the group roster) with no shared identity key. Two names denote the
//! same person when their normalized forms are equal, or when their first and
//! last tokens agree in either order, exactly or above a similarity threshold.

use crate::analyzers::utility::similarity;

/// Similarity required on both first and last tokens for a fuzzy match.
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.8;

/// Lowercases, replaces commas with spaces, and collapses whitespace.
pub fn normalize_name(name: &str) -> String {
    name.replace(',', " ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a name into its normalized whitespace-separated tokens.
pub fn name_parts(name: &str) -> Vec<String> {
    normalize_name(name)
        .split(' ')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decides whether two free-text names refer to the same person.
///
/// Only the first and last tokens take part; middle names and suffixes are
/// ignored. Names with fewer than two tokens only match on exact normalized
/// equality.
pub fn names_match(a: &str, b: &str, threshold: f64) -> bool {
    if normalize_name(a) == normalize_name(b) {
        return true;
    }

    let parts_a = name_parts(a);
    let parts_b = name_parts(b);
    if parts_a.len() < 2 || parts_b.len() < 2 {
        return false;
    }

    let (first_a, last_a) = (&parts_a[0], &parts_a[parts_a.len() - 1]);
    let (first_b, last_b) = (&parts_b[0], &parts_b[parts_b.len() - 1]);

    if first_a == last_b && last_a == first_b {
        return true;
    }

    let forward =
        similarity(first_a, first_b) >= threshold && similarity(last_a, last_b) >= threshold;
    let reversed =
        similarity(first_a, last_b) >= threshold && similarity(last_a, first_b) >= threshold;

    forward || reversed
}
