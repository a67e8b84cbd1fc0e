// SPDX-License-Identifier: GPL-3.0-or-later

//! Token-set similarity scoring.
//!
//! Compares two display names by their word tokens regardless of order or
//! duplication: both strings are reduced to normalized token sets, and the
//! intersection/difference recombinations are scored against each other
//! with normalized Levenshtein distance. The result is a 0-100 ratio that
//! is symmetric in its arguments.

use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

/// Token-set similarity ratio between two strings, on a 0-100 scale.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 100;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection: Vec<&str> = tokens_a
        .intersection(&tokens_b)
        .map(String::as_str)
        .collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).map(String::as_str).collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).map(String::as_str).collect();

    let base = intersection.join(" ");
    let combined_a = join_parts(&base, &only_a);
    let combined_b = join_parts(&base, &only_b);

    let best = ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b));

    (best * 100.0).round() as u8
}

fn join_parts(base: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        rest.join(" ")
    } else {
        format!("{} {}", base, rest.join(" "))
    }
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Lowercased, NFKC-normalized whitespace tokens. BTreeSet keeps the
/// recombined strings in a canonical order.
fn tokens(input: &str) -> BTreeSet<String> {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
