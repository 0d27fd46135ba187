//! Text normalization and distance helpers for the reconciliation matcher.
//!
//! Bank statement descriptions never match internal references verbatim, so
//! all comparisons run over a normalized key: NFKD-decomposed, combining
//! marks stripped, lowercased alphanumerics, punctuation and whitespace runs
//! collapsed to single spaces. The same key indexes the learned pattern map.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Normalizes free text into the canonical matcher key.
///
/// Returns `None` when nothing alphanumeric survives normalization.
pub(crate) fn normalize_text_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::new();
    let mut prev_space = false;
    for ch in trimmed.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Edit distance a token may be off by and still count as matching.
pub(crate) fn similarity_threshold(input: &str) -> usize {
    let len = input.chars().count();
    if len <= 6 { 1 } else { 2 }
}

pub(crate) fn levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    let mut costs: Vec<usize> = (0..=right.len()).collect();

    for (i, left_char) in left.iter().enumerate() {
        let mut last_cost = i;
        costs[0] = i + 1;
        for (j, right_char) in right.iter().enumerate() {
            let next_cost = costs[j + 1];
            let mut cost = if left_char == right_char {
                last_cost
            } else {
                last_cost + 1
            };
            cost = cost.min(costs[j] + 1).min(next_cost + 1);
            costs[j + 1] = cost;
            last_cost = next_cost;
        }
    }

    costs[right.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_case_accents_and_punctuation() {
        assert_eq!(
            normalize_text_key("  PAGO  Juan PÉREZ, CBU 0123/4 "),
            Some("pago juan perez cbu 0123 4".to_string())
        );
    }

    #[test]
    fn normalize_rejects_text_without_alphanumerics() {
        assert_eq!(normalize_text_key("  --- // ** "), None);
        assert_eq!(normalize_text_key(""), None);
    }

    #[test]
    fn levenshtein_counts_edits() {
        assert_eq!(levenshtein("perez", "peres"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("gomez", "gomez"), 0);
    }
}
