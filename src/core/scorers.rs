// File: src/core/scorers.rs
//! Per-attribute comparison functions.
//!
//! Each scorer looks both characters up in its own dictionary and returns a
//! value in `[0, 1]`. A missing or empty entry on either side scores 0.

use crate::core::dictionary::{lookup_pair, DictionarySet};
use std::collections::HashSet;

/// Position-wise agreement of the first `code_length` four-corner digits.
pub fn fourangle_score(dicts: &DictionarySet, char1: &str, char2: &str, code_length: usize) -> f64 {
    let Some((code1, code2)) = lookup_pair(&dicts.fourangle, char1, char2) else {
        return 0.0;
    };
    if code_length == 0 {
        return 0.0;
    }
    let same = code1
        .chars()
        .take(code_length)
        .zip(code2.chars().take(code_length))
        .filter(|(a, b)| a == b)
        .count();
    same as f64 / code_length as f64
}

/// Position-wise agreement of the reading components (full, initial, final, tone).
///
/// Normalized by `code_length`, not by the number of components.
pub fn pinyin_score(dicts: &DictionarySet, char1: &str, char2: &str, code_length: usize) -> f64 {
    let Some((reading1, reading2)) = lookup_pair(&dicts.pinyin, char1, char2) else {
        return 0.0;
    };
    if code_length == 0 {
        return 0.0;
    }
    let same = reading1
        .iter()
        .take(code_length)
        .zip(reading2.iter().take(code_length))
        .filter(|(a, b)| a == b)
        .count();
    same as f64 / code_length as f64
}

pub fn component_score(dicts: &DictionarySet, char1: &str, char2: &str) -> f64 {
    exact_match(lookup_pair(&dicts.component, char1, char2))
}

pub fn struct_score(dicts: &DictionarySet, char1: &str, char2: &str) -> f64 {
    exact_match(lookup_pair(&dicts.structure, char1, char2))
}

pub fn frequency_score(dicts: &DictionarySet, char1: &str, char2: &str) -> f64 {
    lookup_pair(&dicts.frequency, char1, char2)
        .map(|(a, b)| relative_closeness(*a, *b))
        .unwrap_or(0.0)
}

/// Relative closeness of the two stroke counts.
pub fn number_score(dicts: &DictionarySet, char1: &str, char2: &str) -> f64 {
    lookup_pair(&dicts.number, char1, char2)
        .map(|(a, b)| relative_closeness(*a, *b))
        .unwrap_or(0.0)
}

/// Jaccard index of the two decomposition sets.
pub fn stroke_score(dicts: &DictionarySet, char1: &str, char2: &str) -> f64 {
    lookup_pair(&dicts.stroke, char1, char2)
        .map(|(a, b)| {
            let set1: HashSet<&str> = a.iter().map(String::as_str).collect();
            let set2: HashSet<&str> = b.iter().map(String::as_str).collect();
            jaccard(&set1, &set2)
        })
        .unwrap_or(0.0)
}

/// Jaccard index over the distinct stroke-type symbols; order within the string is ignored.
pub fn order_score(dicts: &DictionarySet, char1: &str, char2: &str) -> f64 {
    lookup_pair(&dicts.order, char1, char2)
        .map(|(a, b)| {
            let set1: HashSet<char> = a.chars().collect();
            let set2: HashSet<char> = b.chars().collect();
            jaccard(&set1, &set2)
        })
        .unwrap_or(0.0)
}

fn exact_match(pair: Option<(&String, &String)>) -> f64 {
    match pair {
        Some((a, b)) if a == b => 1.0,
        _ => 0.0,
    }
}

/// `1 - |a - b| / max(a, b)`, clamped so negative inputs cannot escape [0, 1].
fn relative_closeness(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max <= 0.0 {
        return 0.0;
    }
    (1.0 - (a - b).abs() / max).clamp(0.0, 1.0)
}

fn jaccard<T: Eq + std::hash::Hash>(set1: &HashSet<T>, set2: &HashSet<T>) -> f64 {
    let union = set1.union(set2).count();
    if union == 0 {
        return 0.0;
    }
    set1.intersection(set2).count() as f64 / union as f64
}
