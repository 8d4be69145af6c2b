//! Word tokenization.

use std::collections::HashSet;

/// Tokens as the vectorizers see them: lower-cased runs of two or more word
/// characters.
pub fn analyzer_tokens(text: &str) -> Vec<String> {
    split_word_runs(&text.to_lowercase())
        .into_iter()
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

/// Distinct lower-cased word-boundary tokens of any length.
pub fn word_set(text: &str) -> HashSet<String> {
    split_word_runs(&text.to_lowercase()).into_iter().collect()
}

/// Maximal runs of alphanumeric characters or underscores.
fn split_word_runs(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
