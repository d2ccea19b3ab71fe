use std::collections::HashSet;

/// Split raw input on runs of whitespace and commas into lowercase tokens
pub fn tokenize(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tokens with repeats removed, first occurrence wins
pub fn distinct_tokens(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(input)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
