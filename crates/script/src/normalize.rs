//! Word normalization shared by the tokenizer and the matcher.

/// Lowercase `word` and drop everything outside ASCII `[a-z0-9']`.
///
/// Apostrophes survive so contractions ("don't") stay distinct from their
/// stems. Non-ASCII letters are dropped, not folded.
pub fn normalize(word: &str) -> String {
    word.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '\'')
        .collect()
}

/// Split `text` on whitespace and normalize each word.
///
/// Words that normalize to nothing are kept as empty strings; callers that
/// need signal only (the anchor builder) filter them out themselves.
pub fn normalize_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(normalize).collect()
}
