//! Edit-distance similarity between normalized words.

use strsim::levenshtein;

/// Similarity of two normalized words in `[0, 1]`.
///
/// `1 - levenshtein(a, b) / max(len(a), len(b))`. An empty word carries no
/// information, so any comparison involving one scores 0, including two
/// empty words.
pub fn similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein(a, b);
    let max_len = a.chars().count().max(b.chars().count());
    1.0 - distance as f32 / max_len as f32
}
