//! Bounded anchor search around the cursor.
//!
//! The last few spoken words (the anchor) are slid across a window of script
//! tokens starting a little behind the cursor and reaching a fixed distance
//! ahead. Each alignment is scored by averaging word similarities; the best
//! alignment above the threshold places the cursor on the script word matched
//! by the newest anchor word. Cost is O(window * anchor) per update.

use readalong_script::{normalize, similarity, ScriptToken};

use crate::settings::TrackerSettings;

/// Best alignment found inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMatch {
    /// Script position of the newest anchor word.
    pub position: usize,
    /// Average similarity over the anchor, in `(threshold, 1]`.
    pub score: f32,
    /// Number of anchor words that were aligned.
    pub anchor_len: usize,
}

/// Find the best alignment of the trailing `spoken` words near `cursor_start`.
///
/// Returns `None` when the anchor is empty, does not fit the window, or no
/// alignment scores above `settings.threshold`. Ties go to the earliest
/// alignment. The result may lie behind `cursor_start`; callers decide
/// whether to commit it.
pub fn search_window<S: AsRef<str>>(
    spoken: &[S],
    tokens: &[ScriptToken],
    cursor_start: usize,
    settings: &TrackerSettings,
) -> Option<WindowMatch> {
    let anchor = build_anchor(spoken, settings.anchor_len);
    if anchor.is_empty() {
        return None;
    }

    let window_start = cursor_start.saturating_sub(settings.lookbehind);
    let window_end = tokens.len().min(cursor_start.saturating_add(settings.lookahead));
    let window = tokens.get(window_start..window_end)?;
    if window.len() < anchor.len() {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;

    for wi in 0..=window.len() - anchor.len() {
        let score = score_alignment(&anchor, &window[wi..wi + anchor.len()], settings);

        tracing::trace!(
            position = window_start + wi,
            score,
            "window_offset_scored"
        );

        if score <= settings.threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((wi, score)),
        }
    }

    best.map(|(wi, score)| WindowMatch {
        position: window_start + wi + anchor.len() - 1,
        score,
        anchor_len: anchor.len(),
    })
}

/// Candidate cursor for the trailing `spoken` words: the matched position, or
/// `cursor_start` when nothing in the window is confident enough.
pub fn next_cursor<S: AsRef<str>>(
    spoken: &[S],
    tokens: &[ScriptToken],
    cursor_start: usize,
    settings: &TrackerSettings,
) -> usize {
    search_window(spoken, tokens, cursor_start, settings)
        .map(|m| m.position)
        .unwrap_or(cursor_start)
}

/// Normalize the last `anchor_len` spoken words, dropping the ones left empty.
fn build_anchor<S: AsRef<str>>(spoken: &[S], anchor_len: usize) -> Vec<String> {
    let tail = &spoken[spoken.len().saturating_sub(anchor_len)..];
    tail.iter()
        .map(|w| normalize(w.as_ref()))
        .filter(|w| !w.is_empty())
        .collect()
}

fn score_alignment(anchor: &[String], tokens: &[ScriptToken], settings: &TrackerSettings) -> f32 {
    let total: f32 = anchor
        .iter()
        .zip(tokens)
        .map(|(word, token)| {
            // Short script words ("a", "I") only count on an exact hit.
            if token.normalized.len() < settings.min_match_len && token.normalized != *word {
                0.0
            } else {
                similarity(word, &token.normalized)
            }
        })
        .sum();
    total / anchor.len() as f32
}
