//! Reference script model for read-along tracking.
//!
//! A script is split once into [`ScriptToken`]s. Each token keeps the word as
//! written (for display) next to the normalized form used for matching.

mod normalize;
mod similarity;

pub use normalize::{normalize, normalize_words};
pub use similarity::similarity;

use serde::{Deserialize, Serialize};

/// One word of the reference text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptToken {
    /// The word as it appears in the script, punctuation included.
    pub surface: String,
    /// Lowercase ASCII comparison form, see [`normalize`].
    pub normalized: String,
    /// Index of this token in the script.
    pub position: usize,
}

/// Split `text` on whitespace runs into positioned tokens.
///
/// Words whose normalized form is empty (a lone "--" or "…") are still
/// tokens: they occupy a position and are displayed, they just never match.
pub fn tokenize(text: &str) -> Vec<ScriptToken> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, word)| ScriptToken {
            surface: word.to_string(),
            normalized: normalize(word),
            position,
        })
        .collect()
}

/// A tokenized script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    tokens: Vec<ScriptToken>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        Self {
            tokens: tokenize(text),
        }
    }

    pub fn tokens(&self) -> &[ScriptToken] {
        &self.tokens
    }

    pub fn get(&self, position: usize) -> Option<&ScriptToken> {
        self.tokens.get(position)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Position of the final token, `None` for an empty script.
    pub fn last_position(&self) -> Option<usize> {
        self.tokens.len().checked_sub(1)
    }
}
