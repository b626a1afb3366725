//! Tunable matching parameters.
//!
//! Observed transcripts have been tracked with lookahead 12-16 and thresholds
//! 0.45-0.55; the defaults below are the calibration baseline. Use the replay
//! binary against recorded sessions before changing them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Tokens behind the cursor that a match may land on.
pub const DEFAULT_LOOKBEHIND: usize = 2;

/// Tokens ahead of the cursor searched per update.
pub const DEFAULT_LOOKAHEAD: usize = 12;

/// Trailing spoken words aligned against the script.
pub const DEFAULT_ANCHOR_LEN: usize = 3;

/// Script words shorter than this only count when matched exactly.
pub const DEFAULT_MIN_MATCH_LEN: usize = 2;

/// Average similarity an alignment must exceed to move the cursor.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Final words retained for anchoring.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Window and scoring parameters for the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub lookbehind: usize,
    pub lookahead: usize,
    pub anchor_len: usize,
    pub min_match_len: usize,
    pub threshold: f32,
    pub history_capacity: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            lookbehind: DEFAULT_LOOKBEHIND,
            lookahead: DEFAULT_LOOKAHEAD,
            anchor_len: DEFAULT_ANCHOR_LEN,
            min_match_len: DEFAULT_MIN_MATCH_LEN,
            threshold: DEFAULT_THRESHOLD,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl TrackerSettings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Clamp values the search cannot work with.
    pub fn sanitized(mut self) -> Self {
        if self.anchor_len == 0 {
            tracing::warn!("anchor_len must be at least 1, using 1");
            self.anchor_len = 1;
        }
        if self.lookahead == 0 {
            tracing::warn!("lookahead must be at least 1, using 1");
            self.lookahead = 1;
        }
        if !self.threshold.is_finite() {
            tracing::warn!(threshold = self.threshold, "threshold is not finite, using default");
            self.threshold = DEFAULT_THRESHOLD;
        } else if !(0.0..=1.0).contains(&self.threshold) {
            let clamped = self.threshold.clamp(0.0, 1.0);
            tracing::warn!(threshold = self.threshold, clamped, "threshold outside [0, 1]");
            self.threshold = clamped;
        }
        if self.history_capacity < self.anchor_len {
            tracing::warn!(
                history_capacity = self.history_capacity,
                anchor_len = self.anchor_len,
                "history_capacity smaller than anchor_len, raising it"
            );
            self.history_capacity = self.anchor_len;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TrackerSettings::default();
        assert_eq!(settings.lookbehind, 2);
        assert_eq!(settings.lookahead, 12);
        assert_eq!(settings.anchor_len, 3);
        assert_eq!(settings.min_match_len, 2);
        assert_eq!(settings.threshold, 0.5);
        assert_eq!(settings.history_capacity, 20);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = TrackerSettings::from_json_str(r#"{"lookahead": 16, "threshold": 0.45}"#)
            .unwrap();
        assert_eq!(settings.lookahead, 16);
        assert_eq!(settings.threshold, 0.45);
        assert_eq!(settings.lookbehind, DEFAULT_LOOKBEHIND);
        assert_eq!(settings.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_invalid_json() {
        let err = TrackerSettings::from_json_str(r#"{"lookahead": "far"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_sanitize_clamps() {
        let settings = TrackerSettings {
            anchor_len: 0,
            lookahead: 0,
            threshold: 1.7,
            history_capacity: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.anchor_len, 1);
        assert_eq!(settings.lookahead, 1);
        assert_eq!(settings.threshold, 1.0);
        assert_eq!(settings.history_capacity, 1);
    }

    #[test]
    fn test_sanitize_replaces_nan_threshold() {
        let settings = TrackerSettings {
            threshold: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, r#"{"anchor_len": 2, "history_capacity": 8}"#).unwrap();

        let settings = TrackerSettings::from_json_file(&path).unwrap();
        assert_eq!(settings.anchor_len, 2);
        assert_eq!(settings.history_capacity, 8);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = TrackerSettings::from_json_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::ReadFile { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
