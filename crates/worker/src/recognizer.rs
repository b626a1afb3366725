//! Speech recognizer boundary.
//!
//! The recognizer is external; these are the messages it produces. They are
//! serde types so a recorded session can be stored as JSON lines and replayed.

use serde::{Deserialize, Serialize};

/// One transcript fragment from the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    pub text: String,
    /// False for interim hypotheses that may still be revised.
    #[serde(default)]
    pub is_final: bool,
}

impl TranscriptUpdate {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Recognizer start/stop signals. The tracker has no pause state of its own;
/// these are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerLifecycle {
    Started,
    Stopped,
    Paused,
    Resumed,
}

/// Everything a recognizer can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognizerEvent {
    Transcript(TranscriptUpdate),
    /// Reported to the user by the host, ignored by the tracker.
    Error { message: String },
    Lifecycle { state: RecognizerLifecycle },
}

impl From<TranscriptUpdate> for RecognizerEvent {
    fn from(update: TranscriptUpdate) -> Self {
        Self::Transcript(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_deserialize_defaults_to_interim() {
        let json = r#"{"type": "transcript", "text": "hello"}"#;
        let event: RecognizerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, RecognizerEvent::Transcript(TranscriptUpdate::interim("hello")));
    }

    #[test]
    fn test_lifecycle_deserialize() {
        let json = r#"{"type": "lifecycle", "state": "paused"}"#;
        let event: RecognizerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            RecognizerEvent::Lifecycle {
                state: RecognizerLifecycle::Paused
            }
        );
    }

    #[test]
    fn test_error_serialize() {
        let event = RecognizerEvent::Error {
            message: "network lost".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "network lost");
    }
}
