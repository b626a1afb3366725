//! Shared event contracts for read-along observers.
//!
//! The tracker emits these DTOs whenever its observable state changes. The
//! presentation layer subscribes through an [`EventBus`] implementation and
//! never reads tracker internals directly.

mod bus;

pub use bus::{emit_event, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse tracker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// No script loaded, or the script has no words.
    Empty,
    /// Script loaded, nothing matched yet.
    Ready,
    /// Cursor somewhere before the last word.
    Tracking,
    /// Cursor on the last word.
    Complete,
}

/// Read model of a tracker session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub session_id: Uuid,
    pub state: TrackingState,
    /// Index of the last matched token, `None` before the first match.
    pub cursor: Option<usize>,
    pub complete: bool,
    pub token_count: usize,
}

/// Event emitted when a new script replaces the current one.
///
/// Producers: tracker session
/// Consumers: presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptLoadedEvent {
    /// Fresh id for this script; later events carry it.
    pub session_id: Uuid,
    pub token_count: usize,
}

/// Event emitted when speech moves the cursor forward.
///
/// Producers: tracker session
/// Consumers: presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorMovedEvent {
    pub session_id: Uuid,
    /// Cursor before the move, `None` if tracking had not started.
    #[serde(default)]
    pub previous: Option<usize>,
    pub cursor: usize,
    /// Script word at the new cursor, as written.
    pub surface: String,
    /// True when driven by an interim (not yet final) hypothesis.
    #[serde(default)]
    pub preview: bool,
}

/// Event emitted once the cursor reaches the last script word.
///
/// Producers: tracker session
/// Consumers: presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingCompleteEvent {
    pub session_id: Uuid,
    pub cursor: usize,
}

/// Event emitted on a manual reposition.
///
/// Producers: tracker session
/// Consumers: presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorJumpedEvent {
    pub session_id: Uuid,
    #[serde(default)]
    pub previous: Option<usize>,
    #[serde(default)]
    pub cursor: Option<usize>,
}

/// Event emitted when tracking restarts from the top of the same script.
///
/// Producers: tracker session
/// Consumers: presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerResetEvent {
    pub session_id: Uuid,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Script loaded event.
    pub const SCRIPT_LOADED: &str = "tracker:script_loaded";
    /// Cursor advanced by speech.
    pub const CURSOR_MOVED: &str = "tracker:cursor_moved";
    /// Last word reached.
    pub const TRACKING_COMPLETE: &str = "tracker:complete";
    /// Manual jump.
    pub const CURSOR_JUMPED: &str = "tracker:cursor_jumped";
    /// Manual reset.
    pub const TRACKER_RESET: &str = "tracker:reset";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moved_deserialize_minimal() {
        let json = r#"{
            "session_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "cursor": 4,
            "surface": "fox"
        }"#;
        let event: CursorMovedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.cursor, 4);
        assert_eq!(event.previous, None);
        assert!(!event.preview);
    }

    #[test]
    fn test_tracking_state_serializes_snake_case() {
        let json = serde_json::to_string(&TrackingState::Complete).unwrap();
        assert_eq!(json, r#""complete""#);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = TrackerSnapshot {
            session_id: Uuid::new_v4(),
            state: TrackingState::Tracking,
            cursor: Some(3),
            complete: false,
            token_count: 9,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: TrackerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
