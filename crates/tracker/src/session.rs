//! Tracker session: owns the script, cursor and spoken-word buffers.

use std::sync::Arc;

use readalong_events::{
    emit_event, event_names, CursorJumpedEvent, CursorMovedEvent, EventBusRef, NullEventBus,
    ScriptLoadedEvent, TrackerResetEvent, TrackerSnapshot, TrackingCompleteEvent, TrackingState,
};
use readalong_script::{normalize_words, Script, ScriptToken};
use uuid::Uuid;

use crate::history::SpokenHistory;
use crate::search::{search_window, WindowMatch};
use crate::settings::TrackerSettings;

/// Follows a speaker through a script.
///
/// All mutation goes through `&mut self`, one update at a time. Observers are
/// notified through the event bus after every change.
pub struct TrackerSession {
    id: Uuid,
    script: Script,
    /// Last matched token; `None` until the first match.
    cursor: Option<usize>,
    /// Normalized words from final recognizer output only.
    history: SpokenHistory,
    /// Latest interim fragment, replaced on every interim update.
    interim: Vec<String>,
    /// An interim update moved the cursor onto the last word.
    preview_at_end: bool,
    complete: bool,
    settings: TrackerSettings,
    bus: EventBusRef,
}

impl Default for TrackerSession {
    fn default() -> Self {
        Self::with_settings(TrackerSettings::default())
    }
}

impl TrackerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TrackerSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            id: Uuid::new_v4(),
            script: Script::new(),
            cursor: None,
            history: SpokenHistory::with_capacity(settings.history_capacity),
            interim: Vec::new(),
            preview_at_end: false,
            complete: false,
            settings,
            bus: Arc::new(NullEventBus),
        }
    }

    /// Route state-change events to `bus`.
    pub fn with_event_bus(mut self, bus: EventBusRef) -> Self {
        self.bus = bus;
        self
    }

    // --- Commands ---

    /// Replace the script and start over from the top.
    pub fn load_script(&mut self, text: &str) {
        self.script = Script::parse(text);
        self.id = Uuid::new_v4();
        self.clear_progress();

        tracing::info!(
            session_id = %self.id,
            tokens = self.script.len(),
            "Script loaded"
        );
        emit_event(
            self.bus.as_ref(),
            event_names::SCRIPT_LOADED,
            &ScriptLoadedEvent {
                session_id: self.id,
                token_count: self.script.len(),
            },
        );
    }

    /// Feed one recognizer update.
    ///
    /// Final words are appended to the spoken history; interim words replace
    /// the previous interim fragment and are never persisted. Either way the
    /// cursor only moves forward, and speech that matches nothing leaves it
    /// where it is (`None` before the first match).
    pub fn ingest_speech(&mut self, transcript: &str, is_final: bool) {
        if self.script.is_empty() {
            tracing::trace!("Ignoring speech, no script loaded");
            return;
        }

        let words = normalize_words(transcript);
        if words.is_empty() {
            return;
        }

        let cursor_start = self.cursor.unwrap_or(0);

        let found = if is_final {
            self.interim.clear();
            self.history.extend(words);
            let spoken: Vec<&str> = self.history.iter().collect();
            search_window(&spoken, self.script.tokens(), cursor_start, &self.settings)
        } else {
            self.interim = words;
            let spoken: Vec<&str> = self
                .history
                .iter()
                .chain(self.interim.iter().map(String::as_str))
                .collect();
            search_window(&spoken, self.script.tokens(), cursor_start, &self.settings)
        };

        tracing::debug!(
            is_final,
            cursor = ?self.cursor,
            history = self.history.len(),
            interim = self.interim.len(),
            matched = ?found.map(|m| m.position),
            score = ?found.map(|m| m.score),
            "speech_aligned"
        );

        let reached_end = found.is_some_and(|found| self.commit(found, !is_final))
            && self.cursor == self.script.last_position();

        if !is_final {
            self.preview_at_end |= reached_end;
        } else if !self.complete && (reached_end || self.preview_at_end) {
            // A final result confirms an interim preview that reached the end.
            self.mark_complete();
        }
    }

    /// Move the cursor to `index` regardless of direction.
    ///
    /// Buffered speech is dropped so the next update aligns relative to the
    /// new position only. An index past the end is clamped to the last word.
    pub fn jump_to(&mut self, index: usize) {
        let previous = self.cursor;
        let target = self.script.last_position().map(|last| {
            if index > last {
                tracing::warn!(index, last, "Jump target past end of script, clamping");
            }
            index.min(last)
        });

        self.cursor = target;
        self.history.clear();
        self.interim.clear();
        self.preview_at_end = false;
        self.complete = false;

        tracing::debug!(?previous, cursor = ?target, "Cursor jumped");
        emit_event(
            self.bus.as_ref(),
            event_names::CURSOR_JUMPED,
            &CursorJumpedEvent {
                session_id: self.id,
                previous,
                cursor: target,
            },
        );
    }

    /// Restart tracking from the top of the current script.
    pub fn reset(&mut self) {
        self.clear_progress();

        tracing::debug!(session_id = %self.id, "Tracker reset");
        emit_event(
            self.bus.as_ref(),
            event_names::TRACKER_RESET,
            &TrackerResetEvent {
                session_id: self.id,
            },
        );
    }

    /// Swap matching parameters. Takes effect on the next update; the history
    /// keeps its newest words that fit the new capacity.
    pub fn set_settings(&mut self, settings: TrackerSettings) {
        self.settings = settings.sanitized();
        self.history.resize(self.settings.history_capacity);
    }

    // --- Accessors ---

    /// Changes on every script load.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn tokens(&self) -> &[ScriptToken] {
        self.script.tokens()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Script word under the cursor.
    pub fn current_token(&self) -> Option<&ScriptToken> {
        self.cursor.and_then(|c| self.script.get(c))
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn spoken_history(&self) -> Vec<&str> {
        self.history.iter().collect()
    }

    pub fn interim_words(&self) -> &[String] {
        &self.interim
    }

    pub fn state(&self) -> TrackingState {
        if self.script.is_empty() {
            TrackingState::Empty
        } else if self.complete {
            TrackingState::Complete
        } else if self.cursor.is_none() {
            TrackingState::Ready
        } else {
            TrackingState::Tracking
        }
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            session_id: self.id,
            state: self.state(),
            cursor: self.cursor,
            complete: self.complete,
            token_count: self.script.len(),
        }
    }

    // --- Private helpers ---

    /// Returns true if the cursor moved.
    fn commit(&mut self, found: WindowMatch, preview: bool) -> bool {
        if self.cursor.is_some_and(|c| found.position <= c) {
            return false;
        }

        let previous = self.cursor.replace(found.position);
        let surface = self
            .script
            .get(found.position)
            .map(|t| t.surface.clone())
            .unwrap_or_default();

        tracing::debug!(
            ?previous,
            cursor = found.position,
            score = found.score,
            preview,
            word = %surface,
            "Cursor advanced"
        );
        emit_event(
            self.bus.as_ref(),
            event_names::CURSOR_MOVED,
            &CursorMovedEvent {
                session_id: self.id,
                previous,
                cursor: found.position,
                surface,
                preview,
            },
        );
        true
    }

    fn mark_complete(&mut self) {
        self.complete = true;
        self.preview_at_end = false;
        let cursor = self.cursor.unwrap_or_default();

        tracing::info!(session_id = %self.id, cursor, "Reached end of script");
        emit_event(
            self.bus.as_ref(),
            event_names::TRACKING_COMPLETE,
            &TrackingCompleteEvent {
                session_id: self.id,
                cursor,
            },
        );
    }

    fn clear_progress(&mut self) {
        self.cursor = None;
        self.history.clear();
        self.interim.clear();
        self.preview_at_end = false;
        self.complete = false;
    }
}

impl std::fmt::Debug for TrackerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSession")
            .field("id", &self.id)
            .field("tokens", &self.script.len())
            .field("cursor", &self.cursor)
            .field("history", &self.history)
            .field("interim", &self.interim)
            .field("complete", &self.complete)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
