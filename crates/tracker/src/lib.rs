//! Read-along tracking: follows live speech through a reference script.
//!
//! [`TrackerSession`] owns the script, the cursor and the spoken-word
//! buffers. Each recognizer update runs a bounded [`search_window`] around the
//! cursor and commits the result only if it moves forward.

mod history;
mod search;
mod session;
mod settings;

pub use history::SpokenHistory;
pub use search::{next_cursor, search_window, WindowMatch};
pub use session::TrackerSession;
pub use settings::{
    Result, SettingsError, TrackerSettings, DEFAULT_ANCHOR_LEN, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_LOOKAHEAD, DEFAULT_LOOKBEHIND, DEFAULT_MIN_MATCH_LEN, DEFAULT_THRESHOLD,
};

pub use readalong_events::{TrackerSnapshot, TrackingState};
pub use readalong_script::{normalize, similarity, tokenize, Script, ScriptToken};
