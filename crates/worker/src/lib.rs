//! Serialized driver for a [`TrackerSession`].
//!
//! Recognizer callbacks and UI handlers run on different tasks, but the
//! tracker must see one update at a time against its current cursor. The
//! worker owns the session and drains a single bounded queue; everything else
//! talks to it through a cloneable [`TrackerHandle`] and observes it through a
//! watch channel of [`TrackerSnapshot`]s.
//!
//! [`TrackerSession`]: readalong_tracker::TrackerSession
//! [`TrackerSnapshot`]: readalong_events::TrackerSnapshot

mod recognizer;
mod worker;

pub use recognizer::{RecognizerEvent, RecognizerLifecycle, TranscriptUpdate};
pub use worker::{spawn_tracker, TrackerCommand, TrackerHandle, WorkerConfig};

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("tracker worker has stopped")]
    Closed,
}

pub type Result<T> = std::result::Result<T, WorkerError>;
