//! Tracker task and its handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::{Stream, StreamExt};
use readalong_events::TrackerSnapshot;
use readalong_tracker::{TrackerSession, TrackerSettings};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::recognizer::{RecognizerEvent, TranscriptUpdate};
use crate::{Result, WorkerError};

/// Default number of queued inputs before senders wait.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Presentation-layer commands.
#[derive(Debug, Clone)]
pub enum TrackerCommand {
    LoadScript(String),
    JumpTo(usize),
    Reset,
    UpdateSettings(TrackerSettings),
}

#[derive(Debug)]
enum TrackerInput {
    Recognizer(RecognizerEvent),
    Command(TrackerCommand),
}

/// Configuration for the tracker worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Cloneable front end of a running tracker worker.
#[derive(Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<TrackerInput>,
    snapshots: watch::Receiver<TrackerSnapshot>,
    cancel_token: CancellationToken,
    dropped_updates: Arc<AtomicU64>,
}

/// Spawn a task that owns `session` and applies queued inputs in order.
///
/// The task ends when every handle is dropped (after draining the queue) or
/// when [`TrackerHandle::stop`] is called, and yields the session back.
pub fn spawn_tracker(
    session: TrackerSession,
    config: WorkerConfig,
) -> (TrackerHandle, JoinHandle<TrackerSession>) {
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
    let cancel_token = CancellationToken::new();

    tracing::debug!(capacity = config.queue_capacity, "Created tracker queue");

    let task = tokio::spawn(run(session, rx, snapshot_tx, cancel_token.child_token()));

    let handle = TrackerHandle {
        tx,
        snapshots,
        cancel_token,
        dropped_updates: Arc::new(AtomicU64::new(0)),
    };
    (handle, task)
}

async fn run(
    mut session: TrackerSession,
    mut rx: mpsc::Receiver<TrackerInput>,
    snapshot_tx: watch::Sender<TrackerSnapshot>,
    cancel_token: CancellationToken,
) -> TrackerSession {
    tracing::info!(session_id = %session.id(), "Tracker worker started");
    let mut processed = 0u64;

    loop {
        let input = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                tracing::info!("Tracker worker cancelled");
                break;
            }
            input = rx.recv() => input,
        };

        let Some(input) = input else {
            tracing::debug!("All tracker handles dropped");
            break;
        };

        apply(&mut session, input);
        processed += 1;

        let snapshot = session.snapshot();
        snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    tracing::info!(processed, "Tracker worker stopped");
    session
}

fn apply(session: &mut TrackerSession, input: TrackerInput) {
    match input {
        TrackerInput::Recognizer(RecognizerEvent::Transcript(update)) => {
            session.ingest_speech(&update.text, update.is_final);
        }
        TrackerInput::Recognizer(RecognizerEvent::Error { message }) => {
            tracing::warn!(%message, "Recognizer reported an error");
        }
        TrackerInput::Recognizer(RecognizerEvent::Lifecycle { state }) => {
            tracing::info!(?state, "Recognizer lifecycle changed");
        }
        TrackerInput::Command(TrackerCommand::LoadScript(text)) => session.load_script(&text),
        TrackerInput::Command(TrackerCommand::JumpTo(index)) => session.jump_to(index),
        TrackerInput::Command(TrackerCommand::Reset) => session.reset(),
        TrackerInput::Command(TrackerCommand::UpdateSettings(settings)) => {
            session.set_settings(settings);
        }
    }
}

impl TrackerHandle {
    // --- Recognizer side ---

    /// Queue a recognizer event, waiting for space if the queue is full.
    pub async fn send_event(&self, event: RecognizerEvent) -> Result<()> {
        self.send(TrackerInput::Recognizer(event)).await
    }

    pub async fn ingest_speech(&self, text: impl Into<String>, is_final: bool) -> Result<()> {
        self.send_event(RecognizerEvent::Transcript(TranscriptUpdate {
            text: text.into(),
            is_final,
        }))
        .await
    }

    /// Queue a transcript without waiting, for synchronous recognizer callbacks.
    ///
    /// Returns false if the update was dropped (queue full or worker gone).
    /// Dropping an interim update is harmless; a dropped final loses words.
    pub fn try_ingest_speech(&self, text: impl Into<String>, is_final: bool) -> bool {
        let input = TrackerInput::Recognizer(RecognizerEvent::Transcript(TranscriptUpdate {
            text: text.into(),
            is_final,
        }));

        match self.tx.try_send(input) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                let dropped = self.dropped_updates.fetch_add(1, Ordering::Relaxed) + 1;
                // Rate-limit logging: only log every 10th drop
                if dropped % 10 == 1 {
                    tracing::warn!(dropped, is_final, "Tracker queue full, dropping update");
                }
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("Tracker queue closed");
                false
            }
        }
    }

    /// Pipe a recognizer stream into the queue until it ends.
    ///
    /// Returns the number of events forwarded.
    pub async fn forward_recognizer<S>(&self, events: S) -> Result<usize>
    where
        S: Stream<Item = RecognizerEvent>,
    {
        futures::pin_mut!(events);
        let mut forwarded = 0;
        while let Some(event) = events.next().await {
            self.send_event(event).await?;
            forwarded += 1;
        }
        Ok(forwarded)
    }

    // --- Presentation side ---

    pub async fn load_script(&self, text: impl Into<String>) -> Result<()> {
        self.command(TrackerCommand::LoadScript(text.into())).await
    }

    pub async fn jump_to(&self, index: usize) -> Result<()> {
        self.command(TrackerCommand::JumpTo(index)).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.command(TrackerCommand::Reset).await
    }

    pub async fn update_settings(&self, settings: TrackerSettings) -> Result<()> {
        self.command(TrackerCommand::UpdateSettings(settings)).await
    }

    pub async fn command(&self, command: TrackerCommand) -> Result<()> {
        self.send(TrackerInput::Command(command)).await
    }

    // --- Observation ---

    /// Latest published snapshot.
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified whenever the snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.clone()
    }

    pub fn dropped_updates(&self) -> u64 {
        self.dropped_updates.load(Ordering::Relaxed)
    }

    // --- Lifecycle ---

    /// Stop the worker without draining queued inputs.
    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, input: TrackerInput) -> Result<()> {
        self.tx.send(input).await.map_err(|_| WorkerError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_drop_returns_session() {
        let (handle, task) = spawn_tracker(TrackerSession::new(), WorkerConfig::default());
        handle.load_script("one two three").await.unwrap();
        handle.ingest_speech("one two", true).await.unwrap();
        drop(handle);

        let session = task.await.unwrap();
        assert_eq!(session.cursor(), Some(1));
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised() {
        let config = WorkerConfig { queue_capacity: 0 };
        let (handle, task) = spawn_tracker(TrackerSession::new(), config);
        handle.load_script("one").await.unwrap();
        drop(handle);

        let session = task.await.unwrap();
        assert_eq!(session.tokens().len(), 1);
    }
}
