//! Replays recorded recognizer output through a tracker worker.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use readalong_events::{event_names, CursorMovedEvent, EventBus};
use readalong_tracker::{TrackerSession, TrackerSettings};
use readalong_worker::{spawn_tracker, RecognizerEvent, WorkerConfig};

/// Parse a JSON-lines recording. Blank lines are skipped.
pub fn read_events(path: &Path) -> anyhow::Result<Vec<RecognizerEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    parse_events(&text).with_context(|| format!("invalid transcript {}", path.display()))
}

fn parse_events(text: &str) -> anyhow::Result<Vec<RecognizerEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))
        })
        .collect()
}

/// Prints cursor moves as they happen and keeps a count.
struct ConsoleEventBus {
    show_previews: bool,
    moves: Mutex<usize>,
}

impl EventBus for ConsoleEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        match topic {
            event_names::CURSOR_MOVED => {
                let Ok(event) = serde_json::from_value::<CursorMovedEvent>(payload) else {
                    return;
                };
                if let Ok(mut moves) = self.moves.lock() {
                    *moves += 1;
                }
                if event.preview && !self.show_previews {
                    return;
                }
                let kind = if event.preview { "preview" } else { "final" };
                println!("{:>7} {:>5}  {}", kind, event.cursor, event.surface);
            }
            event_names::TRACKING_COMPLETE => println!("{:>7}", "done"),
            _ => {}
        }
    }
}

/// Outcome of a replay.
#[derive(Debug)]
pub struct ReplaySummary {
    pub token_count: usize,
    pub cursor: Option<usize>,
    pub complete: bool,
    pub events: usize,
    pub moves: usize,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reached = self.cursor.map_or(0, |c| c + 1);
        let percent = if self.token_count == 0 {
            0.0
        } else {
            reached as f64 * 100.0 / self.token_count as f64
        };
        write!(
            f,
            "{} events, {} cursor moves, reached {}/{} words ({:.1}%){}",
            self.events,
            self.moves,
            reached,
            self.token_count,
            percent,
            if self.complete { ", complete" } else { "" }
        )
    }
}

pub async fn run(
    script: &str,
    events: Vec<RecognizerEvent>,
    settings: TrackerSettings,
    show_previews: bool,
) -> anyhow::Result<ReplaySummary> {
    let bus = Arc::new(ConsoleEventBus {
        show_previews,
        moves: Mutex::new(0),
    });
    let session = TrackerSession::with_settings(settings).with_event_bus(bus.clone());
    let (handle, task) = spawn_tracker(session, WorkerConfig::default());

    handle.load_script(script).await?;
    let forwarded = handle
        .forward_recognizer(futures::stream::iter(events))
        .await?;
    drop(handle);

    let session = task.await.context("tracker worker panicked")?;
    let moves = bus.moves.lock().map(|m| *m).unwrap_or_default();

    Ok(ReplaySummary {
        token_count: session.tokens().len(),
        cursor: session.cursor(),
        complete: session.is_complete(),
        events: forwarded,
        moves,
    })
}
