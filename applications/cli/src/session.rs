//! Interactive playback session
//!
//! Runs the engine on the main task: stdin lines become commands, a ticker
//! drives the virtual deck, and device events are pumped after every step.

use crate::output::VirtualDeck;
use crate::repl::{self, Flow, HELP};
use anyhow::Context;
use aria_playback::{PlaybackEngine, PlaybackEvent, Track};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Read a queue file: a JSON array of catalog song records
pub fn read_queue_file(path: &Path) -> anyhow::Result<Vec<Track>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read queue file {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse queue file {}", path.display()))?;
    Ok(tracks)
}

pub struct Session {
    engine: PlaybackEngine,
    deck: VirtualDeck,
    tick: Duration,
}

impl Session {
    pub fn new(engine: PlaybackEngine, deck: VirtualDeck, tick: Duration) -> Self {
        Self { engine, deck, tick }
    }

    /// Start playback of `tracks` at `start`
    pub fn start(&mut self, tracks: Vec<Track>, start: usize) {
        self.deck.register_all(&tracks);
        self.engine.play_queue(tracks, start);
        self.settle();
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    /// Advance the virtual clock by one tick
    pub fn tick(&mut self) {
        self.deck.advance(self.tick);
        self.settle();
    }

    /// Handle one prompt line
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let flow = match repl::parse_line(line) {
            Ok(Some(input)) => repl::apply(&mut self.engine, input),
            Ok(None) => Flow::Continue,
            Err(e) => {
                println!("{}\n{}", e, HELP);
                Flow::Continue
            }
        };
        self.settle();
        flow
    }

    /// Run until `quit`, end of input or Ctrl-C
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        println!("{}", repl::status_line(&self.engine));

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(),
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        debug!("stdin closed");
                        break;
                    };
                    if self.handle_line(&line) == Flow::Quit {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }

        info!("Session ended");
        Ok(())
    }

    /// Apply pending device events and log what changed
    fn settle(&mut self) {
        self.engine.pump_device_events();
        for event in self.engine.drain_events() {
            log_event(&self.engine, &event);
        }
    }
}

fn log_event(engine: &PlaybackEngine, event: &PlaybackEvent) {
    match event {
        PlaybackEvent::TrackChanged { track_id, index } => {
            let title = engine
                .queue()
                .get(*index)
                .map(|t| format!("{} - {}", t.artist_name, t.title))
                .unwrap_or_default();
            info!(track_id = %track_id, index, "Now playing {}", title);
        }
        PlaybackEvent::StatusChanged { status } => info!(?status, "Status changed"),
        PlaybackEvent::QueueChanged { length } => debug!(length, "Queue changed"),
        PlaybackEvent::VolumeChanged { level } => info!(level, "Volume changed"),
        PlaybackEvent::ShuffleChanged { enabled } => info!(enabled, "Shuffle changed"),
        PlaybackEvent::RepeatChanged { mode } => info!(?mode, "Repeat changed"),
        PlaybackEvent::PlayReported { track_id } => debug!(track_id = %track_id, "Play reported"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::virtual_output;
    use aria_playback::{EngineStatus, PlaybackConfig, RepeatMode};

    const QUEUE: &str = r#"[
        {"id":"A","title":"Alpha","artistName":"Neon","audioURL":"mem://A","duration":30},
        {"id":"B","title":"Beta","artistName":"Neon","audioURL":"mem://B","duration":40},
        {"id":"C","title":"Gamma","artistName":"Neon","audioURL":"mem://C","duration":20}
    ]"#;

    fn session(config: PlaybackConfig) -> Session {
        let (output, deck) = virtual_output();
        let mut engine = PlaybackEngine::new(config);
        engine.attach(Box::new(output));
        Session::new(engine, deck, Duration::from_secs(1))
    }

    fn queue() -> Vec<Track> {
        serde_json::from_str(QUEUE).unwrap()
    }

    #[test]
    fn reads_queue_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        std::fs::write(&path, QUEUE).unwrap();

        let tracks = read_queue_file(&path).unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[1].audio_url, "mem://B");
    }

    #[test]
    fn bad_queue_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(read_queue_file(&path).is_err());
        assert!(read_queue_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn repeat_all_wraps_around_queue() {
        let mut session = session(PlaybackConfig {
            repeat: RepeatMode::All,
            ..PlaybackConfig::default()
        });
        session.start(queue(), 0);

        for _ in 0..30 {
            session.tick();
        }
        assert_eq!(session.engine().current_track().unwrap().id, "B");
        assert_eq!(session.engine().progress(), 0.0);

        for _ in 0..40 {
            session.tick();
        }
        assert_eq!(session.engine().current_track().unwrap().id, "C");

        for _ in 0..20 {
            session.tick();
        }
        assert_eq!(session.engine().current_track().unwrap().id, "A");
        assert_eq!(session.engine().status(), EngineStatus::Playing);
    }

    #[test]
    fn prompt_lines_drive_engine() {
        let mut session = session(PlaybackConfig::default());
        session.start(queue(), 0);

        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.handle_line("prev"), Flow::Continue);
        assert_eq!(session.engine().transport().index, Some(0));
        assert_eq!(session.engine().progress(), 0.0);

        session.handle_line("next");
        session.handle_line("pause");
        assert_eq!(session.engine().current_track().unwrap().id, "B");
        assert_eq!(session.engine().status(), EngineStatus::Paused);

        session.tick();
        assert_eq!(session.engine().progress(), 0.0);

        session.handle_line("bogus");
        assert_eq!(session.handle_line("quit"), Flow::Quit);
    }
}
