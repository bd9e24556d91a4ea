//! Clocked virtual output device
//!
//! Stands in for a real audio sink: it knows each source's length and moves a
//! virtual playhead forward whenever the host calls [`VirtualDeck::advance`].
//! Progress, duration and end-of-track are reported through the registered
//! event sender, exactly like an asynchronous device would.

use aria_playback::{AudioOutput, DeviceError, DeviceEvent, EventSender, Result, Track};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct DeckState {
    /// Known source lengths by URI, in seconds
    lengths: HashMap<String, f64>,
    sender: Option<EventSender>,
    loaded: Option<Loaded>,
    playing: bool,
    volume: f32,
}

#[derive(Debug)]
struct Loaded {
    uri: String,
    length: f64,
    position: f64,
}

impl DeckState {
    fn emit(&self, event: DeviceEvent) {
        if let Some(sender) = &self.sender {
            sender.emit(event);
        }
    }
}

/// The [`AudioOutput`] half, handed to the engine
pub struct VirtualOutput {
    state: Rc<RefCell<DeckState>>,
}

/// The host half, used to register sources and drive the clock
#[derive(Clone)]
pub struct VirtualDeck {
    state: Rc<RefCell<DeckState>>,
}

/// Create a connected output/deck pair
pub fn virtual_output() -> (VirtualOutput, VirtualDeck) {
    let state = Rc::new(RefCell::new(DeckState {
        volume: 1.0,
        ..DeckState::default()
    }));
    (
        VirtualOutput {
            state: state.clone(),
        },
        VirtualDeck { state },
    )
}

impl VirtualDeck {
    /// Make a track's source loadable, using its catalog duration
    pub fn register(&self, track: &Track) {
        self.state
            .borrow_mut()
            .lengths
            .insert(track.audio_url.clone(), f64::from(track.duration));
    }

    /// Register every track in `tracks`
    pub fn register_all<'a>(&self, tracks: impl IntoIterator<Item = &'a Track>) {
        for track in tracks {
            self.register(track);
        }
    }

    /// Move the playhead forward by `elapsed` if playing
    ///
    /// Emits a progress event, then an ended event once the source is done.
    pub fn advance(&self, elapsed: Duration) {
        let mut state = self.state.borrow_mut();
        if !state.playing {
            return;
        }
        let Some(loaded) = state.loaded.as_mut() else {
            return;
        };

        loaded.position = (loaded.position + elapsed.as_secs_f64()).min(loaded.length);
        let position = loaded.position;
        let finished = position >= loaded.length;

        state.emit(DeviceEvent::Progress(position));
        if finished {
            state.playing = false;
            state.emit(DeviceEvent::Ended);
        }
    }

    /// Whether the deck is currently playing
    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Playhead of the loaded source, in seconds
    pub fn position(&self) -> Option<f64> {
        self.state.borrow().loaded.as_ref().map(|l| l.position)
    }

    /// URI of the loaded source
    pub fn loaded_uri(&self) -> Option<String> {
        self.state.borrow().loaded.as_ref().map(|l| l.uri.clone())
    }

    /// Last volume set by the engine
    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }
}

impl AudioOutput for VirtualOutput {
    fn connect(&mut self, events: EventSender) {
        self.state.borrow_mut().sender = Some(events);
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.sender = None;
        state.playing = false;
    }

    fn load(&mut self, uri: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.loaded = None;

        let length = match state.lengths.get(uri) {
            Some(length) if *length > 0.0 => *length,
            _ => return Err(DeviceError::Load(format!("unknown source {}", uri))),
        };

        debug!(uri = %uri, length, "Virtual source loaded");
        state.loaded = Some(Loaded {
            uri: uri.to_string(),
            length,
            position: 0.0,
        });
        state.emit(DeviceEvent::DurationKnown(length));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.loaded.is_none() {
            return Err(DeviceError::NoSource);
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn seek_to(&mut self, position_secs: f64) {
        let mut state = self.state.borrow_mut();
        if let Some(loaded) = state.loaded.as_mut() {
            loaded.position = position_secs.clamp(0.0, loaded.length);
        }
    }

    fn set_volume(&mut self, level: f32) {
        self.state.borrow_mut().volume = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aria_playback::{EngineStatus, PlaybackEngine};

    fn track(id: &str, duration: u32) -> Track {
        Track {
            id: id.to_string(),
            title: id.to_string(),
            artist_name: "Artist".to_string(),
            audio_url: format!("mem://{}", id),
            duration,
            ..Track::default()
        }
    }

    #[test]
    fn unknown_source_fails_to_load() {
        let (mut output, _deck) = virtual_output();
        assert!(matches!(output.load("mem://x"), Err(DeviceError::Load(_))));
        assert!(matches!(output.play(), Err(DeviceError::NoSource)));
    }

    #[test]
    fn paused_deck_does_not_advance() {
        let (mut output, deck) = virtual_output();
        deck.register(&track("a", 10));
        output.load("mem://a").unwrap();

        deck.advance(Duration::from_secs(3));
        assert_eq!(deck.position(), Some(0.0));

        output.play().unwrap();
        deck.advance(Duration::from_secs(3));
        assert_eq!(deck.position(), Some(3.0));
    }

    #[test]
    fn engine_follows_virtual_clock() {
        let (output, deck) = virtual_output();
        let tracks = vec![track("a", 2), track("b", 3)];
        deck.register_all(&tracks);

        let mut engine = PlaybackEngine::default();
        engine.attach(Box::new(output));
        engine.play_queue(tracks, 0);
        engine.pump_device_events();
        assert_eq!(engine.duration(), 2.0);
        assert_eq!(deck.volume(), 0.7);

        deck.advance(Duration::from_secs(1));
        engine.pump_device_events();
        assert_eq!(engine.progress(), 1.0);

        deck.advance(Duration::from_secs(1));
        engine.pump_device_events();
        assert_eq!(engine.current_track().unwrap().id, "b");
        assert_eq!(deck.loaded_uri().as_deref(), Some("mem://b"));

        deck.advance(Duration::from_secs(5));
        engine.pump_device_events();
        assert_eq!(engine.status(), EngineStatus::Paused);
        assert_eq!(engine.transport().index, Some(1));
        assert!(!deck.is_playing());
    }

    #[test]
    fn detached_deck_stays_silent() {
        let (output, deck) = virtual_output();
        deck.register(&track("a", 10));

        let mut engine = PlaybackEngine::default();
        engine.attach(Box::new(output));
        engine.play_track(track("a", 10));
        engine.pump_device_events();

        engine.detach();
        deck.advance(Duration::from_secs(1));
        assert_eq!(engine.pump_device_events(), 0);
        assert_eq!(engine.progress(), 0.0);
    }
}
