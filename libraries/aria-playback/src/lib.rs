//! Aria - Playback Engine
//!
//! Platform-agnostic playback queue and transport for Aria.
//!
//! This crate provides:
//! - An ordered play queue with a cursor on the active track
//! - Transport control (play/pause, next/previous, seek)
//! - Volume with a fixed-level mute toggle
//! - Shuffle (random pick) and repeat modes (Off, All, One)
//! - Play reporting once a track has been listened to for a few seconds
//!
//! # Architecture
//!
//! `aria-playback` knows nothing about networking or audio decoding:
//! - Sound comes from an [`AudioOutput`] the host attaches
//! - Play counts go to a [`PlayReporter`] the host installs
//! - UI state is read from [`PlaybackEngine::transport`] and the events
//!   returned by [`PlaybackEngine::drain_events`]
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use aria_playback::{EngineStatus, PlaybackConfig, PlaybackEngine, Track};
//!
//! let mut engine = PlaybackEngine::new(PlaybackConfig::default());
//!
//! let track = Track {
//!     id: "s1".to_string(),
//!     title: "My Song".to_string(),
//!     artist_name: "Artist Name".to_string(),
//!     audio_url: "https://cdn.example.com/s1.mp3".to_string(),
//!     duration: 180,
//!     ..Track::default()
//! };
//!
//! engine.play_track(track);
//! assert_eq!(engine.status(), EngineStatus::Playing);
//!
//! engine.toggle_play();
//! assert_eq!(engine.status(), EngineStatus::Paused);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use aria_playback::{AudioOutput, DeviceEvent, EventSender, PlaybackEngine, Result};
//!
//! struct MyOutput {
//!     events: Option<EventSender>,
//! }
//!
//! impl AudioOutput for MyOutput {
//!     fn connect(&mut self, events: EventSender) {
//!         self.events = Some(events);
//!     }
//!
//!     fn disconnect(&mut self) {
//!         self.events = None;
//!     }
//!
//!     fn load(&mut self, _uri: &str) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn pause(&mut self) {}
//!     fn seek_to(&mut self, _position_secs: f64) {}
//!     fn set_volume(&mut self, _level: f32) {}
//! }
//!
//! let mut engine = PlaybackEngine::default();
//! engine.attach(Box::new(MyOutput { events: None }));
//!
//! // In the host's event loop
//! engine.pump_device_events();
//! for event in engine.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```

mod command;
mod engine;
mod error;
mod events;
mod output;
mod queue;
mod report;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use command::Command;
pub use engine::PlaybackEngine;
pub use error::{DeviceError, Result};
pub use events::PlaybackEvent;
pub use output::{AudioOutput, DeviceEvent, EventSender};
pub use queue::Queue;
pub use report::PlayReporter;
pub use shuffle::pick_shuffled_index;
pub use types::{
    EngineStatus, PlaybackConfig, RepeatMode, Track, TrackProvenance, TransportState,
    DEFAULT_VOLUME,
};
pub use volume::Volume;
