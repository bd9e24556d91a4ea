//! Audio output device seam
//!
//! The engine drives exactly one output device. Commands go out through the
//! [`AudioOutput`] trait; notifications come back as [`DeviceEvent`]s pushed
//! through an [`EventSender`] the engine hands over on attach.
//!
//! Registration is scoped: the sender is only live while the engine holds
//! the matching receiver. After [`crate::PlaybackEngine::detach`] (or when
//! the engine is dropped) every `emit` returns `false` and the event goes
//! nowhere.

use crate::error::Result;
use std::sync::mpsc::{Receiver, Sender};

/// Notifications emitted by an output device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Playhead moved (seconds into the current source)
    Progress(f64),

    /// Source metadata loaded, duration in seconds
    DurationKnown(f64),

    /// Current source played to its end
    Ended,

    /// Source failed to load or stopped with an error
    Failed(String),
}

/// Handle a device uses to deliver events to the attached engine
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<DeviceEvent>,
}

impl EventSender {
    pub(crate) fn channel() -> (Self, Receiver<DeviceEvent>) {
        let (tx, rx) = std::sync::mpsc::channel();
        (Self { tx }, rx)
    }

    /// Deliver an event
    ///
    /// Returns `false` once the engine has detached; the event is dropped.
    pub fn emit(&self, event: DeviceEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Platform audio sink
///
/// Implementors wrap whatever actually produces sound (a desktop stream, a
/// mobile media player, a virtual clock in tests). All methods are called on
/// the engine owner's thread.
pub trait AudioOutput {
    /// Register the event sender; called once per attach
    fn connect(&mut self, events: EventSender);

    /// Drop the event sender; called on detach
    fn disconnect(&mut self);

    /// Replace the current source
    ///
    /// Supersedes any load still in flight. Asynchronous failures are
    /// reported later as [`DeviceEvent::Failed`].
    fn load(&mut self, uri: &str) -> Result<()>;

    /// Start or resume playback of the loaded source
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Move the playhead (seconds)
    fn seek_to(&mut self, position_secs: f64);

    /// Set output level (0.0-1.0)
    fn set_volume(&mut self, level: f32);
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn connect(&mut self, events: EventSender) {
        (**self).connect(events);
    }

    fn disconnect(&mut self) {
        (**self).disconnect();
    }

    fn load(&mut self, uri: &str) -> Result<()> {
        (**self).load(uri)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek_to(&mut self, position_secs: f64) {
        (**self).seek_to(position_secs);
    }

    fn set_volume(&mut self, level: f32) {
        (**self).set_volume(level);
    }
}
