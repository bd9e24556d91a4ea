//! Playback engine - core orchestration
//!
//! Owns the queue and transport state, drives the attached output device
//! and reacts to its events (progress, duration, end of track).

use crate::{
    command::Command,
    error::Result,
    events::PlaybackEvent,
    output::{AudioOutput, DeviceEvent, EventSender},
    queue::Queue,
    report::{PlayReporter, ReportGate},
    shuffle::pick_shuffled_index,
    types::{EngineStatus, PlaybackConfig, RepeatMode, Track, TransportState},
    volume::Volume,
};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

/// An attached device and the receiving end of its event channel
struct Attachment {
    device: Box<dyn AudioOutput>,
    events: Receiver<DeviceEvent>,
}

impl Attachment {
    /// Drop events the device queued for the source being replaced
    fn discard_pending(&self) -> usize {
        self.events.try_iter().count()
    }
}

/// Why the queue is being advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    /// User pressed next
    Explicit,
    /// Device reported end of track
    Natural,
}

/// Central playback management
///
/// States:
/// - `Idle`: no current track
/// - `Paused`: track loaded, not playing
/// - `Playing`: track loaded and playing
///
/// Every command is infallible from the caller's point of view. Device
/// failures are logged and folded into the transport state; invalid
/// arguments are clamped or ignored.
///
/// The engine is meant to live on one thread (the UI thread). Device events
/// travel through a channel created on [`attach`](Self::attach) and are
/// applied when the owner calls [`pump_device_events`](Self::pump_device_events).
pub struct PlaybackEngine {
    config: PlaybackConfig,

    // Queue and transport
    queue: Queue,
    playing: bool,
    shuffle: bool,
    repeat: RepeatMode,
    volume: Volume,
    progress: f64,
    duration: f64,

    // Play reporting
    report_gate: ReportGate,
    reporter: Option<Box<dyn PlayReporter>>,

    // Output device
    output: Option<Attachment>,

    // Shuffle picks
    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create a new engine with no device and an empty queue
    pub fn new(config: PlaybackConfig) -> Self {
        let config = config.sanitized();

        Self {
            queue: Queue::new(),
            playing: false,
            shuffle: config.shuffle,
            repeat: config.repeat,
            volume: Volume::new(config.initial_volume),
            progress: 0.0,
            duration: 0.0,
            report_gate: ReportGate::default(),
            reporter: None,
            output: None,
            rng: StdRng::from_entropy(),
            pending_events: Vec::new(),
            config,
        }
    }

    /// Set the play reporter
    pub fn with_reporter(mut self, reporter: Box<dyn PlayReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Seed the shuffle picker (reproducible shuffle order)
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the play reporter
    pub fn set_reporter(&mut self, reporter: Option<Box<dyn PlayReporter>>) {
        self.reporter = reporter;
    }

    // ===== Device attachment =====

    /// Attach an output device
    ///
    /// Registers a fresh event channel with the device and pushes the
    /// current volume. If a track is active it is loaded into the new device
    /// at the current position and resumed if the engine was playing.
    /// A previously attached device is detached and returned.
    pub fn attach(&mut self, mut device: Box<dyn AudioOutput>) -> Option<Box<dyn AudioOutput>> {
        let previous = self.detach();

        let (sender, events) = EventSender::channel();
        device.connect(sender);
        device.set_volume(self.volume.level());
        self.output = Some(Attachment { device, events });
        debug!("Output device attached");

        if let Some(uri) = self.current_uri() {
            let before = self.status();
            let position = self.progress;
            let resume = self.playing;

            if let Some(output) = self.output.as_mut() {
                match output.device.load(&uri) {
                    Ok(()) => {
                        output.device.seek_to(position);
                        if resume {
                            if let Err(e) = output.device.play() {
                                warn!(error = %e, "Playback rejected after attach");
                                self.playing = false;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(uri = %uri, error = %e, "Failed to load source after attach");
                        self.playing = false;
                    }
                }
            }
            self.emit_status_if_changed(before);
        }

        previous
    }

    /// Detach the output device
    ///
    /// The device is told to drop its event sender and the receiving end is
    /// closed, so nothing the device still holds can reach this engine.
    pub fn detach(&mut self) -> Option<Box<dyn AudioOutput>> {
        let Attachment { mut device, events } = self.output.take()?;
        device.disconnect();
        drop(events);
        debug!("Output device detached");
        Some(device)
    }

    /// Whether an output device is attached
    pub fn is_attached(&self) -> bool {
        self.output.is_some()
    }

    // ===== Playback Control =====

    /// Play a single track now
    ///
    /// The queue becomes `[track]`.
    pub fn play_track(&mut self, track: Track) {
        debug!(track_id = %track.id, "Play track");
        self.queue.replace_single(track);
        self.emit_queue_changed();
        self.activate(0);
    }

    /// Replace the queue and start playing at `start`
    ///
    /// An empty list is ignored; an out-of-range `start` is clamped to the
    /// last entry.
    pub fn play_queue(&mut self, tracks: Vec<Track>, start: usize) {
        let requested = start;
        let Some(index) = self.queue.replace(tracks, start) else {
            debug!("Ignoring play_queue with an empty track list");
            return;
        };
        if index != requested {
            debug!(requested, clamped = index, "Start index out of range, clamped");
        }

        self.emit_queue_changed();
        self.activate(index);
    }

    /// Append a track to the queue
    pub fn add_to_queue(&mut self, track: Track) {
        self.queue.push(track);
        self.emit_queue_changed();
    }

    /// Remove a queue entry other than the active one
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Track> {
        let removed = self.queue.remove(index)?;
        self.emit_queue_changed();
        Some(removed)
    }

    /// Flip between playing and paused
    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if !self.playing || self.queue.current().is_none() {
            return;
        }

        let before = self.status();
        if let Some(output) = self.output.as_mut() {
            output.device.pause();
        }
        self.playing = false;
        self.emit_status_if_changed(before);
    }

    /// Resume playback
    ///
    /// If the device rejects playback the engine stays paused.
    pub fn resume(&mut self) {
        if self.playing || self.queue.current().is_none() {
            return;
        }

        let before = self.status();
        self.playing = self.start_device();
        self.emit_status_if_changed(before);
    }

    /// Skip to the next track
    ///
    /// Ignores repeat-one: an explicit skip always moves on.
    pub fn next(&mut self) {
        self.advance(Advance::Explicit);
    }

    /// Go to previous track
    ///
    /// Past the restart threshold (3 seconds by default) this restarts the
    /// current track instead. At the head of the queue it does nothing.
    pub fn previous(&mut self) {
        let Some(index) = self.queue.cursor() else {
            return;
        };

        if self.progress > self.config.restart_threshold_secs {
            debug!("Restarting current track");
            if let Some(output) = self.output.as_mut() {
                output.device.seek_to(0.0);
            }
            self.progress = 0.0;
            return;
        }

        if index > 0 {
            self.activate(index - 1);
        }
    }

    /// Seek within the current track (seconds)
    pub fn seek(&mut self, position_secs: f64) {
        if self.queue.current().is_none() || !position_secs.is_finite() {
            return;
        }

        let position = self.clamp_position(position_secs);
        if let Some(output) = self.output.as_mut() {
            output.device.seek_to(position);
        }
        self.progress = position;
        self.maybe_report_play();
    }

    // ===== Volume =====

    /// Set volume (0.0-1.0)
    ///
    /// Out-of-range levels are clamped, non-finite ones ignored.
    pub fn set_volume(&mut self, level: f32) {
        if !self.volume.set_level(level) {
            debug!(level, "Ignoring non-finite volume");
            return;
        }

        let level = self.volume.level();
        if let Some(output) = self.output.as_mut() {
            output.device.set_volume(level);
        }
        self.pending_events.push(PlaybackEvent::VolumeChanged { level });
    }

    /// Mute, or restore the configured level when muted
    ///
    /// Always restores `mute_restore_volume`, never the level that was
    /// active before muting.
    pub fn toggle_mute(&mut self) {
        let target = self.volume.toggled_mute(self.config.mute_restore_volume);
        self.set_volume(target);
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
    }

    /// Cycle repeat mode off -> all -> one -> off
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
        self.pending_events
            .push(PlaybackEvent::RepeatChanged { mode: self.repeat });
    }

    /// Route a UI command to its handler
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::PlayTrack(track) => self.play_track(track),
            Command::PlayQueue { tracks, start } => self.play_queue(tracks, start),
            Command::AddToQueue(track) => self.add_to_queue(track),
            Command::RemoveFromQueue(index) => {
                self.remove_from_queue(index);
            }
            Command::TogglePlay => self.toggle_play(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Seek(position) => self.seek(position),
            Command::SetVolume(level) => self.set_volume(level),
            Command::ToggleMute => self.toggle_mute(),
            Command::ToggleShuffle => self.toggle_shuffle(),
            Command::ToggleRepeat => self.toggle_repeat(),
        }
    }

    // ===== Device events =====

    /// Apply every event the attached device has emitted so far
    ///
    /// Returns the number of events handled.
    pub fn pump_device_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let Some(event) = self.output.as_ref().and_then(|o| o.events.try_recv().ok()) else {
                break;
            };
            self.handle_device_event(event);
            handled += 1;
        }
        handled
    }

    /// Apply a single device event
    ///
    /// Progress is accepted while paused so a seek settled by the device
    /// still moves the playhead.
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Progress(position) => {
                if self.queue.current().is_none() || !position.is_finite() {
                    return;
                }
                self.progress = self.clamp_position(position);
                self.maybe_report_play();
            }
            DeviceEvent::DurationKnown(duration) => {
                if !duration.is_finite() || duration < 0.0 {
                    return;
                }
                self.duration = duration;
                if duration > 0.0 && self.progress > duration {
                    self.progress = duration;
                }
            }
            DeviceEvent::Ended => {
                if self.playing {
                    self.advance(Advance::Natural);
                }
            }
            DeviceEvent::Failed(message) => {
                warn!(error = %message, "Output device reported a failure");
                let before = self.status();
                self.playing = false;
                self.emit_status_if_changed(before);
            }
        }
    }

    // ===== State Queries =====

    /// Current status
    pub fn status(&self) -> EngineStatus {
        if self.queue.current().is_none() {
            EngineStatus::Idle
        } else if self.playing {
            EngineStatus::Playing
        } else {
            EngineStatus::Paused
        }
    }

    /// Snapshot of the transport state
    pub fn transport(&self) -> TransportState {
        TransportState {
            index: self.queue.cursor(),
            playing: self.playing,
            shuffle: self.shuffle,
            repeat: self.repeat,
            volume: self.volume.level(),
            progress: self.progress,
            duration: self.duration,
        }
    }

    /// Active track
    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    /// The play queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Whether playback is active
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Elapsed seconds in the current track
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Duration reported by the device (0 until known)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Volume level (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Shuffle flag
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Engine configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Make `index` the active entry and start it from the top
    fn activate(&mut self, index: usize) {
        let before = self.status();
        if !self.queue.set_cursor(index) {
            return;
        }

        self.progress = 0.0;
        self.duration = 0.0;
        self.report_gate.reset();

        let Some(track) = self.queue.current() else {
            return;
        };
        let uri = track.audio_url.clone();
        let track_id = track.id.clone();
        info!(track_id = %track_id, index, "Activating track");

        self.playing = match self.output.as_mut() {
            Some(output) => match Self::reload(output, &uri) {
                Ok(()) => Self::play_device(output),
                Err(e) => {
                    warn!(uri = %uri, error = %e, "Failed to load source");
                    false
                }
            },
            None => true,
        };

        self.pending_events
            .push(PlaybackEvent::TrackChanged { track_id, index });
        self.emit_status_if_changed(before);
    }

    /// Load `uri`, superseding whatever the device had loaded
    fn reload(output: &mut Attachment, uri: &str) -> Result<()> {
        let stale = output.discard_pending();
        if stale > 0 {
            debug!(stale, "Discarded events from previous source");
        }
        output.device.load(uri)
    }

    /// Restart the active track in place (repeat-one)
    fn restart_current(&mut self) {
        let Some(index) = self.queue.cursor() else {
            return;
        };
        let Some(track_id) = self.queue.current().map(|t| t.id.clone()) else {
            return;
        };
        debug!(track_id = %track_id, "Repeat one: restarting track");

        let before = self.status();
        self.progress = 0.0;
        self.report_gate.reset();
        if let Some(output) = self.output.as_mut() {
            let stale = output.discard_pending();
            if stale > 0 {
                debug!(stale, "Discarded events from previous pass");
            }
            output.device.seek_to(0.0);
        }
        self.playing = self.start_device();

        self.pending_events
            .push(PlaybackEvent::TrackChanged { track_id, index });
        self.emit_status_if_changed(before);
    }

    /// Advance algorithm shared by `next` and natural end of track
    fn advance(&mut self, reason: Advance) {
        let len = self.queue.len();
        if len == 0 {
            return;
        }
        let Some(current) = self.queue.cursor() else {
            return;
        };

        if reason == Advance::Natural && self.repeat == RepeatMode::One {
            self.restart_current();
            return;
        }

        let candidate = if self.shuffle {
            pick_shuffled_index(&mut self.rng, len).unwrap_or(0)
        } else {
            current + 1
        };

        let next = if candidate < len {
            candidate
        } else if self.repeat == RepeatMode::All {
            0
        } else {
            self.stop_at_end();
            return;
        };

        self.activate(next);
    }

    /// End of queue without repeat: stay on the last track, paused
    fn stop_at_end(&mut self) {
        debug!("Reached end of queue");
        let before = self.status();
        if let Some(output) = self.output.as_mut() {
            output.device.pause();
        }
        self.playing = false;
        self.emit_status_if_changed(before);
    }

    /// Ask the device to play; `true` if playback started
    fn start_device(&mut self) -> bool {
        match self.output.as_mut() {
            Some(output) => Self::play_device(output),
            None => true,
        }
    }

    fn play_device(output: &mut Attachment) -> bool {
        match output.device.play() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Playback rejected by output device");
                false
            }
        }
    }

    fn maybe_report_play(&mut self) {
        let threshold = self.config.play_report_threshold_secs;
        if !self.report_gate.should_report(self.progress, threshold) {
            return;
        }
        let Some(track_id) = self.queue.current().map(|t| t.id.clone()) else {
            return;
        };

        debug!(track_id = %track_id, "Reporting play");
        if let Some(reporter) = self.reporter.as_ref() {
            reporter.report_play(&track_id);
        }
        self.pending_events
            .push(PlaybackEvent::PlayReported { track_id });
    }

    /// Clamp a position into `[0, duration]` (upper bound only once known)
    fn clamp_position(&self, position: f64) -> f64 {
        let position = position.max(0.0);
        if self.duration > 0.0 {
            position.min(self.duration)
        } else {
            position
        }
    }

    fn current_uri(&self) -> Option<String> {
        self.queue.current().map(|t| t.audio_url.clone())
    }

    fn emit_status_if_changed(&mut self, before: EngineStatus) {
        let status = self.status();
        if status != before {
            self.pending_events
                .push(PlaybackEvent::StatusChanged { status });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.detach();
    }
}
