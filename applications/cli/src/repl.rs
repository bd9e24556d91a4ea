//! Line-oriented command prompt
//!
//! Each stdin line is one command. Parsing is kept separate from applying so
//! both halves can be exercised without a terminal.

use aria_playback::{Command, EngineStatus, PlaybackEngine, RepeatMode};
use thiserror::Error;

/// Help text printed for `help` and after a parse error
pub const HELP: &str = "\
commands:
  play | pause | toggle     transport
  next | prev               skip forward / back (prev restarts after 3s)
  seek <seconds>            move the playhead
  vol <0..1>                set volume
  mute                      mute / restore
  shuffle | repeat          toggle shuffle / cycle repeat
  add <index>               queue another copy of an entry
  remove <index>            drop a queue entry
  status                    print transport state
  quit";

/// One parsed prompt line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Forward to the engine
    Engine(Command),
    /// Append a copy of the queue entry at this index
    Requeue(usize),
    /// Print transport state
    Status,
    /// Print help
    Help,
    /// Leave the session
    Quit,
}

/// Whether the session keeps running after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid number {value:?} for {command}")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },
}

/// Parse a prompt line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let input = match word.to_ascii_lowercase().as_str() {
        "play" | "resume" => Input::Engine(Command::Resume),
        "pause" => Input::Engine(Command::Pause),
        "toggle" | "p" => Input::Engine(Command::TogglePlay),
        "next" | "n" => Input::Engine(Command::Next),
        "prev" | "previous" => Input::Engine(Command::Previous),
        "seek" => Input::Engine(Command::Seek(number("seek", arg)?)),
        "vol" | "volume" => Input::Engine(Command::SetVolume(number("vol", arg)?)),
        "mute" => Input::Engine(Command::ToggleMute),
        "shuffle" => Input::Engine(Command::ToggleShuffle),
        "repeat" => Input::Engine(Command::ToggleRepeat),
        "add" => Input::Requeue(number("add", arg)?),
        "remove" | "rm" => Input::Engine(Command::RemoveFromQueue(number("remove", arg)?)),
        "status" | "s" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(input))
}

fn number<T: std::str::FromStr>(command: &'static str, arg: Option<&str>) -> Result<T, InputError> {
    let value = arg.ok_or(InputError::MissingArgument(command))?;
    value.parse().map_err(|_| InputError::InvalidNumber {
        command,
        value: value.to_string(),
    })
}

/// Apply a parsed line to the engine
pub fn apply(engine: &mut PlaybackEngine, input: Input) -> Flow {
    match input {
        Input::Engine(command) => engine.dispatch(command),
        Input::Requeue(index) => match engine.queue().get(index).cloned() {
            Some(track) => engine.add_to_queue(track),
            None => println!("no queue entry {}", index),
        },
        Input::Status => println!("{}", status_line(engine)),
        Input::Help => println!("{}", HELP),
        Input::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// One-line transport summary
pub fn status_line(engine: &PlaybackEngine) -> String {
    let state = engine.transport();
    let status = match engine.status() {
        EngineStatus::Idle => "idle",
        EngineStatus::Paused => "paused",
        EngineStatus::Playing => "playing",
    };
    let repeat = match state.repeat {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    };

    let track = match (engine.current_track(), state.index) {
        (Some(track), Some(index)) => format!(
            "[{}/{}] {} - {}",
            index + 1,
            engine.queue().len(),
            track.artist_name,
            track.title
        ),
        _ => "nothing queued".to_string(),
    };

    format!(
        "{} {} {}/{} vol {:.2} shuffle {} repeat {}",
        status,
        track,
        format_time(state.progress),
        format_time(state.duration),
        state.volume,
        if state.shuffle { "on" } else { "off" },
        repeat
    )
}

/// Seconds as m:ss
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
