//! Aria headless player
//!
//! Plays a queue through a virtual output device and takes transport
//! commands from stdin. Plays are reported to the catalog like the
//! graphical clients do.

pub mod config;
pub mod output;
pub mod repl;
pub mod session;
