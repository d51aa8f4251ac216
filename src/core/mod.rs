//! Core watch-and-reload types.

mod builder;
mod gate;
mod reloader;

pub use builder::{DEFAULT_WATCH_INTERVAL, ReloaderBuilder};
pub use gate::ChangeGate;
pub use reloader::{CycleOutcome, Reloader};
