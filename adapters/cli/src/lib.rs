#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless adapter that drives a Scrollmap session from the terminal.
//!
//! The binary wires a [`Session`] to a [`DirectoryLoader`] and a
//! [`TextRenderer`], then replays an input [`script`] against a simulated
//! clock. Everything here is deterministic so tests can drive the same code
//! with an in-memory loader.

pub mod config;
pub mod driver;
pub mod loader;
pub mod scheduler;
pub mod script;
pub mod text;

pub use config::{Args, Settings};
pub use driver::Session;
pub use loader::{DirectoryLoader, LevelLoader, MemoryLoader};
pub use scheduler::{Firing, Scheduler};
pub use script::ScriptStep;
pub use text::TextRenderer;
