//! Muse Core - playback, queue, A/B version comparison, recording and prompt mixing
//!
//! Controllers are plain values: construct them, pass them to whatever needs
//! them, drop or dispose them. None of them perform network I/O; audio URLs
//! and version lists come in already resolved.

pub mod config;
pub mod mixer;
pub mod player;
pub mod recorder;
pub mod types;
pub mod versions;

pub use types::*;
