//! Style Scout command-line host.
//!
//! The binary lives in `main.rs`; the pieces here are split out so they
//! can be tested without spawning a process.

pub mod config;
pub mod output;
