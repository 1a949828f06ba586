//! Scripted replay harness
//!
//! Replays a YAML-described feature lifecycle through a real reporter and
//! controller, then asserts on the captured report stream. Used by the
//! `stepmode test` command and for end-to-end verification of the protocol.

pub mod config;
pub mod runner;

pub use config::ReplayScript;
pub use runner::{run_script, ReplayResult};
