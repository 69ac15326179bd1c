//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`run`] - Replay a scenario against an airport sequence
//! - [`settings`] - Settings file management (path, show, init)
//! - [`validate`] - Airport configuration check

pub mod run;
pub mod settings;
pub mod validate;
