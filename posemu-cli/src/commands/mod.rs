//! CLI command implementations.
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`run`] - Host the position service until Ctrl+C
//! - [`track`] - Inspect a GPX track file

pub mod config;
pub mod run;
pub mod track;
