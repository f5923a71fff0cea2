//! Configuration management for the nebula client.
//!
//! Configuration is read from JSON5 (or plain JSON) files and validated
//! before use. Search order:
//!
//! 1. Local: `./nebula.json5` or `./nebula.json`
//! 2. User: `~/.config/nebula/config.json5` or `~/.config/nebula/config.json`
//!
//! When no file is found, the defaults apply: a backend at
//! `http://localhost:8000`, the `/chat` endpoint, ten retained turns, and
//! a thirty second request timeout.

mod config;
mod error;
pub mod persistence;

pub use config::Config;
pub use error::{ConfigError, Result};
