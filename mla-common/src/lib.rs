//! # MLA Common Library
//!
//! Shared code for the music listening analytics workspace:
//! - Source and enriched record models
//! - Error type and `Result` alias
//! - Configuration resolution (CLI → ENV → TOML → defaults)
//! - Timestamp parsing and output-file naming
//! - Human-readable elapsed time formatting

pub mod config;
pub mod error;
pub mod human_time;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{EnrichedEvent, ListeningEvent, Singer, Song, User};
