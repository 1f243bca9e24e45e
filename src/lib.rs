//! Room condition analyzer backed by Gemini
//!
//! Uploads a room photo and a scoring prompt to Gemini, cleans the model's
//! fenced JSON reply and serves it over HTTP. A CLI can also run the analysis
//! once and render a tidied-up version of the room from the suggestions.

pub mod ai;
pub mod analyzer;
pub mod error;
pub mod fence;
pub mod models;
pub mod prompts;
pub mod render;
pub mod server;

pub use error::{Error, Result};
