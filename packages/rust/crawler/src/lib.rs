//! Harvest engine and document body extraction.
//!
//! This crate provides:
//! - [`extract`] — plain-text extraction from the two EUR-Lex markup variants
//! - [`engine`] — the concurrent discover/diff/fetch harvest engine

pub mod engine;
pub mod extract;

pub use engine::{Harvester, HarvestResult, ProgressReporter, SilentProgress};
pub use extract::{NOT_FOUND_PHRASE, extract_text};
