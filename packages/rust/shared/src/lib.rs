//! Shared types, error model, and configuration for LexHarvest.
//!
//! This crate is the foundation depended on by all other LexHarvest crates.
//! It provides:
//! - [`LexHarvestError`] — the unified error type
//! - Domain types ([`CelexId`], the language registry in [`langs`])
//! - Configuration ([`AppConfig`], [`HarvestConfig`], config loading)

pub mod config;
pub mod error;
pub mod langs;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EndpointsConfig, HarvestConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{LexHarvestError, Result};
pub use types::{CELEX_ID_LEN, CelexId};
