// src/config/mod.rs

//! Configuration loading and validation for ciwrap.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Resolve the per-flow settings once at startup, combining the config
//!   file with environment variables (`env.rs`).

pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use env::{process_env, GoTestSettings, ProvisionSettings};
pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, GoTestSection, ProvisionSection, RawConfigFile};
