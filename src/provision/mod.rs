// src/provision/mod.rs

//! Provisioning orchestrator.
//!
//! Steps, in order, each fatal on failure:
//! 1. fresh clone of the infrastructure repository (stale clone removed),
//! 2. copy its roles, vaulted vars and requirements into the local
//!    provisioning tree,
//! 3. `ansible-galaxy install` of third-party roles,
//! 4. the container provisioning playbook,
//! 5. optionally, the integration-test playbook inside the container.
//!
//! The exit code of the last playbook that ran is the overall result.

pub mod assets;
pub mod commands;
pub mod runner;

pub use assets::copy_assets;
pub use runner::{fresh_clone, run_provision};
