//! logsmith core - shared types for the changelog generator
//!
//! This crate provides the error taxonomy and the configuration layer used by
//! the git, changelog and CLI crates.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ChangelogError, ConfigError, GitError, LogsmithError, Result};
