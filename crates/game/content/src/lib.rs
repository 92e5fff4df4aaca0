//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Content tables: abilities, units, enemies, equipment, Djinn, encounters (RON)
//! - Tower floor lists (RON)
//! - Battle and tower configuration (TOML)
//!
//! Loaded content passes through [`validation`] before anything runs on it.
//! [`save`] wraps persisted state in a versioned, checksummed envelope.
//!
//! All loaders use vale-core types directly with serde for RON/TOML deserialization.

pub mod catalog;
pub mod save;
pub mod validation;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ContentCatalog;
pub use save::{GameSave, SAVE_VERSION, SaveEnvelope};
pub use validation::{
    BalanceWarning, IssueKind, ValidationIssue, ValidationReport, validate, validate_party,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigFile, ConfigLoader, ContentBundle, ContentFactory, ContentLoader, TowerLoader,
};
