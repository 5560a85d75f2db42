//! # retag-core
//!
//! Core library for the retag CLI providing:
//! - Settings loading (retag.yaml plus `RETAG_*` environment overrides)
//! - The explicit release inputs each operation is constructed with
//! - The shared error taxonomy

pub mod config;
pub mod error;

pub use config::{ReleaseInputs, Settings, SettingsLoader};
pub use error::{Error, MutationOp, Result};
