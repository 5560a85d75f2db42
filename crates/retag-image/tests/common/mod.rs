//! Common test infrastructure for retag-image tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Image references and digests shared by tests
//! - `mock_registry`: In-memory `RegistryTool` that records every call
//! - `docker_scripts`: Fake `docker` executables for exercising `DockerCli`

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod docker_scripts;
pub mod mock_registry;

pub use constants::*;
pub use docker_scripts::*;
pub use mock_registry::*;
