//! API profile resolution for versioned management SDKs.
//!
//! - [`profile`] - Named profiles pinning resource types to dated API versions
//! - [`sdk`] - Locating version-specific SDK modules, classes, and functions
//! - [`models`] - Wire models with declarative attribute maps
//! - [`config`] - Persistent user configuration

pub mod config;
pub mod error;
pub mod models;
pub mod profile;
pub mod sdk;

pub use error::{ProfileError, Result};
