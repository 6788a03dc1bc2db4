//! API profile layer
//!
//! An API profile pins every resource type to one dated API version, so a
//! caller can target a consistent set of SDK versions at once.
//!
//! # Architecture
//!
//! - [`resource_type`] - The closed set of resource types and their SDK prefixes
//! - [`registry`] - Loads and caches profiles from embedded JSON, resolves versions
//! - [`version`] - Parses and orders `YYYY-MM-DD[-preview]` version strings
//!
//! # Profile Definitions
//!
//! Profiles are defined in JSON files under `src/profiles/`:
//! - `latest.json` - Newest versions the SDKs ship
//! - `2016-sample.json` - A 2016 snapshot
//! - `2015-sample.json` - A 2015 snapshot
//!
//! # Example
//!
//! ```
//! use apiprofile::profile::{get_api_version, supported_api_version, ResourceType};
//!
//! let version = get_api_version("2015-sample", ResourceType::MgmtStorage).unwrap();
//! assert_eq!(version, "2015-06-15");
//!
//! let ok = supported_api_version(
//!     "2015-sample",
//!     ResourceType::MgmtStorage,
//!     Some("2015-01-01"),
//!     Some("2015-12-31"),
//! )
//! .unwrap();
//! assert!(ok);
//! ```

mod registry;
mod resource_type;
mod version;

pub use registry::*;
pub use resource_type::ResourceType;
pub use version::{compare_api_versions, DateApiVersion};
