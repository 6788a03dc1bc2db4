//! Versioned SDK lookup
//!
//! Version-specific SDK items are found through an explicit catalog rather
//! than by importing code at runtime. Paths follow the convention
//! `<prefix>.v<version_with_underscores>.<submodule>.<attribute>`.
//!
//! - [`catalog`] - Module table, items, and the builder that populates it
//! - [`locator`] - Versioned paths and `module#attr` resolution
//! - [`builtin`] - The catalog matching the built-in profiles
//!
//! # Example
//!
//! ```
//! use apiprofile::profile::ResourceType;
//! use apiprofile::sdk::{get_versioned_sdk, get_versioned_sdk_path, Resolved, SdkOptions};
//!
//! let path = get_versioned_sdk_path("latest", ResourceType::MgmtStorage).unwrap();
//! assert_eq!(path, "azure.mgmt.storage.v2016_12_01");
//!
//! let options = SdkOptions::default().with_module("models");
//! let resolved = get_versioned_sdk("latest", ResourceType::MgmtStorage, &["Sku"], &options).unwrap();
//! assert!(matches!(resolved, Resolved::One(Some(_))));
//! ```

pub mod builtin;
pub mod catalog;
pub mod locator;

pub use builtin::{build_catalog, default_catalog, DEVTESTLABS_MODELS};
pub use catalog::{Constructor, SdkCallable, SdkCatalog, SdkCatalogBuilder, SdkItem, SdkItemInfo, SdkModule};
pub use locator::{
    get_attr, get_client_class, get_versioned_sdk, get_versioned_sdk_path, versioned_path, Lookup,
    Resolved, SdkLocator, SdkOptions,
};
