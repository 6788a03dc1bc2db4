//! Versioned SDK Locator
//!
//! Turns a profile's resolved version into a versioned module path and walks
//! `module#attr.attr` requests against an [`SdkCatalog`].
//!
//! A request string has two halves split on `#`: the part before is a
//! submodule appended to the versioned path, the part after is a chain of
//! attribute lookups. `"models#Sku"` loads `<sdk>.models` and returns its
//! `Sku` member; `"models"` returns the module itself.

use super::builtin::default_catalog;
use super::catalog::{SdkCatalog, SdkItem, SdkModule};
use crate::error::Result;
use crate::profile::{get_registry, ProfileRegistry, ResourceType};
use std::sync::Arc;

/// What to do when a module or attribute cannot be found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lookup {
    /// Resolve to `None`
    #[default]
    Checked,
    /// Return the error
    Unchecked,
}

impl Lookup {
    fn settle(self, resolved: Result<SdkItem>) -> Result<Option<SdkItem>> {
        match (self, resolved) {
            (_, Ok(item)) => Ok(Some(item)),
            (Lookup::Checked, Err(e)) if e.is_resolution_failure() => {
                tracing::debug!("checked lookup swallowed: {}", e);
                Ok(None)
            }
            (_, Err(e)) => Err(e),
        }
    }
}

/// Options for [`SdkLocator::versioned_sdk`]
#[derive(Debug, Clone, Default)]
pub struct SdkOptions {
    /// Submodule applied to every request that has no `#` of its own
    pub sub_module: Option<String>,
    pub lookup: Lookup,
}

impl SdkOptions {
    pub fn with_module(mut self, sub_module: &str) -> Self {
        self.sub_module = Some(sub_module.to_string());
        self
    }

    pub fn unchecked(mut self) -> Self {
        self.lookup = Lookup::Unchecked;
        self
    }
}

/// Result of a versioned SDK load
#[derive(Debug, Clone)]
pub enum Resolved {
    /// No attributes were requested: the versioned module itself
    Module(Arc<SdkModule>),
    /// Exactly one request
    One(Option<SdkItem>),
    /// Two or more requests, in request order
    Many(Vec<Option<SdkItem>>),
}

impl Resolved {
    /// Flatten into request order; a bare module counts as one item
    pub fn into_items(self) -> Vec<Option<SdkItem>> {
        match self {
            Resolved::Module(m) => vec![Some(SdkItem::Module(m))],
            Resolved::One(item) => vec![item],
            Resolved::Many(items) => items,
        }
    }
}

/// `<prefix>.v<version with underscores>`
pub fn versioned_path(import_prefix: &str, api_version: &str) -> String {
    format!("{}.v{}", import_prefix, api_version.replace('-', "_"))
}

/// Resolves profile versions against a catalog
#[derive(Debug, Clone, Copy)]
pub struct SdkLocator<'a> {
    profiles: &'a ProfileRegistry,
    catalog: &'a SdkCatalog,
}

impl<'a> SdkLocator<'a> {
    pub fn new(profiles: &'a ProfileRegistry, catalog: &'a SdkCatalog) -> Self {
        Self { profiles, catalog }
    }

    pub fn catalog(&self) -> &'a SdkCatalog {
        self.catalog
    }

    /// Versioned module path of a resource type under a profile
    pub fn sdk_path(&self, api_profile: &str, resource_type: ResourceType) -> Result<String> {
        let version = self.profiles.api_version(api_profile, resource_type)?;
        Ok(versioned_path(resource_type.import_prefix(), version))
    }

    /// Load `module#attr.attr` relative to `sdk_path`
    pub fn get_attr(
        &self,
        sdk_path: &str,
        mod_attr_path: &str,
        lookup: Lookup,
    ) -> Result<Option<SdkItem>> {
        lookup.settle(self.resolve(sdk_path, mod_attr_path))
    }

    fn resolve(&self, sdk_path: &str, mod_attr_path: &str) -> Result<SdkItem> {
        let (attr_mod, attr_path) = mod_attr_path.split_once('#').unwrap_or((mod_attr_path, ""));

        let full_mod_path = if attr_mod.is_empty() {
            sdk_path.to_string()
        } else {
            format!("{}.{}", sdk_path, attr_mod)
        };

        let mut item = SdkItem::Module(self.catalog.import_module(&full_mod_path)?);
        if !attr_path.is_empty() {
            for part in attr_path.split('.') {
                item = self.catalog.getattr(&item, part)?;
            }
        }

        tracing::debug!("resolved {}#{} -> {}", sdk_path, mod_attr_path, item.path());
        Ok(item)
    }

    /// The resource type's client class, looked up on its unversioned prefix
    pub fn client_class(&self, resource_type: ResourceType) -> Option<SdkItem> {
        let client_name = resource_type.client_name()?;
        self.get_attr(
            resource_type.import_prefix(),
            &format!("#{}", client_name),
            Lookup::Checked,
        )
        .ok()
        .flatten()
    }

    /// Load the versioned SDK of a resource type, or members of it.
    ///
    /// Version lookup failures always propagate. With no requests the module
    /// itself is returned and a missing module is an error.
    pub fn versioned_sdk(
        &self,
        api_profile: &str,
        resource_type: ResourceType,
        attr_args: &[&str],
        options: &SdkOptions,
    ) -> Result<Resolved> {
        let sdk_path = self.sdk_path(api_profile, resource_type)?;

        if attr_args.is_empty() {
            return Ok(Resolved::Module(self.catalog.import_module(&sdk_path)?));
        }

        let mut results = Vec::with_capacity(attr_args.len());
        for mod_attr_path in attr_args {
            let request = match options.sub_module.as_deref() {
                Some(prefix) if !prefix.is_empty() && !mod_attr_path.contains('#') => {
                    format!("{}#{}", prefix, mod_attr_path)
                }
                _ => mod_attr_path.to_string(),
            };
            results.push(self.get_attr(&sdk_path, &request, options.lookup)?);
        }

        if results.len() == 1 {
            Ok(Resolved::One(results.pop().flatten()))
        } else {
            Ok(Resolved::Many(results))
        }
    }
}

impl SdkLocator<'static> {
    /// Locator over the built-in profiles and catalog
    pub fn global() -> Self {
        Self::new(get_registry(), default_catalog())
    }
}

/// Versioned module path of a resource type under a built-in profile
pub fn get_versioned_sdk_path(api_profile: &str, resource_type: ResourceType) -> Result<String> {
    SdkLocator::global().sdk_path(api_profile, resource_type)
}

/// The resource type's client class from the built-in catalog
pub fn get_client_class(resource_type: ResourceType) -> Option<SdkItem> {
    SdkLocator::global().client_class(resource_type)
}

/// Load members of the versioned SDK from the built-in catalog
pub fn get_versioned_sdk(
    api_profile: &str,
    resource_type: ResourceType,
    attr_args: &[&str],
    options: &SdkOptions,
) -> Result<Resolved> {
    SdkLocator::global().versioned_sdk(api_profile, resource_type, attr_args, options)
}

/// Shorthand for a single unversioned-path lookup against the built-in catalog
pub fn get_attr(sdk_path: &str, mod_attr_path: &str, lookup: Lookup) -> Result<Option<SdkItem>> {
    SdkLocator::global().get_attr(sdk_path, mod_attr_path, lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use serde_json::json;

    fn fixture() -> (ProfileRegistry, SdkCatalog) {
        let profiles = ProfileRegistry::from_json_sources(&[r#"{
            "profiles": {
                "p1": { "MGMT_STORAGE": "2016-12-01", "MGMT_COMPUTE": "2016-04-30-preview" },
                "p2": { "MGMT_STORAGE": "2015-06-15" }
            }
        }"#])
        .unwrap();
        let catalog = SdkCatalog::builder()
            .class("azure.mgmt.storage", "StorageManagementClient", |_| Ok(json!("client")))
            .class("azure.mgmt.storage.v2016_12_01.models", "Sku", |p| Ok(p.clone()))
            .class("azure.mgmt.storage.v2016_12_01.models", "Kind", |_| Ok(json!("kind")))
            .module("azure.mgmt.storage.v2016_12_01.operations")
            .module("azure.mgmt.compute.compute.v2016_04_30_preview")
            .build();
        (profiles, catalog)
    }

    #[test]
    fn test_versioned_path() {
        assert_eq!(
            versioned_path("azure.mgmt.storage", "2016-12-01"),
            "azure.mgmt.storage.v2016_12_01"
        );
        assert_eq!(
            versioned_path("azure.mgmt.compute.compute", "2016-04-30-preview"),
            "azure.mgmt.compute.compute.v2016_04_30_preview"
        );
    }

    #[test]
    fn test_sdk_path_propagates_version_errors() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        assert_eq!(
            locator.sdk_path("p1", ResourceType::MgmtStorage).unwrap(),
            "azure.mgmt.storage.v2016_12_01"
        );
        assert!(matches!(
            locator.sdk_path("p2", ResourceType::MgmtCompute),
            Err(ProfileError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn test_get_attr_module_and_chain() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let sdk = "azure.mgmt.storage.v2016_12_01";

        let module = locator.get_attr(sdk, "models", Lookup::Checked).unwrap().unwrap();
        assert_eq!(module.kind(), "module");
        assert_eq!(module.path(), "azure.mgmt.storage.v2016_12_01.models");

        let sku = locator.get_attr(sdk, "models#Sku", Lookup::Checked).unwrap().unwrap();
        assert_eq!(sku.path(), "azure.mgmt.storage.v2016_12_01.models.Sku");

        // attribute chain through a child module
        let kind = locator.get_attr(sdk, "#models.Kind", Lookup::Checked).unwrap().unwrap();
        assert_eq!(kind.path(), "azure.mgmt.storage.v2016_12_01.models.Kind");

        let root = locator.get_attr(sdk, "", Lookup::Checked).unwrap().unwrap();
        assert_eq!(root.path(), sdk);
    }

    #[test]
    fn test_checked_and_unchecked_failures() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let sdk = "azure.mgmt.storage.v2016_12_01";

        assert!(locator.get_attr(sdk, "nope#Sku", Lookup::Checked).unwrap().is_none());
        assert!(locator.get_attr(sdk, "models#Nope", Lookup::Checked).unwrap().is_none());

        assert_eq!(
            locator.get_attr(sdk, "nope#Sku", Lookup::Unchecked).unwrap_err(),
            ProfileError::ModuleNotFound("azure.mgmt.storage.v2016_12_01.nope".to_string())
        );
        assert_eq!(
            locator.get_attr(sdk, "models#Sku.inner", Lookup::Unchecked).unwrap_err(),
            ProfileError::AttributeNotFound {
                path: "azure.mgmt.storage.v2016_12_01.models.Sku".to_string(),
                attribute: "inner".to_string(),
            }
        );
    }

    #[test]
    fn test_extra_hash_stays_in_attribute_chain() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let sdk = "azure.mgmt.storage.v2016_12_01";

        assert!(locator.get_attr(sdk, "models#Sku#x", Lookup::Checked).unwrap().is_none());
        assert_eq!(
            locator.get_attr(sdk, "models#Sku#x", Lookup::Unchecked).unwrap_err(),
            ProfileError::AttributeNotFound {
                path: "azure.mgmt.storage.v2016_12_01.models".to_string(),
                attribute: "Sku#x".to_string(),
            }
        );
    }

    #[test]
    fn test_client_class() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let client = locator.client_class(ResourceType::MgmtStorage).unwrap();
        assert_eq!(client.path(), "azure.mgmt.storage.StorageManagementClient");
        assert!(locator.client_class(ResourceType::MgmtNetwork).is_none());
        assert!(locator.client_class(ResourceType::DataStorage).is_none());
    }

    #[test]
    fn test_versioned_sdk_without_requests_returns_module() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let resolved = locator
            .versioned_sdk("p1", ResourceType::MgmtCompute, &[], &SdkOptions::default())
            .unwrap();
        match resolved {
            Resolved::Module(m) => {
                assert_eq!(m.path(), "azure.mgmt.compute.compute.v2016_04_30_preview")
            }
            other => panic!("expected module, got {:?}", other),
        }

        // missing module is an error here even in checked mode
        assert_eq!(
            locator
                .versioned_sdk("p2", ResourceType::MgmtStorage, &[], &SdkOptions::default())
                .unwrap_err(),
            ProfileError::ModuleNotFound("azure.mgmt.storage.v2015_06_15".to_string())
        );
    }

    #[test]
    fn test_versioned_sdk_single_and_many() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let opts = SdkOptions::default().with_module("models");

        let one = locator
            .versioned_sdk("p1", ResourceType::MgmtStorage, &["Sku"], &opts)
            .unwrap();
        assert!(matches!(one, Resolved::One(Some(ref item)) if item.path().ends_with("models.Sku")));

        let many = locator
            .versioned_sdk(
                "p1",
                ResourceType::MgmtStorage,
                &["Sku", "Missing", "operations#"],
                &opts,
            )
            .unwrap();
        let Resolved::Many(items) = many else {
            panic!("expected many");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0].as_ref().unwrap().path(),
            "azure.mgmt.storage.v2016_12_01.models.Sku"
        );
        assert!(items[1].is_none());
        assert_eq!(
            items[2].as_ref().unwrap().path(),
            "azure.mgmt.storage.v2016_12_01.operations"
        );
    }

    #[test]
    fn test_versioned_sdk_unchecked_propagates() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        let opts = SdkOptions::default().with_module("models").unchecked();
        assert!(matches!(
            locator.versioned_sdk("p1", ResourceType::MgmtStorage, &["Sku", "Missing"], &opts),
            Err(ProfileError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_versioned_sdk_unknown_profile_propagates_in_checked_mode() {
        let (profiles, catalog) = fixture();
        let locator = SdkLocator::new(&profiles, &catalog);
        assert!(matches!(
            locator.versioned_sdk("nope", ResourceType::MgmtStorage, &["models#Sku"], &SdkOptions::default()),
            Err(ProfileError::VersionNotFound { .. })
        ));
    }
}
