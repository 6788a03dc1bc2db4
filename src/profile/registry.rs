//! Profile Registry - Load API profiles from JSON
//!
//! This module loads all API profile definitions from embedded JSON files
//! and provides version lookup functions for the rest of the crate.

use super::resource_type::ResourceType;
use super::version::DateApiVersion;
use crate::error::{ProfileError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded profile JSON files (compiled into the binary)
const PROFILE_FILES: &[&str] = &[
    include_str!("../profiles/latest.json"),
    include_str!("../profiles/2016-sample.json"),
    include_str!("../profiles/2015-sample.json"),
];

/// Profile used when nothing else is configured
pub const DEFAULT_PROFILE: &str = "latest";

/// A named pinning of resource types to API versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiProfile {
    versions: BTreeMap<ResourceType, String>,
}

impl ApiProfile {
    /// Version pinned for a resource type, if the profile defines one
    pub fn get(&self, resource_type: ResourceType) -> Option<&str> {
        self.versions.get(&resource_type).map(String::as_str)
    }

    /// Pinned versions, ordered by resource type
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, &str)> {
        self.versions.iter().map(|(rt, v)| (*rt, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl FromIterator<(ResourceType, String)> for ApiProfile {
    fn from_iter<I: IntoIterator<Item = (ResourceType, String)>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}

/// Root structure of profiles/*.json
#[derive(Debug, Clone, Default, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: HashMap<String, ApiProfile>,
}

/// All known profiles, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, ApiProfile>,
}

impl ProfileRegistry {
    /// Merge several profile documents; later documents win on name clashes.
    ///
    /// Every version string is checked against the dated grammar so that
    /// comparisons never see a malformed registry entry.
    pub fn from_json_sources(sources: &[&str]) -> Result<Self> {
        let mut registry = Self::default();

        for content in sources {
            let partial: ProfileFile = serde_json::from_str(content)
                .map_err(|e| ProfileError::InvalidProfileData(e.to_string()))?;
            registry.profiles.extend(partial.profiles);
        }

        registry.validate()?;
        Ok(registry)
    }

    /// Build from in-memory profiles
    pub fn from_profiles<I>(profiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, ApiProfile)>,
    {
        let registry = Self {
            profiles: profiles.into_iter().collect(),
        };
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        for (name, profile) in &self.profiles {
            for (resource_type, version) in profile.iter() {
                DateApiVersion::parse(version).map_err(|_| {
                    ProfileError::InvalidProfileData(format!(
                        "profile '{}' pins {} to malformed version '{}'",
                        name, resource_type, version
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get a profile by name
    pub fn profile(&self, name: &str) -> Option<&ApiProfile> {
        self.profiles.get(name)
    }

    /// Sorted profile names
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve the API version of a resource type within a profile
    pub fn api_version(&self, api_profile: &str, resource_type: ResourceType) -> Result<&str> {
        let version = self
            .profiles
            .get(api_profile)
            .and_then(|profile| profile.get(resource_type));

        match version {
            Some(v) => {
                tracing::debug!(
                    "get_api_version: profile={}, type={} -> {}",
                    api_profile,
                    resource_type,
                    v
                );
                Ok(v)
            }
            None => {
                tracing::debug!(
                    "get_api_version: no version for type={} in profile={}",
                    resource_type,
                    api_profile
                );
                Err(ProfileError::VersionNotFound {
                    type_name: resource_type,
                    api_profile: api_profile.to_string(),
                })
            }
        }
    }

    /// Check the current version of a resource type against inclusive bounds.
    ///
    /// With no bounds at all this is `true` without resolving anything, so an
    /// unknown profile is only reported when a constraint is actually given.
    pub fn supported_api_version(
        &self,
        api_profile: &str,
        resource_type: ResourceType,
        min_api: Option<&str>,
        max_api: Option<&str>,
    ) -> Result<bool> {
        if min_api.is_none() && max_api.is_none() {
            return Ok(true);
        }

        let current = DateApiVersion::parse(self.api_version(api_profile, resource_type)?)?;

        if let Some(min) = min_api.filter(|s| !s.is_empty()) {
            if current < DateApiVersion::parse(min)? {
                return Ok(false);
            }
        }
        if let Some(max) = max_api.filter(|s| !s.is_empty()) {
            if current > DateApiVersion::parse(max)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ProfileRegistry> = OnceLock::new();

/// Get the profile registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ProfileRegistry {
    REGISTRY.get_or_init(|| {
        ProfileRegistry::from_json_sources(PROFILE_FILES)
            .unwrap_or_else(|e| panic!("Failed to load embedded profile JSON: {}", e))
    })
}

/// Get a profile by name
pub fn get_profile(name: &str) -> Option<&'static ApiProfile> {
    get_registry().profile(name)
}

/// Get all profile names (sorted, for listings and autocomplete)
pub fn profile_names() -> Vec<&'static str> {
    get_registry().profile_names()
}

/// Get the API version of a resource type given an API profile
pub fn get_api_version(api_profile: &str, resource_type: ResourceType) -> Result<&'static str> {
    get_registry().api_version(api_profile, resource_type)
}

/// True if the profile's version of `resource_type` lies within `[min_api, max_api]`
pub fn supported_api_version(
    api_profile: &str,
    resource_type: ResourceType,
    min_api: Option<&str>,
    max_api: Option<&str>,
) -> Result<bool> {
    get_registry().supported_api_version(api_profile, resource_type, min_api, max_api)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        assert_eq!(profile_names(), vec!["2015-sample", "2016-sample", "latest"]);
    }

    #[test]
    fn test_every_profile_pins_every_resource_type() {
        for name in profile_names() {
            let profile = get_profile(name).unwrap();
            for rt in ResourceType::all() {
                assert!(
                    profile.get(*rt).is_some(),
                    "{} should pin {} in profile {}",
                    name,
                    rt,
                    name
                );
            }
        }
    }

    #[test]
    fn test_get_api_version() {
        assert_eq!(
            get_api_version("2015-sample", ResourceType::MgmtStorage),
            Ok("2015-06-15")
        );
        assert_eq!(
            get_api_version("latest", ResourceType::MgmtCompute),
            Ok("2016-04-30-preview")
        );
        assert_eq!(
            get_api_version("2016-sample", ResourceType::MgmtResourcePolicy),
            Ok("2016-12-01")
        );
    }

    #[test]
    fn test_unknown_profile_is_version_not_found() {
        let err = get_api_version("no-such-profile", ResourceType::MgmtNetwork).unwrap_err();
        assert_eq!(
            err,
            ProfileError::VersionNotFound {
                type_name: ResourceType::MgmtNetwork,
                api_profile: "no-such-profile".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_resource_type_is_version_not_found() {
        let registry = ProfileRegistry::from_json_sources(&[
            r#"{"profiles": {"tiny": {"MGMT_STORAGE": "2016-12-01"}}}"#,
        ])
        .unwrap();
        assert_eq!(
            registry.api_version("tiny", ResourceType::MgmtStorage),
            Ok("2016-12-01")
        );
        assert!(matches!(
            registry.api_version("tiny", ResourceType::MgmtCompute),
            Err(ProfileError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn test_supported_api_version_range() {
        let rt = ResourceType::MgmtStorage;
        assert_eq!(
            supported_api_version("2015-sample", rt, Some("2015-01-01"), Some("2015-12-31")),
            Ok(true)
        );
        assert_eq!(
            supported_api_version("2015-sample", rt, Some("2015-01-01"), Some("2015-01-01")),
            Ok(false)
        );
        assert_eq!(
            supported_api_version("2015-sample", rt, Some("2015-06-15"), Some("2015-06-15")),
            Ok(true)
        );
        assert_eq!(
            supported_api_version("2015-sample", rt, Some("2016-01-01"), None),
            Ok(false)
        );
        assert_eq!(
            supported_api_version("2015-sample", rt, None, Some("2016-01-01")),
            Ok(true)
        );
    }

    #[test]
    fn test_supported_api_version_preview_bounds() {
        let rt = ResourceType::MgmtCompute;
        // latest pins compute to 2016-04-30-preview
        assert_eq!(
            supported_api_version("latest", rt, Some("2016-04-30"), None),
            Ok(false)
        );
        assert_eq!(
            supported_api_version("latest", rt, None, Some("2016-04-30")),
            Ok(true)
        );
    }

    #[test]
    fn test_supported_without_bounds_skips_lookup() {
        assert_eq!(
            supported_api_version("no-such-profile", ResourceType::DataStorage, None, None),
            Ok(true)
        );
    }

    #[test]
    fn test_supported_with_bound_reports_unknown_profile() {
        assert!(matches!(
            supported_api_version("no-such-profile", ResourceType::DataStorage, Some("2015-01-01"), None),
            Err(ProfileError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_bound_is_ignored_but_still_resolves() {
        assert_eq!(
            supported_api_version("latest", ResourceType::MgmtStorage, Some(""), None),
            Ok(true)
        );
        assert!(supported_api_version("nope", ResourceType::MgmtStorage, Some(""), None).is_err());
    }

    #[test]
    fn test_malformed_bound_is_format_error() {
        assert_eq!(
            supported_api_version("latest", ResourceType::MgmtStorage, Some("2017/01/31"), None),
            Err(ProfileError::InvalidApiVersion("2017/01/31".to_string()))
        );
    }

    #[test]
    fn test_malformed_profile_data_is_rejected() {
        let err = ProfileRegistry::from_json_sources(&[
            r#"{"profiles": {"bad": {"MGMT_STORAGE": "2016/12/01"}}}"#,
        ])
        .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfileData(_)));

        let err = ProfileRegistry::from_json_sources(&["not json"]).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfileData(_)));
    }

    #[test]
    fn test_from_profiles_in_memory() {
        let pinned: ApiProfile = [
            (ResourceType::MgmtStorage, "2016-12-01".to_string()),
            (ResourceType::MgmtCompute, "2016-04-30-preview".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(pinned.len(), 2);
        assert_eq!(
            pinned.iter().next(),
            Some((ResourceType::MgmtStorage, "2016-12-01"))
        );

        let registry = ProfileRegistry::from_profiles([("custom".to_string(), pinned)]).unwrap();
        assert_eq!(registry.profile_names(), vec!["custom"]);
        assert_eq!(
            registry.supported_api_version(
                "custom",
                ResourceType::MgmtCompute,
                None,
                Some("2016-04-30")
            ),
            Ok(true)
        );
        assert!(matches!(
            registry.api_version("custom", ResourceType::MgmtNetwork),
            Err(ProfileError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn test_from_profiles_rejects_malformed_version() {
        let pinned: ApiProfile = [(ResourceType::MgmtNetwork, "2016.09.01".to_string())]
            .into_iter()
            .collect();
        let err = ProfileRegistry::from_profiles([("bad".to_string(), pinned)]).unwrap_err();
        assert_eq!(
            err,
            ProfileError::InvalidProfileData(
                "profile 'bad' pins MGMT_NETWORK to malformed version '2016.09.01'".to_string()
            )
        );
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let registry = ProfileRegistry::from_json_sources(&[
            r#"{"profiles": {"p": {"MGMT_STORAGE": "2015-06-15"}}}"#,
            r#"{"profiles": {"p": {"MGMT_STORAGE": "2016-12-01"}}}"#,
        ])
        .unwrap();
        assert_eq!(
            registry.api_version("p", ResourceType::MgmtStorage),
            Ok("2016-12-01")
        );
    }
}
