//! Resource Types
//!
//! The closed set of management entities whose SDKs are versioned per profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logical category of managed entity with a stable unversioned import path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    MgmtStorage,
    MgmtCompute,
    MgmtContainerService,
    MgmtNetwork,
    MgmtResourceFeatures,
    MgmtResourceLinks,
    MgmtResourceLocks,
    MgmtResourcePolicy,
    MgmtResourceResources,
    MgmtResourceSubscriptions,
    DataStorage,
}

const ALL: [ResourceType; 11] = [
    ResourceType::MgmtStorage,
    ResourceType::MgmtCompute,
    ResourceType::MgmtContainerService,
    ResourceType::MgmtNetwork,
    ResourceType::MgmtResourceFeatures,
    ResourceType::MgmtResourceLinks,
    ResourceType::MgmtResourceLocks,
    ResourceType::MgmtResourcePolicy,
    ResourceType::MgmtResourceResources,
    ResourceType::MgmtResourceSubscriptions,
    ResourceType::DataStorage,
];

impl ResourceType {
    /// Every variant, in declaration order
    pub fn all() -> &'static [ResourceType] {
        &ALL
    }

    /// Path to the (unversioned) SDK module
    pub fn import_prefix(self) -> &'static str {
        match self {
            ResourceType::MgmtStorage => "azure.mgmt.storage",
            ResourceType::MgmtCompute => "azure.mgmt.compute.compute",
            ResourceType::MgmtContainerService => "azure.mgmt.compute.containerservice",
            ResourceType::MgmtNetwork => "azure.mgmt.network",
            ResourceType::MgmtResourceFeatures => "azure.mgmt.resource.features",
            ResourceType::MgmtResourceLinks => "azure.mgmt.resource.links",
            ResourceType::MgmtResourceLocks => "azure.mgmt.resource.locks",
            ResourceType::MgmtResourcePolicy => "azure.mgmt.resource.policy",
            ResourceType::MgmtResourceResources => "azure.mgmt.resource.resources",
            ResourceType::MgmtResourceSubscriptions => "azure.mgmt.resource.subscriptions",
            ResourceType::DataStorage => "azure.multiapi.storage",
        }
    }

    /// Name of the client class for this resource type, if it has one
    pub fn client_name(self) -> Option<&'static str> {
        match self {
            ResourceType::MgmtStorage => Some("StorageManagementClient"),
            ResourceType::MgmtCompute => Some("ComputeManagementClient"),
            ResourceType::MgmtContainerService => Some("ContainerServiceClient"),
            ResourceType::MgmtNetwork => Some("NetworkManagementClient"),
            ResourceType::MgmtResourceFeatures => Some("FeatureClient"),
            ResourceType::MgmtResourceLinks => Some("ManagementLinkClient"),
            ResourceType::MgmtResourceLocks => Some("ManagementLockClient"),
            ResourceType::MgmtResourcePolicy => Some("PolicyClient"),
            ResourceType::MgmtResourceResources => Some("ResourceManagementClient"),
            ResourceType::MgmtResourceSubscriptions => Some("SubscriptionClient"),
            ResourceType::DataStorage => None,
        }
    }

    /// Canonical SCREAMING_SNAKE_CASE name, as used in profile files
    pub fn name(self) -> &'static str {
        match self {
            ResourceType::MgmtStorage => "MGMT_STORAGE",
            ResourceType::MgmtCompute => "MGMT_COMPUTE",
            ResourceType::MgmtContainerService => "MGMT_CONTAINER_SERVICE",
            ResourceType::MgmtNetwork => "MGMT_NETWORK",
            ResourceType::MgmtResourceFeatures => "MGMT_RESOURCE_FEATURES",
            ResourceType::MgmtResourceLinks => "MGMT_RESOURCE_LINKS",
            ResourceType::MgmtResourceLocks => "MGMT_RESOURCE_LOCKS",
            ResourceType::MgmtResourcePolicy => "MGMT_RESOURCE_POLICY",
            ResourceType::MgmtResourceResources => "MGMT_RESOURCE_RESOURCES",
            ResourceType::MgmtResourceSubscriptions => "MGMT_RESOURCE_SUBSCRIPTIONS",
            ResourceType::DataStorage => "DATA_STORAGE",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    /// Accepts `MGMT_STORAGE`, `mgmt_storage` or `mgmt-storage`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        ALL.iter()
            .copied()
            .find(|rt| rt.name() == normalized)
            .ok_or_else(|| format!("Unknown resource type: {}", s))
    }
}
