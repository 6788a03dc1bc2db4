//! Error types for profile resolution and SDK lookup.

use crate::profile::ResourceType;
use thiserror::Error;

/// Errors raised while resolving API versions or locating SDK items.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// The profile does not exist, or does not pin the resource type.
    #[error("Unable to get API version for type '{type_name}' in profile '{api_profile}'")]
    VersionNotFound {
        type_name: ResourceType,
        api_profile: String,
    },

    /// A version string is neither `YYYY-MM-DD` nor `YYYY-MM-DD-preview`.
    #[error("The API version {0} is not in YYYY-MM-DD or YYYY-MM-DD-preview format")]
    InvalidApiVersion(String),

    /// No module is registered under the dotted path.
    #[error("No module named '{0}'")]
    ModuleNotFound(String),

    /// The attribute chain broke at `attribute` while walking `path`.
    #[error("'{path}' has no attribute '{attribute}'")]
    AttributeNotFound { path: String, attribute: String },

    /// Embedded or user-supplied profile data could not be loaded.
    #[error("Invalid profile data: {0}")]
    InvalidProfileData(String),
}

pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// True for failures that checked lookups swallow.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            ProfileError::ModuleNotFound(_) | ProfileError::AttributeNotFound { .. }
        )
    }
}
