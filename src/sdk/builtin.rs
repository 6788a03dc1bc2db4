//! Built-in SDK catalog
//!
//! Describes the SDK tree that the built-in profiles point into: one
//! versioned package per (resource type, pinned version), each with a
//! client class, a `models` submodule of classes and an `operations`
//! submodule of functions.

use super::catalog::{SdkCatalog, SdkCatalogBuilder};
use super::locator::versioned_path;
use crate::models::{Formula, Model};
use crate::profile::{get_registry, ProfileRegistry, ResourceType};
use anyhow::Context;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Package holding the DevTest Labs wire models
pub const DEVTESTLABS_MODELS: &str = "azure.mgmt.devtestlabs.models";

/// Model classes exposed by each versioned `models` submodule
const MODELS: &[(ResourceType, &[&str])] = &[
    (ResourceType::MgmtStorage, &["StorageAccount", "StorageAccountCreateParameters", "Sku"]),
    (ResourceType::MgmtCompute, &["VirtualMachine", "VirtualMachineScaleSet"]),
    (ResourceType::MgmtContainerService, &["ContainerService"]),
    (ResourceType::MgmtNetwork, &["VirtualNetwork", "Subnet", "NetworkSecurityGroup"]),
    (ResourceType::MgmtResourceFeatures, &["FeatureResult"]),
    (ResourceType::MgmtResourceLinks, &["ResourceLink"]),
    (ResourceType::MgmtResourceLocks, &["ManagementLockObject"]),
    (ResourceType::MgmtResourcePolicy, &["PolicyAssignment", "PolicyDefinition"]),
    (ResourceType::MgmtResourceResources, &["ResourceGroup", "GenericResource"]),
    (ResourceType::MgmtResourceSubscriptions, &["Subscription", "Location"]),
];

/// Functions exposed by each versioned `operations` submodule
const OPERATIONS: &[(ResourceType, &[&str])] = &[
    (ResourceType::MgmtStorage, &["list_storage_accounts", "check_name_availability"]),
    (ResourceType::MgmtCompute, &["list_virtual_machines", "list_usage"]),
    (ResourceType::MgmtContainerService, &["list_container_services"]),
    (ResourceType::MgmtNetwork, &["list_virtual_networks", "list_subnets"]),
    (ResourceType::MgmtResourceFeatures, &["list_features"]),
    (ResourceType::MgmtResourceLinks, &["list_resource_links"]),
    (ResourceType::MgmtResourceLocks, &["list_management_locks"]),
    (ResourceType::MgmtResourcePolicy, &["list_policy_assignments", "list_policy_definitions"]),
    (ResourceType::MgmtResourceResources, &["list_resource_groups", "list_resources"]),
    (ResourceType::MgmtResourceSubscriptions, &["list_subscriptions", "list_locations"]),
];

fn members_of(
    table: &'static [(ResourceType, &'static [&'static str])],
    resource_type: ResourceType,
) -> &'static [&'static str] {
    table
        .iter()
        .find(|(rt, _)| *rt == resource_type)
        .map(|(_, names)| *names)
        .unwrap_or_default()
}

/// Data-plane services of the multi-API storage package, by submodule
const DATA_SERVICES: &[(&str, &str)] = &[
    ("blob", "BlockBlobService"),
    ("file", "FileService"),
    ("queue", "QueueService"),
    ("table", "TableService"),
];

static CATALOG: OnceLock<SdkCatalog> = OnceLock::new();

/// Get the built-in catalog (built from the built-in profiles on first access)
pub fn default_catalog() -> &'static SdkCatalog {
    CATALOG.get_or_init(|| build_catalog(get_registry()))
}

/// Build a catalog for every version any profile in `profiles` pins
pub fn build_catalog(profiles: &ProfileRegistry) -> SdkCatalog {
    let mut builder = SdkCatalog::builder();

    for &resource_type in ResourceType::all() {
        let prefix = resource_type.import_prefix();

        if let Some(client) = resource_type.client_name() {
            builder = builder.class(prefix, client, client_constructor(client, None));
        }

        for version in pinned_versions(profiles, resource_type) {
            builder = register_version(builder, resource_type, &version);
        }
    }

    let catalog = builder
        .class(DEVTESTLABS_MODELS, Formula::TYPE_NAME, construct_formula)
        .build();

    tracing::debug!("built SDK catalog with {} modules", catalog.len());
    catalog
}

fn pinned_versions(profiles: &ProfileRegistry, resource_type: ResourceType) -> BTreeSet<String> {
    profiles
        .profile_names()
        .into_iter()
        .filter_map(|name| profiles.profile(name)?.get(resource_type))
        .map(str::to_string)
        .collect()
}

fn register_version(
    mut builder: SdkCatalogBuilder,
    resource_type: ResourceType,
    version: &str,
) -> SdkCatalogBuilder {
    let sdk_path = versioned_path(resource_type.import_prefix(), version);

    if resource_type == ResourceType::DataStorage {
        for (sub_module, service) in DATA_SERVICES {
            builder = builder.class(
                &format!("{}.{}", sdk_path, sub_module),
                service,
                service_constructor(service, version),
            );
        }
        return builder;
    }

    if let Some(client) = resource_type.client_name() {
        builder = builder.class(&sdk_path, client, client_constructor(client, Some(version)));
    }

    let models_path = format!("{}.models", sdk_path);
    let operations_path = format!("{}.operations", sdk_path);
    builder = builder.module(&models_path).module(&operations_path);

    for model in members_of(MODELS, resource_type) {
        builder = builder.class(&models_path, model, model_constructor(model));
    }
    for operation in members_of(OPERATIONS, resource_type) {
        builder =
            builder.function(&operations_path, operation, operation_function(operation, version));
    }

    builder
}

fn client_constructor(
    client: &'static str,
    api_version: Option<&str>,
) -> impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static {
    let api_version = api_version.map(str::to_string);
    move |params| {
        let subscription_id = params
            .get("subscription_id")
            .and_then(Value::as_str)
            .context(format!("{} requires subscription_id", client))?;
        Ok(json!({
            "client": client,
            "subscription_id": subscription_id,
            "api_version": api_version,
        }))
    }
}

fn service_constructor(
    service: &'static str,
    api_version: &str,
) -> impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static {
    let api_version = api_version.to_string();
    move |params| {
        let account_name = params
            .get("account_name")
            .and_then(Value::as_str)
            .context(format!("{} requires account_name", service))?;
        Ok(json!({
            "service": service,
            "account_name": account_name,
            "api_version": api_version,
        }))
    }
}

fn operation_function(
    operation: &'static str,
    api_version: &str,
) -> impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static {
    let api_version = api_version.to_string();
    move |params| {
        if !(params.is_object() || params.is_null()) {
            anyhow::bail!("{} expects an object, got {}", operation, params);
        }
        Ok(json!({
            "operation": operation,
            "api_version": api_version,
            "params": params,
        }))
    }
}

fn model_constructor(
    model: &'static str,
) -> impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static {
    move |params| {
        let mut object = match params {
            Value::Object(map) => map.clone(),
            Value::Null => serde_json::Map::new(),
            other => anyhow::bail!("{} expects an object, got {}", model, other),
        };
        object.insert("@type".to_string(), Value::String(model.to_string()));
        Ok(Value::Object(object))
    }
}

fn construct_formula(params: &Value) -> anyhow::Result<Value> {
    let formula: Formula = if params.is_null() {
        Formula::new()
    } else {
        serde_json::from_value(params.clone()).context("Invalid Formula")?
    };
    serde_json::to_value(formula).context("Failed to serialize Formula")
}
