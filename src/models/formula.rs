//! DevTest Labs formula model

use super::{AttributeSpec, Model};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A formula for creating a VM, specifying an image base and other parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FormulaWire", into = "FormulaWire")]
pub struct Formula {
    /// The description of the formula.
    pub description: Option<String>,
    /// The author of the formula.
    pub author: Option<String>,
    /// The OS type of the formula.
    pub os_type: Option<String>,
    /// The creation date of the formula.
    pub creation_date: Option<DateTime<Utc>>,
    /// The content of the formula, a `LabVirtualMachineCreationParameter`.
    pub formula_content: Option<Value>,
    /// Information about a VM from which a formula is to be created.
    pub vm: Option<FormulaPropertiesFromVm>,
    /// The provisioning status of the resource.
    pub provisioning_state: Option<String>,
    /// The unique immutable identifier of a resource (Guid).
    pub unique_identifier: Option<String>,
    /// The identifier of the resource.
    pub id: Option<String>,
    /// The name of the resource.
    pub name: Option<String>,
    /// The type of the resource.
    pub r#type: Option<String>,
    /// The location of the resource.
    pub location: Option<String>,
    /// The tags of the resource.
    pub tags: Option<BTreeMap<String, String>>,
}

/// Information about a VM from which a formula is to be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaPropertiesFromVm {
    /// The identifier of the VM from which a formula is to be created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_vm_id: Option<String>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Model for Formula {
    const TYPE_NAME: &'static str = "Formula";

    const ATTRIBUTE_MAP: &'static [AttributeSpec] = &[
        AttributeSpec::new("description", "properties.description", "str"),
        AttributeSpec::new("author", "properties.author", "str"),
        AttributeSpec::new("os_type", "properties.osType", "str"),
        AttributeSpec::new("creation_date", "properties.creationDate", "iso-8601"),
        AttributeSpec::new(
            "formula_content",
            "properties.formulaContent",
            "LabVirtualMachineCreationParameter",
        ),
        AttributeSpec::new("vm", "properties.vm", "FormulaPropertiesFromVm"),
        AttributeSpec::new("provisioning_state", "properties.provisioningState", "str"),
        AttributeSpec::new("unique_identifier", "properties.uniqueIdentifier", "str"),
        AttributeSpec::new("id", "id", "str"),
        AttributeSpec::new("name", "name", "str"),
        AttributeSpec::new("type", "type", "str"),
        AttributeSpec::new("location", "location", "str"),
        AttributeSpec::new("tags", "tags", "{str}"),
    ];
}

// Wire shape: flattened attributes above, nested `properties` object below.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FormulaWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<FormulaWireProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormulaWireProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    os_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_iso8601",
        skip_serializing_if = "Option::is_none"
    )]
    creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    formula_content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vm: Option<FormulaPropertiesFromVm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provisioning_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unique_identifier: Option<String>,
}

/// ISO-8601 timestamp; one without an offset is read as UTC
fn parse_iso8601(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    raw.parse::<DateTime<Utc>>().or_else(|_| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
    })
}

fn deserialize_iso8601<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_iso8601(&raw)
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid creationDate '{}': {}", raw, e)))
}

impl From<FormulaWire> for Formula {
    fn from(wire: FormulaWire) -> Self {
        let props = wire.properties.unwrap_or_default();
        Self {
            description: props.description,
            author: props.author,
            os_type: props.os_type,
            creation_date: props.creation_date,
            formula_content: props.formula_content,
            vm: props.vm,
            provisioning_state: props.provisioning_state,
            unique_identifier: props.unique_identifier,
            id: wire.id,
            name: wire.name,
            r#type: wire.r#type,
            location: wire.location,
            tags: wire.tags,
        }
    }
}

impl From<Formula> for FormulaWire {
    fn from(formula: Formula) -> Self {
        let props = FormulaWireProperties {
            description: formula.description,
            author: formula.author,
            os_type: formula.os_type,
            creation_date: formula.creation_date,
            // a JSON null reads back as absent
            formula_content: formula.formula_content.filter(|v| !v.is_null()),
            vm: formula.vm,
            provisioning_state: formula.provisioning_state,
            unique_identifier: formula.unique_identifier,
        };
        Self {
            properties: (props != FormulaWireProperties::default()).then_some(props),
            id: formula.id,
            name: formula.name,
            r#type: formula.r#type,
            location: formula.location,
            tags: formula.tags,
        }
    }
}
