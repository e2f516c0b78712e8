//! Embedded data specifications and their content payloads.

use serde::{Deserialize, Serialize};

use crate::common::LangString;
use crate::enums::DataTypeIec61360;
use crate::reference::Reference;

/// Binds an element to a data specification and carries its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedDataSpecification {
    pub data_specification: Reference,
    pub data_specification_content: DataSpecificationContent,
}

impl EmbeddedDataSpecification {
    pub fn new(data_specification: Reference, content: DataSpecificationContent) -> Self {
        Self {
            data_specification,
            data_specification_content: content,
        }
    }
}

/// Content of an embedded data specification.
///
/// IEC 61360 is the only content kind defined by V3.0. The enum is
/// non-exhaustive so further kinds can be added without breaking matchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "modelType")]
#[non_exhaustive]
pub enum DataSpecificationContent {
    #[serde(rename = "DataSpecificationIec61360")]
    Iec61360(DataSpecificationIec61360),
}

impl DataSpecificationContent {
    /// Name of the concrete content kind, as used by the `modelType` tag.
    pub fn model_type(&self) -> &'static str {
        match self {
            DataSpecificationContent::Iec61360(_) => "DataSpecificationIec61360",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSpecificationIec61360 {
    pub preferred_name: Vec<LangString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<Vec<LangString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_of_definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataTypeIec61360>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Vec<LangString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_list: Option<ValueList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_type: Option<LevelType>,
}

impl DataSpecificationIec61360 {
    pub fn new(preferred_name: Vec<LangString>) -> Self {
        Self {
            preferred_name,
            short_name: None,
            unit: None,
            unit_id: None,
            source_of_definition: None,
            symbol: None,
            data_type: None,
            definition: None,
            value_format: None,
            value_list: None,
            value: None,
            level_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueList {
    pub value_reference_pairs: Vec<ValueReferencePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueReferencePair {
    pub value: String,
    pub value_id: Reference,
}

/// Which of the min/nominal/typical/max levels a value carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelType {
    pub min: bool,
    pub nom: bool,
    pub typ: bool,
    pub max: bool,
}
