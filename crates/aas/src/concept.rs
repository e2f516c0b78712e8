use serde::{Deserialize, Serialize};

use crate::common::{AdministrativeInformation, Referable};
use crate::data_specification::EmbeddedDataSpecification;
use crate::reference::Reference;

/// A reusable concept definition, usually targeted by semantic ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDescription {
    #[serde(flatten)]
    pub referable: Referable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_data_specifications: Option<Vec<EmbeddedDataSpecification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_case_of: Option<Vec<Reference>>,
}

impl ConceptDescription {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            referable: Referable::default(),
            administration: None,
            id: id.into(),
            embedded_data_specifications: None,
            is_case_of: None,
        }
    }
}
