use serde::{Deserialize, Serialize};

use crate::concept::ConceptDescription;
use crate::shell::AssetAdministrationShell;
use crate::submodel::Submodel;

/// Root aggregate holding shells, submodels and concept descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_administration_shells: Option<Vec<AssetAdministrationShell>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submodels: Option<Vec<Submodel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept_descriptions: Option<Vec<ConceptDescription>>,
}

impl Environment {
    /// True when none of the three sections holds an entry.
    pub fn is_empty(&self) -> bool {
        fn empty<T>(section: &Option<Vec<T>>) -> bool {
            section.as_ref().is_none_or(|items| items.is_empty())
        }
        empty(&self.asset_administration_shells)
            && empty(&self.submodels)
            && empty(&self.concept_descriptions)
    }
}
