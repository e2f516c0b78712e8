//! Asset administration shells and the asset they describe.

use serde::{Deserialize, Serialize};

use crate::common::{AdministrativeInformation, Referable, Resource, SpecificAssetId};
use crate::data_specification::EmbeddedDataSpecification;
use crate::enums::AssetKind;
use crate::reference::Reference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAdministrationShell {
    #[serde(flatten)]
    pub referable: Referable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_data_specifications: Option<Vec<EmbeddedDataSpecification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<Reference>,
    pub asset_information: AssetInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submodels: Option<Vec<Reference>>,
}

impl AssetAdministrationShell {
    pub fn new(id: impl Into<String>, asset_information: AssetInformation) -> Self {
        Self {
            referable: Referable::default(),
            administration: None,
            id: id.into(),
            embedded_data_specifications: None,
            derived_from: None,
            asset_information,
            submodels: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInformation {
    pub asset_kind: AssetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_asset_ids: Option<Vec<SpecificAssetId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_thumbnail: Option<Resource>,
}

impl AssetInformation {
    pub fn new(asset_kind: AssetKind) -> Self {
        Self {
            asset_kind,
            global_asset_id: None,
            specific_asset_ids: None,
            asset_type: None,
            default_thumbnail: None,
        }
    }
}
