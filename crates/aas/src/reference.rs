//! References and their key chains.

use serde::{Deserialize, Serialize};

use crate::enums::{KeyTypes, ReferenceTypes};

/// One segment of a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "type")]
    pub key_type: KeyTypes,
    pub value: String,
}

impl Key {
    pub fn new(key_type: KeyTypes, value: impl Into<String>) -> Self {
        Self {
            key_type,
            value: value.into(),
        }
    }
}

/// A typed pointer to a model element or to an external resource.
///
/// A reference always holds at least one key. The optional
/// `referred_semantic_id` is itself a reference, so chains of arbitrary length
/// are possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(rename = "type")]
    pub reference_type: ReferenceTypes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_semantic_id: Option<Box<Reference>>,
    pub keys: Vec<Key>,
}

impl Reference {
    pub fn new(reference_type: ReferenceTypes, keys: Vec<Key>) -> Self {
        Self {
            reference_type,
            referred_semantic_id: None,
            keys,
        }
    }

    /// External reference with a single `GlobalReference` key, the usual shape
    /// of a semantic id.
    pub fn external(value: impl Into<String>) -> Self {
        Self::new(
            ReferenceTypes::ExternalReference,
            vec![Key::new(KeyTypes::GlobalReference, value)],
        )
    }

    /// Model reference with a single key pointing at an identifiable.
    pub fn model(key_type: KeyTypes, value: impl Into<String>) -> Self {
        Self::new(ReferenceTypes::ModelReference, vec![Key::new(key_type, value)])
    }

    pub fn with_referred_semantic_id(mut self, referred: Reference) -> Self {
        self.referred_semantic_id = Some(Box::new(referred));
        self
    }
}

impl Drop for Reference {
    /// Unlinks the referred chain level by level so long chains do not
    /// recurse.
    fn drop(&mut self) {
        let mut next = self.referred_semantic_id.take();
        while let Some(mut reference) = next {
            next = reference.referred_semantic_id.take();
        }
    }
}
