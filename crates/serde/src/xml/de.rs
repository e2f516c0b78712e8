//! XML to Environment.
//!
//! The document is parsed into an [`XmlElement`] tree, the prefix the root
//! binds to the AAS namespace is stripped, and each node kind's transformer
//! reads its children through a [`Fields`] cursor. The cursor hands out
//! children strictly in schema order, so unknown, repeated or misplaced
//! elements are left over when a transformer finishes and are reported with
//! their path.

use std::io::BufRead;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shellwork_aas::{
    AasSubmodelElements, AdministrativeInformation, AnnotatedRelationshipElement,
    AssetAdministrationShell, AssetInformation, BasicEventElement, Blob, Capability,
    ConceptDescription, DataSpecificationContent, DataSpecificationIec61360, ElementBase,
    EmbeddedDataSpecification, Entity, Environment, Extension, File, HasSemantics, Key,
    LangString, LevelType, MultiLanguageProperty, Operation, OperationVariable, Property,
    Qualifier, Range, Referable, Reference, ReferenceElement, ReferenceTypes,
    RelationshipElement, Resource, SpecificAssetId, Submodel, SubmodelElement,
    SubmodelElementCollection, SubmodelElementList, ValueList, ValueReferencePair,
};
use tracing::{debug, warn};

use crate::config::XmlConfig;
use crate::error::{Result, SerdeError};
use crate::xml::dispatch;
use crate::xml::prefix::strip_prefix;
use crate::xml::tokens::WireToken;
use crate::xml::tree::{XmlElement, parse_document};
use crate::xml::utils;

/// Deserialize an environment from an XML string with the default
/// configuration.
///
/// Empty input (or input made only of whitespace) yields an environment with
/// all three sections absent.
///
/// # Examples
///
/// ```
/// use shellwork_serde::xml::from_xml_str;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <aas:environment xmlns:aas="https://admin-shell.io/aas/3/0">
///   <aas:submodels>
///     <aas:submodel>
///       <aas:id>urn:example:sm:1</aas:id>
///     </aas:submodel>
///   </aas:submodels>
/// </aas:environment>"#;
/// let env = from_xml_str(xml)?;
/// assert_eq!(env.submodels.unwrap()[0].id, "urn:example:sm:1");
/// assert!(from_xml_str("")?.submodels.is_none());
/// # Ok::<(), shellwork_serde::SerdeError>(())
/// ```
pub fn from_xml_str(xml: &str) -> Result<Environment> {
    from_xml_str_with_config(xml, &XmlConfig::default())
}

pub fn from_xml_str_with_config(xml: &str, config: &XmlConfig) -> Result<Environment> {
    debug!(bytes = xml.len(), "deserializing AAS environment from XML");

    if utils::is_blank(xml) {
        return Ok(Environment::default());
    }

    let root = parse_document(xml)?;
    let prefix = namespace_prefix(&root, config)?.to_string();
    let root = strip_prefix(root, &prefix);
    let env = environment_from_wire(&root, Decoder::new(config))?;

    debug!(
        shells = env.asset_administration_shells.as_ref().map_or(0, Vec::len),
        submodels = env.submodels.as_ref().map_or(0, Vec::len),
        concept_descriptions = env.concept_descriptions.as_ref().map_or(0, Vec::len),
        "deserialized AAS environment"
    );
    Ok(env)
}

/// Deserialize an environment from XML bytes.
pub fn from_xml_slice(xml: &[u8]) -> Result<Environment> {
    from_xml_str(std::str::from_utf8(xml)?)
}

/// Deserialize an environment from an XML reader.
pub fn from_xml_reader<R: BufRead>(mut reader: R) -> Result<Environment> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    from_xml_str(&xml)
}

/// The prefix of the root element, which must be bound to the configured
/// namespace on the root. Any prefix will do, and none for a default
/// namespace declaration.
fn namespace_prefix<'a>(root: &'a XmlElement, config: &XmlConfig) -> Result<&'a str> {
    let (prefix, declaration) = match root.name.split_once(':') {
        Some((prefix, _)) => (prefix, format!("xmlns:{}", prefix)),
        None => ("", "xmlns".to_string()),
    };
    let path = || format!("/{}", root.name);
    match root.attribute(&declaration) {
        Some(namespace) if namespace == config.namespace => Ok(prefix),
        Some(namespace) => Err(SerdeError::violation(
            path(),
            format!(
                "namespace '{}' is not the AAS namespace '{}'",
                namespace, config.namespace
            ),
        )),
        None => Err(SerdeError::violation(
            path(),
            format!("missing namespace declaration '{}'", declaration),
        )),
    }
}

fn environment_from_wire(root: &XmlElement, decoder: Decoder<'_>) -> Result<Environment> {
    let path = format!("/{}", root.name);
    if root.name != utils::ROOT_ELEMENT {
        return Err(SerdeError::violation(
            path,
            format!("expected root element '{}'", utils::ROOT_ELEMENT),
        ));
    }
    decode(root, path, decoder)
}

/// Read-only decoding context shared by all transformers of one call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decoder<'a> {
    config: &'a XmlConfig,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(config: &'a XmlConfig) -> Self {
        Self { config }
    }

    /// Maps a token, falling back to the configured replacement for its
    /// enumeration if there is one. `path` is only evaluated when the token
    /// is unknown.
    fn token<E: WireToken>(&self, text: &str, path: impl FnOnce() -> String) -> Result<E> {
        let unknown = match E::from_token(text) {
            Ok(value) => return Ok(value),
            Err(unknown) => unknown,
        };
        let path = path();
        let Some(fallback) = self.config.token_fallback(E::NAME) else {
            return Err(unknown.at(path));
        };
        let value = E::from_token(fallback).map_err(|e| e.at(path.as_str()))?;
        warn!(
            enum_name = E::NAME,
            token = %unknown.token,
            fallback,
            path = %path,
            "unknown token replaced by configured fallback"
        );
        Ok(value)
    }
}

/// Cursor over the children of one element, consumed in schema order.
///
/// Child paths are only built when a child is decoded as a structure or an
/// error is reported, so leaves cost no allocation beyond their text.
pub(crate) struct Fields<'a> {
    element: &'a XmlElement,
    path: String,
    next: usize,
    decoder: Decoder<'a>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(element: &'a XmlElement, path: String, decoder: Decoder<'a>) -> Self {
        Self {
            element,
            path,
            next: 0,
            decoder,
        }
    }

    pub(crate) fn decoder(&self) -> Decoder<'a> {
        self.decoder
    }

    pub(crate) fn child_path(&self, name: &str) -> String {
        utils::child_path(&self.path, name)
    }

    /// The next child, if it is named `name`.
    fn take(&mut self, name: &str) -> Option<&'a XmlElement> {
        let child = self
            .element
            .children
            .get(self.next)
            .filter(|child| child.name == name)?;
        self.next += 1;
        Some(child)
    }

    fn missing(&self, name: &str) -> SerdeError {
        SerdeError::violation(self.child_path(name), "required element is missing")
    }

    fn leaf(&self, child: &'a XmlElement) -> Result<&'a str> {
        if !child.children.is_empty() {
            return Err(SerdeError::violation(
                self.child_path(&child.name),
                "expected text content, found child elements",
            ));
        }
        Ok(child.text())
    }

    fn boolean(&self, child: &'a XmlElement) -> Result<bool> {
        let text = self.leaf(child)?;
        utils::parse_bool(text).ok_or_else(|| {
            SerdeError::violation(
                self.child_path(&child.name),
                format!("invalid boolean '{}'", text),
            )
        })
    }

    fn token_of<E: WireToken>(&self, child: &'a XmlElement) -> Result<E> {
        let text = self.leaf(child)?;
        self.decoder.token(text, || self.child_path(&child.name))
    }

    /// Text of an optional leaf; an empty leaf reads as absent.
    pub(crate) fn optional_text(&mut self, name: &str) -> Result<Option<String>> {
        match self.take(name) {
            Some(child) => {
                let text = self.leaf(child)?;
                Ok((!text.is_empty()).then(|| text.to_string()))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn required_text(&mut self, name: &str) -> Result<String> {
        let child = self.take(name).ok_or_else(|| self.missing(name))?;
        Ok(self.leaf(child)?.to_string())
    }

    pub(crate) fn optional<T: FromWire>(&mut self, name: &str) -> Result<Option<T>> {
        match self.take(name) {
            Some(child) => decode(child, self.child_path(name), self.decoder).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn required<T: FromWire>(&mut self, name: &str) -> Result<T> {
        let child = self.take(name).ok_or_else(|| self.missing(name))?;
        decode(child, self.child_path(name), self.decoder)
    }

    pub(crate) fn optional_token<E: WireToken>(&mut self, name: &str) -> Result<Option<E>> {
        match self.take(name) {
            Some(child) => self.token_of(child).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn required_token<E: WireToken>(&mut self, name: &str) -> Result<E> {
        let child = self.take(name).ok_or_else(|| self.missing(name))?;
        self.token_of(child)
    }

    pub(crate) fn optional_bool(&mut self, name: &str) -> Result<Option<bool>> {
        match self.take(name) {
            Some(child) => self.boolean(child).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn required_bool(&mut self, name: &str) -> Result<bool> {
        let child = self.take(name).ok_or_else(|| self.missing(name))?;
        self.boolean(child)
    }

    /// A container element, which must hold at least one child when present.
    pub(crate) fn container(&mut self, name: &str) -> Result<Option<&'a XmlElement>> {
        let Some(wrapper) = self.take(name) else {
            return Ok(None);
        };
        if wrapper.children.is_empty() {
            return Err(SerdeError::violation(
                self.child_path(name),
                "container must hold at least one element",
            ));
        }
        Ok(Some(wrapper))
    }

    /// A container of `item` elements.
    pub(crate) fn list<T: FromWire>(
        &mut self,
        container: &str,
        item: &str,
    ) -> Result<Option<Vec<T>>> {
        let Some(wrapper) = self.container(container)? else {
            return Ok(None);
        };
        let path = self.child_path(container);
        wrapper
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let child_path = utils::indexed_path(&path, &child.name, index);
                if child.name != item {
                    return Err(SerdeError::violation(
                        child_path,
                        format!("unexpected element, expected '{}'", item),
                    ));
                }
                decode(child, child_path, self.decoder)
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub(crate) fn required_list<T: FromWire>(
        &mut self,
        container: &str,
        item: &str,
    ) -> Result<Vec<T>> {
        self.list(container, item)?
            .ok_or_else(|| self.missing(container))
    }

    /// A container of submodel elements that the dispatcher already decoded;
    /// takes as many of them from `nested` as the container holds.
    fn nested(
        &mut self,
        container: &str,
        nested: &mut impl Iterator<Item = SubmodelElement>,
    ) -> Result<Option<Vec<SubmodelElement>>> {
        let Some(wrapper) = self.container(container)? else {
            return Ok(None);
        };
        Ok(Some(nested.by_ref().take(wrapper.children.len()).collect()))
    }

    fn operation_variables(
        &mut self,
        container: &str,
        nested: &mut impl Iterator<Item = SubmodelElement>,
    ) -> Result<Option<Vec<OperationVariable>>> {
        Ok(self
            .nested(container, nested)?
            .map(|values| values.into_iter().map(OperationVariable::new).collect()))
    }

    /// Fails on the first child no transformer asked for.
    pub(crate) fn finish(self) -> Result<()> {
        if let Some(child) = self.element.children.get(self.next) {
            return Err(SerdeError::violation(
                self.child_path(&child.name),
                "unexpected element",
            ));
        }
        if self.element.children.is_empty() && !utils::is_blank(self.element.text()) {
            return Err(SerdeError::violation(self.path, "unexpected text content"));
        }
        Ok(())
    }
}

/// Transformer from a wire element to a model node.
pub(crate) trait FromWire: Sized {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self>;
}

/// Decodes `element` and checks that nothing was left unread.
pub(crate) fn decode<T: FromWire>(
    element: &XmlElement,
    path: String,
    decoder: Decoder<'_>,
) -> Result<T> {
    let mut fields = Fields::new(element, path, decoder);
    let value = T::from_fields(&mut fields)?;
    fields.finish()?;
    Ok(value)
}

fn referable(fields: &mut Fields<'_>) -> Result<Referable> {
    Ok(Referable {
        extensions: fields.list("extensions", "extension")?,
        category: fields.optional_text("category")?,
        id_short: fields.optional_text("idShort")?,
        display_name: fields.list("displayName", "langStringNameType")?,
        description: fields.list("description", "langStringTextType")?,
    })
}

fn semantics(fields: &mut Fields<'_>) -> Result<HasSemantics> {
    Ok(HasSemantics {
        semantic_id: fields.optional("semanticId")?,
        supplemental_semantic_ids: fields.list("supplementalSemanticIds", "reference")?,
    })
}

fn embedded_data_specifications(
    fields: &mut Fields<'_>,
) -> Result<Option<Vec<EmbeddedDataSpecification>>> {
    fields.list("embeddedDataSpecifications", "embeddedDataSpecification")
}

fn element_base(fields: &mut Fields<'_>) -> Result<ElementBase> {
    Ok(ElementBase {
        referable: referable(fields)?,
        semantics: semantics(fields)?,
        qualifiers: fields.list("qualifiers", "qualifier")?,
        embedded_data_specifications: embedded_data_specifications(fields)?,
    })
}

impl FromWire for LangString {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(LangString {
            language: fields.required_text("language")?,
            text: fields.required_text("text")?,
        })
    }
}

impl FromWire for Key {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Key {
            key_type: fields.required_token("type")?,
            value: fields.required_text("value")?,
        })
    }
}

const REFERRED_SEMANTIC_ID: &str = "referredSemanticId";

/// One level of a reference chain; the referred semantic id is returned
/// undecoded so the caller can continue the chain without recursing.
fn reference_level<'a>(
    fields: &mut Fields<'a>,
) -> Result<(ReferenceTypes, Vec<Key>, Option<&'a XmlElement>)> {
    let reference_type = fields.required_token("type")?;
    let referred = fields.take(REFERRED_SEMANTIC_ID);
    let keys = fields.required_list("keys", "key")?;
    Ok((reference_type, keys, referred))
}

/// `path` followed by `levels` referred semantic id segments.
fn chain_path(path: &str, levels: usize) -> String {
    let mut chain = String::with_capacity(path.len() + levels * (REFERRED_SEMANTIC_ID.len() + 1));
    chain.push_str(path);
    for _ in 0..levels {
        chain.push('/');
        chain.push_str(REFERRED_SEMANTIC_ID);
    }
    chain
}

impl FromWire for Reference {
    /// Inner levels are decoded against a path relative to the level above;
    /// the full path is only built for an error.
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        let (reference_type, keys, mut pending) = reference_level(fields)?;

        let mut levels = Vec::new();
        while let Some(element) = pending {
            let segment = REFERRED_SEMANTIC_ID.to_string();
            let mut inner = Fields::new(element, segment, fields.decoder());
            let level = reference_level(&mut inner).and_then(|level| {
                inner.finish()?;
                Ok(level)
            });
            let (inner_type, inner_keys, referred) =
                level.map_err(|e| e.under(&chain_path(&fields.path, levels.len())))?;
            levels.push((inner_type, inner_keys));
            pending = referred;
        }

        let mut referred: Option<Reference> = None;
        while let Some((inner_type, inner_keys)) = levels.pop() {
            let mut level = Reference::new(inner_type, inner_keys);
            level.referred_semantic_id = referred.take().map(Box::new);
            referred = Some(level);
        }

        let mut reference = Reference::new(reference_type, keys);
        reference.referred_semantic_id = referred.map(Box::new);
        Ok(reference)
    }
}

impl FromWire for Extension {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Extension {
            semantics: semantics(fields)?,
            name: fields.required_text("name")?,
            value_type: fields.optional_token("valueType")?,
            value: fields.optional_text("value")?,
            refers_to: fields.list("refersTo", "reference")?,
        })
    }
}

impl FromWire for Qualifier {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Qualifier {
            semantics: semantics(fields)?,
            kind: fields.optional_token("kind")?,
            qualifier_type: fields.required_text("type")?,
            value_type: fields.required_token("valueType")?,
            value: fields.optional_text("value")?,
            value_id: fields.optional("valueId")?,
        })
    }
}

impl FromWire for AdministrativeInformation {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(AdministrativeInformation {
            embedded_data_specifications: embedded_data_specifications(fields)?,
            version: fields.optional_text("version")?,
            revision: fields.optional_text("revision")?,
            creator: fields.optional("creator")?,
            template_id: fields.optional_text("templateId")?,
        })
    }
}

impl FromWire for EmbeddedDataSpecification {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        let data_specification = fields.required("dataSpecification")?;
        let wrapper = fields
            .take("dataSpecificationContent")
            .ok_or_else(|| fields.missing("dataSpecificationContent"))?;
        let path = fields.child_path("dataSpecificationContent");
        let content: DataSpecificationContent =
            dispatch::content_decode(wrapper, &path, fields.decoder())?;
        Ok(EmbeddedDataSpecification::new(data_specification, content))
    }
}

impl FromWire for DataSpecificationIec61360 {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(DataSpecificationIec61360 {
            preferred_name: fields
                .required_list("preferredName", "langStringPreferredNameTypeIec61360")?,
            short_name: fields.list("shortName", "langStringShortNameTypeIec61360")?,
            unit: fields.optional_text("unit")?,
            unit_id: fields.optional("unitId")?,
            source_of_definition: fields.optional_text("sourceOfDefinition")?,
            symbol: fields.optional_text("symbol")?,
            data_type: fields.optional_token("dataType")?,
            definition: fields.list("definition", "langStringDefinitionTypeIec61360")?,
            value_format: fields.optional_text("valueFormat")?,
            value_list: fields.optional("valueList")?,
            value: fields.optional_text("value")?,
            level_type: fields.optional("levelType")?,
        })
    }
}

impl FromWire for ValueList {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(ValueList {
            value_reference_pairs: fields
                .required_list("valueReferencePairs", "valueReferencePair")?,
        })
    }
}

impl FromWire for ValueReferencePair {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(ValueReferencePair {
            value: fields.required_text("value")?,
            value_id: fields.required("valueId")?,
        })
    }
}

impl FromWire for LevelType {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(LevelType {
            min: fields.required_bool("min")?,
            nom: fields.required_bool("nom")?,
            typ: fields.required_bool("typ")?,
            max: fields.required_bool("max")?,
        })
    }
}

impl FromWire for Resource {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Resource {
            path: fields.required_text("path")?,
            content_type: fields.optional_text("contentType")?,
        })
    }
}

impl FromWire for SpecificAssetId {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(SpecificAssetId {
            semantics: semantics(fields)?,
            name: fields.required_text("name")?,
            value: fields.required_text("value")?,
            external_subject_id: fields.optional("externalSubjectId")?,
        })
    }
}

impl FromWire for AssetInformation {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(AssetInformation {
            asset_kind: fields.required_token("assetKind")?,
            global_asset_id: fields.optional_text("globalAssetId")?,
            specific_asset_ids: fields.list("specificAssetIds", "specificAssetId")?,
            asset_type: fields.optional_text("assetType")?,
            default_thumbnail: fields.optional("defaultThumbnail")?,
        })
    }
}

impl FromWire for AssetAdministrationShell {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(AssetAdministrationShell {
            referable: referable(fields)?,
            administration: fields.optional("administration")?,
            id: fields.required_text("id")?,
            embedded_data_specifications: embedded_data_specifications(fields)?,
            derived_from: fields.optional("derivedFrom")?,
            asset_information: fields.required("assetInformation")?,
            submodels: fields.list("submodels", "reference")?,
        })
    }
}

impl FromWire for Submodel {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Submodel {
            referable: referable(fields)?,
            administration: fields.optional("administration")?,
            id: fields.required_text("id")?,
            kind: fields.optional_token("kind")?,
            semantics: semantics(fields)?,
            qualifiers: fields.list("qualifiers", "qualifier")?,
            embedded_data_specifications: embedded_data_specifications(fields)?,
            submodel_elements: match fields.container("submodelElements")? {
                Some(wrapper) => Some(dispatch::decode_submodel_elements(
                    wrapper,
                    &fields.child_path("submodelElements"),
                    fields.decoder(),
                )?),
                None => None,
            },
        })
    }
}

impl FromWire for ConceptDescription {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(ConceptDescription {
            referable: referable(fields)?,
            administration: fields.optional("administration")?,
            id: fields.required_text("id")?,
            embedded_data_specifications: embedded_data_specifications(fields)?,
            is_case_of: fields.list("isCaseOf", "reference")?,
        })
    }
}

impl FromWire for Environment {
    fn from_fields(fields: &mut Fields<'_>) -> Result<Self> {
        Ok(Environment {
            asset_administration_shells: fields
                .list("assetAdministrationShells", "assetAdministrationShell")?,
            submodels: fields.list("submodels", "submodel")?,
            concept_descriptions: fields.list("conceptDescriptions", "conceptDescription")?,
        })
    }
}

fn blob_value(fields: &mut Fields<'_>) -> Result<Option<Vec<u8>>> {
    let Some(text) = fields.optional_text("value")? else {
        return Ok(None);
    };
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact).map(Some).map_err(|e| {
        SerdeError::violation(
            fields.child_path("value"),
            format!("invalid base64 content: {}", e),
        )
    })
}

/// Builds one submodel element of kind `kind` from its wire element.
///
/// `nested` holds the element's already decoded children in the order of
/// [`dispatch::nested_elements`]; this function never recurses.
pub(crate) fn submodel_element_from_wire(
    kind: AasSubmodelElements,
    element: &XmlElement,
    path: &str,
    nested: Vec<SubmodelElement>,
    decoder: Decoder<'_>,
) -> Result<SubmodelElement> {
    let mut fields = Fields::new(element, path.to_string(), decoder);
    let mut nested = nested.into_iter();
    let base = element_base(&mut fields)?;

    let decoded = match kind {
        AasSubmodelElements::Property => SubmodelElement::Property(Property {
            base,
            value_type: fields.required_token("valueType")?,
            value: fields.optional_text("value")?,
            value_id: fields.optional("valueId")?,
        }),
        AasSubmodelElements::MultiLanguageProperty => {
            SubmodelElement::MultiLanguageProperty(MultiLanguageProperty {
                base,
                value: fields.list("value", "langStringTextType")?,
                value_id: fields.optional("valueId")?,
            })
        }
        AasSubmodelElements::Range => SubmodelElement::Range(Range {
            base,
            value_type: fields.required_token("valueType")?,
            min: fields.optional_text("min")?,
            max: fields.optional_text("max")?,
        }),
        AasSubmodelElements::Blob => SubmodelElement::Blob(Blob {
            base,
            value: blob_value(&mut fields)?,
            content_type: fields.required_text("contentType")?,
        }),
        AasSubmodelElements::File => SubmodelElement::File(File {
            base,
            value: fields.optional_text("value")?,
            content_type: fields.required_text("contentType")?,
        }),
        AasSubmodelElements::ReferenceElement => {
            SubmodelElement::ReferenceElement(ReferenceElement {
                base,
                value: fields.optional("value")?,
            })
        }
        AasSubmodelElements::RelationshipElement => {
            SubmodelElement::RelationshipElement(RelationshipElement {
                base,
                first: fields.required("first")?,
                second: fields.required("second")?,
            })
        }
        AasSubmodelElements::AnnotatedRelationshipElement => {
            SubmodelElement::AnnotatedRelationshipElement(AnnotatedRelationshipElement {
                base,
                first: fields.required("first")?,
                second: fields.required("second")?,
                annotations: fields.nested("annotations", &mut nested)?,
            })
        }
        AasSubmodelElements::Operation => SubmodelElement::Operation(Operation {
            base,
            input_variables: fields.operation_variables("inputVariables", &mut nested)?,
            output_variables: fields.operation_variables("outputVariables", &mut nested)?,
            inoutput_variables: fields.operation_variables("inoutputVariables", &mut nested)?,
        }),
        AasSubmodelElements::Capability => SubmodelElement::Capability(Capability { base }),
        AasSubmodelElements::Entity => SubmodelElement::Entity(Entity {
            base,
            statements: fields.nested("statements", &mut nested)?,
            entity_type: fields.required_token("entityType")?,
            global_asset_id: fields.optional_text("globalAssetId")?,
            specific_asset_ids: fields.list("specificAssetIds", "specificAssetId")?,
        }),
        AasSubmodelElements::BasicEventElement => {
            SubmodelElement::BasicEventElement(BasicEventElement {
                base,
                observed: fields.required("observed")?,
                direction: fields.required_token("direction")?,
                state: fields.required_token("state")?,
                message_topic: fields.optional_text("messageTopic")?,
                message_broker: fields.optional("messageBroker")?,
                last_update: fields.optional_text("lastUpdate")?,
                min_interval: fields.optional_text("minInterval")?,
                max_interval: fields.optional_text("maxInterval")?,
            })
        }
        AasSubmodelElements::SubmodelElementCollection => {
            SubmodelElement::SubmodelElementCollection(SubmodelElementCollection {
                base,
                value: fields.nested("value", &mut nested)?,
            })
        }
        AasSubmodelElements::SubmodelElementList => {
            SubmodelElement::SubmodelElementList(SubmodelElementList {
                base,
                order_relevant: fields.optional_bool("orderRelevant")?,
                semantic_id_list_element: fields.optional("semanticIdListElement")?,
                type_value_list_element: fields.required_token("typeValueListElement")?,
                value_type_list_element: fields.optional_token("valueTypeListElement")?,
                value: fields.nested("value", &mut nested)?,
            })
        }
        AasSubmodelElements::DataElement
        | AasSubmodelElements::EventElement
        | AasSubmodelElements::SubmodelElement => {
            return Err(SerdeError::UnsupportedElementType {
                tag: element.name.clone(),
                path: path.to_string(),
            });
        }
    };

    fields.finish()?;
    Ok(decoded)
}
