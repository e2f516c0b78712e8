//! Environment to XML.
//!
//! Each node kind has a transformer that builds its [`XmlElement`] with the
//! children in schema order. Optional fields that are absent or empty are
//! left out entirely, and repeated children are wrapped in their plural
//! container, which is itself left out when there is nothing to wrap.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shellwork_aas::{
    AdministrativeInformation, AssetAdministrationShell, AssetInformation, ConceptDescription,
    DataSpecificationIec61360, ElementBase, EmbeddedDataSpecification, Environment, Extension,
    HasSemantics, Key, LangString, LevelType, OperationVariable, Qualifier, Referable, Reference,
    Resource, SpecificAssetId, Submodel, SubmodelElement, ValueReferencePair,
};
use tracing::debug;

use crate::config::XmlConfig;
use crate::error::{Result, SerdeError};
use crate::xml::dispatch;
use crate::xml::prefix::add_prefix;
use crate::xml::tokens::WireToken;
use crate::xml::tree::{XmlElement, render_document};
use crate::xml::utils;

/// Serialize an environment to an XML string with the default configuration.
///
/// An environment without shells, submodels and concept descriptions
/// serializes to the empty string.
///
/// # Examples
///
/// ```
/// use shellwork_aas::{AssetAdministrationShell, AssetInformation, AssetKind, Environment};
/// use shellwork_serde::xml::to_xml_string;
///
/// assert_eq!(to_xml_string(&Environment::default())?, "");
///
/// let shell = AssetAdministrationShell::new(
///     "urn:example:aas:1",
///     AssetInformation::new(AssetKind::Instance),
/// );
/// let env = Environment {
///     asset_administration_shells: Some(vec![shell]),
///     ..Default::default()
/// };
/// let xml = to_xml_string(&env)?;
/// assert!(xml.contains("<aas:id>urn:example:aas:1</aas:id>"));
/// # Ok::<(), shellwork_serde::SerdeError>(())
/// ```
pub fn to_xml_string(env: &Environment) -> Result<String> {
    to_xml_string_with_config(env, &XmlConfig::default())
}

pub fn to_xml_string_with_config(env: &Environment, config: &XmlConfig) -> Result<String> {
    let mut buffer = Vec::new();
    to_xml_writer_with_config(env, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|e| SerdeError::Utf8(e.utf8_error()))
}

/// Serialize an environment to an XML byte vector.
pub fn to_xml_vec(env: &Environment) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(env, &mut buffer)?;
    Ok(buffer)
}

/// Serialize an environment to an XML writer.
pub fn to_xml_writer<W: Write>(env: &Environment, writer: W) -> Result<()> {
    to_xml_writer_with_config(env, writer, &XmlConfig::default())
}

/// Serialize an environment to an XML writer using `config`.
///
/// Nothing is written for an empty environment.
pub fn to_xml_writer_with_config<W: Write>(
    env: &Environment,
    writer: W,
    config: &XmlConfig,
) -> Result<()> {
    debug!(
        shells = section_len(&env.asset_administration_shells),
        submodels = section_len(&env.submodels),
        concept_descriptions = section_len(&env.concept_descriptions),
        "serializing AAS environment to XML"
    );

    if env.is_empty() {
        return Ok(());
    }

    let tree = environment_to_wire(env, config)?;
    render_document(&tree, config.indent, writer)
}

fn section_len<T>(section: &Option<Vec<T>>) -> usize {
    section.as_ref().map_or(0, Vec::len)
}

/// Builds the prefixed document tree of a non-empty environment.
pub(crate) fn environment_to_wire(env: &Environment, config: &XmlConfig) -> Result<XmlElement> {
    let mut root = XmlElement::new(utils::ROOT_ELEMENT);
    if config.prefix.is_empty() {
        root.push_attribute("xmlns", config.namespace.as_str());
    } else {
        root.push_attribute(format!("xmlns:{}", config.prefix), config.namespace.as_str());
    }
    root.push_attribute("xmlns:xsi", config.xsi_namespace.as_str());
    root.push_attribute("xsi:schemaLocation", config.schema_location.as_str());

    push_list(
        &mut root,
        "assetAdministrationShells",
        "assetAdministrationShell",
        env.asset_administration_shells.as_deref(),
    )?;
    push_list(&mut root, "submodels", "submodel", env.submodels.as_deref())?;
    push_list(
        &mut root,
        "conceptDescriptions",
        "conceptDescription",
        env.concept_descriptions.as_deref(),
    )?;

    Ok(add_prefix(root, &config.prefix))
}

/// Transformer from a model node to its wire element.
///
/// `name` is the element name the parent expects; the same node kind appears
/// under different names (a `Reference` is a `semanticId`, a `first`, ...).
pub(crate) trait ToWire {
    fn to_wire(&self, name: &str) -> Result<XmlElement>;
}

pub(crate) fn push_text(parent: &mut XmlElement, name: &str, text: &str) {
    parent.push(XmlElement::with_text(name, text));
}

pub(crate) fn push_opt_text(parent: &mut XmlElement, name: &str, text: Option<&str>) {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        push_text(parent, name, text);
    }
}

pub(crate) fn push_token<E: WireToken>(parent: &mut XmlElement, name: &str, value: E) {
    push_text(parent, name, value.token());
}

pub(crate) fn push_opt_token<E: WireToken>(parent: &mut XmlElement, name: &str, value: Option<E>) {
    if let Some(value) = value {
        push_token(parent, name, value);
    }
}

pub(crate) fn push_child<T: ToWire>(parent: &mut XmlElement, name: &str, value: &T) -> Result<()> {
    parent.push(value.to_wire(name)?);
    Ok(())
}

pub(crate) fn push_opt_child<T: ToWire>(
    parent: &mut XmlElement,
    name: &str,
    value: Option<&T>,
) -> Result<()> {
    match value {
        Some(value) => push_child(parent, name, value),
        None => Ok(()),
    }
}

/// Wraps `items` under `container`, one `item` element each. Nothing is
/// pushed for an absent or empty sequence.
pub(crate) fn push_list<T: ToWire>(
    parent: &mut XmlElement,
    container: &str,
    item: &str,
    items: Option<&[T]>,
) -> Result<()> {
    let Some(items) = items.filter(|items| !items.is_empty()) else {
        return Ok(());
    };
    let mut wrapper = XmlElement::new(container);
    for value in items {
        push_child(&mut wrapper, item, value)?;
    }
    parent.push(wrapper);
    Ok(())
}

fn push_referable(parent: &mut XmlElement, referable: &Referable) -> Result<()> {
    push_list(parent, "extensions", "extension", referable.extensions.as_deref())?;
    push_opt_text(parent, "category", referable.category.as_deref());
    push_opt_text(parent, "idShort", referable.id_short.as_deref());
    push_list(
        parent,
        "displayName",
        "langStringNameType",
        referable.display_name.as_deref(),
    )?;
    push_list(
        parent,
        "description",
        "langStringTextType",
        referable.description.as_deref(),
    )
}

fn push_semantics(parent: &mut XmlElement, semantics: &HasSemantics) -> Result<()> {
    push_opt_child(parent, "semanticId", semantics.semantic_id.as_ref())?;
    push_list(
        parent,
        "supplementalSemanticIds",
        "reference",
        semantics.supplemental_semantic_ids.as_deref(),
    )
}

fn push_embedded_data_specifications(
    parent: &mut XmlElement,
    specifications: Option<&[EmbeddedDataSpecification]>,
) -> Result<()> {
    push_list(
        parent,
        "embeddedDataSpecifications",
        "embeddedDataSpecification",
        specifications,
    )
}

/// Attributes every submodel element variant starts with.
pub(crate) fn push_element_base(parent: &mut XmlElement, base: &ElementBase) -> Result<()> {
    push_referable(parent, &base.referable)?;
    push_semantics(parent, &base.semantics)?;
    push_list(parent, "qualifiers", "qualifier", base.qualifiers.as_deref())?;
    push_embedded_data_specifications(parent, base.embedded_data_specifications.as_deref())
}

impl ToWire for LangString {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_text(&mut element, "language", &self.language);
        push_text(&mut element, "text", &self.text);
        Ok(element)
    }
}

impl ToWire for Key {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_token(&mut element, "type", self.key_type);
        push_text(&mut element, "value", &self.value);
        Ok(element)
    }
}

impl ToWire for Reference {
    /// The `referredSemanticId` chain is walked iteratively, innermost level
    /// first.
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(referred) = current.referred_semantic_id.as_deref() {
            chain.push(referred);
            current = referred;
        }

        let mut inner: Option<XmlElement> = None;
        for (depth, reference) in chain.iter().enumerate().rev() {
            assert!(
                !reference.keys.is_empty(),
                "a Reference must hold at least one key"
            );
            let mut element = XmlElement::new(if depth == 0 {
                name
            } else {
                "referredSemanticId"
            });
            push_token(&mut element, "type", reference.reference_type);
            if let Some(referred) = inner.take() {
                element.push(referred);
            }
            push_list(&mut element, "keys", "key", Some(reference.keys.as_slice()))?;
            inner = Some(element);
        }

        Ok(inner.unwrap_or_else(|| XmlElement::new(name)))
    }
}

impl ToWire for Extension {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_semantics(&mut element, &self.semantics)?;
        push_text(&mut element, "name", &self.name);
        push_opt_token(&mut element, "valueType", self.value_type);
        push_opt_text(&mut element, "value", self.value.as_deref());
        push_list(&mut element, "refersTo", "reference", self.refers_to.as_deref())?;
        Ok(element)
    }
}

impl ToWire for Qualifier {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_semantics(&mut element, &self.semantics)?;
        push_opt_token(&mut element, "kind", self.kind);
        push_text(&mut element, "type", &self.qualifier_type);
        push_token(&mut element, "valueType", self.value_type);
        push_opt_text(&mut element, "value", self.value.as_deref());
        push_opt_child(&mut element, "valueId", self.value_id.as_ref())?;
        Ok(element)
    }
}

impl ToWire for AdministrativeInformation {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_embedded_data_specifications(
            &mut element,
            self.embedded_data_specifications.as_deref(),
        )?;
        push_opt_text(&mut element, "version", self.version.as_deref());
        push_opt_text(&mut element, "revision", self.revision.as_deref());
        push_opt_child(&mut element, "creator", self.creator.as_ref())?;
        push_opt_text(&mut element, "templateId", self.template_id.as_deref());
        Ok(element)
    }
}

impl ToWire for EmbeddedDataSpecification {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_child(&mut element, "dataSpecification", &self.data_specification)?;

        let (_, content) = dispatch::content_encode(&self.data_specification_content)?;
        let mut wrapper = XmlElement::new("dataSpecificationContent");
        wrapper.push(content);
        element.push(wrapper);
        Ok(element)
    }
}

impl ToWire for DataSpecificationIec61360 {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_list(
            &mut element,
            "preferredName",
            "langStringPreferredNameTypeIec61360",
            Some(self.preferred_name.as_slice()),
        )?;
        push_list(
            &mut element,
            "shortName",
            "langStringShortNameTypeIec61360",
            self.short_name.as_deref(),
        )?;
        push_opt_text(&mut element, "unit", self.unit.as_deref());
        push_opt_child(&mut element, "unitId", self.unit_id.as_ref())?;
        push_opt_text(
            &mut element,
            "sourceOfDefinition",
            self.source_of_definition.as_deref(),
        );
        push_opt_text(&mut element, "symbol", self.symbol.as_deref());
        push_opt_token(&mut element, "dataType", self.data_type);
        push_list(
            &mut element,
            "definition",
            "langStringDefinitionTypeIec61360",
            self.definition.as_deref(),
        )?;
        push_opt_text(&mut element, "valueFormat", self.value_format.as_deref());
        if let Some(value_list) = self
            .value_list
            .as_ref()
            .filter(|list| !list.value_reference_pairs.is_empty())
        {
            let mut list = XmlElement::new("valueList");
            push_list(
                &mut list,
                "valueReferencePairs",
                "valueReferencePair",
                Some(value_list.value_reference_pairs.as_slice()),
            )?;
            element.push(list);
        }
        push_opt_text(&mut element, "value", self.value.as_deref());
        push_opt_child(&mut element, "levelType", self.level_type.as_ref())?;
        Ok(element)
    }
}

impl ToWire for ValueReferencePair {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_text(&mut element, "value", &self.value);
        push_child(&mut element, "valueId", &self.value_id)?;
        Ok(element)
    }
}

impl ToWire for LevelType {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_text(&mut element, "min", utils::bool_to_string(self.min));
        push_text(&mut element, "nom", utils::bool_to_string(self.nom));
        push_text(&mut element, "typ", utils::bool_to_string(self.typ));
        push_text(&mut element, "max", utils::bool_to_string(self.max));
        Ok(element)
    }
}

impl ToWire for Resource {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_text(&mut element, "path", &self.path);
        push_opt_text(&mut element, "contentType", self.content_type.as_deref());
        Ok(element)
    }
}

impl ToWire for SpecificAssetId {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_semantics(&mut element, &self.semantics)?;
        push_text(&mut element, "name", &self.name);
        push_text(&mut element, "value", &self.value);
        push_opt_child(
            &mut element,
            "externalSubjectId",
            self.external_subject_id.as_ref(),
        )?;
        Ok(element)
    }
}

impl ToWire for AssetInformation {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_token(&mut element, "assetKind", self.asset_kind);
        push_opt_text(&mut element, "globalAssetId", self.global_asset_id.as_deref());
        push_list(
            &mut element,
            "specificAssetIds",
            "specificAssetId",
            self.specific_asset_ids.as_deref(),
        )?;
        push_opt_text(&mut element, "assetType", self.asset_type.as_deref());
        push_opt_child(&mut element, "defaultThumbnail", self.default_thumbnail.as_ref())?;
        Ok(element)
    }
}

impl ToWire for AssetAdministrationShell {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_referable(&mut element, &self.referable)?;
        push_opt_child(&mut element, "administration", self.administration.as_ref())?;
        push_text(&mut element, "id", &self.id);
        push_embedded_data_specifications(
            &mut element,
            self.embedded_data_specifications.as_deref(),
        )?;
        push_opt_child(&mut element, "derivedFrom", self.derived_from.as_ref())?;
        push_child(&mut element, "assetInformation", &self.asset_information)?;
        push_list(&mut element, "submodels", "reference", self.submodels.as_deref())?;
        Ok(element)
    }
}

impl ToWire for Submodel {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_referable(&mut element, &self.referable)?;
        push_opt_child(&mut element, "administration", self.administration.as_ref())?;
        push_text(&mut element, "id", &self.id);
        push_opt_token(&mut element, "kind", self.kind);
        push_semantics(&mut element, &self.semantics)?;
        push_list(&mut element, "qualifiers", "qualifier", self.qualifiers.as_deref())?;
        push_embedded_data_specifications(
            &mut element,
            self.embedded_data_specifications.as_deref(),
        )?;
        if let Some(elements) = self
            .submodel_elements
            .as_deref()
            .filter(|elements| !elements.is_empty())
        {
            let mut wrapper = XmlElement::new("submodelElements");
            wrapper
                .children
                .extend(dispatch::encode_submodel_elements(elements)?);
            element.push(wrapper);
        }
        Ok(element)
    }
}

impl ToWire for ConceptDescription {
    fn to_wire(&self, name: &str) -> Result<XmlElement> {
        let mut element = XmlElement::new(name);
        push_referable(&mut element, &self.referable)?;
        push_opt_child(&mut element, "administration", self.administration.as_ref())?;
        push_text(&mut element, "id", &self.id);
        push_embedded_data_specifications(
            &mut element,
            self.embedded_data_specifications.as_deref(),
        )?;
        push_list(&mut element, "isCaseOf", "reference", self.is_case_of.as_deref())?;
        Ok(element)
    }
}

/// Pushes the next `count` already encoded elements under `container`.
fn push_nested(
    parent: &mut XmlElement,
    container: &str,
    nested: &mut impl Iterator<Item = XmlElement>,
    count: usize,
) {
    if count == 0 {
        return;
    }
    let mut wrapper = XmlElement::new(container);
    wrapper.children.extend(nested.by_ref().take(count));
    parent.push(wrapper);
}

/// Operation arguments wrap each element as `operationVariable/value/<element>`.
fn push_operation_variables(
    parent: &mut XmlElement,
    container: &str,
    nested: &mut impl Iterator<Item = XmlElement>,
    variables: Option<&[OperationVariable]>,
) {
    let count = variables.map_or(0, <[OperationVariable]>::len);
    if count == 0 {
        return;
    }
    let mut wrapper = XmlElement::new(container);
    for element in nested.by_ref().take(count) {
        let mut value = XmlElement::new("value");
        value.push(element);
        let mut variable = XmlElement::new("operationVariable");
        variable.push(value);
        wrapper.push(variable);
    }
    parent.push(wrapper);
}

fn nested_count(elements: Option<&[SubmodelElement]>) -> usize {
    elements.map_or(0, <[SubmodelElement]>::len)
}

/// Builds the element for one submodel element.
///
/// `nested` holds the already encoded child elements in the order of
/// [`dispatch::nested_elements`]; this function never recurses.
pub(crate) fn submodel_element_to_wire(
    element: &SubmodelElement,
    tag: &str,
    nested: Vec<XmlElement>,
) -> Result<XmlElement> {
    let mut wire = XmlElement::new(tag);
    let mut nested = nested.into_iter();
    push_element_base(&mut wire, element.base())?;

    match element {
        SubmodelElement::Property(e) => {
            push_token(&mut wire, "valueType", e.value_type);
            push_opt_text(&mut wire, "value", e.value.as_deref());
            push_opt_child(&mut wire, "valueId", e.value_id.as_ref())?;
        }
        SubmodelElement::MultiLanguageProperty(e) => {
            push_list(&mut wire, "value", "langStringTextType", e.value.as_deref())?;
            push_opt_child(&mut wire, "valueId", e.value_id.as_ref())?;
        }
        SubmodelElement::Range(e) => {
            push_token(&mut wire, "valueType", e.value_type);
            push_opt_text(&mut wire, "min", e.min.as_deref());
            push_opt_text(&mut wire, "max", e.max.as_deref());
        }
        SubmodelElement::Blob(e) => {
            if let Some(bytes) = e.value.as_deref().filter(|bytes| !bytes.is_empty()) {
                push_text(&mut wire, "value", &STANDARD.encode(bytes));
            }
            push_text(&mut wire, "contentType", &e.content_type);
        }
        SubmodelElement::File(e) => {
            push_opt_text(&mut wire, "value", e.value.as_deref());
            push_text(&mut wire, "contentType", &e.content_type);
        }
        SubmodelElement::ReferenceElement(e) => {
            push_opt_child(&mut wire, "value", e.value.as_ref())?;
        }
        SubmodelElement::RelationshipElement(e) => {
            push_child(&mut wire, "first", &e.first)?;
            push_child(&mut wire, "second", &e.second)?;
        }
        SubmodelElement::AnnotatedRelationshipElement(e) => {
            push_child(&mut wire, "first", &e.first)?;
            push_child(&mut wire, "second", &e.second)?;
            let count = nested_count(e.annotations.as_deref());
            push_nested(&mut wire, "annotations", &mut nested, count);
        }
        SubmodelElement::Operation(e) => {
            push_operation_variables(
                &mut wire,
                "inputVariables",
                &mut nested,
                e.input_variables.as_deref(),
            );
            push_operation_variables(
                &mut wire,
                "outputVariables",
                &mut nested,
                e.output_variables.as_deref(),
            );
            push_operation_variables(
                &mut wire,
                "inoutputVariables",
                &mut nested,
                e.inoutput_variables.as_deref(),
            );
        }
        SubmodelElement::Capability(_) => {}
        SubmodelElement::Entity(e) => {
            let count = nested_count(e.statements.as_deref());
            push_nested(&mut wire, "statements", &mut nested, count);
            push_token(&mut wire, "entityType", e.entity_type);
            push_opt_text(&mut wire, "globalAssetId", e.global_asset_id.as_deref());
            push_list(
                &mut wire,
                "specificAssetIds",
                "specificAssetId",
                e.specific_asset_ids.as_deref(),
            )?;
        }
        SubmodelElement::BasicEventElement(e) => {
            push_child(&mut wire, "observed", &e.observed)?;
            push_token(&mut wire, "direction", e.direction);
            push_token(&mut wire, "state", e.state);
            push_opt_text(&mut wire, "messageTopic", e.message_topic.as_deref());
            push_opt_child(&mut wire, "messageBroker", e.message_broker.as_ref())?;
            push_opt_text(&mut wire, "lastUpdate", e.last_update.as_deref());
            push_opt_text(&mut wire, "minInterval", e.min_interval.as_deref());
            push_opt_text(&mut wire, "maxInterval", e.max_interval.as_deref());
        }
        SubmodelElement::SubmodelElementCollection(e) => {
            let count = nested_count(e.value.as_deref());
            push_nested(&mut wire, "value", &mut nested, count);
        }
        SubmodelElement::SubmodelElementList(e) => {
            if let Some(order_relevant) = e.order_relevant {
                push_text(
                    &mut wire,
                    "orderRelevant",
                    utils::bool_to_string(order_relevant),
                );
            }
            push_opt_child(
                &mut wire,
                "semanticIdListElement",
                e.semantic_id_list_element.as_ref(),
            )?;
            push_token(&mut wire, "typeValueListElement", e.type_value_list_element);
            push_opt_token(&mut wire, "valueTypeListElement", e.value_type_list_element);
            let count = nested_count(e.value.as_deref());
            push_nested(&mut wire, "value", &mut nested, count);
        }
    }

    Ok(wire)
}
