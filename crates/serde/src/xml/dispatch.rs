//! Choice dispatch for polymorphic nodes.
//!
//! A submodel element is encoded under the tag of its model type and decoded
//! by looking its tag up in the same table. The dispatcher never guesses a
//! variant from the fields that happen to be present.
//!
//! Submodel elements nest through collections, lists, entities, operations
//! and annotated relationships. Both directions first flatten such a tree
//! into a node vector, parents before children, and then build the nodes in
//! reverse order so each parent finds its children finished. Nesting depth
//! is bounded by memory, not by the call stack.

use shellwork_aas::{AasSubmodelElements, DataSpecificationContent, SubmodelElement};
use tracing::trace;

use crate::config::XmlConfig;
use crate::error::{Result, SerdeError};
use crate::xml::de::{self, Decoder};
use crate::xml::ser;
use crate::xml::tokens::WireToken;
use crate::xml::tree::XmlElement;
use crate::xml::utils;

/// Element tag of the IEC 61360 data specification content.
pub const IEC61360_TAG: &str = "dataSpecificationIec61360";

/// Element tag of a concrete submodel element kind. Abstract kinds
/// (`DataElement`, `EventElement`, `SubmodelElement`) have none.
pub fn element_tag(kind: AasSubmodelElements) -> Option<&'static str> {
    let tag = match kind {
        AasSubmodelElements::Property => "property",
        AasSubmodelElements::MultiLanguageProperty => "multiLanguageProperty",
        AasSubmodelElements::Range => "range",
        AasSubmodelElements::Blob => "blob",
        AasSubmodelElements::File => "file",
        AasSubmodelElements::ReferenceElement => "referenceElement",
        AasSubmodelElements::RelationshipElement => "relationshipElement",
        AasSubmodelElements::AnnotatedRelationshipElement => "annotatedRelationshipElement",
        AasSubmodelElements::Operation => "operation",
        AasSubmodelElements::Capability => "capability",
        AasSubmodelElements::Entity => "entity",
        AasSubmodelElements::BasicEventElement => "basicEventElement",
        AasSubmodelElements::SubmodelElementCollection => "submodelElementCollection",
        AasSubmodelElements::SubmodelElementList => "submodelElementList",
        AasSubmodelElements::DataElement
        | AasSubmodelElements::EventElement
        | AasSubmodelElements::SubmodelElement => return None,
    };
    Some(tag)
}

/// Inverse of [`element_tag`].
pub fn element_kind(tag: &str) -> Option<AasSubmodelElements> {
    AasSubmodelElements::ALL
        .iter()
        .copied()
        .find(|kind| element_tag(*kind) == Some(tag))
}

fn is_data_element_kind(kind: AasSubmodelElements) -> bool {
    matches!(
        kind,
        AasSubmodelElements::Property
            | AasSubmodelElements::MultiLanguageProperty
            | AasSubmodelElements::Range
            | AasSubmodelElements::Blob
            | AasSubmodelElements::File
            | AasSubmodelElements::ReferenceElement
    )
}

/// Encodes one submodel element, including everything nested in it.
///
/// Encoding errors carry no document path: the element has not been placed
/// in a document yet.
pub fn dispatch_encode(element: &SubmodelElement) -> Result<(AasSubmodelElements, XmlElement)> {
    let mut encoded = encode_submodel_elements(std::slice::from_ref(element))?;
    let wire = encoded.pop().ok_or_else(|| {
        SerdeError::violation(String::new(), "submodel element produced no XML element")
    })?;
    Ok((element.model_type(), wire))
}

/// Decodes one submodel element from an unprefixed element whose tag names
/// its kind. `path` is the element's position, used in errors.
pub fn dispatch_decode(
    element: &XmlElement,
    path: &str,
    config: &XmlConfig,
) -> Result<SubmodelElement> {
    let kind = element_kind(&element.name).ok_or_else(|| unsupported(&element.name, path))?;
    let mut decoded = decode_nodes(
        vec![DecodeNode::new(element, path.to_string(), kind)],
        Decoder::new(config),
    )?;
    decoded
        .pop()
        .ok_or_else(|| SerdeError::violation(path, "no submodel element decoded"))
}

fn unsupported(tag: &str, path: &str) -> SerdeError {
    SerdeError::UnsupportedElementType {
        tag: tag.to_string(),
        path: path.to_string(),
    }
}

/// Child elements directly nested in `element`, in wire order.
pub(crate) fn nested_elements(element: &SubmodelElement) -> Vec<&SubmodelElement> {
    match element {
        SubmodelElement::AnnotatedRelationshipElement(e) => {
            e.annotations.iter().flatten().collect()
        }
        SubmodelElement::Operation(e) => [
            &e.input_variables,
            &e.output_variables,
            &e.inoutput_variables,
        ]
        .into_iter()
        .flatten()
        .flatten()
        .map(|variable| &variable.value)
        .collect(),
        SubmodelElement::Entity(e) => e.statements.iter().flatten().collect(),
        SubmodelElement::SubmodelElementCollection(e) => e.value.iter().flatten().collect(),
        SubmodelElement::SubmodelElementList(e) => e.value.iter().flatten().collect(),
        SubmodelElement::Property(_)
        | SubmodelElement::MultiLanguageProperty(_)
        | SubmodelElement::Range(_)
        | SubmodelElement::Blob(_)
        | SubmodelElement::File(_)
        | SubmodelElement::ReferenceElement(_)
        | SubmodelElement::RelationshipElement(_)
        | SubmodelElement::Capability(_)
        | SubmodelElement::BasicEventElement(_) => Vec::new(),
    }
}

struct EncodeNode<'a> {
    element: &'a SubmodelElement,
    children: Vec<usize>,
}

/// Encodes a sequence of sibling elements.
pub(crate) fn encode_submodel_elements(elements: &[SubmodelElement]) -> Result<Vec<XmlElement>> {
    let mut nodes: Vec<EncodeNode<'_>> = elements
        .iter()
        .map(|element| EncodeNode {
            element,
            children: Vec::new(),
        })
        .collect();

    let mut index = 0;
    while index < nodes.len() {
        let element = nodes[index].element;
        for child in nested_elements(element) {
            let child_index = nodes.len();
            nodes.push(EncodeNode {
                element: child,
                children: Vec::new(),
            });
            nodes[index].children.push(child_index);
        }
        index += 1;
    }

    let mut built: Vec<Option<XmlElement>> = Vec::with_capacity(nodes.len());
    built.resize_with(nodes.len(), || None);
    for index in (0..nodes.len()).rev() {
        let node = &nodes[index];
        let kind = node.element.model_type();
        let tag = element_tag(kind).ok_or_else(|| unsupported(kind.token(), ""))?;
        trace!(model_type = kind.token(), tag, "encoding submodel element");

        let nested = node
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[index] = Some(ser::submodel_element_to_wire(node.element, tag, nested)?);
    }

    Ok(built.into_iter().take(elements.len()).flatten().collect())
}

/// A wire element awaiting decoding. Only roots store their full path;
/// other nodes store the path relative to their parent.
struct DecodeNode<'a> {
    element: &'a XmlElement,
    parent: Option<usize>,
    segment: String,
    kind: AasSubmodelElements,
    children: Vec<usize>,
}

impl<'a> DecodeNode<'a> {
    fn new(element: &'a XmlElement, segment: String, kind: AasSubmodelElements) -> Self {
        Self {
            element,
            parent: None,
            segment,
            kind,
            children: Vec::new(),
        }
    }
}

fn node_path(nodes: &[DecodeNode<'_>], index: usize) -> String {
    let mut segments = Vec::new();
    let mut current = Some(index);
    while let Some(i) = current {
        segments.push(nodes[i].segment.as_str());
        current = nodes[i].parent;
    }
    segments.reverse();
    segments.join("/")
}

/// Decodes the children of a submodel element container such as
/// `submodelElements`. `path` is the container's path.
pub(crate) fn decode_submodel_elements(
    container: &XmlElement,
    path: &str,
    decoder: Decoder<'_>,
) -> Result<Vec<SubmodelElement>> {
    let roots = container
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let child_path = utils::indexed_path(path, &child.name, index);
            match element_kind(&child.name) {
                Some(kind) => Ok(DecodeNode::new(child, child_path, kind)),
                None => Err(unsupported(&child.name, &child_path)),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    decode_nodes(roots, decoder)
}

fn decode_nodes(roots: Vec<DecodeNode<'_>>, decoder: Decoder<'_>) -> Result<Vec<SubmodelElement>> {
    let root_count = roots.len();
    let mut nodes = roots;

    let mut index = 0;
    while index < nodes.len() {
        let children =
            nested_wire(&nodes[index]).map_err(|e| e.under(&node_path(&nodes, index)))?;
        for mut child in children {
            child.parent = Some(index);
            let child_index = nodes.len();
            nodes.push(child);
            nodes[index].children.push(child_index);
        }
        index += 1;
    }

    // Each node decodes against its own segment; the ancestor path is only
    // joined when an error has to be reported.
    let mut built: Vec<Option<SubmodelElement>> = Vec::with_capacity(nodes.len());
    built.resize_with(nodes.len(), || None);
    for index in (0..nodes.len()).rev() {
        let node = &nodes[index];
        trace!(tag = %node.element.name, segment = %node.segment, "decoding submodel element");

        let nested = node
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        let decoded = de::submodel_element_from_wire(
            node.kind,
            node.element,
            &node.segment,
            nested,
            decoder,
        )
        .map_err(|e| match node.parent {
            Some(parent) => e.under(&node_path(&nodes, parent)),
            None => e,
        })?;
        built[index] = Some(decoded);
    }

    Ok(built.into_iter().take(root_count).flatten().collect())
}

/// Finds the submodel elements nested directly in a wire element, in the
/// order [`nested_elements`] lists them for the model. Paths of the returned
/// nodes and of errors are relative to `node`.
fn nested_wire<'a>(node: &DecodeNode<'a>) -> Result<Vec<DecodeNode<'a>>> {
    let element = node.element;
    let mut nested = Vec::new();

    match node.kind {
        AasSubmodelElements::AnnotatedRelationshipElement => {
            collect_container(element, "annotations", &mut nested)?;
            if let Some(child) = nested.iter().find(|child| !is_data_element_kind(child.kind)) {
                return Err(SerdeError::violation(
                    child.segment.as_str(),
                    "annotations must be data elements",
                ));
            }
        }
        AasSubmodelElements::Operation => {
            for container in ["inputVariables", "outputVariables", "inoutputVariables"] {
                collect_operation_variables(element, container, &mut nested)?;
            }
        }
        AasSubmodelElements::Entity => {
            collect_container(element, "statements", &mut nested)?;
        }
        AasSubmodelElements::SubmodelElementCollection
        | AasSubmodelElements::SubmodelElementList => {
            collect_container(element, "value", &mut nested)?;
        }
        _ => {}
    }

    Ok(nested)
}

fn collect_container<'a>(
    element: &'a XmlElement,
    container: &str,
    nested: &mut Vec<DecodeNode<'a>>,
) -> Result<()> {
    let Some(wrapper) = element.child(container) else {
        return Ok(());
    };
    for (index, child) in wrapper.children.iter().enumerate() {
        let segment = utils::indexed_path(container, &child.name, index);
        let kind = element_kind(&child.name).ok_or_else(|| unsupported(&child.name, &segment))?;
        nested.push(DecodeNode::new(child, segment, kind));
    }
    Ok(())
}

/// `container/operationVariable[i]/value/<element>`, exactly one element per
/// variable.
fn collect_operation_variables<'a>(
    element: &'a XmlElement,
    container: &str,
    nested: &mut Vec<DecodeNode<'a>>,
) -> Result<()> {
    let Some(wrapper) = element.child(container) else {
        return Ok(());
    };
    for (index, variable) in wrapper.children.iter().enumerate() {
        let variable_path = utils::indexed_path(container, &variable.name, index);
        if variable.name != "operationVariable" {
            return Err(SerdeError::violation(
                variable_path,
                "expected operationVariable",
            ));
        }
        let value = match variable.children.as_slice() {
            [value] if value.name == "value" => value,
            _ => {
                return Err(SerdeError::violation(
                    variable_path,
                    "operationVariable must hold exactly one value element",
                ));
            }
        };
        let value_path = utils::child_path(&variable_path, "value");
        let child = match value.children.as_slice() {
            [child] => child,
            _ => {
                return Err(SerdeError::violation(
                    value_path,
                    "value must hold exactly one submodel element",
                ));
            }
        };
        let segment = utils::child_path(&value_path, &child.name);
        let kind = element_kind(&child.name).ok_or_else(|| unsupported(&child.name, &segment))?;
        nested.push(DecodeNode::new(child, segment, kind));
    }
    Ok(())
}

/// Encodes a data specification content under the tag of its kind.
pub(crate) fn content_encode(
    content: &DataSpecificationContent,
) -> Result<(&'static str, XmlElement)> {
    trace!(model_type = content.model_type(), "encoding data specification content");
    match content {
        DataSpecificationContent::Iec61360(iec) => {
            Ok((IEC61360_TAG, ser::ToWire::to_wire(iec, IEC61360_TAG)?))
        }
        other => Err(unsupported(other.model_type(), "")),
    }
}

/// Decodes the single child of a `dataSpecificationContent` element.
pub(crate) fn content_decode(
    wrapper: &XmlElement,
    path: &str,
    decoder: Decoder<'_>,
) -> Result<DataSpecificationContent> {
    let content = match wrapper.children.as_slice() {
        [content] => content,
        _ => {
            return Err(SerdeError::violation(
                path,
                "dataSpecificationContent must hold exactly one content element",
            ));
        }
    };
    let content_path = utils::child_path(path, &content.name);
    trace!(tag = %content.name, path = %content_path, "decoding data specification content");
    match content.name.as_str() {
        IEC61360_TAG => Ok(DataSpecificationContent::Iec61360(de::decode(
            content,
            content_path,
            decoder,
        )?)),
        other => Err(unsupported(other, &content_path)),
    }
}
