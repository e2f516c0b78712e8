//! Round trips of environments that exercise every node kind and field.

use shellwork_aas::*;
use shellwork_serde::xml::parse_document;
use shellwork_serde::{Result, SerdeError, from_xml_str, to_xml_string};

fn lang(text: &str) -> Vec<LangString> {
    vec![LangString::new("en", text), LangString::new("de", text)]
}

fn semantics(value: &str) -> HasSemantics {
    HasSemantics {
        semantic_id: Some(Reference::external(value)),
        supplemental_semantic_ids: Some(vec![Reference::external(format!("{value}:extra"))]),
    }
}

fn full_referable(id_short: &str) -> Referable {
    let mut extension = Extension::new("origin");
    extension.semantics = semantics("urn:ext");
    extension.value_type = Some(DataTypeDefXsd::String);
    extension.value = Some("factory".to_string());
    extension.refers_to = Some(vec![Reference::model(KeyTypes::Submodel, "urn:sm:ref")]);

    Referable {
        extensions: Some(vec![extension]),
        category: Some("PARAMETER".to_string()),
        id_short: Some(id_short.to_string()),
        display_name: Some(lang(id_short)),
        description: Some(lang("described")),
    }
}

fn data_specification() -> EmbeddedDataSpecification {
    let mut iec = DataSpecificationIec61360::new(lang("Max rotation speed"));
    iec.short_name = Some(lang("MaxRotSpeed"));
    iec.unit = Some("1/min".to_string());
    iec.unit_id = Some(Reference::external("0173-1#05-AAA650#002"));
    iec.source_of_definition = Some("ISO 1234".to_string());
    iec.symbol = Some("n_max".to_string());
    iec.data_type = Some(DataTypeIec61360::RealMeasure);
    iec.definition = Some(lang("Greatest permissible rotation speed"));
    iec.value_format = Some("xs:double".to_string());
    iec.value_list = Some(ValueList {
        value_reference_pairs: vec![
            ValueReferencePair {
                value: "low".to_string(),
                value_id: Reference::external("urn:value:low"),
            },
            ValueReferencePair {
                value: "high".to_string(),
                value_id: Reference::external("urn:value:high"),
            },
        ],
    });
    iec.value = Some("5000".to_string());
    iec.level_type = Some(LevelType {
        min: false,
        nom: true,
        typ: false,
        max: true,
    });

    EmbeddedDataSpecification::new(
        Reference::external(
            "https://admin-shell.io/DataSpecificationTemplates/DataSpecificationIEC61360/3/0",
        ),
        DataSpecificationContent::Iec61360(iec),
    )
}

fn administration() -> AdministrativeInformation {
    AdministrativeInformation {
        embedded_data_specifications: Some(vec![data_specification()]),
        version: Some("1".to_string()),
        revision: Some("2".to_string()),
        creator: Some(Reference::external("urn:creator")),
        template_id: Some("urn:template".to_string()),
    }
}

fn qualifier() -> Qualifier {
    let mut qualifier = Qualifier::new("Multiplicity", DataTypeDefXsd::String);
    qualifier.semantics = semantics("urn:qualifier");
    qualifier.kind = Some(QualifierKind::ConceptQualifier);
    qualifier.value = Some("One".to_string());
    qualifier.value_id = Some(Reference::external("urn:multiplicity:one"));
    qualifier
}

fn full_base(id_short: &str) -> ElementBase {
    ElementBase {
        referable: full_referable(id_short),
        semantics: semantics(&format!("urn:semantic:{id_short}")),
        qualifiers: Some(vec![qualifier()]),
        embedded_data_specifications: Some(vec![data_specification()]),
    }
}

fn specific_asset_id() -> SpecificAssetId {
    let mut id = SpecificAssetId::new("serialNumber", "SN-0042");
    id.semantics = semantics("urn:serial");
    id.external_subject_id = Some(Reference::external("urn:subject"));
    id
}

fn property(id_short: &str, value: &str) -> SubmodelElement {
    let mut property = Property::new(
        full_base(id_short),
        DataTypeDefXsd::Double,
        Some(value.to_string()),
    );
    property.value_id = Some(Reference::external("urn:value"));
    SubmodelElement::Property(property)
}

fn every_element() -> Vec<SubmodelElement> {
    let mlp = MultiLanguageProperty {
        base: full_base("Label"),
        value: Some(lang("motor")),
        value_id: Some(Reference::external("urn:label")),
    };

    let mut range = Range::new(full_base("Window"), DataTypeDefXsd::Int);
    range.min = Some("1".to_string());
    range.max = Some("10".to_string());

    let mut blob = Blob::new(full_base("Logo"), "image/png");
    blob.value = Some(b"\x89PNG\r\n".to_vec());

    let mut file = File::new(full_base("Manual"), "application/pdf");
    file.value = Some("/aasx/manual.pdf".to_string());

    let reference_element = ReferenceElement {
        base: full_base("Link"),
        value: Some(Reference::model(KeyTypes::Submodel, "urn:sm:other")),
    };

    let relationship = RelationshipElement::new(
        full_base("Drives"),
        Reference::model(KeyTypes::Entity, "urn:motor"),
        Reference::model(KeyTypes::Entity, "urn:pump"),
    );

    let mut annotated = AnnotatedRelationshipElement::new(
        full_base("Feeds"),
        Reference::model(KeyTypes::Entity, "urn:pump"),
        Reference::model(KeyTypes::Entity, "urn:tank"),
    );
    annotated.annotations = Some(vec![property("FlowRate", "3.5")]);

    let operation = Operation {
        base: full_base("Start"),
        input_variables: Some(vec![OperationVariable::new(property("Speed", "1500"))]),
        output_variables: Some(vec![OperationVariable::new(SubmodelElement::File(
            File::new(ElementBase::with_id_short("Report"), "text/plain"),
        ))]),
        inoutput_variables: Some(vec![OperationVariable::new(
            SubmodelElement::SubmodelElementCollection(SubmodelElementCollection {
                base: ElementBase::with_id_short("State"),
                value: Some(vec![property("Counter", "7")]),
            }),
        )]),
    };

    let capability = Capability {
        base: full_base("CanDrill"),
    };

    let mut entity = Entity::new(full_base("Motor"), EntityType::SelfManagedEntity);
    entity.statements = Some(vec![property("Power", "2.2")]);
    entity.global_asset_id = Some("urn:asset:motor".to_string());
    entity.specific_asset_ids = Some(vec![specific_asset_id()]);

    let mut event = BasicEventElement::new(
        full_base("Overheat"),
        Reference::model(KeyTypes::Property, "urn:temperature"),
        Direction::Input,
        StateOfEvent::Off,
    );
    event.message_topic = Some("alarms/overheat".to_string());
    event.message_broker = Some(Reference::model(KeyTypes::Submodel, "urn:broker"));
    event.last_update = Some("2024-01-01T00:00:00Z".to_string());
    event.min_interval = Some("PT1S".to_string());
    event.max_interval = Some("PT1M".to_string());

    let mut list = SubmodelElementList::new(full_base("Readings"), AasSubmodelElements::Property);
    list.order_relevant = Some(false);
    list.semantic_id_list_element = Some(Reference::external("urn:reading"));
    list.value_type_list_element = Some(DataTypeDefXsd::Double);
    list.value = Some(vec![property("R0", "1.0"), property("R1", "2.0")]);

    let collection = SubmodelElementCollection {
        base: full_base("Everything"),
        value: Some(vec![
            SubmodelElement::MultiLanguageProperty(mlp),
            SubmodelElement::Range(range),
            SubmodelElement::Blob(blob),
            SubmodelElement::File(file),
            SubmodelElement::ReferenceElement(reference_element),
            SubmodelElement::RelationshipElement(relationship),
            SubmodelElement::AnnotatedRelationshipElement(annotated),
            SubmodelElement::Operation(operation),
            SubmodelElement::Capability(capability),
        ]),
    };

    vec![
        property("MaxSpeed", "5000"),
        SubmodelElement::SubmodelElementCollection(collection),
        SubmodelElement::Entity(entity),
        SubmodelElement::BasicEventElement(event),
        SubmodelElement::SubmodelElementList(list),
    ]
}

fn full_environment() -> Environment {
    let mut asset_information = AssetInformation::new(AssetKind::Type);
    asset_information.global_asset_id = Some("urn:asset:1".to_string());
    asset_information.specific_asset_ids = Some(vec![specific_asset_id()]);
    asset_information.asset_type = Some("Motor".to_string());
    asset_information.default_thumbnail = Some(Resource {
        path: "/aasx/thumbnail.png".to_string(),
        content_type: Some("image/png".to_string()),
    });

    let mut shell = AssetAdministrationShell::new("urn:aas:1", asset_information);
    shell.referable = full_referable("Shell");
    shell.administration = Some(administration());
    shell.embedded_data_specifications = Some(vec![data_specification()]);
    shell.derived_from = Some(Reference::model(
        KeyTypes::AssetAdministrationShell,
        "urn:aas:template",
    ));
    shell.submodels = Some(vec![Reference::model(KeyTypes::Submodel, "urn:sm:1")
        .with_referred_semantic_id(Reference::external("urn:semantic:nameplate"))]);

    let mut submodel = Submodel::new("urn:sm:1");
    submodel.referable = full_referable("Nameplate");
    submodel.administration = Some(administration());
    submodel.kind = Some(ModellingKind::Instance);
    submodel.semantics = semantics("urn:semantic:nameplate");
    submodel.qualifiers = Some(vec![qualifier()]);
    submodel.embedded_data_specifications = Some(vec![data_specification()]);
    submodel.submodel_elements = Some(every_element());

    let mut concept = ConceptDescription::new("urn:cd:1");
    concept.referable = full_referable("MaxSpeed");
    concept.administration = Some(administration());
    concept.embedded_data_specifications = Some(vec![data_specification()]);
    concept.is_case_of = Some(vec![Reference::external("urn:eclass:speed")]);

    Environment {
        asset_administration_shells: Some(vec![shell]),
        submodels: Some(vec![submodel, Submodel::new("urn:sm:2")]),
        concept_descriptions: Some(vec![concept]),
    }
}

#[test]
fn test_full_environment_roundtrip() -> Result<()> {
    let env = full_environment();
    let xml = to_xml_string(&env)?;
    let decoded = from_xml_str(&xml)?;
    assert_eq!(decoded, env);

    // Serializing the decoded environment reproduces the document.
    assert_eq!(to_xml_string(&decoded)?, xml);
    Ok(())
}

#[test]
fn test_every_element_is_prefixed_and_filled() -> Result<()> {
    let xml = to_xml_string(&full_environment())?;
    let root = parse_document(&xml)?;

    for element in root.descendants() {
        assert!(
            element.name.starts_with("aas:"),
            "unprefixed element '{}'",
            element.name
        );
        assert!(
            !element.children.is_empty() || !element.text().is_empty(),
            "empty element '{}'",
            element.name
        );
    }
    Ok(())
}

#[test]
fn test_every_element_tag_is_written() -> Result<()> {
    let xml = to_xml_string(&full_environment())?;
    for tag in [
        "property",
        "multiLanguageProperty",
        "range",
        "blob",
        "file",
        "referenceElement",
        "relationshipElement",
        "annotatedRelationshipElement",
        "operation",
        "capability",
        "entity",
        "basicEventElement",
        "submodelElementCollection",
        "submodelElementList",
        "dataSpecificationIec61360",
    ] {
        assert!(xml.contains(&format!("<aas:{tag}>")), "missing <aas:{tag}>");
    }
    assert!(xml.contains("<aas:operationVariable>"));
    assert!(xml.contains("<aas:dataType>REAL_MEASURE</aas:dataType>"));
    assert!(xml.contains("<aas:kind>ConceptQualifier</aas:kind>"));
    Ok(())
}

#[test]
fn test_deep_collection_roundtrip() -> Result<()> {
    let mut element = SubmodelElement::Property(Property::new(
        ElementBase::with_id_short("Leaf"),
        DataTypeDefXsd::String,
        Some("bottom".to_string()),
    ));
    for depth in 0..1000 {
        element = SubmodelElement::SubmodelElementCollection(SubmodelElementCollection {
            base: ElementBase::with_id_short(format!("Level{depth}")),
            value: Some(vec![element]),
        });
    }
    let mut submodel = Submodel::new("urn:sm:deep");
    submodel.submodel_elements = Some(vec![element]);
    let env = Environment {
        submodels: Some(vec![submodel]),
        ..Default::default()
    };

    let xml = to_xml_string(&env)?;
    assert_eq!(xml.matches("<aas:submodelElementCollection>").count(), 1000);
    assert_eq!(from_xml_str(&xml)?, env);
    Ok(())
}

#[test]
fn test_very_deep_invalid_document_fails_cleanly() {
    let depth = 100_000;
    let mut xml = String::from(
        "<aas:environment xmlns:aas=\"https://admin-shell.io/aas/3/0\">\
         <aas:submodels><aas:submodel><aas:id>urn:sm:deep</aas:id><aas:submodelElements>",
    );
    for _ in 0..depth {
        xml.push_str("<aas:submodelElementCollection><aas:value>");
    }
    xml.push_str("<aas:gizmo/>");
    for _ in 0..depth {
        xml.push_str("</aas:value></aas:submodelElementCollection>");
    }
    xml.push_str("</aas:submodelElements></aas:submodel></aas:submodels></aas:environment>");

    match from_xml_str(&xml).unwrap_err() {
        SerdeError::UnsupportedElementType { tag, path } => {
            assert_eq!(tag, "gizmo");
            assert!(path.starts_with(
                "/environment/submodels/submodel[0]/submodelElements/submodelElementCollection[0]/value/"
            ));
            assert!(path.ends_with("/value/gizmo[0]"));
            assert_eq!(path.matches("/value/").count(), depth);
        }
        other => panic!("unexpected error: {other}"),
    }
}

const DEEP: usize = 100_000;

fn deep_submodel_document(submodel_body: &str) -> String {
    format!(
        "<aas:environment xmlns:aas=\"https://admin-shell.io/aas/3/0\">\
         <aas:submodels><aas:submodel><aas:id>urn:sm:deep</aas:id>{submodel_body}\
         </aas:submodel></aas:submodels></aas:environment>"
    )
}

fn deep_collection(depth: usize) -> String {
    let mut xml = String::new();
    for _ in 0..depth {
        xml.push_str("<aas:submodelElementCollection><aas:value>");
    }
    xml.push_str(
        "<aas:property><aas:idShort>Leaf</aas:idShort>\
         <aas:valueType>xs:string</aas:valueType><aas:value>bottom</aas:value></aas:property>",
    );
    for _ in 0..depth {
        xml.push_str("</aas:value></aas:submodelElementCollection>");
    }
    xml
}

/// A `semanticId` whose `referredSemanticId` chain is `depth` levels long.
fn deep_semantic_id(depth: usize) -> String {
    const KEYS: &str = "<aas:keys><aas:key><aas:type>GlobalReference</aas:type>\
                        <aas:value>urn:level</aas:value></aas:key></aas:keys>";
    let mut xml = String::from("<aas:semanticId><aas:type>ExternalReference</aas:type>");
    for _ in 0..depth {
        xml.push_str("<aas:referredSemanticId><aas:type>ExternalReference</aas:type>");
    }
    for _ in 0..depth {
        xml.push_str(KEYS);
        xml.push_str("</aas:referredSemanticId>");
    }
    xml.push_str(KEYS);
    xml.push_str("</aas:semanticId>");
    xml
}

fn only_submodel(env: &Environment) -> &Submodel {
    let submodels = env.submodels.as_deref().unwrap();
    assert_eq!(submodels.len(), 1);
    &submodels[0]
}

#[test]
fn test_very_deep_valid_collection_decodes_and_drops() -> Result<()> {
    let xml = deep_submodel_document(&format!(
        "<aas:submodelElements>{}</aas:submodelElements>",
        deep_collection(DEEP)
    ));

    let env = from_xml_str(&xml)?;
    let mut element = &only_submodel(&env).submodel_elements.as_deref().unwrap()[0];
    let mut depth = 0;
    while let SubmodelElement::SubmodelElementCollection(collection) = element {
        let value = collection.value.as_deref().unwrap();
        assert_eq!(value.len(), 1);
        element = &value[0];
        depth += 1;
    }
    assert_eq!(depth, DEEP);
    match element {
        SubmodelElement::Property(property) => {
            assert_eq!(property.value.as_deref(), Some("bottom"));
        }
        other => panic!("unexpected leaf: {:?}", other.model_type()),
    }

    let encoded = to_xml_string(&env)?;
    assert_eq!(encoded.matches("<aas:submodelElementCollection>").count(), DEEP);
    Ok(())
}

#[test]
fn test_very_deep_reference_chain_decodes_and_drops() -> Result<()> {
    let xml = deep_submodel_document(&deep_semantic_id(DEEP));

    let env = from_xml_str(&xml)?;
    let semantic_id = only_submodel(&env).semantics.semantic_id.as_ref().unwrap();
    let mut levels = 0;
    let mut reference = semantic_id;
    while let Some(referred) = reference.referred_semantic_id.as_deref() {
        assert_eq!(referred.keys[0].value, "urn:level");
        reference = referred;
        levels += 1;
    }
    assert_eq!(levels, DEEP);

    let encoded = to_xml_string(&env)?;
    assert_eq!(encoded.matches("<aas:referredSemanticId>").count(), DEEP);
    Ok(())
}

#[test]
fn test_deep_reference_chain_then_unexpected_sibling() {
    let xml = deep_submodel_document(&format!("{}<aas:bogus/>", deep_semantic_id(DEEP)));

    match from_xml_str(&xml).unwrap_err() {
        SerdeError::SchemaViolation { path, message } => {
            assert_eq!(path, "/environment/submodels/submodel[0]/bogus");
            assert_eq!(message, "unexpected element");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_deep_reference_chain_error_carries_full_path() {
    let depth = 1000;
    let mut xml = String::from("<aas:semanticId><aas:type>ExternalReference</aas:type>");
    for _ in 0..depth {
        xml.push_str("<aas:referredSemanticId><aas:type>ExternalReference</aas:type>");
    }
    // The innermost level has no keys.
    for _ in 0..depth {
        xml.push_str("</aas:referredSemanticId><aas:keys><aas:key><aas:type>GlobalReference");
        xml.push_str("</aas:type><aas:value>urn:level</aas:value></aas:key></aas:keys>");
    }
    xml.push_str("</aas:semanticId>");
    let xml = deep_submodel_document(&xml);

    match from_xml_str(&xml).unwrap_err() {
        SerdeError::SchemaViolation { path, .. } => {
            let expected = format!(
                "/environment/submodels/submodel[0]/semanticId{}/keys",
                "/referredSemanticId".repeat(depth)
            );
            assert_eq!(path, expected);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_deep_collection_then_invalid_sibling() {
    let xml = deep_submodel_document(&format!(
        "<aas:submodelElements>{}\
         <aas:property><aas:idShort>Broken</aas:idShort></aas:property>\
         </aas:submodelElements>",
        deep_collection(DEEP)
    ));

    match from_xml_str(&xml).unwrap_err() {
        SerdeError::SchemaViolation { path, message } => {
            assert_eq!(
                path,
                "/environment/submodels/submodel[0]/submodelElements/property[1]/valueType"
            );
            assert_eq!(message, "required element is missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_deep_collection_then_unexpected_sibling() {
    let xml = deep_submodel_document(&format!(
        "<aas:submodelElements>{}</aas:submodelElements><aas:bogus/>",
        deep_collection(DEEP)
    ));

    match from_xml_str(&xml).unwrap_err() {
        SerdeError::SchemaViolation { path, message } => {
            assert_eq!(path, "/environment/submodels/submodel[0]/bogus");
            assert_eq!(message, "unexpected element");
        }
        other => panic!("unexpected error: {other}"),
    }
}
