//! Tests for the AAS model: discriminators, constructors and the JSON derives.

use shellwork_aas::*;

const NAMEPLATE_JSON: &str = r#"{
  "submodels": [
    {
      "idShort": "Nameplate",
      "id": "urn:example:submodel:nameplate",
      "kind": "Instance",
      "semanticId": {
        "type": "ExternalReference",
        "keys": [{"type": "GlobalReference", "value": "0173-1#01-AFZ615#016"}]
      },
      "submodelElements": [
        {
          "modelType": "Property",
          "idShort": "ManufacturerName",
          "valueType": "xs:string",
          "value": "ACME"
        },
        {
          "modelType": "SubmodelElementCollection",
          "idShort": "Address",
          "value": [
            {
              "modelType": "MultiLanguageProperty",
              "idShort": "Street",
              "value": [{"language": "de", "text": "Hauptstrasse 1"}]
            }
          ]
        },
        {
          "modelType": "Blob",
          "idShort": "Logo",
          "contentType": "image/png",
          "value": "iVBORw0="
        }
      ]
    }
  ]
}"#;

#[test]
fn test_environment_from_json() {
    let env: Environment = serde_json::from_str(NAMEPLATE_JSON).expect("valid environment json");

    assert!(env.asset_administration_shells.is_none());
    assert!(env.concept_descriptions.is_none());

    let submodels = env.submodels.as_ref().expect("submodels present");
    assert_eq!(submodels.len(), 1);
    let nameplate = &submodels[0];
    assert_eq!(nameplate.referable.id_short.as_deref(), Some("Nameplate"));
    assert_eq!(nameplate.kind, Some(ModellingKind::Instance));
    assert_eq!(
        nameplate.semantics.semantic_id,
        Some(Reference::external("0173-1#01-AFZ615#016"))
    );

    let elements = nameplate.submodel_elements.as_ref().expect("elements present");
    assert_eq!(elements[0].model_type(), AasSubmodelElements::Property);
    assert_eq!(
        elements[1].model_type(),
        AasSubmodelElements::SubmodelElementCollection
    );
    match &elements[2] {
        SubmodelElement::Blob(blob) => {
            assert_eq!(blob.content_type, "image/png");
            assert_eq!(
                blob.value.as_deref(),
                Some(&[0x89, b'P', b'N', b'G', 0x0d][..])
            );
        }
        other => panic!("expected a blob, got {:?}", other.model_type()),
    }
}

#[test]
fn test_environment_json_roundtrip() {
    let env: Environment = serde_json::from_str(NAMEPLATE_JSON).expect("valid environment json");
    let json = serde_json::to_string(&env).expect("serializable");
    let reparsed: Environment = serde_json::from_str(&json).expect("reparseable");
    assert_eq!(env, reparsed);
}

#[test]
fn test_enum_json_tokens() {
    assert_eq!(
        serde_json::to_string(&DataTypeDefXsd::AnyUri).unwrap(),
        "\"xs:anyURI\""
    );
    assert_eq!(
        serde_json::to_string(&DataTypeIec61360::StringTranslatable).unwrap(),
        "\"STRING_TRANSLATABLE\""
    );
    assert_eq!(serde_json::to_string(&Direction::Input).unwrap(), "\"input\"");
    assert_eq!(serde_json::to_string(&StateOfEvent::Off).unwrap(), "\"off\"");
}

#[test]
fn test_data_element_classification() {
    let property = SubmodelElement::Property(Property::new(
        ElementBase::with_id_short("p"),
        DataTypeDefXsd::Int,
        Some("1".to_string()),
    ));
    let capability = SubmodelElement::Capability(Capability::default());

    assert!(property.is_data_element());
    assert!(!capability.is_data_element());
    assert_eq!(property.id_short(), Some("p"));
    assert_eq!(capability.id_short(), None);
}

#[test]
fn test_environment_is_empty() {
    assert!(Environment::default().is_empty());

    let with_empty_sections = Environment {
        asset_administration_shells: Some(Vec::new()),
        submodels: Some(Vec::new()),
        concept_descriptions: None,
    };
    assert!(with_empty_sections.is_empty());

    let with_submodel = Environment {
        submodels: Some(vec![Submodel::new("urn:sm")]),
        ..Environment::default()
    };
    assert!(!with_submodel.is_empty());
}

#[test]
fn test_reference_helpers() {
    let reference = Reference::model(KeyTypes::Submodel, "urn:sm")
        .with_referred_semantic_id(Reference::external("urn:semantic"));

    assert_eq!(reference.reference_type, ReferenceTypes::ModelReference);
    assert_eq!(reference.keys, vec![Key::new(KeyTypes::Submodel, "urn:sm")]);
    let referred = reference.referred_semantic_id.as_deref().expect("referred id");
    assert_eq!(referred.keys[0].key_type, KeyTypes::GlobalReference);
}

#[test]
fn test_data_specification_model_type() {
    let content = DataSpecificationContent::Iec61360(DataSpecificationIec61360::new(vec![
        LangString::new("en", "Width"),
    ]));
    assert_eq!(content.model_type(), "DataSpecificationIec61360");
}

#[test]
fn test_long_reference_chain_drops() {
    let mut reference = Reference::external("urn:level:0");
    for level in 1..1_000_000 {
        reference = Reference::external(format!("urn:level:{level}"))
            .with_referred_semantic_id(reference);
    }
    assert_eq!(reference.keys[0].value, "urn:level:999999");
    drop(reference);
}

/// Wraps `element` in the container kind picked by `level`.
fn wrap(level: usize, element: SubmodelElement) -> SubmodelElement {
    let base = ElementBase::with_id_short(format!("Level{level}"));
    match level % 5 {
        0 => SubmodelElement::SubmodelElementCollection(SubmodelElementCollection {
            base,
            value: Some(vec![element]),
        }),
        1 => {
            let mut entity = Entity::new(base, EntityType::CoManagedEntity);
            entity.statements = Some(vec![element]);
            SubmodelElement::Entity(entity)
        }
        2 => SubmodelElement::Operation(Operation {
            base,
            input_variables: Some(vec![OperationVariable::new(element)]),
            ..Default::default()
        }),
        3 => {
            let mut annotated = AnnotatedRelationshipElement::new(
                base,
                Reference::external("urn:first"),
                Reference::external("urn:second"),
            );
            annotated.annotations = Some(vec![element]);
            SubmodelElement::AnnotatedRelationshipElement(annotated)
        }
        _ => {
            let mut list =
                SubmodelElementList::new(base, AasSubmodelElements::SubmodelElement);
            list.value = Some(vec![element]);
            SubmodelElement::SubmodelElementList(list)
        }
    }
}

#[test]
fn test_deeply_nested_elements_drop() {
    let mut element = SubmodelElement::Property(Property::new(
        ElementBase::with_id_short("Leaf"),
        DataTypeDefXsd::String,
        None,
    ));
    for level in 0..500_000 {
        element = wrap(level, element);
    }
    assert_eq!(element.id_short(), Some("Level499999"));

    let mut submodel = Submodel::new("urn:sm:deep");
    submodel.submodel_elements = Some(vec![element]);
    let env = Environment {
        submodels: Some(vec![submodel]),
        ..Default::default()
    };
    drop(env);
}
