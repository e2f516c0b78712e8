//! Enumeration tokens of the AAS XML schema.
//!
//! Every model enumeration maps to the fixed string tokens of the schema. The
//! tables below are the only place those tokens are spelled out.

use shellwork_aas::{
    AasSubmodelElements, AssetKind, DataTypeDefXsd, DataTypeIec61360, Direction, EntityType,
    KeyTypes, ModellingKind, QualifierKind, ReferenceTypes, StateOfEvent,
};
use thiserror::Error;

use crate::error::SerdeError;

/// A token with no mapping in the enumeration it was read for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {enum_name} token '{token}'")]
pub struct UnknownToken {
    pub token: String,
    pub enum_name: &'static str,
}

impl UnknownToken {
    fn new(token: &str, enum_name: &'static str) -> Self {
        Self {
            token: token.to_string(),
            enum_name,
        }
    }

    /// Attaches the path of the element the token was read from.
    pub fn at(self, path: impl Into<String>) -> SerdeError {
        SerdeError::UnknownToken {
            token: self.token,
            enum_name: self.enum_name,
            path: path.into(),
        }
    }
}

/// Conversion between an enumeration and its wire tokens.
pub trait WireToken: Sized + Copy + 'static {
    /// Schema name of the enumeration, used in errors and fallback lookup.
    const NAME: &'static str;
    /// Every value of the enumeration, in schema order.
    const ALL: &'static [Self];

    fn token(&self) -> &'static str;

    /// Surrounding whitespace is ignored; tokens are otherwise matched exactly.
    fn from_token(token: &str) -> Result<Self, UnknownToken>;
}

macro_rules! wire_tokens {
    ($ty:ident, $name:literal { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl WireToken for $ty {
            const NAME: &'static str = $name;
            const ALL: &'static [Self] = &[$($ty::$variant),+];

            fn token(&self) -> &'static str {
                match self {
                    $($ty::$variant => $token),+
                }
            }

            fn from_token(token: &str) -> Result<Self, UnknownToken> {
                match token.trim() {
                    $($token => Ok($ty::$variant),)+
                    other => Err(UnknownToken::new(other, $name)),
                }
            }
        }
    };
}

wire_tokens!(AssetKind, "AssetKind" {
    Type => "Type",
    Instance => "Instance",
    NotApplicable => "NotApplicable",
});

wire_tokens!(ModellingKind, "ModellingKind" {
    Template => "Template",
    Instance => "Instance",
});

wire_tokens!(ReferenceTypes, "ReferenceTypes" {
    ExternalReference => "ExternalReference",
    ModelReference => "ModelReference",
});

wire_tokens!(KeyTypes, "KeyTypes" {
    AnnotatedRelationshipElement => "AnnotatedRelationshipElement",
    AssetAdministrationShell => "AssetAdministrationShell",
    BasicEventElement => "BasicEventElement",
    Blob => "Blob",
    Capability => "Capability",
    ConceptDescription => "ConceptDescription",
    DataElement => "DataElement",
    Entity => "Entity",
    EventElement => "EventElement",
    File => "File",
    FragmentReference => "FragmentReference",
    GlobalReference => "GlobalReference",
    Identifiable => "Identifiable",
    MultiLanguageProperty => "MultiLanguageProperty",
    Operation => "Operation",
    Property => "Property",
    Range => "Range",
    Referable => "Referable",
    ReferenceElement => "ReferenceElement",
    RelationshipElement => "RelationshipElement",
    Submodel => "Submodel",
    SubmodelElement => "SubmodelElement",
    SubmodelElementCollection => "SubmodelElementCollection",
    SubmodelElementList => "SubmodelElementList",
});

wire_tokens!(QualifierKind, "QualifierKind" {
    ValueQualifier => "ValueQualifier",
    ConceptQualifier => "ConceptQualifier",
    TemplateQualifier => "TemplateQualifier",
});

wire_tokens!(EntityType, "EntityType" {
    CoManagedEntity => "CoManagedEntity",
    SelfManagedEntity => "SelfManagedEntity",
});

wire_tokens!(Direction, "Direction" {
    Input => "input",
    Output => "output",
});

wire_tokens!(StateOfEvent, "StateOfEvent" {
    On => "on",
    Off => "off",
});

wire_tokens!(AasSubmodelElements, "AasSubmodelElements" {
    AnnotatedRelationshipElement => "AnnotatedRelationshipElement",
    BasicEventElement => "BasicEventElement",
    Blob => "Blob",
    Capability => "Capability",
    DataElement => "DataElement",
    Entity => "Entity",
    EventElement => "EventElement",
    File => "File",
    MultiLanguageProperty => "MultiLanguageProperty",
    Operation => "Operation",
    Property => "Property",
    Range => "Range",
    ReferenceElement => "ReferenceElement",
    RelationshipElement => "RelationshipElement",
    SubmodelElement => "SubmodelElement",
    SubmodelElementCollection => "SubmodelElementCollection",
    SubmodelElementList => "SubmodelElementList",
});

wire_tokens!(DataTypeDefXsd, "DataTypeDefXsd" {
    AnyUri => "xs:anyURI",
    Base64Binary => "xs:base64Binary",
    Boolean => "xs:boolean",
    Byte => "xs:byte",
    Date => "xs:date",
    DateTime => "xs:dateTime",
    Decimal => "xs:decimal",
    Double => "xs:double",
    Duration => "xs:duration",
    Float => "xs:float",
    GDay => "xs:gDay",
    GMonth => "xs:gMonth",
    GMonthDay => "xs:gMonthDay",
    GYear => "xs:gYear",
    GYearMonth => "xs:gYearMonth",
    HexBinary => "xs:hexBinary",
    Int => "xs:int",
    Integer => "xs:integer",
    Long => "xs:long",
    NegativeInteger => "xs:negativeInteger",
    NonNegativeInteger => "xs:nonNegativeInteger",
    NonPositiveInteger => "xs:nonPositiveInteger",
    PositiveInteger => "xs:positiveInteger",
    Short => "xs:short",
    String => "xs:string",
    Time => "xs:time",
    UnsignedByte => "xs:unsignedByte",
    UnsignedInt => "xs:unsignedInt",
    UnsignedLong => "xs:unsignedLong",
    UnsignedShort => "xs:unsignedShort",
});

wire_tokens!(DataTypeIec61360, "DataTypeIec61360" {
    Date => "DATE",
    String => "STRING",
    StringTranslatable => "STRING_TRANSLATABLE",
    IntegerMeasure => "INTEGER_MEASURE",
    IntegerCount => "INTEGER_COUNT",
    IntegerCurrency => "INTEGER_CURRENCY",
    RealMeasure => "REAL_MEASURE",
    RealCount => "REAL_COUNT",
    RealCurrency => "REAL_CURRENCY",
    Boolean => "BOOLEAN",
    Iri => "IRI",
    Irdi => "IRDI",
    Rational => "RATIONAL",
    RationalMeasure => "RATIONAL_MEASURE",
    Time => "TIME",
    Timestamp => "TIMESTAMP",
    File => "FILE",
    Html => "HTML",
    Blob => "BLOB",
});

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn assert_total<E: WireToken + PartialEq + std::fmt::Debug>() {
        let mut seen = HashSet::new();
        for value in E::ALL {
            let token = value.token();
            assert!(seen.insert(token), "{} token '{}' is not unique", E::NAME, token);
            assert_eq!(E::from_token(token).unwrap(), *value);
        }
    }

    #[test]
    fn test_every_enum_roundtrips() {
        assert_total::<AssetKind>();
        assert_total::<ModellingKind>();
        assert_total::<ReferenceTypes>();
        assert_total::<KeyTypes>();
        assert_total::<QualifierKind>();
        assert_total::<EntityType>();
        assert_total::<Direction>();
        assert_total::<StateOfEvent>();
        assert_total::<AasSubmodelElements>();
        assert_total::<DataTypeDefXsd>();
        assert_total::<DataTypeIec61360>();
    }

    #[test]
    fn test_variant_counts() {
        assert_eq!(KeyTypes::ALL.len(), 24);
        assert_eq!(AasSubmodelElements::ALL.len(), 17);
        assert_eq!(DataTypeDefXsd::ALL.len(), 30);
        assert_eq!(DataTypeIec61360::ALL.len(), 19);
    }

    #[test]
    fn test_tokens_match_json_names() {
        // The JSON derives and the XML tables must agree on every token.
        for value in DataTypeDefXsd::ALL {
            let json = serde_json::to_value(value).unwrap();
            assert_eq!(json.as_str(), Some(value.token()));
        }
        for value in DataTypeIec61360::ALL {
            let json = serde_json::to_value(value).unwrap();
            assert_eq!(json.as_str(), Some(value.token()));
        }
        for value in KeyTypes::ALL {
            let json = serde_json::to_value(value).unwrap();
            assert_eq!(json.as_str(), Some(value.token()));
        }
        assert_eq!(Direction::Output.token(), "output");
        assert_eq!(StateOfEvent::Off.token(), "off");
    }

    #[test]
    fn test_from_token_trims_whitespace() {
        assert_eq!(
            ModellingKind::from_token("\n  Instance  ").unwrap(),
            ModellingKind::Instance
        );
    }

    #[test]
    fn test_unknown_token() {
        let err = AssetKind::from_token("Blueprint").unwrap_err();
        assert_eq!(err.token, "Blueprint");
        assert_eq!(err.enum_name, "AssetKind");

        match err.at("/environment/x") {
            SerdeError::UnknownToken { path, .. } => assert_eq!(path, "/environment/x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert!(DataTypeDefXsd::from_token("xs:String").is_err());
        assert!(Direction::from_token("Input").is_err());
    }
}
