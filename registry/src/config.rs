//! JSON configuration for vocabularies and entity classes.

use crate::{Cardinality, RegistryError, RegistryResult, Vocabulary, VocabularyBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weft_core::{Datatype, Iri};

/// Expand `prefix:local` against `prefixes`; anything containing `://` is
/// taken as a full IRI.
pub fn expand_iri(text: &str, prefixes: &BTreeMap<String, String>) -> RegistryResult<Iri> {
    if text.contains("://") {
        return Ok(Iri::new(text)?);
    }
    let (prefix, local) = text
        .split_once(':')
        .ok_or_else(|| RegistryError::UndeclaredPrefix(text.to_string()))?;
    let ns = prefixes
        .get(prefix)
        .ok_or_else(|| RegistryError::UndeclaredPrefix(text.to_string()))?;
    Ok(Iri::new(format!("{}{}", ns, local))?)
}

// ==================== VOCABULARY ====================

/// Serialized form of a vocabulary.
///
/// ```json
/// {
///   "prefixes": { "bk": "http://example.org/bike#" },
///   "predicates": [
///     { "iri": "bk:frontWheel", "entity": "Wheel", "cardinality": "many" },
///     { "iri": "bk:mfgDate", "datatype": "Int" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub predicates: Vec<PredicateConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateConfig {
    pub iri: String,
    /// Class tag when objects are entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Datatype tag (`Int`, `String`, ...) or datatype IRI when objects are literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl VocabularyConfig {
    pub fn from_json(text: &str) -> RegistryResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_vocabulary(self) -> RegistryResult<Vocabulary> {
        let mut builder = VocabularyBuilder::new();
        for pred in &self.predicates {
            let iri = expand_iri(&pred.iri, &self.prefixes)?;
            let mut def = builder.add_predicate(iri).cardinality(pred.cardinality);
            match (&pred.entity, &pred.datatype) {
                (Some(_), Some(_)) => return Err(RegistryError::ConflictingRange(pred.iri.clone())),
                (Some(tag), None) => def = def.entity(tag.clone()),
                (None, Some(dt)) => def = def.literal(parse_datatype(dt, &self.prefixes)?),
                (None, None) => {}
            }
            def.done()?;
        }
        builder.build()
    }
}

fn parse_datatype(text: &str, prefixes: &BTreeMap<String, String>) -> RegistryResult<Datatype> {
    if let Some(dt) = Datatype::from_tag(text) {
        return Ok(dt);
    }
    if text.contains(':') {
        return Ok(Datatype::from_iri(&expand_iri(text, prefixes)?));
    }
    Err(RegistryError::UnknownDatatype(text.to_string()))
}

impl Vocabulary {
    /// Parse a JSON vocabulary configuration.
    pub fn from_json(text: &str) -> RegistryResult<Self> {
        VocabularyConfig::from_json(text)?.into_vocabulary()
    }
}

// ==================== CLASS ====================

/// Declared multiplicity of an entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// Exactly one value (`1`).
    One,
    /// Zero or one value (`?`).
    Optional,
    /// Any number of values (`*`).
    Many,
}

impl Multiplicity {
    pub fn parse(text: &str) -> RegistryResult<Self> {
        match text.trim() {
            "1" => Ok(Multiplicity::One),
            "?" | "0..1" => Ok(Multiplicity::Optional),
            "*" | "0..*" => Ok(Multiplicity::Many),
            other => Err(RegistryError::UnknownMultiplicity(other.to_string())),
        }
    }
}

/// Definition of an entity class.
///
/// `properties` optionally overrides what the analyzer infers for a query
/// variable. Keys are property names; `sparql` names the query variable
/// when it differs from the property name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub anchor: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparql: Option<String>,
    pub datatype: String,
    pub multiplicity: String,
}

impl ClassConfig {
    pub fn from_json(text: &str) -> RegistryResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a JSON object mapping class names to class definitions.
    pub fn map_from_json(text: &str) -> RegistryResult<BTreeMap<String, ClassConfig>> {
        Ok(serde_json::from_str(text)?)
    }
}

impl PropertyConfig {
    /// The query variable backing property `name`.
    pub fn variable<'a>(&'a self, name: &'a str) -> &'a str {
        self.sparql.as_deref().unwrap_or(name)
    }

    pub fn multiplicity(&self) -> RegistryResult<Multiplicity> {
        Multiplicity::parse(&self.multiplicity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Range;

    #[test]
    fn test_vocabulary_from_json() {
        // GIVEN a vocabulary file with a prefix and two predicates
        let json = r#"{
            "prefixes": { "bk": "http://example.org/bike#" },
            "predicates": [
                { "iri": "bk:frontWheel", "entity": "Wheel", "cardinality": "many" },
                { "iri": "http://example.org/bike#mfgDate", "datatype": "Int" }
            ]
        }"#;

        // WHEN parsed
        let vocab = Vocabulary::from_json(json).unwrap();

        // THEN both predicates are declared with full IRIs
        let fw = Iri::new("http://example.org/bike#frontWheel").unwrap();
        let mfg = Iri::new("http://example.org/bike#mfgDate").unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.is_many(&fw));
        assert_eq!(vocab.range_of(&fw), &Range::Entity("Wheel".into()));
        assert_eq!(vocab.range_of(&mfg), &Range::Literal(Datatype::Integer));
        assert_eq!(vocab.cardinality_of(&mfg), Cardinality::One);
    }

    #[test]
    fn test_vocabulary_datatype_iri() {
        let json = r#"{ "predicates": [
            { "iri": "http://x/p", "datatype": "http://www.w3.org/2001/XMLSchema#date" }
        ] }"#;
        let vocab = Vocabulary::from_json(json).unwrap();
        let p = Iri::new("http://x/p").unwrap();
        assert_eq!(vocab.range_of(&p), &Range::Literal(Datatype::Date));
    }

    #[test]
    fn test_vocabulary_errors() {
        let undeclared = r#"{ "predicates": [ { "iri": "nope:p" } ] }"#;
        assert!(matches!(
            Vocabulary::from_json(undeclared),
            Err(RegistryError::UndeclaredPrefix(_))
        ));

        let conflicting =
            r#"{ "predicates": [ { "iri": "http://x/p", "entity": "A", "datatype": "Int" } ] }"#;
        assert!(matches!(
            Vocabulary::from_json(conflicting),
            Err(RegistryError::ConflictingRange(_))
        ));

        let unknown_dt = r#"{ "predicates": [ { "iri": "http://x/p", "datatype": "Money" } ] }"#;
        assert!(matches!(
            Vocabulary::from_json(unknown_dt),
            Err(RegistryError::UnknownDatatype(_))
        ));

        assert!(matches!(
            Vocabulary::from_json("{ not json"),
            Err(RegistryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_class_config_from_json() {
        // GIVEN a class definition with one property override
        let json = r#"{
            "anchor": "bike",
            "query": "SELECT ?bike ?mfg WHERE { ?bike <http://x/mfg> ?mfg }",
            "namespace": "http://example.org/bike#",
            "properties": {
                "mfgDate": { "sparql": "mfg", "datatype": "Int", "multiplicity": "?" }
            }
        }"#;

        // WHEN parsed
        let class = ClassConfig::from_json(json).unwrap();

        // THEN the override maps mfgDate to ?mfg
        let prop = &class.properties["mfgDate"];
        assert_eq!(class.anchor, "bike");
        assert_eq!(prop.variable("mfgDate"), "mfg");
        assert_eq!(prop.multiplicity().unwrap(), Multiplicity::Optional);
    }

    #[test]
    fn test_multiplicity_parse() {
        assert_eq!(Multiplicity::parse("1").unwrap(), Multiplicity::One);
        assert_eq!(Multiplicity::parse("*").unwrap(), Multiplicity::Many);
        assert!(matches!(
            Multiplicity::parse("many"),
            Err(RegistryError::UnknownMultiplicity(_))
        ));
    }
}
