//! Entity classes and their property descriptors.
//!
//! A class is compiled once from its defining query: the analyzer derives a
//! descriptor per projected variable and the synthesizer derives the write
//! templates. Every entity of the class shares the result.

use crate::{SessionError, SessionResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use weft_analyzer::{analyze, QueryAnalysis, VariableProperties};
use weft_core::{Datatype, Iri, Term};
use weft_parser::{parse_query, SelectQuery};
use weft_registry::{ClassConfig, Multiplicity as DeclaredMultiplicity, PropertyConfig, Vocabulary};
use weft_synthesizer::{QuerySynthesizer, SynthError, UpdateTemplate};

/// Namespace for created entities when a class names none.
pub const DEFAULT_NAMESPACE: &str = "urn:weft:";

// ==================== DESCRIPTORS ====================

/// What a property holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// Literal values with the given datatype tag.
    Literal(String),
    /// IRIs of entities with the given class tag.
    Reference(String),
}

impl PropertyKind {
    pub fn tag(&self) -> &str {
        match self {
            PropertyKind::Literal(tag) | PropertyKind::Reference(tag) => tag,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, PropertyKind::Reference(_))
    }

    fn expected(&self) -> &'static str {
        match self {
            PropertyKind::Literal(_) => "literal",
            PropertyKind::Reference(_) => "IRI",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// At most one value.
    Functional,
    /// A set of values.
    Multi,
}

/// Accessor metadata for one property of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Query variable backing the property.
    pub variable: String,
    pub kind: PropertyKind,
    pub multiplicity: Multiplicity,
    pub nullable: bool,
    /// Predicate linking the anchor to the value, if written directly.
    pub predicate: Option<Iri>,
}

impl PropertyDescriptor {
    fn from_analysis(name: &str, variable: &str, props: &VariableProperties) -> Self {
        let kind = if props.is_object_reference {
            PropertyKind::Reference(props.datatype.clone())
        } else {
            PropertyKind::Literal(props.datatype.clone())
        };
        Self {
            name: name.to_string(),
            variable: variable.to_string(),
            kind,
            multiplicity: if props.functional {
                Multiplicity::Functional
            } else {
                Multiplicity::Multi
            },
            nullable: props.nullable,
            predicate: props.predicate.clone(),
        }
    }

    pub fn is_functional(&self) -> bool {
        self.multiplicity == Multiplicity::Functional
    }

    /// Functional and non-nullable.
    pub fn is_mandatory(&self) -> bool {
        self.is_functional() && !self.nullable
    }

    pub fn expect_functional(&self) -> SessionResult<()> {
        if self.is_functional() {
            Ok(())
        } else {
            Err(SessionError::wrong_multiplicity(&self.name, "single-valued"))
        }
    }

    pub fn expect_multi(&self) -> SessionResult<()> {
        if self.is_functional() {
            Err(SessionError::wrong_multiplicity(&self.name, "multi-valued"))
        } else {
            Ok(())
        }
    }

    /// Reference properties accept IRIs, literal properties literals.
    pub fn check_kind(&self, value: &Term) -> SessionResult<()> {
        let ok = match self.kind {
            PropertyKind::Literal(_) => value.is_literal(),
            PropertyKind::Reference(_) => value.is_iri(),
        };
        if ok {
            Ok(())
        } else {
            Err(SessionError::kind_mismatch(
                &self.name,
                self.kind.expected(),
                value.kind_name(),
            ))
        }
    }

    /// The predicate to write through, or `UnanchoredVariable` for values
    /// the query derives indirectly.
    pub fn writable_predicate(&self) -> SessionResult<&Iri> {
        self.predicate
            .as_ref()
            .ok_or_else(|| SynthError::unanchored_variable(&self.variable).into())
    }
}

// ==================== CLASS ====================

/// A class of entities defined by a query and its anchor variable.
#[derive(Debug)]
pub struct EntityClass {
    name: String,
    anchor: String,
    namespace: String,
    query: SelectQuery,
    descriptors: BTreeMap<String, PropertyDescriptor>,
    creation: UpdateTemplate,
    initializers: BTreeMap<String, UpdateTemplate>,
}

impl EntityClass {
    /// Compile a class from query text. Property names are the variable
    /// names.
    pub fn new(
        name: impl Into<String>,
        query_text: &str,
        anchor: &str,
        namespace: &str,
        vocabulary: &Vocabulary,
    ) -> SessionResult<Arc<Self>> {
        Self::compile(
            name.into(),
            query_text,
            anchor,
            namespace,
            &BTreeMap::new(),
            vocabulary,
        )
    }

    /// Compile a class from a configuration entry, applying its property
    /// overrides to the analysis before templates are generated.
    pub fn from_config(
        name: impl Into<String>,
        config: &ClassConfig,
        vocabulary: &Vocabulary,
    ) -> SessionResult<Arc<Self>> {
        Self::compile(
            name.into(),
            &config.query,
            &config.anchor,
            config.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE),
            &config.properties,
            vocabulary,
        )
    }

    fn compile(
        name: String,
        query_text: &str,
        anchor: &str,
        namespace: &str,
        overrides: &BTreeMap<String, PropertyConfig>,
        vocabulary: &Vocabulary,
    ) -> SessionResult<Arc<Self>> {
        let query = parse_query(query_text)?;
        let mut analysis = analyze(&query, anchor, vocabulary)?;
        let names = apply_overrides(&mut analysis, overrides)?;
        let synthesizer = QuerySynthesizer::new(analysis)?;

        let mut descriptors = BTreeMap::new();
        let mut initializers = BTreeMap::new();
        for (variable, props) in &synthesizer.analysis().variables {
            let name = names.get(variable).map_or(variable.as_str(), String::as_str);
            let descriptor = PropertyDescriptor::from_analysis(name, variable, props);
            if !descriptor.is_mandatory() && descriptor.predicate.is_some() {
                initializers.insert(name.to_string(), synthesizer.initializer_update(variable)?);
            }
            descriptors.insert(name.to_string(), descriptor);
        }

        debug!(
            class = %name,
            anchor,
            properties = descriptors.len(),
            "compiled entity class"
        );
        Ok(Arc::new(Self {
            name,
            anchor: anchor.to_string(),
            namespace: namespace.to_string(),
            query,
            descriptors,
            creation: synthesizer.base_creation_update(),
            initializers,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anchor variable, also the tag used for fresh IRIs.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn query(&self) -> &SelectQuery {
        &self.query
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.descriptors.values()
    }

    pub fn descriptor(&self, property: &str) -> SessionResult<&PropertyDescriptor> {
        self.descriptors
            .get(property)
            .ok_or_else(|| SessionError::unknown_property(&self.name, property))
    }

    /// Base creation template; its parameters are variable names.
    pub fn creation_template(&self) -> &UpdateTemplate {
        &self.creation
    }

    pub fn initializer(&self, property: &str) -> SessionResult<&UpdateTemplate> {
        let descriptor = self.descriptor(property)?;
        match self.initializers.get(property) {
            Some(template) => Ok(template),
            None => {
                descriptor.writable_predicate()?;
                Err(SessionError::wrong_multiplicity(property, "optional"))
            }
        }
    }

    pub fn initializers(&self) -> impl Iterator<Item = (&str, &UpdateTemplate)> {
        self.initializers.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {} (anchor ?{})", self.name, self.anchor)?;
        for d in self.descriptors.values() {
            let many = if d.is_functional() { "" } else { "*" };
            let null = if d.nullable { "?" } else { "" };
            writeln!(f, "  {}: {}{}{}", d.name, d.kind.tag(), many, null)?;
        }
        Ok(())
    }
}

/// Apply configured datatype and multiplicity to the analysis. Returns the
/// variable → property name mapping for renamed properties.
fn apply_overrides(
    analysis: &mut QueryAnalysis,
    overrides: &BTreeMap<String, PropertyConfig>,
) -> SessionResult<BTreeMap<String, String>> {
    let mut names = BTreeMap::new();
    for (name, config) in overrides {
        let variable = config.variable(name);
        let props = analysis
            .variables
            .get_mut(variable)
            .ok_or_else(|| SynthError::unknown_variable(variable))?;

        match config.multiplicity()? {
            DeclaredMultiplicity::One => {
                props.functional = true;
                props.nullable = false;
            }
            DeclaredMultiplicity::Optional => {
                props.functional = true;
                props.nullable = true;
            }
            DeclaredMultiplicity::Many => {
                props.functional = false;
                props.nullable = false;
            }
        }

        match Datatype::from_tag(&config.datatype) {
            Some(datatype) => {
                props.is_object_reference = false;
                props.datatype = datatype.tag().to_string();
            }
            None => {
                props.is_object_reference = true;
                props.datatype = config.datatype.clone();
            }
        }

        if variable != name {
            names.insert(variable.to_string(), name.clone());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weft_core::Literal;
    use weft_registry::VocabularyBuilder;

    const BIKE_QUERY: &str = r#"
        PREFIX bk: <http://example.org/bike#>
        SELECT ?bike ?mfg ?fw ?bw WHERE {
            ?bike bk:manufacturer ?mfg .
            ?bike bk:frontWheel ?fw .
            OPTIONAL { ?bike bk:backWheel ?bw . }
        }
    "#;

    fn bk(local: &str) -> Iri {
        Iri::new(format!("http://example.org/bike#{}", local)).unwrap()
    }

    fn bike_vocabulary() -> Vocabulary {
        let mut builder = VocabularyBuilder::new();
        builder.add_predicate(bk("manufacturer")).literal(Datatype::String).done().unwrap();
        builder.add_predicate(bk("frontWheel")).entity("Wheel").many().done().unwrap();
        builder.add_predicate(bk("backWheel")).entity("Wheel").done().unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_bike_descriptors() {
        // GIVEN the bike query with a one-to-many front wheel
        let class = EntityClass::new("Bike", BIKE_QUERY, "bike", "http://x/", &bike_vocabulary())
            .unwrap();

        // THEN mfg is a mandatory literal, fw a reference set, bw optional
        let mfg = class.descriptor("mfg").unwrap();
        assert_eq!(mfg.kind, PropertyKind::Literal("String".into()));
        assert!(mfg.is_mandatory());

        let fw = class.descriptor("fw").unwrap();
        assert_eq!(fw.kind, PropertyKind::Reference("Wheel".into()));
        assert_eq!(fw.multiplicity, Multiplicity::Multi);

        let bw = class.descriptor("bw").unwrap();
        assert!(bw.is_functional());
        assert!(bw.nullable);

        // AND only the mandatory value is part of creation
        assert_eq!(
            class.creation_template().params().into_iter().collect::<Vec<_>>(),
            vec!["mfg"]
        );
        assert_eq!(
            class.initializers().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["bw", "fw"]
        );
    }

    #[test]
    fn test_unknown_property() {
        let class = EntityClass::new("Bike", BIKE_QUERY, "bike", "http://x/", &bike_vocabulary())
            .unwrap();
        assert!(matches!(
            class.descriptor("color"),
            Err(SessionError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_check_kind() {
        let class = EntityClass::new("Bike", BIKE_QUERY, "bike", "http://x/", &bike_vocabulary())
            .unwrap();
        let fw = class.descriptor("fw").unwrap();
        assert!(fw.check_kind(&Term::Iri(bk("w1"))).is_ok());
        assert!(matches!(
            fw.check_kind(&Term::Literal(Literal::string("w1"))),
            Err(SessionError::KindMismatch { expected: "IRI", found: "literal", .. })
        ));
    }

    #[test]
    fn test_config_overrides_and_renames() {
        // GIVEN a configuration renaming ?mfg and making it optional
        let config = ClassConfig::from_json(&format!(
            r#"{{
                "anchor": "bike",
                "query": {:?},
                "properties": {{
                    "maker": {{ "sparql": "mfg", "datatype": "String", "multiplicity": "?" }},
                    "bw": {{ "datatype": "Wheel", "multiplicity": "*" }}
                }}
            }}"#,
            BIKE_QUERY
        ))
        .unwrap();

        // WHEN compiled
        let class = EntityClass::from_config("Bike", &config, &bike_vocabulary()).unwrap();

        // THEN the overrides replace the inferred values
        let maker = class.descriptor("maker").unwrap();
        assert_eq!(maker.variable, "mfg");
        assert!(maker.nullable);
        assert_eq!(class.descriptor("bw").unwrap().multiplicity, Multiplicity::Multi);
        assert_eq!(class.namespace(), DEFAULT_NAMESPACE);
        assert!(class.creation_template().params().is_empty());
    }

    #[test]
    fn test_override_of_unknown_variable_fails() {
        let config = ClassConfig {
            anchor: "bike".into(),
            query: BIKE_QUERY.into(),
            namespace: None,
            properties: BTreeMap::from([(
                "color".to_string(),
                PropertyConfig {
                    sparql: None,
                    datatype: "String".into(),
                    multiplicity: "1".into(),
                },
            )]),
        };
        assert!(matches!(
            EntityClass::from_config("Bike", &config, &bike_vocabulary()),
            Err(SessionError::Synthesis(SynthError::UnknownVariable { .. }))
        ));
    }
}
