//! The bike world: bikes with a manufacturer, one or more front wheels and
//! an optional back wheel.

use std::sync::Arc;
use weft_core::{Datatype, Iri, Literal, Term, Triple};
use weft_registry::{Vocabulary, VocabularyBuilder};
use weft_session::EntityClass;
use weft_store::MemoryStore;

pub const BIKE_NS: &str = "http://example.org/bike#";
pub const DATA_NS: &str = "http://example.org/data/";

pub const BIKE_QUERY: &str = r#"
    PREFIX bk: <http://example.org/bike#>
    SELECT ?bike ?mfg ?fw ?bw WHERE {
        ?bike bk:manufacturer ?mfg .
        ?bike bk:frontWheel ?fw .
        OPTIONAL { ?bike bk:backWheel ?bw . }
    }
"#;

/// Vocabulary term.
pub fn bk(local: &str) -> Iri {
    Iri::new(format!("{}{}", BIKE_NS, local)).expect("valid vocabulary IRI")
}

/// Data resource.
pub fn data(local: &str) -> Iri {
    Iri::new(format!("{}{}", DATA_NS, local)).expect("valid data IRI")
}

pub fn lit(value: &str) -> Term {
    Term::Literal(Literal::string(value))
}

/// `frontWheel` is one-to-many; wheels are entities.
pub fn bike_vocabulary() -> Vocabulary {
    let mut builder = VocabularyBuilder::new();
    builder
        .add_predicate(bk("manufacturer"))
        .literal(Datatype::String)
        .done()
        .expect("manufacturer");
    builder
        .add_predicate(bk("frontWheel"))
        .entity("Wheel")
        .many()
        .done()
        .expect("frontWheel");
    builder
        .add_predicate(bk("backWheel"))
        .entity("Wheel")
        .done()
        .expect("backWheel");
    builder.build().expect("bike vocabulary")
}

pub fn bike_class() -> Arc<EntityClass> {
    EntityClass::new("Bike", BIKE_QUERY, "bike", DATA_NS, &bike_vocabulary()).expect("bike class")
}

/// Wheels carry a size; used as redirect and delete targets.
pub fn wheel_class() -> Arc<EntityClass> {
    EntityClass::new(
        "Wheel",
        "PREFIX bk: <http://example.org/bike#> SELECT ?wheel ?size WHERE { ?wheel bk:size ?size . }",
        "wheel",
        DATA_NS,
        &bike_vocabulary(),
    )
    .expect("wheel class")
}

/// b1: Acme, front wheels w1 and w2, back wheel w3.
/// b2: Bolt, front wheel w4, no back wheel.
pub fn bike_triples() -> Vec<Triple> {
    vec![
        Triple::new(data("b1"), bk("manufacturer"), lit("Acme")),
        Triple::new(data("b1"), bk("frontWheel"), data("w1")),
        Triple::new(data("b1"), bk("frontWheel"), data("w2")),
        Triple::new(data("b1"), bk("backWheel"), data("w3")),
        Triple::new(data("b2"), bk("manufacturer"), lit("Bolt")),
        Triple::new(data("b2"), bk("frontWheel"), data("w4")),
    ]
}

pub fn bike_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_triples(bike_triples()))
}
