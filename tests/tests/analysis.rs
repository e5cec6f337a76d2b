//! Analysis and synthesis scenarios over the bike world.

use pretty_assertions::assert_eq;
use weft_tests::prelude::*;

fn analysis_of(query: &str, anchor: &str, vocabulary: &Vocabulary) -> QueryAnalysis {
    analyze(&parse_query(query).unwrap(), anchor, vocabulary).unwrap()
}

mod bike_example {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bike_descriptors() {
        // GIVEN the bike query and its vocabulary
        let analysis = analysis_of(BIKE_QUERY, "bike", &bike_vocabulary());

        // THEN mfg is a mandatory String
        let mfg = analysis.get("mfg").unwrap();
        assert!(mfg.functional && !mfg.nullable);
        assert_eq!(mfg.datatype, "String");
        assert!(!mfg.is_object_reference);

        // AND fw is a set of Wheel references
        let fw = analysis.get("fw").unwrap();
        assert!(!fw.functional);
        assert!(fw.is_object_reference);
        assert_eq!(fw.datatype, "Wheel");

        // AND bw is an optional Wheel reference
        let bw = analysis.get("bw").unwrap();
        assert!(bw.functional && bw.nullable);
        assert_eq!(bw.predicate, Some(bk("backWheel")));
        assert!(analysis.ambiguous.is_empty());
    }

    #[test]
    fn test_bike_templates() {
        let synthesizer =
            QuerySynthesizer::from_query(&parse_query(BIKE_QUERY).unwrap(), "bike", &bike_vocabulary())
                .unwrap();

        let creation = synthesizer.base_creation_update();
        assert_eq!(creation.params().into_iter().collect::<Vec<_>>(), vec!["mfg"]);

        let names: Vec<String> = synthesizer
            .initializer_updates()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["init_bw", "init_fw"]);
    }
}

mod nullability {
    use super::*;

    #[test]
    fn test_optional_only_binding_is_nullable() {
        let query = r#"
            PREFIX bk: <http://example.org/bike#>
            SELECT ?bike ?bw WHERE {
                ?bike bk:manufacturer ?mfg .
                OPTIONAL { ?bike bk:backWheel ?bw . }
            }
        "#;
        assert!(analysis_of(query, "bike", &bike_vocabulary()).get("bw").unwrap().nullable);
    }

    #[test]
    fn test_unconditional_binding_is_not_nullable() {
        // GIVEN bw bound inside an OPTIONAL and also unconditionally
        let query = r#"
            PREFIX bk: <http://example.org/bike#>
            SELECT ?bike ?bw WHERE {
                ?bike bk:backWheel ?bw .
                OPTIONAL { ?bike bk:backWheel ?bw . }
            }
        "#;

        // THEN it is not nullable
        assert!(!analysis_of(query, "bike", &bike_vocabulary()).get("bw").unwrap().nullable);
    }

    #[test]
    fn test_sibling_optionals_reject_class() {
        // GIVEN bw bound in two sibling OPTIONAL blocks
        let query = r#"
            PREFIX bk: <http://example.org/bike#>
            SELECT ?bike ?bw WHERE {
                ?bike bk:manufacturer ?mfg .
                OPTIONAL { ?bike bk:backWheel ?bw . }
                OPTIONAL { ?bike bk:spareWheel ?bw . }
            }
        "#;

        // WHEN compiling a class from it
        let result = EntityClass::new("Bike", query, "bike", DATA_NS, &bike_vocabulary());

        // THEN the ambiguity is reported and nothing is generated
        assert!(matches!(
            result,
            Err(SessionError::Synthesis(SynthError::Analysis(
                AnalyzerError::AmbiguousOptionalBinding { .. }
            )))
        ));
    }
}

mod references {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_subject_occurrence_makes_reference() {
        // GIVEN an empty vocabulary and ?fw used as a subject
        let query = r#"
            PREFIX bk: <http://example.org/bike#>
            SELECT ?bike ?fw WHERE {
                ?bike bk:frontWheel ?fw .
                ?fw bk:size ?size .
            }
        "#;

        // THEN ?fw is an object reference
        let analysis = analysis_of(query, "bike", &Vocabulary::empty());
        assert!(analysis.get("fw").unwrap().is_object_reference);
    }

    #[test]
    fn test_one_to_many_reachability_is_not_functional() {
        // GIVEN a value reachable only through the one-to-many frontWheel
        let query = r#"
            PREFIX bk: <http://example.org/bike#>
            SELECT ?bike ?size WHERE {
                ?bike bk:frontWheel ?fw .
                ?fw bk:size ?size .
            }
        "#;

        // THEN it is not functional
        let analysis = analysis_of(query, "bike", &bike_vocabulary());
        assert!(!analysis.get("size").unwrap().functional);
        assert_eq!(analysis.get("size").unwrap().predicate, None);
    }
}
