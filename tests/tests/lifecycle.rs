//! Session lifecycle scenarios: create, load, mutate, commit, roll back.

use pretty_assertions::assert_eq;
use weft_tests::prelude::*;

fn wheel(local: &str) -> Term {
    Term::Iri(data(local))
}

mod round_trip {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_created_entity_loads_in_new_session() {
        // GIVEN a bike created and committed
        let class = bike_class();
        let store = Arc::new(MemoryStore::new());
        let mut writer = Session::new(store.clone()).with_fresh_ids(SequentialSuffixes::new());
        let bike = writer
            .create(
                &class,
                EntityInit::new()
                    .with("mfg", "Acme")
                    .with("fw", data("w1"))
                    .with("fw", data("w2"))
                    .with("bw", data("w3")),
            )
            .unwrap();
        let outcome = writer.commit().unwrap();
        assert_eq!(outcome.nodes, 1);

        // WHEN a fresh session loads it by IRI
        let mut reader = Session::new(store);
        let loaded = reader.load_from_uri(&class, bike.iri()).unwrap().unwrap();

        // THEN every value survived
        assert_eq!(reader.get(&loaded, "mfg").unwrap(), Slot::Single(Some(lit("Acme"))));
        assert_eq!(
            reader.get(&loaded, "fw").unwrap(),
            Slot::Many(vec![wheel("w1"), wheel("w2")])
        );
        assert_eq!(reader.get(&loaded, "bw").unwrap(), Slot::Single(Some(wheel("w3"))));
    }

    #[test]
    fn test_fresh_iris_follow_namespace_and_anchor() {
        let class = bike_class();
        let mut session = Session::new(bike_store()).with_fresh_ids(SequentialSuffixes::starting_at(41));
        let init = || EntityInit::new().with("mfg", "Acme").with("fw", data("w1"));

        let first = session.create(&class, init()).unwrap();
        let second = session.create(&class, init()).unwrap();

        assert_eq!(first.iri(), &data("bike-41"));
        assert_eq!(second.iri(), &data("bike-42"));
        assert_eq!(session.dirty_count(), 2);
    }
}

mod journal_ordering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_remove_add_leaves_last_value() {
        // GIVEN [Add(p1), Remove(p1), Add(p2)] on a loaded bike
        let class = bike_class();
        let store = bike_store();
        let mut session = Session::new(store.clone());
        let bike = session.load_from_uri(&class, &data("b2")).unwrap().unwrap();
        session.add(&bike, "fw", wheel("p1")).unwrap();
        session.remove(&bike, "fw", &wheel("p1")).unwrap();
        session.add(&bike, "fw", wheel("p2")).unwrap();

        // WHEN committed
        session.commit().unwrap();

        // THEN p2 is present and p1 absent
        assert!(store.contains(&Triple::new(data("b2"), bk("frontWheel"), data("p2"))));
        assert!(!store.contains(&Triple::new(data("b2"), bk("frontWheel"), data("p1"))));
        assert_eq!(session.pending_changes(), 0);
    }

    #[test]
    fn test_remove_applied_twice_is_noop() {
        // GIVEN the same removal queued twice
        let store = bike_store();
        let removal = ChangeNode::PropertyRemove {
            subject: data("b1"),
            predicate: bk("frontWheel"),
            value: wheel("w1"),
        };
        let mut journal = Journal::new();
        journal.append(removal.clone());
        journal.append(removal);
        let before = store.len();

        // WHEN committed
        journal.commit(store.as_ref()).unwrap();

        // THEN exactly one triple is gone
        assert_eq!(store.len(), before - 1);
        assert!(!store.contains(&Triple::new(data("b1"), bk("frontWheel"), data("w1"))));
    }
}

mod deletion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mutating_deleted_entity_is_refused() {
        // GIVEN a deleted bike
        let class = bike_class();
        let mut session = Session::new(bike_store());
        let bike = session.load_from_uri(&class, &data("b1")).unwrap().unwrap();
        session.delete(&bike).unwrap();
        let pending = session.pending_changes();
        let preview = session.journal().preview();

        // WHEN it is mutated
        let result = session.set(&bike, "mfg", Some(lit("Zed")));

        // THEN the mutation fails and the journal is unchanged
        assert!(matches!(
            result,
            Err(SessionError::MutationOnDeletedEntity { .. })
        ));
        assert_eq!(session.pending_changes(), pending);
        assert_eq!(session.journal().preview(), preview);
    }

    #[test]
    fn test_redirect_delete_merges_entities() {
        // GIVEN a rack holding b1
        let class = bike_class();
        let store = bike_store();
        store.insert(Triple::new(data("rack"), bk("holds"), data("b1")));
        let mut session = Session::new(store.clone());
        let old = session.load_from_uri(&class, &data("b1")).unwrap().unwrap();
        let new = session.load_from_uri(&class, &data("b2")).unwrap().unwrap();

        // WHEN b1 is redirected to b2
        session.redirect_delete(&old, &new).unwrap();
        session.commit().unwrap();

        // THEN the rack holds b2 and b1 has no triples left
        assert!(store.contains(&Triple::new(data("rack"), bk("holds"), data("b2"))));
        assert!(store.triples().iter().all(|t| t.subject != data("b1")));
        assert_eq!(session.load_from_uri(&class, &data("b1")).unwrap(), None);
    }

    #[test]
    fn test_redirect_updates_cached_references() {
        // GIVEN b1 loaded with back wheel w3, and wheels w3 and w5
        let class = bike_class();
        let wheels = wheel_class();
        let store = bike_store();
        store.insert(Triple::new(data("w3"), bk("size"), lit("26")));
        store.insert(Triple::new(data("w5"), bk("size"), lit("28")));
        let mut session = Session::new(store.clone());
        let bike = session.load_from_uri(&class, &data("b1")).unwrap().unwrap();
        let w3 = session.load_from_uri(&wheels, &data("w3")).unwrap().unwrap();
        let w5 = session.load_from_uri(&wheels, &data("w5")).unwrap().unwrap();

        // WHEN w3 is merged into w5
        session.redirect_delete(&w3, &w5).unwrap();
        session.commit().unwrap();

        // THEN the cached bike follows the redirect
        assert_eq!(session.get(&bike, "bw").unwrap(), Slot::Single(Some(wheel("w5"))));

        // AND a later change replaces w5 instead of adding beside it
        session.set(&bike, "bw", Some(wheel("w6"))).unwrap();
        session.commit().unwrap();
        let back: Vec<Triple> = store
            .triples()
            .into_iter()
            .filter(|t| t.subject == data("b1") && t.predicate == bk("backWheel"))
            .collect();
        assert_eq!(back, vec![Triple::new(data("b1"), bk("backWheel"), data("w6"))]);
    }

    #[test]
    fn test_committed_delete_refuses_mutation() {
        let class = bike_class();
        let mut session = Session::new(bike_store());
        let bike = session.load_from_uri(&class, &data("b1")).unwrap().unwrap();
        session.delete(&bike).unwrap();
        session.commit().unwrap();

        let result = session.set(&bike, "mfg", Some(lit("Zed")));

        assert!(matches!(
            result,
            Err(SessionError::MutationOnDeletedEntity { .. })
        ));
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_commit_retries_identical_update() {
        // GIVEN a pending change and a store that is down
        let class = bike_class();
        let store = Arc::new(FlakyStore::new(MemoryStore::with_triples(bike_triples())));
        let mut session = Session::new(store.clone());
        let bike = session.load_from_uri(&class, &data("b1")).unwrap().unwrap();
        session.set(&bike, "bw", None).unwrap();
        let preview = session.journal().preview();
        store.set_failing(true);

        // WHEN the commit fails
        let result = session.commit();

        // THEN everything is kept for a retry
        assert!(matches!(
            result,
            Err(SessionError::Journal(JournalError::CommitFailure(_)))
        ));
        assert_eq!(session.journal().preview(), preview);
        assert!(session.is_dirty(bike.iri()));

        // AND the retry is one more round trip
        store.set_failing(false);
        session.commit().unwrap();
        assert_eq!(store.updates(), 2);
        assert!(!store
            .inner()
            .contains(&Triple::new(data("b1"), bk("backWheel"), data("w3"))));
    }

    #[test]
    fn test_rollback_restores_store_view() {
        let class = bike_class();
        let mut session = Session::new(bike_store());
        let bike = session.load_from_uri(&class, &data("b1")).unwrap().unwrap();
        session.remove(&bike, "fw", &wheel("w1")).unwrap();

        session.rollback().unwrap();

        assert_eq!(
            session.get(&bike, "fw").unwrap(),
            Slot::Many(vec![wheel("w1"), wheel("w2")])
        );
    }
}
