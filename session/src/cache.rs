//! Entity cache with a pinned dirty set.
//!
//! Clean entities live in a bounded LRU and may be evicted at any time; they
//! can be reloaded from the store. Dirty entities hold local state the store
//! does not have yet, so they are kept in a separate map that is never
//! evicted until the commit that flushes them succeeds. Entities whose
//! deletion was committed stay known as deleted for the rest of the session.

use crate::entity::Entity;
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use tracing::trace;
use weft_core::Iri;

#[derive(Debug)]
pub struct EntityCache {
    clean: LruCache<Iri, Entity>,
    dirty: HashMap<Iri, Entity>,
    tombstones: HashSet<Iri>,
}

impl EntityCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            clean: LruCache::new(capacity),
            dirty: HashMap::new(),
            tombstones: HashSet::new(),
        }
    }

    pub fn contains(&self, iri: &Iri) -> bool {
        self.dirty.contains_key(iri) || self.clean.contains(iri)
    }

    pub fn get(&mut self, iri: &Iri) -> Option<&Entity> {
        if let Some(entity) = self.dirty.get(iri) {
            return Some(entity);
        }
        self.clean.get(iri)
    }

    pub fn get_mut(&mut self, iri: &Iri) -> Option<&mut Entity> {
        if let Some(entity) = self.dirty.get_mut(iri) {
            return Some(entity);
        }
        self.clean.get_mut(iri)
    }

    /// Cache a freshly loaded entity. A dirty entity with the same IRI keeps
    /// its local state.
    pub fn insert_clean(&mut self, entity: Entity) {
        if self.dirty.contains_key(&entity.iri) {
            return;
        }
        let iri = entity.iri.clone();
        if let Some((evicted, _)) = self.clean.push(iri.clone(), entity) {
            if evicted != iri {
                trace!(iri = %evicted, "evicted clean entity");
            }
        }
    }

    pub fn insert_dirty(&mut self, entity: Entity) {
        self.clean.pop(&entity.iri);
        self.dirty.insert(entity.iri.clone(), entity);
    }

    /// Pin a cached entity. No-op if it is not cached or already dirty.
    pub fn mark_dirty(&mut self, iri: &Iri) {
        if self.dirty.contains_key(iri) {
            return;
        }
        if let Some(entity) = self.clean.pop(iri) {
            self.dirty.insert(iri.clone(), entity);
        }
    }

    /// Unpin committed entities into the LRU. Deleted entities leave the
    /// cache and are remembered as deleted.
    pub fn mark_committed(&mut self, iris: &[Iri]) {
        for iri in iris {
            if let Some(entity) = self.dirty.remove(iri) {
                if entity.deleted {
                    self.tombstones.insert(entity.iri);
                } else {
                    self.insert_clean(entity);
                }
            }
        }
    }

    /// True if a pending or committed delete covers `iri`.
    pub fn is_deleted(&self, iri: &Iri) -> bool {
        self.tombstones.contains(iri) || self.dirty.get(iri).map_or(false, |e| e.deleted)
    }

    /// Point cached references to `old` at `new`, or drop them when `new` is
    /// `None`. Returns the number of slots changed.
    pub fn retarget(&mut self, old: &Iri, new: Option<&Iri>) -> usize {
        let mut changed = 0;
        let entities = self
            .clean
            .iter_mut()
            .map(|(_, e)| e)
            .chain(self.dirty.values_mut());
        for entity in entities {
            for slot in entity.slots.values_mut() {
                if slot.retarget(old, new) {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Discard every dirty entity. Returns how many were dropped.
    pub fn drop_dirty(&mut self) -> usize {
        let count = self.dirty.len();
        self.dirty.clear();
        count
    }

    pub fn dirty_iris(&self) -> Vec<Iri> {
        self.dirty.keys().cloned().collect()
    }

    pub fn is_dirty(&self, iri: &Iri) -> bool {
        self.dirty.contains_key(iri)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Clean and dirty entities together.
    pub fn cached_count(&self) -> usize {
        self.clean.len() + self.dirty.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::EntityClass;
    use crate::entity::Slot;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use weft_core::Term;
    use weft_registry::Vocabulary;

    fn class() -> Arc<EntityClass> {
        EntityClass::new(
            "Item",
            "SELECT ?item ?label WHERE { ?item <http://x/label> ?label . }",
            "item",
            "http://x/",
            &Vocabulary::empty(),
        )
        .unwrap()
    }

    fn entity(class: &Arc<EntityClass>, n: u32) -> Entity {
        Entity::new(iri(n), Arc::clone(class), BTreeMap::new())
    }

    fn iri(n: u32) -> Iri {
        Iri::new(format!("http://x/item-{}", n)).unwrap()
    }

    #[test]
    fn test_dirty_entities_are_never_evicted() {
        // GIVEN a cache holding two clean entities
        let class = class();
        let mut cache = EntityCache::new(NonZeroUsize::new(2).unwrap());
        cache.insert_clean(entity(&class, 1));
        cache.insert_clean(entity(&class, 2));

        // WHEN one is pinned and more entities are loaded
        cache.mark_dirty(&iri(1));
        for n in 3..10 {
            cache.insert_clean(entity(&class, n));
        }

        // THEN the pinned one survives and the clean side stays bounded
        assert!(cache.is_dirty(&iri(1)));
        assert!(cache.get(&iri(1)).is_some());
        assert!(!cache.contains(&iri(2)));
        assert_eq!(cache.cached_count(), 3);
    }

    #[test]
    fn test_mark_committed_unpins() {
        let class = class();
        let mut cache = EntityCache::new(NonZeroUsize::new(4).unwrap());
        cache.insert_dirty(entity(&class, 1));
        let mut gone = entity(&class, 2);
        gone.deleted = true;
        cache.insert_dirty(gone);

        let committed = cache.dirty_iris();
        cache.mark_committed(&committed);

        assert_eq!(cache.dirty_count(), 0);
        assert!(cache.contains(&iri(1)));
        assert!(!cache.contains(&iri(2)));
        assert!(cache.is_deleted(&iri(2)));
        assert!(!cache.is_deleted(&iri(1)));
    }

    #[test]
    fn test_retarget_rewrites_references() {
        // GIVEN a clean entity referring to item-9 and a dirty one holding it
        // in a set next to item-8
        let class = class();
        let mut cache = EntityCache::new(NonZeroUsize::new(4).unwrap());
        let single = Slot::Single(Some(Term::Iri(iri(9))));
        let many = Slot::Many(vec![Term::Iri(iri(9)), Term::Iri(iri(8))]);
        cache.insert_clean(Entity::new(
            iri(1),
            Arc::clone(&class),
            BTreeMap::from([("ref".to_string(), single)]),
        ));
        cache.insert_dirty(Entity::new(
            iri(2),
            Arc::clone(&class),
            BTreeMap::from([("refs".to_string(), many)]),
        ));

        // WHEN item-9 is merged into item-8
        let changed = cache.retarget(&iri(9), Some(&iri(8)));

        // THEN the single reference moves and the set does not duplicate
        assert_eq!(changed, 2);
        assert_eq!(
            cache.get(&iri(1)).unwrap().slot("ref"),
            Some(&Slot::Single(Some(Term::Iri(iri(8)))))
        );
        assert_eq!(
            cache.get(&iri(2)).unwrap().slot("refs"),
            Some(&Slot::Many(vec![Term::Iri(iri(8))]))
        );

        // AND dropping item-8 clears both
        cache.retarget(&iri(8), None);
        assert_eq!(cache.get(&iri(1)).unwrap().slot("ref"), Some(&Slot::Single(None)));
        assert_eq!(cache.get(&iri(2)).unwrap().slot("refs"), Some(&Slot::Many(vec![])));
    }

    #[test]
    fn test_reload_does_not_clobber_dirty_state() {
        let class = class();
        let mut cache = EntityCache::new(NonZeroUsize::new(4).unwrap());
        let mut local = entity(&class, 1);
        local.deleted = true;
        cache.insert_dirty(local);

        cache.insert_clean(entity(&class, 1));

        assert!(cache.get(&iri(1)).unwrap().is_deleted());
        assert_eq!(cache.drop_dirty(), 1);
        assert!(!cache.contains(&iri(1)));
    }
}
