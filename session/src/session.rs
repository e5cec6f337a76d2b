//! The unit of work.
//!
//! A `Session` owns everything mutable about a client's view of the store:
//! the entity cache and dirty set, the journal of pending writes, the fresh
//! identifier source and the violation listeners. Mutators take `&mut self`,
//! so one session has exactly one writer.

use crate::cache::EntityCache;
use crate::class::{EntityClass, PropertyDescriptor};
use crate::config::SessionConfig;
use crate::entity::{Entity, EntityHandle, EntityInit, PropertyValue, Slot};
use crate::fresh::{FreshIdGenerator, UuidSuffixes};
use crate::violation::{ListenerId, Violation, ViolationKind, ViolationListener, ViolationRegistry};
use crate::{SessionError, SessionResult};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};
use weft_core::{Iri, Term, UpdateRequest};
use weft_journal::{ChangeNode, CommitOutcome, Journal};
use weft_parser::{parse_expr, SelectQuery};
use weft_store::{GraphStore, Solution};
use weft_synthesizer::{TemplateBindings, VALUE_PARAM};

pub struct Session {
    store: Arc<dyn GraphStore>,
    config: SessionConfig,
    cache: EntityCache,
    journal: Journal,
    fresh_ids: Arc<dyn FreshIdGenerator>,
    violations: ViolationRegistry,
}

impl Session {
    /// Create a session with the default configuration.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    pub fn with_config(store: Arc<dyn GraphStore>, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            cache: EntityCache::new(config.cache_capacity),
            journal: Journal::new(),
            fresh_ids: Arc::new(UuidSuffixes),
            violations: ViolationRegistry::new(),
        }
    }

    /// Replace the fresh identifier source.
    pub fn with_fresh_ids(mut self, fresh_ids: impl FreshIdGenerator + 'static) -> Self {
        self.fresh_ids = Arc::new(fresh_ids);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    // ==================== LOADING ====================

    /// Load every entity the class query returns.
    pub fn load_all(&mut self, class: &Arc<EntityClass>) -> SessionResult<Vec<EntityHandle>> {
        let query = class.query().clone();
        self.load(class, &query)
    }

    /// Load the entities matching an extra filter expression. The filter may
    /// use the class query's prefixes and variables.
    pub fn load_selected(
        &mut self,
        class: &Arc<EntityClass>,
        filter: &str,
    ) -> SessionResult<Vec<EntityHandle>> {
        let expr = parse_expr(filter, &class.query().prefix_map())?;
        let query = class.query().clone().with_filter(expr);
        self.load(class, &query)
    }

    /// Load one entity, answering from the cache when possible.
    pub fn load_from_uri(
        &mut self,
        class: &Arc<EntityClass>,
        iri: &Iri,
    ) -> SessionResult<Option<EntityHandle>> {
        if self.cache.contains(iri) {
            return Ok(Some(EntityHandle::new(iri.clone(), Arc::clone(class))));
        }
        let query = class.query().bind(class.anchor(), &Term::Iri(iri.clone()));
        Ok(self.load(class, &query)?.into_iter().next())
    }

    fn load(
        &mut self,
        class: &Arc<EntityClass>,
        query: &SelectQuery,
    ) -> SessionResult<Vec<EntityHandle>> {
        let rows = self.store.execute_query(query)?;

        let mut order = Vec::new();
        let mut groups: HashMap<Iri, Vec<Solution>> = HashMap::new();
        for row in rows {
            let Some(anchor) = row.get(class.anchor()).and_then(Term::as_iri).cloned() else {
                continue;
            };
            groups
                .entry(anchor.clone())
                .or_insert_with(|| {
                    order.push(anchor);
                    Vec::new()
                })
                .push(row);
        }

        let mut handles = Vec::with_capacity(order.len());
        for iri in order {
            let rows = groups.remove(&iri).unwrap_or_default();
            if let Some(entity) = self.assemble(class, iri, &rows) {
                handles.push(entity.handle());
                self.cache.insert_clean(entity);
            }
        }
        debug!(class = class.name(), loaded = handles.len(), "loaded entities");
        Ok(handles)
    }

    /// Build one entity from its rows. Returns `None` when a mandatory value
    /// is missing.
    fn assemble(&self, class: &Arc<EntityClass>, iri: Iri, rows: &[Solution]) -> Option<Entity> {
        let mut slots = BTreeMap::new();
        let mut complete = true;
        for descriptor in class.descriptors() {
            let mut values: Vec<Term> = Vec::new();
            for value in rows.iter().filter_map(|row| row.get(&descriptor.variable)) {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }

            let slot = if descriptor.is_functional() {
                if values.is_empty() && !descriptor.nullable {
                    self.report(class, &iri, descriptor, ViolationKind::MissingValue);
                    complete = false;
                } else if values.len() > 1 {
                    let kind = ViolationKind::MultipleValues {
                        values: values.clone(),
                    };
                    self.report(class, &iri, descriptor, kind);
                }
                Slot::Single(values.into_iter().next())
            } else {
                Slot::Many(values)
            };
            slots.insert(descriptor.name.clone(), slot);
        }
        complete.then(|| Entity::new(iri, Arc::clone(class), slots))
    }

    fn report(
        &self,
        class: &EntityClass,
        iri: &Iri,
        descriptor: &PropertyDescriptor,
        kind: ViolationKind,
    ) {
        self.violations.notify(&Violation {
            class: class.name().to_string(),
            entity: iri.clone(),
            property: descriptor.name.clone(),
            kind,
        });
    }

    /// Bring an evicted entity back from the store.
    fn ensure_loaded(&mut self, handle: &EntityHandle) -> SessionResult<()> {
        if self.cache.contains(handle.iri()) {
            return Ok(());
        }
        if self.cache.is_deleted(handle.iri()) {
            return Err(SessionError::entity_not_found(handle.iri()));
        }
        trace!(entity = %handle, "reloading entity");
        match self.load_from_uri(handle.class(), handle.iri())? {
            Some(_) => Ok(()),
            None => Err(SessionError::entity_not_found(handle.iri())),
        }
    }

    /// The cached entity behind `handle`, refusing deleted ones whether or
    /// not their deletion has been committed.
    fn live(&mut self, handle: &EntityHandle) -> SessionResult<&mut Entity> {
        if self.cache.is_deleted(handle.iri()) {
            return Err(SessionError::mutation_on_deleted_entity(handle.iri()));
        }
        self.ensure_loaded(handle)?;
        self.cache
            .get_mut(handle.iri())
            .ok_or_else(|| SessionError::entity_not_found(handle.iri()))
    }

    // ==================== READING ====================

    pub fn entity(&mut self, handle: &EntityHandle) -> SessionResult<&Entity> {
        self.ensure_loaded(handle)?;
        self.cache
            .get(handle.iri())
            .ok_or_else(|| SessionError::entity_not_found(handle.iri()))
    }

    /// Current local value of `property`.
    pub fn get(&mut self, handle: &EntityHandle, property: &str) -> SessionResult<PropertyValue> {
        let class = Arc::clone(handle.class());
        class.descriptor(property)?;
        self.entity(handle)?
            .slot(property)
            .cloned()
            .ok_or_else(|| SessionError::unknown_property(class.name(), property))
    }

    // ==================== MUTATION ====================

    /// Assign a functional property. `None` clears a nullable one.
    pub fn set(
        &mut self,
        handle: &EntityHandle,
        property: &str,
        value: Option<Term>,
    ) -> SessionResult<()> {
        let class = Arc::clone(handle.class());
        let descriptor = class.descriptor(property)?;
        descriptor.expect_functional()?;
        match &value {
            Some(v) => descriptor.check_kind(v)?,
            None if !descriptor.nullable => return Err(SessionError::null_assignment(property)),
            None => {}
        }
        let predicate = descriptor.writable_predicate()?.clone();

        let entity = self.live(handle)?;
        let current = entity.slot(property).and_then(Slot::value).cloned();
        if current == value {
            return Ok(());
        }

        let subject = handle.iri().clone();
        let node = match (current, value.clone()) {
            (Some(old), Some(new)) => ChangeNode::PropertyChange {
                subject,
                predicate,
                old,
                new,
            },
            (None, Some(value)) => ChangeNode::PropertyAdd {
                subject,
                predicate,
                value,
            },
            (Some(value), None) => ChangeNode::PropertyRemove {
                subject,
                predicate,
                value,
            },
            (None, None) => return Ok(()),
        };
        entity.slots.insert(property.to_string(), Slot::Single(value));

        self.journal.append(node);
        self.cache.mark_dirty(handle.iri());
        Ok(())
    }

    /// Add a value to a multi-valued property. Adding a present value is a
    /// no-op.
    pub fn add(&mut self, handle: &EntityHandle, property: &str, value: Term) -> SessionResult<()> {
        let class = Arc::clone(handle.class());
        let descriptor = class.descriptor(property)?;
        descriptor.expect_multi()?;
        descriptor.check_kind(&value)?;
        let predicate = descriptor.writable_predicate()?.clone();

        let values = multi_slot(self.live(handle)?, &class, property)?;
        if values.contains(&value) {
            return Ok(());
        }
        values.push(value.clone());

        self.journal.append(ChangeNode::PropertyAdd {
            subject: handle.iri().clone(),
            predicate,
            value,
        });
        self.cache.mark_dirty(handle.iri());
        Ok(())
    }

    /// Remove a value from a multi-valued property. Removing an absent value
    /// is a no-op.
    pub fn remove(
        &mut self,
        handle: &EntityHandle,
        property: &str,
        value: &Term,
    ) -> SessionResult<()> {
        let class = Arc::clone(handle.class());
        let descriptor = class.descriptor(property)?;
        descriptor.expect_multi()?;
        descriptor.check_kind(value)?;
        let predicate = descriptor.writable_predicate()?.clone();

        let values = multi_slot(self.live(handle)?, &class, property)?;
        let Some(position) = values.iter().position(|v| v == value) else {
            return Ok(());
        };
        values.remove(position);

        self.journal.append(ChangeNode::PropertyRemove {
            subject: handle.iri().clone(),
            predicate,
            value: value.clone(),
        });
        self.cache.mark_dirty(handle.iri());
        Ok(())
    }

    /// Delete the entity and every triple mentioning it.
    pub fn delete(&mut self, handle: &EntityHandle) -> SessionResult<()> {
        self.live(handle)?.deleted = true;

        self.journal.append(ChangeNode::DeleteEntity {
            iri: handle.iri().clone(),
        });
        self.cache.mark_dirty(handle.iri());
        Ok(())
    }

    /// Repoint every reference to `old` at `new`, then delete `old`. Both
    /// must be live.
    pub fn redirect_delete(&mut self, old: &EntityHandle, new: &EntityHandle) -> SessionResult<()> {
        self.live(new)?;
        self.live(old)?.deleted = true;

        self.journal.append(ChangeNode::RedirectDelete {
            old: old.iri().clone(),
            new: new.iri().clone(),
        });
        self.cache.mark_dirty(old.iri());
        Ok(())
    }

    /// Create a new entity. Every mandatory property needs a value in
    /// `init`; optional and multi-valued ones are written when present.
    pub fn create(
        &mut self,
        class: &Arc<EntityClass>,
        init: EntityInit,
    ) -> SessionResult<EntityHandle> {
        for property in init.properties() {
            class.descriptor(property)?;
        }

        let suffix = self.fresh_ids.fresh_suffix_for(class.anchor());
        let iri = Iri::new(format!("{}{}-{}", class.namespace(), class.anchor(), suffix))?;

        let mut bindings = TemplateBindings::new(iri.clone());
        let mut initializers = UpdateRequest::new();
        let mut slots = BTreeMap::new();
        for descriptor in class.descriptors() {
            let name = descriptor.name.as_str();
            let mut values: Vec<Term> = Vec::new();
            for value in init.get(name) {
                descriptor.check_kind(value)?;
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }

            if descriptor.is_functional() && values.len() > 1 {
                return Err(SessionError::wrong_multiplicity(name, "multi-valued"));
            }
            if descriptor.is_mandatory() {
                let value = values
                    .first()
                    .cloned()
                    .ok_or_else(|| SessionError::missing_value(name))?;
                bindings.insert(descriptor.variable.clone(), value);
            } else if !values.is_empty() {
                let template = class.initializer(name)?;
                for value in &values {
                    let bound = TemplateBindings::new(iri.clone()).with(VALUE_PARAM, value.clone());
                    initializers.extend(template.bind(&bound)?);
                }
            }

            let slot = if descriptor.is_functional() {
                Slot::Single(values.into_iter().next())
            } else {
                Slot::Many(values)
            };
            slots.insert(name.to_string(), slot);
        }

        let mut update = class.creation_template().bind(&bindings)?;
        update.extend(initializers);

        debug!(class = class.name(), iri = %iri, "creating entity");
        self.journal.append(ChangeNode::CreateEntity {
            iri: iri.clone(),
            update,
        });
        let entity = Entity::new(iri, Arc::clone(class), slots);
        let handle = entity.handle();
        self.cache.insert_dirty(entity);
        Ok(handle)
    }

    // ==================== LIFECYCLE ====================

    /// Flush the journal in one round trip. On failure the journal and the
    /// dirty set are kept for a retry.
    ///
    /// On success, cached references to deleted entities are dropped and
    /// references to redirected ones follow the redirect, so later writes
    /// start from what the store holds.
    pub fn commit(&mut self) -> SessionResult<CommitOutcome> {
        let snapshot = self.cache.dirty_iris();
        let rewrites: Vec<(Iri, Option<Iri>)> =
            self.journal.iter().filter_map(reference_rewrite).collect();
        let outcome = self.journal.commit(self.store.as_ref())?;
        self.cache.mark_committed(&snapshot);
        for (old, new) in &rewrites {
            let changed = self.cache.retarget(old, new.as_ref());
            if changed > 0 {
                debug!(old = %old, changed, "rewrote cached references");
            }
        }
        Ok(outcome)
    }

    /// Discard pending changes and every dirty entity. Returns the number of
    /// discarded change nodes.
    pub fn rollback(&mut self) -> SessionResult<usize> {
        let discarded = self.journal.len();
        self.journal.clear()?;
        let dropped = self.cache.drop_dirty();
        info!(discarded, dropped, "rolled back");
        Ok(discarded)
    }

    /// Pin a cached entity so it cannot be evicted.
    pub fn mark_dirty(&mut self, iri: &Iri) {
        self.cache.mark_dirty(iri);
    }

    /// Unpin entities whose changes reached the store.
    pub fn mark_committed(&mut self, iris: &[Iri]) {
        self.cache.mark_committed(iris);
    }

    // ==================== INTROSPECTION ====================

    pub fn is_dirty(&self, iri: &Iri) -> bool {
        self.cache.is_dirty(iri)
    }

    pub fn dirty_count(&self) -> usize {
        self.cache.dirty_count()
    }

    /// Change nodes waiting for the next commit.
    pub fn pending_changes(&self) -> usize {
        self.journal.len()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.cached_count()
    }

    // ==================== LISTENERS ====================

    pub fn add_violation_listener(
        &mut self,
        listener: impl ViolationListener + 'static,
    ) -> ListenerId {
        self.violations.add(listener)
    }

    pub fn remove_violation_listener(&mut self, id: ListenerId) -> bool {
        self.violations.remove(id)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("cached", &self.cache.cached_count())
            .field("dirty", &self.cache.dirty_count())
            .field("pending", &self.journal.len())
            .field("violations", &self.violations)
            .finish()
    }
}

/// How a committed node changes references held by other entities.
fn reference_rewrite(node: &ChangeNode) -> Option<(Iri, Option<Iri>)> {
    match node {
        ChangeNode::DeleteEntity { iri } => Some((iri.clone(), None)),
        ChangeNode::RedirectDelete { old, new } => Some((old.clone(), Some(new.clone()))),
        _ => None,
    }
}

fn multi_slot<'e>(
    entity: &'e mut Entity,
    class: &EntityClass,
    property: &str,
) -> SessionResult<&'e mut Vec<Term>> {
    match entity.slots.get_mut(property) {
        Some(Slot::Many(values)) => Ok(values),
        _ => Err(SessionError::unknown_property(class.name(), property)),
    }
}
