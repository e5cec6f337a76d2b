//! Entity state and handles.

use crate::class::EntityClass;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use weft_core::{Iri, Term};

/// Local value of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Functional property.
    Single(Option<Term>),
    /// Multi-valued property. Distinct values in insertion order.
    Many(Vec<Term>),
}

/// Value returned by property reads.
pub type PropertyValue = Slot;

impl Slot {
    /// The value of a functional slot.
    pub fn value(&self) -> Option<&Term> {
        match self {
            Slot::Single(value) => value.as_ref(),
            Slot::Many(_) => None,
        }
    }

    pub fn values(&self) -> &[Term] {
        match self {
            Slot::Single(value) => value.as_slice(),
            Slot::Many(values) => values,
        }
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.values().contains(term)
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Replace a reference to `old` with `new`, or drop it when `new` is
    /// `None`. Returns whether the slot changed.
    pub(crate) fn retarget(&mut self, old: &Iri, new: Option<&Iri>) -> bool {
        let old = Term::Iri(old.clone());
        let new = new.map(|iri| Term::Iri(iri.clone()));
        match self {
            Slot::Single(value) => {
                if value.as_ref() != Some(&old) {
                    return false;
                }
                *value = new;
                true
            }
            Slot::Many(values) => {
                let Some(position) = values.iter().position(|v| *v == old) else {
                    return false;
                };
                match new {
                    Some(new) if !values.contains(&new) => values[position] = new,
                    _ => {
                        values.remove(position);
                    }
                }
                true
            }
        }
    }
}

/// A mutation-tracked instance of an entity class.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) iri: Iri,
    pub(crate) class: Arc<EntityClass>,
    pub(crate) slots: BTreeMap<String, Slot>,
    pub(crate) deleted: bool,
}

impl Entity {
    pub(crate) fn new(iri: Iri, class: Arc<EntityClass>, slots: BTreeMap<String, Slot>) -> Self {
        Self {
            iri,
            class,
            slots,
            deleted: false,
        }
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    pub fn class(&self) -> &Arc<EntityClass> {
        &self.class
    }

    pub fn slot(&self, property: &str) -> Option<&Slot> {
        self.slots.get(property)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn handle(&self) -> EntityHandle {
        EntityHandle::new(self.iri.clone(), Arc::clone(&self.class))
    }
}

/// A lightweight reference to an entity in a session.
///
/// Handles outlive cache eviction: the session reloads the entity on the
/// next access.
#[derive(Debug, Clone)]
pub struct EntityHandle {
    iri: Iri,
    class: Arc<EntityClass>,
}

impl EntityHandle {
    pub fn new(iri: Iri, class: Arc<EntityClass>) -> Self {
        Self { iri, class }
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    pub fn class(&self) -> &Arc<EntityClass> {
        &self.class
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri && Arc::ptr_eq(&self.class, &other.class)
    }
}

impl Eq for EntityHandle {}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.class.name(), self.iri)
    }
}

/// Property values for `Session::create`.
#[derive(Debug, Clone, Default)]
pub struct EntityInit {
    values: BTreeMap<String, Vec<Term>>,
}

impl EntityInit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. Repeating a multi-valued property adds more values.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Term>) -> Self {
        self.values
            .entry(property.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn get(&self, property: &str) -> &[Term] {
        self.values.get(property).map_or(&[], Vec::as_slice)
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
