//! Constraint violation reporting.

use std::fmt;
use tracing::warn;
use weft_core::{Iri, Term};

/// What was wrong with loaded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A mandatory property had no value. The entity was skipped.
    MissingValue,
    /// A functional property had several distinct values. The first was kept.
    MultipleValues { values: Vec<Term> },
}

/// A constraint violation observed while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub class: String,
    pub entity: Iri,
    pub property: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingValue => write!(
                f,
                "{} {}: no value for mandatory property '{}'",
                self.class, self.entity, self.property
            ),
            ViolationKind::MultipleValues { values } => write!(
                f,
                "{} {}: {} values for single-valued property '{}'",
                self.class,
                self.entity,
                values.len(),
                self.property
            ),
        }
    }
}

/// Receives violations synchronously.
pub trait ViolationListener: Send {
    fn handle_violation(&self, violation: &Violation);
}

impl<F> ViolationListener for F
where
    F: Fn(&Violation) + Send,
{
    fn handle_violation(&self, violation: &Violation) {
        self(violation)
    }
}

/// Registration handle used to remove a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listeners in registration order.
#[derive(Default)]
pub struct ViolationRegistry {
    listeners: Vec<(ListenerId, Box<dyn ViolationListener>)>,
    next_id: u64,
}

impl ViolationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: impl ViolationListener + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver to every listener in registration order.
    pub fn notify(&self, violation: &Violation) {
        warn!(%violation, "constraint violation");
        for (_, listener) in &self.listeners {
            listener.handle_violation(violation);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ViolationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViolationRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
