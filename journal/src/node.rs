//! Change node types.

use std::fmt;
use weft_core::{Iri, PatternTerm, Term, Triple, TriplePattern, UpdateOp, UpdateRequest};

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeNode {
    /// Insert one value.
    PropertyAdd {
        subject: Iri,
        predicate: Iri,
        value: Term,
    },

    /// Delete one value by exact match.
    PropertyRemove {
        subject: Iri,
        predicate: Iri,
        value: Term,
    },

    /// Replace `old` with `new`.
    PropertyChange {
        subject: Iri,
        predicate: Iri,
        old: Term,
        new: Term,
    },

    /// Insert a new entity from a bound creation template.
    CreateEntity { iri: Iri, update: UpdateRequest },

    /// Delete every triple mentioning `iri`.
    DeleteEntity { iri: Iri },

    /// Repoint references from `old` to `new`, then delete `old`.
    RedirectDelete { old: Iri, new: Iri },
}

impl ChangeNode {
    /// Node kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeNode::PropertyAdd { .. } => "PropertyAdd",
            ChangeNode::PropertyRemove { .. } => "PropertyRemove",
            ChangeNode::PropertyChange { .. } => "PropertyChange",
            ChangeNode::CreateEntity { .. } => "CreateEntity",
            ChangeNode::DeleteEntity { .. } => "DeleteEntity",
            ChangeNode::RedirectDelete { .. } => "RedirectDelete",
        }
    }

    /// The entity this node writes to.
    pub fn entity(&self) -> &Iri {
        match self {
            ChangeNode::PropertyAdd { subject, .. }
            | ChangeNode::PropertyRemove { subject, .. }
            | ChangeNode::PropertyChange { subject, .. } => subject,
            ChangeNode::CreateEntity { iri, .. } | ChangeNode::DeleteEntity { iri } => iri,
            ChangeNode::RedirectDelete { old, .. } => old,
        }
    }

    /// Append this node's update operations to `request`.
    pub fn materialize_into(&self, request: &mut UpdateRequest) {
        match self {
            ChangeNode::PropertyAdd {
                subject,
                predicate,
                value,
            } => request.push(UpdateOp::InsertData(vec![Triple::new(
                subject.clone(),
                predicate.clone(),
                value.clone(),
            )])),
            ChangeNode::PropertyRemove {
                subject,
                predicate,
                value,
            } => request.push(UpdateOp::DeleteData(vec![Triple::new(
                subject.clone(),
                predicate.clone(),
                value.clone(),
            )])),
            ChangeNode::PropertyChange {
                subject,
                predicate,
                old,
                new,
            } => {
                request.push(UpdateOp::DeleteWhere(vec![TriplePattern::new(
                    subject.clone(),
                    predicate.clone(),
                    old.clone(),
                )]));
                request.push(UpdateOp::InsertData(vec![Triple::new(
                    subject.clone(),
                    predicate.clone(),
                    new.clone(),
                )]));
            }
            ChangeNode::CreateEntity { update, .. } => request.extend(update.clone()),
            ChangeNode::DeleteEntity { iri } => {
                request.push(UpdateOp::DeleteWhere(vec![TriplePattern::new(
                    iri.clone(),
                    var("p"),
                    var("o"),
                )]));
                request.push(UpdateOp::DeleteWhere(vec![TriplePattern::new(
                    var("s"),
                    var("p"),
                    iri.clone(),
                )]));
            }
            ChangeNode::RedirectDelete { old, new } => {
                let incoming = TriplePattern::new(var("s"), var("p"), old.clone());
                request.push(UpdateOp::Modify {
                    delete: vec![incoming.clone()],
                    insert: vec![TriplePattern::new(var("s"), var("p"), new.clone())],
                    pattern: vec![incoming],
                });
                request.push(UpdateOp::DeleteWhere(vec![TriplePattern::new(
                    old.clone(),
                    var("p"),
                    var("x"),
                )]));
            }
        }
    }

    /// This node's update operations on their own.
    pub fn materialize(&self) -> UpdateRequest {
        let mut request = UpdateRequest::new();
        self.materialize_into(&mut request);
        request
    }
}

fn var(name: &str) -> PatternTerm {
    PatternTerm::var(name)
}

impl fmt::Display for ChangeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeNode::PropertyAdd {
                subject,
                predicate,
                value,
            } => write!(f, "PropertyAdd({} {} {})", subject, predicate, value),
            ChangeNode::PropertyRemove {
                subject,
                predicate,
                value,
            } => write!(f, "PropertyRemove({} {} {})", subject, predicate, value),
            ChangeNode::PropertyChange {
                subject,
                predicate,
                old,
                new,
            } => write!(
                f,
                "PropertyChange({} {} {} -> {})",
                subject, predicate, old, new
            ),
            ChangeNode::CreateEntity { iri, update } => {
                write!(f, "CreateEntity({}, {} ops)", iri, update.len())
            }
            ChangeNode::DeleteEntity { iri } => write!(f, "DeleteEntity({})", iri),
            ChangeNode::RedirectDelete { old, new } => {
                write!(f, "RedirectDelete({} -> {})", old, new)
            }
        }
    }
}
