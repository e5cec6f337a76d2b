//! Update IR.
//!
//! An `UpdateRequest` is the unit submitted to a graph store: an ordered list
//! of operations executed in sequence, later operations observing the effects
//! of earlier ones.

use crate::{Triple, TriplePattern};
use std::fmt;

/// One graph update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOp {
    /// Insert ground triples.
    InsertData(Vec<Triple>),
    /// Delete ground triples. Missing triples are ignored.
    DeleteData(Vec<Triple>),
    /// Delete every instantiation of the patterns matched against the graph.
    DeleteWhere(Vec<TriplePattern>),
    /// For every solution of `pattern`, delete then insert the instantiated
    /// templates.
    Modify {
        delete: Vec<TriplePattern>,
        insert: Vec<TriplePattern>,
        pattern: Vec<TriplePattern>,
    },
}

impl UpdateOp {
    /// Returns the operation name as used in SPARQL Update.
    pub fn name(&self) -> &'static str {
        match self {
            UpdateOp::InsertData(_) => "INSERT DATA",
            UpdateOp::DeleteData(_) => "DELETE DATA",
            UpdateOp::DeleteWhere(_) => "DELETE WHERE",
            UpdateOp::Modify { .. } => "DELETE/INSERT",
        }
    }
}

fn write_block<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "{{")?;
    for item in items {
        write!(f, " {}", item)?;
    }
    write!(f, " }}")
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOp::InsertData(triples) => {
                write!(f, "INSERT DATA ")?;
                write_block(f, triples)
            }
            UpdateOp::DeleteData(triples) => {
                write!(f, "DELETE DATA ")?;
                write_block(f, triples)
            }
            UpdateOp::DeleteWhere(patterns) => {
                write!(f, "DELETE WHERE ")?;
                write_block(f, patterns)
            }
            UpdateOp::Modify {
                delete,
                insert,
                pattern,
            } => {
                if !delete.is_empty() {
                    write!(f, "DELETE ")?;
                    write_block(f, delete)?;
                    write!(f, " ")?;
                }
                if !insert.is_empty() {
                    write!(f, "INSERT ")?;
                    write_block(f, insert)?;
                    write!(f, " ")?;
                }
                write!(f, "WHERE ")?;
                write_block(f, pattern)
            }
        }
    }
}

/// An ordered sequence of update operations submitted as one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    ops: Vec<UpdateOp>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: UpdateOp) {
        self.ops.push(op);
    }

    /// Append all operations of `other`, preserving order.
    pub fn extend(&mut self, other: UpdateRequest) {
        self.ops.extend(other.ops);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpdateOp> {
        self.ops.iter()
    }

    pub fn into_ops(self) -> Vec<UpdateOp> {
        self.ops
    }
}

impl From<Vec<UpdateOp>> for UpdateRequest {
    fn from(ops: Vec<UpdateOp>) -> Self {
        Self { ops }
    }
}

impl From<UpdateOp> for UpdateRequest {
    fn from(op: UpdateOp) -> Self {
        Self { ops: vec![op] }
    }
}

impl IntoIterator for UpdateRequest {
    type Item = UpdateOp;
    type IntoIter = std::vec::IntoIter<UpdateOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl fmt::Display for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ;\n")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}
