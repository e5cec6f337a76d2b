//! Triples and triple patterns.

use crate::{Iri, Term};
use std::fmt;

/// A ground fact: subject, predicate, object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A position in a triple pattern: a variable or a constant term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternTerm {
    /// Variable name without the leading `?`.
    Var(String),
    Term(Term),
}

impl PatternTerm {
    pub fn var(name: impl Into<String>) -> Self {
        PatternTerm::Var(name.into())
    }

    pub fn iri(iri: Iri) -> Self {
        PatternTerm::Term(Term::Iri(iri))
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            PatternTerm::Var(name) => Some(name),
            PatternTerm::Term(_) => None,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            PatternTerm::Term(term) => Some(term),
            PatternTerm::Var(_) => None,
        }
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        self.as_term().and_then(Term::as_iri)
    }

    pub fn is_var(&self) -> bool {
        matches!(self, PatternTerm::Var(_))
    }

    /// Resolve against a binding lookup; `None` if the variable is unbound.
    pub fn resolve<'b, F>(&self, lookup: &F) -> Option<Term>
    where
        F: Fn(&str) -> Option<&'b Term>,
    {
        match self {
            PatternTerm::Var(name) => lookup(name).cloned(),
            PatternTerm::Term(term) => Some(term.clone()),
        }
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Var(name) => write!(f, "?{}", name),
            PatternTerm::Term(term) => write!(f, "{}", term),
        }
    }
}

impl From<Term> for PatternTerm {
    fn from(term: Term) -> Self {
        PatternTerm::Term(term)
    }
}

impl From<Iri> for PatternTerm {
    fn from(iri: Iri) -> Self {
        PatternTerm::Term(Term::Iri(iri))
    }
}

/// A triple whose positions may be variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Variables in subject, predicate, object order (duplicates kept).
    pub fn variables(&self) -> Vec<&str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(PatternTerm::as_var)
            .collect()
    }

    /// Build a ground triple from variable bindings.
    ///
    /// Returns `None` when a variable is unbound, or when the subject or
    /// predicate would be a literal.
    pub fn instantiate<'b, F>(&self, lookup: &F) -> Option<Triple>
    where
        F: Fn(&str) -> Option<&'b Term>,
    {
        let subject = self.subject.resolve(lookup)?;
        let predicate = self.predicate.resolve(lookup)?;
        let object = self.object.resolve(lookup)?;
        match (subject, predicate) {
            (Term::Iri(subject), Term::Iri(predicate)) => Some(Triple {
                subject,
                predicate,
                object,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl From<Triple> for TriplePattern {
    fn from(triple: Triple) -> Self {
        Self {
            subject: triple.subject.into(),
            predicate: triple.predicate.into(),
            object: triple.object.into(),
        }
    }
}
