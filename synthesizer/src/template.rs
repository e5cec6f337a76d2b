//! Parameterized update templates.
//!
//! A template is a pure artifact: its slots are filled with `Term` values at
//! bind time, so entity content never becomes part of the update structure.

use crate::{SynthError, SynthResult};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use weft_core::{Iri, Term, Triple, UpdateOp, UpdateRequest};

/// Slot name used by initializer templates.
pub const VALUE_PARAM: &str = "value";

/// A position in a template triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateTerm {
    /// The entity being written.
    Anchor,
    /// A named slot filled at bind time.
    Param(String),
    Iri(Iri),
}

impl fmt::Display for TemplateTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateTerm::Anchor => write!(f, "$anchor"),
            TemplateTerm::Param(name) => write!(f, "${}", name),
            TemplateTerm::Iri(iri) => write!(f, "{}", iri),
        }
    }
}

/// A triple whose subject is always the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTriple {
    pub predicate: Iri,
    pub object: TemplateTerm,
}

impl fmt::Display for TemplateTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", TemplateTerm::Anchor, self.predicate, self.object)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOp {
    InsertData(Vec<TemplateTriple>),
}

/// Values for one bind of a template.
#[derive(Debug, Clone)]
pub struct TemplateBindings {
    pub anchor: Iri,
    pub params: HashMap<String, Term>,
}

impl TemplateBindings {
    pub fn new(anchor: Iri) -> Self {
        Self {
            anchor,
            params: HashMap::new(),
        }
    }

    /// Add a parameter value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Term>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Term>) {
        self.params.insert(name.into(), value.into());
    }
}

/// A named update template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTemplate {
    pub name: String,
    pub ops: Vec<TemplateOp>,
}

impl UpdateTemplate {
    pub fn new(name: impl Into<String>, ops: Vec<TemplateOp>) -> Self {
        Self {
            name: name.into(),
            ops,
        }
    }

    /// Names of every slot, sorted.
    pub fn params(&self) -> BTreeSet<&str> {
        self.triples()
            .filter_map(|t| match &t.object {
                TemplateTerm::Param(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True if the template writes nothing.
    pub fn is_empty(&self) -> bool {
        self.triples().next().is_none()
    }

    fn triples(&self) -> impl Iterator<Item = &TemplateTriple> {
        self.ops.iter().flat_map(|op| match op {
            TemplateOp::InsertData(triples) => triples.iter(),
        })
    }

    /// Fill every slot and produce a ground update. Empty insertions are
    /// dropped.
    pub fn bind(&self, bindings: &TemplateBindings) -> SynthResult<UpdateRequest> {
        let mut request = UpdateRequest::new();
        for op in &self.ops {
            match op {
                TemplateOp::InsertData(triples) => {
                    let ground = triples
                        .iter()
                        .map(|t| self.ground(t, bindings))
                        .collect::<SynthResult<Vec<_>>>()?;
                    if !ground.is_empty() {
                        request.push(UpdateOp::InsertData(ground));
                    }
                }
            }
        }
        Ok(request)
    }

    fn ground(&self, triple: &TemplateTriple, bindings: &TemplateBindings) -> SynthResult<Triple> {
        let object: Term = match &triple.object {
            TemplateTerm::Anchor => bindings.anchor.clone().into(),
            TemplateTerm::Iri(iri) => iri.clone().into(),
            TemplateTerm::Param(name) => bindings
                .params
                .get(name)
                .cloned()
                .ok_or_else(|| SynthError::missing_parameter(&self.name, name))?,
        };
        Ok(Triple::new(
            bindings.anchor.clone(),
            triple.predicate.clone(),
            object,
        ))
    }
}

impl fmt::Display for UpdateTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# {}", self.name)?;
        for op in &self.ops {
            match op {
                TemplateOp::InsertData(triples) => {
                    write!(f, "\nINSERT DATA {{")?;
                    for triple in triples {
                        write!(f, "\n  {}", triple)?;
                    }
                    write!(f, "\n}}")?;
                }
            }
        }
        Ok(())
    }
}
