//! Analysis output types.

use crate::{AnalyzerError, AnalyzerResult};
use std::collections::{BTreeMap, BTreeSet};
use weft_core::Iri;

/// What the analyzer derived for one query variable.
///
/// `!functional` means the runtime value is always a set.
/// `functional && !nullable` means exactly one value exists whenever the
/// anchor exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableProperties {
    pub functional: bool,
    pub nullable: bool,
    /// Class tag for references, datatype tag for literals.
    pub datatype: String,
    pub is_object_reference: bool,
    /// Predicate linking the anchor directly to this variable.
    pub predicate: Option<Iri>,
}

impl VariableProperties {
    /// Functional and non-nullable: required at creation time.
    pub fn is_mandatory(&self) -> bool {
        self.functional && !self.nullable
    }
}

/// A relation between two query variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarDependency {
    pub subject: String,
    pub predicate: Iri,
    pub object: String,
    /// Observed inside at least one optional block.
    pub optional: bool,
}

/// Result of analyzing a query for one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnalysis {
    pub anchor: String,
    /// Every projected variable except the anchor.
    pub variables: BTreeMap<String, VariableProperties>,
    pub dependencies: BTreeSet<VarDependency>,
    /// Variables bound in sibling optional blocks.
    pub ambiguous: BTreeSet<String>,
}

impl QueryAnalysis {
    pub fn get(&self, variable: &str) -> Option<&VariableProperties> {
        self.variables.get(variable)
    }

    /// Fail with `AmbiguousOptionalBinding` for the first ambiguous variable.
    pub fn ensure_unambiguous(&self) -> AnalyzerResult<()> {
        match self.ambiguous.iter().next() {
            Some(variable) => Err(AnalyzerError::ambiguous_optional_binding(variable.clone())),
            None => Ok(()),
        }
    }

    /// Dependencies whose subject is the anchor.
    pub fn anchor_dependencies(&self) -> impl Iterator<Item = &VarDependency> {
        self.dependencies
            .iter()
            .filter(move |dep| dep.subject == self.anchor)
    }
}
