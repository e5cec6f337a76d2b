//! Main analyzer implementation.

use crate::scope::{is_nested, OptionalPath, OptionalScope};
use crate::{AnalyzerError, AnalyzerResult, QueryAnalysis, VarDependency, VariableProperties};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;
use weft_core::{Iri, PatternTerm, TriplePattern};
use weft_parser::{Expr, GroupPattern, PatternElement, SelectQuery};
use weft_registry::{Range, Vocabulary};

/// Facts gathered during one walk of the pattern tree.
#[derive(Debug, Default)]
struct Facts {
    /// Predicates under which a tracked variable occurs as object.
    ranges: BTreeMap<String, BTreeSet<Iri>>,
    /// Predicates under which a tracked variable occurs as subject.
    domains: BTreeMap<String, BTreeSet<Iri>>,
    /// Optional-context path of every occurrence of a tracked variable.
    contexts: BTreeMap<String, Vec<OptionalPath>>,
    dependencies: BTreeSet<VarDependency>,
}

/// The Analyzer derives per-variable properties of a query for one anchor.
pub struct Analyzer<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Analyzer<'v> {
    /// Create a new analyzer consulting the given vocabulary.
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Analyze `query` with `anchor` as the entity identity.
    pub fn analyze(&self, query: &SelectQuery, anchor: &str) -> AnalyzerResult<QueryAnalysis> {
        let projected = query.projected_variables();
        if !projected.iter().any(|v| v == anchor) {
            return Err(AnalyzerError::unknown_anchor(anchor));
        }
        let tracked: BTreeSet<&str> = projected.iter().map(String::as_str).collect();

        let mut walk = Walk {
            tracked: &tracked,
            scope: OptionalScope::new(),
            facts: Facts::default(),
        };
        walk.group(&query.pattern)?;
        let facts = walk.facts;

        let single = self.reachable(anchor, &facts.dependencies, false);
        let any = self.reachable(anchor, &facts.dependencies, true);

        let mut variables = BTreeMap::new();
        let mut ambiguous = BTreeSet::new();
        for var in projected.iter().filter(|v| v.as_str() != anchor) {
            let ranges = facts.ranges.get(var);
            let domains = facts.domains.get(var);
            if ranges.map_or(true, |r| r.is_empty()) && domains.map_or(true, |d| d.is_empty()) {
                return Err(AnalyzerError::unresolved_type(var.clone()));
            }

            let sole_range = ranges.filter(|r| r.len() == 1).and_then(|r| r.iter().next());
            let declared = sole_range.map(|p| self.vocabulary.range_of(p));

            let is_object_reference = domains.map_or(false, |d| !d.is_empty())
                || declared.map_or(false, Range::is_entity);

            let datatype = match (is_object_reference, declared) {
                (true, Some(Range::Entity(tag))) => tag.clone(),
                (true, _) => "Resource".to_string(),
                (false, Some(Range::Literal(dt))) => dt.tag().to_string(),
                (false, _) => "String".to_string(),
            };

            let functional = single.contains(var.as_str()) || !any.contains(var.as_str());

            let paths = facts.contexts.get(var).map(Vec::as_slice).unwrap_or(&[]);
            let nullable = !paths.is_empty() && paths.iter().all(|p| !p.is_empty());
            if nullable && has_sibling_paths(paths) {
                ambiguous.insert(var.clone());
            }

            let predicate = anchor_predicate(anchor, var, &facts.dependencies);

            debug!(
                variable = %var,
                functional,
                nullable,
                datatype = %datatype,
                is_object_reference,
                "classified query variable"
            );

            variables.insert(
                var.clone(),
                VariableProperties {
                    functional,
                    nullable,
                    datatype,
                    is_object_reference,
                    predicate,
                },
            );
        }

        Ok(QueryAnalysis {
            anchor: anchor.to_string(),
            variables,
            dependencies: facts.dependencies,
            ambiguous,
        })
    }

    /// Variables reachable from `anchor` along dependency edges. Unless
    /// `through_many` is set, edges over one-to-many predicates are skipped.
    fn reachable<'a>(
        &self,
        anchor: &'a str,
        dependencies: &'a BTreeSet<VarDependency>,
        through_many: bool,
    ) -> BTreeSet<&'a str> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([anchor]);
        seen.insert(anchor);
        while let Some(current) = queue.pop_front() {
            for dep in dependencies.iter().filter(|d| d.subject == current) {
                if !through_many && self.vocabulary.is_many(&dep.predicate) {
                    continue;
                }
                if seen.insert(dep.object.as_str()) {
                    queue.push_back(dep.object.as_str());
                }
            }
        }
        seen
    }
}

/// Analyze `query` for `anchor` against `vocabulary`.
pub fn analyze(
    query: &SelectQuery,
    anchor: &str,
    vocabulary: &Vocabulary,
) -> AnalyzerResult<QueryAnalysis> {
    Analyzer::new(vocabulary).analyze(query, anchor)
}

fn has_sibling_paths(paths: &[OptionalPath]) -> bool {
    paths
        .iter()
        .enumerate()
        .any(|(i, a)| paths[i + 1..].iter().any(|b| !is_nested(a, b)))
}

fn anchor_predicate(anchor: &str, var: &str, deps: &BTreeSet<VarDependency>) -> Option<Iri> {
    let predicates: BTreeSet<&Iri> = deps
        .iter()
        .filter(|d| d.subject == anchor && d.object == var)
        .map(|d| &d.predicate)
        .collect();
    if predicates.len() == 1 {
        predicates.into_iter().next().cloned()
    } else {
        None
    }
}

// ==================== PATTERN WALK ====================

struct Walk<'t> {
    tracked: &'t BTreeSet<&'t str>,
    scope: OptionalScope,
    facts: Facts,
}

impl Walk<'_> {
    fn group(&mut self, group: &GroupPattern) -> AnalyzerResult<()> {
        for element in &group.elements {
            self.element(element)?;
        }
        Ok(())
    }

    fn element(&mut self, element: &PatternElement) -> AnalyzerResult<()> {
        match element {
            PatternElement::Triples(triples) => {
                for triple in triples {
                    self.triple(triple)?;
                }
                Ok(())
            }
            PatternElement::Optional(inner) => {
                self.scope.push();
                let result = self.group(inner);
                self.scope.pop();
                result
            }
            PatternElement::Group(inner) => self.group(inner),
            PatternElement::Union(_) => Err(AnalyzerError::unsupported_pattern(
                "UNION",
                "alternative bindings have no single cardinality",
            )),
            PatternElement::Minus(_) => Err(AnalyzerError::unsupported_pattern(
                "MINUS",
                "negation has no defined cardinality",
            )),
            PatternElement::Filter(expr) => {
                if contains_exists(expr) {
                    Err(AnalyzerError::unsupported_pattern(
                        "EXISTS",
                        "sub-patterns inside filters are not analyzed",
                    ))
                } else {
                    Ok(())
                }
            }
            // Constant bindings carry no relation.
            PatternElement::Bind { .. } => Ok(()),
        }
    }

    fn triple(&mut self, triple: &TriplePattern) -> AnalyzerResult<()> {
        let predicate = match &triple.predicate {
            PatternTerm::Var(v) => {
                return Err(AnalyzerError::unsupported_pattern(
                    "predicate variable",
                    format!("?{} in predicate position", v),
                ))
            }
            PatternTerm::Term(term) => term.as_iri().cloned().ok_or_else(|| {
                AnalyzerError::unsupported_pattern(
                    "literal predicate",
                    format!("{} in predicate position", term),
                )
            })?,
        };

        let subject = triple.subject.as_var();
        let object = triple.object.as_var();
        let path = self.scope.path();

        if let Some(s) = subject.filter(|s| self.tracked.contains(s)) {
            self.facts
                .domains
                .entry(s.to_string())
                .or_default()
                .insert(predicate.clone());
            self.facts
                .contexts
                .entry(s.to_string())
                .or_default()
                .push(path.clone());
        }
        if let Some(o) = object.filter(|o| self.tracked.contains(o)) {
            self.facts
                .ranges
                .entry(o.to_string())
                .or_default()
                .insert(predicate.clone());
            self.facts
                .contexts
                .entry(o.to_string())
                .or_default()
                .push(path);
        }
        if let (Some(s), Some(o)) = (subject, object) {
            self.facts.dependencies.insert(VarDependency {
                subject: s.to_string(),
                predicate,
                object: o.to_string(),
                optional: !self.scope.is_empty(),
            });
        }
        Ok(())
    }
}

fn contains_exists(expr: &Expr) -> bool {
    match expr {
        Expr::Exists(_) | Expr::NotExists(_) => true,
        Expr::Unary(_, inner) => contains_exists(inner),
        Expr::Binary(_, left, right) => contains_exists(left) || contains_exists(right),
        Expr::Term(_) | Expr::Bound(_) => false,
    }
}
