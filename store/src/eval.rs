//! Query evaluation over a triple set.

use crate::{Solution, StoreResult, TripleSet};
use std::cmp::Ordering;
use weft_core::{Datatype, Literal, PatternTerm, Term, TriplePattern};
use weft_parser::{BinaryOp, Expr, GroupPattern, PatternElement, SelectQuery, UnaryOp};

/// Pattern and expression evaluator.
///
/// Stateless apart from the graph it reads.
pub struct Evaluator<'g> {
    graph: &'g TripleSet,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g TripleSet) -> Self {
        Self { graph }
    }

    /// Evaluate a SELECT query: solve the pattern, project, deduplicate if
    /// DISTINCT.
    pub fn select(&self, query: &SelectQuery) -> StoreResult<Vec<Solution>> {
        let solutions = self.eval_group(&query.pattern, vec![Solution::new()])?;
        let names = query.projected_variables();
        let mut rows: Vec<Solution> = solutions.iter().map(|s| s.project(&names)).collect();
        if query.distinct {
            let mut seen = std::collections::HashSet::new();
            rows.retain(|row| seen.insert(row.clone()));
        }
        Ok(rows)
    }

    /// Extend each input solution with every match of `patterns`.
    pub fn match_triples(
        &self,
        patterns: &[TriplePattern],
        input: Vec<Solution>,
    ) -> Vec<Solution> {
        patterns.iter().fold(input, |solutions, pattern| {
            solutions
                .iter()
                .flat_map(|s| self.match_pattern(pattern, s))
                .collect()
        })
    }

    fn match_pattern(&self, pattern: &TriplePattern, solution: &Solution) -> Vec<Solution> {
        let lookup = |name: &str| solution.get(name);
        let subject = pattern.subject.resolve(&lookup);
        let predicate = pattern.predicate.resolve(&lookup);
        let object = pattern.object.resolve(&lookup);

        // Literals never occur in subject or predicate position.
        let subject_iri = match &subject {
            Some(Term::Iri(iri)) => Some(iri),
            Some(Term::Literal(_)) => return Vec::new(),
            None => None,
        };
        let predicate_iri = match &predicate {
            Some(Term::Iri(iri)) => Some(iri),
            Some(Term::Literal(_)) => return Vec::new(),
            None => None,
        };

        let mut out = Vec::new();
        for triple in self
            .graph
            .matching(subject_iri, predicate_iri, object.as_ref())
        {
            let mut extended = solution.clone();
            let ok = bind_position(&mut extended, &pattern.subject, &triple.subject.clone().into())
                && bind_position(
                    &mut extended,
                    &pattern.predicate,
                    &triple.predicate.clone().into(),
                )
                && bind_position(&mut extended, &pattern.object, &triple.object);
            if ok {
                out.push(extended);
            }
        }
        out
    }

    /// Evaluate a group against the incoming solutions. Filters apply to the
    /// whole group once every other element has been joined.
    pub fn eval_group(
        &self,
        group: &GroupPattern,
        input: Vec<Solution>,
    ) -> StoreResult<Vec<Solution>> {
        let mut solutions = input;
        let mut filters = Vec::new();

        for element in &group.elements {
            solutions = match element {
                PatternElement::Triples(patterns) => self.match_triples(patterns, solutions),
                PatternElement::Optional(inner) => {
                    let mut out = Vec::new();
                    for s in solutions {
                        let matched = self.eval_group(inner, vec![s.clone()])?;
                        if matched.is_empty() {
                            out.push(s);
                        } else {
                            out.extend(matched);
                        }
                    }
                    out
                }
                PatternElement::Group(inner) => self.eval_group(inner, solutions)?,
                PatternElement::Union(branches) => {
                    let mut out = Vec::new();
                    for s in &solutions {
                        for branch in branches {
                            out.extend(self.eval_group(branch, vec![s.clone()])?);
                        }
                    }
                    out
                }
                PatternElement::Minus(inner) => {
                    let removed = self.eval_group(inner, vec![Solution::new()])?;
                    solutions
                        .into_iter()
                        .filter(|s| {
                            !removed
                                .iter()
                                .any(|m| m.shares_variable(s) && m.compatible(s))
                        })
                        .collect()
                }
                PatternElement::Filter(expr) => {
                    filters.push(expr);
                    solutions
                }
                PatternElement::Bind { var, term } => solutions
                    .into_iter()
                    .filter_map(|mut s| s.bind(var, term).then_some(s))
                    .collect(),
            };
        }

        let mut out = Vec::with_capacity(solutions.len());
        'rows: for s in solutions {
            for expr in &filters {
                if !self.test(expr, &s)? {
                    continue 'rows;
                }
            }
            out.push(s);
        }
        Ok(out)
    }

    /// Effective boolean value of a filter. Evaluation errors count as false.
    pub fn test(&self, expr: &Expr, solution: &Solution) -> StoreResult<bool> {
        Ok(self
            .eval(expr, solution)?
            .and_then(|v| effective_boolean(&v))
            .unwrap_or(false))
    }

    /// Evaluate an expression. `None` is an evaluation error (unbound
    /// variable, incomparable operands).
    fn eval(&self, expr: &Expr, solution: &Solution) -> StoreResult<Option<Term>> {
        Ok(match expr {
            Expr::Term(PatternTerm::Term(term)) => Some(term.clone()),
            Expr::Term(PatternTerm::Var(name)) => solution.get(name).cloned(),
            Expr::Bound(name) => Some(Literal::boolean(solution.contains(name)).into()),
            Expr::Unary(UnaryOp::Not, inner) => self
                .eval(inner, solution)?
                .and_then(|v| effective_boolean(&v))
                .map(|b| Literal::boolean(!b).into()),
            Expr::Binary(BinaryOp::Or, left, right) => {
                let l = self.eval(left, solution)?.and_then(|v| effective_boolean(&v));
                let r = self.eval(right, solution)?.and_then(|v| effective_boolean(&v));
                match (l, r) {
                    (Some(true), _) | (_, Some(true)) => Some(Literal::boolean(true).into()),
                    (Some(false), Some(false)) => Some(Literal::boolean(false).into()),
                    _ => None,
                }
            }
            Expr::Binary(BinaryOp::And, left, right) => {
                let l = self.eval(left, solution)?.and_then(|v| effective_boolean(&v));
                let r = self.eval(right, solution)?.and_then(|v| effective_boolean(&v));
                match (l, r) {
                    (Some(false), _) | (_, Some(false)) => Some(Literal::boolean(false).into()),
                    (Some(true), Some(true)) => Some(Literal::boolean(true).into()),
                    _ => None,
                }
            }
            Expr::Binary(op, left, right) => {
                let l = self.eval(left, solution)?;
                let r = self.eval(right, solution)?;
                match (l, r) {
                    (Some(l), Some(r)) => compare(*op, &l, &r).map(|b| Literal::boolean(b).into()),
                    _ => None,
                }
            }
            Expr::Exists(group) => {
                let found = !self.eval_group(group, vec![solution.clone()])?.is_empty();
                Some(Literal::boolean(found).into())
            }
            Expr::NotExists(group) => {
                let found = !self.eval_group(group, vec![solution.clone()])?.is_empty();
                Some(Literal::boolean(!found).into())
            }
        })
    }
}

fn bind_position(solution: &mut Solution, position: &PatternTerm, value: &Term) -> bool {
    match position {
        PatternTerm::Var(name) => solution.bind(name, value),
        PatternTerm::Term(_) => true,
    }
}

fn effective_boolean(term: &Term) -> Option<bool> {
    let literal = term.as_literal()?;
    match literal.datatype() {
        Datatype::Boolean => literal.as_bool(),
        dt if dt.is_numeric() => literal.as_f64().map(|n| n != 0.0 && !n.is_nan()),
        Datatype::String => Some(!literal.lexical().is_empty()),
        _ => None,
    }
}

fn compare(op: BinaryOp, left: &Term, right: &Term) -> Option<bool> {
    let ordering = order(left, right);
    match op {
        BinaryOp::Eq => Some(ordering.map_or(left == right, |o| o == Ordering::Equal)),
        BinaryOp::NotEq => Some(ordering.map_or(left != right, |o| o != Ordering::Equal)),
        BinaryOp::Lt => ordering.map(|o| o == Ordering::Less),
        BinaryOp::LtEq => ordering.map(|o| o != Ordering::Greater),
        BinaryOp::Gt => ordering.map(|o| o == Ordering::Greater),
        BinaryOp::GtEq => ordering.map(|o| o != Ordering::Less),
        BinaryOp::And | BinaryOp::Or => None,
    }
}

/// Value ordering between comparable literals: numbers numerically, other
/// literals of the same datatype and language lexically.
fn order(left: &Term, right: &Term) -> Option<Ordering> {
    let (l, r) = (left.as_literal()?, right.as_literal()?);
    if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
        return a.partial_cmp(&b);
    }
    if l.datatype() == r.datatype() && l.lang() == r.lang() {
        return Some(l.lexical().cmp(r.lexical()));
    }
    None
}
