//! Abstract Syntax Tree types for SELECT queries.

use std::collections::BTreeMap;
use std::fmt;
use weft_core::{Iri, Literal, PatternTerm, Term, TriplePattern};

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Prefix label to namespace IRI.
pub type PrefixMap = BTreeMap<String, Iri>;

/// A `PREFIX label: <iri>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDecl {
    pub prefix: String,
    pub iri: Iri,
}

// ==================== QUERY ====================

/// A parsed SELECT query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub prefixes: Vec<PrefixDecl>,
    pub distinct: bool,
    pub projection: Projection,
    pub pattern: GroupPattern,
}

/// The SELECT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `SELECT *`
    All,
    /// Explicit variable list, in declaration order.
    Vars(Vec<String>),
}

impl SelectQuery {
    /// Variables reported by each solution row.
    ///
    /// For `SELECT *` these are the variables bound by the pattern in order of
    /// first appearance; variables that only occur in `MINUS` or `FILTER` are
    /// not in scope.
    pub fn projected_variables(&self) -> Vec<String> {
        match &self.projection {
            Projection::Vars(vars) => vars.clone(),
            Projection::All => {
                let mut vars = Vec::new();
                self.pattern.collect_bound_vars(&mut vars);
                vars
            }
        }
    }

    /// Declared prefixes as a lookup map.
    pub fn prefix_map(&self) -> PrefixMap {
        self.prefixes
            .iter()
            .map(|decl| (decl.prefix.clone(), decl.iri.clone()))
            .collect()
    }

    /// Append a `FILTER` to the top-level group.
    pub fn with_filter(mut self, expr: Expr) -> Self {
        self.pattern.elements.push(PatternElement::Filter(expr));
        self
    }

    /// Substitute a constant for `var` throughout the pattern tree.
    ///
    /// The variable keeps its place in the projection: a leading
    /// `BIND(term AS ?var)` reintroduces it so every row still reports it.
    pub fn bind(&self, var: &str, term: &Term) -> Self {
        let mut bound = self.clone();
        if let Projection::All = bound.projection {
            bound.projection = Projection::Vars(self.projected_variables());
        }
        bound.pattern = self.pattern.substitute(var, term);
        bound.pattern.elements.insert(
            0,
            PatternElement::Bind {
                var: var.to_string(),
                term: term.clone(),
            },
        );
        bound
    }
}

// ==================== PATTERNS ====================

/// A `{ ... }` group graph pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPattern {
    pub elements: Vec<PatternElement>,
}

/// One element of a group graph pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    /// A block of triple patterns (basic graph pattern).
    Triples(Vec<TriplePattern>),
    Optional(GroupPattern),
    /// A nested `{ ... }` group.
    Group(GroupPattern),
    /// Two or more groups joined by `UNION`.
    Union(Vec<GroupPattern>),
    Minus(GroupPattern),
    Filter(Expr),
    /// `BIND(term AS ?var)` with a constant term.
    Bind { var: String, term: Term },
}

impl GroupPattern {
    pub fn new(elements: Vec<PatternElement>) -> Self {
        Self { elements }
    }

    fn collect_bound_vars(&self, out: &mut Vec<String>) {
        let mut push = |name: &str| {
            if !out.iter().any(|v| v == name) {
                out.push(name.to_string());
            }
        };
        for element in &self.elements {
            match element {
                PatternElement::Triples(triples) => {
                    for triple in triples {
                        for var in triple.variables() {
                            push(var);
                        }
                    }
                }
                PatternElement::Bind { var, .. } => push(var),
                PatternElement::Optional(group) | PatternElement::Group(group) => {
                    let mut inner = Vec::new();
                    group.collect_bound_vars(&mut inner);
                    for var in &inner {
                        push(var);
                    }
                }
                PatternElement::Union(groups) => {
                    for group in groups {
                        let mut inner = Vec::new();
                        group.collect_bound_vars(&mut inner);
                        for var in &inner {
                            push(var);
                        }
                    }
                }
                PatternElement::Minus(_) | PatternElement::Filter(_) => {}
            }
        }
    }

    fn substitute(&self, var: &str, term: &Term) -> Self {
        let elements = self
            .elements
            .iter()
            .map(|element| match element {
                PatternElement::Triples(triples) => PatternElement::Triples(
                    triples
                        .iter()
                        .map(|t| TriplePattern {
                            subject: substitute_term(&t.subject, var, term),
                            predicate: substitute_term(&t.predicate, var, term),
                            object: substitute_term(&t.object, var, term),
                        })
                        .collect(),
                ),
                PatternElement::Optional(g) => PatternElement::Optional(g.substitute(var, term)),
                PatternElement::Group(g) => PatternElement::Group(g.substitute(var, term)),
                PatternElement::Union(groups) => PatternElement::Union(
                    groups.iter().map(|g| g.substitute(var, term)).collect(),
                ),
                PatternElement::Minus(g) => PatternElement::Minus(g.substitute(var, term)),
                PatternElement::Filter(expr) => PatternElement::Filter(expr.substitute(var, term)),
                PatternElement::Bind { var: v, term: t } => PatternElement::Bind {
                    var: v.clone(),
                    term: t.clone(),
                },
            })
            .collect();
        Self { elements }
    }
}

fn substitute_term(pt: &PatternTerm, var: &str, term: &Term) -> PatternTerm {
    match pt {
        PatternTerm::Var(name) if name == var => PatternTerm::Term(term.clone()),
        other => other.clone(),
    }
}

// ==================== EXPRESSIONS ====================

/// A filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Term(PatternTerm),
    /// `bound(?v)`
    Bound(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Exists(GroupPattern),
    NotExists(GroupPattern),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        }
    }
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Term(PatternTerm::Var(name.into()))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    fn substitute(&self, var: &str, term: &Term) -> Self {
        match self {
            Expr::Term(pt) => Expr::Term(substitute_term(pt, var, term)),
            Expr::Bound(name) if name == var => {
                Expr::Term(PatternTerm::Term(Term::Literal(Literal::boolean(true))))
            }
            Expr::Bound(name) => Expr::Bound(name.clone()),
            Expr::Unary(op, inner) => Expr::Unary(*op, Box::new(inner.substitute(var, term))),
            Expr::Binary(op, l, r) => Expr::Binary(
                *op,
                Box::new(l.substitute(var, term)),
                Box::new(r.substitute(var, term)),
            ),
            Expr::Exists(g) => Expr::Exists(g.substitute(var, term)),
            Expr::NotExists(g) => Expr::NotExists(g.substitute(var, term)),
        }
    }
}

// ==================== DISPLAY ====================

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.prefixes {
            writeln!(f, "PREFIX {}: {}", decl.prefix, decl.iri)?;
        }
        write!(f, "SELECT ")?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        match &self.projection {
            Projection::All => write!(f, "*")?,
            Projection::Vars(vars) => {
                let rendered: Vec<String> = vars.iter().map(|v| format!("?{}", v)).collect();
                write!(f, "{}", rendered.join(" "))?;
            }
        }
        write!(f, " WHERE {}", self.pattern)
    }
}

impl fmt::Display for GroupPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for element in &self.elements {
            write!(f, " {}", element)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElement::Triples(triples) => {
                let rendered: Vec<String> = triples.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", rendered.join(" "))
            }
            PatternElement::Optional(group) => write!(f, "OPTIONAL {}", group),
            PatternElement::Group(group) => write!(f, "{}", group),
            PatternElement::Union(groups) => {
                let rendered: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
                write!(f, "{}", rendered.join(" UNION "))
            }
            PatternElement::Minus(group) => write!(f, "MINUS {}", group),
            PatternElement::Filter(expr) => write!(f, "FILTER ({})", expr),
            PatternElement::Bind { var, term } => write!(f, "BIND ({} AS ?{})", term, var),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Term(term) => write!(f, "{}", term),
            Expr::Bound(var) => write!(f, "bound(?{})", var),
            Expr::Unary(UnaryOp::Not, inner) => write!(f, "!({})", inner),
            Expr::Binary(op, l, r) => write!(f, "({} {} {})", l, op.symbol(), r),
            Expr::Exists(group) => write!(f, "EXISTS {}", group),
            Expr::NotExists(group) => write!(f, "NOT EXISTS {}", group),
        }
    }
}
