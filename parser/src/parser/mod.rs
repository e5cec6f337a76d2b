//! Parser for query text.
//!
//! This module is organized into submodules by parsing category:
//! - `query`: prologue (`PREFIX`) and the `SELECT` clause
//! - `pattern`: group graph patterns, triples blocks and terms
//! - `expr`: filter expressions

mod expr;
mod pattern;
mod query;

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};
use weft_core::{vocab, Iri};

// ==================== PARSER STATE ====================

/// Parser state.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
    prefixes: PrefixMap,
}

impl Parser {
    /// Create a new parser from source text.
    ///
    /// `rdf:`, `rdfs:` and `xsd:` are predeclared; a `PREFIX` declaration
    /// for the same label replaces them.
    pub fn new(input: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        let eof = match tokens.last() {
            Some(token) => token.clone(),
            None => Token::eof(0, 1, 1),
        };
        let mut prefixes = PrefixMap::new();
        for (label, ns) in [("rdf", vocab::RDF), ("rdfs", vocab::RDFS), ("xsd", vocab::XSD)] {
            if let Ok(iri) = Iri::new(ns) {
                prefixes.insert(label.to_string(), iri);
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            eof,
            prefixes,
        })
    }

    /// Add prefixes visible to the text being parsed.
    pub fn with_prefixes(mut self, prefixes: &PrefixMap) -> Self {
        self.prefixes
            .extend(prefixes.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

// ==================== TOKEN HELPERS ====================

impl Parser {
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    pub(crate) fn expect_var(&mut self) -> ParseResult<String> {
        match self.peek().kind.clone() {
            TokenKind::Var(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("variable")),
        }
    }

    pub(crate) fn expect_eof(&self) -> ParseResult<()> {
        if self.check(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::unexpected_token(token.span, expected, token.kind.name())
    }

    /// Expand a prefixed name against the declared prefixes.
    pub(crate) fn resolve_prefixed(&self, prefix: &str, local: &str, span: Span) -> ParseResult<Iri> {
        let ns = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| ParseError::undeclared_prefix(span, prefix))?;
        Iri::new(format!("{}{}", ns.as_str(), local)).map_err(|e| ParseError::invalid_term(span, e))
    }
}

// ==================== PUBLIC API ====================

/// Parse a SELECT query from source text.
pub fn parse_query(input: &str) -> ParseResult<SelectQuery> {
    let mut parser = Parser::new(input)?;
    let query = parser.parse_select_query()?;
    parser.expect_eof()?;
    Ok(query)
}

/// Parse a standalone filter expression, resolving prefixed names against
/// `prefixes`.
pub fn parse_expr(input: &str, prefixes: &PrefixMap) -> ParseResult<Expr> {
    let mut parser = Parser::new(input)?.with_prefixes(prefixes);
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

// ==================== TESTS ====================
