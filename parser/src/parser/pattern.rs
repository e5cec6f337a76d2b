//! Group graph pattern parsing.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;
use weft_core::{Datatype, Iri, Literal, PatternTerm, Term, TriplePattern};

impl Parser {
    /// Parse `{ ... }`.
    pub(crate) fn parse_group(&mut self) -> ParseResult<GroupPattern> {
        self.expect(&TokenKind::LBrace)?;
        let mut elements: Vec<PatternElement> = Vec::new();

        loop {
            match &self.peek().kind {
                TokenKind::RBrace => break,
                TokenKind::Dot => {
                    self.advance();
                }
                TokenKind::Optional => {
                    self.advance();
                    elements.push(PatternElement::Optional(self.parse_group()?));
                }
                TokenKind::Minus => {
                    self.advance();
                    elements.push(PatternElement::Minus(self.parse_group()?));
                }
                TokenKind::Filter => {
                    self.advance();
                    elements.push(PatternElement::Filter(self.parse_constraint()?));
                }
                TokenKind::Bind => {
                    self.advance();
                    elements.push(self.parse_bind()?);
                }
                TokenKind::LBrace => {
                    let first = self.parse_group()?;
                    if self.check(&TokenKind::Union) {
                        let mut groups = vec![first];
                        while self.check(&TokenKind::Union) {
                            self.advance();
                            groups.push(self.parse_group()?);
                        }
                        elements.push(PatternElement::Union(groups));
                    } else {
                        elements.push(PatternElement::Group(first));
                    }
                }
                _ => {
                    let triples = self.parse_triples_same_subject()?;
                    match elements.last_mut() {
                        Some(PatternElement::Triples(block)) => block.extend(triples),
                        _ => elements.push(PatternElement::Triples(triples)),
                    }
                    // Consecutive triples need a '.' between them.
                    if self.starts_term() {
                        return Err(self.unexpected("'.'"));
                    }
                }
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(GroupPattern { elements })
    }

    /// `BIND ( term AS ?var )`
    fn parse_bind(&mut self) -> ParseResult<PatternElement> {
        self.expect(&TokenKind::LParen)?;
        let start = self.peek().span;
        let term = match self.parse_term()? {
            PatternTerm::Term(term) => term,
            PatternTerm::Var(_) => {
                return Err(ParseError::new("BIND only accepts a constant term", start))
            }
        };
        self.expect(&TokenKind::As)?;
        let var = self.expect_var()?;
        self.expect(&TokenKind::RParen)?;
        Ok(PatternElement::Bind { var, term })
    }

    /// Subject followed by a property list with `;` and `,` abbreviations.
    fn parse_triples_same_subject(&mut self) -> ParseResult<Vec<TriplePattern>> {
        let subject = self.parse_term()?;
        let mut triples = Vec::new();

        loop {
            let predicate = self.parse_verb()?;
            loop {
                let object = self.parse_term()?;
                triples.push(TriplePattern {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                });
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }

            if !self.check(&TokenKind::Semicolon) {
                break;
            }
            // Repeated or trailing ';' is allowed.
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            if matches!(self.peek().kind, TokenKind::Dot | TokenKind::RBrace) {
                break;
            }
        }

        Ok(triples)
    }

    fn parse_verb(&mut self) -> ParseResult<PatternTerm> {
        if self.check(&TokenKind::A) {
            self.advance();
            return Ok(PatternTerm::iri(Iri::rdf_type()));
        }
        match &self.peek().kind {
            TokenKind::Var(_) | TokenKind::IriRef(_) | TokenKind::PrefixedName { .. } => {
                self.parse_term()
            }
            _ => Err(self.unexpected("predicate")),
        }
    }

    fn starts_term(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Var(_)
                | TokenKind::IriRef(_)
                | TokenKind::PrefixedName { .. }
                | TokenKind::String(_)
                | TokenKind::Integer(_)
                | TokenKind::Decimal(_)
                | TokenKind::Double(_)
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Parse a variable, IRI or literal.
    pub(crate) fn parse_term(&mut self) -> ParseResult<PatternTerm> {
        let token = self.peek().clone();
        let term = match token.kind {
            TokenKind::Var(name) => {
                self.advance();
                return Ok(PatternTerm::Var(name));
            }
            TokenKind::IriRef(_) | TokenKind::PrefixedName { .. } => Term::Iri(self.parse_iri()?),
            TokenKind::String(value) => {
                self.advance();
                Term::Literal(self.parse_literal_suffix(value)?)
            }
            TokenKind::Integer(lexical) => {
                self.advance();
                Term::Literal(
                    Literal::typed(lexical, Datatype::Integer)
                        .map_err(|e| ParseError::invalid_term(token.span, e))?,
                )
            }
            TokenKind::Decimal(lexical) => {
                self.advance();
                Term::Literal(
                    Literal::typed(lexical, Datatype::Decimal)
                        .map_err(|e| ParseError::invalid_term(token.span, e))?,
                )
            }
            TokenKind::Double(lexical) => {
                self.advance();
                Term::Literal(
                    Literal::typed(lexical, Datatype::Double)
                        .map_err(|e| ParseError::invalid_term(token.span, e))?,
                )
            }
            TokenKind::True => {
                self.advance();
                Term::Literal(Literal::boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Term::Literal(Literal::boolean(false))
            }
            _ => return Err(self.unexpected("term")),
        };
        Ok(PatternTerm::Term(term))
    }

    /// Optional `@lang` or `^^datatype` after a string.
    fn parse_literal_suffix(&mut self, value: String) -> ParseResult<Literal> {
        match &self.peek().kind {
            TokenKind::LangTag(lang) => {
                let lang = lang.clone();
                self.advance();
                Ok(Literal::lang_string(value, lang))
            }
            TokenKind::DoubleCaret => {
                self.advance();
                let span = self.peek().span;
                let datatype = Datatype::from_iri(&self.parse_iri()?);
                Literal::typed(value, datatype).map_err(|e| ParseError::invalid_term(span, e))
            }
            _ => Ok(Literal::string(value)),
        }
    }

    /// Parse `<iri>` or `prefix:local`.
    pub(crate) fn parse_iri(&mut self) -> ParseResult<Iri> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::IriRef(_) => self.parse_iri_ref(),
            TokenKind::PrefixedName { prefix, local } => {
                self.advance();
                self.resolve_prefixed(&prefix, &local, token.span)
            }
            _ => Err(self.unexpected("IRI")),
        }
    }

    /// Parse `<iri>` only.
    pub(crate) fn parse_iri_ref(&mut self) -> ParseResult<Iri> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::IriRef(iri) => {
                self.advance();
                Iri::new(iri).map_err(|e| ParseError::invalid_term(token.span, e))
            }
            _ => Err(self.unexpected("IRI")),
        }
    }
}
