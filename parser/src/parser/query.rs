//! Prologue and SELECT clause parsing.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_select_query(&mut self) -> ParseResult<SelectQuery> {
        let prefixes = self.parse_prologue()?;

        self.expect(&TokenKind::Select)?;
        let distinct = if self.check(&TokenKind::Distinct) {
            self.advance();
            true
        } else {
            false
        };
        let projection = self.parse_projection()?;

        if self.check(&TokenKind::Where) {
            self.advance();
        }
        let pattern = self.parse_group()?;

        Ok(SelectQuery {
            prefixes,
            distinct,
            projection,
            pattern,
        })
    }

    fn parse_prologue(&mut self) -> ParseResult<Vec<PrefixDecl>> {
        let mut decls = Vec::new();
        while self.check(&TokenKind::Prefix) {
            self.advance();
            let token = self.advance();
            let prefix = match token.kind {
                TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix,
                other => {
                    return Err(ParseError::unexpected_token(
                        token.span,
                        "prefix label",
                        other.name(),
                    ))
                }
            };
            let iri = self.parse_iri_ref()?;
            self.prefixes.insert(prefix.clone(), iri.clone());
            decls.push(PrefixDecl { prefix, iri });
        }
        Ok(decls)
    }

    fn parse_projection(&mut self) -> ParseResult<Projection> {
        if self.check(&TokenKind::Star) {
            self.advance();
            return Ok(Projection::All);
        }

        let mut vars = Vec::new();
        loop {
            let name = match &self.peek().kind {
                TokenKind::Var(name) => name.clone(),
                _ => break,
            };
            self.advance();
            if !vars.contains(&name) {
                vars.push(name);
            }
        }

        if vars.is_empty() {
            return Err(self.unexpected("variable or *"));
        }
        Ok(Projection::Vars(vars))
    }
}
