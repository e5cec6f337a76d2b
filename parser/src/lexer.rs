//! Lexer (tokenizer) for query text.

use crate::{ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords (case-insensitive)
    Prefix,
    Select,
    Distinct,
    Where,
    Optional,
    Union,
    Minus,
    Filter,
    Not,
    Exists,
    Bound,
    Bind,
    As,
    True,
    False,
    /// The `a` shorthand for rdf:type (case-sensitive).
    A,

    // Terms
    /// Variable name without its `?` or `$` sigil.
    Var(String),
    /// IRI between angle brackets, brackets stripped.
    IriRef(String),
    PrefixedName { prefix: String, local: String },
    String(String),
    /// Numeric literals keep their lexical form.
    Integer(String),
    Decimal(String),
    Double(String),
    /// Language tag without the `@`.
    LangTag(String),

    // Symbols
    LParen,      // (
    RParen,      // )
    LBrace,      // {
    RBrace,      // }
    Dot,         // .
    Semicolon,   // ;
    Comma,       // ,
    Star,        // *
    DoubleCaret, // ^^
    Eq,          // =
    NotEq,       // !=
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    Bang,        // !
    AndAnd,      // &&
    OrOr,        // ||

    // End of file
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Prefix => "PREFIX",
            TokenKind::Select => "SELECT",
            TokenKind::Distinct => "DISTINCT",
            TokenKind::Where => "WHERE",
            TokenKind::Optional => "OPTIONAL",
            TokenKind::Union => "UNION",
            TokenKind::Minus => "MINUS",
            TokenKind::Filter => "FILTER",
            TokenKind::Not => "NOT",
            TokenKind::Exists => "EXISTS",
            TokenKind::Bound => "BOUND",
            TokenKind::Bind => "BIND",
            TokenKind::As => "AS",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::A => "a",
            TokenKind::Var(_) => "variable",
            TokenKind::IriRef(_) => "IRI",
            TokenKind::PrefixedName { .. } => "prefixed name",
            TokenKind::String(_) => "string",
            TokenKind::Integer(_) => "integer",
            TokenKind::Decimal(_) => "decimal",
            TokenKind::Double(_) => "double",
            TokenKind::LangTag(_) => "language tag",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Star => "*",
            TokenKind::DoubleCaret => "^^",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Bang => "!",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(pos: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(pos, pos, line, column),
        }
    }
}

/// Lexer state.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize all input into a vector of tokens ending with `Eof`.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn span_from(&self, start: usize, start_line: usize, start_col: usize) -> Span {
        Span::new(start, self.pos, start_line, start_col)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Character after the next one, without consuming anything.
    fn peek_second(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next().map(|(_, c)| c)
    }

    fn next_char(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else if c == '#' {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.next_char();
                }
            } else {
                break;
            }
        }
    }

    fn take_while(&mut self, buf: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if pred(c) {
                buf.push(c);
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let Some(c) = self.next_char() else {
            return Ok(Token::eof(self.pos, self.line, self.column));
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '.' if !matches!(self.peek_char(), Some(d) if d.is_ascii_digit()) => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '*' => TokenKind::Star,
            '=' => TokenKind::Eq,
            '<' => self.scan_iri_or_lt(start, start_line, start_col)?,
            '>' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '&' | '|' | '^' => {
                if self.peek_char() != Some(c) {
                    return Err(ParseError::new(
                        format!("unexpected character '{}'", c),
                        self.span_from(start, start_line, start_col),
                    ));
                }
                self.next_char();
                match c {
                    '&' => TokenKind::AndAnd,
                    '|' => TokenKind::OrOr,
                    _ => TokenKind::DoubleCaret,
                }
            }
            '?' | '$' => {
                let mut name = String::new();
                self.take_while(&mut name, |c| c.is_alphanumeric() || c == '_');
                if name.is_empty() {
                    return Err(ParseError::new(
                        "expected variable name",
                        self.span_from(start, start_line, start_col),
                    ));
                }
                TokenKind::Var(name)
            }
            '@' => {
                let mut tag = String::new();
                self.take_while(&mut tag, |c| c.is_ascii_alphanumeric() || c == '-');
                if tag.is_empty() {
                    return Err(ParseError::new(
                        "expected language tag after '@'",
                        self.span_from(start, start_line, start_col),
                    ));
                }
                TokenKind::LangTag(tag)
            }
            '"' | '\'' => self.scan_string(c, start, start_line, start_col)?,
            ':' => self.scan_prefixed_name(String::new()),
            '+' | '-' if matches!(self.peek_char(), Some(d) if d.is_ascii_digit() || d == '.') => {
                self.scan_number(c, start, start_line, start_col)?
            }
            '0'..='9' | '.' => self.scan_number(c, start, start_line, start_col)?,
            c if c.is_alphabetic() || c == '_' => {
                self.scan_word(c, start, start_line, start_col)?
            }
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", c),
                    self.span_from(start, start_line, start_col),
                ));
            }
        };

        Ok(Token::new(kind, self.span_from(start, start_line, start_col)))
    }

    /// `<` opens an IRI when a `>` follows before any whitespace.
    fn scan_iri_or_lt(
        &mut self,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut lookahead = self.chars.clone();
        let mut is_iri = false;
        for (_, c) in lookahead.by_ref() {
            if c == '>' {
                is_iri = true;
                break;
            }
            if c.is_whitespace() || c == '<' || c == '"' {
                break;
            }
        }

        if is_iri && self.peek_char() != Some('=') && self.peek_char() != Some('>') {
            let mut iri = String::new();
            self.take_while(&mut iri, |c| c != '>');
            self.next_char();
            return Ok(TokenKind::IriRef(iri));
        }

        if self.peek_char() == Some('=') {
            self.next_char();
            return Ok(TokenKind::LtEq);
        }
        if self.peek_char() == Some('>') {
            return Err(ParseError::new(
                "empty IRI",
                self.span_from(start, start_line, start_col),
            ));
        }
        Ok(TokenKind::Lt)
    }

    fn scan_string(
        &mut self,
        quote: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut value = String::new();

        loop {
            match self.next_char() {
                None | Some('\n') => {
                    return Err(ParseError::new(
                        "unterminated string literal",
                        self.span_from(start, start_line, start_col),
                    ));
                }
                Some(c) if c == quote => break,
                Some('\\') => {
                    let escaped = match self.next_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some(c) => {
                            return Err(ParseError::new(
                                format!("invalid escape sequence '\\{}'", c),
                                self.span_from(start, start_line, start_col),
                            ));
                        }
                        None => {
                            return Err(ParseError::new(
                                "unterminated escape sequence",
                                self.span_from(start, start_line, start_col),
                            ));
                        }
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }

        Ok(TokenKind::String(value))
    }

    /// Scan the local part after `prefix:`. A trailing `.` ends the triple.
    fn scan_prefixed_name(&mut self, prefix: String) -> TokenKind {
        let mut local = String::new();
        while let Some(c) = self.peek_char() {
            let continues = c.is_alphanumeric()
                || c == '_'
                || c == '-'
                || (c == '.'
                    && matches!(self.peek_second(), Some(n) if n.is_alphanumeric() || n == '_'));
            if !continues {
                break;
            }
            local.push(c);
            self.next_char();
        }
        TokenKind::PrefixedName { prefix, local }
    }

    fn scan_word(
        &mut self,
        first: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut word = String::new();
        word.push(first);
        self.take_while(&mut word, |c| c.is_alphanumeric() || c == '_' || c == '-');

        if self.peek_char() == Some(':') {
            self.next_char();
            return Ok(self.scan_prefixed_name(word));
        }

        if word == "a" {
            return Ok(TokenKind::A);
        }

        let kind = match word.to_uppercase().as_str() {
            "PREFIX" => TokenKind::Prefix,
            "SELECT" => TokenKind::Select,
            "DISTINCT" => TokenKind::Distinct,
            "WHERE" => TokenKind::Where,
            "OPTIONAL" => TokenKind::Optional,
            "UNION" => TokenKind::Union,
            "MINUS" => TokenKind::Minus,
            "FILTER" => TokenKind::Filter,
            "NOT" => TokenKind::Not,
            "EXISTS" => TokenKind::Exists,
            "BOUND" => TokenKind::Bound,
            "BIND" => TokenKind::Bind,
            "AS" => TokenKind::As,
            "TRUE" => TokenKind::True,
            "FALSE" => TokenKind::False,
            _ => {
                return Err(ParseError::new(
                    format!("unknown keyword '{}'", word),
                    self.span_from(start, start_line, start_col),
                ));
            }
        };
        Ok(kind)
    }

    fn scan_number(
        &mut self,
        first: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut number = String::new();
        number.push(first);
        let mut has_decimal = first == '.';

        self.take_while(&mut number, |c| c.is_ascii_digit());

        // A '.' only belongs to the number when a digit follows it.
        if !has_decimal
            && self.peek_char() == Some('.')
            && matches!(self.peek_second(), Some(d) if d.is_ascii_digit())
        {
            has_decimal = true;
            self.next_char();
            number.push('.');
            self.take_while(&mut number, |c| c.is_ascii_digit());
        } else if has_decimal {
            self.take_while(&mut number, |c| c.is_ascii_digit());
        }

        let has_exponent = matches!(self.peek_char(), Some('e' | 'E'));
        if has_exponent {
            if let Some(e) = self.next_char() {
                number.push(e);
            }
            if let Some(sign @ ('+' | '-')) = self.peek_char() {
                number.push(sign);
                self.next_char();
            }
            let before = number.len();
            self.take_while(&mut number, |c| c.is_ascii_digit());
            if number.len() == before {
                return Err(ParseError::new(
                    format!("invalid exponent in number literal '{}'", number),
                    self.span_from(start, start_line, start_col),
                ));
            }
        }

        if !number.chars().any(|c| c.is_ascii_digit()) {
            return Err(ParseError::new(
                format!("invalid number literal '{}'", number),
                self.span_from(start, start_line, start_col),
            ));
        }

        Ok(if has_exponent {
            TokenKind::Double(number)
        } else if has_decimal {
            TokenKind::Decimal(number)
        } else {
            TokenKind::Integer(number)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let kinds = tokenize("select Select SELECT where");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Select,
                TokenKind::Select,
                TokenKind::Select,
                TokenKind::Where,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_a_is_case_sensitive() {
        assert_eq!(tokenize("a")[0], TokenKind::A);
        assert!(Lexer::new("A").tokenize().is_err());
    }

    #[test]
    fn test_variables() {
        let kinds = tokenize("?bike $fw");
        assert_eq!(kinds[0], TokenKind::Var("bike".into()));
        assert_eq!(kinds[1], TokenKind::Var("fw".into()));
    }

    #[test]
    fn test_iri_versus_less_than() {
        let kinds = tokenize("<http://example.org/x> ?a < 3 ?b <= 4");
        assert_eq!(kinds[0], TokenKind::IriRef("http://example.org/x".into()));
        assert_eq!(kinds[2], TokenKind::Lt);
        assert_eq!(kinds[3], TokenKind::Integer("3".into()));
        assert_eq!(kinds[5], TokenKind::LtEq);
    }

    #[test]
    fn test_prefixed_names() {
        let kinds = tokenize("ex:frontWheel :mfgDate ex:a.b ex:c .");
        assert_eq!(
            kinds[0],
            TokenKind::PrefixedName {
                prefix: "ex".into(),
                local: "frontWheel".into()
            }
        );
        assert_eq!(
            kinds[1],
            TokenKind::PrefixedName {
                prefix: String::new(),
                local: "mfgDate".into()
            }
        );
        assert_eq!(
            kinds[2],
            TokenKind::PrefixedName {
                prefix: "ex".into(),
                local: "a.b".into()
            }
        );
        assert_eq!(
            kinds[3],
            TokenKind::PrefixedName {
                prefix: "ex".into(),
                local: "c".into()
            }
        );
        assert_eq!(kinds[4], TokenKind::Dot);
    }

    #[test]
    fn test_numbers() {
        let kinds = tokenize("42 -7 3.14 1e10 2.5E-3 .5");
        assert_eq!(kinds[0], TokenKind::Integer("42".into()));
        assert_eq!(kinds[1], TokenKind::Integer("-7".into()));
        assert_eq!(kinds[2], TokenKind::Decimal("3.14".into()));
        assert_eq!(kinds[3], TokenKind::Double("1e10".into()));
        assert_eq!(kinds[4], TokenKind::Double("2.5E-3".into()));
        assert_eq!(kinds[5], TokenKind::Decimal(".5".into()));
    }

    #[test]
    fn test_number_before_triple_dot() {
        let kinds = tokenize("3 .");
        assert_eq!(kinds, vec![TokenKind::Integer("3".into()), TokenKind::Dot, TokenKind::Eof]);
        let kinds = tokenize("3.");
        assert_eq!(kinds, vec![TokenKind::Integer("3".into()), TokenKind::Dot, TokenKind::Eof]);
    }

    #[test]
    fn test_literal_suffixes() {
        let kinds = tokenize(r#""velo"@fr "5"^^xsd:integer 'it''s'"#);
        assert_eq!(kinds[0], TokenKind::String("velo".into()));
        assert_eq!(kinds[1], TokenKind::LangTag("fr".into()));
        assert_eq!(kinds[3], TokenKind::DoubleCaret);
        assert_eq!(kinds[5], TokenKind::String("it".into()));
    }

    #[test]
    fn test_string_escapes() {
        let kinds = tokenize(r#""say \"hi\"\n""#);
        assert_eq!(kinds[0], TokenKind::String("say \"hi\"\n".into()));
    }

    #[test]
    fn test_operators() {
        let kinds = tokenize("&& || ! != = > >=");
        assert_eq!(
            kinds,
            vec![
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::NotEq,
                TokenKind::Eq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let kinds = tokenize("# leading comment\n?x # trailing\n");
        assert_eq!(kinds, vec![TokenKind::Var("x".into()), TokenKind::Eof]);
    }

    #[test]
    fn test_span_tracking() {
        let tokens = Lexer::new("SELECT\n  ?x").tokenize().unwrap();
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"open").tokenize().unwrap_err();
        assert!(err.message.contains("unterminated"));
    }
}
