//! RDF terms.
//!
//! A term is either an IRI (the identity of an entity) or a literal value.
//! Blank nodes are not modelled: every entity handled by Weft has an IRI.

use crate::vocab;
use crate::{CoreError, CoreResult};
use std::fmt;

// ==================== Iri ====================

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Create an IRI, rejecting strings that cannot be written between `<` and `>`.
    pub fn new(iri: impl Into<String>) -> CoreResult<Self> {
        let iri = iri.into();
        let invalid = iri.is_empty()
            || iri.chars().any(|c| {
                c.is_whitespace()
                    || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
            });
        if invalid {
            return Err(CoreError::invalid_iri(iri));
        }
        Ok(Self(iri))
    }

    /// The IRI of `rdf:type`.
    pub fn rdf_type() -> Self {
        Self(vocab::RDF_TYPE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The part after the last `#` or `/`, used for display and tags.
    pub fn local_name(&self) -> &str {
        self.0
            .rsplit(|c: char| c == '#' || c == '/')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ==================== Datatype ====================

/// Datatype of a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    String,
    Integer,
    Decimal,
    Double,
    Boolean,
    DateTime,
    Date,
    /// Any datatype without dedicated support; compared lexically.
    Other(Iri),
}

impl Datatype {
    /// Resolve a datatype IRI. `xsd:int`, `xsd:long` and `xsd:float` fold
    /// into their wider counterparts.
    pub fn from_iri(iri: &Iri) -> Self {
        match iri.as_str() {
            vocab::XSD_STRING => Datatype::String,
            vocab::XSD_INTEGER | vocab::XSD_INT | vocab::XSD_LONG => Datatype::Integer,
            vocab::XSD_DECIMAL => Datatype::Decimal,
            vocab::XSD_DOUBLE | vocab::XSD_FLOAT => Datatype::Double,
            vocab::XSD_BOOLEAN => Datatype::Boolean,
            vocab::XSD_DATE_TIME => Datatype::DateTime,
            vocab::XSD_DATE => Datatype::Date,
            _ => Datatype::Other(iri.clone()),
        }
    }

    /// Resolve a short datatype tag such as `Int` or `DateTime`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "String" => Some(Datatype::String),
            "Int" | "Integer" => Some(Datatype::Integer),
            "Decimal" => Some(Datatype::Decimal),
            "Double" | "Float" => Some(Datatype::Double),
            "Boolean" | "Bool" => Some(Datatype::Boolean),
            "DateTime" => Some(Datatype::DateTime),
            "Date" => Some(Datatype::Date),
            _ => None,
        }
    }

    pub fn iri(&self) -> Iri {
        let iri = match self {
            Datatype::String => vocab::XSD_STRING,
            Datatype::Integer => vocab::XSD_INTEGER,
            Datatype::Decimal => vocab::XSD_DECIMAL,
            Datatype::Double => vocab::XSD_DOUBLE,
            Datatype::Boolean => vocab::XSD_BOOLEAN,
            Datatype::DateTime => vocab::XSD_DATE_TIME,
            Datatype::Date => vocab::XSD_DATE,
            Datatype::Other(iri) => return iri.clone(),
        };
        Iri(iri.to_string())
    }

    /// Short tag reported in variable descriptors.
    pub fn tag(&self) -> &str {
        match self {
            Datatype::String => "String",
            Datatype::Integer => "Int",
            Datatype::Decimal => "Decimal",
            Datatype::Double => "Double",
            Datatype::Boolean => "Boolean",
            Datatype::DateTime => "DateTime",
            Datatype::Date => "Date",
            Datatype::Other(iri) => iri.local_name(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Datatype::Integer | Datatype::Decimal | Datatype::Double)
    }

    fn accepts(&self, lexical: &str) -> bool {
        match self {
            Datatype::Integer => {
                let digits = lexical.strip_prefix(&['+', '-'][..]).unwrap_or(lexical);
                !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
            }
            Datatype::Decimal => {
                let digits = lexical.strip_prefix(&['+', '-'][..]).unwrap_or(lexical);
                let mut parts = digits.splitn(2, '.');
                let int = parts.next().unwrap_or("");
                let frac = parts.next().unwrap_or("");
                (!int.is_empty() || !frac.is_empty())
                    && int.chars().all(|c| c.is_ascii_digit())
                    && frac.chars().all(|c| c.is_ascii_digit())
            }
            Datatype::Double => {
                matches!(lexical, "INF" | "-INF" | "NaN") || lexical.parse::<f64>().is_ok()
            }
            Datatype::Boolean => matches!(lexical, "true" | "false" | "1" | "0"),
            _ => true,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iri())
    }
}

// ==================== Literal ====================

/// A literal value: lexical form, datatype and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Datatype,
    lang: Option<String>,
}

impl Literal {
    /// Create a literal, validating the lexical form for the built-in numeric
    /// and boolean datatypes.
    pub fn typed(lexical: impl Into<String>, datatype: Datatype) -> CoreResult<Self> {
        let lexical = lexical.into();
        if !datatype.accepts(&lexical) {
            return Err(CoreError::invalid_literal(lexical, datatype.tag()));
        }
        Ok(Self {
            lexical,
            datatype,
            lang: None,
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: Datatype::String,
            lang: None,
        }
    }

    /// A language-tagged string. The tag is normalized to lowercase.
    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: Datatype::String,
            lang: Some(lang.into().to_ascii_lowercase()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: Datatype::Integer,
            lang: None,
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: Datatype::Double,
            lang: None,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: Datatype::Boolean,
            lang: None,
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.datatype {
            Datatype::Integer => self.lexical.parse().ok(),
            _ => None,
        }
    }

    /// Numeric value for any numeric datatype.
    pub fn as_f64(&self) -> Option<f64> {
        if self.datatype.is_numeric() {
            self.lexical.parse().ok()
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match (&self.datatype, self.lexical.as_str()) {
            (Datatype::Boolean, "true" | "1") => Some(true),
            (Datatype::Boolean, "false" | "0") => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "\"")?;
        match (&self.lang, &self.datatype) {
            (Some(lang), _) => write!(f, "@{}", lang),
            (None, Datatype::String) => Ok(()),
            (None, dt) => write!(f, "^^{}", dt),
        }
    }
}

// ==================== Term ====================

/// A value in object position: an entity reference or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Iri(_) => None,
        }
    }

    /// Returns the kind name of this term.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Iri(_) => "IRI",
            Term::Literal(_) => "literal",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Literal(Literal::string(s))
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::Literal(Literal::string(s))
    }
}

impl From<i64> for Term {
    fn from(i: i64) -> Self {
        Term::Literal(Literal::integer(i))
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Literal(Literal::boolean(b))
    }
}
