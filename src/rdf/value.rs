//! Native values for typed literals

use super::{Literal, RdfError, RdfResult, RdfTerm};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Layout expected for `xsd:dateTime` lexical values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// RFC 3339, the layout most triple stores emit
    #[default]
    Rfc3339,
    /// A chrono `strftime` pattern; values without an offset are read as UTC
    Pattern(String),
}

impl DateFormat {
    /// Parse a lexical date-time value with this layout
    pub fn parse(&self, value: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(value).ok(),
            DateFormat::Pattern(pattern) => DateTime::parse_from_str(value, pattern)
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(value, pattern)
                        .ok()
                        .map(|naive| naive.and_utc().fixed_offset())
                }),
        }
    }
}

/// Native Rust value of a literal term
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// `xsd:string` and language-tagged literals
    String(String),
    /// `xsd:boolean`
    Boolean(bool),
    /// `xsd:integer` and its derived types
    Integer(i64),
    /// `xsd:decimal`, `xsd:double`, `xsd:float`
    Double(f64),
    /// `xsd:dateTime`
    DateTime(DateTime<FixedOffset>),
    /// Any other datatype, as its lexical value
    Other(String),
}

impl NativeValue {
    /// Native value of a term; `None` for IRIs and blank nodes
    pub fn from_term(term: &RdfTerm, date_format: &DateFormat) -> RdfResult<Option<Self>> {
        match term {
            RdfTerm::NamedNode(_) | RdfTerm::BlankNode(_) => Ok(None),
            RdfTerm::LanguageLiteral(l) => Ok(Some(NativeValue::String(l.value().to_string()))),
            RdfTerm::TypedLiteral(l) => Self::from_literal(l, date_format).map(Some),
        }
    }

    /// Native value of a literal, by datatype
    pub fn from_literal(literal: &Literal, date_format: &DateFormat) -> RdfResult<Self> {
        if literal.language().is_some() {
            return Ok(NativeValue::String(literal.value().to_string()));
        }

        let datatype = literal.datatype();
        let value = literal.value();
        let local = match datatype.as_str().strip_prefix(XSD) {
            Some(local) => local,
            None => return Ok(NativeValue::Other(value.to_string())),
        };

        let invalid = || RdfError::InvalidLexical {
            value: value.to_string(),
            datatype: datatype.as_str().to_string(),
        };

        match local {
            "string" | "normalizedString" | "token" => Ok(NativeValue::String(value.to_string())),
            "boolean" => match value.trim() {
                "true" | "1" => Ok(NativeValue::Boolean(true)),
                "false" | "0" => Ok(NativeValue::Boolean(false)),
                _ => Err(invalid()),
            },
            "integer" | "long" | "int" | "short" | "byte" | "nonNegativeInteger"
            | "nonPositiveInteger" | "positiveInteger" | "negativeInteger"
            | "unsignedLong" | "unsignedInt" | "unsignedShort" | "unsignedByte" => value
                .trim()
                .trim_start_matches('+')
                .parse::<i64>()
                .map(NativeValue::Integer)
                .map_err(|_| invalid()),
            "decimal" | "double" | "float" => parse_double(value.trim())
                .map(NativeValue::Double)
                .ok_or_else(invalid),
            "dateTime" => date_format
                .parse(value.trim())
                .map(NativeValue::DateTime)
                .ok_or_else(invalid),
            _ => Ok(NativeValue::Other(value.to_string())),
        }
    }
}

fn parse_double(value: &str) -> Option<f64> {
    match value {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => value.parse::<f64>().ok(),
    }
}
