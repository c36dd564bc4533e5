//! SPARQL query results (`application/sparql-results+json`)
//!
//! A [`QueryResult`] mirrors the JSON document as sent by the endpoint. Terms
//! are materialized on demand: [`Binding::to_term`] is strict, while
//! [`QueryResult::bindings`] and [`QueryResult::solutions`] skip bindings
//! that fail to materialize so one bad cell never discards a whole response.

use crate::rdf::{BlankNode, Literal, NamedNode, ParseError, RdfError, RdfResult, RdfTerm, XSD_STRING};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::Read;
use thiserror::Error;

/// One result row as sent: variable name → binding, unbound variables absent
pub type BindingRow = IndexMap<String, Binding>;

/// One materialized result row: variable name → term
pub type Solution = IndexMap<String, RdfTerm>;

/// Response body decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed or mis-shaped JSON results document
    #[error("JSON results error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed Turtle document
    #[error("Turtle error: {0}")]
    Turtle(#[from] ParseError),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Term kind announced by the `type` member of a binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BindingKind {
    /// `uri`
    Uri,
    /// `literal`
    Literal,
    /// `typed-literal`
    TypedLiteral,
    /// `bnode`
    BlankNode,
    /// Anything else, kept verbatim
    Other(String),
}

impl BindingKind {
    /// The wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            BindingKind::Uri => "uri",
            BindingKind::Literal => "literal",
            BindingKind::TypedLiteral => "typed-literal",
            BindingKind::BlankNode => "bnode",
            BindingKind::Other(s) => s,
        }
    }
}

impl Default for BindingKind {
    fn default() -> Self {
        BindingKind::Other(String::new())
    }
}

impl From<String> for BindingKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "uri" => BindingKind::Uri,
            "literal" => BindingKind::Literal,
            "typed-literal" => BindingKind::TypedLiteral,
            "bnode" => BindingKind::BlankNode,
            _ => BindingKind::Other(s),
        }
    }
}

impl From<BindingKind> for String {
    fn from(kind: BindingKind) -> Self {
        match kind {
            BindingKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single result cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Term kind
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: BindingKind,
    /// Lexical value, IRI or blank node label
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
    /// Language tag (`literal` only)
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Datatype IRI (`typed-literal` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl Binding {
    /// `uri` binding
    pub fn uri(iri: impl Into<String>) -> Self {
        Self { kind: BindingKind::Uri, value: iri.into(), ..Default::default() }
    }

    /// `bnode` binding
    pub fn blank_node(label: impl Into<String>) -> Self {
        Self { kind: BindingKind::BlankNode, value: label.into(), ..Default::default() }
    }

    /// `literal` binding without language tag
    pub fn literal(value: impl Into<String>) -> Self {
        Self { kind: BindingKind::Literal, value: value.into(), ..Default::default() }
    }

    /// `literal` binding with language tag
    pub fn language_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Literal,
            value: value.into(),
            lang: Some(lang.into()),
            datatype: None,
        }
    }

    /// `typed-literal` binding
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::TypedLiteral,
            value: value.into(),
            lang: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Materialize this binding as an RDF term.
    ///
    /// Plain literals without a language tag become `xsd:string` typed
    /// literals; a `datatype` member on a `literal` binding is not consulted.
    pub fn to_term(&self) -> RdfResult<RdfTerm> {
        match &self.kind {
            BindingKind::BlankNode => Ok(RdfTerm::BlankNode(BlankNode::new(&self.value)?)),
            BindingKind::Uri => Ok(RdfTerm::NamedNode(NamedNode::new(&self.value)?)),
            BindingKind::Literal => match self.lang.as_deref() {
                Some(lang) if !lang.is_empty() => Ok(RdfTerm::LanguageLiteral(
                    Literal::new_language_tagged_literal(self.value.as_str(), lang)?,
                )),
                _ => Ok(RdfTerm::TypedLiteral(Literal::new_typed_literal(
                    self.value.as_str(),
                    NamedNode::new(XSD_STRING)?,
                ))),
            },
            BindingKind::TypedLiteral => {
                let datatype = NamedNode::new(self.datatype.as_deref().unwrap_or_default())?;
                Ok(RdfTerm::TypedLiteral(Literal::new_typed_literal(self.value.as_str(), datatype)))
            }
            BindingKind::Other(kind) => Err(RdfError::UnknownTermKind(kind.clone())),
        }
    }
}

/// The `head` member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    /// Links to metadata about the results
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<String>,
    /// Declared variables, in projection order
    #[serde(default, deserialize_with = "nullable")]
    pub vars: Vec<String>,
}

/// The `results` member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    /// Whether the endpoint reports duplicate-free rows
    #[serde(default, deserialize_with = "nullable")]
    pub distinct: bool,
    /// Whether the endpoint reports rows in a defined order
    #[serde(default, deserialize_with = "nullable")]
    pub ordered: bool,
    /// Result rows, in response order. A `null` row decodes as an empty row
    /// and `null` cells are dropped.
    #[serde(default, deserialize_with = "binding_rows")]
    pub bindings: Vec<BindingRow>,
}

/// A decoded SPARQL JSON results document
///
/// Missing `head` or `results` members decode to empty values, so `{}` is a
/// valid, empty result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default, deserialize_with = "nullable")]
    pub head: Head,
    #[serde(default, deserialize_with = "nullable")]
    pub results: Results,
    /// Answer of an ASK query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

impl QueryResult {
    /// Decode a results document from a byte stream
    pub fn from_reader<R: Read>(reader: R) -> DecodeResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Decode a results document from bytes
    pub fn from_slice(body: &[u8]) -> DecodeResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Declared variables
    pub fn variables(&self) -> &[String] {
        &self.head.vars
    }

    /// Raw result rows
    pub fn rows(&self) -> &[BindingRow] {
        &self.results.bindings
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.results.bindings.len()
    }

    /// Whether there are no result rows
    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }

    /// Terms bound to each declared variable, in declaration then row order.
    ///
    /// A variable only gets an entry once at least one of its bindings
    /// materializes; unbound and failing cells are skipped.
    pub fn bindings(&self) -> IndexMap<String, Vec<RdfTerm>> {
        let mut by_variable: IndexMap<String, Vec<RdfTerm>> = IndexMap::new();

        for var in &self.head.vars {
            if by_variable.contains_key(var) {
                continue;
            }
            let terms: Vec<RdfTerm> = self
                .results
                .bindings
                .iter()
                .filter_map(|row| row.get(var))
                .filter_map(|binding| binding.to_term().ok())
                .collect();
            if !terms.is_empty() {
                by_variable.insert(var.clone(), terms);
            }
        }

        by_variable
    }

    /// Every row with its bound variables materialized, in response order.
    ///
    /// Rows are always emitted; a cell that fails to materialize is left out
    /// of its row.
    pub fn solutions(&self) -> Vec<Solution> {
        self.results
            .bindings
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|(var, binding)| {
                        binding.to_term().ok().map(|term| (var.clone(), term))
                    })
                    .collect()
            })
            .collect()
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn binding_rows<'de, D>(deserializer: D) -> Result<Vec<BindingRow>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<Option<IndexMap<String, Option<Binding>>>>> =
        Option::deserialize(deserializer)?;

    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| {
            row.unwrap_or_default()
                .into_iter()
                .filter_map(|(var, cell)| cell.map(|binding| (var, binding)))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"{
        "head": {"vars": ["s", "name", "age"]},
        "results": {"bindings": [
            {"s": {"type": "uri", "value": "http://example.org/alice"},
             "name": {"type": "literal", "value": "Alice", "xml:lang": "en"},
             "age": {"type": "typed-literal", "value": "42",
                     "datatype": "http://www.w3.org/2001/XMLSchema#integer"}},
            {"s": {"type": "bnode", "value": "b1"},
             "name": {"type": "literal", "value": "Bob"}},
            {"name": {"type": "foo", "value": "ignored"},
             "age": {"type": "typed-literal", "value": "7", "datatype": "not an iri"}}
        ]}
    }"#;

    #[test]
    fn test_parse_document() {
        let result = QueryResult::from_slice(PEOPLE.as_bytes()).unwrap();
        assert_eq!(result.variables(), ["s", "name", "age"]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.rows()[1].get("s"), Some(&Binding::blank_node("b1")));
        assert!(!result.rows()[1].contains_key("age"));
        assert_eq!(result.rows()[2]["name"].kind, BindingKind::Other("foo".to_string()));
    }

    #[test]
    fn test_missing_members_decode_to_empty() {
        let result = QueryResult::from_reader("{}".as_bytes()).unwrap();
        assert!(result.variables().is_empty());
        assert!(result.is_empty());
        assert_eq!(result.boolean, None);

        let result = QueryResult::from_slice(br#"{"head": null, "results": {"bindings": null}}"#).unwrap();
        assert_eq!(result, QueryResult::default());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            QueryResult::from_slice(b"{\"head\": "),
            Err(DecodeError::Json(_))
        ));
        assert!(QueryResult::from_slice(br#"{"head": {"vars": "s"}}"#).is_err());
        assert!(QueryResult::from_slice(b"").is_err());
    }

    #[test]
    fn test_ask_and_metadata() {
        let result = QueryResult::from_slice(
            br#"{"head": {"link": ["http://example.org/meta"]}, "boolean": true,
                 "results": {"distinct": true, "ordered": false, "bindings": []}}"#,
        )
        .unwrap();
        assert_eq!(result.boolean, Some(true));
        assert_eq!(result.head.link, ["http://example.org/meta"]);
        assert!(result.results.distinct);
        assert!(!result.results.ordered);
    }

    #[test]
    fn test_term_kinds() {
        let iri = Binding::uri("http://example.org/x").to_term().unwrap();
        assert_eq!(iri, RdfTerm::NamedNode(NamedNode::new("http://example.org/x").unwrap()));
        assert_eq!(iri.value(), "http://example.org/x");

        match Binding::literal("hello").to_term().unwrap() {
            RdfTerm::TypedLiteral(l) => {
                assert_eq!(l.value(), "hello");
                assert_eq!(l.datatype().as_str(), XSD_STRING);
            }
            other => panic!("expected typed literal, got {:?}", other),
        }

        match Binding::language_literal("hi", "en").to_term().unwrap() {
            RdfTerm::LanguageLiteral(l) => {
                assert_eq!(l.value(), "hi");
                assert_eq!(l.language(), Some("en"));
            }
            other => panic!("expected language literal, got {:?}", other),
        }

        let xsd_integer = "http://www.w3.org/2001/XMLSchema#integer";
        match Binding::typed_literal("42", xsd_integer).to_term().unwrap() {
            RdfTerm::TypedLiteral(l) => {
                assert_eq!(l.value(), "42");
                assert_eq!(l.datatype().as_str(), xsd_integer);
            }
            other => panic!("expected typed literal, got {:?}", other),
        }

        assert!(Binding::blank_node("b0").to_term().unwrap().is_blank_node());
    }

    #[test]
    fn test_empty_language_tag_is_untagged() {
        let binding = Binding::language_literal("hello", "");
        match binding.to_term().unwrap() {
            RdfTerm::TypedLiteral(l) => assert!(l.is_string()),
            other => panic!("expected typed literal, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_single_binding_errors() {
        let unknown = Binding { kind: "foo".to_string().into(), value: "x".into(), ..Default::default() };
        assert_eq!(unknown.to_term(), Err(RdfError::UnknownTermKind("foo".to_string())));

        assert!(matches!(Binding::uri("no scheme").to_term(), Err(RdfError::InvalidIri(_))));
        assert!(matches!(
            Binding::blank_node("not valid").to_term(),
            Err(RdfError::InvalidBlankNode(_))
        ));
        assert!(matches!(
            Binding::typed_literal("1", "::").to_term(),
            Err(RdfError::InvalidIri(_))
        ));
        let missing_datatype = Binding { kind: BindingKind::TypedLiteral, value: "1".into(), ..Default::default() };
        assert!(missing_datatype.to_term().is_err());
    }

    #[test]
    fn test_bindings_by_variable_skips_failures() {
        let result = QueryResult::from_slice(PEOPLE.as_bytes()).unwrap();
        let by_var = result.bindings();

        assert!(by_var.len() <= result.variables().len());
        assert_eq!(by_var.keys().collect::<Vec<_>>(), ["s", "name", "age"]);
        assert_eq!(by_var["s"].len(), 2);
        assert_eq!(by_var["name"].iter().map(RdfTerm::value).collect::<Vec<_>>(), ["Alice", "Bob"]);
        assert_eq!(by_var["age"].len(), 1);
        for terms in by_var.values() {
            assert!(terms.len() <= result.len());
        }
    }

    #[test]
    fn test_bindings_by_variable_omits_unmaterialized_variables() {
        let result = QueryResult::from_slice(
            br#"{"head": {"vars": ["x", "y", "x"]},
                 "results": {"bindings": [{"x": {"type": "uri", "value": "http://example.org/1"},
                                           "y": {"type": "foo", "value": "?"}}]}}"#,
        )
        .unwrap();
        let by_var = result.bindings();
        assert_eq!(by_var.len(), 1);
        assert_eq!(by_var["x"].len(), 1);
        assert!(!by_var.contains_key("y"));
    }

    #[test]
    fn test_solutions_keep_every_row() {
        let result = QueryResult::from_slice(PEOPLE.as_bytes()).unwrap();
        let solutions = result.solutions();

        assert_eq!(solutions.len(), 3);
        assert_eq!(solutions[0].len(), 3);
        assert_eq!(solutions[0]["age"].value(), "42");
        assert_eq!(solutions[1].len(), 2);
        assert!(solutions[1]["s"].is_blank_node());
        assert!(solutions[2].is_empty());
    }

    #[test]
    fn test_materialization_is_repeatable() {
        let result = QueryResult::from_slice(PEOPLE.as_bytes()).unwrap();
        assert_eq!(result.solutions(), result.solutions());
        assert_eq!(result.bindings(), result.bindings());
    }

    #[test]
    fn test_null_rows_and_cells_are_tolerated() {
        let result = QueryResult::from_slice(
            br#"{"head": {"vars": ["x", "y"]},
                 "results": {"bindings": [
                     null,
                     {"x": {"type": "uri", "value": "http://example.org/1"}, "y": null}
                 ]}}"#,
        )
        .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.rows()[0].is_empty());
        assert!(!result.rows()[1].contains_key("y"));

        let by_var = result.bindings();
        assert_eq!(by_var["x"].len(), 1);
        assert!(!by_var.contains_key("y"));

        let solutions = result.solutions();
        assert!(solutions[0].is_empty());
        assert_eq!(solutions[1]["x"].value(), "http://example.org/1");
    }
}
