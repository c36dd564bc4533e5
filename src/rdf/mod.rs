//! RDF terms as returned by SPARQL endpoints
//!
//! - Terms and triples wrapping `oxrdf` primitives
//! - Turtle decoding of CONSTRUCT responses (`rio_turtle`)
//! - Native values for typed literals
//!
//! # Example
//!
//! ```rust
//! use sparql_repo::rdf::{Literal, NamedNode, RdfTerm};
//!
//! let iri: RdfTerm = NamedNode::new("http://example.org/alice").unwrap().into();
//! assert!(iri.is_named_node());
//!
//! let name: RdfTerm = Literal::new_language_tagged_literal("Alice", "en").unwrap().into();
//! assert!(matches!(name, RdfTerm::LanguageLiteral(_)));
//! ```

mod turtle;
mod types;
mod value;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    RdfTerm, Triple,
};

pub use turtle::{ParseError, ParseResult, TurtleDecoder};

pub use value::{DateFormat, NativeValue};

/// `xsd:string`, the datatype of literals without language tag or datatype
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
