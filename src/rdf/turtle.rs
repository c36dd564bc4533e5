//! Turtle triple decoding for CONSTRUCT responses

use super::{BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfSubject, Triple};
use oxiri::Iri;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};
use std::io::BufRead;
use thiserror::Error;

/// Turtle parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error or unsupported construct
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

impl From<TurtleError> for ParseError {
    fn from(e: TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

/// Decodes a Turtle document into triples, in document order
#[derive(Debug, Clone, Default)]
pub struct TurtleDecoder {
    base_iri: Option<Iri<String>>,
}

impl TurtleDecoder {
    /// Decoder without a base IRI; relative IRIs in the document are errors
    pub fn new() -> Self {
        Self { base_iri: None }
    }

    /// Decoder resolving relative IRIs against `base`
    pub fn with_base_iri(base: &str) -> Result<Self, RdfError> {
        let iri = Iri::parse(base.to_string())
            .map_err(|e| RdfError::InvalidIri(format!("{}: {}", base, e)))?;
        Ok(Self { base_iri: Some(iri) })
    }

    /// Decode every triple of the document
    pub fn decode_all<R: BufRead>(&self, reader: R) -> ParseResult<Vec<Triple>> {
        let mut parser = TurtleParser::new(reader, self.base_iri.clone());
        let mut triples = Vec::new();

        let res: Result<(), TurtleError> = parser.parse_all(&mut |t| {
            let subject = convert_subject(t.subject).map_err(invalid_data)?;
            let predicate = convert_predicate(t.predicate).map_err(invalid_data)?;
            let object = convert_object(t.object).map_err(invalid_data)?;

            triples.push(Triple::new(subject, predicate, object));
            Ok(())
        });

        res?;
        Ok(triples)
    }

    /// Decode a Turtle string
    pub fn decode_str(&self, input: &str) -> ParseResult<Vec<Triple>> {
        self.decode_all(input.as_bytes())
    }
}

fn invalid_data(e: RdfError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
}

fn convert_subject(s: model::Subject<'_>) -> Result<RdfSubject, RdfError> {
    match s {
        model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(NamedNode::new(n.iri)?)),
        model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(BlankNode::new(b.id)?)),
        // RDF-star quoted triples
        _ => Err(RdfError::UnknownTermKind("triple".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode<'_>) -> Result<RdfPredicate, RdfError> {
    RdfPredicate::new(p.iri)
}

fn convert_object(o: model::Term<'_>) -> Result<RdfObject, RdfError> {
    match o {
        model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(NamedNode::new(n.iri)?)),
        model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(BlankNode::new(b.id)?)),
        model::Term::Literal(l) => match l {
            model::Literal::Simple { value } => {
                Ok(RdfObject::Literal(Literal::new_simple_literal(value)))
            }
            model::Literal::LanguageTaggedString { value, language } => Ok(RdfObject::Literal(
                Literal::new_language_tagged_literal(value, language)?,
            )),
            model::Literal::Typed { value, datatype } => {
                let dt = NamedNode::new(datatype.iri)?;
                Ok(RdfObject::Literal(Literal::new_typed_literal(value, dt)))
            }
        },
        _ => Err(RdfError::UnknownTermKind("triple".to_string())),
    }
}
