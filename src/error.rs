//! Error types for SPARQL repository access

use crate::rdf::RdfError;
use crate::sparql::DecodeError;
use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// The SPARQL protocol operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Update,
    Construct,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Query => f.write_str("Query"),
            Operation::Update => f.write_str("Update"),
            Operation::Construct => f.write_str("Construct"),
        }
    }
}

/// What could be recovered from the body of a failed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Body read fine but held nothing besides whitespace
    Empty,
    /// Raw body text
    Text(String),
    /// Reading the body failed
    Unreadable,
}

impl ResponseBody {
    /// Classify a body read attempt
    pub fn from_read<E>(read: Result<String, E>) -> Self {
        match read {
            Ok(text) if text.trim().is_empty() => ResponseBody::Empty,
            Ok(text) => ResponseBody::Text(text),
            Err(_) => ResponseBody::Unreadable,
        }
    }

    /// Body text, if any was read
    pub fn text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Empty => Ok(()),
            ResponseBody::Text(text) => write!(f, "Response body: \n{}", text),
            ResponseBody::Unreadable => f.write_str("Failed to read response body"),
        }
    }
}

/// Errors that can occur when talking to a SPARQL endpoint
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Request construction or network failure, including timeouts
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a status other than 200 OK
    #[error("{operation}: SPARQL request failed: {status}. {body}")]
    Request {
        operation: Operation,
        status: StatusCode,
        body: ResponseBody,
    },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A binding could not be turned into an RDF term
    #[error("Term error: {0}")]
    Term(#[from] RdfError),

    /// Endpoint is not a usable URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A repository option was rejected
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Digest authentication handshake failed
    #[error("Authentication error: {0}")]
    Authentication(String),
}

impl SparqlError {
    /// HTTP status of a failed request, if the endpoint answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SparqlError::Request { status, .. } => Some(*status),
            SparqlError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, SparqlError::Transport(e) if e.is_timeout())
    }
}

pub type SparqlResult<T> = Result<T, SparqlError>;
