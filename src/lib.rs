//! sparql-repo — Client library for SPARQL endpoints
//!
//! Talks to RDF triple stores over the SPARQL 1.1 protocol and turns their
//! answers into typed RDF terms.
//!
//! - **`client`** — [`Repo`], an endpoint handle implementing
//!   [`SparqlClient`]: query, update and construct, with optional digest
//!   authentication and a request timeout.
//! - **`sparql`** — [`QueryResult`], the decoded
//!   `application/sparql-results+json` document, with term materialization
//!   per binding, per variable and per row.
//! - **`rdf`** — terms and triples (wrapping `oxrdf`), the Turtle decoder used
//!   for CONSTRUCT answers, native values for typed literals.
//!
//! # Quick Start
//!
//! ```no_run
//! use sparql_repo::{Repo, SparqlClient};
//! use sparql_repo::client::timeout;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sparql_repo::SparqlError> {
//!     let repo = Repo::open(
//!         "http://localhost:3030/ds/sparql",
//!         [timeout(Duration::from_secs(10))],
//!     )?;
//!
//!     let result = repo.query("SELECT ?s WHERE { ?s ?p ?o } LIMIT 10").await?;
//!     for solution in result.solutions() {
//!         if let Some(s) = solution.get("s") {
//!             println!("{}", s);
//!         }
//!     }
//!
//!     repo.update("INSERT DATA { <urn:a> <urn:b> <urn:c> }").await?;
//!     let triples = repo.construct("CONSTRUCT WHERE { ?s ?p ?o }").await?;
//!     println!("{} triples", triples.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod rdf;
pub mod sparql;

pub use client::{Repo, RepoConfig, RepoOption, SparqlClient, UPDATE_OK};
pub use error::{Operation, ResponseBody, SparqlError, SparqlResult};
pub use rdf::{BlankNode, Literal, NamedNode, RdfError, RdfTerm, Triple};
pub use sparql::{Binding, BindingKind, BindingRow, QueryResult, Solution};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
