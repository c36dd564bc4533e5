//! SPARQL repository client
//!
//! [`Repo`] talks to one SPARQL endpoint over the SPARQL 1.1 protocol. Every
//! operation is a single form-encoded POST; nothing is retried and no state
//! is kept between calls, so a `Repo` can be cloned and shared freely.
//! Dropping an operation's future aborts the exchange.

mod config;
mod transport;

pub use config::{
    base_iri, date_format, digest_auth, timeout, user_agent, DigestCredentials, RepoConfig,
    RepoOption,
};

use crate::error::{Operation, ResponseBody, SparqlError, SparqlResult};
use crate::rdf::{NativeValue, RdfTerm, Triple, TurtleDecoder};
use crate::sparql::{DecodeError, QueryResult};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use tracing::{debug, info, trace};
use transport::Transport;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const TEXT_TURTLE: &str = "text/turtle";

/// Token returned by a successful update
pub const UPDATE_OK: &str = "OK";

/// The SPARQL protocol operations
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// Run a query and decode its `application/sparql-results+json` answer
    async fn query(&self, query: &str) -> SparqlResult<QueryResult>;

    /// Run an update; returns [`UPDATE_OK`] on success
    async fn update(&self, update: &str) -> SparqlResult<String>;

    /// Run a CONSTRUCT (or DESCRIBE) query and decode the Turtle answer
    async fn construct(&self, query: &str) -> SparqlResult<Vec<Triple>>;
}

/// A remote RDF repository reachable through a SPARQL endpoint
#[derive(Debug, Clone)]
pub struct Repo {
    endpoint: Url,
    transport: Transport,
    turtle: TurtleDecoder,
    config: RepoConfig,
}

impl Repo {
    /// Open a repository with the default configuration
    pub fn new(endpoint: &str) -> SparqlResult<Self> {
        Self::with_config(endpoint, RepoConfig::default())
    }

    /// Open a repository, applying `options` in order.
    ///
    /// # Example
    /// ```no_run
    /// # use sparql_repo::client::{digest_auth, timeout, Repo};
    /// # use std::time::Duration;
    /// let repo = Repo::open(
    ///     "http://localhost:3030/ds/sparql",
    ///     [digest_auth("admin", "pw"), timeout(Duration::from_secs(30))],
    /// ).unwrap();
    /// ```
    pub fn open(endpoint: &str, options: impl IntoIterator<Item = RepoOption>) -> SparqlResult<Self> {
        let mut config = RepoConfig::default();
        config.apply_all(options)?;
        Self::with_config(endpoint, config)
    }

    /// Open a repository with a prepared configuration
    pub fn with_config(endpoint: &str, config: RepoConfig) -> SparqlResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SparqlError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SparqlError::InvalidEndpoint(format!(
                "{}: unsupported scheme {}",
                endpoint,
                endpoint.scheme()
            )));
        }

        let transport = Transport::new(&config)?;
        let turtle = config.turtle_decoder()?;

        info!(
            "Opened SPARQL repository {} (digest auth: {}, timeout: {:?})",
            endpoint,
            config.digest.is_some(),
            config.timeout
        );

        Ok(Self {
            endpoint,
            transport,
            turtle,
            config,
        })
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Active configuration
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Native value of a term using the configured date format
    pub fn native_value(&self, term: &RdfTerm) -> SparqlResult<Option<NativeValue>> {
        Ok(NativeValue::from_term(term, &self.config.date_format)?)
    }

    async fn post(
        &self,
        operation: Operation,
        accept: &str,
        fields: &[(&str, &str)],
    ) -> SparqlResult<Response> {
        debug!("{} request to {}", operation, self.endpoint);
        let response = self.transport.post_form(&self.endpoint, accept, fields).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = ResponseBody::from_read(response.text().await);
            return Err(SparqlError::Request {
                operation,
                status,
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SparqlClient for Repo {
    async fn query(&self, query: &str) -> SparqlResult<QueryResult> {
        trace!("SPARQL query: {}", query);
        let response = self
            .post(Operation::Query, SPARQL_RESULTS_JSON, &[("query", query)])
            .await?;

        let body = response.bytes().await?;
        let result = QueryResult::from_slice(&body)?;
        debug!("Decoded {} solutions over {} variables", result.len(), result.variables().len());
        Ok(result)
    }

    async fn update(&self, update: &str) -> SparqlResult<String> {
        trace!("SPARQL update: {}", update);
        // Same Accept as query; the body is not used
        self.post(Operation::Update, SPARQL_RESULTS_JSON, &[("update", update)])
            .await?;
        Ok(UPDATE_OK.to_string())
    }

    async fn construct(&self, query: &str) -> SparqlResult<Vec<Triple>> {
        trace!("SPARQL construct: {}", query);
        let response = self
            .post(
                Operation::Construct,
                TEXT_TURTLE,
                &[("query", query), ("format", TEXT_TURTLE)],
            )
            .await?;

        let body = response.bytes().await?;
        let triples = self
            .turtle
            .decode_all(body.as_ref())
            .map_err(DecodeError::from)?;
        debug!("Decoded {} triples", triples.len());
        Ok(triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_open_rejects_bad_endpoint() {
        assert!(matches!(
            Repo::new("not a url"),
            Err(SparqlError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            Repo::new("ftp://example.org/sparql"),
            Err(SparqlError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_open_fails_on_first_bad_option() {
        let err = Repo::open(
            "http://localhost:3030/sparql",
            [digest_auth("", "pw"), timeout(Duration::from_secs(1))],
        )
        .unwrap_err();
        assert!(matches!(err, SparqlError::InvalidOption(_)));
    }

    #[test]
    fn test_open_applies_options() {
        let repo = Repo::open(
            "http://localhost:3030/sparql",
            [timeout(Duration::from_millis(250)), digest_auth("alice", "pw")],
        )
        .unwrap();
        assert_eq!(repo.endpoint().as_str(), "http://localhost:3030/sparql");
        assert_eq!(repo.config().timeout, Some(Duration::from_millis(250)));
        assert!(repo.config().digest.is_some());
    }

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Repo>();
    }
}
