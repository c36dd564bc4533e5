//! Repository configuration and options

use crate::error::{SparqlError, SparqlResult};
use crate::rdf::{DateFormat, TurtleDecoder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Credentials for HTTP digest authentication
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DigestCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Configuration shared by every request a repository makes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Request timeout, `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Digest authentication credentials
    pub digest: Option<DigestCredentials>,
    /// Layout of `xsd:dateTime` values for native value conversion
    pub date_format: DateFormat,
    /// User-Agent header
    pub user_agent: String,
    /// Base IRI for relative IRIs in CONSTRUCT responses
    pub base_iri: Option<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            digest: None,
            date_format: DateFormat::default(),
            user_agent: format!("sparql-repo/{}", crate::VERSION),
            base_iri: None,
        }
    }
}

/// A single configuration change, applied in order when opening a repository
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOption {
    DigestAuth(DigestCredentials),
    Timeout(Duration),
    DateFormat(DateFormat),
    UserAgent(String),
    BaseIri(String),
}

/// Authenticate every request with HTTP digest authentication
pub fn digest_auth(username: impl Into<String>, password: impl Into<String>) -> RepoOption {
    RepoOption::DigestAuth(DigestCredentials {
        username: username.into(),
        password: password.into(),
    })
}

/// Time out every request after `duration`
pub fn timeout(duration: Duration) -> RepoOption {
    RepoOption::Timeout(duration)
}

/// Parse `xsd:dateTime` values with `format`
pub fn date_format(format: DateFormat) -> RepoOption {
    RepoOption::DateFormat(format)
}

/// Send `agent` as User-Agent
pub fn user_agent(agent: impl Into<String>) -> RepoOption {
    RepoOption::UserAgent(agent.into())
}

/// Resolve relative IRIs of CONSTRUCT responses against `iri`
pub fn base_iri(iri: impl Into<String>) -> RepoOption {
    RepoOption::BaseIri(iri.into())
}

impl RepoConfig {
    /// Apply one option, rejecting invalid values
    pub fn apply(&mut self, option: RepoOption) -> SparqlResult<()> {
        match option {
            RepoOption::DigestAuth(credentials) => {
                if credentials.username.is_empty() {
                    return Err(SparqlError::InvalidOption(
                        "digest authentication requires a username".to_string(),
                    ));
                }
                self.digest = Some(credentials);
            }
            RepoOption::Timeout(duration) => {
                if duration.is_zero() {
                    return Err(SparqlError::InvalidOption("timeout must be positive".to_string()));
                }
                self.timeout = Some(duration);
            }
            RepoOption::DateFormat(format) => {
                if matches!(&format, DateFormat::Pattern(p) if p.is_empty()) {
                    return Err(SparqlError::InvalidOption("empty date format pattern".to_string()));
                }
                self.date_format = format;
            }
            RepoOption::UserAgent(agent) => {
                if agent.trim().is_empty() {
                    return Err(SparqlError::InvalidOption("empty user agent".to_string()));
                }
                self.user_agent = agent;
            }
            RepoOption::BaseIri(iri) => {
                TurtleDecoder::with_base_iri(&iri)
                    .map_err(|e| SparqlError::InvalidOption(format!("base IRI: {}", e)))?;
                self.base_iri = Some(iri);
            }
        }
        Ok(())
    }

    /// Apply options in order, stopping at the first invalid one
    pub fn apply_all(&mut self, options: impl IntoIterator<Item = RepoOption>) -> SparqlResult<()> {
        for option in options {
            self.apply(option)?;
        }
        Ok(())
    }

    /// Turtle decoder for CONSTRUCT responses
    pub(crate) fn turtle_decoder(&self) -> SparqlResult<TurtleDecoder> {
        match &self.base_iri {
            Some(iri) => TurtleDecoder::with_base_iri(iri)
                .map_err(|e| SparqlError::InvalidOption(format!("base IRI: {}", e))),
            None => Ok(TurtleDecoder::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepoConfig::default();
        assert_eq!(config.timeout, None);
        assert!(config.digest.is_none());
        assert_eq!(config.date_format, DateFormat::Rfc3339);
        assert!(config.user_agent.starts_with("sparql-repo/"));
    }

    #[test]
    fn test_options_apply_in_order() {
        let mut config = RepoConfig::default();
        config
            .apply_all([
                timeout(Duration::from_secs(5)),
                digest_auth("alice", "secret"),
                timeout(Duration::from_secs(10)),
            ])
            .unwrap();

        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.digest.as_ref().unwrap().username, "alice");
    }

    #[test]
    fn test_first_invalid_option_aborts() {
        let mut config = RepoConfig::default();
        let err = config
            .apply_all([
                timeout(Duration::from_secs(1)),
                timeout(Duration::ZERO),
                digest_auth("alice", "secret"),
            ])
            .unwrap_err();

        assert!(matches!(err, SparqlError::InvalidOption(_)));
        assert!(config.digest.is_none());

        assert!(config.apply(digest_auth("", "pw")).is_err());
        assert!(config.apply(user_agent("  ")).is_err());
        assert!(config.apply(base_iri("relative/path")).is_err());
        assert!(config.apply(date_format(DateFormat::Pattern(String::new()))).is_err());
    }

    #[test]
    fn test_password_not_debug_printed() {
        let credentials = DigestCredentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("secret"));
    }

    #[test]
    fn test_config_from_json() {
        let config: RepoConfig = serde_json::from_str(
            r#"{"timeout": {"secs": 3, "nanos": 0}, "date_format": {"pattern": "%Y-%m-%d %H:%M:%S"}}"#,
        )
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.date_format, DateFormat::Pattern("%Y-%m-%d %H:%M:%S".to_string()));
        assert!(config.user_agent.starts_with("sparql-repo/"));
    }
}
