//! HTTP transport: form POSTs with optional digest authentication

use super::config::{DigestCredentials, RepoConfig};
use crate::error::{SparqlError, SparqlResult};
use digest_auth::AuthContext;
use reqwest::header::{
    HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, WWW_AUTHENTICATE,
};
use reqwest::{Client, Response, StatusCode, Url};
use tracing::debug;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Sends SPARQL protocol requests.
///
/// With credentials configured, a `401` carrying a digest challenge is
/// answered once with an `Authorization` header computed for the same body.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    digest: Option<DigestCredentials>,
}

impl Transport {
    pub(crate) fn new(config: &RepoConfig) -> SparqlResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            digest: config.digest.clone(),
        })
    }

    /// POST an url-encoded form to `url`
    pub(crate) async fn post_form(
        &self,
        url: &Url,
        accept: &str,
        fields: &[(&str, &str)],
    ) -> SparqlResult<Response> {
        let body = encode_form(fields);
        let response = self.send(url, accept, &body, None).await?;

        let credentials = match &self.digest {
            Some(credentials) if response.status() == StatusCode::UNAUTHORIZED => credentials,
            _ => return Ok(response),
        };
        let challenge = match digest_challenge(response.headers()) {
            Some(challenge) => challenge,
            None => return Ok(response),
        };
        drop(response);

        debug!("Answering digest challenge from {}", url);
        let authorization = digest_authorization(credentials, &challenge, url, &body)?;
        self.send(url, accept, &body, Some(authorization)).await
    }

    async fn send(
        &self,
        url: &Url,
        accept: &str,
        body: &str,
        authorization: Option<String>,
    ) -> SparqlResult<Response> {
        let mut request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(CONTENT_LENGTH, body.len())
            .header(ACCEPT, accept)
            .body(body.to_string());
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request.send().await?;
        debug!("{} answered {}", url, response.status());
        Ok(response)
    }
}

pub(crate) fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

/// The first `Digest` challenge among the `WWW-Authenticate` headers
fn digest_challenge(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::trim_start)
        .find(|challenge| {
            challenge
                .get(..6)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
        })
        .map(str::to_string)
}

fn digest_authorization(
    credentials: &DigestCredentials,
    challenge: &str,
    url: &Url,
    body: &str,
) -> SparqlResult<String> {
    let mut prompt = digest_auth::parse(challenge)
        .map_err(|e| SparqlError::Authentication(format!("invalid digest challenge: {}", e)))?;

    let uri = &url[url::Position::BeforePath..];
    let context = AuthContext::new_post(
        credentials.username.as_str(),
        credentials.password.as_str(),
        uri,
        Some(body.as_bytes()),
    );

    let answer = prompt
        .respond(&context)
        .map_err(|e| SparqlError::Authentication(e.to_string()))?;
    Ok(answer.to_header_string())
}
