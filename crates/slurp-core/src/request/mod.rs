//! Request building: stable stream inputs in, a single-use signed request out.
//!
//! Signatures embed a timestamp and nonce, so a `SignedRequest` is built fresh
//! before every connection attempt and dropped afterwards.

mod oauth;

pub use oauth::{percent_encode, OAuth1Signer};

use crate::config::EndpointConfig;
use crate::credentials::Credentials;
use crate::error::{ConfigError, SigningError};
use crate::keywords::KeywordList;
use std::fmt;

/// Body parameter carrying the comma-joined keyword list on the filter endpoint.
pub const TRACK_PARAM: &str = "track";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ready-to-send request. `body` is the form-encoded POST payload, empty for GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<String>,
}

/// Signs a request. `params` are the request's own parameters (not yet encoded).
pub trait RequestSigner {
    fn sign(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        credentials: &Credentials,
    ) -> Result<SignedRequest, SigningError>;
}

/// Inputs that outlive individual attempts.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    endpoint: String,
    method: Method,
    keywords: KeywordList,
    credentials: Credentials,
}

impl StreamRequest {
    /// Sample feed via GET when `keywords` is empty, otherwise the filter feed via POST.
    pub fn new(
        endpoints: &EndpointConfig,
        keywords: KeywordList,
        credentials: Credentials,
    ) -> Result<Self, ConfigError> {
        let (endpoint, method) = if keywords.is_empty() {
            (&endpoints.sample_url, Method::Get)
        } else {
            (&endpoints.filter_url, Method::Post)
        };
        validate_endpoint(endpoint)?;
        Ok(Self {
            endpoint: endpoint.clone(),
            method,
            keywords,
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }

    /// Request parameters before signing: `track` for the filter feed, nothing for the sample feed.
    pub fn params(&self) -> Vec<(String, String)> {
        if self.keywords.is_empty() {
            Vec::new()
        } else {
            vec![(TRACK_PARAM.to_string(), self.keywords.joined())]
        }
    }

    /// Produce a fresh single-use signed request.
    pub fn sign(&self, signer: &dyn RequestSigner) -> Result<SignedRequest, SigningError> {
        signer.sign(self.method, &self.endpoint, &self.params(), &self.credentials)
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        url: endpoint.to_string(),
        reason,
    };
    let parsed = url::Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}
