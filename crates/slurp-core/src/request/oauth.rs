//! OAuth 1.0a HMAC-SHA1 signing.

use super::{Method, RequestSigner, SignedRequest};
use crate::credentials::Credentials;
use crate::error::SigningError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use ring::hmac;
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything except the RFC 3986 unreserved characters is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

/// Percent-encode for OAuth base strings and form bodies (uppercase hex, space as `%20`).
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Signs with a fresh timestamp and random nonce, or with fixed values when
/// built via `with_fixed` (reproducible signatures).
#[derive(Debug, Clone, Default)]
pub struct OAuth1Signer {
    fixed: Option<(u64, String)>,
}

impl OAuth1Signer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed(timestamp: u64, nonce: impl Into<String>) -> Self {
        Self {
            fixed: Some((timestamp, nonce.into())),
        }
    }

    fn timestamp_and_nonce(&self) -> (u64, String) {
        if let Some((ts, nonce)) = &self.fixed {
            return (*ts, nonce.clone());
        }
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        (ts, nonce)
    }
}

impl RequestSigner for OAuth1Signer {
    fn sign(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        credentials: &Credentials,
    ) -> Result<SignedRequest, SigningError> {
        check_credentials(credentials)?;

        let mut parsed = url::Url::parse(url).map_err(|e| SigningError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let mut all: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        parsed.set_query(None);
        parsed.set_fragment(None);
        let base_url = parsed.to_string();

        let (timestamp, nonce) = self.timestamp_and_nonce();
        all.extend(params.iter().cloned());
        all.push(("oauth_consumer_key".into(), credentials.consumer_key.clone()));
        all.push(("oauth_nonce".into(), nonce));
        all.push(("oauth_signature_method".into(), "HMAC-SHA1".into()));
        all.push(("oauth_timestamp".into(), timestamp.to_string()));
        all.push(("oauth_token".into(), credentials.access_token.clone()));
        all.push(("oauth_version".into(), "1.0".into()));

        let base = signature_base_string(method, &base_url, &all);
        let signature = hmac_sha1_base64(&signing_key(credentials), &base);
        all.push(("oauth_signature".into(), signature));

        let encoded = normalize_params(&all);
        Ok(match method {
            Method::Get => SignedRequest {
                url: format!("{}?{}", base_url, encoded),
                method,
                body: None,
            },
            Method::Post => SignedRequest {
                url: base_url,
                method,
                body: Some(encoded),
            },
        })
    }
}

fn check_credentials(c: &Credentials) -> Result<(), SigningError> {
    let fields = [
        ("consumer key", &c.consumer_key),
        ("consumer secret", &c.consumer_secret),
        ("access token", &c.access_token),
        ("access token secret", &c.access_token_secret),
    ];
    for (name, value) in fields {
        if value.is_empty() {
            return Err(SigningError::MissingCredential(name));
        }
    }
    Ok(())
}

/// Encode each pair, sort by encoded key then value, join as `k=v&k=v`.
fn normalize_params(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn signature_base_string(
    method: Method,
    base_url: &str,
    params: &[(String, String)],
) -> String {
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(base_url),
        percent_encode(&normalize_params(params))
    )
}

fn signing_key(c: &Credentials) -> String {
    format!(
        "{}&{}",
        percent_encode(&c.consumer_secret),
        percent_encode(&c.access_token_secret)
    )
}

fn hmac_sha1_base64(key: &str, data: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key.as_bytes());
    let tag = hmac::sign(&key, data.as_bytes());
    STANDARD.encode(tag.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTER_URL: &str = "https://stream.twitter.com/1.1/statuses/filter.json";
    const SAMPLE_URL: &str = "https://stream.twitter.com/1.1/statuses/sample.json";

    fn creds() -> Credentials {
        Credentials::parse("ck\ncs\ntok\nts\n").unwrap()
    }

    fn track(value: &str) -> Vec<(String, String)> {
        vec![("track".to_string(), value.to_string())]
    }

    #[test]
    fn percent_encode_keeps_unreserved_only() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(percent_encode("rust,tokio"), "rust%2Ctokio");
        assert_eq!(percent_encode("☃"), "%E2%98%83");
    }

    #[test]
    fn base_string_sorts_and_double_encodes() {
        let mut params = track("rust,tokio lang");
        params.push(("oauth_nonce".into(), "abc123".into()));
        let base = signature_base_string(Method::Post, FILTER_URL, &params);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fstream.twitter.com%2F1.1%2Fstatuses%2Ffilter.json\
             &oauth_nonce%3Dabc123%26track%3Drust%252Ctokio%2520lang"
        );
    }

    #[test]
    fn post_signature_is_reproducible_and_in_body() {
        let signer = OAuth1Signer::with_fixed(1318622958, "abc123");
        let signed = signer
            .sign(Method::Post, FILTER_URL, &track("rust,tokio lang"), &creds())
            .unwrap();
        assert_eq!(signed.url, FILTER_URL);
        assert_eq!(signed.method, Method::Post);
        let body = signed.body.unwrap();
        assert!(body.contains("oauth_signature=kNHncbWXWXGSCEfzRicjQRtdTzE%3D"));
        assert!(body.contains("track=rust%2Ctokio%20lang"));
        assert!(body.contains("oauth_timestamp=1318622958"));
    }

    #[test]
    fn get_signature_goes_into_query() {
        let signer = OAuth1Signer::with_fixed(1318622958, "abc123");
        let signed = signer.sign(Method::Get, SAMPLE_URL, &[], &creds()).unwrap();
        assert!(signed.body.is_none());
        assert!(signed.url.starts_with(&format!("{}?", SAMPLE_URL)));
        assert!(signed
            .url
            .contains("oauth_signature=MD3FYtCt24ib5fyO3sY%2BB%2Fg1nZc%3D"));
    }

    #[test]
    fn fresh_signer_changes_nonce_every_call() {
        let signer = OAuth1Signer::new();
        let a = signer.sign(Method::Get, SAMPLE_URL, &[], &creds()).unwrap();
        let b = signer.sign(Method::Get, SAMPLE_URL, &[], &creds()).unwrap();
        assert_ne!(a.url, b.url);
    }

    #[test]
    fn empty_credential_is_signing_error() {
        let mut c = creds();
        c.access_token_secret.clear();
        let err = OAuth1Signer::new()
            .sign(Method::Get, SAMPLE_URL, &[], &c)
            .unwrap_err();
        assert!(matches!(err, SigningError::MissingCredential("access token secret")));
    }

    #[test]
    fn unparsable_url_is_signing_error() {
        let err = OAuth1Signer::new()
            .sign(Method::Get, "::nope", &[], &creds())
            .unwrap_err();
        assert!(matches!(err, SigningError::InvalidUrl { .. }));
    }
}
