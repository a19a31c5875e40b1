use std::str::FromStr;

use bytes::Bytes;
use http::Uri;
use percent_encoding::percent_decode_str;
use sigv4_core::{Error, Result};

use crate::constants::{STREAMING_PAYLOAD_PREFIX, STREAMING_PAYLOAD_SUFFIX, UNSIGNED_PAYLOAD};
use crate::SigningAlgorithm;

/// Path and query of a request, already percent-decoded.
///
/// Values stored here are never decoded again: canonicalization encodes them
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Decoded path, e.g. `/my bucket/key`.
    pub path: String,
    /// Decoded query parameters in input order, e.g. `[("prefix", "CI/")]`.
    pub query: Vec<(String, String)>,
}

impl UrlParts {
    /// Create parts from a decoded path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a decoded query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl TryFrom<&Uri> for UrlParts {
    type Error = Error;

    fn try_from(uri: &Uri) -> Result<Self> {
        let path = percent_decode_str(uri.path()).decode_utf8().map_err(|e| {
            Error::malformed_request(format!("path {:?} is not valid utf-8", uri.path()))
                .with_source(e)
        })?;

        let query = uri
            .query()
            .map(|v| {
                form_urlencoded::parse(v.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(UrlParts {
            path: path.into_owned(),
            query,
        })
    }
}

/// A URL accepted either pre-parsed or as the raw string the caller holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlLike {
    /// Already decoded path and query.
    Structured(UrlParts),
    /// A raw, still percent-encoded URL: absolute (`https://host/a?b=c`) or
    /// origin-form (`/a?b=c`).
    Raw(String),
}

impl UrlLike {
    /// Normalize into decoded parts.
    ///
    /// Structured parts are returned as they are, raw strings are parsed and
    /// decoded once.
    pub fn to_parts(&self) -> Result<UrlParts> {
        match self {
            UrlLike::Structured(parts) => Ok(parts.clone()),
            UrlLike::Raw(raw) => {
                if raw.is_empty() {
                    return Ok(UrlParts::new("/"));
                }
                let uri = Uri::from_str(raw)?;
                UrlParts::try_from(&uri)
            }
        }
    }
}

impl From<UrlParts> for UrlLike {
    fn from(value: UrlParts) -> Self {
        UrlLike::Structured(value)
    }
}

impl From<&str> for UrlLike {
    fn from(value: &str) -> Self {
        UrlLike::Raw(value.to_string())
    }
}

impl From<String> for UrlLike {
    fn from(value: String) -> Self {
        UrlLike::Raw(value)
    }
}

/// One header entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name in the caller's casing.
    pub name: String,
    /// Raw header value.
    pub value: String,
    /// Keep whitespace inside double-quoted sections of the value.
    pub quoted: bool,
}

/// An ordered header multimap with case-insensitive names.
///
/// Entries keep their insertion order, which is the order duplicate values
/// are joined in. Sorting happens at canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Header>,
}

impl Headers {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Header {
            name: name.into(),
            value: value.into(),
            quoted: false,
        });
    }

    /// Append a header whose quoted-string sections must keep their inner
    /// whitespace.
    pub fn append_quoted(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Header {
            name: name.into(),
            value: value.into(),
            quoted: true,
        });
    }

    /// Replace every value of `name` with `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.append(name, value);
    }

    /// Remove every value of `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|h| !h.name.eq_ignore_ascii_case(name));
    }

    /// Get the first value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Iterate all values of `name` in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Check if any value exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    /// Number of entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.append(k, v);
        }
        headers
    }
}

impl TryFrom<&http::HeaderMap> for Headers {
    type Error = Error;

    fn try_from(map: &http::HeaderMap) -> Result<Self> {
        let mut headers = Headers::new();
        for (name, value) in map.iter() {
            headers.append(name.as_str(), value.to_str()?);
        }
        Ok(headers)
    }
}

/// The request body as far as signing is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Hash these bytes with the configured algorithm.
    Bytes(Bytes),
    /// A hex digest the caller already computed.
    Precomputed(String),
    /// Emit `UNSIGNED-PAYLOAD` instead of a hash.
    Unsigned,
    /// Emit `STREAMING-<algorithm>-PAYLOAD` for chunked signing.
    ///
    /// The algorithm must match the one the request is signed with.
    Streaming(SigningAlgorithm),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Bytes(Bytes::new())
    }
}

impl Payload {
    /// Interpret a `x-amz-content-sha256` style value.
    ///
    /// Recognizes `UNSIGNED-PAYLOAD`, `STREAMING-<algorithm>-PAYLOAD` for any
    /// supported algorithm, and lowercase hex digests. Anything else fails
    /// with `UnsupportedBody`.
    pub fn from_sentinel(value: &str) -> Result<Self> {
        if value == UNSIGNED_PAYLOAD {
            return Ok(Payload::Unsigned);
        }

        if let Some(alg) = value
            .strip_prefix(STREAMING_PAYLOAD_PREFIX)
            .and_then(|v| v.strip_suffix(STREAMING_PAYLOAD_SUFFIX))
        {
            if let Some(alg) = SigningAlgorithm::ALL.into_iter().find(|v| v.id() == alg) {
                return Ok(Payload::Streaming(alg));
            }
            return Err(Error::unsupported_body(format!(
                "streaming payload sentinel {value:?} is not recognized"
            )));
        }

        if is_lower_hex(value)
            && SigningAlgorithm::ALL
                .iter()
                .any(|alg| alg.hex_len() == value.len())
        {
            return Ok(Payload::Precomputed(value.to_string()));
        }

        Err(Error::unsupported_body(format!(
            "payload sentinel {value:?} is not recognized"
        )))
    }

    /// The payload hash line of the canonical request.
    pub fn hash(&self, algorithm: SigningAlgorithm) -> Result<String> {
        match self {
            Payload::Bytes(bs) => Ok(algorithm.hex_digest(bs)),
            Payload::Precomputed(digest) => {
                if digest.len() != algorithm.hex_len() || !is_lower_hex(digest) {
                    return Err(Error::unsupported_body(format!(
                        "precomputed payload hash {digest:?} is not a {algorithm} hex digest"
                    )));
                }
                Ok(digest.clone())
            }
            Payload::Unsigned => Ok(UNSIGNED_PAYLOAD.to_string()),
            Payload::Streaming(alg) => {
                if *alg != algorithm {
                    return Err(Error::unsupported_body(format!(
                        "streaming payload for {alg} can't be signed with {algorithm}"
                    )));
                }
                Ok(algorithm.streaming_payload())
            }
        }
    }
}

fn is_lower_hex(v: &str) -> bool {
    !v.is_empty() && v.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Payload::Bytes(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(value))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(value: &'static [u8]) -> Self {
        Payload::Bytes(Bytes::from_static(value))
    }
}

impl From<&'static str> for Payload {
    fn from(value: &'static str) -> Self {
        Payload::Bytes(Bytes::from_static(value.as_bytes()))
    }
}

/// Everything about a request that goes into its signature.
///
/// The descriptor is only read during signing; the caller keeps ownership
/// and decides how the produced artifacts are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request target.
    pub url: UrlLike,
    /// Request headers.
    pub headers: Headers,
    /// Request body.
    pub payload: Payload,
}

impl RequestDescriptor {
    /// Create a descriptor with no headers and an empty body.
    pub fn new(method: impl Into<String>, url: impl Into<UrlLike>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            payload: Payload::default(),
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }
}
