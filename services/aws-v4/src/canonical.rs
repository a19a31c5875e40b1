//! Canonical request construction.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use percent_encoding::utf8_percent_encode;
use sigv4_core::{Error, Result};

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, UNSIGNABLE_HEADERS};
use crate::request::{Headers, RequestDescriptor};
use crate::{SigningAlgorithm, SigningContext};

/// The canonical form of one request.
///
/// ```text
/// GET
/// /
/// Param1=value1&Param2=value2
/// host:example.amazonaws.com
/// x-amz-date:20150830T123600Z
///
/// host;x-amz-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: Vec<(String, String)>,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Uppercased method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Percent-encoded path.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Sorted, percent-encoded query string without the leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Lowercased names of the signed headers, sorted.
    pub fn signed_header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Signed header names joined with `;`.
    pub fn signed_headers(&self) -> String {
        self.signed_header_names().join(";")
    }

    /// The payload hash line: a hex digest or one of the payload literals.
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// Hex digest of the canonical request, the last line of the string-to-sign.
    pub fn hex_digest(&self, algorithm: SigningAlgorithm) -> String {
        algorithm.hex_digest(self.to_string().as_bytes())
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Canonicalize `req`, signing every header except `authorization`,
/// `user-agent`, `x-amzn-trace-id` and `transfer-encoding`.
pub fn canonicalize(req: &RequestDescriptor, ctx: &SigningContext) -> Result<CanonicalRequest> {
    build(req, ctx, None)
}

/// Canonicalize `req`, signing exactly the headers named in `signed_headers`.
///
/// Every listed header must be present on the request. Nothing is added:
/// `host` and `x-amz-date` are only signed if the caller lists them.
pub fn canonicalize_with_signed_headers<S: AsRef<str>>(
    req: &RequestDescriptor,
    ctx: &SigningContext,
    signed_headers: &[S],
) -> Result<CanonicalRequest> {
    build(req, ctx, Some(signed_headers_from(signed_headers)))
}

fn signed_headers_from<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|v| v.as_ref().trim().to_ascii_lowercase())
        .collect()
}

fn build(
    req: &RequestDescriptor,
    ctx: &SigningContext,
    signed_headers: Option<Vec<String>>,
) -> Result<CanonicalRequest> {
    let method = canonical_method(&req.method)?;
    let url = req.url.to_parts()?;
    let headers = canonical_headers(&req.headers, signed_headers.as_deref())?;
    let payload_hash = req.payload.hash(ctx.algorithm())?;

    Ok(CanonicalRequest {
        method,
        uri: canonical_uri(&url.path),
        query: canonical_query_string(&url.query),
        headers,
        payload_hash,
    })
}

fn canonical_method(method: &str) -> Result<String> {
    if method.is_empty() {
        return Err(Error::malformed_request("method is empty"));
    }
    if method
        .bytes()
        .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    {
        return Err(Error::malformed_request(format!(
            "method {method:?} contains whitespace or control characters"
        )));
    }

    Ok(method.to_ascii_uppercase())
}

/// Percent-encode a decoded path, keeping `/` as is.
///
/// An empty path becomes `/`.
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let encoded = utf8_percent_encode(path, &AWS_URI_ENCODE_SET).to_string();
    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{encoded}")
    }
}

/// Percent-encode every decoded pair, sort by encoded key then encoded
/// value, and join with `&`.
pub fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (idx, (k, v)) in pairs.iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

/// Lowercased, sorted `(name, value)` pairs with duplicate values joined by `,`.
fn canonical_headers(
    headers: &Headers,
    signed_headers: Option<&[String]>,
) -> Result<Vec<(String, String)>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for header in headers.iter() {
        check_header_name(&header.name)?;
        check_header_value(&header.name, &header.value)?;

        grouped
            .entry(header.name.to_ascii_lowercase())
            .or_default()
            .push(normalize_header_value(&header.value, header.quoted));
    }

    match signed_headers {
        None => Ok(grouped
            .into_iter()
            .filter(|(k, _)| !UNSIGNABLE_HEADERS.contains(&k.as_str()))
            .map(|(k, v)| (k, v.join(",")))
            .collect()),
        Some(names) => {
            let mut selected = BTreeMap::new();
            for name in names {
                check_header_name(name)?;
                let values = grouped.get(name).ok_or_else(|| {
                    Error::malformed_request(format!(
                        "signed header {name} is missing from the request"
                    ))
                })?;
                selected.insert(name.clone(), values.join(","));
            }
            Ok(selected.into_iter().collect())
        }
    }
}

fn check_header_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::malformed_request("header name is empty"));
    }
    if name
        .bytes()
        .any(|b| b.is_ascii_control() || b == b':' || b == b' ' || !b.is_ascii())
    {
        return Err(Error::malformed_request(format!(
            "header name {name:?} contains control or separator characters"
        )));
    }
    Ok(())
}

fn check_header_value(name: &str, value: &str) -> Result<()> {
    if value.bytes().any(|b| b.is_ascii_control() && b != b'\t') {
        return Err(Error::malformed_request(format!(
            "value of header {name} contains control characters"
        )));
    }
    Ok(())
}

/// Trim a header value and collapse runs of spaces and tabs into one space.
///
/// With `quoted` set, whitespace inside double-quoted sections is kept as is.
pub fn normalize_header_value(value: &str, quoted: bool) -> String {
    let mut s = String::with_capacity(value.len());
    let mut in_quotes = false;
    let mut escaped = false;
    let mut pending_space = false;

    for c in value.trim_matches(|c| c == ' ' || c == '\t').chars() {
        if in_quotes {
            s.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }

        if c == ' ' || c == '\t' {
            pending_space = true;
            continue;
        }
        if pending_space {
            s.push(' ');
            pending_space = false;
        }
        if quoted && c == '"' {
            in_quotes = true;
        }
        s.push(c);
    }

    s
}
