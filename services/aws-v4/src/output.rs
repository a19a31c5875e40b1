use std::time::Duration;

use percent_encoding::utf8_percent_encode;
use sigv4_core::time::{format_iso8601, DateTime};
use sigv4_core::{Error, Result};

use crate::constants::{
    AWS_QUERY_ENCODE_SET, X_AMZ_ALGORITHM, X_AMZ_CREDENTIAL, X_AMZ_DATE_QUERY, X_AMZ_EXPIRES,
    X_AMZ_SECURITY_TOKEN_QUERY, X_AMZ_SIGNATURE, X_AMZ_SIGNED_HEADERS,
};
use crate::signature::Signature;
use crate::SigningAlgorithm;

/// Format the `Authorization` header value:
///
/// ```text
/// AWS4-HMAC-SHA256 Credential=<ak>/<scope>, SignedHeaders=<h1;h2>, Signature=<hex>
/// ```
pub fn authorization_header(
    algorithm: SigningAlgorithm,
    access_key_id: &str,
    signature: &Signature,
    signed_headers: &str,
) -> String {
    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        algorithm.id(),
        access_key_id,
        signature.credential_scope,
        signed_headers,
        signature.signature
    )
}

/// The query parameters of a presigned URL, in the order they were produced.
///
/// Values are kept raw; [`PresignedQuery::to_query_string`] encodes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresignedQuery {
    params: Vec<(String, String)>,
}

impl PresignedQuery {
    /// Raw `(name, value)` pairs.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append `X-Amz-Signature` once the signature over the other params is known.
    pub fn with_signature(mut self, signature: &Signature) -> Self {
        self.params
            .push((X_AMZ_SIGNATURE.to_string(), signature.signature.clone()));
        self
    }

    /// Percent-encoded `k=v&k=v` form.
    pub fn to_query_string(&self) -> String {
        encode_query(&self.params)
    }
}

/// Encode raw pairs into a query string, omitting `=` for empty values.
pub(crate) fn encode_query(pairs: &[(String, String)]) -> String {
    let mut s = String::new();
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            s.push('&');
        }

        s.extend(utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET));
        if !v.is_empty() {
            s.push('=');
            s.extend(utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET));
        }
    }
    s
}

/// Build the `X-Amz-*` parameters that must be part of the canonical query
/// before a presigned request is signed.
///
/// `X-Amz-Signature` is not included.
pub fn presign_params(
    algorithm: SigningAlgorithm,
    access_key_id: &str,
    credential_scope: &str,
    time: Option<DateTime>,
    expires_in: Duration,
    signed_headers: &str,
    session_token: Option<&str>,
) -> Result<PresignedQuery> {
    let time =
        time.ok_or_else(|| Error::missing_timestamp("presigning requires a signing time"))?;
    if expires_in.as_secs() == 0 {
        return Err(Error::invalid_expiry(format!(
            "expiry must be at least one second, got {expires_in:?}"
        )));
    }

    let mut params = vec![
        (X_AMZ_ALGORITHM.to_string(), algorithm.id().to_string()),
        (
            X_AMZ_CREDENTIAL.to_string(),
            format!("{access_key_id}/{credential_scope}"),
        ),
        (X_AMZ_DATE_QUERY.to_string(), format_iso8601(time)),
        (X_AMZ_EXPIRES.to_string(), expires_in.as_secs().to_string()),
        (X_AMZ_SIGNED_HEADERS.to_string(), signed_headers.to_string()),
    ];
    if let Some(token) = session_token {
        params.push((X_AMZ_SECURITY_TOKEN_QUERY.to_string(), token.to_string()));
    }

    Ok(PresignedQuery { params })
}
