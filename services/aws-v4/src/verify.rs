//! Verify requests signed by someone else.
//!
//! Verification runs in two steps so the secret lookup can happen in between:
//!
//! 1. [`generate_challenge`] parses `Authorization`, rebuilds the canonical
//!    request from the headers it names and produces the string to sign.
//! 2. [`validate_challenge`] derives the key for the challenge scope and
//!    compares signatures in constant time.

use std::str::FromStr;
use std::time::Duration;

use log::debug;
use sigv4_core::hash::constant_time_eq;
use sigv4_core::time::{format_date, parse_date, parse_iso8601, DateTime};
use sigv4_core::{Error, Result};

use crate::canonical::canonicalize_with_signed_headers;
use crate::constants::{AWS4_REQUEST, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::key::derive_signing_key;
use crate::request::{Payload, RequestDescriptor};
use crate::signature::{sign_string, string_to_sign};
use crate::{SigningAlgorithm, SigningContext};

/// Parsed `Authorization` header.
///
/// ```text
/// AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request,
///   SignedHeaders=host;x-amz-date, Signature=<hex>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// Algorithm named by the header.
    pub algorithm: SigningAlgorithm,
    /// Access key id from `Credential`.
    pub access_key_id: String,
    /// `<date>/<region>/<service>/aws4_request`
    pub credential_scope: String,
    /// Lowercase signed header names in the order given.
    pub signed_headers: Vec<String>,
    /// Hex signature.
    pub signature: String,
}

impl FromStr for AuthorizationHeader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (algorithm, rest) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| Error::malformed_request("authorization header has no credentials"))?;
        let algorithm = SigningAlgorithm::ALL
            .into_iter()
            .find(|v| v.id() == algorithm)
            .ok_or_else(|| {
                Error::unsupported_algorithm(format!(
                    "authorization algorithm {algorithm:?} is not registered"
                ))
            })?;

        let mut credential = None;
        let mut signed_headers = None;
        let mut signature = None;
        for part in rest.split(',') {
            let Some((k, v)) = part.trim().split_once('=') else {
                return Err(Error::malformed_request(format!(
                    "authorization component {part:?} is not key=value"
                )));
            };
            match k.to_ascii_lowercase().as_str() {
                "credential" => credential = Some(v),
                "signedheaders" => signed_headers = Some(v),
                "signature" => signature = Some(v),
                _ => {}
            }
        }

        let missing = |name: &str| {
            Error::malformed_request(format!("authorization header is missing {name}"))
        };
        let credential = credential.ok_or_else(|| missing("Credential"))?;
        let signed_headers = signed_headers.ok_or_else(|| missing("SignedHeaders"))?;
        let signature = signature.ok_or_else(|| missing("Signature"))?;

        let (access_key_id, credential_scope) = credential
            .split_once('/')
            .ok_or_else(|| Error::malformed_request("credential has no scope"))?;
        if access_key_id.is_empty() {
            return Err(missing("access key id"));
        }
        split_scope(credential_scope)?;

        if signed_headers.is_empty() {
            return Err(missing("signed header names"));
        }
        if signature.is_empty() || !signature.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::malformed_request("signature is not hex encoded"));
        }

        Ok(AuthorizationHeader {
            algorithm,
            access_key_id: access_key_id.to_string(),
            credential_scope: credential_scope.to_string(),
            signed_headers: signed_headers
                .split(';')
                .map(|v| v.to_ascii_lowercase())
                .collect(),
            signature: signature.to_ascii_lowercase(),
        })
    }
}

/// Everything needed to check a signature once the secret is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Algorithm the request claims to be signed with.
    pub algorithm: SigningAlgorithm,
    /// Access key id to look the secret up by.
    pub access_key_id: String,
    /// `<date>/<region>/<service>/aws4_request`
    pub credential_scope: String,
    /// The rebuilt string to sign.
    pub string_to_sign: String,
    /// The signature presented by the caller.
    pub signature: String,
}

/// Rebuild the string to sign of a received request.
///
/// Only headers named in `SignedHeaders` are canonicalized. `x-amz-date` is
/// required and must lie within `max_skew` of `now`.
///
/// The payload hash is always computed from `req.payload`. An
/// `x-amz-content-sha256` digest must match it (`SignatureMismatch`
/// otherwise); `UNSIGNED-PAYLOAD` and streaming sentinels are used as they
/// are.
pub fn generate_challenge(
    req: &RequestDescriptor,
    now: DateTime,
    max_skew: Duration,
) -> Result<Challenge> {
    let auth: AuthorizationHeader = req
        .headers
        .get(http::header::AUTHORIZATION.as_str())
        .ok_or_else(|| Error::malformed_request("request has no authorization header"))?
        .parse()?;

    let amz_date = req
        .headers
        .get(X_AMZ_DATE)
        .ok_or_else(|| Error::malformed_request("request has no x-amz-date header"))?;
    let time = parse_iso8601(amz_date)?;

    let (date, region, service) = split_scope(&auth.credential_scope)?;
    if format_date(time) != date {
        return Err(Error::malformed_request(format!(
            "x-amz-date {amz_date} doesn't match credential scope date {date}"
        )));
    }

    let skew = (now - time).num_milliseconds().unsigned_abs();
    if u128::from(skew) > max_skew.as_millis() {
        return Err(Error::request_time_skewed(format!(
            "x-amz-date {amz_date} is more than {max_skew:?} away from now"
        )));
    }

    let mut req = req.clone();
    let sentinel = req
        .headers
        .get(X_AMZ_CONTENT_SHA_256)
        .map(Payload::from_sentinel)
        .transpose()?;
    match sentinel {
        Some(Payload::Precomputed(claimed)) => {
            let actual = req.payload.hash(auth.algorithm)?;
            if !constant_time_eq(actual.as_bytes(), claimed.as_bytes()) {
                return Err(Error::signature_mismatch(
                    "x-amz-content-sha256 does not match the request body",
                ));
            }
            req.payload = Payload::Precomputed(actual);
        }
        Some(payload) => req.payload = payload,
        None => {}
    }

    let ctx = SigningContext::new(region, service)
        .with_time(time)
        .with_algorithm(auth.algorithm);
    let creq = canonicalize_with_signed_headers(&req, &ctx, &auth.signed_headers)?;
    let digest = creq.hex_digest(auth.algorithm);
    debug!("rebuilt canonical request digest: {digest}");

    Ok(Challenge {
        algorithm: auth.algorithm,
        string_to_sign: string_to_sign(auth.algorithm, amz_date, &auth.credential_scope, &digest),
        access_key_id: auth.access_key_id,
        credential_scope: auth.credential_scope,
        signature: auth.signature,
    })
}

/// Check that `challenge` was signed with `secret_access_key`.
pub fn validate_challenge(challenge: &Challenge, secret_access_key: &str) -> Result<()> {
    let (date, region, service) = split_scope(&challenge.credential_scope)?;
    let key = derive_signing_key(
        secret_access_key,
        date,
        region,
        service,
        challenge.algorithm,
    )?;
    let expected = sign_string(&challenge.string_to_sign, &key, challenge.algorithm);

    if !constant_time_eq(expected.as_bytes(), challenge.signature.as_bytes()) {
        debug!("signature mismatch for scope {}", challenge.credential_scope);
        return Err(Error::signature_mismatch(
            "request signature does not match the calculated signature",
        ));
    }
    Ok(())
}

fn split_scope(scope: &str) -> Result<(&str, &str, &str)> {
    let parts = scope.split('/').collect::<Vec<_>>();
    match parts.as_slice() {
        [date, region, service, terminator]
            if *terminator == AWS4_REQUEST
                && date.len() == 8
                && parse_date(date).is_ok()
                && !region.is_empty()
                && !service.is_empty() =>
        {
            Ok((*date, *region, *service))
        }
        _ => Err(Error::malformed_request(format!(
            "credential scope {scope:?} is invalid"
        ))),
    }
}
