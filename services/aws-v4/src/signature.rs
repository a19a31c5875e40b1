use log::debug;
use sigv4_core::time::{format_iso8601, DateTime};
use sigv4_core::Result;

use crate::canonical::CanonicalRequest;
use crate::key::SigningKey;
use crate::SigningAlgorithm;

/// A computed signature and the scope it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Lowercase hex.
    pub signature: String,
    /// `<date>/<region>/<service>/aws4_request`
    pub credential_scope: String,
}

/// Build the string to sign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20150830T123600Z
/// 20150830/us-east-1/iam/aws4_request
/// <hex digest of canonical request>
/// ```
pub fn string_to_sign(
    algorithm: SigningAlgorithm,
    amz_date: &str,
    credential_scope: &str,
    canonical_request_digest: &str,
) -> String {
    format!(
        "{}\n{amz_date}\n{credential_scope}\n{canonical_request_digest}",
        algorithm.id()
    )
}

/// Sign `canonical_request` with a key derived for the same scope.
pub fn sign(
    canonical_request: &CanonicalRequest,
    timestamp: DateTime,
    credential_scope: &str,
    signing_key: &SigningKey,
    algorithm: SigningAlgorithm,
) -> Result<Signature> {
    let digest = canonical_request.hex_digest(algorithm);
    debug!("calculated canonical request digest: {digest}");

    let string_to_sign = string_to_sign(
        algorithm,
        &format_iso8601(timestamp),
        credential_scope,
        &digest,
    );
    debug!("calculated string to sign: {string_to_sign}");

    Ok(Signature {
        signature: sign_string(&string_to_sign, signing_key, algorithm),
        credential_scope: credential_scope.to_string(),
    })
}

/// Keyed hash of an already built string to sign, as lowercase hex.
pub fn sign_string(
    string_to_sign: &str,
    signing_key: &SigningKey,
    algorithm: SigningAlgorithm,
) -> String {
    hex::encode(algorithm.hmac(signing_key.as_bytes(), string_to_sign.as_bytes()))
}
