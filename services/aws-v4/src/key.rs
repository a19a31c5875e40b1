use std::fmt::{Debug, Formatter};
use std::mem;

use sigv4_core::utils::Redact;
use sigv4_core::{Error, Result};

use crate::constants::{AWS4_KEY_PREFIX, AWS4_REQUEST};
use crate::SigningAlgorithm;

/// The key derived for one date, region and service.
///
/// It's recomputed for every signing call and wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningKey")
            .field(&Redact::from(self.0.as_slice()))
            .finish()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        wipe(&mut self.0);
    }
}

fn wipe(buf: &mut [u8]) {
    buf.iter_mut().for_each(|b| *b = 0);
}

/// Derive the signing key:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date_stamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(
    secret_access_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
    algorithm: SigningAlgorithm,
) -> Result<SigningKey> {
    if secret_access_key.is_empty() {
        return Err(Error::invalid_credentials("secret access key is empty"));
    }

    let mut chain = derive_chain(secret_access_key, date_stamp, region, service, algorithm);
    let signing = mem::take(&mut chain[3]);
    // Wipe kDate, kRegion and kService.
    chain.iter_mut().for_each(|k| wipe(k));

    Ok(SigningKey(signing))
}

fn derive_chain(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
    algorithm: SigningAlgorithm,
) -> [Vec<u8>; 4] {
    let mut secret = format!("{AWS4_KEY_PREFIX}{secret}").into_bytes();
    let sign_date = algorithm.hmac(&secret, date_stamp.as_bytes());
    wipe(&mut secret);

    let sign_region = algorithm.hmac(&sign_date, region.as_bytes());
    let sign_service = algorithm.hmac(&sign_region, service.as_bytes());
    let sign_request = algorithm.hmac(&sign_service, AWS4_REQUEST.as_bytes());

    [sign_date, sign_region, sign_service, sign_request]
}
