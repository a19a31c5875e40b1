use std::fmt::{Display, Formatter};
use std::str::FromStr;

use sigv4_core::hash::{
    hex_sha1, hex_sha256, hex_sha384, hex_sha512, hmac_sha1, hmac_sha256, hmac_sha384,
    hmac_sha512,
};
use sigv4_core::{Error, Result};

use crate::constants::{STREAMING_PAYLOAD_PREFIX, STREAMING_PAYLOAD_SUFFIX};

/// The digest/HMAC pair a signature is computed with.
///
/// Every variant bundles a digest function, the matching keyed hash and the
/// identifier that appears in the string-to-sign and in `Authorization`.
/// The variant is chosen once per [`crate::SigningContext`] and threaded
/// through canonicalization, key derivation and signing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// `AWS4-HMAC-SHA256`, the algorithm every AWS service accepts.
    #[default]
    HmacSha256,
    /// `AWS4-HMAC-SHA1`
    HmacSha1,
    /// `AWS4-HMAC-SHA384`
    HmacSha384,
    /// `AWS4-HMAC-SHA512`
    HmacSha512,
}

impl SigningAlgorithm {
    /// All supported algorithms.
    pub const ALL: [SigningAlgorithm; 4] = [
        SigningAlgorithm::HmacSha256,
        SigningAlgorithm::HmacSha1,
        SigningAlgorithm::HmacSha384,
        SigningAlgorithm::HmacSha512,
    ];

    /// The identifier used in the string-to-sign, `Authorization` and `X-Amz-Algorithm`.
    pub fn id(&self) -> &'static str {
        match self {
            SigningAlgorithm::HmacSha256 => "AWS4-HMAC-SHA256",
            SigningAlgorithm::HmacSha1 => "AWS4-HMAC-SHA1",
            SigningAlgorithm::HmacSha384 => "AWS4-HMAC-SHA384",
            SigningAlgorithm::HmacSha512 => "AWS4-HMAC-SHA512",
        }
    }

    fn hash_name(&self) -> &'static str {
        match self {
            SigningAlgorithm::HmacSha256 => "SHA256",
            SigningAlgorithm::HmacSha1 => "SHA1",
            SigningAlgorithm::HmacSha384 => "SHA384",
            SigningAlgorithm::HmacSha512 => "SHA512",
        }
    }

    /// Length in characters of a hex digest produced by this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            SigningAlgorithm::HmacSha256 => 64,
            SigningAlgorithm::HmacSha1 => 40,
            SigningAlgorithm::HmacSha384 => 96,
            SigningAlgorithm::HmacSha512 => 128,
        }
    }

    /// Lowercase hex digest of `content`.
    pub fn hex_digest(&self, content: &[u8]) -> String {
        match self {
            SigningAlgorithm::HmacSha256 => hex_sha256(content),
            SigningAlgorithm::HmacSha1 => hex_sha1(content),
            SigningAlgorithm::HmacSha384 => hex_sha384(content),
            SigningAlgorithm::HmacSha512 => hex_sha512(content),
        }
    }

    /// Keyed hash of `content` under `key`.
    pub fn hmac(&self, key: &[u8], content: &[u8]) -> Vec<u8> {
        match self {
            SigningAlgorithm::HmacSha256 => hmac_sha256(key, content),
            SigningAlgorithm::HmacSha1 => hmac_sha1(key, content),
            SigningAlgorithm::HmacSha384 => hmac_sha384(key, content),
            SigningAlgorithm::HmacSha512 => hmac_sha512(key, content),
        }
    }

    /// The literal used as payload hash for chunked uploads,
    /// e.g. `STREAMING-AWS4-HMAC-SHA256-PAYLOAD`.
    pub fn streaming_payload(&self) -> String {
        format!(
            "{STREAMING_PAYLOAD_PREFIX}{}{STREAMING_PAYLOAD_SUFFIX}",
            self.id()
        )
    }
}

impl Display for SigningAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = Error;

    /// Accepts the full identifier (`AWS4-HMAC-SHA256`) or the bare hash
    /// name (`sha256`, `SHA-256`), case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "");

        Self::ALL
            .into_iter()
            .find(|alg| {
                normalized == alg.id().replace('-', "") || normalized == alg.hash_name()
            })
            .ok_or_else(|| {
                Error::unsupported_algorithm(format!("signing algorithm {s:?} is not registered"))
            })
    }
}
