use sigv4_core::time::{format_date, format_iso8601, DateTime};
use sigv4_core::{Error, Result};

use crate::constants::AWS4_REQUEST;
use crate::SigningAlgorithm;

/// Where and when a request is signed.
///
/// Region and service have no defaults: a wrong value produces a signature
/// the far end silently rejects, so both must be named by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    time: Option<DateTime>,
    region: String,
    service: String,
    algorithm: SigningAlgorithm,
}

impl SigningContext {
    /// Create a context for `region` and `service` using `AWS4-HMAC-SHA256`.
    ///
    /// The signing time must be provided through [`SigningContext::with_time`]
    /// before anything is signed.
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            time: None,
            region: region.into(),
            service: service.into(),
            algorithm: SigningAlgorithm::default(),
        }
    }

    /// Set the signing time.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Override the digest/HMAC pair.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Override the digest/HMAC pair by identifier, e.g. `AWS4-HMAC-SHA384`.
    pub fn with_algorithm_name(self, name: &str) -> Result<Self> {
        Ok(self.with_algorithm(name.parse()?))
    }

    /// The signing time, if set.
    pub fn time(&self) -> Option<DateTime> {
        self.time
    }

    /// Region like `us-east-1`.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service like `s3`.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The configured algorithm.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// The signing time, failing with `MissingTimestamp` when unset.
    pub fn require_time(&self) -> Result<DateTime> {
        self.time
            .ok_or_else(|| Error::missing_timestamp("signing time is required but not set"))
    }

    /// Full timestamp: `20150830T123600Z`.
    pub fn amz_date(&self) -> Result<String> {
        Ok(format_iso8601(self.require_time()?))
    }

    /// Date stamp: `20150830`.
    pub fn date_stamp(&self) -> Result<String> {
        Ok(format_date(self.require_time()?))
    }

    /// Credential scope: `20150830/us-east-1/iam/aws4_request`.
    pub fn credential_scope(&self) -> Result<String> {
        self.check()?;
        Ok(format!(
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date_stamp()?,
            self.region,
            self.service
        ))
    }

    /// Check region and service can be embedded into a credential scope.
    pub(crate) fn check(&self) -> Result<()> {
        for (name, value) in [("region", &self.region), ("service", &self.service)] {
            if value.is_empty() {
                return Err(Error::config_invalid(format!("{name} is required")));
            }
            if value.contains('/') || value.bytes().any(|b| b.is_ascii_whitespace()) {
                return Err(Error::config_invalid(format!(
                    "{name} {value:?} can't contain '/' or whitespace"
                )));
            }
        }
        Ok(())
    }
}
