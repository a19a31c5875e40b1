use std::time::Duration;

use serde::Deserialize;
use sigv4_core::time::DateTime;
use sigv4_core::{Env, Error, Result};

use crate::constants::*;
use crate::{RequestSigner, SigningContext, SigningMethod};

/// Config for AWS SigV4 signing.
///
/// Credentials are not part of the config: the caller supplies them on
/// every signing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Region like `us-east-1`.
    pub region: Option<String>,
    /// Service like `s3`.
    pub service: Option<String>,
    /// Algorithm identifier or hash name, `AWS4-HMAC-SHA256` if unset.
    pub algorithm: Option<String>,
    /// Sign exactly these headers instead of every signable one.
    pub signed_headers: Option<Vec<String>>,
    /// Presign for this many seconds instead of emitting `Authorization`.
    pub expires_in: Option<u64>,
}

impl Config {
    /// Fill unset fields from environment variables.
    ///
    /// - `region`: `AWS_REGION`, then `AWS_DEFAULT_REGION`
    /// - `service`: `AWS_SIGV4_SERVICE`
    /// - `algorithm`: `AWS_SIGV4_ALGORITHM`
    /// - `expires_in`: `AWS_SIGV4_EXPIRES_IN`
    pub fn from_env(mut self, env: &impl Env) -> Result<Self> {
        if self.region.is_none() {
            self.region = env
                .var(AWS_REGION)
                .or_else(|| env.var(AWS_DEFAULT_REGION));
        }
        if self.service.is_none() {
            self.service = env.var(AWS_SIGV4_SERVICE);
        }
        if self.algorithm.is_none() {
            self.algorithm = env.var(AWS_SIGV4_ALGORITHM);
        }
        if self.expires_in.is_none() {
            if let Some(v) = env.var(AWS_SIGV4_EXPIRES_IN) {
                let secs = v.trim().parse::<u64>().map_err(|e| {
                    Error::config_invalid(format!("{AWS_SIGV4_EXPIRES_IN} {v:?} is invalid"))
                        .with_source(e)
                })?;
                self.expires_in = Some(secs);
            }
        }

        Ok(self)
    }

    /// Build a signing context for `time`.
    pub fn signing_context(&self, time: DateTime) -> Result<SigningContext> {
        let region = self
            .region
            .as_deref()
            .ok_or_else(|| Error::config_invalid("region is required"))?;
        let service = self
            .service
            .as_deref()
            .ok_or_else(|| Error::config_invalid("service is required"))?;

        let mut ctx = SigningContext::new(region, service).with_time(time);
        if let Some(algorithm) = &self.algorithm {
            ctx = ctx.with_algorithm_name(algorithm)?;
        }
        ctx.check()?;

        Ok(ctx)
    }

    /// Build a signer for `time` with the configured signed headers.
    pub fn signer(&self, time: DateTime) -> Result<RequestSigner> {
        let mut signer = RequestSigner::new(self.signing_context(time)?);
        if let Some(names) = &self.signed_headers {
            signer = signer.with_signed_headers(names);
        }
        Ok(signer)
    }

    /// Query mode when `expires_in` is set, header mode otherwise.
    pub fn signing_method(&self) -> SigningMethod {
        match self.expires_in {
            Some(secs) => SigningMethod::Query(Duration::from_secs(secs)),
            None => SigningMethod::Header,
        }
    }
}
