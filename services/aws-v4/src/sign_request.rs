use std::str::FromStr;
use std::time::Duration;

use http::request::Parts;
use http::uri::PathAndQuery;
use http::{header, HeaderValue, Uri};
use log::debug;
use sigv4_core::{Error, Result};

use crate::canonical::{canonicalize, canonicalize_with_signed_headers, CanonicalRequest};
use crate::constants::{
    UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::key::derive_signing_key;
use crate::output::{authorization_header, encode_query, presign_params, PresignedQuery};
use crate::request::{Headers, Payload, RequestDescriptor, UrlLike, UrlParts};
use crate::signature::sign;
use crate::{Credential, SigningContext};

/// Where the signature goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMethod {
    /// Emit an `Authorization` header.
    Header,
    /// Emit presigned query parameters valid for the given duration.
    Query(Duration),
}

/// The result of signing a [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOutput {
    /// Value for the `Authorization` header.
    Authorization(String),
    /// Query parameters to append, `X-Amz-Signature` last.
    Query(PresignedQuery),
}

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    ctx: SigningContext,
    signed_headers: Option<Vec<String>>,
}

impl RequestSigner {
    /// Create a signer for the given context.
    pub fn new(ctx: SigningContext) -> Self {
        Self {
            ctx,
            signed_headers: None,
        }
    }

    /// Sign exactly these headers instead of every signable one.
    pub fn with_signed_headers<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.signed_headers = Some(names.iter().map(|v| v.as_ref().to_string()).collect());
        self
    }

    /// The signing context in use.
    pub fn context(&self) -> &SigningContext {
        &self.ctx
    }

    /// Sign `req` without touching it.
    ///
    /// Header mode signs the request as given: `host`, `x-amz-date` and
    /// friends must already be present if they should be covered.
    pub fn sign(
        &self,
        req: &RequestDescriptor,
        cred: &Credential,
        method: SigningMethod,
    ) -> Result<SigningOutput> {
        cred.check()?;
        self.ctx.check()?;

        let time = self.ctx.require_time()?;
        let algorithm = self.ctx.algorithm();
        let scope = self.ctx.credential_scope()?;
        debug!("calculated scope: {scope}");

        let creq = self.canonicalize(req)?;
        let key = derive_signing_key(
            &cred.secret_access_key,
            &self.ctx.date_stamp()?,
            self.ctx.region(),
            self.ctx.service(),
            algorithm,
        )?;

        let output = match method {
            SigningMethod::Header => {
                let signature = sign(&creq, time, &scope, &key, algorithm)?;

                SigningOutput::Authorization(authorization_header(
                    algorithm,
                    &cred.access_key_id,
                    &signature,
                    &creq.signed_headers(),
                ))
            }
            SigningMethod::Query(expires_in) => {
                let params = presign_params(
                    algorithm,
                    &cred.access_key_id,
                    &scope,
                    Some(time),
                    expires_in,
                    &creq.signed_headers(),
                    cred.session_token.as_deref(),
                )?;

                // The presign params are part of what gets signed.
                let mut url = req.url.to_parts()?;
                url.query.extend(params.params().iter().cloned());
                let presigned = RequestDescriptor {
                    method: req.method.clone(),
                    url: UrlLike::Structured(url),
                    headers: req.headers.clone(),
                    payload: req.payload.clone(),
                };
                let names = creq.signed_header_names();
                let creq = canonicalize_with_signed_headers(&presigned, &self.ctx, &names)?;
                let signature = sign(&creq, time, &scope, &key, algorithm)?;

                SigningOutput::Query(params.with_signature(&signature))
            }
        };
        debug!("signed request with {method:?} using {algorithm}");

        Ok(output)
    }

    /// Sign an `http` request in place.
    ///
    /// `host` is always added. In header mode `x-amz-date`,
    /// `x-amz-content-sha256` (`UNSIGNED-PAYLOAD` unless already set) and
    /// `x-amz-security-token` are added too before the `Authorization`
    /// header is written. In query mode the URI query is rewritten to carry
    /// the presigned parameters.
    ///
    /// The payload is taken from `x-amz-content-sha256` when present, and
    /// treated as unsigned otherwise.
    pub fn sign_parts(
        &self,
        parts: &mut Parts,
        cred: &Credential,
        method: SigningMethod,
    ) -> Result<()> {
        cred.check()?;
        self.ctx.check()?;
        let amz_date = self.ctx.amz_date()?;

        // Nothing is written back to `parts` unless signing succeeds.
        let mut headers = parts.headers.clone();

        // Insert HOST header if not present.
        if headers.get(header::HOST).is_none() {
            let authority = parts.uri.authority().ok_or_else(|| {
                Error::malformed_request("request without authority is invalid for signing")
            })?;
            headers.insert(header::HOST, HeaderValue::from_str(authority.as_str())?);
        }

        if method == SigningMethod::Header {
            headers.insert(X_AMZ_DATE, HeaderValue::from_str(&amz_date)?);

            if headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
                headers.insert(
                    X_AMZ_CONTENT_SHA_256,
                    HeaderValue::from_static(UNSIGNED_PAYLOAD),
                );
            }

            if let Some(token) = &cred.session_token {
                let mut value = HeaderValue::from_str(token)?;
                // Mark the token sensitive to avoid leaking it.
                value.set_sensitive(true);

                headers.insert(X_AMZ_SECURITY_TOKEN, value);
            }
        }

        let signing_headers = Headers::try_from(&headers)?;
        let payload = match signing_headers.get(X_AMZ_CONTENT_SHA_256) {
            Some(v) => Payload::from_sentinel(v)?,
            None => Payload::Unsigned,
        };
        let url = UrlParts::try_from(&parts.uri)?;
        let req = RequestDescriptor {
            method: parts.method.as_str().to_string(),
            url: UrlLike::Structured(url.clone()),
            headers: signing_headers,
            payload,
        };

        match self.sign(&req, cred, method)? {
            SigningOutput::Authorization(value) => {
                let mut authorization = HeaderValue::from_str(&value)?;
                authorization.set_sensitive(true);

                headers.insert(header::AUTHORIZATION, authorization);
                parts.headers = headers;
            }
            SigningOutput::Query(presigned) => {
                let mut query = url.query;
                query.extend(presigned.params().iter().cloned());

                let mut uri_parts = parts.uri.clone().into_parts();
                let path = uri_parts
                    .path_and_query
                    .as_ref()
                    .map(|v| v.path().to_string())
                    .unwrap_or_else(|| "/".to_string());
                uri_parts.path_and_query = Some(PathAndQuery::from_str(&format!(
                    "{path}?{}",
                    encode_query(&query)
                ))?);
                let uri = Uri::from_parts(uri_parts)?;

                parts.headers = headers;
                parts.uri = uri;
            }
        }

        Ok(())
    }

    fn canonicalize(&self, req: &RequestDescriptor) -> Result<CanonicalRequest> {
        match &self.signed_headers {
            Some(names) => canonicalize_with_signed_headers(req, &self.ctx, names),
            None => canonicalize(req, &self.ctx),
        }
    }
}
