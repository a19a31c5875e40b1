//! AWS Signature Version 4 signer.
//!
//! Signing is a pipeline of four pure steps:
//!
//! 1. [`canonicalize`] turns a [`RequestDescriptor`] into a [`CanonicalRequest`].
//! 2. [`derive_signing_key`] derives the [`SigningKey`] for a date, region and service.
//! 3. [`sign`] hashes the canonical request into a string to sign and signs it.
//! 4. [`authorization_header`] or [`presign_params`] shape the result for the wire.
//!
//! [`RequestSigner`] runs all four for a [`SigningContext`], and can sign
//! [`http::request::Parts`] in place. Nothing reads the clock: the signing
//! time is always part of the context.
//!
//! ## Example
//!
//! ```
//! use sigv4_aws_v4::{Credential, RequestDescriptor, RequestSigner, SigningContext};
//! use sigv4_aws_v4::{SigningMethod, SigningOutput};
//! use sigv4_core::time::parse_iso8601;
//!
//! let ctx = SigningContext::new("us-east-1", "service")
//!     .with_time(parse_iso8601("20150830T123600Z").unwrap());
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//! let req = RequestDescriptor::new("GET", "/")
//!     .with_header("Host", "example.amazonaws.com")
//!     .with_header("X-Amz-Date", "20150830T123600Z");
//!
//! let output = RequestSigner::new(ctx)
//!     .sign(&req, &cred, SigningMethod::Header)
//!     .unwrap();
//! let SigningOutput::Authorization(v) = output else { unreachable!() };
//! assert!(v.ends_with("Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"));
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod algorithm;
pub use algorithm::SigningAlgorithm;

mod canonical;
pub use canonical::canonical_query_string;
pub use canonical::canonical_uri;
pub use canonical::canonicalize;
pub use canonical::canonicalize_with_signed_headers;
pub use canonical::normalize_header_value;
pub use canonical::CanonicalRequest;

mod config;
pub use config::Config;

mod context;
pub use context::SigningContext;

mod credential;
pub use credential::Credential;

mod key;
pub use key::derive_signing_key;
pub use key::SigningKey;

mod output;
pub use output::authorization_header;
pub use output::presign_params;
pub use output::PresignedQuery;

mod request;
pub use request::Header;
pub use request::Headers;
pub use request::Payload;
pub use request::RequestDescriptor;
pub use request::UrlLike;
pub use request::UrlParts;

mod sign_request;
pub use sign_request::RequestSigner;
pub use sign_request::SigningMethod;
pub use sign_request::SigningOutput;

mod signature;
pub use signature::sign;
pub use signature::sign_string;
pub use signature::string_to_sign;
pub use signature::Signature;

mod verify;
pub use verify::generate_challenge;
pub use verify::validate_challenge;
pub use verify::AuthorizationHeader;
pub use verify::Challenge;

mod constants;
