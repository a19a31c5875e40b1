//! Core components for signing API requests with AWS Signature Version 4.
//!
//! This crate provides the service-agnostic building blocks used by the
//! SigV4 signer: the shared error type, hashing primitives, timestamp
//! formatting and an environment abstraction for configuration loading.
//!
//! ## Overview
//!
//! - [`Error`] and [`ErrorKind`]: every failure surfaced by the signing
//!   pipeline, synchronously and without partial output.
//! - [`hash`]: hex digests and keyed hashes over SHA-1 and the SHA-2 family.
//! - [`time`]: the two timestamp strings SigV4 needs (`20150830T123600Z` and
//!   `20150830`) and their parsing counterparts.
//! - [`Env`]: environment variable access, with [`OsEnv`] for the current
//!   process and [`StaticEnv`] for tests.
//! - [`utils`]: general utilities including data redaction.
//!
//! ## Example
//!
//! ```
//! use sigv4_core::hash::hex_sha256;
//! use sigv4_core::time::{format_date, format_iso8601, parse_iso8601};
//!
//! let t = parse_iso8601("20150830T123600Z").unwrap();
//! assert_eq!(format_date(t), "20150830");
//! assert_eq!(format_iso8601(t), "20150830T123600Z");
//! assert_eq!(
//!     hex_sha256(b""),
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
//! );
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
