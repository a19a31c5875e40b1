// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::*;
use anyhow::Result;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pretty_assertions::assert_eq;
use sigv4_aws_v4::{canonicalize, UrlParts};
use test_case::test_case;

#[test_case("test file with spaces.txt", "/test%20file%20with%20spaces.txt"; "spaces")]
#[test_case("文件名.txt", "/%E6%96%87%E4%BB%B6%E5%90%8D.txt"; "unicode")]
#[test_case("!@#$%^&*()_+-=;:'><,?.txt", "/%21%40%23%24%25%5E%26%2A%28%29_%2B-%3D%3B%3A%27%3E%3C%2C%3F.txt"; "punctuation")]
#[test_case("a/b/~c.txt", "/a/b/~c.txt"; "unreserved and separators")]
fn test_canonical_path_with_special_characters(name: &str, expected: &str) {
    let ctx = SigningContext::new("us-east-1", "s3").with_time(time(SUITE_DATE));

    // Encoded by the caller, decoded once, encoded again the SigV4 way.
    let raw = format!(
        "https://example.amazonaws.com/{}",
        utf8_percent_encode(name, NON_ALPHANUMERIC)
    )
    .replace("%2F", "/");
    let from_raw = canonicalize(&RequestDescriptor::new("HEAD", raw), &ctx).unwrap();
    assert_eq!(from_raw.uri(), expected);

    // Already decoded by the caller, never decoded again.
    let structured = RequestDescriptor::new("HEAD", UrlParts::new(format!("/{name}")));
    let from_parts = canonicalize(&structured, &ctx).unwrap();
    assert_eq!(from_parts.uri(), expected);
}

#[test]
fn test_percent_in_structured_path_is_encoded() -> Result<()> {
    let ctx = SigningContext::new("us-east-1", "s3").with_time(time(SUITE_DATE));
    let req = RequestDescriptor::new("GET", UrlParts::new("/100%25.txt"));

    assert_eq!(canonicalize(&req, &ctx)?.uri(), "/100%2525.txt");
    Ok(())
}

#[test]
fn test_query_with_special_characters() -> Result<()> {
    let ctx = SigningContext::new("us-east-1", "s3").with_time(time(SUITE_DATE));
    let req = RequestDescriptor::new(
        "GET",
        UrlParts::new("/")
            .with_query("prefix", "a b/c")
            .with_query("marker", "文")
            .with_query("empty", "")
            .with_query("tilde", "~x"),
    );

    assert_eq!(
        canonicalize(&req, &ctx)?.query(),
        "empty=&marker=%E6%96%87&prefix=a%20b%2Fc&tilde=~x"
    );
    Ok(())
}

#[test]
fn test_sign_parts_keeps_encoded_path() -> Result<()> {
    let (mut parts, _) = http::Request::head("https://example.amazonaws.com/test%20file.txt")
        .body(())?
        .into_parts();

    suite_signer().sign_parts(&mut parts, &suite_credential(), SigningMethod::Header)?;

    assert_eq!(parts.uri.path(), "/test%20file.txt");
    assert!(parts.headers.contains_key(http::header::AUTHORIZATION));
    Ok(())
}
