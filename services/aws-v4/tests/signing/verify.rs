use super::*;
use anyhow::Result;
use pretty_assertions::assert_eq;
use sigv4_aws_v4::{generate_challenge, validate_challenge, Payload};
use sigv4_core::hash::hex_sha256;
use sigv4_core::ErrorKind;
use std::time::Duration;

const MAX_SKEW: Duration = Duration::from_secs(15 * 60);

fn signed_parts(uri: &str, cred: &Credential) -> Result<Parts> {
    let (mut parts, _) = http::Request::put(uri).body(())?.into_parts();
    parts
        .headers
        .insert("content-type", http::HeaderValue::from_static("text/plain"));

    suite_signer().sign_parts(&mut parts, cred, SigningMethod::Header)?;
    Ok(parts)
}

#[test]
fn test_signed_request_validates() -> Result<()> {
    init_logger();

    let parts = signed_parts(
        "https://example.amazonaws.com/bucket/a%20key?acl&versionId=2",
        &suite_credential().with_session_token("token"),
    )?;

    let req = descriptor_from_parts(&parts);
    let challenge = generate_challenge(&req, time(SUITE_DATE), MAX_SKEW)?;
    assert_eq!(challenge.access_key_id, SUITE_ACCESS_KEY);
    assert_eq!(
        challenge.credential_scope,
        "20150830/us-east-1/service/aws4_request"
    );

    validate_challenge(&challenge, SUITE_SECRET_KEY)?;
    Ok(())
}

#[test]
fn test_tampered_query_fails() -> Result<()> {
    let parts = signed_parts(
        "https://example.amazonaws.com/bucket/key?versionId=2",
        &suite_credential(),
    )?;

    let mut req = descriptor_from_parts(&parts);
    req.url = "https://example.amazonaws.com/bucket/key?versionId=3".into();

    let challenge = generate_challenge(&req, time(SUITE_DATE), MAX_SKEW)?;
    let err = validate_challenge(&challenge, SUITE_SECRET_KEY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);
    Ok(())
}

#[test]
fn test_unsigned_header_can_change() -> Result<()> {
    let parts = signed_parts("https://example.amazonaws.com/", &suite_credential())?;

    // Only headers listed in SignedHeaders are covered.
    let mut req = descriptor_from_parts(&parts);
    req.headers.append("x-forwarded-for", "10.0.0.1");

    let challenge = generate_challenge(&req, time(SUITE_DATE), MAX_SKEW)?;
    validate_challenge(&challenge, SUITE_SECRET_KEY)?;
    Ok(())
}

#[test]
fn test_body_is_used_without_content_sha256() -> Result<()> {
    let signer = suite_signer();
    let req = suite_request("/upload").with_payload("hello");
    let auth = authorization(&signer, &req, &suite_credential());

    let received = req.clone().with_header("Authorization", auth.as_str());
    let challenge = generate_challenge(&received, time(SUITE_DATE), MAX_SKEW)?;
    validate_challenge(&challenge, SUITE_SECRET_KEY)?;

    let mut tampered = received.clone();
    tampered.payload = Payload::from("hellp");
    let challenge = generate_challenge(&tampered, time(SUITE_DATE), MAX_SKEW)?;
    let err = validate_challenge(&challenge, SUITE_SECRET_KEY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);
    Ok(())
}

#[test]
fn test_swapped_body_is_rejected() -> Result<()> {
    let signer = suite_signer();
    let req = suite_request("/upload")
        .with_header("x-amz-content-sha256", hex_sha256(b"hello"))
        .with_payload("hello");
    let auth = authorization(&signer, &req, &suite_credential());

    let received = req.with_header("Authorization", auth.as_str());
    let challenge = generate_challenge(&received, time(SUITE_DATE), MAX_SKEW)?;
    validate_challenge(&challenge, SUITE_SECRET_KEY)?;

    let swapped = received.with_payload("EVIL BODY");
    let err = generate_challenge(&swapped, time(SUITE_DATE), MAX_SKEW).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);
    Ok(())
}

#[test]
fn test_skewed_request_is_rejected() -> Result<()> {
    let parts = signed_parts("https://example.amazonaws.com/", &suite_credential())?;
    let req = descriptor_from_parts(&parts);

    let err = generate_challenge(&req, time("20150830T125200Z"), MAX_SKEW).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestTimeSkewed);

    let err = generate_challenge(&req, time("20150830T122000Z"), MAX_SKEW).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestTimeSkewed);

    generate_challenge(&req, time("20150830T125000Z"), MAX_SKEW)?;
    Ok(())
}
