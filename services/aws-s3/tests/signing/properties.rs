use super::{example_identity, example_identity_in, signature_of, split_url, ENDPOINT};
use presign_aws_s3::{Presigner, SigningContext};
use presign_core::time::parse_rfc3339;
use presign_core::ErrorKind;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_single_lowercase_hex_signature() {
    let presigner = Presigner::new(example_identity(3600, None));
    let url = presigner
        .presigned_get_url("photos/2024/cat.jpg")
        .expect("url must be signed");

    assert_eq!(url.matches("X-Amz-Signature=").count(), 1);
    let signature = signature_of(&url);
    assert_eq!(signature.len(), 64);
    assert!(signature
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn test_keys_share_query_template() {
    let presigner = Presigner::new(example_identity(3600, None));
    let a = presigner.presigned_get_url("a.txt").expect("url must be signed");
    let b = presigner.presigned_get_url("b.txt").expect("url must be signed");

    let (path_a, mut query_a) = split_url(&a);
    let (path_b, mut query_b) = split_url(&b);
    assert_eq!(path_a, format!("{ENDPOINT}/a.txt"));
    assert_eq!(path_b, format!("{ENDPOINT}/b.txt"));

    let sig_a = query_a.pop().expect("signature must be last");
    let sig_b = query_b.pop().expect("signature must be last");
    assert_eq!(query_a, query_b);
    assert_ne!(sig_a, sig_b);
}

#[test]
fn test_signing_is_deterministic() {
    let presigner = Presigner::new(example_identity(3600, None));
    let first = presigner.presigned_get_url("a.txt").expect("url must be signed");
    let second = presigner.presigned_get_url("a.txt").expect("url must be signed");
    assert_eq!(first, second);

    let fresh = SigningContext::build(presigner.identity())
        .presigned_get_url("a.txt")
        .expect("url must be signed");
    assert_eq!(first, fresh);
}

#[test_case(""; "empty region")]
#[test_case("us-east-1"; "explicit region")]
fn test_region_defaults_to_us_east_1(region: &str) {
    let ctx = SigningContext::build(&example_identity_in(region, 60, None));
    assert_eq!(ctx.credential_scope(), "20130524/us-east-1/s3/aws4_request");

    let url = ctx.presigned_get_url("a.txt").expect("url must be signed");
    assert!(url.contains("%2Fus-east-1%2Fs3%2Faws4_request"));
}

#[test]
fn test_other_region_in_scope() {
    let ctx = SigningContext::build(&example_identity_in("eu-central-1", 60, None));
    assert_eq!(ctx.credential_scope(), "20130524/eu-central-1/s3/aws4_request");
}

#[test]
fn test_rejected_key_leaves_presigner_unprimed() {
    let identity = example_identity(173, None);
    let presigner = Presigner::new(identity);

    let err = presigner.presigned_get_url("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(!presigner.is_primed());

    let url = presigner
        .presigned_get_url("dir/testobject")
        .expect("url must be signed");
    assert!(presigner.is_primed());
    // Signed from the construction time, not the time of the first call.
    assert!(url.contains("X-Amz-Date=20130524T000000Z"));
    assert_eq!(
        presigner.identity().time(),
        parse_rfc3339("2013-05-24T00:00:00Z").expect("time must be valid")
    );
}

#[test]
fn test_session_token_position() {
    let presigner = Presigner::new(example_identity(60, Some("token")));
    let url = presigner.presigned_get_url("a.txt").expect("url must be signed");
    let (_, query) = split_url(&url);
    let names: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "X-Amz-Algorithm",
            "X-Amz-Credential",
            "X-Amz-Date",
            "X-Amz-Expires",
            "X-Amz-Security-Token",
            "X-Amz-SignedHeaders",
            "X-Amz-Signature",
        ]
    );
    assert_eq!(url.matches("X-Amz-Security-Token=").count(), 1);
}

#[test]
fn test_session_token_absent() {
    let presigner = Presigner::new(example_identity(60, None));
    let url = presigner.presigned_get_url("a.txt").expect("url must be signed");
    assert!(!url.contains("X-Amz-Security-Token"));
}

#[test]
fn test_query_encoding_uses_percent_twenty() {
    let presigner = Presigner::new(example_identity(60, Some("a b~c")));
    let url = presigner.presigned_get_url("a.txt").expect("url must be signed");
    assert!(url.contains("X-Amz-Security-Token=a%20b~c&"));
}

#[test]
fn test_keys_are_signed_verbatim() {
    // Keys needing escaping are neither encoded in the url nor in the
    // signed path, so S3 will reject such urls.
    let ctx = SigningContext::build(&example_identity(60, None));

    let creq = ctx
        .canonical_request("my photo+1.jpg")
        .expect("canonical request must build");
    assert!(creq.starts_with("GET\n/my photo+1.jpg\n"));

    let url = ctx
        .presigned_get_url("my photo+1.jpg")
        .expect("url must be signed");
    assert!(url.starts_with(&format!("{ENDPOINT}/my photo+1.jpg?")));
}
