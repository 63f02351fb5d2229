use anyhow::Result;
use http::StatusCode;
use log::{debug, warn};
use presign_aws_s3::{Config, DefaultBucketResolver, Presigner, ResolveBucket};
use presign_core::{Context, OsEnv};
use presign_http_send_reqwest::ReqwestHttpSend;
use std::env;
use std::time::Duration;

/// Load the bucket and object used by live tests.
///
/// Credentials and region are read through `Config::from_env`, i.e. from
/// the usual `AWS_*` variables.
fn init_live_test() -> Option<(Context, String, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("PRESIGN_AWS_S3_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let bucket = env::var("PRESIGN_AWS_S3_BUCKET").expect("PRESIGN_AWS_S3_BUCKET must be set");
    let object = env::var("PRESIGN_AWS_S3_OBJECT").expect("PRESIGN_AWS_S3_OBJECT must be set");
    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    Some((ctx, bucket, object))
}

#[tokio::test]
async fn test_get_object_with_presigned_url() -> Result<()> {
    let Some((ctx, bucket, object)) = init_live_test() else {
        warn!("PRESIGN_AWS_S3_TEST is not set, skipped");
        return Ok(());
    };

    let resolver = DefaultBucketResolver::new(Config::default().from_env(&ctx));
    let resolved = resolver.resolve_bucket(&ctx, &bucket).await?;
    debug!("resolved bucket: {resolved:?}");

    let presigner = Presigner::from_resolved(&resolved, Duration::from_secs(300))?;
    let url = presigner.presigned_get_url(&object)?;
    debug!("presigned url: {url}");

    let resp = reqwest::get(&url).await?;
    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_tampered_url_is_rejected() -> Result<()> {
    let Some((ctx, bucket, object)) = init_live_test() else {
        warn!("PRESIGN_AWS_S3_TEST is not set, skipped");
        return Ok(());
    };

    let resolver = DefaultBucketResolver::new(Config::default().from_env(&ctx));
    let resolved = resolver.resolve_bucket(&ctx, &bucket).await?;
    let presigner = Presigner::from_resolved(&resolved, Duration::from_secs(300))?;
    let url = presigner
        .presigned_get_url(&object)?
        .replace("X-Amz-Expires=300", "X-Amz-Expires=301");

    let resp = reqwest::get(&url).await?;
    assert_eq!(StatusCode::FORBIDDEN, resp.status());
    Ok(())
}
