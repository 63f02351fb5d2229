//! Presigned GET urls for AWS S3.
//!
//! Signing a large page of objects from one bucket repeats most of the SigV4
//! work: the signing key, credential scope and query string only depend on
//! the bucket, the credential and the signing time. [`Presigner`] computes
//! those once into a [`SigningContext`] and then signs each object key with
//! a single hash and HMAC.
//!
//! ## Example
//!
//! ```no_run
//! use presign_aws_s3::{Config, DefaultBucketResolver, Presigner, ResolveBucket};
//! use presign_core::{Context, OsEnv, Result};
//! use presign_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let resolver = DefaultBucketResolver::new(Config::default().from_env(&ctx));
//!
//! let resolved = resolver.resolve_bucket(&ctx, "examplebucket").await?;
//! let presigner = Presigner::from_resolved(&resolved, Duration::from_secs(3600))?;
//! let urls = presigner.presigned_get_urls(["a.jpg", "b.jpg"])?;
//! # Ok(())
//! # }
//! ```
//!
//! Object keys are placed in the signed path verbatim, so keys must not need
//! percent-encoding.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::DEFAULT_REGION;
pub use constants::MAX_EXPIRES_IN_SECS;

mod bucket;
pub use bucket::normalize_region;
pub use bucket::Bucket;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod resolve;
pub use resolve::DefaultBucketResolver;
pub use resolve::ResolveBucket;
pub use resolve::ResolvedBucket;

mod signing_key;
pub use signing_key::derive_signing_key;

mod identity;
pub use identity::SigningIdentity;

mod signing_context;
pub use signing_context::SigningContext;

mod presigner;
pub use presigner::Presigner;
