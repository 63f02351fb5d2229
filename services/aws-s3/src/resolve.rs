use crate::constants::X_AMZ_BUCKET_REGION;
use crate::provide_credential::DefaultCredentialProvider;
use crate::{normalize_region, Bucket, Config, Credential};
use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use log::{debug, warn};
use presign_core::{Context, Error, ProvideCredential, Result, SigningCredential};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

/// ResolvedBucket is everything needed to presign urls for one bucket.
#[derive(Debug, Clone)]
pub struct ResolvedBucket {
    /// Location of the bucket.
    pub bucket: Bucket,
    /// Credential to sign with.
    pub credential: Credential,
}

/// ResolveBucket turns a bucket name into its location and a signing credential.
#[async_trait]
pub trait ResolveBucket: Debug + Send + Sync + 'static {
    /// Resolve `bucket`.
    ///
    /// Implementations must drop any cached session before returning an error,
    /// so the next call starts over.
    async fn resolve_bucket(&self, ctx: &Context, bucket: &str) -> Result<ResolvedBucket>;

    /// Drop the cached session.
    fn invalidate(&self);
}

#[derive(Debug, Default)]
struct Session {
    credential: Option<Credential>,
    regions: HashMap<String, String>,
}

/// DefaultBucketResolver resolves buckets through a credential provider and
/// bucket location lookups, caching both in a session shared by its clones.
///
/// - The region comes from [`Config::region`] when set, otherwise it is looked
///   up once per bucket with a `HEAD` request.
/// - The endpoint is `{endpoint}/{bucket}` when [`Config::endpoint`] is set,
///   otherwise the virtual-hosted AWS endpoint of the bucket region.
#[derive(Debug, Clone)]
pub struct DefaultBucketResolver {
    config: Arc<Config>,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    session: Arc<RwLock<Option<Session>>>,
}

impl DefaultBucketResolver {
    /// Create a resolver loading credentials through [`DefaultCredentialProvider`].
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            provider: Arc::new(DefaultCredentialProvider::new(config.clone())),
            config,
            session: Arc::default(),
        }
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    async fn resolve(&self, ctx: &Context, name: &str) -> Result<ResolvedBucket> {
        if name.is_empty() {
            return Err(Error::config_invalid("bucket name must not be empty"));
        }

        let credential = self.load_credential(ctx).await?;
        let region = self.load_region(ctx, name).await?;
        let bucket = match &self.config.endpoint {
            Some(endpoint) => Bucket::path_style(endpoint, name, &region)?,
            None => Bucket::virtual_hosted(name, &region)?,
        };

        Ok(ResolvedBucket { bucket, credential })
    }

    async fn load_credential(&self, ctx: &Context) -> Result<Credential> {
        // Return cached credential if it's still valid.
        let cached = self
            .session
            .read()
            .expect("lock poisoned")
            .as_ref()
            .and_then(|s| s.credential.clone());
        if let Some(cred) = cached.filter(|c| c.is_valid()) {
            debug!("reuse cached credential");
            return Ok(cred);
        }

        debug!("cached credential is missing or expired, loading");
        let Some(cred) = self
            .provider
            .provide_credential(ctx)
            .await?
            .filter(|c| c.is_valid())
        else {
            return Err(Error::credential_invalid("no valid credential found"));
        };

        let mut lock = self.session.write().expect("lock poisoned");
        lock.get_or_insert_with(Session::default).credential = Some(cred.clone());
        Ok(cred)
    }

    async fn load_region(&self, ctx: &Context, name: &str) -> Result<String> {
        if let Some(region) = &self.config.region {
            return Ok(normalize_region(region).to_string());
        }

        let cached = self
            .session
            .read()
            .expect("lock poisoned")
            .as_ref()
            .and_then(|s| s.regions.get(name).cloned());
        if let Some(region) = cached {
            debug!("reuse cached region {region} of bucket {name}");
            return Ok(region);
        }

        let region = self.lookup_region(ctx, name).await?;

        let mut lock = self.session.write().expect("lock poisoned");
        lock.get_or_insert_with(Session::default)
            .regions
            .insert(name.to_string(), region.clone());
        Ok(region)
    }

    /// Ask S3 where the bucket lives.
    ///
    /// The answer is carried in `x-amz-bucket-region` on `200`, `301` and
    /// `403` responses alike, so the request does not need to be signed.
    async fn lookup_region(&self, ctx: &Context, name: &str) -> Result<String> {
        let url = match &self.config.endpoint {
            Some(endpoint) => format!("{}/{name}", endpoint.trim_end_matches('/')),
            None => format!("https://{name}.s3.amazonaws.com"),
        };
        debug!("looking up region of bucket {name} via {url}");

        let req = http::Request::head(&url).body(Bytes::new())?;
        let resp = ctx.http_send(req).await?;

        if let Some(v) = resp.headers().get(X_AMZ_BUCKET_REGION) {
            let region = normalize_region(v.to_str()?).to_string();
            debug!("bucket {name} is located in {region}");
            return Ok(region);
        }

        match resp.status() {
            StatusCode::FORBIDDEN => Err(Error::credential_denied(format!(
                "access to bucket {name} is denied"
            ))),
            status => Err(Error::unexpected(format!(
                "region lookup of bucket {name} returned {status} without {X_AMZ_BUCKET_REGION}"
            ))),
        }
    }
}

#[async_trait]
impl ResolveBucket for DefaultBucketResolver {
    async fn resolve_bucket(&self, ctx: &Context, bucket: &str) -> Result<ResolvedBucket> {
        match self.resolve(ctx, bucket).await {
            Ok(resolved) => Ok(resolved),
            Err(err) => {
                warn!("resolve bucket {bucket} failed, invalidating session: {err}");
                self.invalidate();
                Err(err)
            }
        }
    }

    fn invalidate(&self) {
        let mut lock = self.session.write().expect("lock poisoned");
        *lock = None;
    }
}
