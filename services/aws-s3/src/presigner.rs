use crate::{ResolvedBucket, SigningContext, SigningIdentity};
use once_cell::sync::OnceCell;
use presign_core::time::DateTime;
use presign_core::{Error, Result};
use std::time::Duration;

/// Presigner signs GET urls for many objects of one bucket.
///
/// The [`SigningContext`] is built on the first successful call and reused
/// for every later one. Calls rejected by validation leave the presigner
/// untouched.
///
/// ```
/// use presign_aws_s3::{Bucket, Credential, Presigner, SigningIdentity};
/// use std::time::Duration;
///
/// # fn main() -> presign_core::Result<()> {
/// let bucket = Bucket::virtual_hosted("examplebucket", "eu-west-1")?;
/// let identity = SigningIdentity::new(
///     &bucket,
///     Credential::new("access_key_id", "secret_access_key"),
///     Duration::from_secs(3600),
/// )?;
///
/// let presigner = Presigner::new(identity);
/// let url = presigner.presigned_get_url("photos/cat.jpg")?;
/// assert!(url.starts_with("https://examplebucket.s3.eu-west-1.amazonaws.com/photos/cat.jpg?"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Presigner {
    identity: SigningIdentity,
    context: OnceCell<SigningContext>,
}

impl Presigner {
    /// Create a presigner that builds its signing context on first use.
    pub fn new(identity: SigningIdentity) -> Self {
        Self {
            identity,
            context: OnceCell::new(),
        }
    }

    /// Create a presigner with its signing context already built.
    pub fn primed(identity: SigningIdentity) -> Self {
        let context = OnceCell::with_value(SigningContext::build(&identity));
        Self { identity, context }
    }

    /// Create a presigner for a resolved bucket, signing from now.
    pub fn from_resolved(resolved: &ResolvedBucket, expires_in: Duration) -> Result<Self> {
        let identity = SigningIdentity::new(
            &resolved.bucket,
            resolved.credential.clone(),
            expires_in,
        )?;
        Ok(Self::new(identity))
    }

    /// Create a presigner for a resolved bucket, signing from `time`.
    pub fn from_resolved_at(
        resolved: &ResolvedBucket,
        expires_in: Duration,
        time: DateTime,
    ) -> Result<Self> {
        let identity = SigningIdentity::new(
            &resolved.bucket,
            resolved.credential.clone(),
            expires_in,
        )?
        .with_time(time);
        Ok(Self::new(identity))
    }

    /// Identity this presigner signs with.
    pub fn identity(&self) -> &SigningIdentity {
        &self.identity
    }

    /// Whether the signing context has been built.
    pub fn is_primed(&self) -> bool {
        self.context.get().is_some()
    }

    /// Signing context of this presigner, built if needed.
    pub fn signing_context(&self) -> &SigningContext {
        self.context
            .get_or_init(|| SigningContext::build(&self.identity))
    }

    /// Produce a presigned GET url for `object_key`.
    pub fn presigned_get_url(&self, object_key: &str) -> Result<String> {
        validate_object_key(object_key)?;
        self.signing_context().presigned_get_url(object_key)
    }

    /// Produce presigned GET urls for a page of keys, in order.
    ///
    /// All keys are checked before anything is signed.
    pub fn presigned_get_urls<I, K>(&self, object_keys: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = object_keys.into_iter().collect();
        for key in &keys {
            validate_object_key(key.as_ref())?;
        }

        let ctx = self.signing_context();
        keys.iter()
            .map(|key| ctx.presigned_get_url(key.as_ref()))
            .collect()
    }
}

fn validate_object_key(object_key: &str) -> Result<()> {
    if object_key.is_empty() {
        return Err(Error::request_invalid("object_key must not be empty"));
    }
    Ok(())
}
