use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait used by resolvers to decide whether a
/// cached credential can still be used.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used to load a credential from the environment.
///
/// Services may require different credentials to sign requests. For example,
/// S3 requires an access key and a secret key, optionally with a session token.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load a credential from the current context.
    ///
    /// - If succeed, return `Ok(Some(cred))`
    /// - If not found, return `Ok(None)`
    /// - If unexpected errors happened, return `Err(err)`
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
