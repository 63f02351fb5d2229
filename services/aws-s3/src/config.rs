use crate::constants::*;
use presign_core::utils::Redact;
use presign_core::Context;
use std::fmt::{Debug, Formatter};

/// Config carries all the configuration for resolving S3 buckets.
#[derive(Clone, Default)]
pub struct Config {
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    ///
    /// Left unset, the region of each bucket is looked up on first use.
    pub region: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ENDPOINT_URL_S3`]
    /// - env value: [`AWS_ENDPOINT_URL`]
    ///
    /// A custom endpoint switches bucket urls to path style: `{endpoint}/{bucket}`.
    pub endpoint: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values already set on `self` always win over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx
            .env_var(AWS_REGION)
            .or_else(|| ctx.env_var(AWS_DEFAULT_REGION))
        {
            self.region.get_or_insert(v);
        }
        if let Some(v) = ctx
            .env_var(AWS_ENDPOINT_URL_S3)
            .or_else(|| ctx.env_var(AWS_ENDPOINT_URL))
        {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AWS_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AWS_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AWS_SESSION_TOKEN) {
            self.session_token.get_or_insert(v);
        }

        self
    }
}
