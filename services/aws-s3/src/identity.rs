use crate::constants::{MAX_EXPIRES_IN_SECS, SERVICE};
use crate::{Bucket, Credential};
use presign_core::time::{now, DateTime};
use presign_core::{Error, Result};
use std::time::Duration;

/// SigningIdentity holds every input a presigner needs, fixed for its lifetime.
///
/// The reference time is captured here, not at signing time: all urls signed
/// from one identity share the same `X-Amz-Date`, and a later signing window
/// needs a new identity.
#[derive(Debug, Clone)]
pub struct SigningIdentity {
    region: String,
    endpoint: String,
    host: String,
    path: String,
    expires_in: Duration,
    time: DateTime,
    credential: Credential,
}

impl SigningIdentity {
    /// Create a signing identity for `bucket` with the current time as reference.
    ///
    /// `expires_in` must be between one second and seven days; sub-second
    /// parts are dropped.
    pub fn new(bucket: &Bucket, credential: Credential, expires_in: Duration) -> Result<Self> {
        let secs = expires_in.as_secs();
        if secs == 0 || secs > MAX_EXPIRES_IN_SECS {
            return Err(Error::config_invalid(format!(
                "expires_in must be between 1 and {MAX_EXPIRES_IN_SECS} seconds, got {secs}"
            )));
        }

        Ok(Self {
            region: bucket.region().to_string(),
            endpoint: bucket.endpoint().to_string(),
            host: bucket.host().to_string(),
            path: bucket.path().to_string(),
            expires_in: Duration::from_secs(secs),
            time: now(),
            credential,
        })
    }

    /// Specify the reference time instead of the construction time.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = time;
        self
    }

    /// Normalized region of the bucket.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service bound into the credential scope, always `s3`.
    pub fn service(&self) -> &str {
        SERVICE
    }

    /// Bucket endpoint url without trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Bucket host used in the canonical headers.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Endpoint path object keys are appended to, empty for virtual-hosted buckets.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Validity of produced urls.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Reference time for every signature.
    pub fn time(&self) -> DateTime {
        self.time
    }

    /// Credential used to sign.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
