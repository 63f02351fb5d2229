use crate::constants::DEFAULT_REGION;
use http::Uri;
use presign_core::{Error, Result};

/// Normalize a bucket region.
///
/// Location lookups for buckets in `us-east-1` report an empty region, but a
/// credential scope with an empty region segment is rejected by S3.
pub fn normalize_region(region: &str) -> &str {
    if region.is_empty() {
        DEFAULT_REGION
    } else {
        region
    }
}

/// Bucket is the resolved location of an S3 bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    name: String,
    endpoint: String,
    host: String,
    path: String,
    region: String,
}

impl Bucket {
    /// Build a bucket from an explicit endpoint url.
    ///
    /// The endpoint is the url objects are appended to, for example
    /// `https://examplebucket.s3.amazonaws.com` or
    /// `http://127.0.0.1:9000/examplebucket`. The host is taken from the
    /// endpoint and keeps an explicit port other than the scheme default,
    /// matching the `Host` header clients send.
    pub fn new(name: &str, endpoint: &str, region: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::config_invalid("bucket name must not be empty"));
        }

        let endpoint = endpoint.trim_end_matches('/');
        let uri: Uri = endpoint.parse()?;
        if uri.scheme().is_none() {
            return Err(Error::config_invalid(format!(
                "bucket endpoint {endpoint} must be an absolute url"
            )));
        }
        if uri.query().is_some() {
            return Err(Error::config_invalid(format!(
                "bucket endpoint {endpoint} must not carry a query"
            )));
        }
        let Some(host) = uri.host() else {
            return Err(Error::config_invalid(format!(
                "bucket endpoint {endpoint} has no host"
            )));
        };
        let default_port = match uri.scheme_str() {
            Some("https") => Some(443),
            Some("http") => Some(80),
            _ => None,
        };
        let host = match uri.port_u16() {
            Some(port) if Some(port) != default_port => format!("{host}:{port}"),
            _ => host.to_string(),
        };

        let path = uri.path().trim_end_matches('/').to_string();

        Ok(Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            host,
            path,
            region: normalize_region(region).to_string(),
        })
    }

    /// Build a bucket addressed in virtual-hosted style on AWS.
    pub fn virtual_hosted(name: &str, region: &str) -> Result<Self> {
        let region = normalize_region(region);
        let endpoint = if region == DEFAULT_REGION {
            format!("https://{name}.s3.amazonaws.com")
        } else {
            format!("https://{name}.s3.{region}.amazonaws.com")
        };
        Self::new(name, &endpoint, region)
    }

    /// Build a bucket addressed in path style below a custom endpoint.
    pub fn path_style(endpoint: &str, name: &str, region: &str) -> Result<Self> {
        let endpoint = format!("{}/{name}", endpoint.trim_end_matches('/'));
        Self::new(name, &endpoint, region)
    }

    /// Name of the bucket.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint url without trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Host, including a non-default port.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path of the endpoint without trailing slash, empty for virtual-hosted
    /// buckets. Object paths are signed below it.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Normalized region.
    pub fn region(&self) -> &str {
        &self.region
    }
}
