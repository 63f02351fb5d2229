// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::{
    ALGORITHM, AWS_QUERY_ENCODE_SET, SCOPE_TERMINATOR, UNSIGNED_PAYLOAD, X_AMZ_ALGORITHM,
    X_AMZ_CREDENTIAL, X_AMZ_DATE, X_AMZ_EXPIRES, X_AMZ_SECURITY_TOKEN, X_AMZ_SIGNATURE,
    X_AMZ_SIGNED_HEADERS,
};
use crate::{derive_signing_key, SigningIdentity};
use log::debug;
use percent_encoding::utf8_percent_encode;
use presign_core::hash::{hex_hmac_sha256, hex_sha256};
use presign_core::time::{format_date, format_iso8601};
use presign_core::{Error, Result};
use std::fmt::{self, Debug, Formatter};

const SIGNED_HEADERS: &str = "host";

/// SigningContext keeps every part of a presigned GET that does not depend on
/// the object key.
///
/// Building a context derives the signing key and assembles the canonical
/// query once. Signing a key afterwards only hashes the canonical request
/// and computes one HMAC, and never mutates the context, so a context can be
/// shared freely between threads.
///
/// - [Authenticating Requests: Using Query Parameters](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html)
#[derive(Clone)]
pub struct SigningContext {
    endpoint: String,
    path: String,
    timestamp: String,
    date_stamp: String,
    credential_scope: String,
    canonical_headers: String,
    query_template: String,
    signing_key: Vec<u8>,

    // "AWS4-HMAC-SHA256\n<timestamp>\n<scope>\n"
    string_to_sign_prefix: String,
    // "\n<query>\n<headers>\n<signed headers>\n<payload>"
    canonical_request_suffix: String,
}

impl SigningContext {
    /// Compute the key-independent parts of a presigned url for `identity`.
    pub fn build(identity: &SigningIdentity) -> Self {
        let time = identity.time();
        let timestamp = format_iso8601(time);
        let date_stamp = format_date(time);

        // Scope: "20130524/us-east-1/s3/aws4_request"
        let credential_scope = format!(
            "{date_stamp}/{}/{}/{SCOPE_TERMINATOR}",
            identity.region(),
            identity.service()
        );
        debug!("calculated scope: {credential_scope}");

        let cred = identity.credential();
        let mut query = vec![
            format!("{X_AMZ_ALGORITHM}={ALGORITHM}"),
            format!(
                "{X_AMZ_CREDENTIAL}={}",
                utf8_percent_encode(
                    &format!("{}/{credential_scope}", cred.access_key_id),
                    &AWS_QUERY_ENCODE_SET
                )
            ),
            format!("{X_AMZ_DATE}={timestamp}"),
            format!("{X_AMZ_EXPIRES}={}", identity.expires_in().as_secs()),
        ];
        if let Some(token) = cred.session_token.as_deref().filter(|v| !v.is_empty()) {
            query.push(format!(
                "{X_AMZ_SECURITY_TOKEN}={}",
                utf8_percent_encode(token, &AWS_QUERY_ENCODE_SET)
            ));
        }
        query.push(format!("{X_AMZ_SIGNED_HEADERS}={SIGNED_HEADERS}"));
        let query_template = query.join("&");

        let canonical_headers = format!("host:{}\n", identity.host());
        let signing_key = derive_signing_key(
            &cred.secret_access_key,
            &date_stamp,
            identity.region(),
            identity.service(),
        );

        let string_to_sign_prefix = format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n");
        let canonical_request_suffix = format!(
            "\n{query_template}\n{canonical_headers}\n{SIGNED_HEADERS}\n{UNSIGNED_PAYLOAD}"
        );

        Self {
            endpoint: identity.endpoint().to_string(),
            path: identity.path().to_string(),
            timestamp,
            date_stamp,
            credential_scope,
            canonical_headers,
            query_template,
            signing_key,
            string_to_sign_prefix,
            canonical_request_suffix,
        }
    }

    /// Timestamp in `YYYYMMDDTHHMMSSZ` form.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Date stamp in `YYYYMMDD` form.
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// Credential scope: `date/region/s3/aws4_request`.
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// Canonical headers, a single `host` line with trailing newline.
    pub fn canonical_headers(&self) -> &str {
        &self.canonical_headers
    }

    /// Names of the signed headers.
    pub fn signed_headers(&self) -> &str {
        SIGNED_HEADERS
    }

    /// Query string shared by every url of this context, without the signature.
    pub fn query_template(&self) -> &str {
        &self.query_template
    }

    /// Build the canonical request for a GET of `object_key`.
    ///
    /// The key is placed in the path verbatim. Keys that need escaping will
    /// not produce a signature S3 accepts.
    pub fn canonical_request(&self, object_key: &str) -> Result<String> {
        let canonical_uri = self.canonical_uri(object_key)?;

        let mut creq = String::with_capacity(
            4 + canonical_uri.len() + self.canonical_request_suffix.len(),
        );
        creq.push_str("GET\n");
        creq.push_str(&canonical_uri);
        creq.push_str(&self.canonical_request_suffix);
        Ok(creq)
    }

    /// Build the string to sign for a GET of `object_key`.
    pub fn string_to_sign(&self, object_key: &str) -> Result<String> {
        let creq = self.canonical_request(object_key)?;

        let mut sts = self.string_to_sign_prefix.clone();
        sts.push_str(&hex_sha256(creq.as_bytes()));
        Ok(sts)
    }

    /// Produce a presigned GET url for `object_key`.
    pub fn presigned_get_url(&self, object_key: &str) -> Result<String> {
        let string_to_sign = self.string_to_sign(object_key)?;
        debug!("calculated string to sign: {string_to_sign}");
        let signature = hex_hmac_sha256(&self.signing_key, string_to_sign.as_bytes());

        Ok(format!(
            "{}/{object_key}?{}&{X_AMZ_SIGNATURE}={signature}",
            self.endpoint, self.query_template
        ))
    }

    fn canonical_uri(&self, object_key: &str) -> Result<String> {
        if object_key.is_empty() {
            return Err(Error::request_invalid("object_key must not be empty"));
        }
        Ok(format!("{}/{object_key}", self.path))
    }
}

impl Debug for SigningContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningContext")
            .field("endpoint", &self.endpoint)
            .field("timestamp", &self.timestamp)
            .field("credential_scope", &self.credential_scope)
            .field("query_template", &self.query_template)
            .finish_non_exhaustive()
    }
}
