//
//  octane-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Octane API access keys are a client id and a client secret. The client
//! sends them on every request as HTTP Basic credentials:
//!
//! ```text
//! Authorization: Basic base64(client_id:client_secret)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use octane_cli::auth::ApiKeyCredential;
//!
//! let credential = ApiKeyCredential::new("my-key", "my-secret");
//! assert_eq!(credential.basic_token(), "bXkta2V5Om15LXNlY3JldA==");
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// An Octane API access key.
///
/// The `Debug` implementation never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyCredential {
    client_id: String,
    client_secret: String,
}

impl ApiKeyCredential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.is_empty() || self.client_secret.is_empty()
    }

    /// The base64 `client_id:client_secret` token.
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
    }

    /// The `Authorization` header value, marked sensitive so it is redacted
    /// from reqwest's debug output.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Basic {}", self.basic_token()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyCredential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
