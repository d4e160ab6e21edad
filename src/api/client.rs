//
//  octane-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Octane API
//!
//! This module provides the core HTTP client for interacting with an Octane
//! server. It handles authentication, tenant scoping, and the request/response
//! conventions of the REST API.
//!
//! ## URL Layout
//!
//! Every request goes to:
//!
//! ```text
//! {url}/api[/shared_spaces/{space_id}][/workspaces/{workspace_id}]/{entity_path}[/{id}]
//! ```
//!
//! ## Features
//!
//! - HTTP Basic authentication from an API access key
//! - Immutable scoping: [`OctaneClient::scoped`] returns a new client
//! - Envelope normalization and field projection on reads
//! - Chunked, retried bulk creates
//! - Raw binary attachment download and upload

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::batch::{
    dispatch_chunks, BulkReport, Payload, RetryPolicy, MAX_CONCURRENT_CHUNKS,
    MAX_ITEMS_PER_REQUEST,
};
use super::common::{format_api_error, normalize, ApiError, DataEnvelope, Entity, Normalized, Result};
use super::{EntityType, GetOptions};
use crate::auth::ApiKeyCredential;

/// Workspace id applied by [`Scope::space_with_default_workspace`].
///
/// This is the id Octane assigns to the first workspace of a new space.
pub const DEFAULT_WORKSPACE_ID: &str = "500";

// Needed by some endpoints; header names must be lowercase for `from_static`.
const TECH_PREVIEW_HEADER: &str = "alm-octane-tech-preview";
const CLIENT_TYPE_HEADER: &str = "hpeclienttype";
const CLIENT_TYPE: &str = "HPE_MQM_UI";

/// Connection settings for an [`OctaneClient`].
///
/// # Example
///
/// ```rust
/// use octane_cli::api::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://octane.example.com", "key", "secret")
///     .accept_invalid_certs(false)
///     .timeout(Duration::from_secs(30));
/// assert!(!config.accept_invalid_certs);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, without the `/api` suffix.
    pub url: String,
    pub credential: ApiKeyCredential,
    /// Skip TLS certificate validation. Defaults to `true`, since Octane
    /// installations commonly serve self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credential: ApiKeyCredential::new(api_key, secret),
            accept_invalid_certs: true,
            timeout: None,
        }
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Space and workspace ids to narrow a client to.
///
/// Fields left as `None` keep the client's current value, except that
/// setting a space always clears the workspace: a workspace only has meaning
/// inside the space it was chosen for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub space_id: Option<String>,
    pub workspace_id: Option<String>,
}

impl Scope {
    pub fn space(space_id: impl ToString) -> Self {
        Self {
            space_id: Some(space_id.to_string()),
            workspace_id: None,
        }
    }

    pub fn workspace(workspace_id: impl ToString) -> Self {
        Self {
            space_id: None,
            workspace_id: Some(workspace_id.to_string()),
        }
    }

    /// A space together with [`DEFAULT_WORKSPACE_ID`].
    pub fn space_with_default_workspace(space_id: impl ToString) -> Self {
        Self::space(space_id).with_workspace(DEFAULT_WORKSPACE_ID)
    }

    pub fn with_workspace(mut self, workspace_id: impl ToString) -> Self {
        self.workspace_id = Some(workspace_id.to_string());
        self
    }
}

/// An attachment to upload.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub name: String,
    /// Id of the work item that will own the attachment.
    pub owner_work_item_id: String,
    pub data: Bytes,
}

/// HTTP client for an Octane server.
///
/// A client is a cheap, immutable view: cloning shares the connection pool,
/// and [`scoped`](Self::scoped) derives a new view without touching the
/// original. Clients derived from the same base can be used concurrently.
///
/// # Example
///
/// ```rust,no_run
/// use octane_cli::api::{ClientConfig, EntityType, GetOptions, OctaneClient, Scope};
///
/// # async fn run() -> Result<(), octane_cli::api::ApiError> {
/// let client = OctaneClient::new(ClientConfig::new("https://octane.example.com", "key", "secret"))?
///     .scoped(Scope::space(1001).with_workspace(1002));
///
/// let defects = client
///     .get_entity(EntityType::Defects, &GetOptions::new().fields(["id", "name", "severity"]))
///     .await?;
/// println!("{} defects", defects.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OctaneClient {
    http: Client,
    root: Url,
    space_id: Option<String>,
    workspace_id: Option<String>,
}

impl OctaneClient {
    /// Builds an unscoped client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] when the URL is not an absolute
    /// http(s) URL or the credential is incomplete, and
    /// [`ApiError::Network`] when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let url = Url::parse(config.url.trim())
            .map_err(|e| ApiError::InvalidConfig(format!("invalid url '{}': {}", config.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidConfig(format!(
                "unsupported url scheme '{}'",
                url.scheme()
            )));
        }
        if config.credential.is_empty() {
            return Err(ApiError::InvalidConfig(
                "api key and secret are required".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(TECH_PREVIEW_HEADER),
            HeaderValue::from_static("true"),
        );
        headers.insert(
            HeaderName::from_static(CLIENT_TYPE_HEADER),
            HeaderValue::from_static(CLIENT_TYPE),
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            config
                .credential
                .header_value()
                .map_err(|e| ApiError::InvalidConfig(format!("invalid credential: {}", e)))?,
        );

        if config.accept_invalid_certs {
            info!("TLS certificate validation is disabled for {}", url);
        }

        let mut builder = Client::builder()
            .user_agent(format!("octane/{}", crate::VERSION))
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(
            url = %url,
            client_id = config.credential.client_id(),
            "Created Octane client"
        );

        let mut root = url;
        root.set_query(None);
        root.set_fragment(None);

        Ok(Self {
            http: builder.build()?,
            root,
            space_id: None,
            workspace_id: None,
        })
    }

    /// Returns a new client narrowed to `scope`.
    ///
    /// A new space discards any workspace set on `self`; the workspace must
    /// be re-applied relative to the new space. `self` is never modified.
    pub fn scoped(&self, scope: Scope) -> Self {
        let mut scoped = self.clone();
        if let Some(space_id) = scope.space_id {
            scoped.space_id = Some(space_id);
            scoped.workspace_id = None;
        }
        if let Some(workspace_id) = scope.workspace_id {
            scoped.workspace_id = Some(workspace_id);
        }
        scoped
    }

    pub fn space_id(&self) -> Option<&str> {
        self.space_id.as_deref()
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// The scoped API base, e.g. `https://host/api/shared_spaces/1001/workspaces/1002`.
    pub fn api_url(&self) -> String {
        self.scoped_url(std::iter::empty())
    }

    fn entity_url(&self, entity_type: EntityType, id: Option<&str>) -> String {
        self.scoped_url(entity_type.path().split('/').chain(id))
    }

    /// Ids are pushed as single path segments, so `/` or `?` inside one is
    /// percent-encoded instead of changing the addressed resource.
    fn scoped_url<'a>(&self, tail: impl IntoIterator<Item = &'a str>) -> String {
        let mut url = self.root.clone();
        // http(s) URLs always have a path, so this only skips on a
        // cannot-be-a-base URL, which `new` rejects.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("api");
            if let Some(space_id) = &self.space_id {
                segments.push("shared_spaces").push(space_id);
            }
            if let Some(workspace_id) = &self.workspace_id {
                segments.push("workspaces").push(workspace_id);
            }
            segments.extend(tail);
        }
        url.into()
    }

    /// Reads entities.
    ///
    /// The response is normalized, projected onto `options.fields`, and a
    /// collection holding exactly one entity is collapsed to that entity.
    pub async fn get_entity(
        &self,
        entity_type: EntityType,
        options: &GetOptions,
    ) -> Result<Normalized> {
        let url = self.entity_url(entity_type, options.id.as_deref());
        debug!(%url, fields = %options.fields, "GET entity");

        let request = self.http.get(&url).query(&options.query_pairs());
        let body = self.send_json(request).await?;

        Ok(normalize(body)?.project(&options.fields).collapse())
    }

    /// Creates entities in chunks of [`MAX_ITEMS_PER_REQUEST`] with the
    /// default [`RetryPolicy`].
    ///
    /// Never fails as a whole: inspect the returned [`BulkReport`] for chunks
    /// that could not be written.
    pub async fn create_entity(
        &self,
        entity_type: EntityType,
        payload: impl Into<Payload>,
    ) -> BulkReport {
        self.create_entity_with(entity_type, payload, &RetryPolicy::default())
            .await
    }

    /// Like [`create_entity`](Self::create_entity) with an explicit retry policy.
    pub async fn create_entity_with(
        &self,
        entity_type: EntityType,
        payload: impl Into<Payload>,
        policy: &RetryPolicy,
    ) -> BulkReport {
        let url = self.entity_url(entity_type, None);
        let chunks = payload.into().into_chunks(MAX_ITEMS_PER_REQUEST);
        debug!(%url, chunks = chunks.len(), "POST entities");

        let client = self;
        let url = url.as_str();
        dispatch_chunks(chunks, MAX_CONCURRENT_CHUNKS, policy, move |chunk| {
            client.post_chunk(url, chunk)
        })
        .await
    }

    async fn post_chunk(&self, url: &str, chunk: Vec<Entity>) -> Result<Vec<Entity>> {
        let request = self.http.post(url).json(&DataEnvelope::new(chunk));
        let body = self.send_json(request).await?;
        Ok(normalize(body)?.into_vec())
    }

    /// Updates entities in place. The raw response body is returned as-is.
    pub async fn update_entity(
        &self,
        entity_type: EntityType,
        payload: impl Into<Payload>,
    ) -> Result<Value> {
        let url = self.entity_url(entity_type, None);
        debug!(%url, "PUT entities");

        let body = DataEnvelope::new(payload.into().into_vec());
        self.send_json(self.http.put(&url).json(&body)).await
    }

    /// Downloads the raw content of an attachment.
    pub async fn get_attachment_data(&self, attachment_id: &str) -> Result<Bytes> {
        let url = self.entity_url(EntityType::Attachments, Some(attachment_id));
        debug!(%url, "GET attachment data");

        let response = self.send(self.http.get(&url)).await?;
        Ok(response.bytes().await?)
    }

    /// Uploads an attachment and returns the created attachment entity.
    pub async fn create_attachment(&self, attachment: NewAttachment) -> Result<Entity> {
        let url = self.entity_url(EntityType::Attachments, None);
        debug!(%url, name = %attachment.name, size = attachment.data.len(), "POST attachment");

        let request = self
            .http
            .post(&url)
            .query(&[
                ("name", attachment.name.as_str()),
                ("owner_work_item", attachment.owner_work_item_id.as_str()),
            ])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(attachment.data);

        let body = self.send_json(request).await?;
        normalize(body)?
            .into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::UnexpectedShape("no attachment in response".to_string()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format_api_error(status, &text));
        }

        Ok(response)
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let text = self.send(request).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
