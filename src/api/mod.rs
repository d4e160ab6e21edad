//
//  octane-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the Octane REST API.
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with authentication, scoping and operations
//! - [`entity_type`]: The closed catalog of entity collections
//! - [`query`]: Read options and query-language escaping
//! - [`batch`]: Chunking and bounded-concurrency retry for bulk creates
//! - [`common`]: Errors and response envelope normalization
//!
//! ## Usage
//!
//! ```rust,no_run
//! use octane_cli::api::{ClientConfig, EntityType, OctaneClient, Scope};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), octane_cli::api::ApiError> {
//! let client = OctaneClient::new(ClientConfig::new("https://octane.example.com", "key", "secret"))?
//!     .scoped(Scope::space_with_default_workspace(1001));
//!
//! let story = json!({"name": "As a user I can log in"}).as_object().cloned().unwrap();
//! let report = client.create_entity(EntityType::Stories, story).await;
//! if !report.is_complete() {
//!     for failed in report.failed() {
//!         eprintln!("chunk {} failed", failed.index());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Reads, updates and attachment calls return [`ApiError`] directly; nothing
//! is retried. Bulk creates never fail as a whole and report per-chunk
//! outcomes instead.

/// Core HTTP client for Octane.
pub mod client;

/// Entity type catalog.
pub mod entity_type;

/// Read options.
pub mod query;

/// Chunked bulk writes.
pub mod batch;

/// Errors and envelope helpers shared by every operation.
pub mod common;

pub use batch::{BulkReport, ChunkOutcome, Payload, RetryPolicy};
pub use client::{ClientConfig, NewAttachment, OctaneClient, Scope, DEFAULT_WORKSPACE_ID};
pub use common::{
    expand, normalize, project, ApiError, DataEnvelope, Entity, FieldSet, Normalized, Result,
};
pub use entity_type::EntityType;
pub use query::{GetOptions, Query};
