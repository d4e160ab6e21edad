//
//  octane-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Octane CLI Library
//!
//! A client library and command-line interface for the ALM Octane REST API.
//!
//! ## Overview
//!
//! The library wraps Octane's HTTP surface: it authenticates with an API
//! access key, scopes requests to a shared space and workspace, flattens the
//! API's `{"data": ...}` response envelopes, and splits bulk creates into
//! retried, bounded-concurrency chunks.
//!
//! ## Features
//!
//! - **Scoped Clients**: Derive space/workspace views without mutating the base client
//! - **Flat Entities**: Response and relationship envelopes are unwrapped
//! - **Field Projection**: Reads return only the fields you ask for
//! - **Bulk Creates**: 100 entities per request, 3 requests in flight, retries on
//!   timeouts and connection resets, per-chunk outcomes
//! - **Attachments**: Raw binary download and upload
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client, entity catalog, envelope handling, bulk writes
//! - [`auth`]: API access key credentials
//! - [`config`]: Configuration file management
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Output formatting (JSON, tables)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use octane_cli::api::{ClientConfig, EntityType, GetOptions, OctaneClient, Scope};
//!
//! # async fn run() -> Result<(), octane_cli::api::ApiError> {
//! let client = OctaneClient::new(ClientConfig::new("https://octane.example.com", "key", "secret"))?
//!     .scoped(Scope::space(1001).with_workspace(1002));
//!
//! let stories = client
//!     .get_entity(EntityType::Stories, &GetOptions::new().limit(10))
//!     .await?;
//! for story in stories.into_vec() {
//!     println!("{:?}", story.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

/// API client for Octane.
///
/// Handles authentication headers, request building, envelope normalization,
/// field projection and chunked bulk writes.
pub mod api;

/// API access key credentials.
pub mod auth;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/octane/config.toml`
/// - macOS: `~/Library/Application Support/octane/config.toml`
/// - Windows: `%APPDATA%\octane\config\config.toml`
pub mod config;

/// Command-line interface definitions.
pub mod cli;

/// Output formatting for the CLI.
pub mod output;

pub use api::OctaneClient;
pub use cli::Cli;
pub use config::Config;

/// Application name constant.
pub const APP_NAME: &str = "octane";

/// Application version, derived from Cargo.toml at compile time.
///
/// ```rust
/// use octane_cli::VERSION;
///
/// println!("octane version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// - `0`: Success
/// - `1`: General error
/// - `2`: Invalid usage or arguments (reported by clap)
/// - `3`: Bulk create finished with failed chunks
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    pub const ERROR: i32 = 1;

    /// A bulk create finished but at least one chunk failed.
    pub const PARTIAL_FAILURE: i32 = 3;
}
