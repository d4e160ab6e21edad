//
//  octane-cli
//  api/query.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Read options for [`OctaneClient::get_entity`](super::OctaneClient::get_entity).
//!
//! A read is shaped by four optional parameters:
//!
//! | Option | Query parameter | Default |
//! |--------|-----------------|---------|
//! | `fields` | `fields=id,name` | `id,name` |
//! | `id` | path segment `/{id}` | none |
//! | `query` | `query="..."` | none |
//! | `limit` | `limit=N` | server default |
//!
//! # Query Escaping
//!
//! Octane query expressions travel as a double-quoted literal. [`Query`] owns
//! that contract: the expression is wrapped in `"` and any `\` or `"` inside
//! it is escaped with a backslash, so a value containing quotes cannot close
//! the literal early. The expression itself is not parsed or validated.
//!
//! ```rust
//! use octane_cli::api::{GetOptions, Query};
//!
//! let query = Query::new("name EQ 'Login'");
//! assert_eq!(query.as_param(), "\"name EQ 'Login'\"");
//!
//! let options = GetOptions::new()
//!     .fields(["id", "name", "phase"])
//!     .query(query)
//!     .limit(50);
//! assert_eq!(options.fields.to_query(), "id,name,phase");
//! ```

use std::fmt;

use super::FieldSet;

/// An Octane query-language expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    /// The unescaped expression.
    pub fn expression(&self) -> &str {
        &self.0
    }

    /// The expression as a quoted literal for the `query` parameter.
    pub fn as_param(&self) -> String {
        let mut param = String::with_capacity(self.0.len() + 2);
        param.push('"');
        for c in self.0.chars() {
            if c == '"' || c == '\\' {
                param.push('\\');
            }
            param.push(c);
        }
        param.push('"');
        param
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Query {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

impl From<String> for Query {
    fn from(expression: String) -> Self {
        Self::new(expression)
    }
}

/// Parameters of a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetOptions {
    pub fields: FieldSet,
    /// Fetch one entity by id instead of the collection.
    pub id: Option<String>,
    pub query: Option<Query>,
    pub limit: Option<u32>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = FieldSet::new(fields);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string pairs, in the order they are sent.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("fields", self.fields.to_query())];
        if let Some(query) = &self.query {
            pairs.push(("query", query.as_param()));
        }
        // a zero limit is not sent, leaving the server default
        if let Some(limit) = self.limit.filter(|&limit| limit > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}
