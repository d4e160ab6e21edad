//
//  octane-cli
//  cli/get.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity read command
//!
//! ## Examples
//!
//! ```bash
//! # List defects with their severity
//! octane get defects --fields id,name,severity
//!
//! # Fetch one story by id
//! octane get stories --id 1001
//!
//! # Filter with the Octane query language
//! octane get defects --query "phase EQ {id EQ 'phase.defect.new'}" --limit 20
//! ```

use anyhow::Result;
use clap::Args;

use crate::api::{EntityType, FieldSet, GetOptions, Query};

use super::GlobalOptions;

/// Read entities of one type
#[derive(Args, Debug)]
pub struct GetCommand {
    /// Entity type (see `octane types`)
    pub entity_type: EntityType,

    /// Fetch a single entity by id
    #[arg(long)]
    pub id: Option<String>,

    /// Comma separated fields to return
    #[arg(long, short = 'f', default_value = "id,name")]
    pub fields: FieldSet,

    /// Octane query expression, sent as a quoted literal
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Maximum number of entities to return
    #[arg(long, short = 'L')]
    pub limit: Option<u32>,
}

impl GetCommand {
    pub fn options(&self) -> GetOptions {
        GetOptions {
            fields: self.fields.clone(),
            id: self.id.clone(),
            query: self.query.as_deref().map(Query::new),
            limit: self.limit,
        }
    }

    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let options = self.options();

        let entities = client.get_entity(self.entity_type, &options).await?;
        global.writer().write_entities(&entities, &options.fields)
    }
}
