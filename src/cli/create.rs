//
//  octane-cli
//  cli/create.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bulk create command
//!
//! Reads a JSON object or array of objects and creates them in chunks of
//! 100, retrying chunks that hit network timeouts or connection resets.
//!
//! ```bash
//! octane create stories --input stories.json
//! cat defects.json | octane create defects --input -
//! ```

use anyhow::Result;
use clap::Args;

use crate::api::{EntityType, RetryPolicy};

use super::{read_payload, GlobalOptions};

/// Returned when a bulk create finished with failed chunks.
#[derive(Debug, thiserror::Error)]
#[error("{failed} of {total} chunks failed; {created} entities created")]
pub struct PartialFailure {
    pub failed: usize,
    pub total: usize,
    pub created: usize,
}

/// Create entities of one type
#[derive(Args, Debug)]
pub struct CreateCommand {
    /// Entity type (see `octane types`)
    pub entity_type: EntityType,

    /// JSON file with an entity or an array of entities (- for stdin)
    #[arg(long, short = 'i', default_value = "-")]
    pub input: String,

    /// Maximum retries per chunk on transient network errors
    #[arg(long, default_value_t = RetryPolicy::default().retries)]
    pub retries: u32,
}

impl CreateCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let payload = read_payload(&self.input)?;
        let client = global.client()?;
        let writer = global.writer();

        let policy = RetryPolicy {
            retries: self.retries,
            ..RetryPolicy::default()
        };
        let report = client
            .create_entity_with(self.entity_type, payload, &policy)
            .await;
        writer.write_report(&report)?;

        let failed = report.failed().count();
        if failed > 0 {
            return Err(PartialFailure {
                failed,
                total: report.outcomes().len(),
                created: report.created_entities().count(),
            }
            .into());
        }

        writer.write_success(&format!(
            "Created {} {}",
            report.created_entities().count(),
            self.entity_type
        ));
        Ok(())
    }
}
