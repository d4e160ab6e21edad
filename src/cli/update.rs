//
//  octane-cli
//  cli/update.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity update command
//!
//! Every entity in the input must carry its `id`.
//!
//! ```bash
//! echo '{"id": "1001", "name": "Renamed"}' | octane update stories
//! ```

use anyhow::Result;
use clap::Args;

use crate::api::EntityType;

use super::{read_payload, GlobalOptions};

/// Update entities of one type
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Entity type (see `octane types`)
    pub entity_type: EntityType,

    /// JSON file with an entity or an array of entities (- for stdin)
    #[arg(long, short = 'i', default_value = "-")]
    pub input: String,
}

impl UpdateCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let payload = read_payload(&self.input)?;
        let client = global.client()?;

        let response = client.update_entity(self.entity_type, payload).await?;
        global.writer().write(&response)
    }
}
