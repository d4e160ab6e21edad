//
//  octane-cli
//  cli/types.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Entity type catalog command

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::api::EntityType;
use crate::output::{OutputFormat, TableBuilder};

use super::GlobalOptions;

/// List the entity types and their REST paths
#[derive(Args, Debug)]
pub struct TypesCommand {}

impl TypesCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        if global.format == OutputFormat::Table {
            let mut table = TableBuilder::new().headers(["type", "path"]);
            for entity_type in EntityType::ALL {
                table = table.row([entity_type.name(), entity_type.path()]);
            }
            table.print();
            return Ok(());
        }

        let catalog: Vec<_> = EntityType::ALL
            .iter()
            .map(|t| json!({"type": t.name(), "path": t.path()}))
            .collect();
        global.writer().write(&catalog)
    }
}
