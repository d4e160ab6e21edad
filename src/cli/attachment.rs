//
//  octane-cli
//  cli/attachment.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Attachment commands
//!
//! ```bash
//! # Save an attachment to disk
//! octane attachment download 3001 --output screenshot.png
//!
//! # Attach a file to defect 1001
//! octane attachment upload ./crash.log --owner 1001
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Args, Subcommand};

use crate::api::NewAttachment;

use super::GlobalOptions;

/// Download or upload attachments
#[derive(Args, Debug)]
pub struct AttachmentCommand {
    #[command(subcommand)]
    pub command: AttachmentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AttachmentSubcommand {
    /// Download the content of an attachment
    Download(DownloadArgs),

    /// Upload a file as an attachment of a work item
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Attachment id
    pub id: String,

    /// Output file (defaults to stdout)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload
    pub file: PathBuf,

    /// Id of the owning work item
    #[arg(long)]
    pub owner: String,

    /// Attachment name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

impl AttachmentCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AttachmentSubcommand::Download(args) => self.download(args, global).await,
            AttachmentSubcommand::Upload(args) => self.upload(args, global).await,
        }
    }

    async fn download(&self, args: &DownloadArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let data = client.get_attachment_data(&args.id).await?;

        match &args.output {
            Some(path) => {
                std::fs::write(path, &data)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                global.writer().write_success(&format!(
                    "Saved {} bytes to {}",
                    data.len(),
                    path.display()
                ));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&data)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    async fn upload(&self, args: &UploadArgs, global: &GlobalOptions) -> Result<()> {
        let name = match &args.name {
            Some(name) => name.clone(),
            None => args
                .file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .context("Cannot derive an attachment name from the path; pass --name")?,
        };
        let data = std::fs::read(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;

        let client = global.client()?;
        let attachment = client
            .create_attachment(NewAttachment {
                name,
                owner_work_item_id: args.owner.clone(),
                data: Bytes::from(data),
            })
            .await?;

        global.writer().write(&attachment)
    }
}
