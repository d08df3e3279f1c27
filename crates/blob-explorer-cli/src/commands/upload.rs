use anyhow::Result;
use blob_explorer_core::{format_bytes, ListingEntry, LocalFile};

use super::open_session;
use crate::Target;

pub async fn run(target: &Target, files: &[String], prefix: &str) -> Result<()> {
    let mut session = open_session(target).await?;

    if !prefix.is_empty() {
        let dir = ListingEntry::Directory {
            name: blob_explorer_core::path::normalize_prefix(prefix),
        };
        session.enter(&dir).await?;
    }

    let mut local = Vec::with_capacity(files.len());
    for path in files {
        local.push(LocalFile::from_path(path).await?);
    }

    let report = session.upload(local).await;
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!(
                "Uploaded {} -> {} ({})",
                outcome.name,
                outcome.key,
                format_bytes(outcome.size)
            ),
            Err(e) => eprintln!("Failed to upload {}: {}", outcome.name, e),
        }
    }

    session.disconnect();

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{} of {} uploads failed", failed, report.outcomes.len());
    }
    Ok(())
}
