use anyhow::Result;
use blob_explorer_core::DeleteOutcome;

use super::{locate, open_session};
use crate::Target;

pub async fn run(target: &Target, key: &str, yes: bool) -> Result<()> {
    let mut session = open_session(target).await?;
    let entry = locate(&mut session, key).await?;
    let kind = if entry.is_directory() { "directory" } else { "file" };

    // First request only marks the entry
    if let DeleteOutcome::Deleted(_) = session.request_delete(&entry).await? {
        anyhow::bail!("Delete was performed without confirmation");
    }

    if !yes {
        println!(
            "You sure? Re-run with --yes to delete {} {}",
            kind,
            entry.display_name()
        );
        session.disconnect();
        return Ok(());
    }

    match session.request_delete(&entry).await? {
        DeleteOutcome::Deleted(report) => {
            println!(
                "Deleted {} {} ({} objects removed, {} already gone)",
                kind,
                entry.display_name(),
                report.deleted.len(),
                report.missing.len()
            );
            for (key, err) in &report.failed {
                eprintln!("Failed to delete {}: {}", key, err);
            }
            session.disconnect();
            if !report.is_complete() {
                anyhow::bail!("{} objects could not be deleted", report.failed.len());
            }
        }
        DeleteOutcome::ConfirmationRequired(_) => {
            anyhow::bail!("Confirmation was lost before the delete ran");
        }
    }

    Ok(())
}
