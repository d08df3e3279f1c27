use anyhow::Result;
use blob_explorer_core::ListingEntry;

use super::{open_session, print_view, OutputFormat};
use crate::Target;

pub async fn run(target: &Target, path: &str, format: OutputFormat) -> Result<()> {
    let mut session = open_session(target).await?;

    let view = if path.is_empty() {
        session.list().await?
    } else {
        let entry = ListingEntry::Directory {
            name: blob_explorer_core::path::normalize_prefix(path),
        };
        session.enter(&entry).await?
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print_view(&view),
    }

    session.disconnect();
    Ok(())
}
