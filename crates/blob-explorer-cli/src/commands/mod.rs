pub mod delete;
pub mod download;
pub mod list;
pub mod shell;
pub mod upload;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blob_explorer_core::path::{normalize_prefix, parent_of};
use blob_explorer_core::{
    create_backend, format_bytes, ConnectionParams, DirectoryView, ExplorerConfig, ListingEntry,
    Session, TransferProgress,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::Target;

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Load the configuration named by `--config` or `--url`
pub async fn load_config(target: &Target) -> Result<ExplorerConfig> {
    match (&target.config, &target.url) {
        (Some(path), _) => {
            info!("Loading configuration from: {}", path);
            ExplorerConfig::from_file(path)
                .await
                .with_context(|| format!("Failed to load {}", path))
        }
        (None, Some(url)) => Ok(ExplorerConfig::from_url(url)?),
        (None, None) => anyhow::bail!("Either --config or --url is required"),
    }
}

/// Connect and validate access, Azure through its SAS token
pub async fn open_session(target: &Target) -> Result<Session> {
    let config = load_config(target).await?;

    let session = match config.storage.azure_config()? {
        Some(azure) => {
            let params = ConnectionParams {
                account: azure.account_name,
                container: azure.container_name,
                credential: azure.sas_token,
                endpoint: azure.endpoint,
                allow_http: azure.allow_http,
            };
            Session::connect(&params, &config.transfer).await?
        }
        None => {
            let backend = create_backend(&config.storage)?;
            Session::open(backend, config.storage.location(), &config.transfer).await?
        }
    };

    Ok(session)
}

/// Find `key` in its parent directory's listing.
///
/// Lists the parent as the current view, so a delete request made with the
/// returned entry belongs to that view.
pub async fn locate(session: &mut Session, key: &str) -> Result<ListingEntry> {
    let parent = parent_of(key);
    let view = if parent.is_empty() {
        session.list().await?
    } else {
        session
            .enter(&ListingEntry::Directory { name: parent })
            .await?
    };

    let as_dir = normalize_prefix(key);
    view.find(key)
        .filter(|entry| entry.name() == key || entry.name() == as_dir)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No such blob or directory: {}", key))
}

/// Log progress updates until the sender goes away. Returns the number of
/// updates logged.
pub async fn report_progress(mut progress: broadcast::Receiver<TransferProgress>) -> u64 {
    let mut logged = 0;
    loop {
        match progress.recv().await {
            Ok(update) => {
                info!("{}", update.format());
                logged += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Progress reporter skipped {} updates", skipped);
            }
            Err(RecvError::Closed) => return logged,
        }
    }
}

/// Download a file entry to `output`.
///
/// Data goes to `<output>.part` first and is renamed into place only once
/// the download completes, so a failed download leaves no file behind.
pub async fn save_entry(session: &Session, entry: &ListingEntry, output: &Path) -> Result<u64> {
    let partial = partial_path(output);
    let reporter = tokio::spawn(report_progress(session.progress_receiver()));

    let result = async {
        let mut file = tokio::fs::File::create(&partial)
            .await
            .with_context(|| format!("Failed to create {}", partial.display()))?;
        let written = session.download_to(entry, &mut file).await?;
        drop(file);
        tokio::fs::rename(&partial, output)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok::<_, anyhow::Error>(written)
    }
    .await;
    reporter.abort();

    if result.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    result
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Print a directory view as a table
pub fn print_view(view: &DirectoryView) {
    println!("{}", blob_explorer_core::path::display_path(&view.prefix));

    if view.is_empty() {
        println!("  (empty)");
        return;
    }

    println!("  {:<40} {:>12}  {:<19}", "Name", "Size", "Last Modified");
    for entry in &view.entries {
        let name = if entry.is_directory() {
            format!("{}/", entry.display_name())
        } else {
            entry.display_name().to_string()
        };
        let size = entry
            .size()
            .map(format_bytes)
            .unwrap_or_else(|| "-".to_string());
        let modified = entry
            .last_modified()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<40} {:>12}  {:<19}", name, size, modified);
    }

    println!(
        "\n{} directories, {} files, {}",
        view.directories().count(),
        view.files().count(),
        format_bytes(view.total_file_bytes())
    );
}
