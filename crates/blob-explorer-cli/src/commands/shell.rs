use std::path::Path;

use anyhow::Result;
use blob_explorer_core::path::display_path;
use blob_explorer_core::{
    DeleteOutcome, DeleteReport, DirectoryView, ListingEntry, LocalFile, Session,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{open_session, print_view, save_entry};
use crate::Target;

const HELP: &str = "\
Commands:
  ls                 list the current directory
  cd <dir>           enter a directory
  back               go to the parent directory
  refresh            list the current directory again
  pwd                show the current location
  get <file> [out]   download a file
  put <path>...      upload local files here
  rm <name>          delete a file or directory (repeat to confirm)
  help               show this help
  quit               disconnect and exit";

pub async fn run(target: &Target) -> Result<()> {
    let mut session = open_session(target).await?;
    println!("Connected to {}. Type 'help' for commands.", session.location());

    let mut view = session.list().await?;
    print_view(&view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&session).await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        if matches!(command, "quit" | "exit") {
            break;
        }

        match execute(&mut session, &mut view, command, &args).await {
            Ok(()) => {}
            Err(e) if is_retryable(&e) => {
                eprintln!("Error: {} (network problem, try again)", e)
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    session.disconnect();
    Ok(())
}

async fn prompt(session: &Session) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{}> ", display_path(session.current_prefix())).as_bytes())
        .await?;
    stdout.flush().await?;
    Ok(())
}

fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<blob_explorer_core::Error>()
        .is_some_and(|e| e.is_retryable())
}

async fn execute(
    session: &mut Session,
    view: &mut DirectoryView,
    command: &str,
    args: &[&str],
) -> Result<()> {
    match (command, args) {
        ("help", _) => println!("{}", HELP),
        ("pwd", _) => println!("{}", display_path(session.current_prefix())),
        ("ls", _) | ("refresh", _) => {
            *view = session.refresh().await?;
            print_view(view);
        }
        ("back", _) => {
            *view = session.back().await?;
            print_view(view);
        }
        ("cd", [name]) => {
            let entry = lookup(view, name)?.clone();
            *view = session.enter(&entry).await?;
            print_view(view);
        }
        ("get", [name, rest @ ..]) => {
            let entry = lookup(view, name)?.clone();
            let output = rest
                .first()
                .copied()
                .unwrap_or_else(|| entry.display_name())
                .to_string();

            let written = save_entry(session, &entry, Path::new(&output)).await?;
            println!("Saved {} ({} bytes)", output, written);
        }
        ("put", paths) if !paths.is_empty() => {
            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                files.push(LocalFile::from_path(path).await?);
            }
            let report = session.upload(files).await;
            for outcome in &report.outcomes {
                match &outcome.result {
                    Ok(()) => println!("Successfully uploaded {}", outcome.name),
                    Err(e) => eprintln!("Error uploading {}: {}", outcome.name, e),
                }
            }
            *view = session.refresh().await?;
            print_view(view);
        }
        ("rm", [name]) => {
            let entry = lookup(view, name)?.clone();
            match session.request_delete(&entry).await? {
                DeleteOutcome::ConfirmationRequired(_) => {
                    println!("You sure? Repeat 'rm {}' to delete it.", name);
                }
                DeleteOutcome::Deleted(report) => {
                    println!("{}", delete_summary(&entry, &report));
                    for (key, err) in &report.failed {
                        eprintln!("Failed to delete {}: {}", key, err);
                    }
                    *view = session.refresh().await?;
                    print_view(view);
                }
            }
        }
        _ => println!("Unknown command or wrong arguments. Type 'help'."),
    }

    Ok(())
}

fn delete_summary(entry: &ListingEntry, report: &DeleteReport) -> String {
    let kind = if entry.is_directory() { "Directory" } else { "File" };
    if report.is_complete() {
        format!("{} {} deleted successfully", kind, entry.display_name())
    } else {
        format!(
            "{} {} partially deleted: {} removed, {} failed. Repeat 'rm' to retry.",
            kind,
            entry.display_name(),
            report.deleted.len() + report.missing.len(),
            report.failed.len()
        )
    }
}

fn lookup<'a>(
    view: &'a DirectoryView,
    name: &str,
) -> Result<&'a ListingEntry> {
    view.find(name)
        .ok_or_else(|| anyhow::anyhow!("No such entry in {}: {}", display_path(&view.prefix), name))
}
