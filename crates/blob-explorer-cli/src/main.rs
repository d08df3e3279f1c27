use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "blob-explorer")]
#[command(about = "Browse, upload, download and delete blobs in a storage container", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Where to connect: a YAML config file or a storage URL
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Storage URL (azure://account/container, file:///path, memory://)
    #[arg(short, long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List one directory level
    Ls {
        #[command(flatten)]
        target: Target,

        /// Directory to list (defaults to the container root)
        #[arg(default_value = "")]
        path: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Download a blob
    Get {
        #[command(flatten)]
        target: Target,

        /// Key of the blob to download
        key: String,

        /// Output file (defaults to the blob's file name)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Upload local files into a directory
    Put {
        #[command(flatten)]
        target: Target,

        /// Files to upload
        #[arg(required = true)]
        files: Vec<String>,

        /// Destination directory (defaults to the container root)
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Delete a blob or a whole directory
    Rm {
        #[command(flatten)]
        target: Target,

        /// Key of a blob, or a directory ending with '/'
        key: String,

        /// Confirm the deletion
        #[arg(long, default_value = "false")]
        yes: bool,
    },

    /// Interactive explorer shell
    Shell {
        #[command(flatten)]
        target: Target,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // Priority: RUST_LOG env var > verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Ls {
            target,
            path,
            format,
        } => {
            commands::list::run(&target, &path, commands::OutputFormat::from(format.as_str()))
                .await?;
        }
        Commands::Get {
            target,
            key,
            output,
        } => {
            commands::download::run(&target, &key, output.as_deref()).await?;
        }
        Commands::Put {
            target,
            files,
            prefix,
        } => {
            commands::upload::run(&target, &files, &prefix).await?;
        }
        Commands::Rm { target, key, yes } => {
            commands::delete::run(&target, &key, yes).await?;
        }
        Commands::Shell { target } => {
            commands::shell::run(&target).await?;
        }
    }

    Ok(())
}
