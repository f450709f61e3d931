//! cliprelay CLI — build, inspect and apply clipboard transactions.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cliprelay_clipboard::check_size;
use cliprelay_protocol::transaction::{data, into_transaction};
use cliprelay_protocol::{MessageReceiver, MessageSender};
use cliprelay_types::{ClipboardContent, ClipboardFormat, ClipboardMessage, ClipboardTransaction};
use tokio::io::BufReader;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "cliprelay",
    about = "Move clipboard transactions between a viewer and a remote session",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a transaction from items given most preferred first.
    Pack {
        /// Output frame file.
        #[arg(short, long)]
        output: PathBuf,

        /// Items as FORMAT=VALUE. VALUE is literal text, or @PATH to read
        /// bytes from a file. File lists take ':'-separated paths.
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Print every transaction in a frame file.
    Inspect {
        /// Input frame file.
        input: PathBuf,
    },

    /// Show which item a consumer would apply.
    Select {
        /// Input frame file.
        input: PathBuf,

        /// Formats the consumer can apply (defaults to the configured list).
        #[arg(short, long, value_delimiter = ',')]
        accept: Option<Vec<ClipboardFormat>>,
    },

    /// Read the system clipboard into a frame file.
    Copy {
        /// Output frame file.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Apply a frame file to the system clipboard.
    ///
    /// On Linux this keeps running until another application copies.
    Paste {
        /// Input frame file.
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::Pack { output, items } => {
            let mut transaction = ClipboardTransaction::init();
            for item in &items {
                transaction.add_content(parse_item(item)?)?;
            }
            check_size(&transaction, config.clipboard.max_size)?;
            tracing::info!(
                transaction = %transaction.id(),
                items = transaction.len(),
                output = %output.display(),
                "packing transaction"
            );
            write_transaction(&output, transaction).await?;
        }
        Commands::Inspect { input } => {
            let mut receiver = open_frames(&input).await?;
            while let Some(message) = receiver.recv::<ClipboardMessage>().await? {
                print_message(message)?;
            }
        }
        Commands::Select { input, accept } => {
            let accept = accept.unwrap_or_else(|| config.clipboard.accept.clone());
            let mut receiver = open_frames(&input).await?;
            while let Some(message) = receiver.recv::<ClipboardMessage>().await? {
                if !matches!(
                    message,
                    ClipboardMessage::Data { .. } | ClipboardMessage::Empty { .. }
                ) {
                    continue;
                }
                let mut transaction = into_transaction(message)?;
                let id = transaction.id();
                match transaction.select(&accept) {
                    Some(content) => println!("{id}: {}", describe(content)),
                    None => println!("{id}: no acceptable representation"),
                }
            }
        }
        Commands::Copy { output } => {
            ensure_enabled(&config)?;
            let provider = cliprelay_clipboard::system_provider(config.clipboard.max_size)?;
            let transaction = provider.read().await?;
            if transaction.is_empty() {
                tracing::warn!("clipboard is empty");
            }
            tracing::info!(
                transaction = %transaction.id(),
                items = transaction.len(),
                output = %output.display(),
                "copied clipboard"
            );
            write_transaction(&output, transaction).await?;
        }
        Commands::Paste { input } => {
            ensure_enabled(&config)?;
            let mut receiver = open_frames(&input).await?;
            let Some(message) = receiver.recv::<ClipboardMessage>().await? else {
                bail!("{} contains no frames", input.display());
            };
            let transaction = into_transaction(message)?;
            tracing::info!(
                transaction = %transaction.id(),
                items = transaction.len(),
                "pasting transaction"
            );
            let mut provider = cliprelay_clipboard::system_provider(config.clipboard.max_size)?;
            provider.write(transaction).await?;
        }
    }

    Ok(())
}

fn ensure_enabled(config: &Config) -> anyhow::Result<()> {
    if !config.clipboard.enabled {
        bail!("clipboard sharing is disabled in the configuration");
    }
    Ok(())
}

/// Parse a `FORMAT=VALUE` item.
fn parse_item(item: &str) -> anyhow::Result<ClipboardContent> {
    let (format, value) = item
        .split_once('=')
        .with_context(|| format!("item {item:?} is not FORMAT=VALUE"))?;
    let format: ClipboardFormat = format.parse()?;

    let bytes = match value.strip_prefix('@') {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {path}"))?,
        None if format == ClipboardFormat::FileList => {
            return Ok(ClipboardContent::FileList(
                value
                    .split(':')
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect(),
            ));
        }
        None => value.as_bytes().to_vec(),
    };

    ClipboardContent::from_bytes(format.clone(), bytes)
        .with_context(|| format!("value for {format} is not valid"))
}

async fn open_frames(
    path: &Path,
) -> anyhow::Result<MessageReceiver<BufReader<tokio::fs::File>>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(MessageReceiver::new(BufReader::new(file)))
}

async fn write_transaction(path: &Path, transaction: ClipboardTransaction) -> anyhow::Result<()> {
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("creating {}", path.display()))?;
    let mut sender = MessageSender::new(file);
    sender.send(&data(transaction)).await?;
    sender.finish().await?;
    Ok(())
}

fn print_message(message: ClipboardMessage) -> anyhow::Result<()> {
    match message {
        ClipboardMessage::Offer {
            transaction,
            formats,
            size_hint,
        } => {
            println!("offer {transaction} ({size_hint} bytes): {}", join(&formats));
        }
        ClipboardMessage::Request {
            transaction,
            formats,
        } => {
            println!("request {transaction}: {}", join(&formats));
        }
        message => {
            let mut transaction = into_transaction(message)?;
            println!("transaction {} ({} items)", transaction.id(), transaction.len());
            for (index, content) in transaction.content().iter().enumerate() {
                println!("  [{index}] {}", describe(content));
            }
        }
    }
    Ok(())
}

fn join(formats: &[ClipboardFormat]) -> String {
    formats
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(content: &ClipboardContent) -> String {
    const PREVIEW: usize = 60;
    let detail = match content {
        ClipboardContent::FileList(paths) => paths.join(":"),
        other => match other.as_text() {
            Some(text) => {
                let mut preview: String = text.chars().take(PREVIEW).collect();
                if text.chars().count() > PREVIEW {
                    preview.push('…');
                }
                format!("{preview:?}")
            }
            None => format!("{} bytes", other.size()),
        },
    };
    format!("{} {detail}", content.format())
}
