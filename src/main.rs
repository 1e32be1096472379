use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use feedforge::{max_cardinality, Cardinality, Channel, EngineConfig, FeedFormat, FeedManager, Field};

/// Get the config directory path (~/.config/feedforge/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("feedforge");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "feedforge", about = "Read, inspect and convert RSS and Atom feeds")]
struct Args {
    /// Config file (default: ~/.config/feedforge/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the format of a feed file and summarize its contents
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Recover what can be read from malformed XML
        #[arg(long)]
        lenient: bool,

        /// Print the parsed channel as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a feed in any format and write it in another
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target format token, e.g. rss_2.0 or atom_1.0
        #[arg(long, value_name = "FORMAT")]
        to: FeedFormat,

        /// Output file (default: stdout)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Recover what can be read from malformed XML
        #[arg(long)]
        lenient: bool,
    },

    /// Print which fields each format can carry
    Formats,
}

fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = EngineConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let manager = FeedManager::from_config(&config);

    match args.command {
        Command::Inspect {
            file,
            lenient,
            json,
        } => {
            let channel = read_input(&manager, &file, lenient)?;
            let mut stdout = std::io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, &channel)
                    .context("Failed to serialize channel")?;
                writeln!(stdout)?;
            } else {
                print_summary(&mut stdout, &channel)?;
            }
        }
        Command::Convert {
            input,
            to,
            output,
            lenient,
        } => {
            let mut channel = read_input(&manager, &input, lenient)?;
            let from = channel.format;
            channel.format = Some(to);

            match &output {
                Some(path) => {
                    manager
                        .write_feed_to_path(path, &channel)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Wrote {} to {}", to, path.display());
                }
                None => {
                    manager
                        .write_feed(std::io::stdout().lock(), &channel)
                        .with_context(|| format!("Failed to write feed as {}", to))?;
                }
            }
            tracing::info!(from = ?from, to = %to, items = channel.items.len(), "Converted feed");
        }
        Command::Formats => print_formats(&mut std::io::stdout().lock())?,
    }

    Ok(())
}

fn read_input(manager: &FeedManager, path: &Path, lenient: bool) -> Result<Channel> {
    // SEC-008: Canonicalize to resolve symlinks before checking the file type
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve input file: {}", path.display()))?;
    let metadata = std::fs::metadata(&canonical)?;
    if !metadata.is_file() {
        anyhow::bail!("Input path must be a regular file");
    }

    manager
        .read_feed_from_path(&canonical, !lenient)
        .with_context(|| format!("Failed to read feed from {}", path.display()))
}

fn print_summary(out: &mut impl Write, channel: &Channel) -> Result<()> {
    let format = channel
        .format
        .map(|f| f.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    writeln!(out, "Format:      {}", format)?;
    writeln!(out, "Title:       {}", channel.title)?;
    writeln!(out, "Description: {}", channel.description)?;
    for link in &channel.links {
        writeln!(out, "Link:        {}", link)?;
    }
    if let Some(published) = channel.published {
        writeln!(out, "Published:   {}", published.to_rfc3339())?;
    }
    writeln!(out, "Items:       {}", channel.items.len())?;
    for (index, item) in channel.items.iter().enumerate() {
        let title = if item.title.is_empty() {
            "(untitled)"
        } else {
            item.title.as_str()
        };
        writeln!(out, "  {:>3}. {}", index + 1, title)?;
    }
    Ok(())
}

fn print_formats(out: &mut impl Write) -> Result<()> {
    write!(out, "{:<20}", "field")?;
    for format in FeedFormat::ALL {
        write!(out, "{:>10}", format.token())?;
    }
    writeln!(out)?;

    for field in Field::ALL {
        write!(out, "{:<20}", format!("{:?}", field))?;
        for format in FeedFormat::ALL {
            let cell = match max_cardinality(format, field) {
                Some(Cardinality::One) => "1",
                Some(Cardinality::Unbounded) => "n",
                None => "-",
            };
            write!(out, "{:>10}", cell)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
