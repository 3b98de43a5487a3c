//! CLI tool for managing the urlmap table
//!
//! Usage:
//!   redirectmap-urls set <shortpath> <url>
//!   redirectmap-urls get <shortpath>
//!   redirectmap-urls delete <shortpath>
//!   redirectmap-urls list [--json]
//!   redirectmap-urls import <file> [--format yaml|json]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use redirectmap::{PathMapping, UrlRecord, UrlStore};
use std::path::{Path, PathBuf};

/// CLI tool for managing stored redirects
#[derive(Parser, Debug)]
#[command(name = "redirectmap-urls")]
#[command(author = "Redirectmap Contributors")]
#[command(version = "1.0.0")]
#[command(about = "Manage the urlmap table used by Redirectmap")]
struct Args {
    /// Database path
    #[arg(long, env = "DB_PATH", default_value = "./data/urls.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a redirect, replacing the url of an existing shortpath
    Set {
        /// Request path to match exactly (e.g. /docs)
        shortpath: String,

        /// Redirect target
        url: String,
    },

    /// Show the target of a shortpath
    Get {
        shortpath: String,
    },

    /// Delete a redirect
    Delete {
        shortpath: String,
    },

    /// List all redirects
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load every entry of a YAML or JSON mapping file
    Import {
        file: PathBuf,

        /// File format; inferred from the extension when omitted
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn infer(file: &Path) -> Result<Self> {
        match file.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => bail!("cannot infer format of {}, pass --format", file.display()),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let store = UrlStore::open(&args.db_path)
        .with_context(|| format!("Failed to open {}", args.db_path.display()))?;
    store.ensure_schema()?;

    match args.command {
        Commands::Set { shortpath, url } => {
            let record = store.set_url(&shortpath, &url)?;
            println!("Stored redirect:");
            print_record(&record);
        }

        Commands::Get { shortpath } => match store.find_url(&shortpath)? {
            Some(url) => println!("{}", url),
            None => {
                eprintln!("No redirect stored for {}", shortpath);
                std::process::exit(1);
            }
        },

        Commands::Delete { shortpath } => {
            if store.delete_url(&shortpath)? {
                println!("Deleted redirect for {}", shortpath);
            } else {
                eprintln!("No redirect stored for {}", shortpath);
                std::process::exit(1);
            }
        }

        Commands::List { json } => {
            let records = store.list_urls()?;

            if json {
                let json_output: Vec<serde_json::Value> = records
                    .iter()
                    .map(|r| serde_json::json!({ "shortpath": r.shortpath, "url": r.url }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json_output)?);
                return Ok(());
            }

            if records.is_empty() {
                println!("No redirects stored");
                return Ok(());
            }

            println!("{:<30} {:<60}", "SHORTPATH", "URL");
            println!("{}", "-".repeat(91));
            for record in &records {
                println!("{:<30} {:<60}", record.shortpath, record.url);
            }
            println!("\nTotal: {} redirect(s)", records.len());
        }

        Commands::Import { file, format } => {
            let format = match format {
                Some(f) => f,
                None => Format::infer(&file)?,
            };
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mapping = match format {
                Format::Yaml => PathMapping::from_yaml(&bytes)?,
                Format::Json => PathMapping::from_json(&bytes)?,
            };
            let count = store.import_mapping(&mapping)?;
            println!("Imported {} redirect(s) from {}", count, file.display());
        }
    }

    Ok(())
}

fn print_record(record: &UrlRecord) {
    println!("  Shortpath:  {}", record.shortpath);
    println!("  URL:        {}", record.url);
}
