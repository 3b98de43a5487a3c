//! Redirectmap - Main entry point
//!
//! Serves the configured redirect sources over HTTP

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use redirectmap::{ChainConfig, NotFound, RedirectServer, RootOr, ServerConfig, Text};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Redirectmap - redirect exact request paths to stored URLs
#[derive(Parser, Debug)]
#[command(name = "redirectmap")]
#[command(author = "Redirectmap Contributors")]
#[command(version = "1.0.0")]
#[command(about = "Redirect request paths using static, YAML, JSON or SQLite mappings")]
struct Args {
    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// HTTP port to listen on
    #[arg(long, env = "HTTP_PORT", default_value = "8080")]
    http_port: u16,

    /// Literal redirect, may be repeated (e.g. /go=https://go.dev)
    #[arg(long = "redirect", value_name = "PATH=URL", value_parser = parse_redirect)]
    redirects: Vec<(String, String)>,

    /// YAML file with a list of {path, url} entries
    #[arg(long = "yaml", env = "YAML_FILE")]
    yaml_file: Option<PathBuf>,

    /// JSON file with an object of path to url
    #[arg(long = "json", env = "JSON_FILE")]
    json_file: Option<PathBuf>,

    /// SQLite database holding the urlmap table
    #[arg(long, env = "DB_PATH")]
    db_path: Option<PathBuf>,

    /// Keep serving when the urlmap table cannot be created
    #[arg(long, env = "DEGRADED_START", default_value = "false")]
    degraded_start: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_redirect(s: &str) -> Result<(String, String)> {
    let (path, url) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PATH=URL, got {:?}", s))?;
    Ok((path.to_string(), url.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting Redirectmap v1.0.0");

    let chain = ChainConfig {
        redirects: args.redirects,
        yaml_file: args.yaml_file,
        json_file: args.json_file,
        db_path: args.db_path,
        degraded_start: args.degraded_start,
    };

    let default = Arc::new(RootOr::new(
        Arc::new(Text::new("Hello, world!")),
        Arc::new(NotFound),
    ));
    let handler = chain
        .build(default)
        .context("Failed to load redirect sources")?;

    let config = ServerConfig {
        bind: args.bind,
        http_port: args.http_port,
    };

    let server = Arc::new(RedirectServer::new(config, handler));
    server.run().await?;

    Ok(())
}
