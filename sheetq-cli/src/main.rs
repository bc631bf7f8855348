//! sheetq CLI - Command-line access to the sheet filter pipeline
//!
//! This binary provides command-line interfaces for:
//! - get: run a filter request (`/path.json?contentBusId=..&limit=..`) against a store
//! - fetch: retrieve a single object, decompressed

use clap::{Parser, Subcommand};
use sheetq_format::{MetadataMode, Response};
use sheetq_io::{FsObjectStore, RequestHandler, ServiceConfig, StoreFetcher};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetq")]
#[command(about = "Windowed and sheet-selected access to spreadsheet JSON")]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a filter request against the store
    ///
    /// Examples:
    ///   sheetq get '/index.json?contentBusId=abc&limit=10' --store-root ./store
    ///   sheetq get '/data.json?contentBusId=abc&sheet=a&sheet=b' --store-root ./store -i
    Get {
        /// Request target: resource path plus query string
        target: String,
        /// Directory holding `<bucket>/<key>` objects
        #[arg(long)]
        store_root: PathBuf,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured bucket
        #[arg(long)]
        bucket: Option<String>,
        /// Override the configured fetch timeout (milliseconds)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Override the configured metadata mode (envelope, headers, both)
        #[arg(long)]
        metadata: Option<MetadataMode>,
        /// Print status line and headers before the body
        #[arg(short = 'i', long)]
        include_headers: bool,
        /// Pretty-print the JSON body
        #[arg(long)]
        pretty: bool,
    },
    /// Fetch one object from the store
    Fetch {
        /// Container (bucket) name
        container: String,
        /// Object key
        key: String,
        /// Directory holding `<bucket>/<key>` objects
        #[arg(long)]
        store_root: PathBuf,
        /// Write the body to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            target,
            store_root,
            config,
            bucket,
            timeout_ms,
            metadata,
            include_headers,
            pretty,
        } => {
            let mut service_config = load_config(config.as_deref())?;
            if let Some(bucket) = bucket {
                service_config.bucket = bucket;
            }
            if let Some(timeout_ms) = timeout_ms {
                service_config.fetch_timeout_ms = Some(timeout_ms);
            }
            if let Some(metadata) = metadata {
                service_config.metadata = metadata;
            }
            handle_get(&target, store_root, service_config, include_headers, pretty)?;
        }
        Commands::Fetch {
            container,
            key,
            store_root,
            output,
        } => {
            handle_fetch(&container, &key, store_root, output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<ServiceConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {} failed: {e}", path.display()))?;
            toml::from_str(&contents)
                .map_err(|e| format!("parsing {} failed: {e}", path.display()))?
        }
        None => ServiceConfig::default(),
    };
    Ok(config)
}

fn handle_get(
    target: &str,
    store_root: PathBuf,
    config: ServiceConfig,
    include_headers: bool,
    pretty: bool,
) -> Result<(), Box<dyn Error>> {
    config.validate()?;
    debug!(?config, root = %store_root.display(), "running request");

    let handler = RequestHandler::new(Arc::new(FsObjectStore::new(store_root)), config);
    let response = handler.handle_target(target);

    let mut stdout = std::io::stdout().lock();
    if include_headers {
        write_head(&mut stdout, &response)?;
    }
    if pretty && response.is_success() {
        let value: serde_json::Value = response.json()?;
        serde_json::to_writer_pretty(&mut stdout, &value)?;
        writeln!(stdout)?;
    } else {
        stdout.write_all(&response.body)?;
    }
    stdout.flush()?;

    ensure_success(&response)
}

fn handle_fetch(
    container: &str,
    key: &str,
    store_root: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let fetcher = StoreFetcher::new(Arc::new(FsObjectStore::new(store_root)));
    let response = fetcher.fetch(container, key)?;
    ensure_success(&response)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &response.body)?;
            let mut stderr = std::io::stderr().lock();
            writeln!(
                &mut stderr,
                "Fetched {}/{} to {} ({} bytes)",
                container,
                key,
                path.display(),
                response.body.len()
            )?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&response.body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn write_head(out: &mut impl Write, response: &Response) -> std::io::Result<()> {
    writeln!(out, "status: {}", response.status)?;
    for (name, value) in &response.headers {
        writeln!(out, "{name}: {value}")?;
    }
    writeln!(out)
}

fn ensure_success(response: &Response) -> Result<(), Box<dyn Error>> {
    if response.is_success() {
        return Ok(());
    }
    let mut message = format!("request failed with status {}", response.status);
    if let Some(cause) = response.header("x-error") {
        message.push_str(&format!(": {cause}"));
    }
    Err(message.into())
}
