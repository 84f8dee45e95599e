//! duoframe CLI: inspect, print and convert tabular files.

use std::io::Write;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use clap::{Args, Parser, Subcommand};
use duoframe_core::Engine;
use duoframe_frame::{Frame, Loader, Result};
use duoframe_io::archive::list_members;
use duoframe_io::{Converted, Error as IoError, FormatOptions};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duoframe")]
#[command(about = "Load csv/json/parquet/excel files (or zip members) and convert between formats", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print shape, columns and file metadata
    Info {
        #[command(flatten)]
        source: Source,

        /// Engine to load into: columnar or legacy (default from DUOFRAME_ENGINE)
        #[arg(long)]
        engine: Option<String>,
    },

    /// Pretty-print the table
    Show {
        #[command(flatten)]
        source: Source,
    },

    /// Serialize to another format
    Convert {
        #[command(flatten)]
        source: Source,

        /// Writer name (csv, json, jsonl, ndjson, records, dict, parquet)
        #[arg(long)]
        to: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Writer option as key=value (repeatable)
        #[arg(long = "write-option", value_name = "KEY=VALUE")]
        write_options: Vec<String>,
    },

    /// List the entries of a zip archive
    Members {
        archive: PathBuf,
    },
}

#[derive(Args)]
struct Source {
    /// Input file, or the zip archive when --member is given
    path: PathBuf,

    /// Archive member to load
    #[arg(short, long)]
    member: Option<String>,

    /// Reader name; overrides the file suffix
    #[arg(short, long)]
    format: Option<String>,

    /// Reader option as key=value (repeatable); values are parsed as JSON when possible
    #[arg(short = 'O', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        for hint in e.suggestions() {
            eprintln!("  hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let loader = Loader::from_env()?;

    match cli.command {
        Commands::Info { source, engine } => {
            let engine = match engine {
                Some(name) => name.parse::<Engine>()?,
                None => loader.config().default_engine,
            };
            let frame = load(&loader, &source, engine)?;
            print_info(&frame)
        }
        Commands::Show { source } => {
            let frame = load(&loader, &source, loader.config().default_engine)?;
            println!("{}", frame);
            Ok(())
        }
        Commands::Convert {
            source,
            to,
            output,
            write_options,
        } => {
            let write_options = parse_options(&write_options)?;
            let frame = load(&loader, &source, Engine::Columnar)?;
            let converted = frame.convert(&to, &write_options)?;
            match output {
                Some(path) => {
                    converted.write_to(&path)?;
                    tracing::info!(path = %path.display(), target = %to, rows = frame.len(), "converted");
                    Ok(())
                }
                None => write_stdout(converted),
            }
        }
        Commands::Members { archive } => {
            for name in list_members(&archive)? {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn load(loader: &Loader, source: &Source, engine: Engine) -> Result<Frame> {
    let options = parse_options(&source.options)?;
    let hint = source.format.as_deref();
    match &source.member {
        Some(member) => loader.load_member(&source.path, member, engine, hint, &options),
        None => loader.load_frame(&source.path, engine, hint, &options),
    }
}

/// `key=value` pairs into an options bag. `value` is JSON if it parses as
/// JSON (`true`, `3`, `["a","b"]`), otherwise a plain string.
fn parse_options(pairs: &[String]) -> Result<FormatOptions> {
    let mut options = FormatOptions::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| IoError::InvalidOption {
            key: pair.clone(),
            message: "expected KEY=VALUE".into(),
        })?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        options.insert(key.trim(), value);
    }
    Ok(options)
}

fn print_info(frame: &Frame) -> Result<()> {
    let (rows, cols) = frame.shape();
    let schema = frame.data().arrow_schema();

    if let Some(path) = frame.provenance().path() {
        println!("source:  {}", path.display());
    }
    println!("engine:  {}", frame.engine());
    println!("shape:   ({}, {})", rows, cols);
    println!("columns:");
    for field in schema.fields().iter() {
        let null = if field.is_nullable() { "" } else { " not null" };
        println!("  {:<24} {}{}", field.name(), field.data_type(), null);
    }
    if let Some(meta) = frame.metadata() {
        println!("size:    {} bytes", meta.size);
        if let Some(secs) = meta
            .modified
            .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
        {
            println!("mtime:   {} (unix seconds)", secs);
        }
    }
    Ok(())
}

fn write_stdout(converted: Converted) -> Result<()> {
    let mut bytes = converted.into_bytes()?;
    if bytes.last() != Some(&b'\n') && std::str::from_utf8(&bytes).is_ok() {
        bytes.push(b'\n');
    }
    let mut out = std::io::stdout().lock();
    out.write_all(&bytes).map_err(IoError::from)?;
    out.flush().map_err(IoError::from)?;
    Ok(())
}
