//! Deepself tools CLI.
//!
//! Usage:
//!   deepself tools [--json]                 List the available tools
//!   deepself call <tool> --args '<json>'    Invoke a tool and print its result
//!   deepself init --api-key <key>           Write a config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use deepself::config::{self, DeepselfConfig};
use deepself::DeepselfPlugin;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "deepself")]
#[command(version)]
#[command(about = "Deepself persona tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (defaults to ~/.deepself/deepself.toml).
    #[arg(long)]
    config: Option<String>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available tools.
    Tools {
        /// Print the full host registration payload as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Invoke a tool and print its result as JSON.
    Call {
        /// Tool name, e.g. deepself_list.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Write a config file.
    Init {
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,

        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(config::expand_path)
        .unwrap_or_else(config::default_config_path);
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        .with_env_overrides();

    // Logs go to stderr so stdout stays machine-readable.
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Tools { json } => cmd_tools(&cfg, json),
        Commands::Call { tool, args } => cmd_call(&cfg, &tool, &args).await,
        Commands::Init {
            api_key,
            base_url,
            force,
        } => cmd_init(&config_path, api_key, base_url, force),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_tools(cfg: &DeepselfConfig, json: bool) -> Result<()> {
    let plugin = DeepselfPlugin::new(cfg)?;
    let tools = plugin.host_tools();

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    println!();
    println!("{}", "=== Deepself Tools ===".bold());
    println!();
    for tool in &tools {
        println!("  {} ({})", tool.name.bold(), tool.output_shape);
        println!("    {}", tool.description.dimmed());
    }
    println!();
    Ok(())
}

async fn cmd_call(cfg: &DeepselfConfig, tool: &str, args: &str) -> Result<()> {
    let args: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;

    let plugin = DeepselfPlugin::new(cfg)?;
    if !plugin.client().has_credentials() {
        warn!("No API key configured; run `deepself init --api-key <key>` or set DEEPSELF_API_KEY");
    }

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{} Cancelling...", "<<<".red().bold());
            ctrl_c_cancel.cancel();
        }
    });

    let output = plugin.invoke(tool, &args, &cancel).await;
    println!("{}", serde_json::to_string_pretty(&output)?);

    if output.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_init(
    path: &Path,
    api_key: Option<String>,
    base_url: Option<String>,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let mut cfg = DeepselfConfig::default();
    if let Some(key) = api_key {
        cfg.api_key = key;
    }
    if let Some(url) = base_url {
        cfg.base_url = url;
    }
    config::save_config(&cfg, path)?;

    println!("{} Wrote config to {}", ">>>".green().bold(), path.display());
    if cfg.api_key.is_empty() {
        println!(
            "    {} no API key set; edit the file or export DEEPSELF_API_KEY",
            "note:".yellow()
        );
    }
    Ok(())
}
