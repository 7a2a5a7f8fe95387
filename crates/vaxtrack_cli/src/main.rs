//! `vaxtrack` command-line entry point.
//!
//! # Responsibility
//! - Resolve server configuration from file, environment and flags.
//! - Initialize logging, open the database and run the HTTP server.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use vaxtrack_api::ServerConfig;

#[derive(Debug, Parser)]
#[command(name = "vaxtrack", version, about = "Vaccination record keeping service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Print the core version and exit.
    Version,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// TOML configuration file.
    #[arg(long, env = "VAXTRACK_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// SQLite database file; created with its parent directories if missing.
    #[arg(long = "db")]
    db_path: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn resolve(self) -> Result<ServerConfig> {
        let mut config = ServerConfig::load(self.config.as_deref())
            .context("failed to load server configuration")?;
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(log_dir) = self.log_dir {
            config.log_dir = Some(log_dir);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Serve(args) => serve(args.resolve()?).await,
        Command::Version => {
            println!("vaxtrack {}", vaxtrack_core::core_version());
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let log_dir = config
        .log_dir
        .as_deref()
        .map(|dir| {
            dir.to_str()
                .ok_or_else(|| anyhow!("log_dir is not valid UTF-8: {}", dir.display()))
        })
        .transpose()?;
    vaxtrack_core::init_logging(&config.log_level, log_dir).map_err(|err| anyhow!(err))?;

    let conn = vaxtrack_core::open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    info!(
        "event=server_start module=cli status=ok addr={} version={}",
        config.bind_addr(),
        vaxtrack_core::core_version()
    );

    vaxtrack_api::serve(&config, conn)
        .await
        .with_context(|| format!("server on {} failed", config.bind_addr()))
}
