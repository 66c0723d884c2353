//! rulebook-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus
//! `RULEBOOK_*` environment variables, opens the SQLite store, and serves
//! the Rulebook API over HTTP.
//!
//! Run `rulebook-server --hash-password` to produce the value for
//! `auth_password_hash`.

use std::{io::BufRead as _, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use rulebook_server::{AppState, ServerConfig, auth::hash_password};
use rulebook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rulebook course rules server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 hash and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  if cli.hash_password {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let hash = hash_password(line.trim_end_matches(['\n', '\r']))
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let config = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  serve(config).await
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
  if !config.auth().enabled() {
    tracing::warn!("auth_username is empty; the API is served without authentication");
  }

  let path = config.resolved_store_path();
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {dir:?}"))?;
  }
  let store = SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))?;

  let address = format!("{}:{}", config.host, config.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(store = ?path, "listening on http://{address}");

  let state = AppState {
    store:  Arc::new(store),
    auth:   Arc::new(config.auth()),
    config: Arc::new(config),
  };
  axum::serve(listener, rulebook_server::router(state)).await.context("server error")
}
