//! castbook-import binary.
//!
//! One-shot bulk loader: reads a CSV file of actors and creates one record
//! per row in the store the server uses (located through the same
//! `config.toml`). Any parse or store error aborts the run with a non-zero
//! exit; rows already written stay written.
//!
//! ```
//! castbook-import actors.csv
//! castbook-import --config /etc/castbook/config.toml actors.csv
//! ```

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use castbook_import::import_actors;
use castbook_store_sqlite::SqliteStore;
use clap::Parser;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Bulk-import actors from a CSV file")]
struct Cli {
  /// Path to the CSV file (header: name,birthday,nationality).
  file_name: PathBuf,

  /// Path to the TOML configuration file naming the store location.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// The one configuration key the importer needs; other server settings in the
/// same file are ignored.
#[derive(Deserialize)]
struct ImportConfig {
  store_path: PathBuf,
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

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CASTBOOK"))
    .build()
    .context("failed to read config file")?;

  let import_cfg: ImportConfig = settings
    .try_deserialize()
    .context("failed to deserialise ImportConfig")?;

  let store_path = expand_tilde(&import_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let file = File::open(&cli.file_name)
    .with_context(|| format!("failed to open {}", cli.file_name.display()))?;

  let mut stdout = io::stdout().lock();
  let report = import_actors(&store, file, &mut stdout).await?;

  tracing::info!(created = report.created, "import finished");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
