//! Server wiring for Bazaar.
//!
//! Loads [`ServerConfig`], opens the SQLite store, and wraps the API router in
//! CORS and request tracing.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{
  Router,
  http::{HeaderValue, Method},
};
use bazaar_api::ImageDir;
use bazaar_core::{policy::DuplicatePolicy, store::ItemStore};
use bazaar_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Environment variables with this prefix override the config file, e.g.
/// `BAZAAR_PORT=9001`.
pub const ENV_PREFIX: &str = "BAZAAR";

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  pub images_dir:        PathBuf,
  /// The only origin allowed by CORS.
  pub front_url:         String,
  pub on_duplicate_name: DuplicatePolicy,
}

impl ServerConfig {
  /// Layer built-in defaults, the optional TOML file at `path`, and the
  /// environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 9000_i64)?
      .set_default("store_path", "db/mercari.sqlite3")?
      .set_default("images_dir", "images")?
      .set_default("front_url", "http://localhost:3000")?
      .set_default("on_duplicate_name", "ignore")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Open the store named by `config`, applying its duplicate-name policy.
pub async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let store_path = expand_tilde(&config.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  Ok(store.with_duplicate_policy(config.on_duplicate_name))
}

/// CORS for the single front-end origin.
pub fn cors_layer(front_url: &str) -> anyhow::Result<CorsLayer> {
  let origin = HeaderValue::from_str(front_url)
    .with_context(|| format!("invalid front_url {front_url:?}"))?;
  Ok(
    CorsLayer::new()
      .allow_origin(origin)
      .allow_credentials(false)
      .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
      .allow_headers(Any),
  )
}

/// Build the complete application router.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> anyhow::Result<Router>
where
  S: ItemStore + Clone + Send + Sync + 'static,
{
  let images = ImageDir::new(expand_tilde(&config.images_dir));
  Ok(
    bazaar_api::api_router(store, images)
      .layer(cors_layer(&config.front_url)?)
      .layer(TraceLayer::new_for_http()),
  )
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
