//! HTTP server assembly for Roster.
//!
//! Wraps the [`roster_api`] router with CORS and request tracing, and defines
//! the runtime configuration read by the `roster-server` binary.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use roster_core::store::HrStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Browser origins allowed to call the API. `"*"` allows any origin.
  #[serde(default = "default_cors_origins")]
  pub cors_origins: Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("roster.db") }

fn default_cors_origins() -> Vec<String> { vec!["http://localhost:5173".to_owned()] }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         default_host(),
      port:         default_port(),
      store_path:   default_store_path(),
      cors_origins: default_cors_origins(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `ROSTER_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("ROSTER")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

fn cors_layer(origins: &[String]) -> CorsLayer {
  let methods = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
  ];

  if origins.iter().any(|o| o == "*") {
    return CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(methods)
      .allow_headers(Any);
  }

  let allowed: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match o.parse() {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(allowed))
    .allow_methods(methods)
    .allow_headers([header::CONTENT_TYPE])
}

/// Build the served [`Router`]: the JSON API plus CORS and request tracing.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: HrStore + 'static,
{
  roster_api::api_router(store)
    .layer(cors_layer(&config.cors_origins))
    .layer(TraceLayer::new_for_http())
}
