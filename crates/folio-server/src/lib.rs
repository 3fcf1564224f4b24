//! HTTP server wiring for folio.
//!
//! Mounts the contact API under `/api`, adds a health check, CORS for the
//! portfolio front end, request tracing, and a JSON 404 for everything else.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Json, Router,
  extract::State,
  http::{HeaderValue, Method, StatusCode, header},
  response::{IntoResponse, Response},
  routing::get,
};
use folio_core::{envelope::Envelope, service::MessageService};
use folio_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FOLIO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Origins allowed to call the API from a browser.
  #[serde(default)]
  pub cors_origins: Vec<String>,
}

/// Layer defaults, an optional TOML file at `path`, then `FOLIO_*`
/// environment variables (`FOLIO_CORS_ORIGINS` is comma-separated).
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5000)?
    .set_default("store_path", "folio.db")?
    .set_default("cors_origins", vec!["http://localhost:5173".to_string()])?
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(
      config::Environment::with_prefix("FOLIO")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins"),
    )
    .build()?
    .try_deserialize()
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

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState {
  pub store:   Arc<SqliteStore>,
  pub service: MessageService<SqliteStore>,
  pub config:  Arc<ServerConfig>,
}

impl AppState {
  pub fn new(store: SqliteStore, config: ServerConfig) -> Self {
    let store = Arc::new(store);
    Self {
      service: MessageService::new(Arc::clone(&store)),
      store,
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the CORS layer from the configured origins.
pub fn cors_layer(
  origins: &[String],
) -> Result<CorsLayer, header::InvalidHeaderValue> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST, Method::DELETE])
      .allow_headers([header::CONTENT_TYPE]),
  )
}

/// Build the full application router.
pub fn router(state: AppState) -> Result<Router, header::InvalidHeaderValue> {
  let cors = cors_layer(&state.config.cors_origins)?;

  let api = folio_api::api_router(state.service.clone())
    .route("/health", get(health).with_state(Arc::clone(&state.store)))
    .method_not_allowed_fallback(method_not_allowed);

  Ok(
    Router::new()
      .nest("/api", api)
      .fallback(route_not_found)
      .layer(cors)
      .layer(TraceLayer::new_for_http()),
  )
}

async fn health(State(store): State<Arc<SqliteStore>>) -> Response {
  match store.ping().await {
    Ok(()) => (StatusCode::OK, Json(Envelope::ok("ok"))).into_response(),
    Err(e) => {
      tracing::error!(error = %e, "health check failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failure("Database unavailable")),
      )
        .into_response()
    }
  }
}

async fn method_not_allowed() -> Response {
  (
    StatusCode::METHOD_NOT_ALLOWED,
    Json(Envelope::failure("Method not allowed")),
  )
    .into_response()
}

async fn route_not_found() -> Response {
  (StatusCode::NOT_FOUND, Json(Envelope::failure("Route not found")))
    .into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request};
  use serde_json::Value;
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state() -> AppState {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, ServerConfig {
      host:         "127.0.0.1".to_string(),
      port:         5000,
      store_path:   PathBuf::from(":memory:"),
      cors_origins: vec!["http://localhost:5173".to_string()],
    })
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn health_reports_ok() {
    let app = router(make_state().await).unwrap();
    let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["success"], true);
  }

  #[tokio::test]
  async fn unknown_route_is_json_404() {
    let app = router(make_state().await).unwrap();
    let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
  }

  #[tokio::test]
  async fn unsupported_method_is_json_405() {
    for uri in [
      "/api/contact".to_string(),
      format!("/api/contact/{}", uuid_like()),
      "/api/health".to_string(),
    ] {
      let app = router(make_state().await).unwrap();
      let req = Request::builder()
        .method("PUT")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
      let resp = app.oneshot(req).await.unwrap();
      assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
      let body = body_json(resp).await;
      assert_eq!(body["success"], false);
      assert_eq!(body["message"], "Method not allowed");
    }
  }

  fn uuid_like() -> &'static str { "6f1c0a0e-6d4b-4a7e-9b8e-1f2d3c4b5a69" }

  #[tokio::test]
  async fn contact_api_is_nested_under_api() {
    let app = router(make_state().await).unwrap();
    let req = Request::builder().uri("/api/contact").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["count"], 0);
  }

  #[tokio::test]
  async fn cors_preflight_allows_configured_origin() {
    let app = router(make_state().await).unwrap();
    let req = Request::builder()
      .method("OPTIONS")
      .uri("/api/contact")
      .header(header::ORIGIN, "http://localhost:5173")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(
      resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .unwrap(),
      "http://localhost:5173"
    );
  }

  #[test]
  fn bad_origin_is_rejected() {
    assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
  }

  #[test]
  fn config_defaults_apply_without_file() {
    let cfg = load_config(Path::new("/definitely/not/here.toml")).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("folio.db"));
    assert!(!cfg.cors_origins.is_empty());
  }

  #[test]
  fn config_file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!(
      "folio-config-{}.toml",
      std::process::id()
    ));
    std::fs::write(&path, "port = 8088\ncors_origins = [\"https://example.com\"]\n")
      .unwrap();

    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.port, 8088);
    assert_eq!(cfg.cors_origins, ["https://example.com"]);

    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn tilde_expands_to_home() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/folio.db")),
        PathBuf::from(home).join("folio.db")
      );
    }
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }
}
