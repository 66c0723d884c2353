//! HTTP server for Rulebook.
//!
//! Serves the JSON API from `rulebook-api` under `/api`, the handbook
//! downloads next to it, and an unauthenticated `/health` probe.

pub mod auth;
pub mod error;
pub mod handbook;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{Method, header},
  middleware::from_fn_with_state,
  routing::get,
};
use rulebook_core::store::RuleStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `RULEBOOK_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Leave empty to serve the API without authentication.
  #[serde(default)]
  pub auth_username:      String,
  #[serde(default)]
  pub auth_password_hash: String,
  /// Allowed browser origins; `"*"` allows any.
  #[serde(default)]
  pub cors_origins:       Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/rulebook/rulebook.db") }

impl ServerConfig {
  /// Layer the (optional) file at `path` under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("RULEBOOK")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins"),
      )
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~/` replaced by `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    under_home(&self.store_path, std::env::var_os("HOME").map(PathBuf::from))
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }
}

fn under_home(path: &Path, home: Option<PathBuf>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the handbook handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    AppState {
      store:  self.store.clone(),
      config: self.config.clone(),
      auth:   self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RuleStore + 'static,
{
  let handbooks = Router::new()
    .route("/courses/{course_id}/handbook.html", get(handbook::html::<S>))
    .route("/courses/{course_id}/handbook.txt", get(handbook::text::<S>))
    .with_state(state.clone());

  let api = rulebook_api::api_router(state.store.clone())
    .merge(handbooks)
    .layer(from_fn_with_state(state.auth.clone(), require_auth));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&state.config.cors_origins))
}

async fn health() -> &'static str { "ok" }

fn cors_layer(origins: &[String]) -> CorsLayer {
  let allow_origin = if origins.iter().any(|o| o == "*") {
    AllowOrigin::any()
  } else {
    let parsed: Vec<_> = origins
      .iter()
      .filter_map(|o| match o.parse() {
        Ok(v) => Some(v),
        Err(_) => {
          tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
          None
        }
      })
      .collect();
    AllowOrigin::list(parsed)
  };

  CorsLayer::new()
    .allow_origin(allow_origin)
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
  };
  use rulebook_core::{
    course::{CourseType, NewCourse},
    requirement::{NewRequirement, NumberingStyle, RequirementFields},
    rule::{NewRule, RuleType},
  };
  use rulebook_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;
  use crate::auth::tests::{basic, hash};

  fn config(auth_username: &str, password_hash: String) -> ServerConfig {
    ServerConfig {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      store_path:         PathBuf::from(":memory:"),
      auth_username:      auth_username.to_string(),
      auth_password_hash: password_hash,
      cors_origins:       vec!["https://handbook.example.edu".to_string()],
    }
  }

  async fn make_state(config: ServerConfig) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      auth:   Arc::new(config.auth()),
      config: Arc::new(config),
    }
  }

  async fn request(state: AppState<SqliteStore>, uri: &str, auth: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = auth {
      builder = builder.header(header::AUTHORIZATION, value);
    }
    router(state).oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  /// A course with one rule whose forest is `a / (a),(b)`.
  async fn seed(state: &AppState<SqliteStore>) -> i64 {
    let course = state
      .store
      .create_course(NewCourse {
        code:        "GCIT".into(),
        name:        "Graduate Certificate in IT".into(),
        course_type: CourseType::GraduateCertificate,
        version:     "2025".into(),
      })
      .await
      .unwrap();
    let leaf = |content: &str, order_index| NewRequirement {
      fields:   RequirementFields {
        content: content.into(),
        order_index,
        ..Default::default()
      },
      children: vec![],
    };
    state
      .store
      .create_rule(course.id, NewRule {
        name:         "Admission".into(),
        rule_type:    RuleType::Admissions,
        description:  "Applicants must".into(),
        requirements: vec![NewRequirement {
          fields:   RequirementFields {
            content: "hold one of <these>".into(),
            style: NumberingStyle::Alphabetic,
            ..Default::default()
          },
          children: vec![leaf("a degree", 0), leaf("a diploma", 1)],
        }],
      })
      .await
      .unwrap();
    course.id.get()
  }

  #[tokio::test]
  async fn health_skips_auth() {
    let state = make_state(config("registrar", hash("secret"))).await;
    let resp = request(state, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_requires_credentials_when_configured() {
    let state = make_state(config("registrar", hash("secret"))).await;

    let resp = request(state.clone(), "/api/courses", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let resp = request(state.clone(), "/api/courses", Some(&basic("registrar", "nope"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = request(state, "/api/courses", Some(&basic("registrar", "secret"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn empty_username_serves_without_auth() {
    let state = make_state(config("", String::new())).await;
    let resp = request(state, "/api/courses", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn text_handbook() {
    let state = make_state(config("", String::new())).await;
    let id = seed(&state).await;

    let resp = request(state, &format!("/api/courses/{id}/handbook.txt"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
      resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain")
    );
    let text = body_text(resp).await;
    assert!(text.starts_with("GCIT Graduate Certificate in IT\n"));
    assert!(text.contains("Admissions: Admission\n"));
    assert!(text.contains("  a hold one of <these>\n"));
    assert!(text.contains("    (a) a degree\n    (b) a diploma\n"));
  }

  #[tokio::test]
  async fn html_handbook_escapes_content() {
    let state = make_state(config("", String::new())).await;
    let id = seed(&state).await;

    let resp = request(state, &format!("/api/courses/{id}/handbook.html"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("hold one of &lt;these&gt;"));
    assert!(html.contains("<span class=\"label\">(b)</span> a diploma"));
  }

  #[tokio::test]
  async fn handbook_for_unknown_course_is_404() {
    let state = make_state(config("", String::new())).await;
    let resp = request(state, "/api/courses/42/handbook.html", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn cors_allows_configured_origin() {
    let state = make_state(config("registrar", hash("secret"))).await;
    let req = Request::builder()
      .method("OPTIONS")
      .uri("/api/courses")
      .header(header::ORIGIN, "https://handbook.example.edu")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(
      resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      "https://handbook.example.edu"
    );
  }

  #[test]
  fn store_path_expands_home() {
    let home = Some(PathBuf::from("/home/registrar"));
    assert_eq!(
      under_home(&default_store_path(), home.clone()),
      PathBuf::from("/home/registrar/.local/share/rulebook/rulebook.db")
    );
    assert_eq!(under_home(Path::new("/var/lib/rulebook.db"), home), Path::new("/var/lib/rulebook.db"));
    assert_eq!(under_home(Path::new("~/rulebook.db"), None), Path::new("~/rulebook.db"));
    assert_eq!(under_home(Path::new("~user/x.db"), Some(PathBuf::from("/h"))), Path::new("~user/x.db"));
  }

  #[test]
  fn missing_config_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/rulebook.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
  }
}
