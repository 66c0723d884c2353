//! JSON REST API for Rulebook.
//!
//! Exposes an axum [`Router`] backed by any [`rulebook_core::store::RuleStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rulebook_api::api_router(store.clone()))
//! ```

pub mod courses;
pub mod error;
pub mod requirements;
pub mod rules;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};
use rulebook_core::store::RuleStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RuleStore + 'static,
{
  Router::new()
    // Courses
    .route("/courses", get(courses::list::<S>).post(courses::create::<S>))
    .route(
      "/courses/{course_id}",
      get(courses::get_one::<S>)
        .patch(courses::update::<S>)
        .delete(courses::delete::<S>),
    )
    // Rules
    .route("/courses/{course_id}/rules", get(rules::list::<S>).post(rules::create::<S>))
    .route(
      "/courses/{course_id}/rules/{rule_id}",
      get(rules::get_one::<S>)
        .patch(rules::update::<S>)
        .delete(rules::delete::<S>),
    )
    // Requirements
    .route(
      "/courses/{course_id}/rules/{rule_id}/requirements",
      get(requirements::list::<S>)
        .post(requirements::create::<S>)
        .put(requirements::reconcile::<S>),
    )
    .route(
      "/courses/{course_id}/rules/{rule_id}/requirements/{id}",
      delete(requirements::remove::<S>),
    )
    .route(
      "/courses/{course_id}/rules/{rule_id}/requirements/{id}/children",
      get(requirements::children::<S>).post(requirements::add_child::<S>),
    )
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use rulebook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Creates a course and an admissions rule; returns the rule's base path.
  async fn seed_rule(app: &Router) -> String {
    let resp = send(
      app,
      "POST",
      "/courses",
      Some(json!({
        "code": "GCIT",
        "name": "Graduate Certificate in IT",
        "course_type": "Graduate Certificate",
        "version": "2025",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let course = json_body(resp).await;

    let resp = send(
      app,
      "POST",
      &format!("/courses/{}/rules", course["id"]),
      Some(json!({ "name": "Admission", "rule_type": "Admissions" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let rule = json_body(resp).await;
    format!("/courses/{}/rules/{}", course["id"], rule["id"])
  }

  // ── Courses ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_course_is_404_with_error_body() {
    let app = app().await;
    let resp = send(&app, "GET", "/courses/99", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({ "error": "course 99 not found" }));
  }

  #[tokio::test]
  async fn duplicate_course_is_409() {
    let app = app().await;
    let body = json!({
      "code": "MIT",
      "name": "Master of IT",
      "course_type": "Master's (Coursework)",
      "version": "2025",
    });
    let first = send(&app, "POST", "/courses", Some(body.clone())).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = send(&app, "POST", "/courses", Some(body)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn empty_course_code_is_400() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/courses",
      Some(json!({ "code": " ", "name": "x", "course_type": "Doctoral Degree", "version": "1" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn patch_and_delete_course() {
    let app = app().await;
    let base = seed_rule(&app).await;
    let course_path = base.split("/rules").next().unwrap().to_owned();

    let resp = send(&app, "PATCH", &course_path, Some(json!({ "name": "Renamed" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let course = json_body(resp).await;
    assert_eq!(course["name"], "Renamed");
    assert_eq!(course["code"], "GCIT");

    let resp = send(&app, "DELETE", &course_path, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = send(&app, "GET", &base, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Requirements ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reconcile_round_trip() {
    let app = app().await;
    let base = seed_rule(&app).await;
    let uri = format!("{base}/requirements");

    let resp = send(
      &app,
      "PUT",
      &uri,
      Some(json!([
        { "content": "hold a degree", "style": "alphabetic", "children": [
          { "content": "in IT" },
          { "content": "or", "is_connector": true },
          { "content": "in CS" },
        ]},
        { "content": "meet English requirements", "order_index": 1 },
      ])),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let forest = json_body(resp).await;
    assert_eq!(forest.as_array().unwrap().len(), 2);
    assert_eq!(forest[0]["children"].as_array().unwrap().len(), 3);
    assert_eq!(forest[0]["children"][1]["is_connector"], true);
    assert!(forest[0].get("parent_id").is_none());

    // Drop the connector and the second root; keep the rest by id.
    let a = forest[0]["id"].clone();
    let b = forest[0]["children"][0]["id"].clone();
    let resp = send(
      &app,
      "PUT",
      &uri,
      Some(json!([
        { "id": a, "content": "hold a degree", "style": "alphabetic", "children": [
          { "id": b, "content": "in IT" },
        ]},
      ])),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["id"], a);
    assert_eq!(stored[0]["children"][0]["id"], b);
    assert_eq!(stored[0]["children"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn reconcile_rejects_single_object_without_writing() {
    let app = app().await;
    let base = seed_rule(&app).await;
    let uri = format!("{base}/requirements");

    let resp = send(&app, "PUT", &uri, Some(json!({ "content": "lonely" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].as_str().unwrap().contains("array"));

    let stored = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(stored, json!([]));
  }

  #[tokio::test]
  async fn reconcile_on_unknown_rule_is_404() {
    let app = app().await;
    let base = seed_rule(&app).await;
    let course_path = base.split("/rules").next().unwrap();
    let resp = send(&app, "PUT", &format!("{course_path}/rules/999/requirements"), Some(json!([]))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn children_endpoints() {
    let app = app().await;
    let base = seed_rule(&app).await;

    let resp = send(
      &app,
      "POST",
      &format!("{base}/requirements"),
      Some(json!({ "content": "root", "children": [{ "content": "first" }] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let root = json_body(resp).await;
    let root_id = root["id"].as_i64().unwrap();

    let resp = send(
      &app,
      "POST",
      &format!("{base}/requirements/{root_id}/children"),
      Some(json!({ "content": "second", "order_index": 1 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let child = json_body(resp).await;
    assert!(child.get("parent_id").is_none());

    let kids = json_body(send(&app, "GET", &format!("{base}/requirements/{root_id}/children"), None).await).await;
    let contents: Vec<_> = kids.as_array().unwrap().iter().map(|k| k["content"].clone()).collect();
    assert_eq!(contents, vec![json!("first"), json!("second")]);

    let resp = send(&app, "DELETE", &format!("{base}/requirements/{root_id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let stored = json_body(send(&app, "GET", &format!("{base}/requirements"), None).await).await;
    assert_eq!(stored, json!([]));

    let resp = send(&app, "DELETE", &format!("{base}/requirements/{root_id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
