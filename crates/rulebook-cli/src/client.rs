//! Async HTTP client wrapping the Rulebook JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use rulebook_core::{
  CourseId, RuleId,
  course::Course,
  requirement::RequirementNode,
  rule::{Rule, RuleWithRequirements},
};
use serde::de::DeserializeOwned;

/// Connection settings for the Rulebook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the Rulebook JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    tracing::debug!(path, "GET");
    let resp = self
      .auth(self.client.get(self.url(path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    let resp = check(resp, "GET", path).await?;
    resp.json().await.with_context(|| format!("deserialising GET {path}"))
  }

  // ── Courses & rules ───────────────────────────────────────────────────────

  /// `GET /api/courses`
  pub async fn list_courses(&self) -> Result<Vec<Course>> { self.get_json("/courses").await }

  /// `GET /api/courses/{course_id}/rules`
  pub async fn list_rules(&self, course: CourseId) -> Result<Vec<Rule>> {
    self.get_json(&format!("/courses/{course}/rules")).await
  }

  /// `GET /api/courses/{course_id}/rules/{rule_id}`
  pub async fn get_rule(&self, course: CourseId, rule: RuleId) -> Result<RuleWithRequirements> {
    self.get_json(&format!("/courses/{course}/rules/{rule}")).await
  }

  // ── Requirements ──────────────────────────────────────────────────────────

  /// `PUT /api/courses/{course_id}/rules/{rule_id}/requirements`
  pub async fn reconcile(
    &self,
    course: CourseId,
    rule: RuleId,
    forest: &serde_json::Value,
  ) -> Result<Vec<RequirementNode>> {
    let path = format!("/courses/{course}/rules/{rule}/requirements");
    tracing::debug!(path, "PUT");
    let resp = self
      .auth(self.client.put(self.url(&path)))
      .json(forest)
      .send()
      .await
      .with_context(|| format!("PUT {path} failed"))?;
    let resp = check(resp, "PUT", &path).await?;
    resp.json().await.context("deserialising reconciled forest")
  }

  // ── Handbook ──────────────────────────────────────────────────────────────

  /// `GET /api/courses/{course_id}/handbook.{ext}`
  pub async fn handbook(&self, course: CourseId, ext: &str) -> Result<String> {
    let path = format!("/courses/{course}/handbook.{ext}");
    let resp = self
      .auth(self.client.get(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    let resp = check(resp, "GET", &path).await?;
    resp.text().await.context("reading handbook body")
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, method: &str, path: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(anyhow!("{method} {path} → {status}: {}", error_message(&body)))
}

/// Pull `error` out of a `{"error": "..."}` body, or fall back to the raw text.
fn error_message(body: &str) -> String {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| body.trim().to_owned())
}
