//! Handlers for `/courses/{course_id}/rules` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/courses/{course_id}/rules` | Rules without their forests |
//! | `POST`   | `/courses/{course_id}/rules` | Body: [`NewRule`], optionally with a seed forest; 201 |
//! | `GET`    | `/courses/{course_id}/rules/{rule_id}` | Rule plus its requirement forest |
//! | `PATCH`  | `/courses/{course_id}/rules/{rule_id}` | Body: [`RulePatch`] |
//! | `DELETE` | `/courses/{course_id}/rules/{rule_id}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rulebook_core::{
  CourseId, RuleId,
  rule::{NewRule, Rule, RulePatch, RuleWithRequirements},
  store::RuleStore,
};

use crate::error::ApiError;

pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(course): Path<CourseId>,
) -> Result<Json<Vec<Rule>>, ApiError>
where
  S: RuleStore,
{
  let rules = store.list_rules(course).await.map_err(ApiError::from_store)?;
  Ok(Json(rules))
}

pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(course): Path<CourseId>,
  Json(body): Json<NewRule>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RuleStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("rule name must not be empty".into()));
  }
  let rule = store.create_rule(course, body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((course, rule)): Path<(CourseId, RuleId)>,
) -> Result<Json<RuleWithRequirements>, ApiError>
where
  S: RuleStore,
{
  let found = store
    .get_rule(course, rule)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("rule {rule} not found in course {course}")))?;
  Ok(Json(found))
}

pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((course, rule)): Path<(CourseId, RuleId)>,
  Json(patch): Json<RulePatch>,
) -> Result<Json<Rule>, ApiError>
where
  S: RuleStore,
{
  let updated = store.update_rule(course, rule, patch).await.map_err(ApiError::from_store)?;
  Ok(Json(updated))
}

pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((course, rule)): Path<(CourseId, RuleId)>,
) -> Result<StatusCode, ApiError>
where
  S: RuleStore,
{
  store.delete_rule(course, rule).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
