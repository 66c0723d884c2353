//! Handlers for a rule's requirement forest.
//!
//! All paths are below `/courses/{course_id}/rules/{rule_id}`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/requirements` | The whole forest, siblings in order |
//! | `POST`   | `/requirements` | Body: one [`NewRequirement`] root with nested children; 201 |
//! | `PUT`    | `/requirements` | Body: array of top-level nodes; reconciles and returns the stored forest |
//! | `GET`    | `/requirements/{id}/children` | Direct children only |
//! | `POST`   | `/requirements/{id}/children` | Body: [`RequirementFields`]; 201 |
//! | `DELETE` | `/requirements/{id}` | Removes the node and its subtree; 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rulebook_core::{
  CourseId, RequirementId, RuleId,
  requirement::{NewRequirement, RequirementFields, RequirementNode},
  store::RuleStore,
  submission::parse_forest,
};

use crate::error::ApiError;

// ─── Forest ───────────────────────────────────────────────────────────────────

/// `GET .../requirements`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path((course, rule)): Path<(CourseId, RuleId)>,
) -> Result<Json<Vec<RequirementNode>>, ApiError>
where
  S: RuleStore,
{
  let forest = store.list_forest(course, rule).await.map_err(ApiError::from_store)?;
  Ok(Json(forest))
}

/// `POST .../requirements`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path((course, rule)): Path<(CourseId, RuleId)>,
  Json(body): Json<NewRequirement>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RuleStore,
{
  let node = store
    .create_requirement(course, rule, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(node)))
}

/// `PUT .../requirements`
///
/// The body is taken as raw JSON so that a single object (rather than an
/// array of top-level nodes) is reported as a 400 with a useful message.
pub async fn reconcile<S>(
  State(store): State<Arc<S>>,
  Path((course, rule)): Path<(CourseId, RuleId)>,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<Vec<RequirementNode>>, ApiError>
where
  S: RuleStore,
{
  let submitted = parse_forest(body).map_err(ApiError::from_store)?;
  let forest = store
    .reconcile(course, rule, submitted)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(forest))
}

// ─── Single nodes ─────────────────────────────────────────────────────────────

/// `GET .../requirements/{id}/children`
pub async fn children<S>(
  State(store): State<Arc<S>>,
  Path((course, rule, parent)): Path<(CourseId, RuleId, RequirementId)>,
) -> Result<Json<Vec<RequirementNode>>, ApiError>
where
  S: RuleStore,
{
  let rows = store
    .list_children(course, rule, parent)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rows.into_iter().map(RequirementNode::from).collect()))
}

/// `POST .../requirements/{id}/children`
pub async fn add_child<S>(
  State(store): State<Arc<S>>,
  Path((course, rule, parent)): Path<(CourseId, RuleId, RequirementId)>,
  Json(fields): Json<RequirementFields>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RuleStore,
{
  let row = store
    .add_child(course, rule, parent, fields)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(RequirementNode::from(row))))
}

/// `DELETE .../requirements/{id}`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path((course, rule, id)): Path<(CourseId, RuleId, RequirementId)>,
) -> Result<StatusCode, ApiError>
where
  S: RuleStore,
{
  store.remove_node(course, rule, id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
