//! Handlers for `/courses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/courses` | |
//! | `POST`   | `/courses` | Body: [`NewCourse`]; 201, 409 on duplicate `(code, version)` |
//! | `GET`    | `/courses/{course_id}` | 404 if not found |
//! | `PATCH`  | `/courses/{course_id}` | Body: [`CoursePatch`] |
//! | `DELETE` | `/courses/{course_id}` | Cascades to rules and requirements; 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rulebook_core::{
  CourseId,
  course::{Course, CoursePatch, NewCourse},
  store::RuleStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /courses`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Course>>, ApiError>
where
  S: RuleStore,
{
  let courses = store.list_courses().await.map_err(ApiError::from_store)?;
  Ok(Json(courses))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /courses`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCourse>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RuleStore,
{
  if body.code.trim().is_empty() || body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("course code and name must not be empty".into()));
  }
  let course = store.create_course(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(course)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /courses/{course_id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CourseId>,
) -> Result<Json<Course>, ApiError>
where
  S: RuleStore,
{
  let course = store
    .get_course(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("course {id} not found")))?;
  Ok(Json(course))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /courses/{course_id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CourseId>,
  Json(patch): Json<CoursePatch>,
) -> Result<Json<Course>, ApiError>
where
  S: RuleStore,
{
  let course = store.update_course(id, patch).await.map_err(ApiError::from_store)?;
  Ok(Json(course))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /courses/{course_id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CourseId>,
) -> Result<StatusCode, ApiError>
where
  S: RuleStore,
{
  store.delete_course(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
