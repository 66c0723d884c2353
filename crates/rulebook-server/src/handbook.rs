//! Handbook download routes.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/courses/{course_id}/handbook.html` | `text/html` |
//! | `GET`  | `/courses/{course_id}/handbook.txt`  | `text/plain` |

use axum::{
  extract::{Path, State},
  http::header,
  response::{Html, IntoResponse},
};
use rulebook_api::ApiError;
use rulebook_core::{CourseId, course::Course, rule::RuleWithRequirements, store::RuleStore};

use crate::{AppState, error::Error};

/// The course and every rule's forest, in rule listing order.
async fn load<S: RuleStore>(
  store: &S,
  id: CourseId,
) -> Result<(Course, Vec<RuleWithRequirements>), Error> {
  let course = store
    .get_course(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("course {id} not found")))?;

  let mut rules = Vec::new();
  for rule in store.list_rules(id).await.map_err(ApiError::from_store)? {
    // A rule deleted between the two reads is simply left out.
    if let Some(full) = store.get_rule(id, rule.id).await.map_err(ApiError::from_store)? {
      rules.push(full);
    }
  }
  Ok((course, rules))
}

pub async fn html<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<CourseId>,
) -> Result<impl IntoResponse, Error>
where
  S: RuleStore + 'static,
{
  let (course, rules) = load(state.store.as_ref(), id).await?;
  let document = rulebook_handbook::render_html(&course, &rules)?;
  tracing::debug!(course = %id, rules = rules.len(), "rendered html handbook");
  Ok(Html(document))
}

pub async fn text<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<CourseId>,
) -> Result<impl IntoResponse, Error>
where
  S: RuleStore + 'static,
{
  let (course, rules) = load(state.store.as_ref(), id).await?;
  let document = rulebook_handbook::render_text(&course, &rules)?;
  tracing::debug!(course = %id, rules = rules.len(), "rendered text handbook");
  Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], document))
}
