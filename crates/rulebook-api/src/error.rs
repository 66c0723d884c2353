//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rulebook_core::{Classify, ErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  /// Logged in full, reported to the client as `"internal error"`.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure onto a response category.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match e.kind() {
      ErrorKind::NotFound => ApiError::NotFound(e.to_string()),
      ErrorKind::InvalidInput => ApiError::BadRequest(e.to_string()),
      ErrorKind::Conflict => ApiError::Conflict(e.to_string()),
      ErrorKind::Internal => ApiError::Internal(Box::new(e)),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::NotFound(m) | ApiError::BadRequest(m) | ApiError::Conflict(m) => m.clone(),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        "internal error".to_owned()
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use rulebook_core::{CourseId, Error};

  use super::*;

  #[test]
  fn store_errors_map_to_statuses() {
    let e = ApiError::from_store(Error::CourseNotFound(CourseId(4)));
    assert_eq!(e.status(), StatusCode::NOT_FOUND);
    assert_eq!(e.to_string(), "course 4 not found");

    let e = ApiError::from_store(Error::InvalidInput("bad".into()));
    assert_eq!(e.status(), StatusCode::BAD_REQUEST);

    let e = ApiError::from_store(Error::Conflict("dup".into()));
    assert_eq!(e.status(), StatusCode::CONFLICT);

    let e = ApiError::from_store(rulebook_store_sqlite::Error::DateParse("yesterday".into()));
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      e.into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR,
    );
  }
}
