//! Error types for `rulebook-core`.

use thiserror::Error;

use crate::{CourseId, RequirementId, RuleId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("course {0} not found")]
  CourseNotFound(CourseId),

  #[error("rule {rule} not found in course {course}")]
  RuleNotFound { course: CourseId, rule: RuleId },

  #[error("requirement {requirement} not found in rule {rule}")]
  RequirementNotFound { rule: RuleId, requirement: RequirementId },

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("conflict: {0}")]
  Conflict(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The caller-visible category of a failure.
///
/// Transport layers map these onto their own status codes; everything that
/// is not one of the first three is an internal failure whose detail is
/// logged rather than shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  InvalidInput,
  Conflict,
  Internal,
}

/// Implemented by every error type that can cross the store boundary.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::CourseNotFound(_)
      | Error::RuleNotFound { .. }
      | Error::RequirementNotFound { .. } => ErrorKind::NotFound,
      Error::InvalidInput(_) => ErrorKind::InvalidInput,
      Error::Conflict(_) => ErrorKind::Conflict,
    }
  }
}

impl Classify for std::convert::Infallible {
  fn kind(&self) -> ErrorKind { match *self {} }
}
