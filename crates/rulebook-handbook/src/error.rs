//! Error types for the handbook renderer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Requirement trees deeper than this are almost certainly corrupt and
  /// would not fit on a page anyway.
  #[error("requirement tree of rule {rule} is deeper than {max} levels")]
  TooDeep { rule: String, max: usize },

  #[error("formatting error: {0}")]
  Fmt(#[from] std::fmt::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
