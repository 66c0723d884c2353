//! Integer identities assigned by the store.
//!
//! Each entity gets its own newtype so a rule id can never be passed where a
//! requirement id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
    }

    impl From<i64> for $name {
      fn from(v: i64) -> Self { Self(v) }
    }
  };
}

id_type!(
  /// Identity of a [`Course`](crate::course::Course).
  CourseId
);
id_type!(
  /// Identity of a [`Rule`](crate::rule::Rule).
  RuleId
);
id_type!(
  /// Identity of a persisted [`Requirement`](crate::requirement::Requirement).
  RequirementId
);
