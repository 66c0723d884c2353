//! Courses: the top-level owner of rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::CourseId;

/// The award level of a course. The string forms are the labels shown in
/// handbooks and stored in the database.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum CourseType {
  #[serde(rename = "Graduate Certificate")]
  #[strum(serialize = "Graduate Certificate")]
  GraduateCertificate,
  #[serde(rename = "Graduate Diploma")]
  #[strum(serialize = "Graduate Diploma")]
  GraduateDiploma,
  #[serde(rename = "Master's (Coursework)")]
  #[strum(serialize = "Master's (Coursework)")]
  MastersCoursework,
  #[serde(rename = "Master's Extended")]
  #[strum(serialize = "Master's Extended")]
  MastersExtended,
  #[serde(rename = "Master's Research")]
  #[strum(serialize = "Master's Research")]
  MastersResearch,
  #[serde(rename = "Doctoral Degree")]
  #[strum(serialize = "Doctoral Degree")]
  DoctoralDegree,
  #[serde(rename = "Professional Doctorate/Master's Coursework")]
  #[strum(serialize = "Professional Doctorate/Master's Coursework")]
  ProfessionalDoctorate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub id:          CourseId,
  /// Handbook code, e.g. `"62510"`. Unique together with `version`.
  pub code:        String,
  pub name:        String,
  pub course_type: CourseType,
  /// Handbook year or edition label, e.g. `"2025"`.
  pub version:     String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::RuleStore::create_course`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
  pub code:        String,
  pub name:        String,
  pub course_type: CourseType,
  pub version:     String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoursePatch {
  pub code:        Option<String>,
  pub name:        Option<String>,
  pub course_type: Option<CourseType>,
  pub version:     Option<String>,
}

impl CoursePatch {
  /// Overlay the patch onto `course`. Timestamps are the caller's concern.
  pub fn apply_to(self, course: &mut Course) {
    if let Some(code) = self.code {
      course.code = code;
    }
    if let Some(name) = self.name {
      course.name = name;
    }
    if let Some(course_type) = self.course_type {
      course.course_type = course_type;
    }
    if let Some(version) = self.version {
      course.version = version;
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn course_type_strings_match_serde() {
    for ty in CourseType::iter() {
      let json = serde_json::to_value(ty).unwrap();
      assert_eq!(json.as_str().unwrap(), ty.to_string());
      assert_eq!(CourseType::from_str(&ty.to_string()).unwrap(), ty);
    }
  }

  #[test]
  fn patch_only_touches_given_fields() {
    let now = Utc::now();
    let mut course = Course {
      id:          CourseId(1),
      code:        "62510".into(),
      name:        "Master of Data Science".into(),
      course_type: CourseType::MastersCoursework,
      version:     "2024".into(),
      created_at:  now,
      updated_at:  now,
    };

    CoursePatch { version: Some("2025".into()), ..Default::default() }.apply_to(&mut course);

    assert_eq!(course.version, "2025");
    assert_eq!(course.code, "62510");
    assert_eq!(course.course_type, CourseType::MastersCoursework);
  }
}
