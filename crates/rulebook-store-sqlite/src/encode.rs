//! Encoding and decoding helpers between domain types and the plain-text
//! column representations used in SQLite.
//!
//! Timestamps are RFC 3339 strings. Course and rule types are stored as
//! their display strings; numbering styles as lowercase keywords.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rulebook_core::{
  CourseId, RequirementId, RuleId,
  course::{Course, CourseType},
  requirement::{NumberingStyle, Requirement, RequirementFields},
  rule::{Rule, RuleType},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NumberingStyle ──────────────────────────────────────────────────────────

pub fn encode_style(s: NumberingStyle) -> &'static str {
  match s {
    NumberingStyle::Numeric => "numeric",
    NumberingStyle::Alphabetic => "alphabetic",
    NumberingStyle::Roman => "roman",
    NumberingStyle::None => "none",
  }
}

pub fn decode_style(s: &str) -> Result<NumberingStyle> {
  match s {
    "numeric" => Ok(NumberingStyle::Numeric),
    "alphabetic" => Ok(NumberingStyle::Alphabetic),
    "roman" => Ok(NumberingStyle::Roman),
    "none" => Ok(NumberingStyle::None),
    other => Err(Error::Decode { column: "style", value: other.to_owned() }),
  }
}

// ─── Enumerations with display strings ───────────────────────────────────────

pub fn decode_course_type(s: &str) -> Result<CourseType> {
  CourseType::from_str(s)
    .map_err(|_| Error::Decode { column: "course_type", value: s.to_owned() })
}

pub fn decode_rule_type(s: &str) -> Result<RuleType> {
  RuleType::from_str(s).map_err(|_| Error::Decode { column: "rule_type", value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const COURSE_COLUMNS: &str =
  "id, code, name, course_type, version, created_at, updated_at";

/// Raw values read directly from a `courses` row.
pub struct RawCourse {
  pub id:          i64,
  pub code:        String,
  pub name:        String,
  pub course_type: String,
  pub version:     String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawCourse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      code:        row.get(1)?,
      name:        row.get(2)?,
      course_type: row.get(3)?,
      version:     row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      id:          CourseId(self.id),
      code:        self.code,
      name:        self.name,
      course_type: decode_course_type(&self.course_type)?,
      version:     self.version,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const RULE_COLUMNS: &str =
  "id, course_id, name, rule_type, description, created_at, updated_at";

/// Raw values read directly from a `rules` row.
pub struct RawRule {
  pub id:          i64,
  pub course_id:   i64,
  pub name:        String,
  pub rule_type:   String,
  pub description: String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawRule {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      course_id:   row.get(1)?,
      name:        row.get(2)?,
      rule_type:   row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
    })
  }

  pub fn into_rule(self) -> Result<Rule> {
    Ok(Rule {
      id:          RuleId(self.id),
      course_id:   CourseId(self.course_id),
      name:        self.name,
      rule_type:   decode_rule_type(&self.rule_type)?,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const REQUIREMENT_COLUMNS: &str =
  "id, rule_id, parent_id, content, style, is_connector, order_index";

/// Raw values read directly from a `requirements` row.
pub struct RawRequirement {
  pub id:           i64,
  pub rule_id:      i64,
  pub parent_id:    Option<i64>,
  pub content:      String,
  pub style:        String,
  pub is_connector: bool,
  pub order_index:  i64,
}

impl RawRequirement {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      rule_id:      row.get(1)?,
      parent_id:    row.get(2)?,
      content:      row.get(3)?,
      style:        row.get(4)?,
      is_connector: row.get(5)?,
      order_index:  row.get(6)?,
    })
  }

  pub fn into_requirement(self) -> Result<Requirement> {
    Ok(Requirement {
      id:        RequirementId(self.id),
      rule_id:   RuleId(self.rule_id),
      parent_id: self.parent_id.map(RequirementId),
      fields:    RequirementFields {
        content:      self.content,
        style:        decode_style(&self.style)?,
        is_connector: self.is_connector,
        order_index:  self.order_index,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn style_keywords_roundtrip() {
    for style in [
      NumberingStyle::Numeric,
      NumberingStyle::Alphabetic,
      NumberingStyle::Roman,
      NumberingStyle::None,
    ] {
      assert_eq!(decode_style(encode_style(style)).unwrap(), style);
    }
    assert!(matches!(decode_style("greek"), Err(Error::Decode { column: "style", .. })));
  }

  #[test]
  fn rule_type_uses_display_string() {
    assert_eq!(decode_rule_type("COURSE_STRUCTURE").unwrap(), RuleType::CourseStructure);
    assert!(decode_rule_type("Policies").is_err());
  }
}
