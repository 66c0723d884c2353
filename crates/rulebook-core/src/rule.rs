//! Rules: named, typed containers for a requirement forest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
  CourseId, RuleId,
  requirement::{NewRequirement, RequirementNode},
};

/// The handbook section a rule belongs to.
///
/// The string forms are fixed by existing data, including the two
/// upper-case identifiers at the end.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum RuleType {
  #[serde(rename = "Applicability of the Student Rules policies and procedures")]
  #[strum(serialize = "Applicability of the Student Rules policies and procedures")]
  Applicability,
  #[serde(
    rename = "Academic Conduct Essentials and Communication and Research Skills modules"
  )]
  #[strum(
    serialize = "Academic Conduct Essentials and Communication and Research Skills modules"
  )]
  AcademicConduct,
  #[serde(rename = "English Eligibility")]
  #[strum(serialize = "English Eligibility")]
  EnglishEligibility,
  #[serde(rename = "Admissions")]
  #[strum(serialize = "Admissions")]
  Admissions,
  #[serde(rename = "Satisfactory Progress")]
  #[strum(serialize = "Satisfactory Progress")]
  SatisfactoryProgress,
  #[serde(rename = "Progress Status")]
  #[strum(serialize = "Progress Status")]
  ProgressStatus,
  #[serde(rename = "Award with Distinction")]
  #[strum(serialize = "Award with Distinction")]
  AwardWithDistinction,
  #[serde(rename = "Deferrals")]
  #[strum(serialize = "Deferrals")]
  Deferrals,
  #[serde(rename = "Additional Rules")]
  #[strum(serialize = "Additional Rules")]
  AdditionalRules,
  #[serde(rename = "Skills")]
  #[strum(serialize = "Skills")]
  Skills,
  #[serde(rename = "Knowledge Application")]
  #[strum(serialize = "Knowledge Application")]
  KnowledgeApplication,
  #[serde(rename = "Knowledge")]
  #[strum(serialize = "Knowledge")]
  Knowledge,
  #[serde(rename = "Ranking and selection for admission")]
  #[strum(serialize = "Ranking and selection for admission")]
  RankingAndSelection,
  #[serde(rename = "ARTICULATION_AND_EXIT_AWARDS")]
  #[strum(serialize = "ARTICULATION_AND_EXIT_AWARDS")]
  ArticulationAndExitAwards,
  #[serde(rename = "COURSE_STRUCTURE")]
  #[strum(serialize = "COURSE_STRUCTURE")]
  CourseStructure,
}

impl RuleType {
  /// Heading used when rendering the rule in a handbook.
  ///
  /// Identical to the stored string except for the two legacy identifiers.
  pub fn heading(self) -> &'static str {
    match self {
      RuleType::ArticulationAndExitAwards => "Articulation and Exit Awards",
      RuleType::CourseStructure => "Course Structure",
      other => other.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
  pub id:          RuleId,
  pub course_id:   CourseId,
  pub name:        String,
  pub rule_type:   RuleType,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// A rule together with its assembled requirement forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleWithRequirements {
  #[serde(flatten)]
  pub rule:         Rule,
  pub requirements: Vec<RequirementNode>,
}

/// Input to [`crate::store::RuleStore::create_rule`].
///
/// `requirements` seeds the rule's forest in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRule {
  pub name:         String,
  pub rule_type:    RuleType,
  #[serde(default)]
  pub description:  String,
  #[serde(default)]
  pub requirements: Vec<NewRequirement>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulePatch {
  pub name:        Option<String>,
  pub rule_type:   Option<RuleType>,
  pub description: Option<String>,
}

impl RulePatch {
  pub fn apply_to(self, rule: &mut Rule) {
    if let Some(name) = self.name {
      rule.name = name;
    }
    if let Some(rule_type) = self.rule_type {
      rule.rule_type = rule_type;
    }
    if let Some(description) = self.description {
      rule.description = description;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legacy_identifiers_get_readable_headings() {
    assert_eq!(RuleType::CourseStructure.to_string(), "COURSE_STRUCTURE");
    assert_eq!(RuleType::CourseStructure.heading(), "Course Structure");
    assert_eq!(RuleType::Deferrals.heading(), "Deferrals");
  }

  #[test]
  fn new_rule_defaults_optional_fields() {
    let rule: NewRule =
      serde_json::from_str(r#"{"name":"Admission","rule_type":"Admissions"}"#).unwrap();
    assert_eq!(rule.rule_type, RuleType::Admissions);
    assert!(rule.description.is_empty());
    assert!(rule.requirements.is_empty());
  }
}
