//! Handbook rendering for Rulebook.
//!
//! Turns a course and its rules' requirement forests into a numbered
//! document. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! # use rulebook_core::{course::Course, rule::RuleWithRequirements};
//! # fn demo(course: &Course, rules: &[RuleWithRequirements]) {
//! let html = rulebook_handbook::render_html(course, rules).unwrap();
//! let text = rulebook_handbook::render_text(course, rules).unwrap();
//! # }
//! ```

pub mod error;
mod html;
pub mod numbering;
mod outline;
mod text;

pub use error::{Error, Result};
pub use numbering::label;
pub use outline::{Outline, OutlineItem};
use rulebook_core::{course::Course, rule::RuleWithRequirements};

/// Number one rule's forest without rendering it.
pub fn build_outline(rule: &RuleWithRequirements) -> Result<Outline> { outline::build(rule) }

/// Render a standalone HTML5 handbook for `course`.
pub fn render_html(course: &Course, rules: &[RuleWithRequirements]) -> Result<String> {
  html::render(course, &outline::build_all(rules)?)
}

/// Render an indented plain-text handbook for `course`.
pub fn render_text(course: &Course, rules: &[RuleWithRequirements]) -> Result<String> {
  text::render(course, &outline::build_all(rules)?)
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use rulebook_core::{
    CourseId,
    course::CourseType,
    requirement::NumberingStyle::{Alphabetic, Numeric},
  };

  use super::*;
  use crate::outline::tests::{node, rule};

  #[test]
  fn public_entry_points_agree_on_labels() {
    let now = Utc::now();
    let course = Course {
      id:          CourseId(2),
      code:        "GDIT".into(),
      name:        "Graduate Diploma in IT".into(),
      course_type: CourseType::GraduateDiploma,
      version:     "2026".into(),
      created_at:  now,
      updated_at:  now,
    };
    let rules = vec![rule(vec![node(1, "one of", Numeric, false, vec![
      node(2, "a degree", Alphabetic, false, vec![]),
    ])])];

    let outline = build_outline(&rules[0]).unwrap();
    assert_eq!(outline.items[0].label.as_deref(), Some("1"));
    assert_eq!(outline.items[0].children[0].label.as_deref(), Some("(1)"));

    let text = render_text(&course, &rules).unwrap();
    assert!(text.contains("  1 one of\n    (1) a degree\n"));
    let html = render_html(&course, &rules).unwrap();
    assert!(html.contains("<span class=\"label\">(1)</span> a degree"));
  }
}
