//! Terminal rendering of a rule's numbered requirement tree.

use rulebook_handbook::{Outline, OutlineItem};

/// One line per requirement, indented two spaces per level and tagged with
/// its id so it can be referenced when editing a forest for `push`.
pub fn format(outline: &Outline) -> String {
  let mut out = format!("{} ({})\n", outline.name, outline.heading);
  lines(&mut out, &outline.items);
  out
}

fn lines(out: &mut String, items: &[OutlineItem]) {
  for item in items {
    let indent = "  ".repeat(item.depth);
    match &item.label {
      Some(label) => out.push_str(&format!("{indent}{label} {} [#{}]\n", item.content, item.id)),
      None => out.push_str(&format!("{indent}{} [#{}]\n", item.content, item.id)),
    }
    lines(out, &item.children);
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use rulebook_core::{
    CourseId, RequirementId, RuleId,
    requirement::{NumberingStyle, RequirementFields, RequirementNode},
    rule::{Rule, RuleType, RuleWithRequirements},
  };

  use super::*;

  fn node(id: i64, content: &str, is_connector: bool, children: Vec<RequirementNode>) -> RequirementNode {
    RequirementNode {
      id: RequirementId(id),
      fields: RequirementFields {
        content: content.into(),
        style: NumberingStyle::Roman,
        is_connector,
        order_index: 0,
      },
      children,
    }
  }

  #[test]
  fn prints_labels_and_ids() {
    let now = Utc::now();
    let rule = RuleWithRequirements {
      rule:         Rule {
        id:          RuleId(3),
        course_id:   CourseId(1),
        name:        "Progression".into(),
        rule_type:   RuleType::SatisfactoryProgress,
        description: String::new(),
        created_at:  now,
        updated_at:  now,
      },
      requirements: vec![node(10, "students must", false, vec![
        node(11, "pass 50% of units", false, vec![]),
        node(12, "and", true, vec![]),
        node(13, "attend orientation", false, vec![]),
      ])],
    };
    let outline = rulebook_handbook::build_outline(&rule).unwrap();
    assert_eq!(
      format(&outline),
      "\
Progression (Satisfactory Progress)
  i students must [#10]
    (i) pass 50% of units [#11]
    and [#12]
    (ii) attend orientation [#13]
"
    );
  }
}
