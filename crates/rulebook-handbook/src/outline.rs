//! Numbered outline: the renderer-independent shape of a handbook.

use rulebook_core::{
  RequirementId,
  requirement::{NumberingStyle, RequirementNode},
  rule::RuleWithRequirements,
};

use crate::{Error, Result, numbering::label};

/// Nesting limit for a single rule's requirement tree.
pub const MAX_DEPTH: usize = 32;

/// One rule, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
  pub heading:     String,
  pub name:        String,
  pub description: String,
  pub items:       Vec<OutlineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
  pub id:           RequirementId,
  /// `None` for connectors and for items under a `none` style.
  pub label:        Option<String>,
  pub content:      String,
  pub is_connector: bool,
  pub depth:        usize,
  pub children:     Vec<OutlineItem>,
}

pub(crate) fn build_all(rules: &[RuleWithRequirements]) -> Result<Vec<Outline>> {
  rules.iter().map(build).collect()
}

/// Number one rule's forest.
///
/// Roots are numbered in their own style, children in their parent's.
/// Connectors are never numbered and do not advance the count.
pub fn build(rule: &RuleWithRequirements) -> Result<Outline> {
  let items = number_siblings(&rule.requirements, None, 1).ok_or_else(|| Error::TooDeep {
    rule: rule.rule.name.clone(),
    max:  MAX_DEPTH,
  })?;
  Ok(Outline {
    heading: rule.rule.rule_type.heading().to_owned(),
    name: rule.rule.name.clone(),
    description: rule.rule.description.clone(),
    items,
  })
}

fn number_siblings(
  nodes: &[RequirementNode],
  parent_style: Option<NumberingStyle>,
  depth: usize,
) -> Option<Vec<OutlineItem>> {
  if depth > MAX_DEPTH {
    return None;
  }
  let mut position = 0;
  let mut items = Vec::with_capacity(nodes.len());
  for node in nodes {
    let label = if node.fields.is_connector {
      None
    } else {
      let style = parent_style.unwrap_or(node.fields.style);
      position += 1;
      Some(label(style, position - 1, depth)).filter(|l| !l.is_empty())
    };
    items.push(OutlineItem {
      id: node.id,
      label,
      content: node.fields.content.clone(),
      is_connector: node.fields.is_connector,
      depth,
      children: number_siblings(&node.children, Some(node.fields.style), depth + 1)?,
    });
  }
  Some(items)
}

#[cfg(test)]
pub(crate) mod tests {
  use chrono::Utc;
  use rulebook_core::{
    CourseId, RuleId,
    requirement::RequirementFields,
    rule::{Rule, RuleType},
  };

  use super::*;

  pub(crate) fn node(
    id: i64,
    content: &str,
    style: NumberingStyle,
    is_connector: bool,
    children: Vec<RequirementNode>,
  ) -> RequirementNode {
    RequirementNode {
      id: RequirementId(id),
      fields: RequirementFields {
        content: content.into(),
        style,
        is_connector,
        order_index: 0,
      },
      children,
    }
  }

  pub(crate) fn rule(requirements: Vec<RequirementNode>) -> RuleWithRequirements {
    let now = Utc::now();
    RuleWithRequirements {
      rule: Rule {
        id:          RuleId(1),
        course_id:   CourseId(1),
        name:        "Admission requirements".into(),
        rule_type:   RuleType::Admissions,
        description: "To be considered for admission".into(),
        created_at:  now,
        updated_at:  now,
      },
      requirements,
    }
  }

  fn labels(items: &[OutlineItem]) -> Vec<Option<&str>> {
    items.iter().map(|i| i.label.as_deref()).collect()
  }

  #[test]
  fn children_use_parent_style() {
    use NumberingStyle::*;
    let outline = build(&rule(vec![
      node(1, "hold a degree", Alphabetic, false, vec![
        node(2, "in IT", Numeric, false, vec![]),
        node(3, "in CS", Numeric, false, vec![]),
      ]),
      node(4, "have experience", Numeric, false, vec![]),
    ]))
    .unwrap();

    assert_eq!(labels(&outline.items), vec![Some("a"), Some("2")]);
    assert_eq!(labels(&outline.items[0].children), vec![Some("(a)"), Some("(b)")]);
  }

  #[test]
  fn connectors_are_skipped() {
    use NumberingStyle::{Numeric, Roman};
    let outline = build(&rule(vec![node(1, "either", Roman, false, vec![
      node(2, "a bachelor's degree", Numeric, false, vec![]),
      node(3, "or", Numeric, true, vec![]),
      node(4, "equivalent experience", Numeric, false, vec![]),
    ])]))
    .unwrap();

    assert_eq!(labels(&outline.items[0].children), vec![Some("(i)"), None, Some("(ii)")]);
    assert!(outline.items[0].children[1].is_connector);
  }

  #[test]
  fn none_style_has_no_labels() {
    use NumberingStyle::*;
    let outline = build(&rule(vec![node(1, "intro", None, false, vec![node(
      2,
      "detail",
      Numeric,
      false,
      vec![],
    )])]))
    .unwrap();
    assert_eq!(labels(&outline.items), vec![Option::None]);
    assert_eq!(labels(&outline.items[0].children), vec![Option::None]);
  }

  #[test]
  fn pathological_depth_is_rejected() {
    let mut n = node(0, "leaf", NumberingStyle::Numeric, false, vec![]);
    for id in 1..=(MAX_DEPTH as i64 + 1) {
      n = node(id, "level", NumberingStyle::Numeric, false, vec![n]);
    }
    assert!(matches!(build(&rule(vec![n])), Err(Error::TooDeep { .. })));
  }
}
