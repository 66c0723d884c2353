//! Requirement nodes: the clauses that make up a rule.
//!
//! A requirement row carries a nullable parent link and a sibling order
//! index; the tree shape is derived on read (see [`crate::forest`]).

use serde::{Deserialize, Serialize};

use crate::{RequirementId, RuleId};

// ─── Numbering style ─────────────────────────────────────────────────────────

/// How a node's children are numbered when rendered. Never used for
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingStyle {
  #[default]
  Numeric,
  Alphabetic,
  Roman,
  None,
}

// ─── Stored row ──────────────────────────────────────────────────────────────

/// A single persisted requirement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
  pub id:        RequirementId,
  /// Immutable after creation.
  pub rule_id:   RuleId,
  /// `None` for roots of the rule's forest.
  pub parent_id: Option<RequirementId>,
  #[serde(flatten)]
  pub fields:    RequirementFields,
}

/// The mutable part of a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementFields {
  pub content:      String,
  pub style:        NumberingStyle,
  pub is_connector: bool,
  pub order_index:  i64,
}

/// Partially specified fields, as submitted by a client during
/// reconciliation. Absent fields keep their persisted value (or take the
/// default for a new node).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequirementPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub style:        Option<NumberingStyle>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_connector: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order_index:  Option<i64>,
}

impl RequirementPatch {
  /// Overlay this patch on `base`, returning the merged fields.
  pub fn merged_with(&self, base: &RequirementFields) -> RequirementFields {
    RequirementFields {
      content:      self.content.clone().unwrap_or_else(|| base.content.clone()),
      style:        self.style.unwrap_or(base.style),
      is_connector: self.is_connector.unwrap_or(base.is_connector),
      order_index:  self.order_index.unwrap_or(base.order_index),
    }
  }
}

impl From<RequirementFields> for RequirementPatch {
  fn from(f: RequirementFields) -> Self {
    Self {
      content:      Some(f.content),
      style:        Some(f.style),
      is_connector: Some(f.is_connector),
      order_index:  Some(f.order_index),
    }
  }
}

// ─── Creation input ──────────────────────────────────────────────────────────

/// A new requirement with an optional nested subtree, used when creating a
/// rule or a root requirement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewRequirement {
  #[serde(flatten)]
  pub fields:   RequirementFields,
  #[serde(default)]
  pub children: Vec<NewRequirement>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A requirement as returned to clients: the parent and rule links are
/// implied by position and never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementNode {
  pub id:       RequirementId,
  #[serde(flatten)]
  pub fields:   RequirementFields,
  pub children: Vec<RequirementNode>,
}

impl RequirementNode {
  /// Total number of nodes in this subtree, including `self`.
  pub fn subtree_len(&self) -> usize {
    1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
  }
}

/// A single row as a childless node.
impl From<Requirement> for RequirementNode {
  fn from(row: Requirement) -> Self {
    RequirementNode {
      id:       row.id,
      fields:   row.fields,
      children: Vec::new(),
    }
  }
}
