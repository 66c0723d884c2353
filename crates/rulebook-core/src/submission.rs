//! Client-submitted requirement forests.
//!
//! A submission is a JSON array of nodes; each node may carry the id of an
//! existing requirement, any subset of the mutable fields, and a nested
//! `children` array of the same shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, RequirementId, Result, requirement::RequirementPatch};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmittedNode {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:       Option<RequirementId>,
  #[serde(flatten)]
  pub patch:    RequirementPatch,
  #[serde(default)]
  pub children: Vec<SubmittedNode>,
}

impl SubmittedNode {
  /// A node with no id: always creates a new requirement.
  pub fn new(patch: RequirementPatch) -> Self {
    Self { id: None, patch, children: Vec::new() }
  }

  /// A node referring to an existing requirement.
  pub fn existing(id: RequirementId, patch: RequirementPatch) -> Self {
    Self { id: Some(id), patch, children: Vec::new() }
  }

  pub fn with_children(mut self, children: Vec<SubmittedNode>) -> Self {
    self.children = children;
    self
  }
}

/// Decode a submitted forest from raw JSON.
///
/// The top level must be an array; a single bare object is rejected rather
/// than wrapped, as are non-object elements and mistyped fields.
pub fn parse_forest(value: Value) -> Result<Vec<SubmittedNode>> {
  match value {
    Value::Array(_) => serde_json::from_value(value)
      .map_err(|e| Error::InvalidInput(format!("malformed requirement tree: {e}"))),
    Value::Object(_) => Err(Error::InvalidInput(
      "expected an array of top-level requirements, got a single object".into(),
    )),
    other => Err(Error::InvalidInput(format!(
      "expected an array of top-level requirements, got {}",
      json_type_name(&other)
    ))),
  }
}

fn json_type_name(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
