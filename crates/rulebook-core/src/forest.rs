//! Arena representation of one rule's requirement forest.
//!
//! Rows are stored by id; parent links stay as ids into the arena and the
//! child lists are derived once at construction. Siblings are ordered by
//! `order_index`, ties broken by ascending id.

use std::collections::HashMap;

use crate::{
  RequirementId,
  requirement::{Requirement, RequirementNode},
};

#[derive(Debug, Clone, Default)]
pub struct Forest {
  nodes:    HashMap<RequirementId, Requirement>,
  children: HashMap<RequirementId, Vec<RequirementId>>,
  roots:    Vec<RequirementId>,
}

impl Forest {
  /// Build the arena from rows in any order.
  ///
  /// A row whose parent is missing from `rows` is treated as a root.
  pub fn from_rows(rows: impl IntoIterator<Item = Requirement>) -> Self {
    let nodes: HashMap<RequirementId, Requirement> =
      rows.into_iter().map(|r| (r.id, r)).collect();

    let mut children: HashMap<RequirementId, Vec<RequirementId>> = HashMap::new();
    let mut roots = Vec::new();
    for row in nodes.values() {
      match row.parent_id.filter(|p| nodes.contains_key(p)) {
        Some(parent) => children.entry(parent).or_default().push(row.id),
        None => roots.push(row.id),
      }
    }

    let sort_key = |id: &RequirementId| (nodes[id].fields.order_index, *id);
    roots.sort_by_key(sort_key);
    for siblings in children.values_mut() {
      siblings.sort_by_key(sort_key);
    }

    Self { nodes, children, roots }
  }

  pub fn len(&self) -> usize { self.nodes.len() }

  pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

  pub fn get(&self, id: RequirementId) -> Option<&Requirement> { self.nodes.get(&id) }

  pub fn contains(&self, id: RequirementId) -> bool { self.nodes.contains_key(&id) }

  pub fn ids(&self) -> impl Iterator<Item = RequirementId> + '_ {
    self.nodes.keys().copied()
  }

  pub fn roots(&self) -> &[RequirementId] { &self.roots }

  pub fn children_of(&self, id: RequirementId) -> &[RequirementId] {
    self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
  }

  /// `id` and every node below it, parents before children.
  pub fn subtree(&self, id: RequirementId) -> Vec<RequirementId> {
    if !self.contains(id) {
      return Vec::new();
    }
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(next) = stack.pop() {
      out.push(next);
      stack.extend(self.children_of(next).iter().rev().copied());
    }
    out
  }

  /// Assemble the nested read model.
  ///
  /// Only nodes reachable from a root are emitted, so a corrupted parent
  /// cycle can never recurse forever.
  pub fn to_nodes(&self) -> Vec<RequirementNode> {
    self.roots.iter().map(|&id| self.node(id)).collect()
  }

  fn node(&self, id: RequirementId) -> RequirementNode {
    RequirementNode {
      id,
      fields: self.nodes[&id].fields.clone(),
      children: self.children_of(id).iter().map(|&c| self.node(c)).collect(),
    }
  }
}
