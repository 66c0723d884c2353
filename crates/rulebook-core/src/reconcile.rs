//! Pure reconciliation planner.
//!
//! Given the persisted forest of a rule and a client submission, [`plan`]
//! works out which rows to keep, update, insert and delete without touching
//! storage. A backend then applies the [`Plan`] inside one transaction and
//! calls [`Plan::materialize`] with the ids it ended up with.
//!
//! Matching is by id across the whole rule, so a node submitted under a
//! different parent is moved rather than duplicated. Every persisted id that
//! appears nowhere in the submission is scheduled for deletion.

use std::collections::{BTreeSet, HashSet};

use crate::{
  Error, RequirementId, Result,
  forest::Forest,
  requirement::{RequirementFields, RequirementNode},
  submission::SubmittedNode,
};

// ─── Plan ────────────────────────────────────────────────────────────────────

/// What to do with one submitted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
  /// Existing row whose fields and parent are unchanged.
  Keep(RequirementId),
  /// Existing row whose fields or parent change.
  Update(RequirementId),
  /// New row.
  Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
  pub action:   StepAction,
  /// Index of the parent step, `None` for roots.
  pub parent:   Option<usize>,
  /// Fully resolved field values after merging the submitted patch.
  pub fields:   RequirementFields,
  pub children: Vec<usize>,
}

impl Step {
  pub fn existing_id(&self) -> Option<RequirementId> {
    match self.action {
      StepAction::Keep(id) | StepAction::Update(id) => Some(id),
      StepAction::Insert => None,
    }
  }
}

/// The outcome of [`plan`].
///
/// `steps` are in depth-first pre-order, so every parent precedes its
/// children and can be applied front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
  pub steps:       Vec<Step>,
  /// Step indices of the submitted roots, in submission order.
  pub roots:       Vec<usize>,
  /// Persisted ids referenced nowhere in the submission.
  pub deletions:   BTreeSet<RequirementId>,
  /// Submitted ids that do not belong to the rule's forest. Their nodes are
  /// planned as inserts; the backend must reject the plan if any of these
  /// ids exists under another rule.
  pub foreign_ids: Vec<RequirementId>,
}

impl Plan {
  pub fn inserts(&self) -> usize {
    self.steps.iter().filter(|s| s.action == StepAction::Insert).count()
  }

  pub fn updates(&self) -> usize {
    self
      .steps
      .iter()
      .filter(|s| matches!(s.action, StepAction::Update(_)))
      .count()
  }

  /// True if applying the plan would not change any row.
  pub fn is_noop(&self) -> bool {
    self.deletions.is_empty()
      && self.steps.iter().all(|s| matches!(s.action, StepAction::Keep(_)))
  }

  /// Resolve the parent id of step `index`, given the ids of all earlier
  /// steps.
  pub fn parent_id(&self, index: usize, ids: &[RequirementId]) -> Option<RequirementId> {
    self.steps[index].parent.map(|p| ids[p])
  }

  /// Build the read model in submission shape.
  ///
  /// `ids[i]` is the persisted id of `steps[i]`.
  pub fn materialize(&self, ids: &[RequirementId]) -> Vec<RequirementNode> {
    debug_assert_eq!(ids.len(), self.steps.len());
    self.roots.iter().map(|&i| self.node(i, ids)).collect()
  }

  fn node(&self, index: usize, ids: &[RequirementId]) -> RequirementNode {
    let step = &self.steps[index];
    RequirementNode {
      id:       ids[index],
      fields:   step.fields.clone(),
      children: step.children.iter().map(|&c| self.node(c, ids)).collect(),
    }
  }
}

// ─── Planner ─────────────────────────────────────────────────────────────────

/// Plan the reconciliation of `submitted` against `existing`.
///
/// Fails with [`Error::InvalidInput`] if the same id is submitted twice.
pub fn plan(existing: &Forest, submitted: &[SubmittedNode]) -> Result<Plan> {
  let mut planner = Planner { existing, plan: Plan::default(), seen: HashSet::new() };

  for node in submitted {
    let index = planner.visit(node, None)?;
    planner.plan.roots.push(index);
  }

  let Planner { mut plan, seen, .. } = planner;
  plan.deletions = existing.ids().filter(|id| !seen.contains(id)).collect();
  Ok(plan)
}

struct Planner<'a> {
  existing: &'a Forest,
  plan:     Plan,
  seen:     HashSet<RequirementId>,
}

impl Planner<'_> {
  fn visit(&mut self, node: &SubmittedNode, parent: Option<usize>) -> Result<usize> {
    let parent_id = parent.and_then(|p| self.plan.steps[p].existing_id());

    let (action, fields) = match node.id {
      Some(id) => {
        if !self.seen.insert(id) {
          return Err(Error::InvalidInput(format!(
            "requirement {id} appears more than once in the submitted tree"
          )));
        }
        match self.existing.get(id) {
          Some(row) => {
            let fields = node.patch.merged_with(&row.fields);
            // A parent that is itself being inserted always counts as a move.
            let same_parent = match parent {
              None => row.parent_id.is_none(),
              Some(_) => parent_id.is_some() && row.parent_id == parent_id,
            };
            let action = if same_parent && fields == row.fields {
              StepAction::Keep(id)
            } else {
              StepAction::Update(id)
            };
            (action, fields)
          }
          None => {
            self.plan.foreign_ids.push(id);
            (StepAction::Insert, node.patch.merged_with(&RequirementFields::default()))
          }
        }
      }
      None => (StepAction::Insert, node.patch.merged_with(&RequirementFields::default())),
    };

    let index = self.plan.steps.len();
    self.plan.steps.push(Step { action, parent, fields, children: Vec::new() });

    for child in &node.children {
      let child_index = self.visit(child, Some(index))?;
      self.plan.steps[index].children.push(child_index);
    }

    Ok(index)
  }
}
