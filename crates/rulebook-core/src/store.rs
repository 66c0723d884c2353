//! The `RuleStore` trait.
//!
//! Implemented by storage backends (e.g. `rulebook-store-sqlite`). The HTTP
//! layer and the handbook routes depend on this abstraction, not on any
//! concrete backend.
//!
//! Every rule and requirement operation takes the owning course id and fails
//! with a not-found error when the rule is not part of that course. Mutating
//! operations are atomic: either every row change lands or none does.

use std::future::Future;

use crate::{
  Classify, CourseId, RequirementId, RuleId,
  course::{Course, CoursePatch, NewCourse},
  requirement::{NewRequirement, Requirement, RequirementFields, RequirementNode},
  rule::{NewRule, Rule, RulePatch, RuleWithRequirements},
  submission::SubmittedNode,
};

/// Abstraction over a Rulebook storage backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait RuleStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Courses ───────────────────────────────────────────────────────────

  /// Persist a new course. A duplicate `(code, version)` is a conflict.
  fn create_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  fn list_courses(&self) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Returns `None` if the course does not exist.
  fn get_course(
    &self,
    id: CourseId,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  fn update_course(
    &self,
    id: CourseId,
    patch: CoursePatch,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Delete a course together with its rules and their requirements.
  fn delete_course(&self, id: CourseId) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Rules ─────────────────────────────────────────────────────────────

  /// Create a rule and seed its forest from `input.requirements`.
  fn create_rule(
    &self,
    course: CourseId,
    input: NewRule,
  ) -> impl Future<Output = Result<RuleWithRequirements, Self::Error>> + Send + '_;

  fn list_rules(
    &self,
    course: CourseId,
  ) -> impl Future<Output = Result<Vec<Rule>, Self::Error>> + Send + '_;

  /// The rule plus its assembled forest; `None` if it is not in `course`.
  fn get_rule(
    &self,
    course: CourseId,
    rule: RuleId,
  ) -> impl Future<Output = Result<Option<RuleWithRequirements>, Self::Error>> + Send + '_;

  fn update_rule(
    &self,
    course: CourseId,
    rule: RuleId,
    patch: RulePatch,
  ) -> impl Future<Output = Result<Rule, Self::Error>> + Send + '_;

  fn delete_rule(
    &self,
    course: CourseId,
    rule: RuleId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Requirements ──────────────────────────────────────────────────────

  /// The rule's forest, siblings ordered by `order_index` then id.
  fn list_forest(
    &self,
    course: CourseId,
    rule: RuleId,
  ) -> impl Future<Output = Result<Vec<RequirementNode>, Self::Error>> + Send + '_;

  /// Make the rule's persisted forest match `submitted` and return it in
  /// submission shape (see [`crate::reconcile`]).
  fn reconcile(
    &self,
    course: CourseId,
    rule: RuleId,
    submitted: Vec<SubmittedNode>,
  ) -> impl Future<Output = Result<Vec<RequirementNode>, Self::Error>> + Send + '_;

  /// Insert a new root requirement with its nested children.
  fn create_requirement(
    &self,
    course: CourseId,
    rule: RuleId,
    input: NewRequirement,
  ) -> impl Future<Output = Result<RequirementNode, Self::Error>> + Send + '_;

  /// Insert one requirement under `parent`, which must belong to the rule.
  fn add_child(
    &self,
    course: CourseId,
    rule: RuleId,
    parent: RequirementId,
    fields: RequirementFields,
  ) -> impl Future<Output = Result<Requirement, Self::Error>> + Send + '_;

  /// Direct children of `parent`, ordered by `order_index` then id.
  fn list_children(
    &self,
    course: CourseId,
    rule: RuleId,
    parent: RequirementId,
  ) -> impl Future<Output = Result<Vec<Requirement>, Self::Error>> + Send + '_;

  /// Delete a requirement and, through the storage cascade, its subtree.
  fn remove_node(
    &self,
    course: CourseId,
    rule: RuleId,
    id: RequirementId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
