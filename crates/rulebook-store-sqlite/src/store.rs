//! [`SqliteStore`]: the SQLite implementation of [`RuleStore`].

use std::path::Path;

use chrono::Utc;
use rulebook_core::{
  CourseId, RequirementId, RuleId,
  course::{Course, CoursePatch, NewCourse},
  reconcile,
  requirement::{NewRequirement, Requirement, RequirementFields, RequirementNode},
  rule::{NewRule, Rule, RulePatch, RuleWithRequirements},
  store::RuleStore,
  submission::SubmittedNode,
};
use tracing::{debug, info};

use crate::{Error, Result, queries, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rulebook store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection handle is reference-counted and
/// every call is serialised onto one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` against the connection outside of an explicit transaction.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside one transaction.
  ///
  /// The transaction commits only if `f` succeeds; on any error it is
  /// dropped, which rolls back every statement `f` issued.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(in_transaction(conn, f))).await?
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Run raw SQL outside the store API, e.g. to install a trigger.
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn in_transaction<T>(
  conn: &mut rusqlite::Connection,
  f: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
) -> Result<T> {
  let tx = conn.transaction()?;
  let out = f(&tx)?;
  tx.commit()?;
  Ok(out)
}

// ─── RuleStore impl ──────────────────────────────────────────────────────────

impl RuleStore for SqliteStore {
  type Error = Error;

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn create_course(&self, input: NewCourse) -> Result<Course> {
    let now = Utc::now();
    let course = self.write(move |tx| queries::insert_course(tx, &input, now)).await?;
    info!(course = %course.id, code = %course.code, "created course");
    Ok(course)
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    self.read(queries::all_courses).await
  }

  async fn get_course(&self, id: CourseId) -> Result<Option<Course>> {
    self.read(move |conn| queries::find_course(conn, id)).await
  }

  async fn update_course(&self, id: CourseId, patch: CoursePatch) -> Result<Course> {
    let now = Utc::now();
    self
      .write(move |tx| {
        let mut course = queries::require_course(tx, id)?;
        patch.apply_to(&mut course);
        course.updated_at = now;
        queries::write_course(tx, &course)?;
        Ok(course)
      })
      .await
  }

  async fn delete_course(&self, id: CourseId) -> Result<()> {
    self
      .write(move |tx| {
        let n = tx.execute("DELETE FROM courses WHERE id = ?1", rusqlite::params![id.get()])?;
        if n == 0 {
          return Err(rulebook_core::Error::CourseNotFound(id).into());
        }
        Ok(())
      })
      .await?;
    info!(course = %id, "deleted course");
    Ok(())
  }

  // ── Rules ─────────────────────────────────────────────────────────────────

  async fn create_rule(&self, course: CourseId, input: NewRule) -> Result<RuleWithRequirements> {
    let now = Utc::now();
    let created = self
      .write(move |tx| {
        queries::require_course(tx, course)?;
        let id = queries::insert_rule(
          tx,
          course,
          &input.name,
          &input.rule_type.to_string(),
          &input.description,
          now,
        )?;
        let mut ids = Vec::new();
        for node in &input.requirements {
          queries::insert_subtree(tx, id, None, node, &mut ids)?;
        }
        let rule = queries::require_rule(tx, course, id)?;
        let requirements = queries::load_forest(tx, id)?.to_nodes();
        Ok(RuleWithRequirements { rule, requirements })
      })
      .await?;
    info!(course = %course, rule = %created.rule.id, "created rule");
    Ok(created)
  }

  async fn list_rules(&self, course: CourseId) -> Result<Vec<Rule>> {
    self
      .read(move |conn| {
        queries::require_course(conn, course)?;
        queries::rules_of_course(conn, course)
      })
      .await
  }

  async fn get_rule(&self, course: CourseId, rule: RuleId) -> Result<Option<RuleWithRequirements>> {
    self
      .read(move |conn| {
        let Some(found) = queries::find_rule(conn, course, rule)? else {
          return Ok(None);
        };
        let requirements = queries::load_forest(conn, rule)?.to_nodes();
        Ok(Some(RuleWithRequirements { rule: found, requirements }))
      })
      .await
  }

  async fn update_rule(&self, course: CourseId, rule: RuleId, patch: RulePatch) -> Result<Rule> {
    let now = Utc::now();
    self
      .write(move |tx| {
        let mut found = queries::require_rule(tx, course, rule)?;
        patch.apply_to(&mut found);
        found.updated_at = now;
        queries::write_rule(tx, &found)?;
        Ok(found)
      })
      .await
  }

  async fn delete_rule(&self, course: CourseId, rule: RuleId) -> Result<()> {
    self
      .write(move |tx| {
        queries::require_rule(tx, course, rule)?;
        tx.execute("DELETE FROM rules WHERE id = ?1", rusqlite::params![rule.get()])?;
        Ok(())
      })
      .await?;
    info!(course = %course, rule = %rule, "deleted rule");
    Ok(())
  }

  // ── Requirements ──────────────────────────────────────────────────────────

  async fn list_forest(&self, course: CourseId, rule: RuleId) -> Result<Vec<RequirementNode>> {
    self
      .read(move |conn| {
        queries::require_rule(conn, course, rule)?;
        Ok(queries::load_forest(conn, rule)?.to_nodes())
      })
      .await
  }

  async fn reconcile(
    &self,
    course: CourseId,
    rule: RuleId,
    submitted: Vec<SubmittedNode>,
  ) -> Result<Vec<RequirementNode>> {
    let nodes = self
      .write(move |tx| {
        queries::require_rule(tx, course, rule)?;

        let existing = queries::load_forest(tx, rule)?;
        let plan = reconcile::plan(&existing, &submitted)?;

        if let Some((id, owner)) = queries::first_foreign(tx, rule, &plan.foreign_ids)? {
          return Err(
            rulebook_core::Error::InvalidInput(format!(
              "requirement {id} belongs to rule {owner}, not rule {rule}"
            ))
            .into(),
          );
        }

        debug!(
          rule = %rule,
          existing = existing.len(),
          inserts = plan.inserts(),
          updates = plan.updates(),
          deletions = plan.deletions.len(),
          "applying reconciliation plan"
        );

        let ids = queries::apply_plan(tx, rule, &plan)?;
        Ok(plan.materialize(&ids))
      })
      .await?;

    info!(course = %course, rule = %rule, roots = nodes.len(), "reconciled requirements");
    Ok(nodes)
  }

  async fn create_requirement(
    &self,
    course: CourseId,
    rule: RuleId,
    input: NewRequirement,
  ) -> Result<RequirementNode> {
    let node = self
      .write(move |tx| {
        queries::require_rule(tx, course, rule)?;
        let root = queries::insert_subtree(tx, rule, None, &input, &mut Vec::new())?;
        let forest = queries::load_forest(tx, rule)?;
        forest
          .to_nodes()
          .into_iter()
          .find(|n| n.id == root)
          .ok_or_else(|| rulebook_core::Error::RequirementNotFound { rule, requirement: root }.into())
      })
      .await?;
    info!(rule = %rule, requirement = %node.id, size = node.subtree_len(), "created requirement");
    Ok(node)
  }

  async fn add_child(
    &self,
    course: CourseId,
    rule: RuleId,
    parent: RequirementId,
    fields: RequirementFields,
  ) -> Result<Requirement> {
    let child = self
      .write(move |tx| {
        queries::require_rule(tx, course, rule)?;
        queries::require_requirement(tx, rule, parent)?;
        let id = queries::insert_requirement(tx, rule, Some(parent), &fields)?;
        Ok(Requirement { id, rule_id: rule, parent_id: Some(parent), fields })
      })
      .await?;
    info!(rule = %rule, parent = %parent, requirement = %child.id, "added child requirement");
    Ok(child)
  }

  async fn list_children(
    &self,
    course: CourseId,
    rule: RuleId,
    parent: RequirementId,
  ) -> Result<Vec<Requirement>> {
    self
      .read(move |conn| {
        queries::require_rule(conn, course, rule)?;
        queries::require_requirement(conn, rule, parent)?;
        queries::children_rows(conn, rule, parent)
      })
      .await
  }

  async fn remove_node(&self, course: CourseId, rule: RuleId, id: RequirementId) -> Result<()> {
    let removed = self
      .write(move |tx| {
        queries::require_rule(tx, course, rule)?;
        queries::require_requirement(tx, rule, id)?;
        let size = queries::subtree_size(tx, id)?;
        queries::delete_requirement(tx, rule, id)?;
        Ok(size)
      })
      .await?;
    info!(rule = %rule, requirement = %id, removed, "removed requirement subtree");
    Ok(())
  }
}
