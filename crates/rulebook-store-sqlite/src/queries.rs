//! Synchronous statements run on the connection thread.
//!
//! Every function takes a plain [`rusqlite::Connection`] so it can run either
//! directly or through the `Deref` of an open [`rusqlite::Transaction`].
//! Callers own the transaction boundary.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, params};
use rulebook_core::{
  CourseId, RequirementId, RuleId,
  course::{Course, NewCourse},
  forest::Forest,
  reconcile::{Plan, StepAction},
  requirement::{NewRequirement, Requirement, RequirementFields},
  rule::Rule,
};

use crate::{
  Result,
  encode::{
    COURSE_COLUMNS, REQUIREMENT_COLUMNS, RULE_COLUMNS, RawCourse, RawRequirement, RawRule,
    encode_dt, encode_style,
  },
};

// ─── Courses ─────────────────────────────────────────────────────────────────

/// Map a UNIQUE violation on `(code, version)` to a domain conflict.
fn course_conflict(err: rusqlite::Error, code: &str, version: &str) -> crate::Error {
  match err {
    rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
      rulebook_core::Error::Conflict(format!(
        "course {code:?} version {version:?} already exists"
      ))
      .into()
    }
    other => other.into(),
  }
}

pub fn insert_course(conn: &Connection, input: &NewCourse, now: DateTime<Utc>) -> Result<Course> {
  let at = encode_dt(now);
  conn
    .execute(
      "INSERT INTO courses (code, name, course_type, version, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
      params![input.code, input.name, input.course_type.to_string(), input.version, at],
    )
    .map_err(|e| course_conflict(e, &input.code, &input.version))?;

  Ok(Course {
    id:          CourseId(conn.last_insert_rowid()),
    code:        input.code.clone(),
    name:        input.name.clone(),
    course_type: input.course_type,
    version:     input.version.clone(),
    created_at:  now,
    updated_at:  now,
  })
}

pub fn find_course(conn: &Connection, id: CourseId) -> Result<Option<Course>> {
  let raw = conn
    .query_row(
      &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"),
      params![id.get()],
      RawCourse::from_row,
    )
    .optional()?;
  raw.map(RawCourse::into_course).transpose()
}

pub fn require_course(conn: &Connection, id: CourseId) -> Result<Course> {
  find_course(conn, id)?.ok_or_else(|| rulebook_core::Error::CourseNotFound(id).into())
}

pub fn all_courses(conn: &Connection) -> Result<Vec<Course>> {
  let mut stmt =
    conn.prepare(&format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY code, version"))?;
  let raws = stmt
    .query_map([], RawCourse::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawCourse::into_course).collect()
}

pub fn write_course(conn: &Connection, course: &Course) -> Result<()> {
  conn
    .execute(
      "UPDATE courses
          SET code = ?2, name = ?3, course_type = ?4, version = ?5, updated_at = ?6
        WHERE id = ?1",
      params![
        course.id.get(),
        course.code,
        course.name,
        course.course_type.to_string(),
        course.version,
        encode_dt(course.updated_at),
      ],
    )
    .map_err(|e| course_conflict(e, &course.code, &course.version))?;
  Ok(())
}

// ─── Rules ───────────────────────────────────────────────────────────────────

pub fn find_rule(conn: &Connection, course: CourseId, rule: RuleId) -> Result<Option<Rule>> {
  let raw = conn
    .query_row(
      &format!("SELECT {RULE_COLUMNS} FROM rules WHERE id = ?1 AND course_id = ?2"),
      params![rule.get(), course.get()],
      RawRule::from_row,
    )
    .optional()?;
  raw.map(RawRule::into_rule).transpose()
}

/// Scope check run before any requirement operation.
pub fn require_rule(conn: &Connection, course: CourseId, rule: RuleId) -> Result<Rule> {
  find_rule(conn, course, rule)?
    .ok_or_else(|| rulebook_core::Error::RuleNotFound { course, rule }.into())
}

pub fn rules_of_course(conn: &Connection, course: CourseId) -> Result<Vec<Rule>> {
  let mut stmt =
    conn.prepare(&format!("SELECT {RULE_COLUMNS} FROM rules WHERE course_id = ?1 ORDER BY id"))?;
  let raws = stmt
    .query_map(params![course.get()], RawRule::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawRule::into_rule).collect()
}

pub fn insert_rule(
  conn: &Connection,
  course: CourseId,
  name: &str,
  rule_type: &str,
  description: &str,
  now: DateTime<Utc>,
) -> Result<RuleId> {
  conn.execute(
    "INSERT INTO rules (course_id, name, rule_type, description, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    params![course.get(), name, rule_type, description, encode_dt(now)],
  )?;
  Ok(RuleId(conn.last_insert_rowid()))
}

pub fn write_rule(conn: &Connection, rule: &Rule) -> Result<()> {
  conn.execute(
    "UPDATE rules SET name = ?2, rule_type = ?3, description = ?4, updated_at = ?5
      WHERE id = ?1",
    params![
      rule.id.get(),
      rule.name,
      rule.rule_type.to_string(),
      rule.description,
      encode_dt(rule.updated_at),
    ],
  )?;
  Ok(())
}

// ─── Requirements: reads ─────────────────────────────────────────────────────

/// Every requirement of `rule` in one query, ordered by `order_index`, id.
pub fn rule_rows(conn: &Connection, rule: RuleId) -> Result<Vec<Requirement>> {
  let mut stmt = conn.prepare_cached(&format!(
    "SELECT {REQUIREMENT_COLUMNS} FROM requirements
      WHERE rule_id = ?1
      ORDER BY order_index, id"
  ))?;
  let raws = stmt
    .query_map(params![rule.get()], RawRequirement::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawRequirement::into_requirement).collect()
}

pub fn load_forest(conn: &Connection, rule: RuleId) -> Result<Forest> {
  Ok(Forest::from_rows(rule_rows(conn, rule)?))
}

pub fn find_requirement(
  conn: &Connection,
  rule: RuleId,
  id: RequirementId,
) -> Result<Option<Requirement>> {
  let raw = conn
    .query_row(
      &format!("SELECT {REQUIREMENT_COLUMNS} FROM requirements WHERE id = ?1 AND rule_id = ?2"),
      params![id.get(), rule.get()],
      RawRequirement::from_row,
    )
    .optional()?;
  raw.map(RawRequirement::into_requirement).transpose()
}

pub fn require_requirement(
  conn: &Connection,
  rule: RuleId,
  id: RequirementId,
) -> Result<Requirement> {
  find_requirement(conn, rule, id)?.ok_or_else(|| {
    rulebook_core::Error::RequirementNotFound { rule, requirement: id }.into()
  })
}

pub fn children_rows(
  conn: &Connection,
  rule: RuleId,
  parent: RequirementId,
) -> Result<Vec<Requirement>> {
  let mut stmt = conn.prepare_cached(&format!(
    "SELECT {REQUIREMENT_COLUMNS} FROM requirements
      WHERE rule_id = ?1 AND parent_id = ?2
      ORDER BY order_index, id"
  ))?;
  let raws = stmt
    .query_map(params![rule.get(), parent.get()], RawRequirement::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawRequirement::into_requirement).collect()
}

/// Number of rows in the subtree rooted at `id`, including `id` itself.
pub fn subtree_size(conn: &Connection, id: RequirementId) -> Result<usize> {
  let n: i64 = conn.query_row(
    "WITH RECURSIVE sub(id) AS (
       SELECT ?1
       UNION ALL
       SELECT r.id FROM requirements r JOIN sub ON r.parent_id = sub.id
     )
     SELECT count(*) FROM sub",
    params![id.get()],
    |r| r.get(0),
  )?;
  Ok(n as usize)
}

/// The first of `ids` that exists under a rule other than `rule`.
pub fn first_foreign(
  conn: &Connection,
  rule: RuleId,
  ids: &[RequirementId],
) -> Result<Option<(RequirementId, RuleId)>> {
  let mut stmt =
    conn.prepare_cached("SELECT rule_id FROM requirements WHERE id = ?1 AND rule_id != ?2")?;
  for &id in ids {
    let owner: Option<i64> = stmt
      .query_row(params![id.get(), rule.get()], |r| r.get(0))
      .optional()?;
    if let Some(owner) = owner {
      return Ok(Some((id, RuleId(owner))));
    }
  }
  Ok(None)
}

// ─── Requirements: writes ────────────────────────────────────────────────────

pub fn insert_requirement(
  conn: &Connection,
  rule: RuleId,
  parent: Option<RequirementId>,
  fields: &RequirementFields,
) -> Result<RequirementId> {
  let mut stmt = conn.prepare_cached(
    "INSERT INTO requirements (rule_id, parent_id, content, style, is_connector, order_index)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )?;
  stmt.execute(params![
    rule.get(),
    parent.map(RequirementId::get),
    fields.content,
    encode_style(fields.style),
    fields.is_connector,
    fields.order_index,
  ])?;
  Ok(RequirementId(conn.last_insert_rowid()))
}

/// Insert `node` and its nested children, parents first. Returns the ids in
/// the same pre-order as the input.
pub fn insert_subtree(
  conn: &Connection,
  rule: RuleId,
  parent: Option<RequirementId>,
  node: &NewRequirement,
  ids: &mut Vec<RequirementId>,
) -> Result<RequirementId> {
  let id = insert_requirement(conn, rule, parent, &node.fields)?;
  ids.push(id);
  for child in &node.children {
    insert_subtree(conn, rule, Some(id), child, ids)?;
  }
  Ok(id)
}

pub fn update_requirement(
  conn: &Connection,
  rule: RuleId,
  id: RequirementId,
  parent: Option<RequirementId>,
  fields: &RequirementFields,
) -> Result<()> {
  let mut stmt = conn.prepare_cached(
    "UPDATE requirements
        SET parent_id = ?3, content = ?4, style = ?5, is_connector = ?6, order_index = ?7
      WHERE id = ?1 AND rule_id = ?2",
  )?;
  stmt.execute(params![
    id.get(),
    rule.get(),
    parent.map(RequirementId::get),
    fields.content,
    encode_style(fields.style),
    fields.is_connector,
    fields.order_index,
  ])?;
  Ok(())
}

/// Delete `id`; the `ON DELETE CASCADE` on `parent_id` removes its subtree.
pub fn delete_requirement(conn: &Connection, rule: RuleId, id: RequirementId) -> Result<usize> {
  let mut stmt =
    conn.prepare_cached("DELETE FROM requirements WHERE id = ?1 AND rule_id = ?2")?;
  Ok(stmt.execute(params![id.get(), rule.get()])?)
}

/// Apply a reconciliation plan. Returns the persisted id of every step.
///
/// Updates and inserts run before any delete, so a node re-parented away
/// from a deleted ancestor is never caught by the cascade.
pub fn apply_plan(conn: &Connection, rule: RuleId, plan: &Plan) -> Result<Vec<RequirementId>> {
  let mut ids = Vec::with_capacity(plan.steps.len());
  for (index, step) in plan.steps.iter().enumerate() {
    let parent = plan.parent_id(index, &ids);
    let id = match step.action {
      StepAction::Keep(id) => id,
      StepAction::Update(id) => {
        update_requirement(conn, rule, id, parent, &step.fields)?;
        id
      }
      StepAction::Insert => insert_requirement(conn, rule, parent, &step.fields)?,
    };
    ids.push(id);
  }

  for &id in &plan.deletions {
    delete_requirement(conn, rule, id)?;
  }

  Ok(ids)
}
