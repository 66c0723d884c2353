//! SQL schema for the Rulebook SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS courses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    code         TEXT NOT NULL,
    name         TEXT NOT NULL,
    course_type  TEXT NOT NULL,
    version      TEXT NOT NULL,
    created_at   TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at   TEXT NOT NULL,
    UNIQUE (code, version)
);

CREATE TABLE IF NOT EXISTS rules (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id    INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    rule_type    TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- Requirements form a forest per rule through parent_id. Deleting a row
-- removes its whole subtree.
CREATE TABLE IF NOT EXISTS requirements (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    rule_id      INTEGER NOT NULL REFERENCES rules(id) ON DELETE CASCADE,
    parent_id    INTEGER REFERENCES requirements(id) ON DELETE CASCADE,
    content      TEXT NOT NULL DEFAULT '',
    style        TEXT NOT NULL DEFAULT 'numeric'
                 CHECK (style IN ('numeric', 'alphabetic', 'roman', 'none')),
    is_connector INTEGER NOT NULL DEFAULT 0,
    order_index  INTEGER NOT NULL DEFAULT 0,
    CHECK (parent_id IS NULL OR parent_id != id)
);

CREATE INDEX IF NOT EXISTS rules_course_idx        ON rules(course_id);
CREATE INDEX IF NOT EXISTS requirements_rule_idx   ON requirements(rule_id, order_index);
CREATE INDEX IF NOT EXISTS requirements_parent_idx ON requirements(parent_id);

PRAGMA user_version = 1;
";
