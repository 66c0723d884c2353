//! Core types and trait definitions for the Rulebook course-rule store.
//!
//! This crate is free of HTTP and database dependencies. It owns the domain
//! model (courses, rules, requirement forests), the pure reconciliation
//! planner, and the [`store::RuleStore`] abstraction that backends implement.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod course;
pub mod error;
pub mod forest;
pub mod id;
pub mod reconcile;
pub mod requirement;
pub mod rule;
pub mod store;
pub mod submission;

pub use error::{Classify, Error, ErrorKind, Result};
pub use id::{CourseId, RequirementId, RuleId};
