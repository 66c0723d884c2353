use std::fmt::Write;

use rulebook_core::course::Course;

use crate::{Outline, OutlineItem, Result};

const INDENT: &str = "  ";

pub(crate) fn render(course: &Course, outlines: &[Outline]) -> Result<String> {
  let mut out = String::new();
  let title = format!("{} {}", course.code, course.name);
  writeln!(out, "{title}")?;
  writeln!(out, "{} - version {}", course.course_type, course.version)?;
  writeln!(out, "{}", "=".repeat(title.chars().count()))?;

  for outline in outlines {
    writeln!(out)?;
    if outline.name == outline.heading {
      writeln!(out, "{}", outline.heading)?;
    } else {
      writeln!(out, "{}: {}", outline.heading, outline.name)?;
    }
    if !outline.description.is_empty() {
      writeln!(out, "{}", outline.description)?;
    }
    items(&mut out, &outline.items)?;
  }
  Ok(out)
}

fn items(out: &mut String, items: &[OutlineItem]) -> Result<()> {
  for item in items {
    let indent = INDENT.repeat(item.depth);
    match &item.label {
      Some(label) => writeln!(out, "{indent}{label} {}", item.content)?,
      None => writeln!(out, "{indent}{}", item.content)?,
    }
    self::items(out, &item.children)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use rulebook_core::{
    CourseId,
    course::CourseType,
    requirement::NumberingStyle::{Numeric, Roman},
  };

  use super::*;
  use crate::outline::{
    build,
    tests::{node, rule},
  };

  #[test]
  fn renders_indented_outline() {
    let now = Utc::now();
    let course = Course {
      id:          CourseId(7),
      code:        "MIT".into(),
      name:        "Master of IT".into(),
      course_type: CourseType::MastersCoursework,
      version:     "2025".into(),
      created_at:  now,
      updated_at:  now,
    };
    let outline = build(&rule(vec![
      node(1, "complete all of", Roman, false, vec![
        node(2, "core units", Numeric, false, vec![]),
        node(3, "and", Numeric, true, vec![]),
        node(4, "a capstone", Numeric, false, vec![]),
      ]),
      node(5, "maintain a GPA of 4.0", Numeric, false, vec![]),
    ]))
    .unwrap();

    let text = render(&course, &[outline]).unwrap();
    let expected = "\
MIT Master of IT
Master's (Coursework) - version 2025
================

Admissions: Admission requirements
To be considered for admission
  i complete all of
    (i) core units
    and
    (ii) a capstone
  2 maintain a GPA of 4.0
";
    assert_eq!(text, expected);
  }
}
