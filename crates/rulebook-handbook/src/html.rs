use std::fmt::Write;

use rulebook_core::course::Course;

use crate::{Outline, OutlineItem, Result};

const STYLE: &str = "body{font-family:Georgia,serif;max-width:48rem;margin:2rem auto;line-height:1.5}\
ol{list-style:none;padding-left:1.5rem}\
.label{display:inline-block;min-width:2.5rem}\
.connector{font-style:italic}\
.meta{color:#555}";

pub(crate) fn render(course: &Course, outlines: &[Outline]) -> Result<String> {
  let mut out = String::new();
  let title = format!("{} {}", escape(&course.code), escape(&course.name));

  writeln!(out, "<!DOCTYPE html>")?;
  writeln!(out, "<html lang=\"en\">")?;
  writeln!(out, "<head>")?;
  writeln!(out, "<meta charset=\"utf-8\">")?;
  writeln!(out, "<title>{title}</title>")?;
  writeln!(out, "<style>{STYLE}</style>")?;
  writeln!(out, "</head>")?;
  writeln!(out, "<body>")?;
  writeln!(out, "<header>")?;
  writeln!(out, "<h1>{title}</h1>")?;
  writeln!(
    out,
    "<p class=\"meta\">{} &middot; version {}</p>",
    escape(course.course_type.into()),
    escape(&course.version),
  )?;
  writeln!(out, "</header>")?;

  for outline in outlines {
    writeln!(out, "<section class=\"rule\">")?;
    writeln!(out, "<h2>{}</h2>", escape(&outline.heading))?;
    if outline.name != outline.heading {
      writeln!(out, "<h3>{}</h3>", escape(&outline.name))?;
    }
    if !outline.description.is_empty() {
      writeln!(out, "<p>{}</p>", escape(&outline.description))?;
    }
    list(&mut out, &outline.items)?;
    writeln!(out, "</section>")?;
  }

  writeln!(out, "</body>")?;
  writeln!(out, "</html>")?;
  Ok(out)
}

fn list(out: &mut String, items: &[OutlineItem]) -> Result<()> {
  if items.is_empty() {
    return Ok(());
  }
  writeln!(out, "<ol>")?;
  for item in items {
    if item.is_connector {
      write!(out, "<li class=\"connector\">{}", escape(&item.content))?;
    } else {
      write!(out, "<li>")?;
      if let Some(label) = &item.label {
        write!(out, "<span class=\"label\">{}</span> ", escape(label))?;
      }
      write!(out, "{}", escape(&item.content))?;
    }
    if !item.children.is_empty() {
      writeln!(out)?;
      list(out, &item.children)?;
    }
    writeln!(out, "</li>")?;
  }
  writeln!(out, "</ol>")?;
  Ok(())
}

fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}
