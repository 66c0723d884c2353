//! `rulebook`: command-line client for a Rulebook server.
//!
//! # Usage
//!
//! ```text
//! rulebook --url http://localhost:8080 --user registrar --password secret courses
//! rulebook --config ~/.config/rulebook/config.toml tree 1 4
//! rulebook push 1 4 admission.json
//! rulebook handbook 1 --format html --output handbook.html
//! ```

mod client;
mod tree;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client::{ApiClient, ApiConfig};
use rulebook_core::{CourseId, RuleId, submission::parse_forest};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rulebook", about = "Command-line client for the Rulebook course rules server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rulebook server (default: http://localhost:8080).
  #[arg(long, env = "RULEBOOK_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "RULEBOOK_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "RULEBOOK_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all courses.
  Courses,
  /// List the rules of a course.
  Rules { course: i64 },
  /// Print a rule's numbered requirement tree.
  Tree { course: i64, rule: i64 },
  /// Replace a rule's requirement forest with the JSON array in FILE.
  Push {
    course: i64,
    rule:   i64,
    #[arg(value_name = "FILE")]
    file:   PathBuf,
  },
  /// Download a course handbook.
  Handbook {
    course: i64,
    #[arg(long, value_enum, default_value_t = Format::Txt)]
    format: Format,
    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
  Html,
  Txt,
}

impl Format {
  fn extension(self) -> &'static str {
    match self {
      Format::Html => "html",
      Format::Txt => "txt",
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// CLI flags override the config file, which overrides defaults.
fn resolve(args: &Args, file_cfg: ConfigFile) -> ApiConfig {
  let pick = |flag: &Option<String>, file: String| {
    flag.clone().or_else(|| (!file.is_empty()).then_some(file))
  };
  ApiConfig {
    base_url: pick(&args.url, file_cfg.url).unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(&args.user, file_cfg.username).unwrap_or_default(),
    password: pick(&args.password, file_cfg.password).unwrap_or_default(),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve(&args, file_cfg))?;

  match args.command {
    Command::Courses => {
      for c in client.list_courses().await? {
        println!("{:>4}  {:<10} {:<8} {}  [{}]", c.id.get(), c.code, c.version, c.name, c.course_type);
      }
    }
    Command::Rules { course } => {
      for r in client.list_rules(CourseId(course)).await? {
        println!("{:>4}  {:<36} {}", r.id.get(), r.rule_type.heading(), r.name);
      }
    }
    Command::Tree { course, rule } => {
      let rule = client.get_rule(CourseId(course), RuleId(rule)).await?;
      let outline = rulebook_handbook::build_outline(&rule)?;
      print!("{}", tree::format(&outline));
    }
    Command::Push { course, rule, file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let body: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
      // Reject obviously malformed trees before touching the server.
      let submitted = parse_forest(body.clone())?;
      tracing::info!(nodes = submitted.len(), "pushing forest");

      let (course, rule) = (CourseId(course), RuleId(rule));
      client.reconcile(course, rule, &body).await?;
      let stored = client.get_rule(course, rule).await?;
      print!("{}", tree::format(&rulebook_handbook::build_outline(&stored)?));
    }
    Command::Handbook { course, format, output } => {
      let document = client.handbook(CourseId(course), format.extension()).await?;
      match output {
        Some(path) => std::fs::write(&path, document)
          .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{document}"),
      }
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_config_file() {
    let args = Args::parse_from(["rulebook", "--user", "cli-user", "courses"]);
    let cfg = resolve(&args, ConfigFile {
      url:      "http://rules.example.edu".into(),
      username: "file-user".into(),
      password: "file-pass".into(),
    });
    assert_eq!(cfg.base_url, "http://rules.example.edu");
    assert_eq!(cfg.username, "cli-user");
    assert_eq!(cfg.password, "file-pass");
  }

  #[test]
  fn empty_config_falls_back_to_localhost() {
    let args = Args::parse_from(["rulebook", "--url", "http://h:1", "rules", "3"]);
    let cfg = resolve(&args, ConfigFile::default());
    assert_eq!(cfg.base_url, "http://h:1");
    assert!(matches!(args.command, Command::Rules { course: 3 }));
  }

  #[test]
  fn handbook_format_defaults_to_text() {
    let args = Args::parse_from(["rulebook", "--url", "http://h:1", "handbook", "7"]);
    match args.command {
      Command::Handbook { course, format, output } => {
        assert_eq!(course, 7);
        assert_eq!(format.extension(), "txt");
        assert!(output.is_none());
      }
      other => panic!("unexpected command {other:?}"),
    }
  }
}
