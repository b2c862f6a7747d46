//! Migration artifacts extracted from panel outputs
//!
//! Payloads are opaque JSON. An artifact is recognized when it is:
//! - an object whose `kind` or `type` is `"migration"`, or
//! - an element of a `migrations` array (object or plain SQL string).
//!
//! Object artifacts take their text from the `sql`, `up` and `content`
//! fields. Safeguards come from a `backup` field, `confirmed: true`, or an
//! annotation comment on its own line:
//!
//! ```sql
//! -- BACKUP: s3://snapshots/users-2024-05-01
//! -- @BACKUP snap-01
//! -- @CONFIRM
//! -- CONFIRMED
//! ```
//!
//! Words like `backup` elsewhere in the SQL (table names, prose comments)
//! are not safeguards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Destructive statement markers, matched on normalized upper-case text
pub const DESTRUCTIVE_MARKERS: &[&str] = &[
    "DROP TABLE",
    "DROP COLUMN",
    "DROP SCHEMA",
    "DROP DATABASE",
    "DROP INDEX",
    "TRUNCATE",
    "DELETE FROM",
    "ALTER TABLE",
];

const CONFIRMATION_TOKENS: &[&str] = &["@CONFIRM", "@CONFIRMED", "CONFIRMED"];
const DOWN_MARKERS: &[&str] = &["-- DOWN", "-- ROLLBACK"];
const TEXT_FIELDS: &[&str] = &["sql", "up", "content"];

/// A migration found in one member's output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationArtifact {
    /// Model that produced the artifact
    pub model_id: String,
    /// Whitespace-collapsed, upper-cased statement text
    pub text: String,
    pub has_backup: bool,
    pub confirmed: bool,
    pub has_down: bool,
}

impl MigrationArtifact {
    /// Build an artifact from raw SQL text
    pub fn from_sql(model_id: impl Into<String>, sql: &str) -> Self {
        let text = normalize(sql);
        Self {
            model_id: model_id.into(),
            has_backup: annotations(sql).any(|body| is_backup_annotation(&body)),
            confirmed: annotations(sql).any(|body| is_confirmation_annotation(&body)),
            has_down: contains_any(&text, DOWN_MARKERS),
            text,
        }
    }

    fn from_object(model_id: &str, map: &Map<String, Value>) -> Self {
        let sql = TEXT_FIELDS
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n");

        let mut artifact = Self::from_sql(model_id, &sql);
        artifact.has_backup |= map.get("backup").is_some_and(is_backup_reference);
        artifact.confirmed |= map.get("confirmed").and_then(Value::as_bool) == Some(true);
        artifact.has_down |= map
            .get("down")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());
        artifact
    }

    /// Destructive markers present in this artifact, in marker order
    pub fn destructive_markers(&self) -> Vec<&'static str> {
        DESTRUCTIVE_MARKERS
            .iter()
            .copied()
            .filter(|marker| self.text.contains(marker))
            .collect()
    }

    /// Backed up or explicitly confirmed
    pub fn is_safeguarded(&self) -> bool {
        self.has_backup || self.confirmed
    }

    /// Individual statements, split on `;`
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.text.split(';').map(str::trim).filter(|s| !s.is_empty())
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Upper-cased bodies of `--` comment lines
fn annotations(sql: &str) -> impl Iterator<Item = String> + '_ {
    sql.lines()
        .filter_map(|line| line.trim().strip_prefix("--"))
        .map(|body| body.trim().to_uppercase())
}

/// `BACKUP: <ref>` or `@BACKUP <ref>` with a non-empty reference
fn is_backup_annotation(body: &str) -> bool {
    let reference = if let Some(rest) = body.strip_prefix("BACKUP:") {
        rest
    } else if let Some(rest) = body.strip_prefix("@BACKUP")
        && (rest.starts_with(':') || rest.starts_with(char::is_whitespace))
    {
        rest.trim_start_matches(':')
    } else {
        return false;
    };
    !reference.trim().is_empty()
}

fn is_confirmation_annotation(body: &str) -> bool {
    let token = body
        .split(|c: char| c.is_whitespace() || c == ':')
        .next()
        .unwrap_or_default();
    CONFIRMATION_TOKENS.contains(&token)
}

fn is_backup_reference(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(reference) => !reference.trim().is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) => true,
        Value::Null => false,
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| text.contains(marker))
}

fn is_migration_object(map: &Map<String, Value>) -> bool {
    ["kind", "type"]
        .iter()
        .any(|key| map.get(*key).and_then(Value::as_str) == Some("migration"))
}

/// Collect every migration artifact in `payload`
pub fn extract_artifacts(model_id: &str, payload: &Value) -> Vec<MigrationArtifact> {
    let mut artifacts = Vec::new();
    collect(model_id, payload, &mut artifacts);
    artifacts
}

fn collect(model_id: &str, value: &Value, out: &mut Vec<MigrationArtifact>) {
    match value {
        Value::Object(map) if is_migration_object(map) => {
            out.push(MigrationArtifact::from_object(model_id, map));
        }
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("migrations", Value::Array(items)) => {
                        for item in items {
                            match item {
                                Value::String(sql) => {
                                    out.push(MigrationArtifact::from_sql(model_id, sql))
                                }
                                Value::Object(obj) => {
                                    out.push(MigrationArtifact::from_object(model_id, obj))
                                }
                                other => collect(model_id, other, out),
                            }
                        }
                    }
                    _ => collect(model_id, child, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(model_id, item, out);
            }
        }
        _ => {}
    }
}
