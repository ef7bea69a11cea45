//! Catalog files: JSON, JSON Lines, or plain text with one name per line.

use anyhow::{anyhow, Context, Result};
use engine::SkillCatalog;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Name(String),
    Object { name: Option<String> },
}

impl Entry {
    fn into_name(self) -> Option<String> {
        match self {
            Entry::Name(n) => Some(n),
            Entry::Object { name } => name,
        }
    }
}

/// Names from a skills-service style document: a bare array, or an object
/// whose `data` (else `skills`) field holds the array. Entries are strings or
/// objects with a `name`.
pub fn names_from_value(value: &Value) -> Option<Vec<String>> {
    let array = match value {
        Value::Array(arr) => arr,
        Value::Object(obj) => obj
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| obj.get("skills").and_then(Value::as_array))?,
        _ => return None,
    };
    Some(
        array
            .iter()
            .filter_map(|v| Entry::deserialize(v).ok())
            .filter_map(Entry::into_name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect(),
    )
}

pub fn parse_json(text: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(text)?;
    names_from_value(&value).ok_or_else(|| anyhow!("no skill array found (expected an array, `data` or `skills`)"))
}

pub fn parse_jsonl(text: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        let entry: Entry = serde_json::from_str(line).with_context(|| format!("line {}", lineno + 1))?;
        if let Some(name) = entry.into_name() {
            names.push(name);
        }
    }
    Ok(names)
}

pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_catalog_file(path: &Path) -> Result<SkillCatalog> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let names = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => parse_json(&text),
        Some("jsonl") => parse_jsonl(&text),
        _ => Ok(parse_lines(&text)),
    }
    .with_context(|| format!("parsing {}", path.display()))?;
    let catalog: SkillCatalog = names.into_iter().collect();
    tracing::info!(path = %path.display(), skills = catalog.len(), "loaded catalog file");
    Ok(catalog)
}
