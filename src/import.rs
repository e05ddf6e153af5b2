//! Scenario file import
//!
//! Walks a directory for `*.scenario` files and stores each one as a named
//! set of assumption overrides. A scenario file is a list of `key = value`
//! lines; `#` starts a comment and an optional `name = "..."` line overrides
//! the file stem as the scenario name.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use rusqlite::Connection;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::assumptions::AssumptionSet;
use crate::db;

pub const SCENARIO_EXTENSION: &str = "scenario";

/// One parsed scenario file before it is stored
#[derive(Debug, Default, PartialEq)]
pub struct ParsedScenario {
    pub name: String,
    pub values: Vec<(String, f64)>,
}

/// Find all scenario files below `dir`
pub fn find_scenario_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == SCENARIO_EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse scenario text. `default_name` is used when the text has no `name` line.
pub fn parse_scenario(text: &str, default_name: &str) -> Result<ParsedScenario> {
    let assignment_re = Regex::new(
        r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"([^"]*)"|([^#\s]+))\s*(?:#.*)?$"#,
    )?;
    let blank_re = Regex::new(r"^\s*(?:#.*)?$")?;

    let mut scenario = ParsedScenario {
        name: default_name.to_string(),
        values: Vec::new(),
    };

    for (lineno, line) in text.lines().enumerate() {
        if blank_re.is_match(line) {
            continue;
        }
        let cap = assignment_re
            .captures(line)
            .ok_or_else(|| anyhow!("line {}: expected `key = value`", lineno + 1))?;
        let key = &cap[1];

        if key == "name" {
            let name = cap.get(2).or(cap.get(3)).map_or("", |m| m.as_str());
            if name.is_empty() {
                bail!("line {}: scenario name is empty", lineno + 1);
            }
            scenario.name = name.to_string();
            continue;
        }

        if AssumptionSet::domain(key).is_none() {
            bail!("line {}: unknown assumption key `{}`", lineno + 1, key);
        }
        let raw = cap
            .get(3)
            .ok_or_else(|| anyhow!("line {}: `{}` needs a numeric value", lineno + 1, key))?
            .as_str();
        let value = raw
            .parse::<f64>()
            .with_context(|| format!("line {}: bad value `{}` for `{}`", lineno + 1, raw, key))?;

        scenario.values.retain(|(k, _)| k != key);
        scenario.values.push((key.to_string(), value));
    }

    Ok(scenario)
}

fn parse_scenario_file(path: &Path) -> Result<ParsedScenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?;
    let scenario = parse_scenario(&text, stem)?;

    // Values must also be in range before they are worth storing
    AssumptionSet::default()
        .with_overrides(scenario.values.iter().map(|(k, v)| (k.as_str(), *v)))?
        .validate()?;
    Ok(scenario)
}

/// Import every scenario file below `dir` into the store
pub fn import_scenarios(conn: &Connection, dir: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    info!(dir = %dir.display(), "scanning for scenario files");
    let files = find_scenario_files(dir)?;
    info!(count = files.len(), "found scenario files");

    for path in &files {
        match parse_scenario_file(path) {
            Ok(scenario) => {
                let source = path.display().to_string();
                db::upsert_scenario(conn, &scenario.name, Some(&source), &scenario.values)?;
                info!(
                    scenario = %scenario.name,
                    overrides = scenario.values.len(),
                    "imported"
                );
                stats.scenarios += 1;
                stats.overrides += scenario.values.len();
            }
            Err(e) => {
                warn!(file = %path.display(), "skipping scenario: {:#}", e);
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub scenarios: usize,
    pub overrides: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} scenarios ({} overrides). Errors: {}",
            self.scenarios, self.overrides, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_comments_and_name() {
        let text = r#"
            # Higher efficiency stack
            name = "hi-eff"
            fc_efficiency = 0.55   # vendor datasheet
            psa_recovery=0.8
        "#;
        let s = parse_scenario(text, "file-stem").unwrap();
        assert_eq!(s.name, "hi-eff");
        assert_eq!(
            s.values,
            vec![
                ("fc_efficiency".to_string(), 0.55),
                ("psa_recovery".to_string(), 0.8)
            ]
        );
    }

    #[test]
    fn falls_back_to_default_name_and_keeps_last_duplicate() {
        let s = parse_scenario("bop_fraction = 0.2\nbop_fraction = 0.25\n", "lean").unwrap();
        assert_eq!(s.name, "lean");
        assert_eq!(s.values, vec![("bop_fraction".to_string(), 0.25)]);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_lines() {
        assert!(parse_scenario("warp_factor = 9", "x").is_err());
        assert!(parse_scenario("fc_efficiency 0.5", "x").is_err());
        assert!(parse_scenario("fc_efficiency = fast", "x").is_err());
        assert!(parse_scenario("fc_efficiency = \"0.5\"", "x").is_err());
    }

    #[test]
    fn imports_directory_into_store() {
        let dir = std::env::temp_dir().join(format!("nh3-tug-import-{}", std::process::id()));
        let nested = dir.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.join("base.scenario"), "fc_efficiency = 0.55\n").unwrap();
        fs::write(nested.join("lean.scenario"), "bop_fraction = 0.2\n").unwrap();
        fs::write(dir.join("broken.scenario"), "bop_fraction = 1.5\n").unwrap();
        fs::write(dir.join("notes.txt"), "fc_efficiency = 0.1\n").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        let stats = import_scenarios(&conn, &dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(stats.scenarios, 2);
        assert_eq!(stats.overrides, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(db::load_scenario(&conn, "lean").unwrap().bop_fraction, 0.2);
        assert_eq!(db::load_scenario(&conn, "base").unwrap().fc_efficiency, 0.55);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        assert!(import_scenarios(&conn, Path::new("/definitely/not/here")).is_err());
    }
}
