//! Scenario and run store (SQLite)

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension};

use crate::assumptions::AssumptionSet;
use crate::models::ResultBundle;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Named sets of assumption overrides
        CREATE TABLE IF NOT EXISTS scenarios (
            name TEXT PRIMARY KEY,
            source TEXT
        );

        -- Overrides on top of the reference design point
        CREATE TABLE IF NOT EXISTS scenario_values (
            scenario TEXT NOT NULL,
            key TEXT NOT NULL,
            value REAL NOT NULL,
            PRIMARY KEY (scenario, key)
        );

        -- Saved evaluations; the full bundle is kept as JSON
        CREATE TABLE IF NOT EXISTS runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scenario TEXT,
            system_efficiency REAL NOT NULL,
            nh3_kg_h REAL NOT NULL,
            surplus_kw REAL NOT NULL,
            autothermal INTEGER NOT NULL,
            bundle_json TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_scenario_values_scenario ON scenario_values(scenario);
        CREATE INDEX IF NOT EXISTS idx_runs_scenario ON runs(scenario);
        "#,
    )?;
    Ok(())
}

/// Insert or replace a scenario and its overrides
pub fn upsert_scenario(
    conn: &Connection,
    name: &str,
    source: Option<&str>,
    values: &[(String, f64)],
) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO scenarios (name, source) VALUES (?1, ?2)",
        (name, source),
    )?;
    conn.execute("DELETE FROM scenario_values WHERE scenario = ?1", [name])?;
    for (key, value) in values {
        conn.execute(
            "INSERT INTO scenario_values (scenario, key, value) VALUES (?1, ?2, ?3)",
            (name, key, value),
        )?;
    }
    Ok(())
}

/// Clear all scenarios (for re-import). Saved runs are kept.
pub fn clear_scenarios(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM scenario_values;
        DELETE FROM scenarios;
        "#,
    )?;
    Ok(())
}

/// Get the overrides stored for a scenario
pub fn get_scenario_values(conn: &Connection, name: &str) -> Result<Vec<(String, f64)>> {
    let exists: Option<String> = conn
        .query_row("SELECT name FROM scenarios WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;
    if exists.is_none() {
        bail!("scenario '{}' not found", name);
    }

    let mut stmt = conn.prepare(
        "SELECT key, value FROM scenario_values WHERE scenario = ?1 ORDER BY key",
    )?;
    let rows = stmt.query_map([name], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Build the assumption set for a stored scenario
pub fn load_scenario(conn: &Connection, name: &str) -> Result<AssumptionSet> {
    let values = get_scenario_values(conn, name)?;
    AssumptionSet::default()
        .with_overrides(values.iter().map(|(k, v)| (k.as_str(), *v)))
        .with_context(|| format!("scenario '{}' holds an unusable override", name))
}

/// Scenario names with their override counts
pub fn list_scenarios(conn: &Connection) -> Result<Vec<(String, Option<String>, usize)>> {
    let mut stmt = conn.prepare(
        "SELECT s.name, s.source, COUNT(v.key)
         FROM scenarios s
         LEFT JOIN scenario_values v ON v.scenario = s.name
         GROUP BY s.name
         ORDER BY s.name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get::<_, i64>(2)? as usize))
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Summary row of a saved run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub scenario: Option<String>,
    pub system_efficiency: f64,
    pub nh3_kg_h: f64,
    pub surplus_kw: f64,
    pub autothermal: bool,
}

/// Save an evaluation, returning its run id
pub fn insert_run(conn: &Connection, scenario: Option<&str>, bundle: &ResultBundle) -> Result<i64> {
    let json = serde_json::to_string(bundle).context("serialising result bundle")?;
    conn.execute(
        "INSERT INTO runs (scenario, system_efficiency, nh3_kg_h, surplus_kw, autothermal, bundle_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            scenario,
            bundle.energy.system_efficiency,
            bundle.ammonia.nh3_kg_h,
            bundle.thermal.surplus_kw,
            bundle.is_thermally_feasible(),
            &json,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

/// List saved runs, newest first
pub fn list_runs(conn: &Connection) -> Result<Vec<RunRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, scenario, system_efficiency, nh3_kg_h, surplus_kw, autothermal
         FROM runs ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RunRecord {
            id: row.get(0)?,
            scenario: row.get(1)?,
            system_efficiency: row.get(2)?,
            nh3_kg_h: row.get(3)?,
            surplus_kw: row.get(4)?,
            autothermal: row.get(5)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Raw JSON of a saved run
pub fn get_run_json(conn: &Connection, id: i64) -> Result<String> {
    conn.query_row("SELECT bundle_json FROM runs WHERE id = ?1", [id], |row| row.get(0))
        .optional()?
        .with_context(|| format!("run {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::evaluate;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn scenario_round_trip() {
        let conn = memory_db();
        let values = vec![
            ("fc_efficiency".to_string(), 0.55),
            ("psa_recovery".to_string(), 0.8),
        ];
        upsert_scenario(&conn, "efficient", Some("test"), &values).unwrap();

        let set = load_scenario(&conn, "efficient").unwrap();
        assert_eq!(set.fc_efficiency, 0.55);
        assert_eq!(set.psa_recovery, 0.8);
        assert_eq!(set.bop_fraction, AssumptionSet::default().bop_fraction);

        let listed = list_scenarios(&conn).unwrap();
        assert_eq!(listed, vec![("efficient".to_string(), Some("test".to_string()), 2)]);
    }

    #[test]
    fn upsert_replaces_old_values() {
        let conn = memory_db();
        upsert_scenario(&conn, "s", None, &[("fc_efficiency".to_string(), 0.55)]).unwrap();
        upsert_scenario(&conn, "s", None, &[("psa_recovery".to_string(), 0.8)]).unwrap();
        let values = get_scenario_values(&conn, "s").unwrap();
        assert_eq!(values, vec![("psa_recovery".to_string(), 0.8)]);
    }

    #[test]
    fn missing_scenario_is_an_error() {
        let conn = memory_db();
        assert!(load_scenario(&conn, "ghost").is_err());
    }

    #[test]
    fn unknown_key_in_store_is_rejected() {
        let conn = memory_db();
        upsert_scenario(&conn, "bad", None, &[("warp_factor".to_string(), 9.0)]).unwrap();
        assert!(load_scenario(&conn, "bad").is_err());
    }

    #[test]
    fn runs_are_saved_and_listed() {
        let conn = memory_db();
        let bundle = evaluate(&AssumptionSet::default()).unwrap();
        let first = insert_run(&conn, None, &bundle).unwrap();
        let second = insert_run(&conn, Some("reference"), &bundle).unwrap();
        assert!(second > first);

        let runs = list_runs(&conn).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, second);
        assert_eq!(runs[0].scenario.as_deref(), Some("reference"));
        assert!(runs[0].autothermal);
        assert_eq!(runs[0].nh3_kg_h, bundle.ammonia.nh3_kg_h);

        let json: serde_json::Value =
            serde_json::from_str(&get_run_json(&conn, first).unwrap()).unwrap();
        assert_eq!(json["power"]["module_count"], 10);
        assert!(get_run_json(&conn, 999).is_err());
    }
}
