//! Ammonia Tug Calculator
//!
//! Plant balance calculator for an ammonia-hydrogen fuel cell tug.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nh3_tug_calculator::assumptions::{AssumptionSet, parse_override};
use nh3_tug_calculator::report::DesignReport;
use nh3_tug_calculator::{db, evaluate, import};

#[derive(Parser)]
#[command(name = "nh3-tug-calculator")]
#[command(about = "Plant balance calculator for an ammonia-hydrogen fuel cell tug")]
struct Cli {
    /// Path to the SQLite scenario and run store
    #[arg(short, long, default_value = "tug_runs.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one operating point and print the design report
    Calc {
        /// Stored scenario to start from instead of the reference design
        #[arg(short, long)]
        scenario: Option<String>,

        /// Override an assumption, e.g. --set fc_efficiency=0.55
        #[arg(long = "set", value_parser = parse_override)]
        overrides: Vec<(String, f64)>,

        /// Print JSON instead of text tables
        #[arg(long)]
        json: bool,

        /// Save the result to the run store
        #[arg(long)]
        save: bool,

        /// Also list the assumptions used
        #[arg(short, long)]
        verbose: bool,
    },

    /// List recognised assumption keys with their reference values
    Keys,

    /// Import *.scenario files from a directory into the store
    Import {
        /// Directory to scan recursively
        dir: PathBuf,

        /// Remove stored scenarios before importing
        #[arg(long)]
        clear: bool,
    },

    /// List stored scenarios
    Scenarios,

    /// List saved runs, or print one run's JSON
    Runs {
        /// Run id to print in full
        #[arg(long)]
        show: Option<i64>,
    },

    /// Re-evaluate the plant over a range of one assumption
    Sweep {
        /// Assumption key to vary
        key: String,

        /// First value
        from: f64,

        /// Last value
        to: f64,

        /// Number of points, including both ends
        #[arg(short = 'n', long, default_value = "5")]
        steps: usize,

        /// Stored scenario to start from
        #[arg(short, long)]
        scenario: Option<String>,
    },

    /// Initialize an empty store
    Init,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn base_assumptions(conn: &Connection, scenario: Option<&str>) -> Result<AssumptionSet> {
    match scenario {
        Some(name) => db::load_scenario(conn, name),
        None => Ok(AssumptionSet::default()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("opening {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Calc {
            scenario,
            overrides,
            json,
            save,
            verbose,
        } => {
            let assumptions = base_assumptions(&conn, scenario.as_deref())?
                .with_overrides(overrides.iter().map(|(k, v)| (k.as_str(), *v)))?;
            let bundle = evaluate(&assumptions)?;

            if save {
                let id = db::insert_run(&conn, scenario.as_deref(), &bundle)?;
                info!(run = id, "saved run");
                eprintln!("Saved as run {}", id);
            }

            if verbose && !json {
                println!("Assumptions:");
                for (key, value) in assumptions.entries() {
                    println!("  {:<32} {}", key, value);
                }
                println!();
            }

            let report = DesignReport::from_bundle(bundle);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }

        Commands::Keys => {
            let defaults = AssumptionSet::default();
            println!("{:<32} {:>12}", "Key", "Reference");
            println!("{}", "-".repeat(45));
            for (key, value) in defaults.entries() {
                println!("{:<32} {:>12}", key, value);
            }
        }

        Commands::Import { dir, clear } => {
            if clear {
                println!("Clearing stored scenarios...");
                db::clear_scenarios(&conn)?;
            }

            let stats = import::import_scenarios(&conn, &dir)?;
            println!("{}", stats);
        }

        Commands::Scenarios => {
            let scenarios = db::list_scenarios(&conn)?;
            if scenarios.is_empty() {
                println!("No scenarios stored. Run 'import' first.");
            } else {
                println!("{:<24} {:>9}  {}", "Scenario", "Overrides", "Source");
                println!("{}", "-".repeat(60));
                for (name, source, count) in scenarios {
                    println!("{:<24} {:>9}  {}", name, count, source.unwrap_or_default());
                }
            }
        }

        Commands::Runs { show: Some(id) } => {
            println!("{}", db::get_run_json(&conn, id)?);
        }

        Commands::Runs { show: None } => {
            let runs = db::list_runs(&conn)?;
            if runs.is_empty() {
                println!("No saved runs. Use 'calc --save'.");
            } else {
                println!(
                    "{:>5}  {:<20} {:>10} {:>10} {:>12}",
                    "Run", "Scenario", "Eff (%)", "NH3 kg/h", "Surplus kW"
                );
                println!("{}", "-".repeat(62));
                for r in runs {
                    println!(
                        "{:>5}  {:<20} {:>10.1} {:>10.1} {:>12.0}{}",
                        r.id,
                        r.scenario.as_deref().unwrap_or("(reference)"),
                        r.system_efficiency * 100.0,
                        r.nh3_kg_h,
                        r.surplus_kw,
                        if r.autothermal { "" } else { "  !" }
                    );
                }
            }
        }

        Commands::Sweep {
            key,
            from,
            to,
            steps,
            scenario,
        } => {
            if steps < 2 {
                bail!("a sweep needs at least 2 points");
            }
            let base = base_assumptions(&conn, scenario.as_deref())?;
            // Fail on an unknown key before printing anything
            base.clone().with(&key, from)?;

            println!(
                "{:>12} {:>10} {:>10} {:>12} {:>8}",
                key, "Eff (%)", "NH3 kg/h", "Surplus kW", "Modules"
            );
            println!("{}", "-".repeat(56));
            for i in 0..steps {
                let value = from + (to - from) * i as f64 / (steps - 1) as f64;
                let outcome = base.clone().with(&key, value).and_then(|set| evaluate(&set));
                match outcome {
                    Ok(b) => println!(
                        "{:>12.4} {:>10.2} {:>10.1} {:>12.0} {:>8}",
                        value,
                        b.energy.system_efficiency * 100.0,
                        b.ammonia.nh3_kg_h,
                        b.thermal.surplus_kw,
                        b.power.module_count
                    ),
                    Err(e) => println!("{:>12.4}  {}", value, e),
                }
            }
        }

        Commands::Init => {
            println!("Store initialized at: {}", cli.database.display());
        }
    }

    Ok(())
}
