//! Text rendering of a finished evaluation
//!
//! Everything here only reads results; rounding happens at display time.

use std::fmt;

use serde::Serialize;

use crate::economics::compare_with_diesel;
use crate::models::{EconomicsResult, ResultBundle, StorageResult};
use crate::storage::size_storage;

const RULE_WIDTH: usize = 72;

/// Engine results plus the downstream storage and economics figures
#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    #[serde(flatten)]
    pub bundle: ResultBundle,
    pub storage: StorageResult,
    pub economics: EconomicsResult,
}

impl DesignReport {
    pub fn from_bundle(bundle: ResultBundle) -> Self {
        let storage = size_storage(&bundle.ammonia, &bundle.assumptions);
        let economics = compare_with_diesel(&bundle);
        Self {
            bundle,
            storage,
            economics,
        }
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{:=^width$}", format!(" {} ", title), width = RULE_WIDTH)
}

fn pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Whole-unit currency with thousands separators
fn money(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Power chain table, shaft first
pub fn format_power_chain(bundle: &ResultBundle) -> String {
    let p = &bundle.power;
    let a = &bundle.assumptions;
    let mut out = String::new();

    out.push_str(&format!(
        "  {:<28} {:>10} {:>12} {:>12}\n",
        "Stage", "Efficiency", "Output (kW)", "Input (kW)"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(64)));
    let rows = [
        ("Propeller shaft (target)", None, p.propulsion_kw, None),
        ("Electric motor", Some(a.motor_efficiency), p.propulsion_kw, Some(p.motor_input_kw)),
        ("Inverter", Some(a.inverter_efficiency), p.motor_input_kw, Some(p.inverter_input_kw)),
        ("Battery load", None, p.inverter_input_kw, Some(p.dc_bus_kw)),
        ("DC/DC converter", Some(a.dcdc_efficiency), p.dc_bus_kw, Some(p.dcdc_input_kw)),
        ("Balance of plant", None, p.bop_kw, None),
        ("Fuel cell gross output", None, p.fc_gross_kw, None),
    ];
    for (stage, efficiency, output, input) in rows {
        out.push_str(&format!(
            "  {:<28} {:>10} {:>12.1} {:>12}\n",
            stage,
            efficiency.map(pct).unwrap_or_else(|| "-".to_string()),
            output,
            input
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string()),
        ));
    }
    out.push_str(&format!(
        "\n  Stack: {} x {:.0} kW = {:.0} kW installed ({} utilisation, target {})\n",
        p.module_count,
        p.module_power_kw,
        p.installed_capacity_kw,
        pct(p.actual_utilisation),
        pct(p.target_utilisation),
    ));
    out
}

impl fmt::Display for DesignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bundle;
        let (h, nh3, t, e) = (&b.hydrogen, &b.ammonia, &b.thermal, &b.energy);

        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "AMMONIA-HYDROGEN FUEL CELL TUG - PLANT BALANCE")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        heading(f, "POWER CHAIN")?;
        write!(f, "{}", format_power_chain(b))?;

        heading(f, "PROCESS FLOW (kg/h)")?;
        writeln!(f, "  {:<28} {:>10}", "Stream", "Flow")?;
        writeln!(f, "  {}", "-".repeat(39))?;
        for (stream, flow) in [
            ("NH3 feed", nh3.nh3_kg_h),
            ("Cracker H2 product", h.cracker_production_kg_h),
            ("Cracker N2 product", nh3.n2_kg_h),
            ("NH3 slip", nh3.nh3_slip_kg_h),
            ("PSA H2 product", h.fresh_kg_h),
            ("PSA tail gas H2", h.psa_tail_kg_h),
            ("To combustor (H2)", h.combustor_feed_kg_h),
        ] {
            writeln!(f, "  {:<28} {:>10.1}", stream, flow)?;
        }

        heading(f, "ANODE RECIRCULATION (kg/h)")?;
        writeln!(f, "  Fresh H2 from PSA:         {:>8.1}", h.fresh_kg_h)?;
        writeln!(f, "  Recycled H2:               {:>8.1}", h.recycle_kg_h)?;
        writeln!(
            f,
            "  Anode inlet (lambda={}):  {:>8.1}",
            b.assumptions.anode_stoichiometry, h.anode_inlet_kg_h
        )?;
        writeln!(f, "  Consumed by reaction:      {:>8.1}", h.consumed_kg_h)?;
        writeln!(f, "  Anode exhaust:             {:>8.1}", h.exhaust_kg_h)?;
        writeln!(f, "  Purge to burner:           {:>8.1}", h.purge_kg_h)?;

        heading(f, "AUTOTHERMAL HEAT BALANCE (kW)")?;
        writeln!(f, "  Combustion energy (LHV):   {:>8.0}", t.combustion_energy_kw)?;
        writeln!(
            f,
            "  Heat available ({} burner): {:>7.0}",
            pct(b.assumptions.burner_efficiency),
            t.heat_available_kw
        )?;
        writeln!(f, "  Cracking reaction:         {:>8.0}", t.reaction_heat_kw)?;
        writeln!(f, "  Heat losses:               {:>8.0}", t.heat_losses_kw)?;
        writeln!(f, "  Surplus:                   {:>8.0}  ({:.2}x margin)", t.surplus_kw, t.margin)?;

        heading(f, "ENERGY BALANCE")?;
        writeln!(f, "  {:<32} {:>10} {:>10}", "Stream", "kW", "Share")?;
        writeln!(f, "  {}", "-".repeat(54))?;
        for (stream, kw) in [
            ("Input: NH3 (LHV)", e.input_kw),
            ("Propulsion + battery", e.useful_kw),
            ("Fuel cell waste heat", e.fc_waste_heat_kw),
            ("Combustor excess heat", e.combustor_excess_kw),
            ("Electronics losses", e.electronics_loss_kw),
            ("Other losses (closure)", e.other_losses_kw),
        ] {
            writeln!(f, "  {:<32} {:>10.0} {:>10}", stream, kw, pct(e.share(kw)))?;
        }
        writeln!(f, "\n  System efficiency (LHV): {}", pct(e.system_efficiency))?;

        heading(f, "STORAGE")?;
        let s = &self.storage;
        writeln!(f, "  NH3 for {:.0} h:             {:>8.0} kg", s.endurance_hours, s.mission_nh3_kg)?;
        writeln!(f, "  With buffer:               {:>8.0} kg", s.buffered_nh3_kg)?;
        writeln!(
            f,
            "  Tank:                      {:>8.0} t ({:.1} m3 liquid)",
            s.tank_capacity_t, s.tank_volume_m3
        )?;

        heading(f, "ANNUAL OPEX")?;
        let (am, di) = (&self.economics.ammonia, &self.economics.diesel);
        writeln!(f, "  {:<24} {:>18} {:>18}", "Cost", "Ammonia", "Diesel")?;
        writeln!(f, "  {}", "-".repeat(62))?;
        for (item, x, y) in [
            ("Fuel", am.fuel_cost, di.fuel_cost),
            ("Carbon", am.carbon_cost, di.carbon_cost),
            ("Other", am.other_cost, di.other_cost),
            ("Total", am.total, di.total),
        ] {
            writeln!(f, "  {:<24} {:>18} {:>18}", item, money(x), money(y))?;
        }
        match self.economics.opex_premium {
            Some(premium) => writeln!(f, "\n  Premium vs diesel: {:.2}x", premium)?,
            None => writeln!(f, "\n  Premium vs diesel: n/a (diesel baseline costs nothing)")?,
        }

        heading(f, "LIFECYCLE CO2")?;
        writeln!(f, "  {:<16} {:>12} {:>12} {:>16}", "Pathway", "t CO2/yr", "vs diesel", "Carbon cost")?;
        writeln!(f, "  {}", "-".repeat(59))?;
        for p in &self.economics.pathways {
            writeln!(
                f,
                "  {:<16} {:>12.0} {:>12} {:>16}",
                p.name,
                p.co2_t_per_year,
                format!("{:+.0}%", p.change_vs_diesel * 100.0),
                money(p.carbon_cost)
            )?;
        }

        if !b.advisories.is_empty() {
            heading(f, "ADVISORIES")?;
            for advisory in &b.advisories {
                writeln!(f, "  ! {}", advisory)?;
            }
        }

        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))
    }
}
