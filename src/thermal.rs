//! Autothermal heat balance of the cracker
//!
//! The cracker reaction is endothermic. Its heat comes from burning the PSA
//! tail gas and anode purge; this stage only reports whether that is enough.

use crate::assumptions::AssumptionSet;
use crate::calculator::require_positive;
use crate::constants::{GRAMS_PER_KG, SECONDS_PER_HOUR};
use crate::error::CalcResult;
use crate::models::ThermalBalanceResult;

const KEYS: &[&str] = &[
    "molar_mass_nh3",
    "cracking_enthalpy_kj_per_mol",
    "cracker_heat_loss_fraction",
    "lhv_h2_kwh_per_kg",
    "burner_efficiency",
];

/// Convert a mass flow in kg/h to a molar flow in mol/s.
pub fn molar_flow_mol_s(mass_kg_h: f64, molar_mass_g_mol: f64) -> f64 {
    mass_kg_h * GRAMS_PER_KG / molar_mass_g_mol / SECONDS_PER_HOUR
}

/// Compare cracker heat demand for `nh3_kg_h` with the heat released by
/// burning `combustor_feed_kg_h` of hydrogen.
///
/// A negative surplus is returned as is; the caller decides how to report it.
pub fn calculate_thermal_balance(
    nh3_kg_h: f64,
    combustor_feed_kg_h: f64,
    assumptions: &AssumptionSet,
) -> CalcResult<ThermalBalanceResult> {
    assumptions.validate_keys(KEYS)?;
    let nh3_kg_h = require_positive("ammonia feed", nh3_kg_h)?;
    let combustor_feed_kg_h = require_positive("combustor feed", combustor_feed_kg_h)?;

    let nh3_mol_s = molar_flow_mol_s(nh3_kg_h, assumptions.molar_mass_nh3);
    // kJ/mol * mol/s = kW
    let reaction_heat_kw = nh3_mol_s * assumptions.cracking_enthalpy_kj_per_mol;
    let heat_losses_kw = reaction_heat_kw * assumptions.cracker_heat_loss_fraction;
    let heat_required_kw = reaction_heat_kw + heat_losses_kw;

    let combustion_energy_kw = combustor_feed_kg_h * assumptions.lhv_h2_kwh_per_kg;
    let heat_available_kw = combustion_energy_kw * assumptions.burner_efficiency;

    Ok(ThermalBalanceResult {
        nh3_mol_s,
        reaction_heat_kw,
        heat_losses_kw,
        heat_required_kw,
        combustion_energy_kw,
        heat_available_kw,
        surplus_kw: heat_available_kw - heat_required_kw,
        margin: heat_available_kw / heat_required_kw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_heat_balance() {
        let t = calculate_thermal_balance(890.0, 56.5, &AssumptionSet::default()).unwrap();
        assert!((t.reaction_heat_kw - 668.0).abs() < 1.0, "reaction: {}", t.reaction_heat_kw);
        assert!((t.heat_losses_kw - 67.0).abs() < 1.0, "losses: {}", t.heat_losses_kw);
        assert!((t.heat_required_kw - 735.0).abs() < 1.0, "required: {}", t.heat_required_kw);
        assert!((t.combustion_energy_kw - 1883.0).abs() < 1.0, "LHV: {}", t.combustion_energy_kw);
        assert!((t.heat_available_kw - 1695.0).abs() < 1.0, "available: {}", t.heat_available_kw);
        assert!((t.surplus_kw - 960.0).abs() < 1.0, "surplus: {}", t.surplus_kw);
        assert!((t.margin - 2.3).abs() < 0.05, "margin: {}", t.margin);
        assert!(t.is_autothermal());
    }

    #[test]
    fn test_molar_flow_units() {
        // 17.03 kg/h of NH3 is 1 kmol/h
        let mol_s = molar_flow_mol_s(17.03, 17.03);
        assert!((mol_s - 1000.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_shortfall_is_reported_not_rejected() {
        let t = calculate_thermal_balance(890.0, 10.0, &AssumptionSet::default()).unwrap();
        assert!(t.surplus_kw < 0.0);
        assert!(t.margin < 1.0);
        assert!(!t.is_autothermal());
    }

    #[test]
    fn test_zero_combustor_feed_is_a_violation() {
        assert!(calculate_thermal_balance(890.0, 0.0, &AssumptionSet::default()).is_err());
    }
}
