//! Ammonia feed to the cracker, from 2 NH3 -> 3 H2 + N2

use crate::assumptions::AssumptionSet;
use crate::calculator::require_positive;
use crate::error::{CalcError, CalcResult};
use crate::models::AmmoniaFeedResult;

const KEYS: &[&str] = &[
    "molar_mass_nh3",
    "molar_mass_h2",
    "molar_mass_n2",
    "cracking_conversion",
];

/// kg of H2 released per kg of NH3 fully cracked
pub fn hydrogen_yield(assumptions: &AssumptionSet) -> f64 {
    (3.0 * assumptions.molar_mass_h2) / (2.0 * assumptions.molar_mass_nh3)
}

/// Ammonia mass flow needed for the cracker to deliver `h2_production_kg_h`.
pub fn calculate_ammonia_feed(
    h2_production_kg_h: f64,
    assumptions: &AssumptionSet,
) -> CalcResult<AmmoniaFeedResult> {
    assumptions.validate_keys(KEYS)?;
    let h2_production_kg_h = require_positive("cracker hydrogen production", h2_production_kg_h)?;

    let conversion = assumptions.cracking_conversion;
    let h2_yield = hydrogen_yield(assumptions);
    if h2_yield <= 0.0 || !h2_yield.is_finite() {
        return Err(CalcError::InvalidAssumption {
            name: "molar_mass_h2".to_string(),
            value: assumptions.molar_mass_h2,
            reason: "hydrogen yield per kg ammonia must be positive",
        });
    }

    let nh3_kg_h = h2_production_kg_h / (h2_yield * conversion);
    let cracked_kg_h = nh3_kg_h * conversion;
    let n2_kg_h = cracked_kg_h * assumptions.molar_mass_n2 / (2.0 * assumptions.molar_mass_nh3);

    Ok(AmmoniaFeedResult {
        h2_yield,
        nh3_kg_h,
        n2_kg_h,
        nh3_slip_kg_h: nh3_kg_h - cracked_kg_h,
    })
}
