//! Hydrogen balance around the anode recirculation loop and the PSA
//!
//! ```text
//!  cracker --production--> PSA --fresh--> (+) --inlet--> anode --exhaust--> split
//!                           |              ^                                 |  |
//!                           |              +------------ recycle ------------+  |
//!                           +--tail--> combustor <--------- purge --------------+
//! ```

use crate::assumptions::AssumptionSet;
use crate::calculator::{require_positive, solve_linear_self_reference};
use crate::error::{CalcError, CalcResult};
use crate::models::HydrogenBalanceResult;

const KEYS: &[&str] = &[
    "fc_efficiency",
    "lhv_h2_kwh_per_kg",
    "anode_stoichiometry",
    "fuel_utilisation",
    "psa_recovery",
];

/// Solve every hydrogen stream needed to deliver `fc_gross_kw` of fuel cell output.
pub fn calculate_hydrogen_balance(
    fc_gross_kw: f64,
    assumptions: &AssumptionSet,
) -> CalcResult<HydrogenBalanceResult> {
    assumptions.validate_keys(KEYS)?;
    let fc_gross_kw = require_positive("fuel cell gross output", fc_gross_kw)?;

    let stoichiometry = assumptions.anode_stoichiometry;
    let utilisation = assumptions.fuel_utilisation;
    let product = stoichiometry * utilisation;
    if product <= 1.0 {
        return Err(CalcError::InfeasibleRecirculation {
            stoichiometry,
            utilisation,
            product,
        });
    }

    let consumed_kg_h = require_positive(
        "hydrogen consumption",
        fc_gross_kw / (assumptions.fc_efficiency * assumptions.lhv_h2_kwh_per_kg),
    )?;

    let anode_inlet_kg_h = stoichiometry * consumed_kg_h;
    let fresh_kg_h = consumed_kg_h / utilisation;
    let recycle_kg_h = anode_inlet_kg_h - fresh_kg_h;
    if recycle_kg_h <= 0.0 {
        // Only reachable through rounding right at the lambda * U_f = 1 boundary
        return Err(CalcError::InfeasibleRecirculation {
            stoichiometry,
            utilisation,
            product,
        });
    }

    let exhaust_kg_h = require_positive("anode exhaust", anode_inlet_kg_h - consumed_kg_h)?;
    let purge_kg_h = require_positive("anode purge", exhaust_kg_h - recycle_kg_h)?;

    // production = fresh + (1 - recovery) * production
    let tail_share = 1.0 - assumptions.psa_recovery;
    let cracker_production_kg_h = solve_linear_self_reference(fresh_kg_h, tail_share)
        .ok_or_else(|| CalcError::InvalidAssumption {
            name: "psa_recovery".to_string(),
            value: assumptions.psa_recovery,
            reason: "must lie in (0, 1]",
        })?;
    let psa_tail_kg_h = require_positive("PSA tail gas", tail_share * cracker_production_kg_h)?;
    let combustor_feed_kg_h = require_positive("combustor feed", psa_tail_kg_h + purge_kg_h)?;

    Ok(HydrogenBalanceResult {
        consumed_kg_h,
        anode_inlet_kg_h,
        fresh_kg_h,
        recycle_kg_h,
        exhaust_kg_h,
        purge_kg_h,
        cracker_production_kg_h,
        psa_tail_kg_h,
        combustor_feed_kg_h,
    })
}
