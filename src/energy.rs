//! Plant energy balance and overall efficiency

use crate::assumptions::AssumptionSet;
use crate::calculator::require_positive;
use crate::error::CalcResult;
use crate::models::{AmmoniaFeedResult, EnergyBalanceResult, PowerChainResult, ThermalBalanceResult};

const KEYS: &[&str] = &["lhv_nh3_kwh_per_kg", "fc_efficiency"];

/// Split the ammonia LHV input into the plant's output streams.
///
/// Useful power, fuel cell waste heat, combustor excess and electronics
/// losses come from the earlier stages. `other_losses_kw` closes the balance
/// and is therefore exact by construction. It keeps its sign: a negative
/// value means the accounted streams exceed the input, which the caller
/// reports as an advisory.
pub fn calculate_energy_balance(
    power: &PowerChainResult,
    ammonia: &AmmoniaFeedResult,
    thermal: &ThermalBalanceResult,
    assumptions: &AssumptionSet,
) -> CalcResult<EnergyBalanceResult> {
    assumptions.validate_keys(KEYS)?;

    let input_kw = require_positive(
        "ammonia LHV input",
        ammonia.nh3_kg_h * assumptions.lhv_nh3_kwh_per_kg,
    )?;

    let useful_kw = power.useful_kw();
    // Share of the hydrogen LHV fed to the stack that leaves as heat
    let fc_hydrogen_input_kw = power.fc_gross_kw / assumptions.fc_efficiency;
    let fc_waste_heat_kw = fc_hydrogen_input_kw * (1.0 - assumptions.fc_efficiency);
    let combustor_excess_kw = thermal.surplus_kw.max(0.0);
    let electronics_loss_kw = power.electronics_loss_kw();

    let accounted_kw = useful_kw + fc_waste_heat_kw + combustor_excess_kw + electronics_loss_kw;
    let other_losses_kw = input_kw - accounted_kw;

    Ok(EnergyBalanceResult {
        input_kw,
        useful_kw,
        fc_waste_heat_kw,
        combustor_excess_kw,
        electronics_loss_kw,
        other_losses_kw,
        system_efficiency: useful_kw / input_kw,
    })
}
