//! Power chain: propeller shaft back to fuel cell gross output

use crate::assumptions::AssumptionSet;
use crate::calculator::{require_positive, solve_linear_self_reference};
use crate::error::{CalcError, CalcResult};
use crate::models::PowerChainResult;

const KEYS: &[&str] = &[
    "motor_efficiency",
    "inverter_efficiency",
    "battery_power_kw",
    "dcdc_efficiency",
    "bop_fraction",
    "fc_target_utilisation",
    "fc_module_power_kw",
];

/// Absorbs float noise such as 10.000000000000002 modules before rounding up.
const MODULE_COUNT_TOLERANCE: f64 = 1e-9;

/// Back-propagate `propulsion_kw` through the electrical chain and size the
/// fuel cell stack.
///
/// Each conversion stage must be fed `output / efficiency`; the battery load
/// is added at the DC bus; BOP is a share of the gross output it is part of.
pub fn calculate_power_chain(
    propulsion_kw: f64,
    assumptions: &AssumptionSet,
) -> CalcResult<PowerChainResult> {
    assumptions.validate_keys(KEYS)?;
    let propulsion_kw = require_positive("propulsion power", propulsion_kw)?;

    let motor_input_kw = propulsion_kw / assumptions.motor_efficiency;
    let inverter_input_kw = motor_input_kw / assumptions.inverter_efficiency;
    let dc_bus_kw = inverter_input_kw + assumptions.battery_power_kw;
    let dcdc_input_kw = dc_bus_kw / assumptions.dcdc_efficiency;

    let fc_gross_kw = solve_linear_self_reference(dcdc_input_kw, assumptions.bop_fraction)
        .ok_or_else(|| CalcError::InvalidAssumption {
            name: "bop_fraction".to_string(),
            value: assumptions.bop_fraction,
            reason: "must lie in [0, 1)",
        })?;
    let bop_kw = assumptions.bop_fraction * fc_gross_kw;

    let required_capacity_kw = fc_gross_kw / assumptions.fc_target_utilisation;
    let module_power_kw = assumptions.fc_module_power_kw;
    let modules = (required_capacity_kw / module_power_kw - MODULE_COUNT_TOLERANCE)
        .ceil()
        .max(1.0);
    // `as u32` saturates and would under-provision the stack
    if modules.is_nan() || modules > f64::from(u32::MAX) {
        return Err(CalcError::BalanceViolation {
            stream: "fuel cell module count",
            value: modules,
        });
    }
    let module_count = modules as u32;
    let installed_capacity_kw = f64::from(module_count) * module_power_kw;

    Ok(PowerChainResult {
        propulsion_kw,
        motor_input_kw,
        inverter_input_kw,
        battery_kw: assumptions.battery_power_kw,
        dc_bus_kw,
        dcdc_input_kw,
        bop_kw,
        fc_gross_kw,
        target_utilisation: assumptions.fc_target_utilisation,
        required_capacity_kw,
        module_power_kw,
        module_count,
        installed_capacity_kw,
        actual_utilisation: fc_gross_kw / installed_capacity_kw,
    })
}
