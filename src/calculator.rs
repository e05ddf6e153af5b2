//! Plant balance calculator
//!
//! Runs the stages back from the propeller to the ammonia tank, each stage
//! consuming the previous stage's result:
//! power chain -> hydrogen balance -> ammonia feed -> thermal balance -> energy balance.

use tracing::{debug, warn};

use crate::ammonia::calculate_ammonia_feed;
use crate::assumptions::AssumptionSet;
use crate::energy::calculate_energy_balance;
use crate::error::{CalcError, CalcResult};
use crate::hydrogen::calculate_hydrogen_balance;
use crate::models::{Advisory, ResultBundle};
use crate::power::calculate_power_chain;
use crate::thermal::calculate_thermal_balance;

/// Solve `x = base + fraction * x` for `x`.
///
/// Both self-referencing relations in the plant are linear in the unknown:
/// gross fuel cell output carries its own BOP share, and cracker production
/// feeds its own PSA tail gas. Returns `None` when `fraction` is not in [0, 1).
pub fn solve_linear_self_reference(base: f64, fraction: f64) -> Option<f64> {
    if !(0.0..1.0).contains(&fraction) {
        return None;
    }
    Some(base / (1.0 - fraction))
}

/// Fail with a `BalanceViolation` unless `value` is strictly positive.
pub fn require_positive(stream: &'static str, value: f64) -> CalcResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::BalanceViolation { stream, value })
    }
}

/// Evaluate one operating point.
///
/// Validates the whole assumption set first, then runs every stage in order.
/// Any fatal error aborts with no partial result. A thermal shortfall or a
/// negative energy closure term is attached to the bundle as an advisory.
pub fn evaluate(assumptions: &AssumptionSet) -> CalcResult<ResultBundle> {
    assumptions.validate()?;

    let power = calculate_power_chain(assumptions.propulsion_power_kw, assumptions)?;
    debug!(
        fc_gross_kw = power.fc_gross_kw,
        modules = power.module_count,
        "power chain solved"
    );

    let hydrogen = calculate_hydrogen_balance(power.fc_gross_kw, assumptions)?;
    debug!(
        consumed_kg_h = hydrogen.consumed_kg_h,
        cracker_kg_h = hydrogen.cracker_production_kg_h,
        "hydrogen balance solved"
    );

    let ammonia = calculate_ammonia_feed(hydrogen.cracker_production_kg_h, assumptions)?;
    debug!(nh3_kg_h = ammonia.nh3_kg_h, "ammonia feed solved");

    let thermal = calculate_thermal_balance(
        ammonia.nh3_kg_h,
        hydrogen.combustor_feed_kg_h,
        assumptions,
    )?;

    let mut advisories = Vec::new();
    if !thermal.is_autothermal() {
        let advisory = Advisory::ThermalInfeasibility {
            surplus_kw: thermal.surplus_kw,
        };
        warn!(surplus_kw = thermal.surplus_kw, "{}", advisory);
        advisories.push(advisory);
    }

    let energy = calculate_energy_balance(&power, &ammonia, &thermal, assumptions)?;
    if !energy.is_closed_by_losses() {
        let advisory = Advisory::EnergyOveraccounted {
            other_losses_kw: energy.other_losses_kw,
        };
        warn!(other_losses_kw = energy.other_losses_kw, "{}", advisory);
        advisories.push(advisory);
    }
    debug!(
        efficiency = energy.system_efficiency,
        "energy balance closed"
    );

    Ok(ResultBundle {
        assumptions: assumptions.clone(),
        power,
        hydrogen,
        ammonia,
        thermal,
        energy,
        advisories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_reference_closed_form() {
        assert_eq!(solve_linear_self_reference(700.0, 0.3), Some(1000.0));
        assert_eq!(solve_linear_self_reference(42.0, 0.0), Some(42.0));
        assert_eq!(solve_linear_self_reference(1.0, 1.0), None);
        assert_eq!(solve_linear_self_reference(1.0, -0.1), None);
    }

    #[test]
    fn self_reference_satisfies_relation() {
        let x = solve_linear_self_reference(116.87, 0.25).unwrap();
        assert!((x - (116.87 + 0.25 * x)).abs() < 1e-9);
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("purge", 1.0).is_ok());
        assert!(matches!(
            require_positive("purge", 0.0),
            Err(CalcError::BalanceViolation { stream: "purge", .. })
        ));
        assert!(require_positive("purge", f64::NAN).is_err());
    }

    #[test]
    fn reference_design_point() {
        let bundle = evaluate(&AssumptionSet::default()).unwrap();

        assert_eq!(bundle.power.module_count, 10);
        assert!(
            (bundle.ammonia.nh3_kg_h - 882.0).abs() < 1.0,
            "NH3 feed should be ~882 kg/h: {}",
            bundle.ammonia.nh3_kg_h
        );
        assert!(bundle.advisories.is_empty());
        assert!(
            (bundle.energy.system_efficiency - 0.230).abs() < 0.002,
            "system efficiency should be ~23%: {}",
            bundle.energy.system_efficiency
        );
    }

    #[test]
    fn evaluation_is_repeatable() {
        let set = AssumptionSet::default();
        assert_eq!(evaluate(&set).unwrap(), evaluate(&set).unwrap());
    }

    #[test]
    fn invalid_assumption_aborts_before_any_stage() {
        let set = AssumptionSet::default().with("bop_fraction", 1.0).unwrap();
        assert!(matches!(
            evaluate(&set),
            Err(CalcError::InvalidAssumption { .. })
        ));
    }

    #[test]
    fn thermal_shortfall_is_advisory_not_fatal() {
        // A very lossy cracker cannot be heated by the waste hydrogen alone
        let set = AssumptionSet::default()
            .with("cracker_heat_loss_fraction", 2.0)
            .unwrap();
        let bundle = evaluate(&set).unwrap();

        assert!(bundle.thermal.surplus_kw < 0.0);
        assert!(!bundle.is_thermally_feasible());
        assert_eq!(bundle.energy.combustor_excess_kw, 0.0);
    }

    #[test]
    fn negative_energy_closure_is_advisory_not_fatal() {
        // Lossless BOP, cracker and burner with a low cracking enthalpy
        let set = AssumptionSet::default()
            .with_overrides([
                ("bop_fraction", 0.0),
                ("burner_efficiency", 1.0),
                ("cracker_heat_loss_fraction", 0.0),
                ("cracking_enthalpy_kj_per_mol", 40.0),
            ])
            .unwrap();
        assert!(set.validate().is_ok());
        let bundle = evaluate(&set).unwrap();

        assert!(bundle.energy.other_losses_kw < 0.0);
        assert!(bundle.advisories.iter().any(|a| matches!(
            a,
            Advisory::EnergyOveraccounted { other_losses_kw } if *other_losses_kw < 0.0
        )));
        let closure = (bundle.energy.total_output_kw() - bundle.energy.input_kw).abs();
        assert!(closure < 1e-6 * bundle.energy.input_kw, "closure: {}", closure);
    }
}
