//! Annual OPEX and lifecycle CO2 against a diesel tug of the same duty

use crate::assumptions::AssumptionSet;
use crate::constants::KG_PER_TONNE;
use crate::models::{EconomicsResult, FuelOpex, PathwayEmissions, ResultBundle};

fn fuel_opex(tonnes_per_year: f64, price: f64, co2_factor: f64, a: &AssumptionSet) -> FuelOpex {
    let fuel_cost = tonnes_per_year * price;
    let carbon_cost = tonnes_per_year * co2_factor * a.carbon_price_per_tonne;
    let other_cost = a.other_cost_fraction * (fuel_cost + carbon_cost);
    FuelOpex {
        tonnes_per_year,
        fuel_cost,
        carbon_cost,
        other_cost,
        total: fuel_cost + carbon_cost + other_cost,
    }
}

/// Compare the ammonia plant of `bundle` with a diesel baseline.
///
/// Diesel burn is taken at the propulsion target only; the battery load is
/// counted against ammonia alone.
pub fn compare_with_diesel(bundle: &ResultBundle) -> EconomicsResult {
    let a = &bundle.assumptions;
    let hours = a.operating_hours_per_year;

    let nh3_t = bundle.ammonia.nh3_kg_h * hours / KG_PER_TONNE;
    let diesel_t = bundle.power.propulsion_kw * hours * a.diesel_sfc_kg_per_kwh / KG_PER_TONNE;

    let ammonia = fuel_opex(
        nh3_t,
        a.ammonia_price_per_tonne,
        a.ammonia_pathway_co2_factor,
        a,
    );
    let diesel = fuel_opex(diesel_t, a.diesel_price_per_tonne, a.diesel_co2_factor, a);

    let diesel_co2 = diesel_t * a.diesel_co2_factor;
    let pathway = |name: &str, tonnes: f64, factor: f64| {
        let co2 = tonnes * factor;
        PathwayEmissions {
            name: name.to_string(),
            co2_factor: factor,
            co2_t_per_year: co2,
            change_vs_diesel: if diesel_co2 > 0.0 {
                co2 / diesel_co2 - 1.0
            } else {
                0.0
            },
            carbon_cost: co2 * a.carbon_price_per_tonne,
        }
    };

    let pathways = vec![
        pathway("Diesel", diesel_t, a.diesel_co2_factor),
        pathway("Grey NH3", nh3_t, a.grey_nh3_co2_factor),
        pathway("Blue NH3", nh3_t, a.blue_nh3_co2_factor),
        pathway("Green NH3", nh3_t, a.green_nh3_co2_factor),
    ];

    let opex_premium = (diesel.total > 0.0).then(|| ammonia.total / diesel.total);

    EconomicsResult {
        opex_premium,
        ammonia,
        diesel,
        pathways,
    }
}
