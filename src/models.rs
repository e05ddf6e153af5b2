//! Result records produced by each stage of the plant balance

use std::fmt;

use serde::Serialize;

use crate::assumptions::AssumptionSet;

/// Power chain, shaft back to fuel cell terminals. All powers in kW.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerChainResult {
    pub propulsion_kw: f64,
    pub motor_input_kw: f64,
    pub inverter_input_kw: f64,
    pub battery_kw: f64,
    /// Inverter input plus battery load
    pub dc_bus_kw: f64,
    pub dcdc_input_kw: f64,
    pub bop_kw: f64,
    pub fc_gross_kw: f64,
    pub target_utilisation: f64,
    /// Continuous capacity needed to stay at the target utilisation
    pub required_capacity_kw: f64,
    pub module_power_kw: f64,
    pub module_count: u32,
    pub installed_capacity_kw: f64,
    pub actual_utilisation: f64,
}

impl PowerChainResult {
    /// Sum of motor, inverter and DC/DC conversion losses
    pub fn electronics_loss_kw(&self) -> f64 {
        (self.motor_input_kw - self.propulsion_kw)
            + (self.inverter_input_kw - self.motor_input_kw)
            + (self.dcdc_input_kw - self.dc_bus_kw)
    }

    /// Power delivered to the shaft and the battery
    pub fn useful_kw(&self) -> f64 {
        self.propulsion_kw + self.battery_kw
    }
}

/// Hydrogen flows around the anode loop and PSA. All flows in kg/h.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrogenBalanceResult {
    pub consumed_kg_h: f64,
    pub anode_inlet_kg_h: f64,
    /// PSA product sent to the anode loop
    pub fresh_kg_h: f64,
    pub recycle_kg_h: f64,
    pub exhaust_kg_h: f64,
    pub purge_kg_h: f64,
    /// Hydrogen leaving the cracker, upstream of the PSA
    pub cracker_production_kg_h: f64,
    pub psa_tail_kg_h: f64,
    /// PSA tail gas plus anode purge
    pub combustor_feed_kg_h: f64,
}

/// Ammonia feed to the cracker and its by-products. Flows in kg/h.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmmoniaFeedResult {
    /// kg H2 per kg NH3 at full conversion
    pub h2_yield: f64,
    pub nh3_kg_h: f64,
    pub n2_kg_h: f64,
    /// Unconverted ammonia leaving with the cracker product
    pub nh3_slip_kg_h: f64,
}

/// Cracker heat demand against burner heat supply. Powers in kW.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalBalanceResult {
    pub nh3_mol_s: f64,
    pub reaction_heat_kw: f64,
    pub heat_losses_kw: f64,
    pub heat_required_kw: f64,
    /// LHV of the combustor hydrogen feed
    pub combustion_energy_kw: f64,
    pub heat_available_kw: f64,
    pub surplus_kw: f64,
    /// Heat available over heat required
    pub margin: f64,
}

impl ThermalBalanceResult {
    pub fn is_autothermal(&self) -> bool {
        self.surplus_kw >= 0.0
    }
}

/// Plant-level energy balance on an ammonia LHV basis. Powers in kW.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyBalanceResult {
    pub input_kw: f64,
    pub useful_kw: f64,
    pub fc_waste_heat_kw: f64,
    pub combustor_excess_kw: f64,
    pub electronics_loss_kw: f64,
    /// Closing term: input minus every accounted stream. Not modelled
    /// physically; it collects BOP consumption, burner and cracker losses,
    /// exhaust and unconverted ammonia.
    pub other_losses_kw: f64,
    pub system_efficiency: f64,
}

impl EnergyBalanceResult {
    pub fn total_output_kw(&self) -> f64 {
        self.useful_kw
            + self.fc_waste_heat_kw
            + self.combustor_excess_kw
            + self.electronics_loss_kw
            + self.other_losses_kw
    }

    /// False when the accounted streams already exceed the input
    pub fn is_closed_by_losses(&self) -> bool {
        self.other_losses_kw >= 0.0
    }

    /// Share of the input carried by a stream
    pub fn share(&self, stream_kw: f64) -> f64 {
        stream_kw / self.input_kw
    }
}

/// Non-fatal findings that still yield a complete bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    ThermalInfeasibility { surplus_kw: f64 },
    EnergyOveraccounted { other_losses_kw: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ThermalInfeasibility { surplus_kw } => write!(
                f,
                "cracker is not autothermal: burner heat falls {:.1} kW short",
                -surplus_kw
            ),
            Advisory::EnergyOveraccounted { other_losses_kw } => write!(
                f,
                "accounted streams exceed the ammonia input by {:.1} kW",
                -other_losses_kw
            ),
        }
    }
}

/// Everything one evaluation produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub assumptions: AssumptionSet,
    pub power: PowerChainResult,
    pub hydrogen: HydrogenBalanceResult,
    pub ammonia: AmmoniaFeedResult,
    pub thermal: ThermalBalanceResult,
    pub energy: EnergyBalanceResult,
    pub advisories: Vec<Advisory>,
}

impl ResultBundle {
    pub fn is_thermally_feasible(&self) -> bool {
        !self
            .advisories
            .iter()
            .any(|a| matches!(a, Advisory::ThermalInfeasibility { .. }))
    }
}

/// Bunker tank sizing for one mission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageResult {
    pub endurance_hours: f64,
    pub mission_nh3_kg: f64,
    pub buffered_nh3_kg: f64,
    /// Whole tonnes, rounded up
    pub tank_capacity_t: f64,
    pub tank_volume_m3: f64,
}

/// Annual operating cost of one fuel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelOpex {
    pub tonnes_per_year: f64,
    pub fuel_cost: f64,
    pub carbon_cost: f64,
    pub other_cost: f64,
    pub total: f64,
}

/// Lifecycle CO2 of one fuel pathway against the diesel baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayEmissions {
    pub name: String,
    pub co2_factor: f64,
    pub co2_t_per_year: f64,
    /// Relative change against diesel, e.g. -0.75 for 75 % less
    pub change_vs_diesel: f64,
    pub carbon_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicsResult {
    pub ammonia: FuelOpex,
    pub diesel: FuelOpex,
    /// Ammonia OPEX over diesel OPEX, None when the diesel baseline costs nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opex_premium: Option<f64>,
    /// Diesel baseline first, then grey, blue and green ammonia
    pub pathways: Vec<PathwayEmissions>,
}
