//! Reference design point for the 1 MW ammonia fuel cell tug
//!
//! These are the defaults behind `AssumptionSet::default()`. Everything the
//! engine reads goes through an `AssumptionSet`, never these constants directly.

// Unit conversions
pub const GRAMS_PER_KG: f64 = 1000.0;
pub const KG_PER_TONNE: f64 = 1000.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// Propulsion and power electronics
pub const PROPULSION_POWER_KW: f64 = 1000.0;
pub const MOTOR_EFFICIENCY: f64 = 0.98;
pub const INVERTER_EFFICIENCY: f64 = 0.95;
pub const BATTERY_POWER_KW: f64 = 50.0;       // hotel/battery load taken on the DC bus
pub const DCDC_EFFICIENCY: f64 = 0.97;
pub const BOP_FRACTION: f64 = 0.30;           // of fuel cell gross output

// PEM fuel cell stack
pub const FC_TARGET_UTILISATION: f64 = 0.85;
pub const FC_MODULE_POWER_KW: f64 = 200.0;
pub const FC_EFFICIENCY: f64 = 0.50;          // electrical, LHV basis

// Fuel properties
pub const LHV_H2_KWH_PER_KG: f64 = 33.33;
pub const LHV_NH3_KWH_PER_KG: f64 = 5.17;
pub const MOLAR_MASS_NH3: f64 = 17.03;        // g/mol
pub const MOLAR_MASS_H2: f64 = 2.016;         // g/mol
pub const MOLAR_MASS_N2: f64 = 28.01;         // g/mol
pub const NH3_LIQUID_DENSITY_KG_PER_M3: f64 = 682.0; // at -33 C

// Anode recirculation and purification
pub const ANODE_STOICHIOMETRY: f64 = 1.3;
pub const FUEL_UTILISATION: f64 = 0.85;
pub const PSA_RECOVERY: f64 = 0.75;

// Cracker and burner
pub const CRACKING_CONVERSION: f64 = 0.995;
pub const CRACKING_ENTHALPY_KJ_PER_MOL: f64 = 46.0;
pub const CRACKER_HEAT_LOSS_FRACTION: f64 = 0.10;
pub const BURNER_EFFICIENCY: f64 = 0.90;

// Bunkering
pub const ENDURANCE_HOURS: f64 = 12.0;
pub const STORAGE_BUFFER_FRACTION: f64 = 0.15;

// Economics
pub const OPERATING_HOURS_PER_YEAR: f64 = 3000.0;
pub const AMMONIA_PRICE_PER_TONNE: f64 = 900.0;
pub const DIESEL_PRICE_PER_TONNE: f64 = 800.0;
pub const CARBON_PRICE_PER_TONNE: f64 = 100.0;
pub const OTHER_COST_FRACTION: f64 = 0.10;    // maintenance, lubricants, crew extras
pub const DIESEL_SFC_KG_PER_KWH: f64 = 0.22;

// Lifecycle CO2 factors, t CO2 per t fuel
pub const DIESEL_CO2_FACTOR: f64 = 3.2;
pub const GREY_NH3_CO2_FACTOR: f64 = 1.9;
pub const BLUE_NH3_CO2_FACTOR: f64 = 0.2;
pub const GREEN_NH3_CO2_FACTOR: f64 = 0.0;
