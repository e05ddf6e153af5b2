//! The assumption table every stage reads from
//!
//! An `AssumptionSet` is built once (defaults, then overrides), validated,
//! and passed by reference into each stage. Stages never mutate it; a
//! different scenario is a different `AssumptionSet`.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{CalcError, CalcResult};

/// Valid range of a single assumption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// (0, inf)
    Positive,
    /// [0, inf)
    NonNegative,
    /// (0, 1]
    Fraction,
    /// (0, 1), for conversion stages that can never be lossless
    LossyFraction,
    /// [0, 1), for the self-referencing BOP share
    ShareOfSelf,
}

impl Domain {
    pub fn check(self, value: f64) -> Result<(), &'static str> {
        if !value.is_finite() {
            return Err("must be a finite number");
        }
        match self {
            Domain::Positive if value <= 0.0 => Err("must be greater than zero"),
            Domain::NonNegative if value < 0.0 => Err("must not be negative"),
            Domain::Fraction if value <= 0.0 || value > 1.0 => Err("must lie in (0, 1]"),
            Domain::LossyFraction if value <= 0.0 || value >= 1.0 => Err("must lie in (0, 1)"),
            Domain::ShareOfSelf if value < 0.0 || value >= 1.0 => Err("must lie in [0, 1)"),
            _ => Ok(()),
        }
    }
}

macro_rules! assumption_set {
    ($( $(#[$doc:meta])* $field:ident : $domain:ident = $default:expr ),+ $(,)?) => {
        /// Named scalar parameters for one operating point.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct AssumptionSet {
            $( $(#[$doc])* pub $field: f64, )+
        }

        impl Default for AssumptionSet {
            fn default() -> Self {
                Self { $( $field: $default, )+ }
            }
        }

        impl AssumptionSet {
            /// Every key recognised when assumptions are supplied externally.
            pub const KEYS: &'static [&'static str] = &[ $( stringify!($field), )+ ];

            pub fn get(&self, key: &str) -> Option<f64> {
                match key {
                    $( stringify!($field) => Some(self.$field), )+
                    _ => None,
                }
            }

            pub fn domain(key: &str) -> Option<Domain> {
                match key {
                    $( stringify!($field) => Some(Domain::$domain), )+
                    _ => None,
                }
            }

            fn slot(&mut self, key: &str) -> Option<&mut f64> {
                match key {
                    $( stringify!($field) => Some(&mut self.$field), )+
                    _ => None,
                }
            }
        }
    };
}

assumption_set! {
    /// Net shaft power at the propeller [kW]
    propulsion_power_kw: Positive = PROPULSION_POWER_KW,
    /// Terminal shaft stage, may be ideal
    motor_efficiency: Fraction = MOTOR_EFFICIENCY,
    inverter_efficiency: LossyFraction = INVERTER_EFFICIENCY,
    /// Load added on the DC bus [kW]
    battery_power_kw: NonNegative = BATTERY_POWER_KW,
    dcdc_efficiency: LossyFraction = DCDC_EFFICIENCY,
    /// Parasitic load as a share of fuel cell gross output
    bop_fraction: ShareOfSelf = BOP_FRACTION,
    fc_target_utilisation: Fraction = FC_TARGET_UTILISATION,
    /// Nameplate of one stack module [kW]
    fc_module_power_kw: Positive = FC_MODULE_POWER_KW,
    fc_efficiency: Fraction = FC_EFFICIENCY,
    lhv_h2_kwh_per_kg: Positive = LHV_H2_KWH_PER_KG,
    lhv_nh3_kwh_per_kg: Positive = LHV_NH3_KWH_PER_KG,
    /// [g/mol]
    molar_mass_nh3: Positive = MOLAR_MASS_NH3,
    /// [g/mol]
    molar_mass_h2: Positive = MOLAR_MASS_H2,
    /// [g/mol]
    molar_mass_n2: Positive = MOLAR_MASS_N2,
    /// Hydrogen supplied to the anode over hydrogen consumed (lambda)
    anode_stoichiometry: Positive = ANODE_STOICHIOMETRY,
    fuel_utilisation: Fraction = FUEL_UTILISATION,
    psa_recovery: Fraction = PSA_RECOVERY,
    cracking_conversion: Fraction = CRACKING_CONVERSION,
    /// Endothermic reaction enthalpy per mol NH3 [kJ/mol]
    cracking_enthalpy_kj_per_mol: Positive = CRACKING_ENTHALPY_KJ_PER_MOL,
    cracker_heat_loss_fraction: NonNegative = CRACKER_HEAT_LOSS_FRACTION,
    burner_efficiency: Fraction = BURNER_EFFICIENCY,
    nh3_liquid_density_kg_per_m3: Positive = NH3_LIQUID_DENSITY_KG_PER_M3,
    endurance_hours: Positive = ENDURANCE_HOURS,
    storage_buffer_fraction: NonNegative = STORAGE_BUFFER_FRACTION,
    operating_hours_per_year: Positive = OPERATING_HOURS_PER_YEAR,
    ammonia_price_per_tonne: NonNegative = AMMONIA_PRICE_PER_TONNE,
    diesel_price_per_tonne: NonNegative = DIESEL_PRICE_PER_TONNE,
    carbon_price_per_tonne: NonNegative = CARBON_PRICE_PER_TONNE,
    other_cost_fraction: NonNegative = OTHER_COST_FRACTION,
    diesel_sfc_kg_per_kwh: Positive = DIESEL_SFC_KG_PER_KWH,
    diesel_co2_factor: NonNegative = DIESEL_CO2_FACTOR,
    grey_nh3_co2_factor: NonNegative = GREY_NH3_CO2_FACTOR,
    blue_nh3_co2_factor: NonNegative = BLUE_NH3_CO2_FACTOR,
    green_nh3_co2_factor: NonNegative = GREEN_NH3_CO2_FACTOR,
    /// CO2 factor of the ammonia actually bunkered; green by default
    ammonia_pathway_co2_factor: NonNegative = GREEN_NH3_CO2_FACTOR,
}

impl AssumptionSet {
    /// Return a copy with one value replaced. Unknown keys are rejected;
    /// the value itself is checked later by `validate`.
    pub fn with(mut self, key: &str, value: f64) -> CalcResult<Self> {
        let slot = self
            .slot(key)
            .ok_or_else(|| CalcError::UnknownAssumption(key.to_string()))?;
        *slot = value;
        Ok(self)
    }

    pub fn with_overrides<'a, I>(self, overrides: I) -> CalcResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        overrides
            .into_iter()
            .try_fold(self, |set, (key, value)| set.with(key, value))
    }

    /// All (key, value) pairs in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::KEYS
            .iter()
            .filter_map(move |key| self.get(key).map(|value| (*key, value)))
    }

    /// Check every assumption against its domain.
    pub fn validate(&self) -> CalcResult<()> {
        self.validate_keys(Self::KEYS)
    }

    /// Check only the named assumptions. Stages call this for the keys they
    /// read so they fail fast when used outside the full pipeline.
    pub fn validate_keys(&self, keys: &[&str]) -> CalcResult<()> {
        for key in keys {
            let (Some(value), Some(domain)) = (self.get(key), Self::domain(key)) else {
                return Err(CalcError::UnknownAssumption(key.to_string()));
            };
            domain
                .check(value)
                .map_err(|reason| CalcError::InvalidAssumption {
                    name: key.to_string(),
                    value,
                    reason,
                })?;
        }
        Ok(())
    }
}

/// Parse a `key=value` override as given on the command line.
pub fn parse_override(text: &str) -> Result<(String, f64), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", text))?;
    let key = key.trim();
    if AssumptionSet::domain(key).is_none() {
        return Err(format!("unknown assumption key `{}`", key));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad value for `{}`: {}", key, e))?;
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AssumptionSet::default().validate().unwrap();
    }

    #[test]
    fn every_key_round_trips_through_get() {
        let set = AssumptionSet::default();
        assert_eq!(set.entries().count(), AssumptionSet::KEYS.len());
        assert_eq!(set.get("bop_fraction"), Some(0.30));
        assert_eq!(set.get("no_such_key"), None);
    }

    #[test]
    fn with_replaces_without_touching_original() {
        let base = AssumptionSet::default();
        let changed = base.clone().with("fc_efficiency", 0.55).unwrap();
        assert_eq!(changed.fc_efficiency, 0.55);
        assert_eq!(base.fc_efficiency, 0.50);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = AssumptionSet::default().with("warp_factor", 9.0).unwrap_err();
        assert_eq!(err, CalcError::UnknownAssumption("warp_factor".into()));
    }

    #[test]
    fn bop_fraction_of_one_is_invalid() {
        let set = AssumptionSet::default().with("bop_fraction", 1.0).unwrap();
        match set.validate() {
            Err(CalcError::InvalidAssumption { name, .. }) => assert_eq!(name, "bop_fraction"),
            other => panic!("expected InvalidAssumption, got {:?}", other),
        }
    }

    #[test]
    fn lossless_inverter_is_invalid_but_ideal_motor_is_not() {
        let ideal_motor = AssumptionSet::default().with("motor_efficiency", 1.0).unwrap();
        assert!(ideal_motor.validate().is_ok());

        let ideal_inverter = AssumptionSet::default()
            .with("inverter_efficiency", 1.0)
            .unwrap();
        assert!(ideal_inverter.validate().is_err());
    }

    #[test]
    fn zero_or_negative_efficiency_is_invalid() {
        for (key, value) in [
            ("motor_efficiency", 0.0),
            ("dcdc_efficiency", -0.5),
            ("fc_efficiency", 0.0),
        ] {
            let set = AssumptionSet::default().with(key, value).unwrap();
            match set.validate() {
                Err(CalcError::InvalidAssumption { name, .. }) => assert_eq!(name, key),
                other => panic!("{} = {} should be invalid, got {:?}", key, value, other),
            }
        }
    }

    #[test]
    fn nan_is_invalid() {
        let set = AssumptionSet::default().with("psa_recovery", f64::NAN).unwrap();
        assert!(set.validate().is_err());
    }

    #[test]
    fn parse_override_accepts_spaces() {
        let (key, value) = parse_override(" psa_recovery = 0.8 ").unwrap();
        assert_eq!(key, "psa_recovery");
        assert_eq!(value, 0.8);
        assert!(parse_override("psa_recovery").is_err());
        assert!(parse_override("nope=1").is_err());
        assert!(parse_override("psa_recovery=high").is_err());
    }
}
