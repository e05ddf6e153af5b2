//! Bunker tank sizing for the mission endurance

use crate::assumptions::AssumptionSet;
use crate::constants::KG_PER_TONNE;
use crate::models::{AmmoniaFeedResult, StorageResult};

/// Size the ammonia tank for `endurance_hours` at the design feed rate.
pub fn size_storage(ammonia: &AmmoniaFeedResult, assumptions: &AssumptionSet) -> StorageResult {
    let mission_nh3_kg = ammonia.nh3_kg_h * assumptions.endurance_hours;
    let buffered_nh3_kg = mission_nh3_kg * (1.0 + assumptions.storage_buffer_fraction);

    StorageResult {
        endurance_hours: assumptions.endurance_hours,
        mission_nh3_kg,
        buffered_nh3_kg,
        tank_capacity_t: (buffered_nh3_kg / KG_PER_TONNE).ceil(),
        tank_volume_m3: buffered_nh3_kg / assumptions.nh3_liquid_density_kg_per_m3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_hour_tank() {
        let ammonia = AmmoniaFeedResult {
            h2_yield: 0.1776,
            nh3_kg_h: 890.0,
            n2_kg_h: 729.4,
            nh3_slip_kg_h: 4.4,
        };
        let s = size_storage(&ammonia, &AssumptionSet::default());
        assert!((s.mission_nh3_kg - 10680.0).abs() < 1e-9);
        assert!((s.buffered_nh3_kg - 12282.0).abs() < 1e-6);
        assert_eq!(s.tank_capacity_t, 13.0);
        assert!((s.tank_volume_m3 - 18.0).abs() < 0.05, "volume: {}", s.tank_volume_m3);
    }
}
