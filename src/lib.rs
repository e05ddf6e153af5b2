//! Steady-state plant balance for an ammonia-hydrogen fuel cell tug.
//!
//! Starting from the propulsion power requirement the calculator works
//! upstream through the power electronics, the fuel cell stack, the anode
//! loop and PSA, the ammonia cracker and its burner, and closes with a plant
//! energy balance. Storage sizing, OPEX and emissions are computed from the
//! finished result.

pub mod ammonia;
pub mod assumptions;
pub mod calculator;
pub mod constants;
pub mod db;
pub mod economics;
pub mod energy;
pub mod error;
pub mod hydrogen;
pub mod import;
pub mod models;
pub mod power;
pub mod report;
pub mod storage;
pub mod thermal;

pub use assumptions::AssumptionSet;
pub use calculator::evaluate;
pub use error::{CalcError, CalcResult};
pub use models::ResultBundle;
