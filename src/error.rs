//! Errors raised by the balance engine

use thiserror::Error;

/// Fatal outcomes of an evaluation. Any of these aborts the run with no
/// partial result bundle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid assumption `{name}` = {value}: {reason}")]
    InvalidAssumption {
        name: String,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown assumption key `{0}`")]
    UnknownAssumption(String),

    #[error(
        "infeasible anode recirculation: stoichiometry {stoichiometry} x utilisation {utilisation} = {product:.4}, must exceed 1"
    )]
    InfeasibleRecirculation {
        stoichiometry: f64,
        utilisation: f64,
        product: f64,
    },

    #[error("balance violation: {stream} computed as {value}, must be positive")]
    BalanceViolation { stream: &'static str, value: f64 },
}

pub type CalcResult<T> = Result<T, CalcError>;
