use thiserror::Error;

/// Top-level error type for the simulator workspace.
///
/// Every public entry point validates its arguments and fails with one of
/// these before touching shared state. A `pick` that finds no elevator is
/// not an error; the request falls back into the pending backlog.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("floor {floor} is outside the building (1..={num_floors})")]
    InvalidFloor { floor: u8, num_floors: u8 },

    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error("unit {unit} is not in the fleet roster (1..={num_units})")]
    InvalidUnitId { unit: u8, num_units: u8 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
