use crate::grid::Seat;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeatingError>;

/// Boxed error handed back by an external solver
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SeatingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed instance at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid group size {0}: must be between 1 and 8")]
    InvalidGroupSize(usize),

    /// A seat was requested on a cell that is not Empty. Allocators only seat
    /// cells they have already checked, so this always means a bug upstream.
    #[error("Cannot seat at ({x}, {y}): seat is {found:?}, expected Empty")]
    InvalidSeatState { x: usize, y: usize, found: Seat },

    #[error("Group of {size} at ({x}, {y}) runs off the grid")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Search pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Exact solver '{solver}' failed")]
    ExternalSolver {
        solver: String,
        #[source]
        source: BoxError,
    },

    #[error("Strategy '{0}' needs an exact solver, but none is available")]
    SolverUnavailable(String),
}
