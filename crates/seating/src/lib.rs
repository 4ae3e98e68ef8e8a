pub mod availability;
pub mod config;
pub mod constants;
pub mod cost;
pub mod demand;
pub mod error;
pub mod generator;
pub mod grid;
pub mod instance;
pub mod optimize;
pub mod rules;
pub mod verify;

pub use availability::AvailabilityIndex;
pub use config::{Config, OnlineConfig, SolverConfig, Strategy, UpdateMode};
pub use constants::{DEFAULT_CONFIG_PATH, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
pub use cost::SeatCostMatrix;
pub use demand::GroupDemand;
pub use error::{Result, SeatingError};
pub use generator::{GeneratorParams, generate};
pub use grid::{Grid, Placement, Position, Seat};
pub use instance::{Instance, RequestFormat, Requests, parse_instance, read_instance};
pub use optimize::{ExactSolver, Method, Solution, solve_offline, solve_online};
pub use rules::{Violation, classify};
pub use verify::{find_violation, verify};
