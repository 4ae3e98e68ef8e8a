/// Group settings
pub const MAX_GROUP_SIZE: usize = 8; // largest group a single booking can hold
pub const MIN_GROUP_SIZE: usize = 1;

/// Distancing rules (seats that must stay free between two groups)
pub const ROW_BUFFER: usize = 2; // same row
pub const DIAGONAL_BUFFER: usize = 1; // adjacent rows
pub const VERTICAL_BUFFER: usize = 1; // rows between two groups starting in the same column

/// Instance file digits
pub const BLOCKED_DIGIT: char = '0';
pub const EMPTY_DIGIT: char = '1';
pub const OCCUPIED_DIGIT: char = '2';
pub const STREAM_TERMINATOR: usize = 0; // end of an online arrival list

/// Solver defaults
pub const DEFAULT_TIE_SWAP_PROBABILITY: f64 = 0.1;
pub const DEFAULT_SEARCH_WORKERS: usize = 8;
pub const MAX_SEARCH_WORKERS: usize = 64;
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Generator: chance of drawing each group size, size 1 first
pub const GROUP_SIZE_WEIGHTS: [f64; MAX_GROUP_SIZE] = [0.2, 0.2, 0.2, 0.1, 0.1, 0.1, 0.05, 0.05];
