pub mod exact;
pub mod greedy;
pub mod online;

pub use crate::config::Strategy;
pub use exact::{ExactProblem, ExactSolver, Exclusion, solve_exact};
pub use greedy::{GreedyReport, solve_greedy};
pub use online::OnlineAllocator;

use crate::{
    config::{OnlineConfig, SolverConfig},
    demand::GroupDemand,
    error::{Result, SeatingError},
    grid::Grid,
    verify::verify,
};
use rand::{SeedableRng, rngs::StdRng};
use std::fmt;
use strum_macros::Display;

/// Which allocator produced a [`Solution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    Greedy,
    Exact,
    Online,
}

/// 求解結果
#[derive(Debug, Clone)]
pub struct Solution {
    pub grid: Grid,
    pub method: Method,
    /// People seated
    pub seated: usize,
    /// People asked for
    pub requested: usize,
    /// Groups that got no seat
    pub unplaced: GroupDemand,
    /// No two seated groups break a distancing rule
    pub valid: bool,
}

impl Solution {
    fn new(grid: Grid, method: Method, requested: usize, unplaced: GroupDemand) -> Self {
        let seated = grid.seated();
        let valid = verify(&grid);
        Self {
            grid,
            method,
            seated,
            requested,
            unplaced,
            valid,
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seated {} out of {}", self.seated, self.requested)
    }
}

fn run_greedy(grid: &Grid, demand: &GroupDemand, config: &SolverConfig) -> Result<Solution> {
    let seed = config.seed_or_random();
    log::info!("greedy seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut grid = grid.clone();
    let report = solve_greedy(&mut grid, demand, config.tie_swap_probability, &mut rng)?;
    Ok(Solution::new(
        grid,
        Method::Greedy,
        demand.total_people(),
        report.unplaced,
    ))
}

fn run_exact(grid: &Grid, demand: &GroupDemand, solver: &dyn ExactSolver) -> Result<Solution> {
    let mut grid = grid.clone();
    let placements = solve_exact(&mut grid, demand, solver)?;
    let seated = GroupDemand::from_sizes(&placements.iter().map(|p| p.size).collect::<Vec<_>>())?;
    Ok(Solution::new(
        grid,
        Method::Exact,
        demand.total_people(),
        demand.saturating_sub(&seated),
    ))
}

/// Seats a known demand on a copy of `grid` with the configured strategy.
///
/// `exact` is the external solver used by [`Strategy::Exact`] and
/// [`Strategy::GreedyExactFallback`]; nothing in this crate provides one.
pub fn solve_offline(
    grid: &Grid,
    demand: &GroupDemand,
    config: &SolverConfig,
    exact: Option<&dyn ExactSolver>,
) -> Result<Solution> {
    log::info!(
        "solving {}x{} grid with {} groups ({} people), strategy {}",
        grid.width(),
        grid.height(),
        demand.total_groups(),
        demand.total_people(),
        config.strategy
    );

    match config.strategy {
        Strategy::Greedy => run_greedy(grid, demand, config),
        Strategy::Exact => {
            let solver =
                exact.ok_or_else(|| SeatingError::SolverUnavailable(Strategy::Exact.to_string()))?;
            run_exact(grid, demand, solver)
        }
        Strategy::GreedyExactFallback => {
            let greedy = run_greedy(grid, demand, config)?;
            if greedy.seated >= greedy.requested {
                return Ok(greedy);
            }

            let Some(solver) = exact else {
                log::warn!(
                    "greedy left {} people unseated and no exact solver is available, keeping greedy result",
                    greedy.requested - greedy.seated
                );
                return Ok(greedy);
            };

            log::info!(
                "greedy seated {} out of {}, trying exact solver '{}'",
                greedy.seated,
                greedy.requested,
                solver.name()
            );
            let exact = run_exact(grid, demand, solver)?;
            if exact.seated > greedy.seated {
                Ok(exact)
            } else {
                Ok(greedy)
            }
        }
    }
}

/// Seats `arrivals` one at a time, in order, on a copy of `grid`
pub fn solve_online(grid: &Grid, arrivals: &[usize], config: &OnlineConfig) -> Result<Solution> {
    let mut allocator = OnlineAllocator::new(grid.clone(), config)?;
    allocator.run(arrivals)?;

    let unplaced = GroupDemand::from_sizes(allocator.turned_away())?;
    let requested = arrivals.iter().sum();
    Ok(Solution::new(
        allocator.into_grid(),
        Method::Online,
        requested,
        unplaced,
    ))
}
