use crate::{
    availability::AvailabilityIndex,
    constants::{MAX_GROUP_SIZE, MIN_GROUP_SIZE},
    demand::GroupDemand,
    error::{Result, SeatingError},
    grid::{Grid, Placement},
};
use rand::Rng;

/// Outcome of one greedy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreedyReport {
    /// Groups in the order they were seated
    pub placements: Vec<Placement>,
    /// Groups for which no legal start cell was left
    pub unplaced: GroupDemand,
}

/// Picks the start cell for a group of `size` that blocks the fewest free seats.
///
/// Candidates are visited in row-major order. On an equal count the current
/// best is replaced by the new candidate with probability `tie_swap_probability`.
pub fn best_position<R: Rng + ?Sized>(
    grid: &Grid,
    index: &AvailabilityIndex,
    size: usize,
    tie_swap_probability: f64,
    rng: &mut R,
) -> Option<Placement> {
    let mut best: Option<(usize, Placement)> = None;

    for &pos in index.legal_start_positions(size) {
        let candidate = Placement::at(pos, size);
        let badness = grid.disabled_seats(candidate);
        match best {
            Some((best_badness, _)) if badness > best_badness => {}
            Some((best_badness, _)) if badness == best_badness => {
                if rng.gen_bool(tie_swap_probability) {
                    best = Some((badness, candidate));
                }
            }
            _ => best = Some((badness, candidate)),
        }
    }

    best.map(|(_, placement)| placement)
}

/// Seats `demand` on `grid`, largest groups first.
///
/// Every group is put where it blocks the fewest free seats; the availability
/// index is rebuilt in full after each one. A group with no legal cell left
/// is recorded in [`GreedyReport::unplaced`] and the run goes on.
pub fn solve_greedy<R: Rng + ?Sized>(
    grid: &mut Grid,
    demand: &GroupDemand,
    tie_swap_probability: f64,
    rng: &mut R,
) -> Result<GreedyReport> {
    if !(0.0..=1.0).contains(&tie_swap_probability) {
        return Err(SeatingError::Config(format!(
            "tie swap probability must be between 0 and 1, got {tie_swap_probability}"
        )));
    }

    let mut index = AvailabilityIndex::build(grid);
    let mut placements = Vec::with_capacity(demand.total_groups());
    let mut unplaced = GroupDemand::default();

    for size in (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).rev() {
        for _ in 0..demand.count(size) {
            let Some(placement) = best_position(grid, &index, size, tie_swap_probability, rng)
            else {
                unplaced.add(size, 1)?;
                continue;
            };

            grid.place(placement)?;
            index.recompute_full(grid);
            log::debug!(
                "seated group of {size} at ({}, {})",
                placement.x,
                placement.y
            );
            placements.push(placement);
        }

        if unplaced.count(size) > 0 {
            log::warn!(
                "{} of {} groups of size {size} could not be seated",
                unplaced.count(size),
                demand.count(size)
            );
        }
    }

    Ok(GreedyReport {
        placements,
        unplaced,
    })
}
