//! Random cinema instances.

use crate::{
    constants::{GROUP_SIZE_WEIGHTS, MIN_GROUP_SIZE},
    demand::GroupDemand,
    error::{Result, SeatingError},
    grid::{Grid, Seat},
    instance::{Instance, RequestFormat, Requests},
};
use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub rows: usize,
    pub columns: usize,
    /// Every n-th row is an aisle (0 = none)
    pub aisle_row_every: usize,
    /// Every n-th column is an aisle (0 = none)
    pub aisle_column_every: usize,
    /// Chance that a remaining seat is removed
    pub blocked_fraction: f64,
    /// People to request, as a fraction of the free seats
    pub fill_fraction: f64,
    pub format: RequestFormat,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            rows: 10,
            columns: 10,
            aisle_row_every: 5,
            aisle_column_every: 5,
            blocked_fraction: 0.2,
            fill_fraction: 0.3,
            format: RequestFormat::Counts,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SeatingError::Config(format!(
                "generator needs at least one row and column, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(SeatingError::Config(format!(
                "generator grid of {}x{} seats is too large",
                self.columns, self.rows
            )));
        }
        for (name, value) in [
            ("blocked_fraction", self.blocked_fraction),
            ("fill_fraction", self.fill_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SeatingError::Config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn is_aisle(i: usize, every: usize) -> bool {
    every > 0 && (i + 1) % every == 0
}

fn generate_grid<R: Rng + ?Sized>(params: &GeneratorParams, rng: &mut R) -> Result<Grid> {
    let mut cells = Vec::with_capacity(params.rows * params.columns);
    for y in 0..params.rows {
        for x in 0..params.columns {
            let aisle = is_aisle(y, params.aisle_row_every) || is_aisle(x, params.aisle_column_every);
            // 通路でない席も一定確率で取り除く
            let seat = if aisle || rng.gen_bool(params.blocked_fraction) {
                Seat::Blocked
            } else {
                Seat::Empty
            };
            cells.push(seat);
        }
    }
    Grid::new(params.columns, params.rows, cells)
}

/// Group sizes drawn until they add up to `target` people
fn draw_groups<R: Rng + ?Sized>(target: f64, rng: &mut R) -> Result<Vec<usize>> {
    let sizes = WeightedIndex::new(GROUP_SIZE_WEIGHTS)
        .map_err(|e| SeatingError::Config(format!("invalid group size weights: {e}")))?;

    let mut groups = Vec::new();
    let mut people = 0;
    while (people as f64) < target {
        let size = sizes.sample(rng) + MIN_GROUP_SIZE;
        people += size;
        groups.push(size);
    }
    Ok(groups)
}

/// Builds a random instance named `name`
pub fn generate<R: Rng + ?Sized>(
    params: &GeneratorParams,
    name: &str,
    rng: &mut R,
) -> Result<Instance> {
    params.validate()?;

    let grid = generate_grid(params, rng)?;
    let target = params.fill_fraction * grid.capacity() as f64;
    let groups = draw_groups(target, rng)?;

    log::info!(
        "generated {}x{} grid with {} free seats and {} groups",
        grid.width(),
        grid.height(),
        grid.capacity(),
        groups.len()
    );

    let requests = match params.format {
        RequestFormat::Counts => Requests::Batch(GroupDemand::from_sizes(&groups)?),
        RequestFormat::Stream => Requests::Stream(groups),
    };

    Ok(Instance {
        name: name.to_string(),
        grid,
        requests,
    })
}
