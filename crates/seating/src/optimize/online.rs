use crate::{
    config::{OnlineConfig, UpdateMode},
    constants::{MAX_GROUP_SIZE, MIN_GROUP_SIZE},
    cost::{Cost, SeatCostMatrix},
    error::{Result, SeatingError},
    grid::{Grid, Placement},
};
use rayon::prelude::*;

/// Cheapest cell of one partition as `(cost, flat index)`. Strictly lower
/// costs win, so the first cell in row-major order is kept on ties.
fn partition_min(cells: &[Cost], offset: usize) -> Option<(u32, usize)> {
    cells
        .iter()
        .enumerate()
        .fold(None, |best, (i, &cost)| match (cost, best) {
            (Some(c), Some((b, _))) if c >= b => best,
            (Some(c), _) => Some((c, offset + i)),
            (None, _) => best,
        })
}

/// Seats groups one by one as they arrive, without knowing what comes next.
///
/// Keeps a [`SeatCostMatrix`] for every group size. Each arrival goes to the
/// cheapest cell of its size; the search is split into row bands that a
/// dedicated thread pool scans in parallel.
pub struct OnlineAllocator {
    grid: Grid,
    costs: SeatCostMatrix,
    update: UpdateMode,
    pool: rayon::ThreadPool,
    rows_per_part: usize,
    placements: Vec<Placement>,
    turned_away: Vec<usize>,
}

impl OnlineAllocator {
    pub fn new(grid: Grid, config: &OnlineConfig) -> Result<Self> {
        let workers = config.workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("seat-search-{i}"))
            .build()?;
        let rows_per_part = grid.height().div_ceil(workers).max(1);
        let costs = SeatCostMatrix::build(&grid);

        log::info!(
            "online allocator: {}x{} grid, {workers} search workers, {} updates",
            grid.width(),
            grid.height(),
            config.update
        );

        Ok(Self {
            grid,
            costs,
            update: config.update,
            pool,
            rows_per_part,
            placements: Vec::new(),
            turned_away: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn costs(&self) -> &SeatCostMatrix {
        &self.costs
    }

    /// Groups seated so far, in arrival order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Sizes of the groups that found no seat, in arrival order
    pub fn turned_away(&self) -> &[usize] {
        &self.turned_away
    }

    /// Cheapest start cell for a group of `size`, first in row-major order on ties
    pub fn best_position(&self, size: usize) -> Option<Placement> {
        let layer = self.costs.layer(size);
        if layer.is_empty() {
            return None;
        }

        let chunk = self.rows_per_part * self.costs.width();
        let partials: Vec<Option<(u32, usize)>> = self.pool.install(|| {
            layer
                .par_chunks(chunk)
                .enumerate()
                .map(|(part, cells)| partition_min(cells, part * chunk))
                .collect()
        });

        // パーティション順に比較し、同点なら先のものを残す
        let best = partials
            .into_iter()
            .flatten()
            .fold(None, |best: Option<(u32, usize)>, candidate| match best {
                Some((b, _)) if candidate.0 >= b => best,
                _ => Some(candidate),
            });

        let width = self.costs.width();
        best.map(|(_, i)| Placement::new(i % width, i / width, size))
    }

    /// Handles one arrival. Returns where the group was seated, or None when
    /// no cell is left for it.
    pub fn arrive(&mut self, size: usize) -> Result<Option<Placement>> {
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            return Err(SeatingError::InvalidGroupSize(size));
        }

        let Some(placement) = self.best_position(size) else {
            log::debug!("turned away group of {size}");
            self.turned_away.push(size);
            return Ok(None);
        };

        self.grid.place(placement)?;
        match self.update {
            UpdateMode::Incremental => self.costs.recompute_local(&self.grid, placement),
            UpdateMode::Full => self.costs.recompute_full(&self.grid),
        }
        log::debug!(
            "seated group of {size} at ({}, {})",
            placement.x,
            placement.y
        );
        self.placements.push(placement);
        Ok(Some(placement))
    }

    /// Handles every arrival in order
    pub fn run(&mut self, arrivals: &[usize]) -> Result<()> {
        for &size in arrivals {
            self.arrive(size)?;
        }
        if !self.turned_away.is_empty() {
            log::warn!(
                "{} of {} groups were turned away",
                self.turned_away.len(),
                arrivals.len()
            );
        }
        Ok(())
    }
}
