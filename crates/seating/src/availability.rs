use crate::{
    constants::{MAX_GROUP_SIZE, MIN_GROUP_SIZE, ROW_BUFFER},
    grid::{Grid, Placement, Position, Seat},
};

/// Which start cells can hold a group of each size.
///
/// For every cell the index keeps the length of the run of Empty seats
/// starting there and extending to the right, capped at [`MAX_GROUP_SIZE`].
/// A group of size `s` can start at a cell exactly when that run is at least
/// `s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityIndex {
    width: usize,
    height: usize,
    runs: Vec<u8>,
    /// サイズごとの開始可能セル（行優先順）
    legal: Vec<Vec<Position>>,
}

impl AvailabilityIndex {
    pub fn build(grid: &Grid) -> Self {
        let mut index = Self {
            width: 0,
            height: 0,
            runs: Vec::new(),
            legal: vec![Vec::new(); MAX_GROUP_SIZE],
        };
        index.recompute_full(grid);
        index
    }

    /// Rebuilds the whole index from `grid`
    pub fn recompute_full(&mut self, grid: &Grid) {
        self.width = grid.width();
        self.height = grid.height();
        self.runs.clear();
        self.runs.resize(self.width * self.height, 0);

        for y in 0..self.height {
            self.scan_row(grid, y, 0, self.width - 1);
        }
        self.rebuild_lists();
    }

    /// Refreshes the index after `placement` was applied with [`Grid::place`].
    ///
    /// Only the rows touched by the placement and its buffer change, and in
    /// those rows only the columns whose run can reach a modified seat.
    pub fn recompute_local(&mut self, grid: &Grid, placement: Placement) {
        if grid.width() != self.width || grid.height() != self.height {
            self.recompute_full(grid);
            return;
        }

        let Placement { x, y, size } = placement;
        let reach = ROW_BUFFER + MAX_GROUP_SIZE - 1;
        let lo = x.saturating_sub(reach);
        let hi = (x + size + ROW_BUFFER - 1).min(self.width - 1);
        let rows = y.saturating_sub(1)..=(y + 1).min(self.height - 1);

        if lo <= hi {
            for row in rows {
                self.scan_row(grid, row, lo, hi);
            }
        }
        self.rebuild_lists();
    }

    /// Recomputes runs of `row` for columns `lo..=hi`, right to left.
    fn scan_row(&mut self, grid: &Grid, row: usize, lo: usize, hi: usize) {
        let base = row * self.width;
        let mut next = if hi + 1 < self.width {
            self.runs[base + hi + 1]
        } else {
            0
        };

        for x in (lo..=hi).rev() {
            let run = if grid.get(x, row) == Some(Seat::Empty) {
                (next + 1).min(MAX_GROUP_SIZE as u8)
            } else {
                0
            };
            self.runs[base + x] = run;
            next = run;
        }
    }

    fn rebuild_lists(&mut self) {
        for list in &mut self.legal {
            list.clear();
        }
        for (i, &run) in self.runs.iter().enumerate() {
            let pos = Position::new(i % self.width, i / self.width);
            for size in MIN_GROUP_SIZE..=run as usize {
                self.legal[size - 1].push(pos);
            }
        }
    }

    /// Length of the Empty run starting at `(x, y)`, capped at [`MAX_GROUP_SIZE`]
    pub fn run_length(&self, x: usize, y: usize) -> usize {
        if x < self.width && y < self.height {
            self.runs[y * self.width + x] as usize
        } else {
            0
        }
    }

    pub fn can_start(&self, x: usize, y: usize, size: usize) -> bool {
        (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) && self.run_length(x, y) >= size
    }

    /// Start cells for a group of `size`, in row-major order
    pub fn legal_start_positions(&self, size: usize) -> &[Position] {
        if (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            &self.legal[size - 1]
        } else {
            &[]
        }
    }

    pub fn legal_count(&self, size: usize) -> usize {
        self.legal_start_positions(size).len()
    }
}
