use crate::{
    constants::{MAX_GROUP_SIZE, MIN_GROUP_SIZE},
    grid::{Grid, Placement},
};

/// Cost of starting a group at a cell: the number of Empty seats the group
/// would block. `None` where the group does not fit.
pub type Cost = Option<u32>;

/// Per-size cost layers over the whole grid, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCostMatrix {
    width: usize,
    height: usize,
    layers: Vec<Vec<Cost>>,
}

fn cell_cost(grid: &Grid, placement: Placement) -> Cost {
    grid.fits(placement)
        .then(|| grid.disabled_seats(placement) as u32)
}

impl SeatCostMatrix {
    pub fn build(grid: &Grid) -> Self {
        let mut matrix = Self {
            width: 0,
            height: 0,
            layers: vec![Vec::new(); MAX_GROUP_SIZE],
        };
        matrix.recompute_full(grid);
        matrix
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn recompute_full(&mut self, grid: &Grid) {
        self.width = grid.width();
        self.height = grid.height();

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let size = i + MIN_GROUP_SIZE;
            layer.clear();
            layer.extend(
                (0..grid.height())
                    .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
                    .map(|(x, y)| cell_cost(grid, Placement::new(x, y, size))),
            );
        }
    }

    /// Refreshes the costs that `placement` can have changed.
    ///
    /// A cost at `(cx, cy)` for size `g` reads its own row from `cx - 2` to
    /// `cx + g + 1` and the neighbouring rows from `cx - 1` to `cx + g`. The
    /// placement modified its row from `x - 2` to `x + s + 1` and the
    /// neighbouring rows from `x - 1` to `x + s`, so only rows within two of
    /// `y` are affected, over a span that narrows by one column per row.
    pub fn recompute_local(&mut self, grid: &Grid, placement: Placement) {
        if grid.width() != self.width || grid.height() != self.height {
            self.recompute_full(grid);
            return;
        }

        let width = self.width as isize;
        let height = self.height as isize;
        let (x, y, s) = (
            placement.x as isize,
            placement.y as isize,
            placement.size as isize,
        );

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let size = i + MIN_GROUP_SIZE;
            let g = size as isize;
            for dy in -2isize..=2 {
                let cy = y + dy;
                if cy < 0 || cy >= height {
                    continue;
                }
                let spread = 3 - dy.abs();
                let lo = (x - g - spread).max(0);
                let hi = (x + s + spread).min(width - 1);
                for cx in lo..=hi {
                    let (cx, cy) = (cx as usize, cy as usize);
                    layer[cy * self.width + cx] = cell_cost(grid, Placement::new(cx, cy, size));
                }
            }
        }
    }

    pub fn cost(&self, x: usize, y: usize, size: usize) -> Cost {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.layer(size).get(y * self.width + x).copied().flatten()
    }

    /// Row-major costs for one group size
    pub fn layer(&self, size: usize) -> &[Cost] {
        if (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            &self.layers[size - 1]
        } else {
            &[]
        }
    }
}
