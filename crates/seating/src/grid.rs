use crate::{
    constants::{BLOCKED_DIGIT, EMPTY_DIGIT, MAX_GROUP_SIZE, MIN_GROUP_SIZE, OCCUPIED_DIGIT},
    error::{Result, SeatingError},
    rules::buffer_offsets,
};
use std::fmt;

/// State of a single seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    /// No seat here, or a seat inside the distancing buffer of a seated group
    Blocked,
    Empty,
    Occupied,
}

impl Seat {
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            BLOCKED_DIGIT => Some(Seat::Blocked),
            EMPTY_DIGIT => Some(Seat::Empty),
            OCCUPIED_DIGIT => Some(Seat::Occupied),
            _ => None,
        }
    }

    pub fn to_digit(self) -> char {
        match self {
            Seat::Blocked => BLOCKED_DIGIT,
            Seat::Empty => EMPTY_DIGIT,
            Seat::Occupied => OCCUPIED_DIGIT,
        }
    }
}

/// Cell coordinate: x is the column, y is the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A group of `size` people seated on row `y`, from column `x` to the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub size: usize,
}

impl Placement {
    pub fn new(x: usize, y: usize, size: usize) -> Self {
        Self { x, y, size }
    }

    pub fn at(pos: Position, size: usize) -> Self {
        Self::new(pos.x, pos.y, size)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Cells covered by the group itself
    pub fn footprint(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let y = self.y;
        (self.x..self.x + self.size).map(move |x| (x, y))
    }
}

/// Seat grid of a cinema, stored row-major in one flat buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Seat>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Seat>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SeatingError::InvalidGrid(format!(
                "grid must have at least one row and one column, got {width}x{height}"
            )));
        }
        let expected = Self::cell_count(width, height)?;
        if cells.len() != expected {
            return Err(SeatingError::InvalidGrid(format!(
                "expected {expected} cells for a {width}x{height} grid, got {}",
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn filled(width: usize, height: usize, seat: Seat) -> Result<Self> {
        let count = Self::cell_count(width, height)?;
        Self::new(width, height, vec![seat; count])
    }

    fn cell_count(width: usize, height: usize) -> Result<usize> {
        width.checked_mul(height).ok_or_else(|| {
            SeatingError::InvalidGrid(format!("grid of {width}x{height} seats is too large"))
        })
    }

    /// `size` seats from column `x` stay inside a row
    fn in_row(&self, x: usize, size: usize) -> bool {
        x < self.width && size <= self.width - x
    }

    /// Builds a grid from digit rows such as `["0110", "1111"]`
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(SeatingError::InvalidGrid(format!(
                    "row {y} has {} seats, expected {width}",
                    row.chars().count()
                )));
            }
            for c in row.chars() {
                let seat = Seat::from_digit(c).ok_or_else(|| {
                    SeatingError::InvalidGrid(format!("unknown seat digit '{c}' in row {y}"))
                })?;
                cells.push(seat);
            }
        }

        Self::new(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Seat> {
        if x < self.width && y < self.height {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Seat at `(x + dx, y + dy)`, or None outside the grid
    pub fn get_offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<Seat> {
        self.get(x.checked_add_signed(dx)?, y.checked_add_signed(dy)?)
    }

    pub fn is_free(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Seat::Empty)
    }

    /// True if every seat of the placement exists and is Empty
    pub fn fits(&self, placement: Placement) -> bool {
        (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&placement.size)
            && placement.y < self.height
            && self.in_row(placement.x, placement.size)
            && placement.footprint().all(|(x, y)| self.is_free(x, y))
    }

    /// Number of Empty seats that seating `placement` would turn into Blocked
    pub fn disabled_seats(&self, placement: Placement) -> usize {
        buffer_offsets(placement.size)
            .filter(|&(dx, dy)| {
                self.get_offset(placement.x, placement.y, dx, dy) == Some(Seat::Empty)
            })
            .count()
    }

    /// Occupies `size` seats starting at `(x, y)`.
    ///
    /// Every target seat must be Empty. Nothing is modified when the check fails.
    pub fn seat(&mut self, x: usize, y: usize, size: usize) -> Result<()> {
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            return Err(SeatingError::InvalidGroupSize(size));
        }
        if y >= self.height || !self.in_row(x, size) {
            return Err(SeatingError::OutOfBounds { x, y, size });
        }
        for cx in x..x + size {
            let found = self.cells[self.index(cx, y)];
            if found != Seat::Empty {
                return Err(SeatingError::InvalidSeatState { x: cx, y, found });
            }
        }
        for cx in x..x + size {
            let i = self.index(cx, y);
            self.cells[i] = Seat::Occupied;
        }
        Ok(())
    }

    /// Forces a seat to Blocked, whatever it was before
    pub fn block(&mut self, x: usize, y: usize) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(SeatingError::OutOfBounds { x, y, size: 1 });
        }
        let i = self.index(x, y);
        self.cells[i] = Seat::Blocked;
        Ok(())
    }

    /// Blocks the distancing buffer around `placement`, then seats the group
    pub fn place(&mut self, placement: Placement) -> Result<()> {
        if !self.fits(placement) {
            // 座席状態のエラーをそのまま返す
            return self.seat(placement.x, placement.y, placement.size);
        }

        let Placement { x, y, size } = placement;
        for (dx, dy) in buffer_offsets(size) {
            let (Some(bx), Some(by)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if self.is_free(bx, by) {
                self.block(bx, by)?;
            }
        }
        self.seat(x, y, size)
    }

    pub fn count(&self, seat: Seat) -> usize {
        self.cells.iter().filter(|&&s| s == seat).count()
    }

    /// Seats still available
    pub fn capacity(&self) -> usize {
        self.count(Seat::Empty)
    }

    /// People seated so far
    pub fn seated(&self) -> usize {
        self.count(Seat::Occupied)
    }

    pub fn row(&self, y: usize) -> &[Seat] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Seat]> {
        self.cells.chunks(self.width)
    }
}

/// Same layout as the instance files: height, width, then one digit row per line
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.height)?;
        writeln!(f, "{}", self.width)?;
        for row in self.rows() {
            let line: String = row.iter().map(|s| s.to_digit()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
