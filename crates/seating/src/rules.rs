//! Distancing rules between two seated groups

use crate::{
    constants::{DIAGONAL_BUFFER, ROW_BUFFER, VERTICAL_BUFFER},
    grid::Placement,
};
use strum_macros::Display;

/// Which distancing rule two groups break, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Violation {
    None,
    Horizontal,
    Vertical,
    Diagonal,
}

impl Violation {
    pub fn is_violation(self) -> bool {
        self != Violation::None
    }
}

/// Classifies the pair `a`, `b`.
///
/// Groups on the same row need more than [`ROW_BUFFER`] columns between the
/// end of the left group and the start of the right one. Groups starting in
/// the same column need more than [`VERTICAL_BUFFER`] rows between them.
/// Groups on neighbouring rows need more than [`DIAGONAL_BUFFER`] columns.
///
/// The result does not depend on the order of the arguments.
pub fn classify(a: Placement, b: Placement) -> Violation {
    if a.x == b.x && a.y == b.y {
        return Violation::Horizontal;
    }

    let (x1, y1, s1) = (a.x as i64, a.y as i64, a.size as i64);
    let (x2, y2, s2) = (b.x as i64, b.y as i64, b.size as i64);

    // 左側グループの最終席から右側グループの先頭席までの距離
    let end_gap = if x1 < x2 {
        x2 - (x1 + s1 - 1)
    } else {
        x1 - (x2 + s2 - 1)
    };
    let dy = (y1 - y2).abs();

    if dy == 0 {
        if end_gap <= ROW_BUFFER as i64 {
            Violation::Horizontal
        } else {
            Violation::None
        }
    } else if x1 == x2 {
        if dy <= VERTICAL_BUFFER as i64 {
            Violation::Vertical
        } else {
            Violation::None
        }
    } else if dy == 1 && end_gap <= DIAGONAL_BUFFER as i64 {
        Violation::Diagonal
    } else {
        Violation::None
    }
}

/// Offsets `(dx, dy)` relative to the start of a group of `size` whose seats
/// become Blocked once the group is seated.
///
/// Two seats either side on the same row, and on the rows directly above and
/// below, every column from one left of the group to one right of it.
pub fn buffer_offsets(size: usize) -> impl Iterator<Item = (isize, isize)> {
    let s = size as isize;
    let row = ROW_BUFFER as isize;
    let diag = DIAGONAL_BUFFER as isize;

    let same_row = (-row..0).chain(s..s + row).map(|dx| (dx, 0));
    let adjacent = [-1isize, 1]
        .into_iter()
        .flat_map(move |dy| (-diag..s + diag).map(move |dx| (dx, dy)));

    same_row.chain(adjacent)
}
