use crate::{
    grid::{Grid, Placement, Seat},
    rules::{Violation, classify},
};
use itertools::Itertools;

/// Rebuilds the seated groups as maximal runs of Occupied seats, row-major.
///
/// Two groups seated side by side with no gap read back as one run; such a
/// layout already breaks the row rule, so nothing is lost for verification.
pub fn seated_groups(grid: &Grid) -> Vec<Placement> {
    let mut groups = Vec::new();
    for (y, row) in grid.rows().enumerate() {
        let mut start = None;
        for (x, &seat) in row.iter().enumerate() {
            match (seat == Seat::Occupied, start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    groups.push(Placement::new(s, y, x - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            groups.push(Placement::new(s, y, row.len() - s));
        }
    }
    groups
}

/// First pair of seated groups that breaks a distancing rule
pub fn find_violation(grid: &Grid) -> Option<(Placement, Placement, Violation)> {
    seated_groups(grid)
        .into_iter()
        .tuple_combinations()
        .map(|(a, b)| (a, b, classify(a, b)))
        .find(|(_, _, v)| v.is_violation())
}

/// True if no two seated groups break a distancing rule
pub fn verify(grid: &Grid) -> bool {
    match find_violation(grid) {
        Some((a, b, violation)) => {
            log::debug!("{violation} violation between {a:?} and {b:?}");
            false
        }
        None => true,
    }
}
