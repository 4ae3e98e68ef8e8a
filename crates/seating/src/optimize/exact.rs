//! Boundary to an external exact solver.
//!
//! Nothing here solves anything. [`ExactProblem`] collects what a solver
//! needs (the seat map, the groups to seat, where each group may start and
//! which pairs of assignments are mutually exclusive), and [`solve_exact`]
//! writes the returned assignment back into the grid.

use crate::{
    availability::AvailabilityIndex,
    demand::GroupDemand,
    error::{BoxError, Result, SeatingError},
    grid::{Grid, Placement, Position},
    rules::{Violation, classify},
};
use itertools::{Itertools, iproduct};

/// Two assignments that cannot both be chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion {
    /// Index into [`ExactProblem::groups`] and the start it would take
    pub first: (usize, Placement),
    pub second: (usize, Placement),
    pub violation: Violation,
}

#[derive(Debug, Clone)]
pub struct ExactProblem {
    grid: Grid,
    index: AvailabilityIndex,
    demand: GroupDemand,
    groups: Vec<usize>,
}

impl ExactProblem {
    /// Snapshots `grid` and caps `demand` to the legal start positions of each size
    pub fn build(grid: &Grid, demand: &GroupDemand) -> Self {
        let index = AvailabilityIndex::build(grid);
        let demand = demand.capped_to(&index);
        let groups = demand.instances();
        Self {
            grid: grid.clone(),
            index,
            demand,
            groups,
        }
    }

    /// Seat map the assignment must fit into
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn demand(&self) -> &GroupDemand {
        &self.demand
    }

    /// One size per group to seat, largest first
    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    /// Cells where a group of `size` can start
    pub fn candidates(&self, size: usize) -> &[Position] {
        self.index.legal_start_positions(size)
    }

    /// Number of (group, start) pairs a solver has to decide on
    pub fn variable_count(&self) -> usize {
        self.groups.iter().map(|&s| self.candidates(s).len()).sum()
    }

    /// Starts for a group of `size` that conflict with `placed`
    fn conflicting_starts(
        &self,
        placed: Placement,
        size: usize,
    ) -> impl Iterator<Item = (Placement, Violation)> + '_ {
        // classify が違反を返しうるのはこの範囲だけ
        let (x, y) = (placed.x as isize, placed.y as isize);
        let xs = (x - size as isize - 1)..=(x + placed.size as isize + 1);
        iproduct!(-1isize..=1, xs).filter_map(move |(dy, cx)| {
            let cy = y + dy;
            if cx < 0 || cy < 0 {
                return None;
            }
            let (cx, cy) = (cx as usize, cy as usize);
            if !self.index.can_start(cx, cy, size) {
                return None;
            }
            let other = Placement::new(cx, cy, size);
            let violation = classify(placed, other);
            violation.is_violation().then_some((other, violation))
        })
    }

    /// Every pair of assignments for two different groups that would break a
    /// distancing rule
    pub fn exclusions(&self) -> impl Iterator<Item = Exclusion> + '_ {
        self.groups
            .iter()
            .copied()
            .enumerate()
            .tuple_combinations()
            .flat_map(move |((g1, s1), (g2, s2))| {
                self.candidates(s1).iter().flat_map(move |&start| {
                    let placed = Placement::at(start, s1);
                    self.conflicting_starts(placed, s2)
                        .map(move |(other, violation)| Exclusion {
                            first: (g1, placed),
                            second: (g2, other),
                            violation,
                        })
                })
            })
    }
}

/// External exact solver
pub trait ExactSolver {
    fn name(&self) -> &str;

    /// Returns the placements to commit. Groups left out stay unseated.
    fn solve(&self, problem: &ExactProblem) -> std::result::Result<Vec<Placement>, BoxError>;
}

/// Runs `solver` on `grid` and seats the assignment it returns.
///
/// `grid` is only written when every returned placement could be seated.
pub fn solve_exact(
    grid: &mut Grid,
    demand: &GroupDemand,
    solver: &dyn ExactSolver,
) -> Result<Vec<Placement>> {
    let problem = ExactProblem::build(grid, demand);
    log::info!(
        "exact solver '{}': {} groups, {} assignment variables",
        solver.name(),
        problem.groups().len(),
        problem.variable_count()
    );

    let external = |source: BoxError| SeatingError::ExternalSolver {
        solver: solver.name().to_string(),
        source,
    };

    let assignment = solver.solve(&problem).map_err(external)?;

    let returned = GroupDemand::from_sizes(&assignment.iter().map(|p| p.size).collect_vec())?;
    if let Some((size, count)) = returned
        .iter()
        .find(|&(size, count)| count > problem.demand().count(size))
    {
        return Err(external(
            format!(
                "returned {count} groups of size {size}, only {} requested",
                problem.demand().count(size)
            )
            .into(),
        ));
    }

    let mut staged = grid.clone();
    for placement in &assignment {
        staged.seat(placement.x, placement.y, placement.size)?;
    }
    *grid = staged;
    Ok(assignment)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::verify::verify;

    /// Returns a fixed answer
    pub(crate) struct FixedSolver(pub Vec<Placement>);

    impl ExactSolver for FixedSolver {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&self, _: &ExactProblem) -> std::result::Result<Vec<Placement>, BoxError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) struct FailingSolver;

    impl ExactSolver for FailingSolver {
        fn name(&self) -> &str {
            "failing"
        }

        fn solve(&self, _: &ExactProblem) -> std::result::Result<Vec<Placement>, BoxError> {
            Err("license expired".into())
        }
    }

    /// Tries every assignment; only usable on tiny instances
    pub(crate) struct BruteForceSolver;

    impl BruteForceSolver {
        fn search(
            problem: &ExactProblem,
            exclusions: &[Exclusion],
            group: usize,
            chosen: &mut Vec<(usize, Placement)>,
            best: &mut Vec<(usize, Placement)>,
        ) {
            let seated = |c: &[(usize, Placement)]| c.iter().map(|(_, p)| p.size).sum::<usize>();
            if group == problem.groups().len() {
                if seated(chosen) > seated(best) {
                    *best = chosen.clone();
                }
                return;
            }

            // このグループを座らせない場合
            Self::search(problem, exclusions, group + 1, chosen, best);

            let size = problem.groups()[group];
            for &start in problem.candidates(size) {
                let placement = Placement::at(start, size);
                let blocked = chosen.iter().any(|&(g, p)| {
                    exclusions.iter().any(|e| {
                        (e.first == (g, p) && e.second == (group, placement))
                            || (e.second == (g, p) && e.first == (group, placement))
                    })
                });
                if !blocked {
                    chosen.push((group, placement));
                    Self::search(problem, exclusions, group + 1, chosen, best);
                    chosen.pop();
                }
            }
        }
    }

    impl ExactSolver for BruteForceSolver {
        fn name(&self) -> &str {
            "brute-force"
        }

        fn solve(&self, problem: &ExactProblem) -> std::result::Result<Vec<Placement>, BoxError> {
            let exclusions: Vec<_> = problem.exclusions().collect();
            let mut best = Vec::new();
            Self::search(problem, &exclusions, 0, &mut Vec::new(), &mut best);
            Ok(best.into_iter().map(|(_, p)| p).collect())
        }
    }

    #[test]
    fn test_problem_caps_demand() {
        let grid = Grid::from_rows(&["0111"]).unwrap();
        let problem = ExactProblem::build(&grid, &GroupDemand::new([0, 5, 1, 1, 0, 0, 0, 0]));
        assert_eq!(problem.demand(), &GroupDemand::new([0, 2, 1, 0, 0, 0, 0, 0]));
        assert_eq!(problem.groups(), &[3, 2, 2]);
        assert_eq!(problem.variable_count(), 1 + 2 + 2);
    }

    #[test]
    fn test_exclusions_agree_with_classify() {
        let grid = Grid::filled(6, 3, crate::grid::Seat::Empty).unwrap();
        let problem = ExactProblem::build(&grid, &GroupDemand::new([1, 1, 0, 0, 0, 0, 0, 0]));
        let exclusions: Vec<_> = problem.exclusions().collect();

        // 総当たりで求めた違反ペアと一致する
        let mut expected = 0;
        for &a in problem.candidates(2) {
            for &b in problem.candidates(1) {
                let v = classify(Placement::at(a, 2), Placement::at(b, 1));
                if v.is_violation() {
                    expected += 1;
                    assert!(exclusions.contains(&Exclusion {
                        first: (0, Placement::at(a, 2)),
                        second: (1, Placement::at(b, 1)),
                        violation: v,
                    }));
                }
            }
        }
        assert_eq!(exclusions.len(), expected);
    }

    #[test]
    fn test_commits_assignment() {
        let mut grid = Grid::from_rows(&["11111"]).unwrap();
        let solver = FixedSolver(vec![Placement::new(0, 0, 2), Placement::new(4, 0, 1)]);
        let demand = GroupDemand::new([1, 1, 0, 0, 0, 0, 0, 0]);
        let placed = solve_exact(&mut grid, &demand, &solver).unwrap();
        assert_eq!(placed.len(), 2);
        assert_eq!(grid.to_string(), "1\n5\n22112\n");
        assert!(verify(&grid));
    }

    #[test]
    fn test_solver_failure_is_surfaced() {
        let mut grid = Grid::from_rows(&["11111"]).unwrap();
        let before = grid.clone();
        let demand = GroupDemand::new([1, 0, 0, 0, 0, 0, 0, 0]);
        match solve_exact(&mut grid, &demand, &FailingSolver) {
            Err(SeatingError::ExternalSolver { solver, source }) => {
                assert_eq!(solver, "failing");
                assert_eq!(source.to_string(), "license expired");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn test_overlapping_assignment_is_a_seat_error() {
        let mut grid = Grid::from_rows(&["11111"]).unwrap();
        let solver = FixedSolver(vec![Placement::new(0, 0, 2), Placement::new(1, 0, 1)]);
        let demand = GroupDemand::new([1, 1, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            solve_exact(&mut grid, &demand, &solver),
            Err(SeatingError::InvalidSeatState { x: 1, y: 0, .. })
        ));
        // 先に座れたグループも残さない
        assert_eq!(grid.to_string(), "1\n5\n11111\n");
    }

    #[test]
    fn test_out_of_bounds_assignment_leaves_grid_untouched() {
        let mut grid = Grid::from_rows(&["11111"]).unwrap();
        let solver = FixedSolver(vec![Placement::new(0, 0, 1), Placement::new(usize::MAX, 0, 1)]);
        let demand = GroupDemand::new([2, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            solve_exact(&mut grid, &demand, &solver),
            Err(SeatingError::OutOfBounds { .. })
        ));
        assert_eq!(grid.seated(), 0);
    }

    #[test]
    fn test_extra_groups_are_rejected() {
        let mut grid = Grid::from_rows(&["11111"]).unwrap();
        let solver = FixedSolver(vec![Placement::new(0, 0, 1), Placement::new(4, 0, 1)]);
        let demand = GroupDemand::new([1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            solve_exact(&mut grid, &demand, &solver),
            Err(SeatingError::ExternalSolver { .. })
        ));
    }

    #[test]
    fn test_brute_force_finds_optimum() {
        // 3人組を先に座らせると2人組が入らないが、2人組2つなら4人座れる
        let mut grid = Grid::from_rows(&["111111"]).unwrap();
        let demand = GroupDemand::new([0, 2, 1, 0, 0, 0, 0, 0]);
        solve_exact(&mut grid, &demand, &BruteForceSolver).unwrap();
        assert_eq!(grid.seated(), 4);
        assert!(verify(&grid));
    }
}
