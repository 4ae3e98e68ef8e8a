use crate::{
    availability::AvailabilityIndex,
    constants::{MAX_GROUP_SIZE, MIN_GROUP_SIZE},
    error::{Result, SeatingError},
};
use std::fmt;

/// Number of groups requested for every size from 1 to 8
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupDemand {
    counts: [usize; MAX_GROUP_SIZE],
}

impl GroupDemand {
    /// `counts[i]` is the number of groups of size `i + 1`
    pub fn new(counts: [usize; MAX_GROUP_SIZE]) -> Self {
        Self { counts }
    }

    /// Tallies a list of group sizes
    pub fn from_sizes(sizes: &[usize]) -> Result<Self> {
        let mut demand = Self::default();
        for &size in sizes {
            demand.add(size, 1)?;
        }
        Ok(demand)
    }

    pub fn add(&mut self, size: usize, count: usize) -> Result<()> {
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            return Err(SeatingError::InvalidGroupSize(size));
        }
        self.counts[size - 1] += count;
        Ok(())
    }

    pub fn count(&self, size: usize) -> usize {
        if (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&size) {
            self.counts[size - 1]
        } else {
            0
        }
    }

    pub fn counts(&self) -> &[usize; MAX_GROUP_SIZE] {
        &self.counts
    }

    /// `(size, count)` pairs from size 1 to 8
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (i + MIN_GROUP_SIZE, count))
    }

    pub fn total_groups(&self) -> usize {
        self.counts.iter().sum()
    }

    /// People requested over all groups
    pub fn total_people(&self) -> usize {
        self.iter().map(|(size, count)| size * count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_groups() == 0
    }

    /// Caps each size to the number of cells where such a group can start.
    /// Extra copies could never be placed.
    pub fn capped_to(&self, index: &AvailabilityIndex) -> Self {
        let mut capped = *self;
        for (i, count) in capped.counts.iter_mut().enumerate() {
            *count = (*count).min(index.legal_count(i + MIN_GROUP_SIZE));
        }
        capped
    }

    /// Groups of `self` left after taking away `seated`
    pub fn saturating_sub(&self, seated: &GroupDemand) -> Self {
        let mut left = *self;
        for (count, taken) in left.counts.iter_mut().zip(seated.counts) {
            *count = count.saturating_sub(taken);
        }
        left
    }

    /// Every requested group as a size, one entry per instance, largest first
    pub fn instances(&self) -> Vec<usize> {
        self.iter()
            .rev()
            .flat_map(|(size, count)| std::iter::repeat_n(size, count))
            .collect()
    }
}

/// Counts separated by spaces, size 1 first
impl fmt::Display for GroupDemand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_totals() {
        let demand = GroupDemand::new([3, 0, 1, 0, 0, 0, 0, 2]);
        assert_eq!(demand.total_groups(), 6);
        assert_eq!(demand.total_people(), 3 + 3 + 16);
        assert_eq!(demand.count(8), 2);
        assert_eq!(demand.count(9), 0);
        assert!(!demand.is_empty());
        assert!(GroupDemand::default().is_empty());
    }

    #[test]
    fn test_from_sizes() {
        let demand = GroupDemand::from_sizes(&[1, 2, 2, 8]).unwrap();
        assert_eq!(demand.counts(), &[1, 2, 0, 0, 0, 0, 0, 1]);
        assert!(matches!(
            GroupDemand::from_sizes(&[3, 0]),
            Err(SeatingError::InvalidGroupSize(0))
        ));
    }

    #[test]
    fn test_capped_to_legal_positions() {
        // 長さ3の空席列が1つだけ
        let grid = Grid::from_rows(&["01110"]).unwrap();
        let index = AvailabilityIndex::build(&grid);
        let demand = GroupDemand::new([5, 5, 5, 5, 0, 0, 0, 0]);
        let capped = demand.capped_to(&index);
        assert_eq!(capped.counts(), &[3, 2, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_saturating_sub() {
        let demand = GroupDemand::new([2, 1, 0, 0, 0, 0, 0, 3]);
        let seated = GroupDemand::new([1, 2, 0, 0, 0, 0, 0, 3]);
        assert_eq!(
            demand.saturating_sub(&seated),
            GroupDemand::new([1, 0, 0, 0, 0, 0, 0, 0])
        );
    }

    #[test]
    fn test_instances_largest_first() {
        let demand = GroupDemand::new([2, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(demand.instances(), vec![3, 1, 1]);
        assert_eq!(demand.iter().next_back(), Some((8, 0)));
        assert_eq!(demand.iter().rev().nth(5), Some((3, 1)));
    }

    #[test]
    fn test_display() {
        let demand = GroupDemand::new([1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(demand.to_string(), "1 2 3 4 5 6 7 8");
    }
}
