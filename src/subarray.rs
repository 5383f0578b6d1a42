use crate::dim::{cell_span, DomainValue};
use crate::layout::Layout;

/// A single dense range per dimension plus the cell order of the user
/// buffer that covers it.
///
/// Multi-range subarrays never reach the tiler; callers split them first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subarray<T> {
    ranges: Vec<[T; 2]>,
    spans: Vec<u64>,
    layout: Layout,
}

impl<T: DomainValue> Subarray<T> {
    /// # Panics
    /// Panics if any range has `start > end` or holds more than
    /// `u64::MAX` cells
    pub fn new(ranges: Vec<[T; 2]>, layout: Layout) -> Self {
        assert!(
            ranges.iter().all(|r| r[0] <= r[1]),
            "Subarray range start exceeds end"
        );
        let spans: Option<Vec<u64>> = ranges.iter().map(|r| cell_span(*r)).collect();
        let Some(spans) = spans else {
            panic!("Subarray range spans more than u64::MAX cells");
        };
        Self { ranges, spans, layout }
    }

    pub fn ranges(&self) -> &[[T; 2]] {
        &self.ranges
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn rank(&self) -> usize {
        self.ranges.len()
    }

    /// Per-dimension number of cells
    pub fn spans(&self) -> &[u64] {
        &self.spans
    }

    /// Total number of cells covered
    pub fn cell_num(&self) -> u64 {
        self.spans().iter().product()
    }

    /// Ranges widened to the accumulator type
    pub fn widened(&self) -> Vec<[i128; 2]> {
        self.ranges.iter().map(|r| [r[0].widen(), r[1].widen()]).collect()
    }
}
