/// Coordinate counter over inclusive per-dimension ranges.
///
/// Advances lexicographically: the last dimension moves fastest and wraps
/// into the one before it, like an odometer. The rank is a runtime value.
pub struct Odometer<'a> {
    ranges: &'a [[u64; 2]],
    current: Vec<u64>,
}

impl<'a> Odometer<'a> {
    pub fn new(ranges: &'a [[u64; 2]]) -> Self {
        Self {
            ranges,
            current: ranges.iter().map(|r| r[0]).collect(),
        }
    }

    pub fn coords(&self) -> &[u64] {
        &self.current
    }

    /// Step to the next coordinate.
    ///
    /// Returns the outermost dimension whose counter changed without
    /// wrapping, or `None` once every dimension wrapped (iteration done).
    pub fn advance(&mut self) -> Option<usize> {
        for d in (0..self.current.len()).rev() {
            self.current[d] += 1;
            if self.current[d] <= self.ranges[d][1] {
                return Some(d);
            }
            self.current[d] = self.ranges[d][0];
        }
        None
    }
}

/// Iterator over every coordinate of a block of inclusive ranges
pub struct RangeIter<'a> {
    odometer: Odometer<'a>,
    done: bool,
}

impl<'a> RangeIter<'a> {
    pub fn new(ranges: &'a [[u64; 2]]) -> Self {
        Self {
            done: ranges.iter().any(|r| r[0] > r[1]),
            odometer: Odometer::new(ranges),
        }
    }
}

impl Iterator for RangeIter<'_> {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.odometer.coords().to_vec();
        if self.odometer.advance().is_none() {
            self.done = true;
        }

        Some(result)
    }
}


#[test]
fn test_range_iter_2d() {
    let ranges = [[0, 2], [0, 1]];

    let coords: Vec<_> = RangeIter::new(&ranges).collect();

    assert_eq!(coords.len(), 6);
    assert_eq!(coords[0], vec![0, 0]);
    assert_eq!(coords[1], vec![0, 1]);
    assert_eq!(coords[2], vec![1, 0]);
    assert_eq!(coords[5], vec![2, 1]);
}

#[test]
fn test_range_iter_3d_offset_ranges() {
    let ranges = [[1, 2], [3, 5], [2, 3]];

    let coords: Vec<_> = RangeIter::new(&ranges).collect();

    // 2 * 3 * 2
    assert_eq!(coords.len(), 12);
    assert_eq!(coords[0], vec![1, 3, 2]);
    assert_eq!(coords[11], vec![2, 5, 3]);
}
