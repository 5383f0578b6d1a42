use core::fmt;

/// Integer type a dimension domain can be declared in.
///
/// All tiling arithmetic happens on the widened `i128` value, so products
/// of extents and offsets past the type bound never wrap.
pub trait DomainValue: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Widen to the accumulator type
    fn widen(self) -> i128;
}

macro_rules! impl_domain_value {
    ($($t:ty),*) => {
        $(
            impl DomainValue for $t {
                #[inline(always)]
                fn widen(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_domain_value!(i8, u8, i16, u16, i32, u32, i64, u64);

/// Number of cells in the inclusive range `[start, end]`.
///
/// `None` when the count does not fit in `u64`, which only happens for the
/// full range of a 64-bit type.
pub fn cell_span<T: DomainValue>(range: [T; 2]) -> Option<u64> {
    u64::try_from(range[1].widen() - range[0].widen() + 1).ok()
}

/// One axis of a dense array domain.
///
/// Convention:
/// - `domain` is the inclusive `[lo, hi]` bound
/// - `tile_extent` is the number of cells a tile spans on this axis
/// - the last tile may run past `hi`, it always has `tile_extent` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension<T> {
    name: String,
    domain: [T; 2],
    tile_extent: u64,
}

impl<T: DomainValue> Dimension<T> {
    /// # Panics
    /// Panics if `lo > hi`, `tile_extent == 0`, or the domain holds more
    /// than `u64::MAX` cells
    pub fn new(name: impl Into<String>, domain: [T; 2], tile_extent: u64) -> Self {
        assert!(domain[0] <= domain[1], "Dimension domain lower bound exceeds upper bound");
        assert!(tile_extent > 0, "Dimension tile extent must be positive");
        assert!(
            cell_span(domain).is_some(),
            "Dimension domain spans more than u64::MAX cells"
        );
        Self {
            name: name.into(),
            domain,
            tile_extent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> [T; 2] {
        self.domain
    }

    #[inline(always)]
    pub fn tile_extent(&self) -> u64 {
        self.tile_extent
    }

    /// Widened lower bound of the domain
    #[inline(always)]
    pub fn lo(&self) -> i128 {
        self.domain[0].widen()
    }

    /// Coordinate, in the global tile grid, of the tile holding `value`.
    ///
    /// Floored division, so it stays correct below zero.
    pub fn tile_coord(&self, value: T) -> i128 {
        (value.widen() - self.lo()).div_euclid(self.tile_extent as i128)
    }

    /// Number of tiles intersecting the inclusive range `[start, end]`.
    ///
    /// Never more than the cells of the range, so any range inside the
    /// domain fits; wider ranges saturate at `u64::MAX`.
    pub fn tile_num(&self, range: [T; 2]) -> u64 {
        u64::try_from(self.tile_coord(range[1]) - self.tile_coord(range[0]) + 1).unwrap_or(u64::MAX)
    }
}

/// Display format: `name: [lo, hi] / extent`
impl<T: DomainValue> fmt::Display for Dimension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}, {}] / {}",
            self.name, self.domain[0], self.domain[1], self.tile_extent
        )
    }
}
