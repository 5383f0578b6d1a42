use crate::dim::{Dimension, DomainValue};
use crate::layout::Layout;

/// Domain wraps the ordered dimensions and the two array orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain<T> {
    dims: Vec<Dimension<T>>,
    cell_order: Layout,
    tile_order: Layout,
}

impl<T: DomainValue> Domain<T> {
    /// # Panics
    /// Panics if `dims` is empty
    pub fn new(dims: Vec<Dimension<T>>, cell_order: Layout, tile_order: Layout) -> Self {
        assert!(!dims.is_empty(), "Domain needs at least one dimension");
        Self {
            dims,
            cell_order,
            tile_order,
        }
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[Dimension<T>] {
        &self.dims
    }

    pub fn dim(&self, d: usize) -> &Dimension<T> {
        &self.dims[d]
    }

    /// Layout of the cells inside a tile
    pub fn cell_order(&self) -> Layout {
        self.cell_order
    }

    /// Layout of the tiles inside the domain
    pub fn tile_order(&self) -> Layout {
        self.tile_order
    }

    pub fn tile_extents(&self) -> Vec<u64> {
        self.dims.iter().map(|d| d.tile_extent()).collect()
    }

    /// Cells in one (full) tile
    pub fn cell_num_per_tile(&self) -> u64 {
        self.dims.iter().map(|d| d.tile_extent()).product()
    }

    /// Number of tiles intersecting the inclusive per-dimension ranges
    pub fn tile_num(&self, ranges: &[[T; 2]]) -> u64 {
        self.dims
            .iter()
            .zip(ranges.iter())
            .map(|(d, r)| d.tile_num(*r))
            .product()
    }
}

impl<T: DomainValue> std::fmt::Display for Domain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ") cells {} tiles {}", self.cell_order, self.tile_order)
    }
}
