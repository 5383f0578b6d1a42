use crate::dim::DomainValue;
use crate::error::TilerError;
use crate::layout::Layout;
use crate::shape::Domain;
use crate::subarray::Subarray;

/// Geometry shared by every tile of one dense write.
///
/// Computed once from the domain and the (unary) subarray; afterwards it
/// is read-only, so any number of threads may plan and materialize tiles
/// against it concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGeometry {
    pub(crate) dom_lo: Vec<i128>,
    pub(crate) tile_extents: Vec<u64>,
    pub(crate) sub: Vec<[i128; 2]>,
    pub(crate) cell_order: Layout,
    pub(crate) tile_order: Layout,
    pub(crate) sub_layout: Layout,
    tile_num: u64,
    cell_num_per_tile: u64,
    first_tile_coords: Vec<u64>,
    tile_strides: Vec<u64>,
    buf_strides: Vec<u64>,
    tile_grid_offsets: Vec<u64>,
}

impl TileGeometry {
    /// The subarray is assumed to lie inside the domain; only a rank
    /// mismatch is reported.
    pub fn new<T: DomainValue>(domain: &Domain<T>, subarray: &Subarray<T>) -> Result<Self, TilerError> {
        if domain.rank() != subarray.rank() {
            return Err(TilerError::DimensionMismatch {
                expected: domain.rank(),
                actual: subarray.rank(),
            });
        }

        let dom_lo: Vec<i128> = domain.dims().iter().map(|d| d.lo()).collect();
        let tile_extents = domain.tile_extents();
        let sub = subarray.widened();

        debug_assert!(
            domain
                .dims()
                .iter()
                .zip(subarray.ranges())
                .all(|(d, r)| d.domain()[0] <= r[0] && r[1] <= d.domain()[1]),
            "subarray exceeds the array domain"
        );

        // Tiles of the subarray's own grid, per dimension
        let sub_tile_nums: Vec<u64> = domain
            .dims()
            .iter()
            .zip(subarray.ranges())
            .map(|(d, r)| d.tile_num(*r))
            .collect();

        // Upper-left tile of the subarray, in the global tile grid
        let first_tile_coords = domain
            .dims()
            .iter()
            .zip(subarray.ranges())
            .map(|(d, r)| d.tile_coord(r[0]) as u64)
            .collect();

        let geometry = Self {
            tile_num: sub_tile_nums.iter().product(),
            cell_num_per_tile: domain.cell_num_per_tile(),
            first_tile_coords,
            tile_strides: domain.cell_order().strides(&tile_extents),
            buf_strides: subarray.layout().strides(subarray.spans()),
            tile_grid_offsets: domain.tile_order().strides(&sub_tile_nums),
            dom_lo,
            tile_extents,
            sub,
            cell_order: domain.cell_order(),
            tile_order: domain.tile_order(),
            sub_layout: subarray.layout(),
        };

        tracing::debug!(
            tile_num = geometry.tile_num,
            first_tile_coords = ?geometry.first_tile_coords,
            tile_strides = ?geometry.tile_strides,
            buf_strides = ?geometry.buf_strides,
            tile_grid_offsets = ?geometry.tile_grid_offsets,
            "computed dense tile geometry"
        );

        Ok(geometry)
    }

    pub fn rank(&self) -> usize {
        self.tile_extents.len()
    }

    /// Number of tiles intersecting the subarray
    pub fn tile_num(&self) -> u64 {
        self.tile_num
    }

    pub fn cell_num_per_tile(&self) -> u64 {
        self.cell_num_per_tile
    }

    /// Global tile-grid coordinates of the first tile intersecting the subarray
    pub fn first_tile_coords(&self) -> &[u64] {
        &self.first_tile_coords
    }

    /// Element jumps inside a tile, per dimension, in cell order
    pub fn tile_strides(&self) -> &[u64] {
        &self.tile_strides
    }

    /// Element jumps inside the input buffer, per dimension, in subarray order
    pub fn buf_strides(&self) -> &[u64] {
        &self.buf_strides
    }

    /// Mixed-radix weights decoding a tile id into subarray tile-grid coordinates
    pub fn tile_grid_offsets(&self) -> &[u64] {
        &self.tile_grid_offsets
    }

    pub fn tile_extents(&self) -> &[u64] {
        &self.tile_extents
    }
}
