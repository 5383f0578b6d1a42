use crate::geometry::TileGeometry;

/* ========================= Tile indexer ========================= */

impl TileGeometry {
    /// Coordinates of tile `id` inside the subarray's own tile grid.
    ///
    /// `id` is serialized in the tile order of the array domain and must be
    /// below [`TileGeometry::tile_num`].
    pub fn tile_coords_in_sub(&self, id: u64) -> Vec<u64> {
        debug_assert!(id < self.tile_num(), "tile id out of range");
        self.tile_order.idx2crd(id, self.tile_grid_offsets())
    }

    /// Coordinates of tile `id` in the global tile grid of the domain
    pub fn tile_coords_in_domain(&self, id: u64) -> Vec<u64> {
        self.tile_coords_in_sub(id)
            .iter()
            .zip(self.first_tile_coords())
            .map(|(c, f)| c + f)
            .collect()
    }

    /// Absolute inclusive cell range covered by tile `id`.
    ///
    /// Not clipped to the domain: an edge tile always spans its full extent,
    /// which is why the bounds are widened.
    pub fn tile_subarray(&self, id: u64) -> Vec<[i128; 2]> {
        self.tile_coords_in_domain(id)
            .iter()
            .enumerate()
            .map(|(d, &c)| {
                let ext = self.tile_extents[d] as i128;
                let lo = self.dom_lo[d] + c as i128 * ext;
                [lo, lo + ext - 1]
            })
            .collect()
    }
}
