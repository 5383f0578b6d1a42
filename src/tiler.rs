// ============================================================
// tiler.rs
// ============================================================
//
// DenseTiler = tile geometry + borrowed attribute buffers
//
// Turns the flat buffers of a dense write into full tiles of the array,
// one tile id and one attribute at a time. Every call only reads the
// cached geometry, so tiles can be produced in any order and in parallel.
//
// ============================================================

use std::ops::Range;

use crate::buffer::AttributeBuffers;
use crate::config::TilerConfig;
use crate::copy::CopyPlan;
use crate::dim::DomainValue;
use crate::error::TilerError;
use crate::geometry::TileGeometry;
use crate::schema::{ArraySchema, Attribute};
use crate::subarray::Subarray;
use crate::tile::{fill_tile, Tile};

/// Creates dense tiles from the input buffers of a single-range subarray.
///
/// `T` is the domain type of the array. Tile ids run over
/// `0..tile_num()` and are serialized in the tile order of the domain.
pub struct DenseTiler<'a, T> {
    schema: &'a ArraySchema<T>,
    buffers: AttributeBuffers<'a>,
    geometry: TileGeometry,
    config: TilerConfig,
}

impl<'a, T: DomainValue> DenseTiler<'a, T> {
    pub fn new(
        schema: &'a ArraySchema<T>,
        subarray: &Subarray<T>,
        buffers: AttributeBuffers<'a>,
    ) -> Result<Self, TilerError> {
        Self::with_config(schema, subarray, buffers, TilerConfig::default())
    }

    /// Every buffer must name an attribute of `schema`, and fixed-size
    /// buffers must hold exactly one cell per subarray cell.
    pub fn with_config(
        schema: &'a ArraySchema<T>,
        subarray: &Subarray<T>,
        buffers: AttributeBuffers<'a>,
        config: TilerConfig,
    ) -> Result<Self, TilerError> {
        let cell_num = subarray.cell_num();
        for (name, bytes) in buffers.iter() {
            let attr = schema
                .attribute(name)
                .ok_or_else(|| TilerError::UnknownAttribute(name.to_string()))?;
            if attr.var_size() {
                continue;
            }
            let expected = cell_num * attr.cell_size();
            if bytes.len() as u64 != expected {
                return Err(TilerError::BufferSizeMismatch {
                    name: name.to_string(),
                    expected,
                    actual: bytes.len() as u64,
                });
            }
        }

        let geometry = TileGeometry::new(schema.domain(), subarray)?;

        Ok(Self {
            schema,
            buffers,
            geometry,
            config,
        })
    }

    /* ---------- geometry ---------- */

    /// Number of tiles intersecting the subarray
    pub fn tile_num(&self) -> u64 {
        self.geometry.tile_num()
    }

    pub fn tile_ids(&self) -> Range<u64> {
        0..self.tile_num()
    }

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &TilerConfig {
        &self.config
    }

    pub fn tile_strides(&self) -> &[u64] {
        self.geometry.tile_strides()
    }

    pub fn buf_strides(&self) -> &[u64] {
        self.geometry.buf_strides()
    }

    pub fn first_tile_coords(&self) -> &[u64] {
        self.geometry.first_tile_coords()
    }

    pub fn tile_grid_offsets(&self) -> &[u64] {
        self.geometry.tile_grid_offsets()
    }

    pub fn tile_coords_in_sub(&self, id: u64) -> Result<Vec<u64>, TilerError> {
        self.check_id(id)?;
        Ok(self.geometry.tile_coords_in_sub(id))
    }

    /// Cell range of tile `id` in global coordinates, not clipped to the domain
    pub fn tile_subarray(&self, id: u64) -> Result<Vec<[i128; 2]>, TilerError> {
        self.check_id(id)?;
        Ok(self.geometry.tile_subarray(id))
    }

    /// Copy plan of tile `id`. Attribute independent, so one plan serves
    /// every attribute of the tile.
    pub fn copy_plan(&self, id: u64) -> Result<CopyPlan, TilerError> {
        self.check_id(id)?;
        Ok(self.geometry.copy_plan(id))
    }

    /* ---------- materialization ---------- */

    /// Allocate and return the fixed-size tile `id` of attribute `name`
    pub fn get_tile(&self, id: u64, name: &str) -> Result<Tile, TilerError> {
        let (attr, buf) = self.check_request(id, name)?;
        let mut tile = Tile::new(self.geometry.cell_num_per_tile(), attr.cell_size());
        self.materialize(id, attr, buf, &mut tile)?;
        Ok(tile)
    }

    /// Like [`DenseTiler::get_tile`], writing into a caller-owned tile.
    ///
    /// The tile is reused when it already has the right shape and
    /// re-initialized otherwise. On error it is left untouched.
    pub fn get_tile_into(&self, id: u64, name: &str, tile: &mut Tile) -> Result<(), TilerError> {
        let (attr, buf) = self.check_request(id, name)?;
        let cell_num = self.geometry.cell_num_per_tile();
        if tile.cell_size() != attr.cell_size() || tile.cell_num() != cell_num {
            *tile = Tile::new(cell_num, attr.cell_size());
        }
        self.materialize(id, attr, buf, tile)
    }

    fn materialize(&self, id: u64, attr: &Attribute, buf: &[u8], tile: &mut Tile) -> Result<(), TilerError> {
        fill_tile(tile, attr.fill_value(), self.config.fill_batch_cells)?;

        let plan = self.geometry.copy_plan(id);
        let cell_size = attr.cell_size();
        let run_bytes = plan.copy_len * cell_size;

        plan.for_each_run(|buf_cell, tile_cell| {
            let start = buf_cell * cell_size;
            let src = buf
                .get(start as usize..(start + run_bytes) as usize)
                .ok_or_else(|| TilerError::BufferSizeMismatch {
                    name: attr.name().to_string(),
                    expected: start + run_bytes,
                    actual: buf.len() as u64,
                })?;
            tile.write_at(src, tile_cell * cell_size)
        })?;

        tile.reset_offset();

        tracing::trace!(
            id,
            attribute = attr.name(),
            copy_len = plan.copy_len,
            runs = plan.run_count(),
            "materialized dense tile"
        );

        Ok(())
    }

    /* ---------- checks ---------- */

    fn check_id(&self, id: u64) -> Result<(), TilerError> {
        if id >= self.tile_num() {
            let err = TilerError::InvalidTileId {
                id,
                tile_num: self.tile_num(),
            };
            tracing::debug!(%err, "rejected tile request");
            return Err(err);
        }
        Ok(())
    }

    fn check_request(&self, id: u64, name: &str) -> Result<(&'a Attribute, &'a [u8]), TilerError> {
        self.check_id(id)?;

        let result = match self.schema.attribute(name) {
            None => Err(TilerError::UnknownAttribute(name.to_string())),
            Some(attr) if attr.var_size() => Err(TilerError::UnsupportedAttributeKind(name.to_string())),
            Some(attr) => match self.buffers.get(name) {
                None => Err(TilerError::MissingBuffer(name.to_string())),
                Some(buf) => Ok((attr, buf)),
            },
        };

        if let Err(err) = &result {
            tracing::debug!(id, %err, "rejected tile request");
        }
        result
    }
}
