use bytemuck::Pod;

use crate::error::TilerError;

/* ========================= Tile ========================= */

/// Fixed-size, uncompressed tile buffer with a write/read cursor.
///
/// Holds exactly `cell_num * cell_size` bytes laid out in the array's
/// cell order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    data: Vec<u8>,
    cell_size: u64,
    offset: u64,
}

impl Tile {
    /// Zero-initialized tile of `cell_num` cells
    pub fn new(cell_num: u64, cell_size: u64) -> Self {
        Self {
            data: vec![0; (cell_num * cell_size) as usize],
            cell_size,
            offset: 0,
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn cell_size(&self) -> u64 {
        self.cell_size
    }

    pub fn cell_num(&self) -> u64 {
        self.size() / self.cell_size
    }

    /// Current cursor position, in bytes
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn reset_offset(&mut self) {
        self.offset = 0;
    }

    /// Write `bytes` at the cursor and advance it
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TilerError> {
        self.write_at(bytes, self.offset)?;
        self.offset += bytes.len() as u64;
        Ok(())
    }

    /// Write `bytes` at byte `offset`; the cursor does not move
    pub fn write_at(&mut self, bytes: &[u8], offset: u64) -> Result<(), TilerError> {
        let range = self.checked_range(offset, bytes.len() as u64)?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Fill `out` from the cursor and advance it
    pub fn read(&mut self, out: &mut [u8]) -> Result<(), TilerError> {
        let range = self.checked_range(self.offset, out.len() as u64)?;
        out.copy_from_slice(&self.data[range]);
        self.offset += out.len() as u64;
        Ok(())
    }

    /// Bytes at `offset` of length `len`
    pub fn bytes_at(&self, offset: u64, len: u64) -> Result<&[u8], TilerError> {
        let range = self.checked_range(offset, len)?;
        Ok(&self.data[range])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Decode every cell as one `V`.
    ///
    /// # Panics
    /// Panics if `V` is not exactly `cell_size` bytes
    pub fn values<V: Pod>(&self) -> Vec<V> {
        let width = std::mem::size_of::<V>();
        assert_eq!(
            width as u64, self.cell_size,
            "Tile cell size does not match the decoded value type"
        );
        self.data
            .chunks_exact(width)
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    fn checked_range(&self, offset: u64, len: u64) -> Result<std::ops::Range<usize>, TilerError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.size() => Ok(offset as usize..end as usize),
            _ => Err(TilerError::TileOverflow {
                offset,
                len,
                size: self.size(),
            }),
        }
    }
}

/// Overwrite every cell of `tile` with `fill_value`, copying up to
/// `batch_cells` cells per write instead of one cell at a time.
///
/// The cursor is left at the start of the tile.
pub fn fill_tile(tile: &mut Tile, fill_value: &[u8], batch_cells: u64) -> Result<(), TilerError> {
    debug_assert_eq!(fill_value.len() as u64, tile.cell_size());
    let cell_num = tile.cell_num();
    let batch_cells = batch_cells.clamp(1, cell_num.max(1));
    let batch = fill_value.repeat(batch_cells as usize);

    tile.reset_offset();
    let mut remaining = cell_num;
    while remaining > 0 {
        let cells = remaining.min(batch_cells);
        tile.write(&batch[..(cells * tile.cell_size()) as usize])?;
        remaining -= cells;
    }
    tile.reset_offset();

    Ok(())
}
