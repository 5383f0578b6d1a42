//! Error types for dense tiling.

use thiserror::Error;

/// Errors raised while building or materializing dense tiles.
///
/// Every variant reflects a caller contract violation. Checks run before
/// any tile is touched, so a failed call leaves the output untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TilerError {
    /// The tile id is outside `[0, tile_num)`.
    #[error("Cannot get tile; invalid tile id {id} (tile count is {tile_num})")]
    InvalidTileId { id: u64, tile_num: u64 },

    /// The name does not refer to an attribute of the schema.
    #[error("Cannot get tile; '{0}' is not an attribute")]
    UnknownAttribute(String),

    /// A variable-length attribute was requested through the fixed-size path.
    #[error("Cannot get tile; '{0}' is not a fixed-sized attribute")]
    UnsupportedAttributeKind(String),

    /// The attribute exists but no buffer was handed to the tiler.
    #[error("No input buffer was set for attribute '{0}'")]
    MissingBuffer(String),

    /// Input buffer does not cover the subarray exactly.
    #[error("Buffer for attribute '{name}' holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// Fill value size differs from the attribute cell size.
    #[error("Fill value for attribute '{name}' has {fill_size} bytes, cell size is {cell_size}")]
    FillValueSizeMismatch {
        name: String,
        cell_size: u64,
        fill_size: u64,
    },

    /// Access past the end of a tile.
    #[error("Tile access of {len} bytes at offset {offset} exceeds tile size {size}")]
    TileOverflow { offset: u64, len: u64, size: u64 },

    /// Subarray rank differs from the domain rank.
    #[error("Subarray has {actual} ranges, domain has {expected} dimensions")]
    DimensionMismatch { expected: usize, actual: usize },
}
