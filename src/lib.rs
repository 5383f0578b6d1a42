//! Dense tiling of single-range write buffers.
//!
//! A [`DenseTiler`] takes the flat, per-attribute buffers of a dense write
//! and produces every full tile they touch, padding cells outside the
//! written range with the attribute's fill value.

pub mod dim;
pub mod shape;
pub mod layout;
pub mod layout_iter;
pub mod subarray;

pub mod schema;
pub mod buffer;
pub mod error;
pub mod config;

pub mod geometry;
pub mod indices;
pub mod copy;
pub mod tile;
pub mod tiler;

pub use buffer::AttributeBuffers;
pub use config::TilerConfig;
pub use copy::CopyPlan;
pub use dim::{Dimension, DomainValue};
pub use error::TilerError;
pub use geometry::TileGeometry;
pub use layout::Layout;
pub use schema::{ArraySchema, Attribute};
pub use shape::Domain;
pub use subarray::Subarray;
pub use tile::Tile;
pub use tiler::DenseTiler;
