//! Tiler tuning knobs.

use std::env;

/// Environment variable overriding [`TilerConfig::fill_batch_cells`]
pub const FILL_BATCH_ENV: &str = "DENSE_TILER_FILL_BATCH_CELLS";

/// Default number of cells written per fill batch
pub const DEFAULT_FILL_BATCH_CELLS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilerConfig {
    /// Cells copied per write while pre-filling a tile with its fill value
    pub fill_batch_cells: u64,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            fill_batch_cells: DEFAULT_FILL_BATCH_CELLS,
        }
    }
}

impl TilerConfig {
    /// Defaults, overridden by the environment where set.
    ///
    /// Values that do not parse, or are zero, are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env::var(FILL_BATCH_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
        {
            config.fill_batch_cells = n;
        }
        config
    }

    /// A zero batch size is raised to one cell
    pub fn with_fill_batch_cells(mut self, cells: u64) -> Self {
        self.fill_batch_cells = cells.max(1);
        self
    }
}
