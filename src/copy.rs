use crate::error::TilerError;
use crate::geometry::TileGeometry;
use crate::layout::Layout;
use crate::layout_iter::Odometer;

/// How the cells of one tile are moved from the input buffer into it.
///
/// The copy starts at `buf_start` / `tile_start` and walks the nested loop
/// described by `dim_ranges` in row-major order (last range fastest). Every
/// step moves `copy_len` contiguous cells. `dim_ranges[i]` iterates
/// dimension `loop_dim_offset + i`; the strides are kept for every
/// dimension of the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    /// Contiguous cells moved per copy step
    pub copy_len: u64,
    /// Inclusive iteration bounds of the dimensions that were not folded
    pub dim_ranges: Vec<[u64; 2]>,
    /// Dimension index `dim_ranges[0]` refers to
    pub loop_dim_offset: usize,
    /// First cell to read from the buffer
    pub buf_start: u64,
    pub buf_strides: Vec<u64>,
    /// First cell to write in the tile
    pub tile_start: u64,
    pub tile_strides: Vec<u64>,
}

/// Everything the plan builder looks at, all in widened coordinates
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub subarray: &'a [[i128; 2]],
    pub tile: &'a [[i128; 2]],
    pub tile_extents: &'a [u64],
    pub buf_strides: &'a [u64],
    pub tile_strides: &'a [u64],
    pub buf_layout: Layout,
    pub cell_order: Layout,
}

/// Intersection of two sets of inclusive ranges
pub fn intersection(a: &[[i128; 2]], b: &[[i128; 2]]) -> Vec<[i128; 2]> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| [x[0].max(y[0]), x[1].min(y[1])])
        .collect()
}

/// Build the copy plan for one tile.
///
/// When buffer and tile share a cell order, trailing dimensions (in that
/// order) that the tile covers completely and that the subarray covers
/// completely are folded into one contiguous run.
pub fn build_copy_plan(input: &PlanInput<'_>) -> CopyPlan {
    let rank = input.subarray.len();
    let overlap = intersection(input.subarray, input.tile);
    debug_assert!(
        overlap.iter().all(|r| r[0] <= r[1]),
        "tile does not intersect the subarray"
    );

    let len = |d: usize| (overlap[d][1] - overlap[d][0] + 1) as u64;
    let folds = |d: usize| len(d) == input.tile_extents[d] && overlap[d] == input.subarray[d];

    let mut buf_start = 0;
    let mut tile_start = 0;
    for d in 0..rank {
        buf_start += (overlap[d][0] - input.subarray[d][0]) as u64 * input.buf_strides[d];
        tile_start += (overlap[d][0] - input.tile[d][0]) as u64 * input.tile_strides[d];
    }

    let whole_range = |dims: std::ops::Range<usize>| -> Vec<[u64; 2]> {
        dims.map(|d| [0, len(d) - 1]).collect()
    };

    let (copy_len, dim_ranges, loop_dim_offset) = if rank == 1 {
        (len(0), vec![[0, 0]], 0)
    } else if input.buf_layout != input.cell_order {
        (1, whole_range(0..rank), 0)
    } else {
        match input.cell_order {
            Layout::RowMajor => {
                // dims 0..kept stay in the loop
                let mut copy_len = len(rank - 1);
                let mut kept = rank - 1;
                while kept > 0 && folds(kept) {
                    copy_len *= len(kept - 1);
                    kept -= 1;
                }
                if kept == 0 {
                    (copy_len, vec![[0, 0]], 0)
                } else {
                    (copy_len, whole_range(0..kept), 0)
                }
            }
            Layout::ColMajor => {
                // dims first..rank stay in the loop
                let mut copy_len = len(0);
                let mut first = 1;
                while first < rank && folds(first - 1) {
                    copy_len *= len(first);
                    first += 1;
                }
                if first == rank {
                    (copy_len, vec![[0, 0]], 0)
                } else {
                    (copy_len, whole_range(first..rank), first)
                }
            }
        }
    };

    CopyPlan {
        copy_len,
        dim_ranges,
        loop_dim_offset,
        buf_start,
        buf_strides: input.buf_strides.to_vec(),
        tile_start,
        tile_strides: input.tile_strides.to_vec(),
    }
}

impl CopyPlan {
    /// Number of copy steps the plan performs
    pub fn run_count(&self) -> u64 {
        self.dim_ranges.iter().map(|r| r[1] - r[0] + 1).product()
    }

    /// Call `f(buf_cell, tile_cell)` for the start of every contiguous run,
    /// in plan order.
    ///
    /// Offsets are in cells; each run is `copy_len` cells long on both sides.
    /// Running it backwards (tile into buffer) reassembles the subarray.
    pub fn for_each_run<F>(&self, mut f: F) -> Result<(), TilerError>
    where
        F: FnMut(u64, u64) -> Result<(), TilerError>,
    {
        let loop_rank = self.dim_ranges.len();
        let stride = |strides: &[u64], i: usize| strides[self.loop_dim_offset + i];

        let mut buf_base = self.buf_start;
        let mut tile_base = self.tile_start;
        for (i, r) in self.dim_ranges.iter().enumerate() {
            buf_base += r[0] * stride(&self.buf_strides, i);
            tile_base += r[0] * stride(&self.tile_strides, i);
        }

        // offsets[i]: position with loops 0..=i at their current value
        let mut buf_offsets = vec![buf_base; loop_rank];
        let mut tile_offsets = vec![tile_base; loop_rank];
        let mut odometer = Odometer::new(&self.dim_ranges);

        loop {
            f(buf_offsets[loop_rank - 1], tile_offsets[loop_rank - 1])?;

            let Some(d) = odometer.advance() else {
                break;
            };

            buf_offsets[d] += stride(&self.buf_strides, d);
            tile_offsets[d] += stride(&self.tile_strides, d);
            for i in d + 1..loop_rank {
                buf_offsets[i] = buf_offsets[i - 1];
                tile_offsets[i] = tile_offsets[i - 1];
            }
        }

        Ok(())
    }
}

/* ============================================================
   Plans straight from the tile geometry
   ============================================================ */

impl TileGeometry {
    /// Copy plan for tile `id`; `id` must be below `tile_num()`
    pub fn copy_plan(&self, id: u64) -> CopyPlan {
        let tile = self.tile_subarray(id);
        build_copy_plan(&PlanInput {
            subarray: &self.sub,
            tile: &tile,
            tile_extents: &self.tile_extents,
            buf_strides: self.buf_strides(),
            tile_strides: self.tile_strides(),
            buf_layout: self.sub_layout,
            cell_order: self.cell_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dimension;
    use crate::shape::Domain;
    use crate::subarray::Subarray;

    fn geometry(
        dims: Vec<Dimension<i32>>,
        order: Layout,
        ranges: Vec<[i32; 2]>,
        sub_layout: Layout,
    ) -> TileGeometry {
        let domain = Domain::new(dims, order, order);
        TileGeometry::new(&domain, &Subarray::new(ranges, sub_layout)).unwrap()
    }

    fn dims_2d() -> Vec<Dimension<i32>> {
        vec![
            Dimension::new("d1", [1, 10], 5),
            Dimension::new("d2", [1, 30], 10),
        ]
    }

    fn check(
        plan: &CopyPlan,
        copy_len: u64,
        dim_ranges: &[[u64; 2]],
        buf_start: u64,
        tile_start: u64,
    ) {
        assert_eq!(plan.copy_len, copy_len, "copy_len of {:?}", plan);
        assert_eq!(plan.dim_ranges, dim_ranges, "dim_ranges of {:?}", plan);
        assert_eq!(plan.buf_start, buf_start, "buf_start of {:?}", plan);
        assert_eq!(plan.tile_start, tile_start, "tile_start of {:?}", plan);
    }

    #[test]
    fn plan_1d() {
        let dims = vec![Dimension::new("d", [1, 10], 5)];

        let g = geometry(dims.clone(), Layout::RowMajor, vec![[3, 6]], Layout::RowMajor);
        let p0 = g.copy_plan(0);
        check(&p0, 3, &[[0, 0]], 0, 2);
        assert_eq!(p0.buf_strides, vec![1]);
        assert_eq!(p0.tile_strides, vec![1]);
        check(&g.copy_plan(1), 1, &[[0, 0]], 3, 0);

        let g = geometry(dims.clone(), Layout::RowMajor, vec![[7, 8]], Layout::RowMajor);
        check(&g.copy_plan(0), 2, &[[0, 0]], 0, 1);

        let g = geometry(dims, Layout::RowMajor, vec![[7, 8]], Layout::ColMajor);
        check(&g.copy_plan(0), 2, &[[0, 0]], 0, 1);
    }

    #[test]
    fn plan_2d_row_row() {
        let g = geometry(dims_2d(), Layout::RowMajor, vec![[4, 6], [18, 22]], Layout::RowMajor);
        let p = g.copy_plan(0);
        check(&p, 3, &[[0, 1]], 0, 37);
        assert_eq!(p.buf_strides, vec![5, 1]);
        assert_eq!(p.tile_strides, vec![10, 1]);
        check(&g.copy_plan(1), 2, &[[0, 1]], 3, 30);
        check(&g.copy_plan(2), 3, &[[0, 0]], 10, 7);
        check(&g.copy_plan(3), 2, &[[0, 0]], 13, 0);

        let g = geometry(dims_2d(), Layout::RowMajor, vec![[3, 5], [13, 18]], Layout::RowMajor);
        let p = g.copy_plan(0);
        check(&p, 6, &[[0, 2]], 0, 22);
        assert_eq!(p.buf_strides, vec![6, 1]);
    }

    #[test]
    fn plan_2d_row_cells_col_buffer() {
        let g = geometry(dims_2d(), Layout::RowMajor, vec![[4, 6], [18, 22]], Layout::ColMajor);
        let p = g.copy_plan(0);
        check(&p, 1, &[[0, 1], [0, 2]], 0, 37);
        assert_eq!(p.buf_strides, vec![1, 3]);
        assert_eq!(p.tile_strides, vec![10, 1]);
        check(&g.copy_plan(1), 1, &[[0, 1], [0, 1]], 9, 30);
        check(&g.copy_plan(2), 1, &[[0, 0], [0, 2]], 2, 7);
        check(&g.copy_plan(3), 1, &[[0, 0], [0, 1]], 11, 0);

        let g = geometry(dims_2d(), Layout::RowMajor, vec![[3, 5], [13, 18]], Layout::ColMajor);
        check(&g.copy_plan(0), 1, &[[0, 2], [0, 5]], 0, 22);
    }

    #[test]
    fn plan_2d_col_cells_row_buffer() {
        let g = geometry(dims_2d(), Layout::ColMajor, vec![[4, 6], [18, 22]], Layout::RowMajor);
        let p = g.copy_plan(0);
        check(&p, 1, &[[0, 1], [0, 2]], 0, 38);
        assert_eq!(p.buf_strides, vec![5, 1]);
        assert_eq!(p.tile_strides, vec![1, 5]);
        check(&g.copy_plan(1), 1, &[[0, 0], [0, 2]], 10, 35);
        check(&g.copy_plan(2), 1, &[[0, 1], [0, 1]], 3, 3);
        check(&g.copy_plan(3), 1, &[[0, 0], [0, 1]], 13, 0);

        let g = geometry(dims_2d(), Layout::ColMajor, vec![[3, 5], [13, 18]], Layout::RowMajor);
        check(&g.copy_plan(0), 1, &[[0, 2], [0, 5]], 0, 12);
    }

    #[test]
    fn plan_2d_col_col() {
        let g = geometry(dims_2d(), Layout::ColMajor, vec![[4, 6], [18, 22]], Layout::ColMajor);
        let p = g.copy_plan(0);
        check(&p, 2, &[[0, 2]], 0, 38);
        assert_eq!(p.loop_dim_offset, 1);
        assert_eq!(p.buf_strides, vec![1, 3]);
        assert_eq!(p.tile_strides, vec![1, 5]);
        check(&g.copy_plan(1), 1, &[[0, 2]], 2, 35);
        check(&g.copy_plan(2), 2, &[[0, 1]], 9, 3);
        check(&g.copy_plan(3), 1, &[[0, 1]], 11, 0);

        let g = geometry(dims_2d(), Layout::ColMajor, vec![[3, 5], [13, 18]], Layout::ColMajor);
        check(&g.copy_plan(0), 3, &[[0, 5]], 0, 12);
    }

    #[test]
    fn aligned_subarray_collapses_to_one_run() {
        // subarray is exactly one tile
        let g = geometry(dims_2d(), Layout::RowMajor, vec![[6, 10], [11, 20]], Layout::RowMajor);
        let p = g.copy_plan(0);
        check(&p, 50, &[[0, 0]], 0, 0);
        assert_eq!(p.run_count(), 1);

        let g = geometry(dims_2d(), Layout::ColMajor, vec![[6, 10], [11, 20]], Layout::ColMajor);
        check(&g.copy_plan(0), 50, &[[0, 0]], 0, 0);

        // mismatched orders walk every cell
        let g = geometry(dims_2d(), Layout::RowMajor, vec![[6, 10], [11, 20]], Layout::ColMajor);
        let p = g.copy_plan(0);
        check(&p, 1, &[[0, 4], [0, 9]], 0, 0);
        assert_eq!(p.run_count(), 50);
    }

    #[test]
    fn partial_fold_3d() {
        let dims = vec![
            Dimension::new("a", [1, 8], 4),
            Dimension::new("b", [1, 6], 3),
            Dimension::new("c", [1, 4], 2),
        ];
        // c spans a whole tile and the whole subarray, b does not
        let g = geometry(dims.clone(), Layout::RowMajor, vec![[2, 4], [1, 2], [3, 4]], Layout::RowMajor);
        let p = g.copy_plan(0);
        check(&p, 4, &[[0, 2]], 0, 6);
        assert_eq!(p.loop_dim_offset, 0);

        // a spans a whole tile and the whole subarray in col-major, b does not
        let g = geometry(dims, Layout::ColMajor, vec![[5, 8], [2, 3], [1, 2]], Layout::ColMajor);
        let p = g.copy_plan(0);
        check(&p, 8, &[[0, 1]], 0, 4);
        assert_eq!(p.loop_dim_offset, 2);
    }

    #[test]
    fn runs_follow_strides() {
        let g = geometry(dims_2d(), Layout::RowMajor, vec![[4, 6], [18, 22]], Layout::ColMajor);
        let mut runs = Vec::new();
        g.copy_plan(1)
            .for_each_run(|b, t| {
                runs.push((b, t));
                Ok(())
            })
            .unwrap();
        assert_eq!(runs, vec![(9, 30), (12, 31), (10, 40), (13, 41)]);
    }

    #[test]
    fn col_major_runs_use_surviving_dimension_strides() {
        let g = geometry(dims_2d(), Layout::ColMajor, vec![[4, 6], [18, 22]], Layout::ColMajor);
        let mut runs = Vec::new();
        g.copy_plan(0)
            .for_each_run(|b, t| {
                runs.push((b, t));
                Ok(())
            })
            .unwrap();
        assert_eq!(runs, vec![(0, 38), (3, 43), (6, 48)]);
    }

    #[test]
    fn run_errors_stop_the_walk() {
        let g = geometry(dims_2d(), Layout::RowMajor, vec![[4, 6], [18, 22]], Layout::ColMajor);
        let mut calls = 0;
        let err = g
            .copy_plan(0)
            .for_each_run(|_, _| {
                calls += 1;
                Err(TilerError::MissingBuffer("a".into()))
            })
            .unwrap_err();
        assert_eq!(calls, 1);
        assert_eq!(err, TilerError::MissingBuffer("a".into()));
    }
}
