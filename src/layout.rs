use std::fmt;

/// Order in which cells (or tiles) are linearized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Last dimension varies fastest
    RowMajor,
    /// First dimension varies fastest
    ColMajor,
}

impl Layout {
    /// Element strides for a dense block with the given per-dimension sizes.
    ///
    /// The stride-1 axis is the last dimension for row-major and the first
    /// one for col-major; every other stride is the running product of the
    /// sizes of the dimensions closer to the stride-1 axis.
    pub fn strides(&self, sizes: &[u64]) -> Vec<u64> {
        match self {
            Layout::RowMajor => row_major_stride(sizes),
            Layout::ColMajor => col_major_stride(sizes),
        }
    }

    /// Decode a linear index into coordinates using strides built by
    /// [`Layout::strides`] for this same layout.
    pub fn idx2crd(&self, mut idx: u64, strides: &[u64]) -> Vec<u64> {
        let mut out = vec![0; strides.len()];
        let mut peel = |d: usize| {
            out[d] = idx / strides[d];
            idx %= strides[d];
        };
        // slowest-varying dimension first
        match self {
            Layout::RowMajor => (0..strides.len()).for_each(&mut peel),
            Layout::ColMajor => (0..strides.len()).rev().for_each(&mut peel),
        }
        out
    }

    /// Linear index of `crd` under `strides`
    pub fn crd2idx(crd: &[u64], strides: &[u64]) -> u64 {
        crd.iter().zip(strides.iter()).map(|(c, s)| c * s).sum()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::RowMajor => write!(f, "row-major"),
            Layout::ColMajor => write!(f, "col-major"),
        }
    }
}

/* ---------- stride helpers ---------- */

fn row_major_stride(sizes: &[u64]) -> Vec<u64> {
    let mut stride = vec![0; sizes.len()];
    let mut acc = 1;
    for i in (0..sizes.len()).rev() {
        stride[i] = acc;
        acc *= sizes[i];
    }
    stride
}

fn col_major_stride(sizes: &[u64]) -> Vec<u64> {
    let mut stride = Vec::with_capacity(sizes.len());
    let mut acc = 1;
    for s in sizes {
        stride.push(acc);
        acc *= *s;
    }
    stride
}
