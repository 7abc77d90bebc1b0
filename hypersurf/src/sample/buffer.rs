/// Dense grid of samples, stored as parallel channels
///
/// For a grid with `N` samples per axis, every channel has `N³` entries.
/// Samples are laid out x-major, z-minor: the sample at grid index `(i, j, k)`
/// lives at flat index `i * N * N + j * N + k`.
///
/// Buffers are only ever produced whole by the sampler; there is no way to
/// build a partially filled one.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    resolution: usize,
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
    values: Vec<f64>,
}

impl SampleBuffer {
    pub(crate) fn from_channels(
        resolution: usize,
        xs: Vec<f64>,
        ys: Vec<f64>,
        zs: Vec<f64>,
        values: Vec<f64>,
    ) -> Self {
        let n = resolution.pow(3);
        debug_assert!(
            xs.len() == n && ys.len() == n && zs.len() == n && values.len() == n
        );
        Self {
            resolution,
            xs,
            ys,
            zs,
            values,
        }
    }

    /// Samples per axis
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Total number of samples (`resolution³`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether the buffer is empty (never true for sampler output)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// X coordinates of every sample
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Y coordinates of every sample
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Z coordinates of every sample
    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    /// Field values at every sample
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Color intensity of every sample
    ///
    /// Surfaces are colored by height, so this is the Z channel.
    pub fn intensity(&self) -> &[f64] {
        &self.zs
    }

    /// Converts a grid position into a flat index
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let n = self.resolution;
        i * n * n + j * n + k
    }

    /// Returns `[x, y, z, value]` at the given grid position
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<[f64; 4]> {
        let n = self.resolution;
        if i >= n || j >= n || k >= n {
            return None;
        }
        let p = self.index(i, j, k);
        Some([self.xs[p], self.ys[p], self.zs[p], self.values[p]])
    }

    /// Iterates over `[x, y, z, value]` tuples in storage order
    pub fn iter(&self) -> impl Iterator<Item = [f64; 4]> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .zip(&self.values)
            .map(|(((x, y), z), v)| [*x, *y, *z, *v])
    }

    /// Returns the smallest and largest field values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, v| match acc {
            None => Some((*v, *v)),
            Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
        })
    }

    /// Splits the buffer into its `(xs, ys, zs, values)` channels
    pub fn into_channels(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.xs, self.ys, self.zs, self.values)
    }
}
