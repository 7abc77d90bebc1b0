use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Threading for the slab sampler
///
/// WebAssembly builds only have [`ThreadCount::One`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadCount {
    /// Sample every x-slab in the caller's thread
    #[default]
    One,

    /// Sample x-slabs in parallel on a dedicated rayon pool of this size
    #[cfg(not(target_arch = "wasm32"))]
    Many(NonZeroUsize),
}

/// A count of one samples in the caller's thread rather than building a
/// one-worker pool
#[cfg(not(target_arch = "wasm32"))]
impl From<NonZeroUsize> for ThreadCount {
    fn from(n: NonZeroUsize) -> Self {
        if n.get() == 1 {
            ThreadCount::One
        } else {
            ThreadCount::Many(n)
        }
    }
}

impl std::fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadCount::One => write!(f, "1 thread"),
            #[cfg(not(target_arch = "wasm32"))]
            ThreadCount::Many(n) => write!(f, "{n} threads"),
        }
    }
}

impl ThreadCount {
    /// Size of the worker pool, or `None` when sampling inline
    pub fn get(&self) -> Option<usize> {
        match self {
            ThreadCount::One => None,
            #[cfg(not(target_arch = "wasm32"))]
            ThreadCount::Many(n) => Some(n.get()),
        }
    }
}

/// Settings for grid sampling
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Sampler threading
    pub threads: ThreadCount,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn thread_count() {
        assert_eq!(ThreadCount::default().get(), None);
        assert_eq!(ThreadCount::default().to_string(), "1 thread");

        let one = ThreadCount::from(NonZeroUsize::new(1).unwrap());
        assert_eq!(one, ThreadCount::One);
        assert_eq!(one.get(), None);

        let four = ThreadCount::from(NonZeroUsize::new(4).unwrap());
        assert_eq!(four.get(), Some(4));
        assert_eq!(four.to_string(), "4 threads");
    }
}
