//! Universe contract shared by every simulation backend.
//!
//! A renderer calls [`Universe::init`] once, then alternates [`Universe::tick`]
//! with reads through [`Universe::view`] (or the lower level
//! [`Universe::buffer`]/[`Universe::cells`] pair). Views borrow the universe, so
//! a view can never be held across a tick.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{KernelUniverse, ScalarUniverse, codec};
use crate::schema::{Backend, Seed, SeedError, UniverseConfig};

/// Errors reported by universe operations.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    #[error("Universe used before init")]
    NotInitialized,
    #[error("Failed to allocate {bytes} bytes of cell state")]
    AllocationFailed { bytes: usize },
    #[error("Grid dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Invalid seed: {0}")]
    InvalidSeed(#[from] SeedError),
}

/// A toroidal Game of Life grid that exposes its state as packed bits.
///
/// Implementations own their cell buffers exclusively. Every generation is
/// computed from the complete previous generation, never in place.
pub trait Universe: Send {
    /// Allocate a `width` x `height` grid and populate it from `seed`.
    ///
    /// Calling `init` again starts a new grid; on error the previous grid (if
    /// any) is left untouched.
    fn init(&mut self, width: usize, height: usize, seed: &Seed) -> Result<(), UniverseError>;

    /// Advance exactly one generation.
    fn tick(&mut self) -> Result<(), UniverseError>;

    /// Backing byte buffer holding the current generation.
    ///
    /// May be longer than the packed generation; use [`Universe::cells`] for
    /// the start offset.
    fn buffer(&self) -> Result<&[u8], UniverseError>;

    /// Byte offset of the packed generation within [`Universe::buffer`].
    fn cells(&self) -> Result<usize, UniverseError>;

    /// `(width, height)`, or `None` before init.
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// Number of ticks since the last init.
    fn generation(&self) -> u64;

    /// Mark the given `(row, col)` cells alive. Out-of-range cells are skipped.
    fn set_cells(&mut self, cells: &[(usize, usize)]) -> Result<(), UniverseError>;

    /// Reset every cell to dead without changing dimensions.
    fn clear(&mut self) -> Result<(), UniverseError>;

    /// Backend identifier.
    fn backend(&self) -> Backend;

    fn width(&self) -> Result<usize, UniverseError> {
        self.dimensions()
            .map(|(w, _)| w)
            .ok_or(UniverseError::NotInitialized)
    }

    fn height(&self) -> Result<usize, UniverseError> {
        self.dimensions()
            .map(|(_, h)| h)
            .ok_or(UniverseError::NotInitialized)
    }

    /// Read-only view of exactly `ceil(width * height / 8)` packed bytes.
    fn view(&self) -> Result<GridView<'_>, UniverseError> {
        let (width, height) = self.dimensions().ok_or(UniverseError::NotInitialized)?;
        let offset = self.cells()?;
        let len = codec::packed_len(width * height);
        let bytes = &self.buffer()?[offset..offset + len];
        Ok(GridView::new(bytes, width, height))
    }

    /// Whether the cell at `(row, col)` is alive.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the grid.
    fn is_alive(&self, row: usize, col: usize) -> Result<bool, UniverseError> {
        Ok(self.view()?.is_alive(row, col))
    }

    /// Run the given number of ticks.
    fn run(&mut self, ticks: u64) -> Result<(), UniverseError> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    fn stats(&self) -> Result<UniverseStats, UniverseError> {
        let view = self.view()?;
        Ok(UniverseStats {
            width: view.width(),
            height: view.height(),
            generation: self.generation(),
            population: view.population(),
        })
    }
}

impl Backend {
    /// Construct an uninitialized universe for this backend.
    pub fn build(self) -> Box<dyn Universe> {
        match self {
            Backend::Kernel => Box::new(KernelUniverse::new()),
            Backend::Scalar => Box::new(ScalarUniverse::new()),
        }
    }
}

/// Build and initialize the universe described by `config`.
pub fn create_universe(config: &UniverseConfig) -> Result<Box<dyn Universe>, UniverseError> {
    let mut universe = config.backend.build();
    universe.init(config.width, config.height, &config.seed)?;
    log::debug!(
        "Created {:?} universe {}x{}",
        config.backend,
        config.width,
        config.height
    );
    Ok(universe)
}

/// Validate dimensions and return the cell count.
pub(crate) fn cell_count(width: usize, height: usize) -> Result<usize, UniverseError> {
    if width == 0 || height == 0 {
        return Err(UniverseError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(UniverseError::InvalidDimensions { width, height })
}

/// Allocate a vector of `len` copies of `value`, reporting failure instead of
/// aborting.
pub(crate) fn try_alloc<T: Clone>(len: usize, value: T) -> Result<Vec<T>, UniverseError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| UniverseError::AllocationFailed {
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Borrowed read-only view of one packed generation.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    bytes: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> GridView<'a> {
    /// Wrap packed bytes. `bytes` must hold exactly `ceil(width * height / 8)` bytes.
    pub fn new(bytes: &'a [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(bytes.len(), codec::packed_len(width * height));
        Self {
            bytes,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Packed cell bits, LSB first, row-major.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// # Panics
    /// Panics if the coordinates are outside the grid.
    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.width,
            self.height
        );
        codec::bit_is_set(codec::index(row, col, self.width), self.bytes)
    }

    /// Number of live cells. Padding bits are not counted.
    pub fn population(&self) -> usize {
        let cells = self.width * self.height;
        let full = cells / 8;
        let mut count: usize = self.bytes[..full]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let tail = cells % 8;
        if tail != 0 {
            count += (self.bytes[full] & ((1u8 << tail) - 1)).count_ones() as usize;
        }
        count
    }

    /// Owned copy of the packed bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let symbol = if self.is_alive(row, col) { '◼' } else { '◻' };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Universe statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseStats {
    pub width: usize,
    pub height: usize,
    pub generation: u64,
    pub population: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Pattern;

    #[test]
    fn test_view_population_ignores_padding() {
        // 3x3 grid = 9 cells; second byte carries 7 padding bits
        let bytes = [0xFFu8, 0xFF];
        let view = GridView::new(&bytes, 3, 3);
        assert_eq!(view.population(), 9);
    }

    #[test]
    fn test_view_display() {
        let bytes = [0b0000_0101u8];
        let view = GridView::new(&bytes, 2, 2);
        assert_eq!(view.to_string(), "◼◻\n◼◻\n");
    }

    #[test]
    #[should_panic]
    fn test_view_rejects_column_overflow() {
        let bytes = [0u8; 2];
        let view = GridView::new(&bytes, 4, 4);
        view.is_alive(0, 4);
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(cell_count(4, 3).unwrap(), 12);
        assert!(matches!(
            cell_count(0, 3),
            Err(UniverseError::InvalidDimensions { width: 0, height: 3 })
        ));
        assert!(matches!(
            cell_count(usize::MAX, 2),
            Err(UniverseError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_try_alloc_reports_failure() {
        let result = try_alloc(usize::MAX, 0u8);
        assert!(matches!(result, Err(UniverseError::AllocationFailed { .. })));
    }

    #[test]
    fn test_create_universe_from_config() {
        for backend in [Backend::Kernel, Backend::Scalar] {
            let config = UniverseConfig {
                width: 8,
                height: 6,
                backend,
                seed: Seed {
                    pattern: Pattern::Empty,
                },
            };
            let universe = create_universe(&config).unwrap();
            assert_eq!(universe.backend(), backend);
            assert_eq!(universe.width().unwrap(), 8);
            assert_eq!(universe.height().unwrap(), 6);
            assert_eq!(universe.view().unwrap().bytes().len(), 6);
        }
    }

    #[test]
    fn test_stats() {
        let config = UniverseConfig {
            width: 4,
            height: 4,
            backend: Backend::Scalar,
            seed: Seed {
                pattern: Pattern::Cells {
                    cells: vec![(1, 1), (1, 2), (2, 1), (2, 2)],
                },
            },
        };
        let mut universe = create_universe(&config).unwrap();
        universe.run(3).unwrap();
        let stats = universe.stats().unwrap();
        assert_eq!(
            stats,
            UniverseStats {
                width: 4,
                height: 4,
                generation: 3,
                population: 4,
            }
        );
    }
}
