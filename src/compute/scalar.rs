//! Scalar universe - plain in-process fallback backend.
//!
//! Keeps the generation as a packed byte buffer and reads every neighbor bit
//! through the codec. Each tick allocates a fresh buffer for the next
//! generation and drops the old one.

use crate::schema::{Backend, Seed};

use super::universe::{UniverseError, cell_count, try_alloc};
use super::{Universe, bit_is_set, index, next_state, neighbor_deltas, packed_len, set_bit};

/// Current generation of a scalar universe.
struct Generation {
    width: usize,
    height: usize,
    /// Packed cell bits, `ceil(width * height / 8)` bytes.
    cells: Vec<u8>,
}

impl Generation {
    fn live_neighbor_count(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for (delta_row, delta_col) in neighbor_deltas(self.width, self.height) {
            let neighbor_row = (row + delta_row) % self.height;
            let neighbor_col = (col + delta_col) % self.width;
            let idx = index(neighbor_row, neighbor_col, self.width);
            count += bit_is_set(idx, &self.cells) as u8;
        }
        count
    }
}

/// Byte-packed, cell-at-a-time Game of Life universe.
#[derive(Default)]
pub struct ScalarUniverse {
    state: Option<Generation>,
    generation: u64,
}

impl ScalarUniverse {
    /// Create an uninitialized universe.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<&Generation, UniverseError> {
        self.state.as_ref().ok_or(UniverseError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut Generation, UniverseError> {
        self.state.as_mut().ok_or(UniverseError::NotInitialized)
    }
}

impl Universe for ScalarUniverse {
    fn init(&mut self, width: usize, height: usize, seed: &Seed) -> Result<(), UniverseError> {
        let count = cell_count(width, height)?;
        let mut cells = try_alloc(packed_len(count), 0u8)?;
        seed.write_into(&mut cells, width, height)?;

        self.state = Some(Generation {
            width,
            height,
            cells,
        });
        self.generation = 0;
        log::debug!("Scalar universe initialized: {width}x{height}");
        Ok(())
    }

    fn tick(&mut self) -> Result<(), UniverseError> {
        let current = self.state()?;
        let (width, height) = (current.width, current.height);
        let mut next = try_alloc(current.cells.len(), 0u8)?;

        for row in 0..height {
            for col in 0..width {
                let idx = index(row, col, width);
                let alive = bit_is_set(idx, &current.cells);
                let live_neighbors = current.live_neighbor_count(row, col);
                if next_state(alive, live_neighbors) {
                    set_bit(idx, &mut next, true);
                }
            }
        }

        self.state_mut()?.cells = next;
        self.generation += 1;
        log::trace!("Scalar universe advanced to generation {}", self.generation);
        Ok(())
    }

    fn buffer(&self) -> Result<&[u8], UniverseError> {
        Ok(&self.state()?.cells)
    }

    fn cells(&self) -> Result<usize, UniverseError> {
        self.state().map(|_| 0)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        self.state.as_ref().map(|s| (s.width, s.height))
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn set_cells(&mut self, cells: &[(usize, usize)]) -> Result<(), UniverseError> {
        let state = self.state_mut()?;
        for &(row, col) in cells {
            if row < state.height && col < state.width {
                set_bit(index(row, col, state.width), &mut state.cells, true);
            } else {
                log::warn!(
                    "Skipping cell ({row}, {col}) outside {}x{} grid",
                    state.width,
                    state.height
                );
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), UniverseError> {
        self.state_mut()?.cells.fill(0);
        Ok(())
    }

    fn backend(&self) -> Backend {
        Backend::Scalar
    }
}
