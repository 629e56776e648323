//! Kernel universe - word-packed numeric backend.
//!
//! The generation lives in `u32` words stored little-endian, so the raw bytes
//! of the word buffer are exactly the packed cell layout (bit `i` of byte
//! `i / 8`, LSB first). Each tick runs three passes over pre-allocated scratch:
//!
//! 1. Unpack words into one byte per cell
//! 2. Sum the wrapped Moore neighborhood and look up the next state
//! 3. Pack the next states back into words
//!
//! On native targets every pass is split across the rayon pool.

use crate::schema::{Backend, Seed};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::Universe;
use super::universe::{UniverseError, cell_count, try_alloc};

const WORD_BITS: usize = 32;

/// Next state indexed by `[alive][live_neighbors]` (B3/S23).
const TRANSITION: [[u8; 9]; 2] = [
    [0, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 0, 0, 0, 0, 0],
];

/// Wrapped column indices for deltas `width - 1`, `0`, `1`.
type ColumnTaps = [usize; 3];

struct KernelState {
    width: usize,
    height: usize,
    /// Live generation, little-endian words.
    words: Vec<u32>,
    /// Next generation, swapped in at the end of each tick.
    next_words: Vec<u32>,
    /// One byte (0 or 1) per cell, unpacked from `words`.
    states: Vec<u8>,
    /// One byte per cell for the next generation.
    next_states: Vec<u8>,
    /// Per-column wrapped neighbor columns.
    column_taps: Vec<ColumnTaps>,
    /// Which of the three column deltas is zero (`width - 1` is zero when width is 1).
    zero_column_delta: [bool; 3],
}

impl KernelState {
    fn new(width: usize, height: usize, seed: &Seed) -> Result<Self, UniverseError> {
        let cells = cell_count(width, height)?;
        let word_count = cells.div_ceil(WORD_BITS);

        let mut packed = try_alloc(word_count * 4, 0u8)?;
        seed.write_into(&mut packed[..cells.div_ceil(8)], width, height)?;

        let mut words = try_alloc(word_count, 0u32)?;
        for (word, chunk) in words.iter_mut().zip(packed.chunks_exact(4)) {
            let logical = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            *word = logical.to_le();
        }

        let mut column_taps = try_alloc(width, [0usize; 3])?;
        for (col, taps) in column_taps.iter_mut().enumerate() {
            *taps = [(col + width - 1) % width, col, (col + 1) % width];
        }

        Ok(Self {
            width,
            height,
            words,
            next_words: try_alloc(word_count, 0u32)?,
            states: try_alloc(cells, 0u8)?,
            next_states: try_alloc(cells, 0u8)?,
            column_taps,
            zero_column_delta: [width - 1 == 0, true, false],
        })
    }

    fn step(&mut self) {
        let width = self.width;
        let height = self.height;

        // 1. Unpack
        let unpack = |(chunk, word): (&mut [u8], &u32)| {
            let logical = u32::from_le(*word);
            for (bit, state) in chunk.iter_mut().enumerate() {
                *state = ((logical >> bit) & 1) as u8;
            }
        };
        #[cfg(not(target_arch = "wasm32"))]
        self.states
            .par_chunks_mut(WORD_BITS)
            .zip(self.words.par_iter())
            .for_each(unpack);
        #[cfg(target_arch = "wasm32")]
        self.states
            .chunks_mut(WORD_BITS)
            .zip(self.words.iter())
            .for_each(unpack);

        // 2. Neighborhood sum and transition, one row at a time
        let states = &self.states;
        let column_taps = &self.column_taps;
        let zero_column_delta = self.zero_column_delta;
        let rule_row = |(row, out): (usize, &mut [u8])| {
            let row_deltas = [height - 1, 0, 1];
            let row_offsets = row_deltas.map(|dr| ((row + dr) % height) * width);

            for (col, next) in out.iter_mut().enumerate() {
                let taps = &column_taps[col];
                let mut sum = 0u8;
                for (ri, &offset) in row_offsets.iter().enumerate() {
                    for (ci, &tap) in taps.iter().enumerate() {
                        if row_deltas[ri] == 0 && zero_column_delta[ci] {
                            continue;
                        }
                        sum += states[offset + tap];
                    }
                }
                let alive = states[row * width + col] as usize;
                *next = TRANSITION[alive][sum as usize];
            }
        };
        #[cfg(not(target_arch = "wasm32"))]
        self.next_states
            .par_chunks_mut(width)
            .enumerate()
            .for_each(rule_row);
        #[cfg(target_arch = "wasm32")]
        self.next_states
            .chunks_mut(width)
            .enumerate()
            .for_each(rule_row);

        // 3. Pack; the trailing word's unused bits stay zero
        let pack = |(word, chunk): (&mut u32, &[u8])| {
            let mut logical = 0u32;
            for (bit, &state) in chunk.iter().enumerate() {
                logical |= (state as u32) << bit;
            }
            *word = logical.to_le();
        };
        #[cfg(not(target_arch = "wasm32"))]
        self.next_words
            .par_iter_mut()
            .zip(self.next_states.par_chunks(WORD_BITS))
            .for_each(pack);
        #[cfg(target_arch = "wasm32")]
        self.next_words
            .iter_mut()
            .zip(self.next_states.chunks(WORD_BITS))
            .for_each(pack);

        std::mem::swap(&mut self.words, &mut self.next_words);
    }

    fn set(&mut self, idx: usize) {
        let word = &mut self.words[idx / WORD_BITS];
        *word = (u32::from_le(*word) | (1 << (idx % WORD_BITS))).to_le();
    }
}

/// Word-packed Game of Life universe with a pass-structured tick.
#[derive(Default)]
pub struct KernelUniverse {
    state: Option<KernelState>,
    generation: u64,
}

impl KernelUniverse {
    /// Create an uninitialized universe.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<&KernelState, UniverseError> {
        self.state.as_ref().ok_or(UniverseError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut KernelState, UniverseError> {
        self.state.as_mut().ok_or(UniverseError::NotInitialized)
    }
}

impl Universe for KernelUniverse {
    fn init(&mut self, width: usize, height: usize, seed: &Seed) -> Result<(), UniverseError> {
        let state = KernelState::new(width, height, seed)?;
        self.state = Some(state);
        self.generation = 0;
        log::debug!("Kernel universe initialized: {width}x{height}");
        Ok(())
    }

    fn tick(&mut self) -> Result<(), UniverseError> {
        self.state_mut()?.step();
        self.generation += 1;
        log::trace!("Kernel universe advanced to generation {}", self.generation);
        Ok(())
    }

    fn buffer(&self) -> Result<&[u8], UniverseError> {
        Ok(bytemuck::cast_slice(&self.state()?.words))
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
                state.set(row * state.width + col);
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
        self.state_mut()?.words.fill(0);
        Ok(())
    }

    fn backend(&self) -> Backend {
        Backend::Kernel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ScalarUniverse;
    use crate::schema::{Pattern, Shape};
    use proptest::prelude::*;

    fn seeded(width: usize, height: usize, pattern: Pattern) -> KernelUniverse {
        let mut universe = KernelUniverse::new();
        universe.init(width, height, &Seed { pattern }).unwrap();
        universe
    }

    #[test]
    fn test_tick_before_init() {
        let mut universe = KernelUniverse::new();
        assert!(matches!(universe.tick(), Err(UniverseError::NotInitialized)));
        assert!(matches!(universe.buffer(), Err(UniverseError::NotInitialized)));
        assert_eq!(universe.generation(), 0);
    }

    #[test]
    fn test_buffer_matches_packed_layout() {
        // Cells 0, 9 and 33 on a 6x6 grid
        let universe = seeded(
            6,
            6,
            Pattern::Cells {
                cells: vec![(0, 0), (1, 3), (5, 3)],
            },
        );
        let buffer = universe.buffer().unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer[0], 0b0000_0001);
        assert_eq!(buffer[1], 0b0000_0010);
        assert_eq!(buffer[4], 0b0000_0010);

        let view = universe.view().unwrap();
        assert_eq!(view.bytes().len(), 5);
        assert!(view.is_alive(5, 3));
    }

    #[test]
    fn test_wraparound_corner() {
        let mut universe = seeded(
            4,
            4,
            Pattern::Cells {
                cells: vec![(0, 0), (0, 3), (3, 0)],
            },
        );
        universe.tick().unwrap();
        // (3,3) sees (0,0), (0,3) and (3,0) across both edges
        assert!(universe.is_alive(3, 3).unwrap());
    }

    #[test]
    fn test_block_still_life() {
        let mut universe = seeded(
            4,
            4,
            Pattern::Shape {
                shape: Shape::Block,
                origin: (1, 1),
            },
        );
        let before = universe.view().unwrap().to_vec();
        universe.run(25).unwrap();
        assert_eq!(universe.view().unwrap().to_vec(), before);
        assert_eq!(universe.generation(), 25);
    }

    #[test]
    fn test_blinker_period_two() {
        let mut universe = seeded(
            8,
            8,
            Pattern::Shape {
                shape: Shape::Blinker,
                origin: (4, 3),
            },
        );
        let horizontal = universe.view().unwrap().to_vec();

        universe.tick().unwrap();
        assert!(universe.is_alive(3, 4).unwrap());
        assert!(universe.is_alive(4, 4).unwrap());
        assert!(universe.is_alive(5, 4).unwrap());
        assert!(!universe.is_alive(4, 3).unwrap());
        assert_eq!(universe.view().unwrap().population(), 3);

        universe.tick().unwrap();
        assert_eq!(universe.view().unwrap().to_vec(), horizontal);
    }

    #[test]
    fn test_tick_swaps_word_buffers() {
        let mut universe = seeded(
            8,
            8,
            Pattern::Shape {
                shape: Shape::Blinker,
                origin: (4, 3),
            },
        );
        let first = universe.buffer().unwrap().as_ptr();
        universe.tick().unwrap();
        let second = universe.buffer().unwrap().as_ptr();
        assert_ne!(first, second);

        // Two buffers alternate; nothing is reallocated after init
        universe.tick().unwrap();
        assert_eq!(universe.buffer().unwrap().as_ptr(), first);
    }

    #[test]
    fn test_glider_wraps_back_to_start() {
        // A glider moves one cell diagonally every 4 generations
        let mut universe = seeded(
            8,
            8,
            Pattern::Shape {
                shape: Shape::Glider,
                origin: (0, 0),
            },
        );
        let start = universe.view().unwrap().to_vec();
        universe.run(32).unwrap();
        assert_eq!(universe.view().unwrap().to_vec(), start);
    }

    #[test]
    fn test_set_cells_and_clear() {
        let mut universe = seeded(5, 3, Pattern::Empty);
        universe.set_cells(&[(2, 4), (0, 0), (3, 0)]).unwrap();
        assert!(universe.is_alive(2, 4).unwrap());
        assert!(universe.is_alive(0, 0).unwrap());
        assert_eq!(universe.view().unwrap().population(), 2);

        universe.clear().unwrap();
        assert_eq!(universe.view().unwrap().population(), 0);
    }

    #[test]
    fn test_random_seed_is_reproducible() {
        let pattern = Pattern::Random {
            density: 0.5,
            seed: Some(7),
        };
        let mut a = seeded(33, 17, pattern.clone());
        let mut b = seeded(33, 17, pattern);
        a.run(10).unwrap();
        b.run(10).unwrap();
        assert_eq!(a.view().unwrap().to_vec(), b.view().unwrap().to_vec());
    }

    proptest! {
        #[test]
        fn prop_matches_scalar_backend(
            width in 1usize..24,
            height in 1usize..24,
            seed in any::<u64>(),
            ticks in 0u64..6,
        ) {
            let seed = Seed {
                pattern: Pattern::Random { density: 0.4, seed: Some(seed) },
            };
            let mut kernel = KernelUniverse::new();
            let mut scalar = ScalarUniverse::new();
            kernel.init(width, height, &seed).unwrap();
            scalar.init(width, height, &seed).unwrap();

            for _ in 0..ticks {
                kernel.tick().unwrap();
                scalar.tick().unwrap();
            }

            prop_assert_eq!(kernel.view().unwrap().to_vec(), scalar.view().unwrap().to_vec());
        }
    }
}
