//! Seed types for initializing Game of Life universes.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compute::{clear_padding, index, packed_len, set_bit};

fn default_density() -> f64 {
    0.5
}

/// Complete seed specification for universe initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                density: default_density(),
                seed: None,
            },
        }
    }
}

/// Patterns for initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Each cell independently alive with probability `density`.
    Random {
        #[serde(default = "default_density")]
        density: f64,
        /// PRNG seed. `None` draws from entropy.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Explicit list of live `(row, col)` cells.
    Cells { cells: Vec<(usize, usize)> },
    /// A named shape with its top-left corner at `origin`, wrapped at the edges.
    Shape { shape: Shape, origin: (usize, usize) },
    /// Packed cell bits in the universe buffer layout.
    Packed { bytes: Vec<u8> },
    /// Every cell dead.
    Empty,
}

/// Small well-known patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// 2x2 still life.
    Block,
    /// Horizontal period-2 oscillator.
    Blinker,
    /// South-east travelling spaceship.
    Glider,
}

impl Shape {
    /// Live cell offsets relative to the shape's top-left corner.
    pub fn cells(self) -> &'static [(usize, usize)] {
        match self {
            Shape::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Shape::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Shape::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
        }
    }
}

impl Seed {
    /// Random seed with a fixed PRNG seed.
    pub fn random(seed: u64) -> Self {
        Self {
            pattern: Pattern::Random {
                density: default_density(),
                seed: Some(seed),
            },
        }
    }

    /// Write the seeded generation into a zeroed packed buffer of
    /// `ceil(width * height / 8)` bytes.
    pub fn write_into(
        &self,
        buffer: &mut [u8],
        width: usize,
        height: usize,
    ) -> Result<(), SeedError> {
        let cells = width * height;
        debug_assert_eq!(buffer.len(), packed_len(cells));

        match &self.pattern {
            Pattern::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(SeedError::InvalidDensity(*density));
                }
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(*s),
                    None => StdRng::from_entropy(),
                };
                for i in 0..cells {
                    if rng.gen_bool(*density) {
                        set_bit(i, buffer, true);
                    }
                }
            }
            Pattern::Cells { cells: live } => {
                for &(row, col) in live {
                    if row < height && col < width {
                        set_bit(index(row, col, width), buffer, true);
                    } else {
                        log::warn!("Seed cell ({row}, {col}) outside {width}x{height} grid");
                    }
                }
            }
            Pattern::Shape { shape, origin } => {
                for &(dr, dc) in shape.cells() {
                    let row = (origin.0 % height + dr) % height;
                    let col = (origin.1 % width + dc) % width;
                    set_bit(index(row, col, width), buffer, true);
                }
            }
            Pattern::Packed { bytes } => {
                if bytes.len() != buffer.len() {
                    return Err(SeedError::PackedLength {
                        expected: buffer.len(),
                        actual: bytes.len(),
                    });
                }
                buffer.copy_from_slice(bytes);
                clear_padding(buffer, cells);
            }
            Pattern::Empty => {}
        }

        Ok(())
    }
}

/// Seed validation errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Density {0} is outside [0, 1]")]
    InvalidDensity(f64),
    #[error("Packed seed has {actual} bytes, expected {expected}")]
    PackedLength { expected: usize, actual: usize },
}
