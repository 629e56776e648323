//! Toroidal Life - bit-packed Conway's Game of Life on a wrapped grid.
//!
//! This crate advances a Game of Life grid one generation at a time and
//! exposes each generation as a packed bit buffer that a renderer can read
//! directly: bit `i % 8` of byte `i / 8` holds cell `i`, and cells are
//! linearized row-major (`row * width + col`).
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, backend selection and seeding
//! - `compute`: Bit packing, the transition rule and the two backends
//!   (`KernelUniverse` and `ScalarUniverse`) behind the `Universe` trait
//!
//! # Example
//!
//! ```rust
//! use toroidal_life::{
//!     compute::{Universe, create_universe},
//!     schema::{Backend, Pattern, Seed, Shape, UniverseConfig},
//! };
//!
//! let config = UniverseConfig {
//!     width: 16,
//!     height: 16,
//!     backend: Backend::Kernel,
//!     seed: Seed {
//!         pattern: Pattern::Shape {
//!             shape: Shape::Glider,
//!             origin: (0, 0),
//!         },
//!     },
//! };
//!
//! let mut universe = create_universe(&config).unwrap();
//! universe.run(4).unwrap();
//!
//! let view = universe.view().unwrap();
//! assert_eq!(view.population(), 5);
//! println!("{view}");
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{
    GridView, KernelUniverse, ScalarUniverse, Universe, UniverseError, UniverseStats,
    create_universe,
};
pub use schema::{Backend, Pattern, Seed, Shape, UniverseConfig};
