//! Compute module - Cell packing, the transition rule and the universe backends.

mod codec;
mod kernel;
mod rule;
mod scalar;
mod universe;

pub use codec::*;
pub use kernel::*;
pub use rule::*;
pub use scalar::*;
pub use universe::*;
