//! Rain module: the character-rain simulation.
//!
//! This module contains:
//! - [`Column`]: One vertical lane of glyphs with parallel positions
//! - [`Grid`]: The column array plus spawn-lane selection
//! - [`SpawnQueue`]: FIFO backlog of letters and words awaiting a lane
//! - [`RainEngine`]: The simulation itself, painting into a [`Frame`]
//!
//! [`Frame`]: crate::surface::Frame

mod column;
mod engine;
mod grid;
mod queue;

pub use column::Column;
pub use engine::{PointerPos, RainEngine};
pub use grid::Grid;
pub use queue::SpawnQueue;
