//! Placement database.
//!
//! Modules, nets and pins live in flat arenas addressed by the handles in
//! [`crate::ids`]. The annealer reads and writes the database only through
//! [`PlacementDb`]; [`Placement`] is the arena implementation shipped with
//! the crate.

mod placement;
mod types;

pub use placement::Placement;
pub use types::{Boundary, Module, Net, Pin, PlacementDb};
