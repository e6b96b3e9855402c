//! Simulated-annealing global placement.
//!
//! Modules are first scattered uniformly over the placement boundary.
//! The search then repeatedly picks two modules at random, trades their
//! positions, and keeps the trade or undoes it based on the change in
//! wirelength around the pair. Temperature decays geometrically and
//! switches to a slower rate for a final refinement phase.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Sechen & Sangiovanni-Vincentelli (1985), "The TimberWolf Placement and
//!   Routing Package"

mod config;
mod runner;

pub use config::{Acceptance, AnnealConfig};
pub use runner::{GlobalPlacer, PlaceResult};
