//! Wirelength-driven global placement of circuit modules.
//!
//! Given a netlist of rectangular modules connected by nets and a fixed
//! placement boundary, computes an `(x, y)` for every module that
//! approximately minimizes the total half-perimeter wirelength (HPWL).
//!
//! - [`netlist`]: arena-backed placement database and the [`PlacementDb`]
//!   trait the optimizer works against.
//! - [`wirelength`]: per-net, per-module and whole-placement HPWL.
//! - [`place`]: the simulated-annealing placer.
//! - [`plot`]: gnuplot rendering of a placement.
//!
//! Overlap removal, detailed placement and timing- or congestion-driven
//! objectives are left to later stages of the flow.
//!
//! # Example
//!
//! ```
//! use u_place::netlist::{Boundary, Placement, PlacementDb};
//! use u_place::place::{AnnealConfig, GlobalPlacer};
//!
//! let mut placement = Placement::new(Boundary::new(0.0, 100.0, 0.0, 100.0));
//! let modules: Vec<_> = (0..8)
//!     .map(|i| placement.add_module(format!("m{i}"), 4.0, 4.0))
//!     .collect();
//! for pair in modules.windows(2) {
//!     let net = placement.add_net(format!("{}-{}", pair[0], pair[1]));
//!     placement.add_pin(pair[0], net, 0.0, 0.0)?;
//!     placement.add_pin(pair[1], net, 0.0, 0.0)?;
//! }
//!
//! let config = AnnealConfig::default()
//!     .with_initial_temperature(1.0)
//!     .with_stop_temperature(1e-4)
//!     .with_cooling_rate(0.995);
//! let result = GlobalPlacer::new(config).place(&mut placement)?;
//! assert_eq!(result.final_hpwl, placement.compute_hpwl()?);
//! # Ok::<(), u_place::PlaceError>(())
//! ```
//!
//! [`PlacementDb`]: netlist::PlacementDb

pub mod error;
pub mod ids;
pub mod netlist;
pub mod place;
pub mod plot;
pub mod wirelength;

pub use error::{PlaceError, Result};
