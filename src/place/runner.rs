//! Annealing loop execution.

use super::config::{Acceptance, AnnealConfig};
use crate::error::Result;
use crate::ids::ModuleId;
use crate::netlist::PlacementDb;
use crate::wirelength::pair_wirelength;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Statistics of one [`GlobalPlacer`] run.
///
/// The placement itself is updated in place; this only reports on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    /// Swap attempts made.
    pub iterations: usize,

    /// Swaps kept, including improving and self-swaps.
    pub accepted_moves: usize,

    /// Swaps kept because they did not increase the local cost.
    pub improving_moves: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Whole-placement HPWL right after random initialization.
    pub initial_hpwl: f64,

    /// Whole-placement HPWL after the last swap.
    pub final_hpwl: f64,

    /// Whether the run stopped on the cancellation flag.
    pub cancelled: bool,

    /// Whole-placement HPWL at initialization, at the switch to the
    /// refinement cooling rate (if reached), and at the end.
    pub hpwl_history: Vec<f64>,
}

/// Wirelength-driven global placer.
///
/// Scatters every module uniformly over the boundary, then repeatedly
/// swaps the positions of two random modules, keeping or undoing each
/// swap by comparing the wirelength around the pair before and after.
/// Because modules only ever trade positions, every module stays inside
/// the boundary for the whole run.
///
/// The random stream is owned by the run and seeded from
/// [`AnnealConfig::seed`], so a run is a deterministic function of the
/// netlist and the configuration.
///
/// # Examples
///
/// ```
/// use u_place::netlist::{Boundary, Placement, PlacementDb};
/// use u_place::place::{AnnealConfig, GlobalPlacer};
///
/// let mut placement = Placement::new(Boundary::new(0.0, 10.0, 0.0, 10.0));
/// let a = placement.add_module("a", 1.0, 1.0);
/// let b = placement.add_module("b", 1.0, 1.0);
/// let n = placement.add_net("n");
/// placement.add_pin(a, n, 0.0, 0.0).unwrap();
/// placement.add_pin(b, n, 0.0, 0.0).unwrap();
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(1.0)
///     .with_stop_temperature(1e-3)
///     .with_cooling_rate(0.99);
/// let result = GlobalPlacer::new(config).place(&mut placement).unwrap();
/// assert!(result.final_hpwl <= result.initial_hpwl);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlobalPlacer {
    config: AnnealConfig,
}

impl GlobalPlacer {
    pub fn new(config: AnnealConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Places every module of `db`.
    pub fn place<D: PlacementDb>(&self, db: &mut D) -> Result<PlaceResult> {
        self.place_with_cancel(db, None)
    }

    /// Places every module of `db`, polling `cancel` between swaps.
    ///
    /// A cancelled run leaves a valid placement behind: the last swap
    /// has either been kept or undone before the flag is read.
    pub fn place_with_cancel<D: PlacementDb>(
        &self,
        db: &mut D,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PlaceResult> {
        let config = &self.config;
        config.validate()?;
        let boundary = db.boundary();
        boundary.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let num_modules = db.num_modules();

        log::info!(
            "placing {} modules on {} nets (seed {}, ~{} swaps scheduled)",
            num_modules,
            db.num_nets(),
            config.seed,
            config.scheduled_iterations()
        );

        Self::initialize(db, &mut rng)?;
        let initial_hpwl = db.compute_hpwl()?;
        let mut hpwl_history = vec![initial_hpwl];

        // Fixed normalizer for the whole run.
        let scale = boundary.half_perimeter();

        let mut temperature = config.initial_temperature;
        let mut gamma = config.cooling_rate;
        let mut refining = false;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        if num_modules > 0 {
            while temperature >= config.stop_temperature {
                if let Some(ref flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        log::debug!("cancelled after {iterations} swaps at T = {temperature:e}");
                        cancelled = true;
                        break;
                    }
                }
                if config.max_iterations > 0 && iterations >= config.max_iterations {
                    break;
                }

                let m1 = ModuleId::from_raw(rng.random_range(0..num_modules) as u32);
                let m2 = ModuleId::from_raw(rng.random_range(0..num_modules) as u32);

                let (kept, improving) = self.try_swap(db, m1, m2, temperature, scale, &mut rng)?;
                if kept {
                    accepted_moves += 1;
                }
                if improving {
                    improving_moves += 1;
                }
                iterations += 1;

                temperature *= gamma;
                if !refining && temperature < config.refine_temperature {
                    gamma = config.refine_cooling_rate;
                    refining = true;
                    let hpwl = db.compute_hpwl()?;
                    log::debug!(
                        "refinement after {iterations} swaps at T = {temperature:e}, hpwl {hpwl:.4}"
                    );
                    hpwl_history.push(hpwl);
                }
            }
        }

        let final_hpwl = db.compute_hpwl()?;
        hpwl_history.push(final_hpwl);

        log::info!(
            "placement done: {iterations} swaps, {accepted_moves} kept, hpwl {initial_hpwl:.4} -> {final_hpwl:.4}"
        );

        Ok(PlaceResult {
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
            initial_hpwl,
            final_hpwl,
            cancelled,
            hpwl_history,
        })
    }

    /// Assigns every module a uniformly random lower-left corner in
    /// `[left, right) x [bottom, top)`.
    ///
    /// Draws x then y per module, in module order.
    pub fn initialize<D: PlacementDb, R: Rng>(db: &mut D, rng: &mut R) -> Result<()> {
        let boundary = db.boundary();
        boundary.validate()?;
        for i in 0..db.num_modules() {
            let x = sample_half_open(rng, boundary.left, boundary.right);
            let y = sample_half_open(rng, boundary.bottom, boundary.top);
            db.set_module_position(ModuleId::from_raw(i as u32), x, y)?;
        }
        Ok(())
    }

    /// Speculatively swaps `m1` and `m2` and decides whether to keep it.
    ///
    /// Returns `(kept, improving)`. A rejected swap is undone before
    /// returning.
    fn try_swap<D: PlacementDb, R: Rng>(
        &self,
        db: &mut D,
        m1: ModuleId,
        m2: ModuleId,
        temperature: f64,
        scale: f64,
        rng: &mut R,
    ) -> Result<(bool, bool)> {
        let visit = self.config.net_visit;
        let (x1, y1) = db.module_position(m1)?;
        let (x2, y2) = db.module_position(m2)?;

        let cur_cost = pair_wirelength(&*db, m1, m2, visit)? / scale;

        db.set_module_position(m1, x2, y2)?;
        db.set_module_position(m2, x1, y1)?;

        let next_cost = pair_wirelength(&*db, m1, m2, visit)? / scale;
        let delta = next_cost - cur_cost;

        if delta <= 0.0 {
            return Ok((true, true));
        }

        if self.accept_uphill(delta, temperature, rng) {
            return Ok((true, false));
        }

        db.set_module_position(m1, x1, y1)?;
        db.set_module_position(m2, x2, y2)?;
        Ok((false, false))
    }

    /// Acceptance test for a swap with `delta > 0`.
    fn accept_uphill<R: Rng>(&self, delta: f64, temperature: f64, rng: &mut R) -> bool {
        let eligible = match self.config.acceptance {
            Acceptance::LateMetropolis => temperature < self.config.fast_temperature,
            Acceptance::Metropolis => true,
        };
        eligible && rng.random::<f64>() < (-delta / temperature).exp()
    }
}

/// Uniform draw from `[lo, hi)`; a product that rounds up onto `hi`
/// falls back to `lo`.
fn sample_half_open<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    let v = lo + rng.random::<f64>() * (hi - lo);
    if v < hi {
        v
    } else {
        lo
    }
}
