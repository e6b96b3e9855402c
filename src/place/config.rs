//! Annealing schedule and move-acceptance configuration.

use crate::error::{PlaceError, Result};
use crate::wirelength::NetVisit;

/// Rule for accepting a swap that increases the local cost.
///
/// Improving (or cost-neutral) swaps are always kept under both rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acceptance {
    /// Uphill swaps are rejected outright while `T >= fast_temperature`;
    /// below it they pass with probability `exp(-delta / T)`.
    ///
    /// The run therefore starts as a pure descent and only turns into a
    /// Metropolis walk in the cold tail of the schedule.
    #[default]
    LateMetropolis,

    /// Textbook Metropolis: uphill swaps pass with probability
    /// `exp(-delta / T)` at every temperature.
    Metropolis,
}

/// Configuration for [`GlobalPlacer`](super::GlobalPlacer).
///
/// The defaults give a long, slow schedule: geometric cooling from
/// `1e18` at rate `0.99989`, switching to `0.99995` once `T < 1e-7`, and
/// stopping when `T < 1e-76`.
///
/// # Examples
///
/// ```
/// use u_place::place::{Acceptance, AnnealConfig};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(1.0)
///     .with_stop_temperature(1e-6)
///     .with_cooling_rate(0.99)
///     .with_acceptance(Acceptance::Metropolis)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealConfig {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,

    /// The loop runs while `T >= stop_temperature`.
    ///
    /// May exceed `initial_temperature`, in which case no swap is tried.
    pub stop_temperature: f64,

    /// Below this temperature uphill swaps become eligible under
    /// [`Acceptance::LateMetropolis`].
    pub fast_temperature: f64,

    /// Once `T` drops below this, cooling switches to
    /// `refine_cooling_rate` for the rest of the run.
    pub refine_temperature: f64,

    /// Geometric cooling factor before refinement, in (0, 1).
    pub cooling_rate: f64,

    /// Geometric cooling factor during refinement, in (0, 1).
    pub refine_cooling_rate: f64,

    /// Seed for the run's random stream.
    pub seed: u64,

    pub acceptance: Acceptance,

    /// How nets with several pins on one module are counted.
    pub net_visit: NetVisit,

    /// Hard cap on swap attempts. 0 = bounded by the schedule only.
    pub max_iterations: usize,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1e18,
            stop_temperature: 1e-76,
            fast_temperature: 1e-4,
            refine_temperature: 1e-7,
            cooling_rate: 0.99989,
            refine_cooling_rate: 0.99995,
            seed: 777,
            acceptance: Acceptance::default(),
            net_visit: NetVisit::default(),
            max_iterations: 0,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_stop_temperature(mut self, t: f64) -> Self {
        self.stop_temperature = t;
        self
    }

    pub fn with_fast_temperature(mut self, t: f64) -> Self {
        self.fast_temperature = t;
        self
    }

    pub fn with_refine_temperature(mut self, t: f64) -> Self {
        self.refine_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, gamma: f64) -> Self {
        self.cooling_rate = gamma;
        self
    }

    pub fn with_refine_cooling_rate(mut self, gamma: f64) -> Self {
        self.refine_cooling_rate = gamma;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_net_visit(mut self, visit: NetVisit) -> Self {
        self.net_visit = visit;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the configuration.
    ///
    /// All temperatures must be positive and finite and both cooling
    /// rates must lie in (0, 1), which is what bounds the loop.
    pub fn validate(&self) -> Result<()> {
        let temperatures = [
            ("initial_temperature", self.initial_temperature),
            ("stop_temperature", self.stop_temperature),
            ("fast_temperature", self.fast_temperature),
            ("refine_temperature", self.refine_temperature),
        ];
        for (name, t) in temperatures {
            if !(t.is_finite() && t > 0.0) {
                return Err(PlaceError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {t}"
                )));
            }
        }

        let rates = [
            ("cooling_rate", self.cooling_rate),
            ("refine_cooling_rate", self.refine_cooling_rate),
        ];
        for (name, gamma) in rates {
            if !(gamma > 0.0 && gamma < 1.0) {
                return Err(PlaceError::InvalidConfig(format!(
                    "{name} must be in (0, 1), got {gamma}"
                )));
            }
        }

        Ok(())
    }

    /// Number of swap attempts the schedule allows, ignoring
    /// `max_iterations`.
    ///
    /// Replays the cooling recurrence without touching a placement, so it
    /// is exact for the floating-point schedule the runner follows.
    pub fn scheduled_iterations(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut gamma = self.cooling_rate;
        let mut count = 0usize;
        while t >= self.stop_temperature {
            count += 1;
            t *= gamma;
            if t < self.refine_temperature {
                gamma = self.refine_cooling_rate;
            }
        }
        count
    }
}
