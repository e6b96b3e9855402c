//! Netlist records and the query surface the annealer consumes.

use crate::error::{PlaceError, Result};
use crate::ids::{ModuleId, NetId, PinId};

/// Axis-aligned placement region.
///
/// Module positions are valid when they fall inside the half-open box
/// `[left, right) x [bottom, top)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Boundary {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Half perimeter of the region: `width + height`.
    ///
    /// The annealer divides every cost by this value.
    pub fn half_perimeter(&self) -> f64 {
        self.width() + self.height()
    }

    /// Whether `(x, y)` lies in the half-open region.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x < self.right && self.bottom <= y && y < self.top
    }

    /// Rejects regions without interior or with non-finite edges.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.left, self.right, self.bottom, self.top]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.right <= self.left || self.top <= self.bottom {
            return Err(PlaceError::InvalidBoundary {
                left: self.left,
                right: self.right,
                bottom: self.bottom,
                top: self.top,
            });
        }
        Ok(())
    }
}

/// A placeable rectangular block.
///
/// `(x, y)` is the lower-left corner. Only the position ever changes
/// after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub name: String,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) pins: Vec<PinId>,
}

impl Module {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            pins: Vec::new(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }
}

/// A connection point between one module and one net.
///
/// The absolute location is the owning module's center shifted by
/// `(x_offset, y_offset)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pin {
    pub module: ModuleId,
    pub net: NetId,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// A set of pins to be electrically connected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Net {
    pub name: String,
    pub(crate) pins: Vec<PinId>,
}

impl Net {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pins: Vec::new(),
        }
    }

    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }
}

/// Read/write surface of a placement database.
///
/// The annealer only ever talks to the netlist through this trait, and
/// the only thing it writes is module positions. Every handle-taking
/// method fails with [`PlaceError::IndexOutOfRange`] on a stale or
/// foreign handle.
///
/// [`Placement`](super::Placement) is the in-crate implementation; an
/// external database (e.g. one filled by a Bookshelf reader) can
/// implement this directly.
pub trait PlacementDb: Send + Sync {
    fn num_modules(&self) -> usize;

    fn num_nets(&self) -> usize;

    fn boundary(&self) -> Boundary;

    /// Lower-left corner of a module.
    fn module_position(&self, module: ModuleId) -> Result<(f64, f64)>;

    fn set_module_position(&mut self, module: ModuleId, x: f64, y: f64) -> Result<()>;

    /// `(width, height)` of a module.
    fn module_size(&self, module: ModuleId) -> Result<(f64, f64)>;

    fn module_pins(&self, module: ModuleId) -> Result<&[PinId]>;

    /// The net a pin belongs to.
    fn pin_net(&self, pin: PinId) -> Result<NetId>;

    fn net_pins(&self, net: NetId) -> Result<&[PinId]>;

    /// Absolute pin coordinate under the current module positions.
    fn pin_position(&self, pin: PinId) -> Result<(f64, f64)>;

    /// Whole-placement HPWL. Used for reporting, not inside the
    /// annealing loop.
    fn compute_hpwl(&self) -> Result<f64> {
        crate::wirelength::total_hpwl(self)
    }
}
