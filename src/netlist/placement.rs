//! Arena-backed placement database.

use std::collections::HashMap;

use super::types::{Boundary, Module, Net, Pin, PlacementDb};
use crate::error::{EntityKind, PlaceError, Result};
use crate::ids::{ModuleId, NetId, PinId};

/// Modules, nets and pins of one design plus its placement region.
///
/// Entities are created through the `add_*` builders and never removed,
/// so handles stay valid for the lifetime of the placement.
///
/// # Examples
///
/// ```
/// use u_place::netlist::{Boundary, Placement, PlacementDb};
///
/// let mut placement = Placement::new(Boundary::new(0.0, 10.0, 0.0, 10.0));
/// let a = placement.add_module("a", 1.0, 1.0);
/// let b = placement.add_module("b", 1.0, 1.0);
/// let n = placement.add_net("n0");
/// placement.add_pin(a, n, 0.0, 0.0).unwrap();
/// placement.add_pin(b, n, 0.0, 0.0).unwrap();
///
/// placement.set_module_position(b, 3.0, 4.0).unwrap();
/// assert_eq!(placement.compute_hpwl().unwrap(), 7.0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    boundary: Boundary,
    modules: Vec<Module>,
    nets: Vec<Net>,
    pins: Vec<Pin>,
    /// Name index, rebuilt on deserialization.
    #[cfg_attr(feature = "serde", serde(skip))]
    module_by_name: HashMap<String, ModuleId>,
    /// Name index, rebuilt on deserialization.
    #[cfg_attr(feature = "serde", serde(skip))]
    net_by_name: HashMap<String, NetId>,
}

impl Placement {
    /// Creates an empty placement inside `boundary`.
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            modules: Vec::new(),
            nets: Vec::new(),
            pins: Vec::new(),
            module_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Adds a module at the origin and returns its handle.
    pub fn add_module(&mut self, name: impl Into<String>, width: f64, height: f64) -> ModuleId {
        let id = ModuleId::from_raw(self.modules.len() as u32);
        let module = Module::new(name, width, height);
        self.module_by_name.insert(module.name.clone(), id);
        self.modules.push(module);
        id
    }

    /// Adds an empty net and returns its handle.
    pub fn add_net(&mut self, name: impl Into<String>) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        let net = Net::new(name);
        self.net_by_name.insert(net.name.clone(), id);
        self.nets.push(net);
        id
    }

    /// Connects `module` to `net` through a new pin at the given offset
    /// from the module center.
    pub fn add_pin(
        &mut self,
        module: ModuleId,
        net: NetId,
        x_offset: f64,
        y_offset: f64,
    ) -> Result<PinId> {
        // Validate both handles before touching either arena.
        self.module(module)?;
        self.net(net)?;

        let id = PinId::from_raw(self.pins.len() as u32);
        self.pins.push(Pin {
            module,
            net,
            x_offset,
            y_offset,
        });
        self.modules[module.index()].pins.push(id);
        self.nets[net.index()].pins.push(id);
        Ok(id)
    }

    pub fn module(&self, id: ModuleId) -> Result<&Module> {
        let len = self.modules.len();
        self.modules
            .get(id.index())
            .ok_or_else(|| out_of_range(EntityKind::Module, id.index(), len))
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Result<&mut Module> {
        let len = self.modules.len();
        self.modules
            .get_mut(id.index())
            .ok_or_else(|| out_of_range(EntityKind::Module, id.index(), len))
    }

    pub fn net(&self, id: NetId) -> Result<&Net> {
        let len = self.nets.len();
        self.nets
            .get(id.index())
            .ok_or_else(|| out_of_range(EntityKind::Net, id.index(), len))
    }

    pub fn pin(&self, id: PinId) -> Result<&Pin> {
        let len = self.pins.len();
        self.pins
            .get(id.index())
            .ok_or_else(|| out_of_range(EntityKind::Pin, id.index(), len))
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }

    pub fn module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.module_by_name.get(name).copied()
    }

    pub fn net_by_name(&self, name: &str) -> Option<NetId> {
        self.net_by_name.get(name).copied()
    }

    /// Rebuilds the name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.module_by_name.clear();
        for (i, module) in self.modules.iter().enumerate() {
            self.module_by_name
                .insert(module.name.clone(), ModuleId::from_raw(i as u32));
        }
        self.net_by_name.clear();
        for (i, net) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(net.name.clone(), NetId::from_raw(i as u32));
        }
    }
}

fn out_of_range(kind: EntityKind, index: usize, len: usize) -> PlaceError {
    PlaceError::IndexOutOfRange { kind, index, len }
}

impl PlacementDb for Placement {
    fn num_modules(&self) -> usize {
        self.modules.len()
    }

    fn num_nets(&self) -> usize {
        self.nets.len()
    }

    fn boundary(&self) -> Boundary {
        self.boundary
    }

    fn module_position(&self, module: ModuleId) -> Result<(f64, f64)> {
        let m = self.module(module)?;
        Ok((m.x, m.y))
    }

    fn set_module_position(&mut self, module: ModuleId, x: f64, y: f64) -> Result<()> {
        self.module_mut(module)?.set_position(x, y);
        Ok(())
    }

    fn module_size(&self, module: ModuleId) -> Result<(f64, f64)> {
        let m = self.module(module)?;
        Ok((m.width, m.height))
    }

    fn module_pins(&self, module: ModuleId) -> Result<&[PinId]> {
        Ok(self.module(module)?.pins())
    }

    fn pin_net(&self, pin: PinId) -> Result<NetId> {
        Ok(self.pin(pin)?.net)
    }

    fn net_pins(&self, net: NetId) -> Result<&[PinId]> {
        Ok(self.net(net)?.pins())
    }

    fn pin_position(&self, pin: PinId) -> Result<(f64, f64)> {
        let p = self.pin(pin)?;
        let (cx, cy) = self.module(p.module)?.center();
        Ok((cx + p.x_offset, cy + p.y_offset))
    }
}
