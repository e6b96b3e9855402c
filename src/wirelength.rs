//! Half-perimeter wirelength (HPWL) evaluation.
//!
//! HPWL of a net is the half perimeter of the bounding box around its
//! pins: `(max_x - min_x) + (max_y - min_y)`. The annealer only ever
//! needs the wirelength around one or two modules, so the per-module
//! evaluator below scans just the nets touching that module.
//!
//! All functions are pure reads of the current positions.

use crate::error::Result;
use crate::ids::{ModuleId, NetId};
use crate::netlist::PlacementDb;

/// How [`module_wirelength`] treats a net reached through several pins
/// of the same module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetVisit {
    /// Visit the net once per module pin on it, so a net with `k` pins on
    /// the module is summed `k` times. Matches the classic
    /// per-pin formulation.
    #[default]
    PerPin,

    /// Visit each incident net exactly once per evaluation.
    Unique,
}

/// HPWL of a single net.
///
/// Nets with fewer than two pins contribute 0.
pub fn net_hpwl<D: PlacementDb + ?Sized>(db: &D, net: NetId) -> Result<f64> {
    let pins = db.net_pins(net)?;
    if pins.len() < 2 {
        return Ok(0.0);
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &pin in pins {
        let (x, y) = db.pin_position(pin)?;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    Ok((max_x - min_x) + (max_y - min_y))
}

/// Sum of HPWL over every net incident to `module`.
///
/// A module without pins evaluates to 0.
///
/// # Examples
///
/// ```
/// use u_place::netlist::{Boundary, Placement, PlacementDb};
/// use u_place::wirelength::{module_wirelength, NetVisit};
///
/// let mut p = Placement::new(Boundary::new(0.0, 10.0, 0.0, 10.0));
/// let a = p.add_module("a", 0.0, 0.0);
/// let b = p.add_module("b", 0.0, 0.0);
/// let n = p.add_net("n");
/// p.add_pin(a, n, 0.0, 0.0).unwrap();
/// p.add_pin(a, n, 0.0, 0.0).unwrap();
/// p.add_pin(b, n, 0.0, 0.0).unwrap();
/// p.set_module_position(b, 2.0, 1.0).unwrap();
///
/// assert_eq!(module_wirelength(&p, a, NetVisit::PerPin).unwrap(), 6.0);
/// assert_eq!(module_wirelength(&p, a, NetVisit::Unique).unwrap(), 3.0);
/// ```
pub fn module_wirelength<D: PlacementDb + ?Sized>(
    db: &D,
    module: ModuleId,
    visit: NetVisit,
) -> Result<f64> {
    let pins = db.module_pins(module)?;
    let mut total = 0.0;

    match visit {
        NetVisit::PerPin => {
            for &pin in pins {
                total += net_hpwl(db, db.pin_net(pin)?)?;
            }
        }
        NetVisit::Unique => {
            // Modules carry a handful of pins; a linear scan beats hashing.
            let mut seen: Vec<NetId> = Vec::with_capacity(pins.len());
            for &pin in pins {
                let net = db.pin_net(pin)?;
                if seen.contains(&net) {
                    continue;
                }
                seen.push(net);
                total += net_hpwl(db, net)?;
            }
        }
    }

    Ok(total)
}

/// `module_wirelength(a) + module_wirelength(b)`.
///
/// This is the local cost the annealer compares before and after a swap.
/// Nets shared by `a` and `b` are counted from both sides.
pub fn pair_wirelength<D: PlacementDb + ?Sized>(
    db: &D,
    a: ModuleId,
    b: ModuleId,
    visit: NetVisit,
) -> Result<f64> {
    Ok(module_wirelength(db, a, visit)? + module_wirelength(db, b, visit)?)
}

/// Whole-placement HPWL: the sum of [`net_hpwl`] over every net.
///
/// With the `parallel` feature the nets are evaluated on the rayon pool;
/// the final sum is still taken in net order so the result does not
/// depend on scheduling.
pub fn total_hpwl<D: PlacementDb + ?Sized>(db: &D) -> Result<f64> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let per_net: Result<Vec<f64>> = (0..db.num_nets())
            .into_par_iter()
            .map(|i| net_hpwl(db, NetId::from_raw(i as u32)))
            .collect();
        // Start from +0.0; an empty `sum()` of floats is -0.0.
        Ok(per_net?.iter().fold(0.0, |acc, v| acc + v))
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut total = 0.0;
        for i in 0..db.num_nets() {
            total += net_hpwl(db, NetId::from_raw(i as u32))?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::{Boundary, Placement};

    fn point_module(p: &mut Placement, name: &str, x: f64, y: f64) -> ModuleId {
        let id = p.add_module(name, 0.0, 0.0);
        p.set_module_position(id, x, y).unwrap();
        id
    }

    fn region() -> Placement {
        Placement::new(Boundary::new(0.0, 100.0, 0.0, 100.0))
    }

    #[test]
    fn test_net_hpwl_bounding_box() {
        let mut p = region();
        let a = point_module(&mut p, "a", 1.0, 1.0);
        let b = point_module(&mut p, "b", 4.0, 2.0);
        let c = point_module(&mut p, "c", 2.0, 7.0);
        let n = p.add_net("n");
        for m in [a, b, c] {
            p.add_pin(m, n, 0.0, 0.0).unwrap();
        }
        assert_eq!(net_hpwl(&p, n).unwrap(), 3.0 + 6.0);
    }

    #[test]
    fn test_single_pin_net_is_zero() {
        let mut p = region();
        let a = point_module(&mut p, "a", 30.0, 40.0);
        let n = p.add_net("lonely");
        p.add_pin(a, n, 5.0, 5.0).unwrap();
        assert_eq!(net_hpwl(&p, n).unwrap(), 0.0);
        assert_eq!(module_wirelength(&p, a, NetVisit::PerPin).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_net_is_zero() {
        let mut p = region();
        let n = p.add_net("empty");
        assert_eq!(net_hpwl(&p, n).unwrap(), 0.0);
    }

    #[test]
    fn test_pinless_module_is_zero() {
        let mut p = region();
        let a = point_module(&mut p, "a", 3.0, 3.0);
        assert_eq!(module_wirelength(&p, a, NetVisit::PerPin).unwrap(), 0.0);
        assert_eq!(module_wirelength(&p, a, NetVisit::Unique).unwrap(), 0.0);
    }

    #[test]
    fn test_module_wirelength_sums_incident_nets_only() {
        let mut p = region();
        let a = point_module(&mut p, "a", 0.0, 0.0);
        let b = point_module(&mut p, "b", 3.0, 0.0);
        let c = point_module(&mut p, "c", 0.0, 5.0);
        let d = point_module(&mut p, "d", 50.0, 50.0);
        let ab = p.add_net("ab");
        let ac = p.add_net("ac");
        let cd = p.add_net("cd");
        p.add_pin(a, ab, 0.0, 0.0).unwrap();
        p.add_pin(b, ab, 0.0, 0.0).unwrap();
        p.add_pin(a, ac, 0.0, 0.0).unwrap();
        p.add_pin(c, ac, 0.0, 0.0).unwrap();
        p.add_pin(c, cd, 0.0, 0.0).unwrap();
        p.add_pin(d, cd, 0.0, 0.0).unwrap();

        assert_eq!(module_wirelength(&p, a, NetVisit::PerPin).unwrap(), 8.0);
        assert_eq!(pair_wirelength(&p, a, b, NetVisit::PerPin).unwrap(), 11.0);
    }

    #[test]
    fn test_per_pin_counts_repeated_net_and_unique_does_not() {
        let mut p = region();
        let a = point_module(&mut p, "a", 0.0, 0.0);
        let b = point_module(&mut p, "b", 4.0, 4.0);
        let n = p.add_net("n");
        p.add_pin(a, n, 0.0, 0.0).unwrap();
        p.add_pin(a, n, 0.0, 0.0).unwrap();
        p.add_pin(a, n, 0.0, 0.0).unwrap();
        p.add_pin(b, n, 0.0, 0.0).unwrap();

        assert_eq!(module_wirelength(&p, a, NetVisit::PerPin).unwrap(), 24.0);
        assert_eq!(module_wirelength(&p, a, NetVisit::Unique).unwrap(), 8.0);
    }

    #[test]
    fn test_total_hpwl_counts_each_net_once() {
        let mut p = region();
        let a = point_module(&mut p, "a", 0.0, 0.0);
        let b = point_module(&mut p, "b", 1.0, 2.0);
        let n0 = p.add_net("n0");
        let n1 = p.add_net("n1");
        p.add_pin(a, n0, 0.0, 0.0).unwrap();
        p.add_pin(a, n0, 0.0, 0.0).unwrap();
        p.add_pin(b, n0, 0.0, 0.0).unwrap();
        p.add_pin(a, n1, 0.0, 0.0).unwrap();
        p.add_pin(b, n1, 0.0, 0.0).unwrap();

        assert_eq!(total_hpwl(&p).unwrap(), 6.0);
        assert_eq!(p.compute_hpwl().unwrap(), 6.0);
    }

    #[test]
    fn test_total_hpwl_without_nets_is_positive_zero() {
        let mut p = region();
        point_module(&mut p, "a", 3.0, 4.0);
        let total = total_hpwl(&p).unwrap();
        assert_eq!(total, 0.0);
        assert!(!total.is_sign_negative());
    }

    #[test]
    fn test_bad_handle_propagates() {
        let p = region();
        assert!(module_wirelength(&p, ModuleId::from_raw(0), NetVisit::PerPin).is_err());
        assert!(net_hpwl(&p, NetId::from_raw(0)).is_err());
    }
}
