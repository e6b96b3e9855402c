//! End-to-end runs of the placer against the arena placement database.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_place::ids::ModuleId;
use u_place::netlist::{Boundary, Placement, PlacementDb};
use u_place::place::{Acceptance, AnnealConfig, GlobalPlacer};
use u_place::plot::write_gnuplot;
use u_place::wirelength::NetVisit;

fn quick_schedule(seed: u64) -> AnnealConfig {
    AnnealConfig::default()
        .with_initial_temperature(10.0)
        .with_stop_temperature(1e-5)
        .with_fast_temperature(1e-3)
        .with_refine_temperature(1e-4)
        .with_cooling_rate(0.995)
        .with_refine_cooling_rate(0.998)
        .with_seed(seed)
}

/// `n` modules wired by `edges` two-pin nets.
fn netlist(n: usize, edges: &[(usize, usize)], boundary: Boundary) -> Placement {
    let mut p = Placement::new(boundary);
    let ids: Vec<ModuleId> = (0..n)
        .map(|i| p.add_module(format!("m{i}"), 1.0, 1.0))
        .collect();
    for (k, &(a, b)) in edges.iter().enumerate() {
        let net = p.add_net(format!("n{k}"));
        p.add_pin(ids[a % n], net, 0.0, 0.0).unwrap();
        p.add_pin(ids[b % n], net, 0.0, 0.0).unwrap();
    }
    p
}

fn positions(p: &Placement) -> Vec<(f64, f64)> {
    p.modules().iter().map(|m| (m.x(), m.y())).collect()
}

#[test]
fn two_modules_one_net_reference_schedule() {
    let mut placement = Placement::new(Boundary::new(0.0, 10.0, 0.0, 10.0));
    let a = placement.add_module("a", 1.0, 1.0);
    let b = placement.add_module("b", 1.0, 1.0);
    let net = placement.add_net("n0");
    placement.add_pin(a, net, 0.0, 0.0).unwrap();
    placement.add_pin(b, net, 0.0, 0.0).unwrap();

    let config = AnnealConfig::default();

    // HPWL of the random starting point, reproduced independently.
    let mut reference = placement.clone();
    let mut rng = StdRng::seed_from_u64(config.seed);
    GlobalPlacer::initialize(&mut reference, &mut rng).unwrap();
    let initial = reference.compute_hpwl().unwrap();

    let result = GlobalPlacer::new(config).place(&mut placement).unwrap();

    assert_eq!(result.initial_hpwl, initial);
    assert_eq!(result.final_hpwl, placement.compute_hpwl().unwrap());
    assert!(result.final_hpwl <= initial);
    assert!(!result.cancelled);
    assert!(result.iterations > 0);
}

#[test]
fn repeated_runs_are_bit_identical() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (4, 5), (5, 1)];
    let boundary = Boundary::new(-20.0, 20.0, 0.0, 30.0);
    let mut first = netlist(6, &edges, boundary);
    let mut second = netlist(6, &edges, boundary);

    let placer = GlobalPlacer::new(quick_schedule(777));
    placer.place(&mut first).unwrap();
    placer.place(&mut second).unwrap();

    let bits = |p: &Placement| -> Vec<(u64, u64)> {
        positions(p)
            .into_iter()
            .map(|(x, y)| (x.to_bits(), y.to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn clustered_netlist_improves() {
    // Two tight cliques joined by one net.
    let mut edges = Vec::new();
    for group in [0usize, 5] {
        for i in 0..5 {
            for j in (i + 1)..5 {
                edges.push((group + i, group + j));
            }
        }
    }
    edges.push((0, 5));
    let mut p = netlist(10, &edges, Boundary::new(0.0, 100.0, 0.0, 100.0));

    let result = GlobalPlacer::new(quick_schedule(5)).place(&mut p).unwrap();
    assert!(result.final_hpwl < result.initial_hpwl);
    assert!(result.improving_moves > 0);
    assert_eq!(*result.hpwl_history.last().unwrap(), result.final_hpwl);
}

#[test]
fn plot_reports_final_wirelength() {
    let mut p = netlist(4, &[(0, 1), (2, 3)], Boundary::new(0.0, 10.0, 0.0, 10.0));
    GlobalPlacer::new(quick_schedule(9)).place(&mut p).unwrap();

    let mut buf = Vec::new();
    write_gnuplot(&p, &mut buf).unwrap();
    let script = String::from_utf8(buf).unwrap();
    assert_eq!(script.matches("EOF\n").count(), 2);
    // boundary box + 4 module boxes, 5 lines each
    let coordinate_lines = script
        .lines()
        .filter(|l| l.contains(", ") && !l.starts_with("plot") && *l != "0.00, 0.00")
        .count();
    assert_eq!(coordinate_lines, 25);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn modules_never_leave_boundary(
        n in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..20),
        seed in any::<u64>(),
        metropolis in any::<bool>(),
    ) {
        let boundary = Boundary::new(-5.0, 15.0, 2.0, 9.0);
        let mut p = netlist(n, &edges, boundary);
        let acceptance = if metropolis { Acceptance::Metropolis } else { Acceptance::LateMetropolis };
        let config = quick_schedule(seed).with_acceptance(acceptance).with_max_iterations(2_000);
        GlobalPlacer::new(config).place(&mut p).unwrap();
        for m in p.modules() {
            prop_assert!(boundary.contains(m.x(), m.y()));
        }
    }

    #[test]
    fn swaps_only_permute_positions(
        n in 1usize..10,
        edges in prop::collection::vec((0usize..10, 0usize..10), 0..15),
        seed in any::<u64>(),
        unique in any::<bool>(),
    ) {
        let boundary = Boundary::new(0.0, 50.0, 0.0, 50.0);
        let visit = if unique { NetVisit::Unique } else { NetVisit::PerPin };
        let config = quick_schedule(seed).with_net_visit(visit).with_max_iterations(1_000);

        let mut initial = netlist(n, &edges, boundary);
        let mut rng = StdRng::seed_from_u64(seed);
        GlobalPlacer::initialize(&mut initial, &mut rng).unwrap();

        let mut p = netlist(n, &edges, boundary);
        GlobalPlacer::new(config).place(&mut p).unwrap();

        let key = |a: &(f64, f64), b: &(f64, f64)| a.partial_cmp(b).unwrap();
        let mut before = positions(&initial);
        let mut after = positions(&p);
        before.sort_by(key);
        after.sort_by(key);
        prop_assert_eq!(before, after);
    }
}
