//! # Spatial Index Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use comms_if::eqpt::{
    dbw::StopSignal,
    lane::{Lane, Waypoint},
    veh::VehPose,
};
use dbw_lib::waypoint_updater::{
    path_window, InputData, Params, RefLane, SpatialIndex, WaypointUpdater,
};
use nalgebra::Vector2;
use std::sync::Arc;
use util::module::State;

fn spatial_index_benchmark(c: &mut Criterion) {
    // ---- Build a dummy loop route ----

    // Circle of radius 200 m with waypoints roughly every 0.5 m
    let num_wps = 2500;
    let waypoints: Vec<Waypoint> = (0..num_wps)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (num_wps as f64);
            Waypoint::new(200.0 * theta.cos(), 200.0 * theta.sin(), 11.0)
        })
        .collect();

    c.bench_function("SpatialIndex::build", |b| {
        b.iter(|| SpatialIndex::build(&waypoints).unwrap())
    });

    let lane = Arc::new(RefLane::new(Lane::new(waypoints)).unwrap());
    let point = Vector2::new(141.0, -142.5);

    c.bench_function("SpatialIndex::query", |b| {
        b.iter(|| lane.index().query(&point))
    });

    let pose = VehPose::new(141.0, -142.5);

    c.bench_function("path_window::resolve_forward_index", |b| {
        b.iter(|| path_window::resolve_forward_index(&pose, &lane))
    });

    let mut wu = WaypointUpdater::from_params(Params::default()).unwrap();
    let input = InputData {
        lane: lane.clone(),
        pose,
        stop: StopSignal::At(2160),
    };

    c.bench_function("WaypointUpdater::proc", |b| {
        b.iter(|| wu.proc(&input).unwrap())
    });
}

criterion_group!(benches, spatial_index_benchmark);
criterion_main!(benches);
