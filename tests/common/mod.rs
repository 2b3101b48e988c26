#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;
use u_strpd::generate::{random_instance, GeneratorConfig};
use u_strpd::models::{Instance, Plan};

/// Installs a test subscriber filtered by `RUST_LOG`; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn instance(n_customers: usize, n_drones: usize, share: f64, seed: u64) -> Instance {
    let config = GeneratorConfig::new(n_customers)
        .with_drones(n_drones)
        .with_reachable_share(share);
    random_instance(&config, seed).expect("generator parameters are valid")
}

/// A complete plan with random drone assignments.
///
/// Each drone's trips are laid out left to right along the route where room
/// allows, so a good share of these plans is feasible; the rest overlap or
/// exceed the flight range.
pub fn random_plan(instance: &Instance, drone_share: f64, seed: u64) -> Plan {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_drones = instance.n_drones();
    let mut customers: Vec<usize> = instance.customers().collect();
    customers.shuffle(&mut rng);

    let mut truck = Vec::new();
    let mut groups = vec![Vec::new(); n_drones];
    for c in customers {
        if rng.random_bool(drone_share) {
            groups[rng.random_range(0..n_drones)].push(c);
        } else {
            truck.push(c);
        }
    }

    let depot = instance.depot();
    let route: Vec<usize> = std::iter::once(depot)
        .chain(truck)
        .chain(std::iter::once(depot))
        .collect();
    let len = route.len();

    let (mut drone_customers, mut launches, mut reconvenes) = (Vec::new(), Vec::new(), Vec::new());
    for (d, group) in groups.into_iter().enumerate() {
        if d > 0 {
            drone_customers.push(Plan::SEPARATOR);
            launches.push(Plan::SEPARATOR);
            reconvenes.push(Plan::SEPARATOR);
        }
        let mut cursor = 1;
        for c in group {
            let launch = if cursor < len {
                rng.random_range(cursor..len)
            } else {
                rng.random_range(1..len)
            };
            let reconvene = rng.random_range(launch + 1..=len);
            cursor = reconvene;
            drone_customers.push(c as i64);
            launches.push(launch as i64);
            reconvenes.push(reconvene as i64);
        }
    }
    Plan::new(route, drone_customers, launches, reconvenes)
}
