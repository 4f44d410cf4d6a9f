mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use station_flow_sim::sim::clock::StepInterval;
use station_flow_sim::station::{Personality, RefillPolicy, TankState};

use common::{REFILL_KG, THRESHOLD_KG, dispenser, station};

#[test]
fn stock_stays_within_capacity_for_random_operations() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..50 {
        let capacity = rng.random_range(100.0..10_000.0);
        let mut tank = TankState::new(capacity, rng.random_range(0.0..capacity)).unwrap();
        for _ in 0..200 {
            let amount = rng.random_range(-2.0 * capacity..2.0 * capacity);
            let stock = match rng.random_range(0..3) {
                0 => tank.deplete(amount),
                1 => tank.refill(amount),
                _ => tank.reset(amount),
            };
            assert!(
                (0.0..=capacity).contains(&stock),
                "stock {stock} escaped [0, {capacity}]"
            );
            assert_eq!(stock, tank.current_stock());
        }
    }
}

#[test]
fn simulated_stock_stays_within_capacity() {
    for personality in Personality::ALL {
        let mut sim = station(
            "BOUNDS",
            personality,
            TankState::new(1500.0, 300.0).unwrap(),
            RefillPolicy::Manual,
            StepInterval::FixedMinute,
            personality as u64,
        );
        for i in 0..3000 {
            if i % 700 == 0 {
                sim.refill(2000.0);
            }
            let e = sim.next_event();
            assert!(
                (0.0..=1500.0).contains(&e.stock_kg),
                "{personality}: stock {} out of bounds",
                e.stock_kg
            );
            assert!(e.flow_kg_min > 0.0, "{personality}: flow must be positive");
        }
    }
}

#[test]
fn same_seed_same_events() {
    for interval in [StepInterval::FixedMinute, StepInterval::IRREGULAR_DEFAULT] {
        let mut a = dispenser("DET", 42, interval);
        let mut b = dispenser("DET", 42, interval);
        let run_a: Vec<_> = (0..2000).map(|_| a.next_event()).collect();
        let run_b: Vec<_> = (0..2000).map(|_| b.next_event()).collect();
        assert_eq!(run_a, run_b);
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = dispenser("DET", 1, StepInterval::IRREGULAR_DEFAULT);
    let mut b = dispenser("DET", 2, StepInterval::IRREGULAR_DEFAULT);
    let run_a: Vec<_> = (0..100).map(|_| a.next_event()).collect();
    let run_b: Vec<_> = (0..100).map(|_| b.next_event()).collect();
    assert_ne!(run_a, run_b);
}

#[test]
fn normalized_weights_sum_to_one() {
    for personality in Personality::ALL {
        let stats = personality.is_fitted().then(common::fitted_stats);
        let profile = personality.profile(stats).unwrap();
        let total: f64 = profile.demand.weights().as_array().iter().sum();
        assert!(
            (total - 1.0).abs() < 1e-9,
            "{personality}: weights sum to {total}"
        );
    }
}

#[test]
fn cyclic_hour_is_on_the_unit_circle() {
    let mut sim = dispenser("CAL", 9, StepInterval::IRREGULAR_DEFAULT);
    for _ in 0..5000 {
        let c = sim.next_event().calendar;
        let norm = c.sin_hour.powi(2) + c.cos_hour.powi(2);
        assert!((norm - 1.0).abs() < 1e-9, "hour {}: {norm}", c.hour);
    }
}

#[test]
fn automatic_refill_restores_stock_above_threshold() {
    let mut sim = dispenser("AUTO", 17, StepInterval::FixedMinute);
    let mut previous = sim.tank().current_stock();
    let mut refills = 0;

    for _ in 0..4 * 1440 {
        let e = sim.next_event();
        let depleted = (previous - e.consumed_kg).clamp(0.0, 6000.0);
        if depleted < THRESHOLD_KG {
            assert!(e.is_refill, "{}: refill should fire", e.timestamp);
            assert!(e.stock_kg >= THRESHOLD_KG);
            assert!((e.stock_kg - (depleted + REFILL_KG).min(6000.0)).abs() < 1e-9);
            refills += 1;
        } else {
            assert!(!e.is_refill, "{}: unexpected refill", e.timestamp);
            assert_eq!(e.stock_kg, depleted);
        }
        previous = e.stock_kg;
    }
    assert!(refills > 0, "four dispenser days should need a refill");
}

#[test]
fn manual_policy_never_refills_on_its_own() {
    let mut sim = station(
        "MANUAL",
        Personality::Dispenser,
        TankState::new(1000.0, 1000.0).unwrap(),
        RefillPolicy::Manual,
        StepInterval::FixedMinute,
        3,
    );
    let events: Vec<_> = (0..1440).map(|_| sim.next_event()).collect();
    assert!(events.iter().all(|e| !e.is_refill));
    assert_eq!(events.last().map(|e| e.stock_kg), Some(0.0));

    let receipt = sim.refill(400.0);
    assert_eq!(receipt.stock_kg, 400.0);
    assert!(sim.next_event().is_refill);
    assert!(!sim.next_event().is_refill);
}
