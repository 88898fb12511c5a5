use std::io::Write;

use anemone_core::{
    anemone::{Anemone, ConsumptionScan},
    config::Config,
    error::ConfigError,
    food::FoodSet,
    point_cloud,
    rng::create_rng,
    simulation::{RunLimits, Simulation},
};
use glam::DVec3;

#[test]
fn four_tentacle_example_geometry() {
    let anemone = Anemone::new(4, DVec3::ZERO, 0.1, DVec3::Y, 0.2, 5).unwrap();

    assert_eq!(anemone.tentacles().len(), 4);
    for tentacle in anemone.tentacles() {
        assert_eq!(tentacle.len(), 5);
        assert!((tentacle[0].length() - 0.1).abs() < 1e-12);
        for (j, p) in tentacle.iter().enumerate() {
            assert!((p.y - 0.04 * j as f64).abs() < 1e-12);
        }
    }
    assert!((anemone.reaction_distance() - 0.4).abs() < 1e-12);
}

#[test]
fn single_piece_on_first_sensor_is_eaten_in_one_step() {
    let anemone = Anemone::new(4, DVec3::ZERO, 0.1, DVec3::Y, 0.2, 5).unwrap();
    let first = anemone.tentacles()[0][0];
    let food = FoodSet::from_positions([first]).unwrap();
    let mut sim = Simulation::new(anemone, food, DVec3::ZERO, 0.0, create_rng(Some(5))).unwrap();

    let before = sim.food.len();
    sim.step().unwrap();
    assert_eq!(sim.food.len(), before - 1);
}

#[test]
fn default_run_respects_both_end_conditions() {
    let mut cfg = Config::default();
    cfg.simulation.random_seed = Some(7);
    cfg.simulation.num_timesteps = 200;
    cfg.simulation.min_remaining_food_pieces = 900;
    cfg.simulation.max_food_diffusion_per_timestep = 0.05;

    let mut sim = Simulation::from_config(&cfg).unwrap();
    let report = sim.run(cfg.run_limits()).unwrap();

    assert!(report.steps <= 200);
    assert_eq!(report.remaining_food, sim.food.len());
    assert_eq!(report.remaining_food + report.consumed, 1000);
    if report.steps < 200 {
        assert!(report.remaining_food < 900);
    }
    assert!(sim.food.positions().all(|p| {
        p.to_array().into_iter().all(|c| (-1.0..1.0).contains(&c))
    }));
}

#[test]
fn all_sensor_scan_eats_at_least_as_much() {
    let mut cfg = Config::default();
    cfg.simulation.random_seed = Some(3);
    cfg.simulation.max_food_diffusion_per_timestep = 0.02;
    let limits = RunLimits {
        max_timesteps: 50,
        min_remaining_food: 0,
    };

    let mut first = Simulation::from_config(&cfg).unwrap();
    cfg.simulation.consumption_scan = ConsumptionScan::AllSensors;
    let mut all = Simulation::from_config(&cfg).unwrap();

    // Same seed, so the first step moves both food sets identically.
    let a = first.step().unwrap().consumed.len();
    let b = all.step().unwrap().consumed.len();
    assert!(b >= a);

    let a = first.run(limits).unwrap();
    let b = all.run(limits).unwrap();
    assert_eq!(a.steps, 50);
    assert_eq!(b.steps, 50);
}

#[test]
fn config_file_is_read_with_fallbacks() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{ "model": {{ "num_tentacles": 6 }}, "logging": {{ "level": "debug" }} }}"#
    )
    .unwrap();

    let cfg = Config::from_path(file.path()).unwrap();
    assert_eq!(cfg.model.num_tentacles, 6);
    assert_eq!(cfg.model.num_tentacle_elements, 10);
    assert_eq!(cfg.level_filter(), log::LevelFilter::Debug);
}

#[test]
fn missing_or_malformed_config_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let err = Config::from_path(&bad).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn point_cloud_file_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anemone.xyz");
    let anemone = Anemone::new(3, DVec3::new(0.0, 0.3, 0.0), 0.15, DVec3::Y, 0.4, 10).unwrap();

    point_cloud::save_xyz(&anemone, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1 + 3 * 10);
    assert_eq!(text.lines().next(), Some("0 0.3 0"));

    assert!(point_cloud::save_xyz(&anemone, &path).is_err());
}
