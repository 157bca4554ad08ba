//! Named planning scenarios used by the stress binary and tests.

use anyhow::Result;
use evg_core::{generate_obstacles, FieldConfig, Obstacle, Point3, DEFAULT_MIN_GAP};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A start/goal query over a fixed obstacle set.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub start: Point3,
    pub goal: Point3,
    pub obstacles: Vec<Obstacle>,
    /// Whether a route must exist; `None` when it depends on the draw
    pub expect_path: Option<bool>,
}

fn boxes(bounds: &[[f64; 6]]) -> Result<Vec<Obstacle>> {
    Ok(bounds
        .iter()
        .map(|&b| Obstacle::try_from(b))
        .collect::<Result<_, _>>()?)
}

/// Two blocks straddling the direct line.
pub fn create_two_blocks_scenario() -> Result<Scenario> {
    Ok(Scenario {
        name: "two_blocks".to_string(),
        start: Point3::new(0.0, 15.0, 2.0),
        goal: Point3::new(60.0, 15.0, 2.0),
        obstacles: boxes(&[
            [10.0, 10.0, 0.0, 20.0, 20.0, 15.0],
            [40.0, 10.0, 0.0, 50.0, 20.0, 15.0],
        ])?,
        expect_path: Some(true),
    })
}

/// Staggered towers of different heights; corners exist on several cut planes.
pub fn create_staggered_towers_scenario() -> Result<Scenario> {
    Ok(Scenario {
        name: "staggered_towers".to_string(),
        start: Point3::new(0.0, 0.0, 5.0),
        goal: Point3::new(300.0, 300.0, 25.0),
        obstacles: boxes(&[
            [40.0, 30.0, 0.0, 90.0, 80.0, 45.0],
            [110.0, 120.0, 0.0, 160.0, 170.0, 25.0],
            [200.0, 190.0, 0.0, 250.0, 260.0, 35.0],
            [120.0, 20.0, 0.0, 180.0, 60.0, 50.0],
            [20.0, 200.0, 0.0, 70.0, 260.0, 30.0],
        ])?,
        expect_path: Some(true),
    })
}

/// Nothing crosses the direct line and no direct edge exists, so there is no route.
pub fn create_open_field_scenario() -> Result<Scenario> {
    Ok(Scenario {
        name: "open_field".to_string(),
        start: Point3::new(0.0, 0.0, 10.0),
        goal: Point3::new(100.0, 0.0, 10.0),
        obstacles: boxes(&[[30.0, 50.0, 0.0, 60.0, 80.0, 30.0]])?,
        expect_path: Some(false),
    })
}

/// Seeded random field across the default extent, corner to corner.
pub fn create_random_field_scenario(seed: u64, count: usize) -> Result<Scenario> {
    let field = FieldConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let obstacles = generate_obstacles(count, DEFAULT_MIN_GAP, &field, &mut rng)?;
    let far = field.extent + field.side_max;
    Ok(Scenario {
        name: format!("random_field_seed_{seed}"),
        start: Point3::new(0.0, 0.0, 5.0),
        goal: Point3::new(far, far, 5.0),
        obstacles,
        expect_path: None,
    })
}

pub fn catalogue() -> Result<Vec<Scenario>> {
    let mut scenarios = vec![
        create_two_blocks_scenario()?,
        create_staggered_towers_scenario()?,
        create_open_field_scenario()?,
    ];
    for seed in [7, 42] {
        scenarios.push(create_random_field_scenario(seed, 40)?);
    }
    Ok(scenarios)
}
