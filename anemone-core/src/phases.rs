//! The two phases of a simulation step.
//!
//! 1. [`motion_phase`] — every piece of food diffuses, then drifts with
//!    the current.
//! 2. [`consumption_phase`] — pieces the anemone reacts to are removed.
//!
//! Motion finishes for every piece before any consumption test runs, so
//! the anemone always sees post-motion positions.

use log::info;
use rand::Rng;

use crate::{
    anemone::{Anemone, ConsumptionScan},
    error::Result,
    food::FoodSet,
    types::{Point3, Vector3},
};

/// Moves every piece of food by diffusion and then by `current`.
///
/// ### Parameters
/// - `food` - Food to move; pieces move independently of each other.
/// - `current` - Translation applied to every piece after diffusion.
/// - `max_diffusion` - Per-coordinate diffusion ceiling.
/// - `rng` - Source of the diffusion draws.
///
/// ### Errors
/// Propagates the first motion error (a non-finite argument).
pub fn motion_phase(
    food: &mut FoodSet,
    current: Vector3,
    max_diffusion: f64,
    rng: &mut impl Rng,
) -> Result<()> {
    for piece in &mut food.points {
        piece.move_by_diffusion(max_diffusion, rng)?;
        piece.move_by_current(current)?;
    }
    Ok(())
}

/// Removes the food the anemone reacts to.
///
/// Every piece present when the phase starts is tested exactly once.
///
/// ### Returns
/// Positions of the consumed pieces.
pub fn consumption_phase(
    anemone: &Anemone,
    food: &mut FoodSet,
    scan: ConsumptionScan,
) -> Vec<Point3> {
    let consumed = food.remove_where(|piece| anemone.will_consume_with(piece.pos(), scan));
    for p in &consumed {
        info!("Anemone consumed piece at: {}, {}, {}", p.x, p.y, p.z);
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use glam::DVec3;

    fn anemone() -> Anemone {
        Anemone::new(4, DVec3::ZERO, 0.1, DVec3::Y, 0.2, 5).unwrap()
    }

    #[test]
    fn motion_phase_applies_current_to_every_piece() {
        let mut food = FoodSet::from_positions([DVec3::ZERO, DVec3::new(0.5, 0.5, 0.5)]).unwrap();
        let mut rng = create_rng(Some(0));

        motion_phase(&mut food, DVec3::new(0.1, 0.0, 0.0), 0.0, &mut rng).unwrap();

        let pos: Vec<_> = food.positions().collect();
        assert!((pos[0] - DVec3::new(0.1, 0.0, 0.0)).length() < 1e-12);
        assert!((pos[1] - DVec3::new(0.6, 0.5, 0.5)).length() < 1e-12);
    }

    #[test]
    fn motion_phase_propagates_bad_current() {
        let mut food = FoodSet::from_positions([DVec3::ZERO]).unwrap();
        let mut rng = create_rng(Some(0));
        let err = motion_phase(&mut food, DVec3::splat(f64::NAN), 0.0, &mut rng).unwrap_err();
        assert_eq!(err.parameter(), "current");
    }

    #[test]
    fn consumption_phase_removes_only_reachable_food() {
        let anemone = anemone();
        let first = anemone.tentacles()[0][0];
        let mut food =
            FoodSet::from_positions([first, DVec3::new(0.9, 0.9, 0.9), first + DVec3::X * 0.05])
                .unwrap();

        let consumed = consumption_phase(&anemone, &mut food, ConsumptionScan::FirstSensor);

        assert_eq!(consumed.len(), 2);
        assert_eq!(consumed[0], first);
        assert_eq!(food.len(), 1);
        assert_eq!(food.positions().next(), Some(DVec3::new(0.9, 0.9, 0.9)));
    }

    #[test]
    fn consumption_phase_with_empty_food_is_noop() {
        let anemone = anemone();
        let mut food = FoodSet::default();
        let consumed = consumption_phase(&anemone, &mut food, ConsumptionScan::AllSensors);
        assert!(consumed.is_empty());
        assert!(food.is_empty());
    }
}
