use log::debug;
use rand::Rng;

use crate::{
    error::{FeederError, Result},
    types::{Point3, Vector3, ensure_finite_scalar, ensure_finite_vector},
};

/// Lower bound (inclusive) of every coordinate in the simulation space.
pub const DOMAIN_MIN: f64 = -1.0;
/// Upper bound (exclusive) of every coordinate in the simulation space.
pub const DOMAIN_MAX: f64 = 1.0;
const DOMAIN_WIDTH: f64 = DOMAIN_MAX - DOMAIN_MIN;

/// Beyond this magnitude stepping by the domain width is replaced by a
/// single modulo, since repeated subtraction stalls once 2.0 falls below
/// the value's ulp.
const WRAP_STEP_LIMIT: f64 = 1.0e6;

/// Maps a coordinate back into `[-1.0, 1.0)` as if the space were periodic.
///
/// `1.0` becomes `-1.0`, `1.5` becomes `-0.5`, `-1.2` becomes `0.8`.
pub fn wrap_coordinate(mut c: f64) -> f64 {
    if c.abs() > WRAP_STEP_LIMIT {
        return (c - DOMAIN_MIN).rem_euclid(DOMAIN_WIDTH) + DOMAIN_MIN;
    }
    while c >= DOMAIN_MAX {
        c -= DOMAIN_WIDTH;
    }
    while c < DOMAIN_MIN {
        c += DOMAIN_WIDTH;
    }
    c
}

fn wrap_point(p: Point3) -> Point3 {
    Point3::new(wrap_coordinate(p.x), wrap_coordinate(p.y), wrap_coordinate(p.z))
}

/// A piece of food: a point that never leaves the normalized space.
///
/// Every coordinate stays in `[-1.0, 1.0)`; motion that would leave the
/// space wraps around to the opposite face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Food {
    pos: Point3,
}

impl Food {
    /// Places a piece of food, rejecting positions outside the space.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Self::at(Point3::new(x, y, z))
    }

    pub fn at(pos: Point3) -> Result<Self> {
        let inside = |c: f64| (DOMAIN_MIN..DOMAIN_MAX).contains(&c);
        if pos.to_array().into_iter().all(inside) {
            Ok(Self { pos })
        } else {
            Err(FeederError::invalid(
                "food_position",
                format!("must lie in the normalized space -1.0 <= component < 1.0, got {pos}"),
            ))
        }
    }

    #[inline]
    pub fn pos(&self) -> Point3 {
        self.pos
    }

    /// Jitters the position by a random amount.
    ///
    /// One speed `max_diffusion * U` is drawn for the whole move; each
    /// coordinate then shifts by `speed * U'` in a random direction, with
    /// fresh draws per coordinate. `max_diffusion` bounds each coordinate's
    /// shift, not the length of the move.
    pub fn move_by_diffusion(&mut self, max_diffusion: f64, rng: &mut impl Rng) -> Result<()> {
        ensure_finite_scalar("max_diffusion", max_diffusion)?;

        let speed = max_diffusion * rng.random::<f64>();
        let mut c = self.pos.to_array();
        for v in &mut c {
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            *v = wrap_coordinate(*v + speed * rng.random::<f64>() * sign);
        }
        self.pos = Point3::from_array(c);
        Ok(())
    }

    /// Translates by `current`, wrapping around the faces of the space.
    pub fn move_by_current(&mut self, current: Vector3) -> Result<()> {
        ensure_finite_vector("current", current)?;
        self.pos = wrap_point(self.pos + current);
        Ok(())
    }
}

/// The collection of food still drifting in the space.
#[derive(Clone, Debug, Default)]
pub struct FoodSet {
    pub points: Vec<Food>,
}

impl FoodSet {
    pub fn from_positions(positions: impl IntoIterator<Item = Point3>) -> Result<Self> {
        let points = positions
            .into_iter()
            .map(Food::at)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    /// Scatters `count` pieces uniformly over `[0.0, 1.0)` per coordinate.
    pub fn random_in_unit_octant(count: usize, rng: &mut impl Rng) -> Self {
        debug!("Creating {count} pieces of food");
        let points = (0..count)
            .map(|_| {
                let pos = Point3::new(rng.random(), rng.random(), rng.random());
                debug!("Initialized piece of food at: {}, {}, {}", pos.x, pos.y, pos.z);
                Food { pos }
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3> + '_ {
        self.points.iter().map(Food::pos)
    }

    /// Removes every piece for which `pred` holds.
    ///
    /// `pred` runs exactly once per piece present at call time.
    ///
    /// ### Returns
    /// Positions of the removed pieces, in collection order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Food) -> bool) -> Vec<Point3> {
        let mut removed = Vec::new();
        self.points.retain(|f| {
            if pred(f) {
                removed.push(f.pos);
                false
            } else {
                true
            }
        });
        removed
    }
}
