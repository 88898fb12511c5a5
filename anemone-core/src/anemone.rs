//! The anemone: a ring of tentacles rooted on the rim of a disk.
//!
//! Tentacles are built once, at construction, from the disk geometry.
//! Each tentacle is a straight row of *sensitive points* that march away
//! from the disk along its normal; food that comes within
//! [`Anemone::reaction_distance`] of a sensitive point is consumed.

use std::f64::consts::TAU;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{FeederError, Result},
    types::{Point3, TentacleId, Vector3, ensure_finite_vector, normalize},
};

/// Multiple of the sensor spacing used as the consumption trigger radius.
pub const REACTION_DISTANCE_FACTOR: f64 = 10.0;

/// How [`Anemone::will_consume_with`] walks the sensitive points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionScan {
    /// Only the root sensor of tentacle 0 is ever examined: the scan
    /// answers on the first point it visits, hit or miss.
    #[default]
    FirstSensor,
    /// Every sensor of every tentacle is examined; any hit consumes.
    AllSensors,
}

#[derive(Clone, Debug)]
pub struct Anemone {
    center: Point3,
    /// Unit normal of the disk.
    orientation: Vector3,
    /// Disk normal exactly as supplied; drives the perpendicular family
    /// and the sensor spacing.
    normal: Vector3,
    disk_radius: f64,
    tentacles: Vec<Vec<Point3>>,
    reaction_distance: f64,
}

impl Anemone {
    /// Validates the disk parameters and builds every tentacle.
    ///
    /// ### Parameters
    /// - `num_tentacles` - Number of tentacles, evenly spaced around the rim (>= 1).
    /// - `disk_center` - Disk center; each component in `[-1.0, 1.0)`.
    /// - `disk_radius` - Disk radius in `(0.0, 1.0)`.
    /// - `disk_normal_vector` - Disk normal; must not be zero and must not lie
    ///   on the z axis (the perpendicular family is undefined there).
    /// - `tentacle_length` - Tentacle length in `(0.0, 1.0)`.
    /// - `num_tentacle_elements` - Sensitive points per tentacle (>= 1).
    ///
    /// ### Returns
    /// A fully built [`Anemone`], or [`FeederError::InvalidParameter`] naming
    /// the first argument that failed validation.
    pub fn new(
        num_tentacles: usize,
        disk_center: Point3,
        disk_radius: f64,
        disk_normal_vector: Vector3,
        tentacle_length: f64,
        num_tentacle_elements: usize,
    ) -> Result<Self> {
        if num_tentacles < 1 {
            return Err(FeederError::invalid(
                "num_tentacles",
                "must be a non zero positive integer",
            ));
        }

        let in_domain = |c: f64| (-1.0..1.0).contains(&c);
        if !disk_center.to_array().into_iter().all(in_domain) {
            return Err(FeederError::invalid(
                "disk_center",
                format!("must lie in the normalized space [-1.0, 1.0), got {disk_center}"),
            ));
        }

        if !(disk_radius > 0.0 && disk_radius < 1.0) {
            return Err(FeederError::invalid(
                "disk_radius",
                format!("must be between 0.0 and 1.0, got {disk_radius}"),
            ));
        }

        ensure_finite_vector("disk_normal_vector", disk_normal_vector)?;
        let orientation = normalize("disk_normal_vector", disk_normal_vector)?;

        if !(tentacle_length > 0.0 && tentacle_length < 1.0) {
            return Err(FeederError::invalid(
                "tentacle_length",
                format!("must be between 0.0 and 1.0, got {tentacle_length}"),
            ));
        }

        if num_tentacle_elements < 1 {
            return Err(FeederError::invalid(
                "num_tentacle_elements",
                "must be a non zero positive integer",
            ));
        }

        let spacing = tentacle_length / num_tentacle_elements as f64;
        let sensor_step = disk_normal_vector * spacing;
        let reaction_distance = spacing * REACTION_DISTANCE_FACTOR;
        debug!("Sensitive distance: {reaction_distance}");

        let angle_between_tentacles = TAU / num_tentacles as f64;
        let mut tentacles = Vec::with_capacity(num_tentacles);
        for i in 0..num_tentacles {
            let theta = i as f64 * angle_between_tentacles;
            let dir = perpendicular(disk_normal_vector, theta).ok_or_else(|| {
                FeederError::invalid(
                    "disk_normal_vector",
                    "x and y components must not both be zero",
                )
            })?;
            let dir = normalize("disk_normal_vector", dir)?;
            let root = disk_center + dir * disk_radius;
            debug!("Initialized tentacle {i} at: {}, {}, {}", root.x, root.y, root.z);

            let tentacle = (0..num_tentacle_elements)
                .map(|j| root + sensor_step * j as f64)
                .collect();
            tentacles.push(tentacle);
        }

        Ok(Self {
            center: disk_center,
            orientation,
            normal: disk_normal_vector,
            disk_radius,
            tentacles,
            reaction_distance,
        })
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn orientation(&self) -> Vector3 {
        self.orientation
    }

    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    pub fn disk_radius(&self) -> f64 {
        self.disk_radius
    }

    pub fn reaction_distance(&self) -> f64 {
        self.reaction_distance
    }

    /// Tentacles in angular order; each lists its sensors root to tip.
    pub fn tentacles(&self) -> &[Vec<Point3>] {
        &self.tentacles
    }

    /// Root (disk rim) point of a tentacle.
    pub fn root(&self, id: TentacleId) -> Option<Point3> {
        self.tentacles.get(id).and_then(|t| t.first().copied())
    }

    /// Every sensitive point, tentacle by tentacle, root to tip.
    pub fn sensitive_points(&self) -> impl Iterator<Item = Point3> + '_ {
        self.tentacles.iter().flatten().copied()
    }

    /// Returns `true` if the anemone reacts to food at `point`.
    ///
    /// Uses [`ConsumptionScan::FirstSensor`]: the outcome is decided by the
    /// distance to the first sensor of the first tentacle alone.
    pub fn will_consume(&self, point: Point3) -> bool {
        self.will_consume_with(point, ConsumptionScan::FirstSensor)
    }

    /// Returns `true` if `point` is strictly closer than the reaction
    /// distance to a sensor visited by `scan`.
    pub fn will_consume_with(&self, point: Point3, scan: ConsumptionScan) -> bool {
        match scan {
            ConsumptionScan::FirstSensor => self
                .sensitive_points()
                .next()
                .is_some_and(|s| s.distance(point) < self.reaction_distance),
            ConsumptionScan::AllSensors => self
                .sensitive_points()
                .any(|s| s.distance(point) < self.reaction_distance),
        }
    }

    /// Hook for letting the current drift the disk.
    ///
    /// The argument is validated but the anemone does not move yet.
    pub fn move_by_current(&mut self, current: Vector3) -> Result<()> {
        ensure_finite_vector("current", current)?;
        // TODO: tilt `orientation` with the current and rebuild tentacles.
        Ok(())
    }
}

/// A direction perpendicular to `normal`, parameterized by angle.
///
/// For `normal = (a, b, c)` and `r = sqrt(a^2 + b^2)`:
///
/// `v(theta) = (-b cos t - (a c / r) sin t, a cos t - (b c / r) sin t, r sin t)`
///
/// Sweeping `theta` over `[0, 2pi)` traces a full ring of perpendicular
/// directions. The result is not normalized.
///
/// ### Returns
/// `None` when `a` and `b` are both zero, where the family is undefined.
pub fn perpendicular(normal: Vector3, theta: f64) -> Option<Vector3> {
    let (a, b, c) = (normal.x, normal.y, normal.z);
    let r = (a * a + b * b).sqrt();
    if r == 0.0 {
        return None;
    }
    let (sin_t, cos_t) = theta.sin_cos();
    Some(Vector3::new(
        -b * cos_t - (a * c / r) * sin_t,
        a * cos_t - (b * c / r) * sin_t,
        r * sin_t,
    ))
}
