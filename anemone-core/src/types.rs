use glam::DVec3;

use crate::error::{FeederError, Result};

/// A position in the normalized simulation space.
pub type Point3 = DVec3;

/// A direction or displacement in the simulation space.
pub type Vector3 = DVec3;

/// Index of a tentacle within [`crate::anemone::Anemone::tentacles`].
///
/// Tentacles are stored in angular order around the disk, so the id is
/// also the tentacle's position in that order.
pub type TentacleId = usize;

/// Builds a 3-vector from a slice of components.
///
/// Fails when the slice does not hold exactly three finite values.
pub fn vector_from_components(name: &'static str, components: &[f64]) -> Result<Vector3> {
    let [x, y, z] = components else {
        return Err(FeederError::invalid(
            name,
            format!("expected 3 components, got {}", components.len()),
        ));
    };
    let v = DVec3::new(*x, *y, *z);
    ensure_finite_vector(name, v)?;
    Ok(v)
}

/// Rejects vectors with NaN or infinite components.
pub fn ensure_finite_vector(name: &'static str, v: Vector3) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(FeederError::invalid(
            name,
            format!("components must be finite, got {v}"),
        ))
    }
}

/// Rejects NaN or infinite scalars.
pub fn ensure_finite_scalar(name: &'static str, x: f64) -> Result<()> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(FeederError::invalid(name, format!("must be a finite number, got {x}")))
    }
}

/// Returns a unit-length copy of `v`, or an error for the zero vector.
pub fn normalize(name: &'static str, v: Vector3) -> Result<Vector3> {
    v.try_normalize()
        .ok_or_else(|| FeederError::invalid(name, "cannot normalize a zero-length vector"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_from_components_accepts_three_values() {
        let v = vector_from_components("current", &[0.1, -0.2, 0.3]).unwrap();
        assert_eq!(v, DVec3::new(0.1, -0.2, 0.3));
    }

    #[test]
    fn vector_from_components_rejects_wrong_dimension() {
        let err = vector_from_components("current", &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.parameter(), "current");

        let err = vector_from_components("current", &[1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert_eq!(err.parameter(), "current");
    }

    #[test]
    fn vector_from_components_rejects_non_finite() {
        assert!(vector_from_components("current", &[f64::NAN, 0.0, 0.0]).is_err());
        assert!(vector_from_components("current", &[0.0, f64::INFINITY, 0.0]).is_err());
    }

    #[test]
    fn normalize_rejects_zero_vector() {
        let err = normalize("disk_normal_vector", DVec3::ZERO).unwrap_err();
        assert_eq!(err.parameter(), "disk_normal_vector");
    }

    #[test]
    fn normalize_returns_unit_vector() {
        let n = normalize("v", DVec3::new(3.0, 4.0, 0.0)).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!((n - DVec3::new(0.6, 0.8, 0.0)).length() < 1e-12);
    }
}
