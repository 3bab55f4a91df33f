//! Orbit parameters derived from mean motion.
//!
//! Two-body Keplerian mechanics under a circular-orbit approximation:
//! eccentricity is ignored, so altitude is the semi-major axis minus the mean
//! body radius.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Seconds in a solar day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Gravitational parameter and mean radius of the body being orbited
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralBody {
    /// Standard gravitational parameter in km^3/s^2
    pub mu_km3_s2: f64,
    /// Mean radius in km
    pub radius_km: f64,
}

impl CentralBody {
    /// Earth: `MU = 398600.4418 km^3/s^2`, mean radius 6371 km
    pub const EARTH: Self = Self { mu_km3_s2: 398_600.441_8, radius_km: 6_371.0 };

    /// Build a body from configuration values.
    pub fn new(mu_km3_s2: f64, radius_km: f64) -> Result<Self> {
        if !(mu_km3_s2.is_finite() && mu_km3_s2 > 0.0) {
            return Err(IngestError::Config(format!("gravitational parameter must be positive, got {mu_km3_s2}")));
        }
        if !(radius_km.is_finite() && radius_km >= 0.0) {
            return Err(IngestError::Config(format!("body radius must be non-negative, got {radius_km}")));
        }
        Ok(Self { mu_km3_s2, radius_km })
    }

    /// Derive period, semi-major axis and altitude from a mean motion in rev/day.
    pub fn derive(&self, mean_motion: f64) -> Result<DerivedOrbit> {
        if !(mean_motion.is_finite() && mean_motion > 0.0) {
            return Err(IngestError::InvalidOrbitalElements(format!(
                "mean motion must be positive, got {mean_motion}"
            )));
        }

        let period_s = SECONDS_PER_DAY / mean_motion;
        let semi_major_axis_km = (self.mu_km3_s2.sqrt() * period_s / (2.0 * PI)).powf(2.0 / 3.0);

        Ok(DerivedOrbit {
            period_s,
            semi_major_axis_km,
            altitude_km: semi_major_axis_km - self.radius_km,
        })
    }
}

impl Default for CentralBody {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Instantaneous orbit parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedOrbit {
    /// Orbital period in seconds
    pub period_s: f64,
    /// Semi-major axis in km
    pub semi_major_axis_km: f64,
    /// Altitude above the mean radius in km
    pub altitude_km: f64,
}
