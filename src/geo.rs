//! Great-circle distance and travel-time estimates.
//!
//! Everything here is pure and allocation free. Coordinates are already range
//! checked by [`Coordinate`], so no validation happens in this module.

use std::time::Duration;

use serde::Serialize;

use crate::domain::types::{Coordinate, TypeConstraintError};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average speed assumed when none is configured.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 40.0;

/// Policy turning a distance into an estimated travel time.
///
/// The speed is a business constant, not a physical law, so callers pass it
/// in explicitly (normally from configuration).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelPolicy {
    average_speed_kmh: f64,
}

impl TravelPolicy {
    pub fn new(average_speed_kmh: f64) -> Result<Self, TypeConstraintError> {
        if average_speed_kmh.is_finite() && average_speed_kmh > 0.0 {
            Ok(Self { average_speed_kmh })
        } else {
            Err(TypeConstraintError::NonPositiveNumber("average speed"))
        }
    }

    pub const fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    /// Travel time for `distance_km` at the configured average speed.
    /// Saturates at [`Duration::MAX`] for absurdly slow speeds.
    pub fn eta(&self, distance_km: f64) -> Duration {
        Duration::try_from_secs_f64(distance_km / self.average_speed_kmh * 3600.0)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for TravelPolicy {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

/// Distance annotation attached to query results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelEstimate {
    pub distance_km: f64,
    #[serde(skip)]
    pub eta: Duration,
}

impl TravelEstimate {
    /// Estimated travel time rounded to whole minutes.
    pub fn eta_minutes(&self) -> u64 {
        (self.eta.as_secs_f64() / 60.0).round() as u64
    }
}

/// Haversine distance in kilometres between two coordinates.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.get().to_radians();
    let lat2 = to.latitude.get().to_radians();
    let d_lat = (to.latitude.get() - from.latitude.get()).to_radians();
    let d_lon = (to.longitude.get() - from.longitude.get()).to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();
    let a = half_lat * half_lat + lat1.cos() * lat2.cos() * half_lon * half_lon;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two points plus the travel time implied by `policy`.
pub fn distance_and_eta(from: Coordinate, to: Coordinate, policy: TravelPolicy) -> TravelEstimate {
    let distance_km = haversine_km(from, to);
    TravelEstimate {
        distance_km,
        eta: policy.eta(distance_km),
    }
}
