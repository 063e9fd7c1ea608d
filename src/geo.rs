//! Geographic primitives and their tolerant equality.
//!
//! Values that go through the native map come back with a little projection drift, so nothing
//! in here compares floats exactly. Coordinates, spans and angles use an absolute tolerance of
//! [`COORDINATE_TOLERANCE`] degrees (about a centimeter); map-unit geometry uses
//! [`MAP_POINT_TOLERANCE`].
//!
//! Note that tolerant equality is not transitive, which is why none of these types implement
//! `Eq` or `Hash`.

use cgmath::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absolute tolerance for degrees (latitude, longitude, span deltas, pitch, heading).
pub const COORDINATE_TOLERANCE: f64 = 1e-7;

/// Absolute tolerance for projected map points.
pub const MAP_POINT_TOLERANCE: f64 = 1e-3;

/// Absolute tolerance for camera altitude, in meters.
pub const ALTITUDE_TOLERANCE: f64 = 1e-3;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MAX_PITCH: f64 = 90.0;

/// Errors from the checked constructors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} out of range [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    InvalidLongitude(f64),

    #[error("span deltas must be finite and non-negative (got {0}, {1})")]
    InvalidSpan(f64, f64),

    #[error("camera pitch {0} out of range [0, 90]")]
    InvalidPitch(f64),

    #[error("camera altitude {0} must be finite and non-negative")]
    InvalidAltitude(f64),
}

#[inline]
fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting values outside the valid ranges.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Coordinate, GeoError> {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Coordinate::new(latitude, longitude))
    }

    /// Returns true if the coordinate is within the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        Coordinate::checked(self.latitude, self.longitude).is_ok()
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Coordinate) -> bool {
        close(self.latitude, other.latitude, COORDINATE_TOLERANCE)
            && close(self.longitude, other.longitude, COORDINATE_TOLERANCE)
    }
}

/// Latitude and longitude extent of a region, in degrees.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CoordinateSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl CoordinateSpan {
    pub const fn new(latitude_delta: f64, longitude_delta: f64) -> CoordinateSpan {
        CoordinateSpan {
            latitude_delta,
            longitude_delta,
        }
    }

    pub fn checked(latitude_delta: f64, longitude_delta: f64) -> Result<CoordinateSpan, GeoError> {
        let valid = |d: f64| d.is_finite() && d >= 0.;
        if !valid(latitude_delta) || !valid(longitude_delta) {
            return Err(GeoError::InvalidSpan(latitude_delta, longitude_delta));
        }
        Ok(CoordinateSpan::new(latitude_delta, longitude_delta))
    }
}

impl PartialEq for CoordinateSpan {
    fn eq(&self, other: &CoordinateSpan) -> bool {
        close(self.latitude_delta, other.latitude_delta, COORDINATE_TOLERANCE)
            && close(self.longitude_delta, other.longitude_delta, COORDINATE_TOLERANCE)
    }
}

/// A region: center plus span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

impl Region {
    pub const fn new(center: Coordinate, span: CoordinateSpan) -> Region {
        Region { center, span }
    }

    /// Smallest region containing all coordinates, or None if there are none.
    pub fn bounding(coordinates: &[Coordinate]) -> Option<Region> {
        let first = coordinates.first()?;
        let (mut min, mut max) = (*first, *first);
        for c in &coordinates[1..] {
            min.latitude = min.latitude.min(c.latitude);
            min.longitude = min.longitude.min(c.longitude);
            max.latitude = max.latitude.max(c.latitude);
            max.longitude = max.longitude.max(c.longitude);
        }
        Some(Region {
            center: Coordinate::new(
                (min.latitude + max.latitude) / 2.,
                (min.longitude + max.longitude) / 2.,
            ),
            span: CoordinateSpan::new(max.latitude - min.latitude, max.longitude - min.longitude),
        })
    }
}

/// A rectangle in projected map units.
///
/// The projection itself belongs to the native map; this is only a value to compare and pass
/// back and forth.
#[derive(Debug, Clone, Copy)]
pub struct MapRect {
    pub origin: Point2<f64>,
    pub size: Vector2<f64>,
}

impl MapRect {
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> MapRect {
        MapRect { origin, size }
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0. || self.size.y <= 0.
    }
}

impl Default for MapRect {
    fn default() -> MapRect {
        MapRect::new(Point2::new(0., 0.), Vector2::new(0., 0.))
    }
}

impl PartialEq for MapRect {
    fn eq(&self, other: &MapRect) -> bool {
        close(self.origin.x, other.origin.x, MAP_POINT_TOLERANCE)
            && close(self.origin.y, other.origin.y, MAP_POINT_TOLERANCE)
            && close(self.size.x, other.size.x, MAP_POINT_TOLERANCE)
            && close(self.size.y, other.size.y, MAP_POINT_TOLERANCE)
    }
}

/// A 3D camera looking at the map.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    /// The coordinate the camera looks at.
    pub center: Coordinate,

    /// Altitude above ground, in meters.
    pub altitude: f64,

    /// Viewing angle in degrees; 0 looks straight down.
    pub pitch: f64,

    /// Heading in degrees clockwise from north.
    pub heading: f64,
}

impl Camera {
    pub fn checked(
        center: Coordinate,
        altitude: f64,
        pitch: f64,
        heading: f64,
    ) -> Result<Camera, GeoError> {
        let center = Coordinate::checked(center.latitude, center.longitude)?;
        if !altitude.is_finite() || altitude < 0. {
            return Err(GeoError::InvalidAltitude(altitude));
        }
        if !(0.0..=MAX_PITCH).contains(&pitch) {
            return Err(GeoError::InvalidPitch(pitch));
        }
        Ok(Camera {
            center,
            altitude,
            pitch,
            heading: heading.rem_euclid(360.),
        })
    }
}

impl PartialEq for Camera {
    fn eq(&self, other: &Camera) -> bool {
        self.center == other.center
            && close(self.altitude, other.altitude, ALTITUDE_TOLERANCE)
            && close(self.pitch, other.pitch, COORDINATE_TOLERANCE)
            && close(self.heading, other.heading, COORDINATE_TOLERANCE)
    }
}
