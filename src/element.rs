//! Map elements: annotations and overlays.
//!
//! The declarative side rebuilds its element lists on every render, so an element's identity is
//! its value. Both traits carry an `eq` method that compares against any other element by
//! downcasting, the same way views are compared for diffing; the `impl_annotation!` and
//! `impl_overlay!` macros write that boilerplate from a `PartialEq` impl.

use crate::geo::{Coordinate, Region};
use core::any::Any;
use core::fmt;

/// Implements the `Annotation` trait for a struct that implements `PartialEq`.
///
/// Syntax:
///
/// ```text
/// impl_annotation! {
///     StructName;
///     fn coordinate(&self) -> Coordinate { ... }
///     (optional title/subtitle overrides, using normal rust syntax)
/// }
/// ```
#[macro_export]
macro_rules! impl_annotation {
    (
        $(#[$attr:meta])*
        $struct:ty;
        $($items:tt)*
    ) => {
        $(#[$attr])*
        impl $crate::Annotation for $struct {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn eq(&self, other: &dyn $crate::Annotation) -> bool {
                if let Some(other) = other.as_any().downcast_ref::<$struct>() {
                    self == other
                } else {
                    false
                }
            }

            $($items)*
        }
    };
}

/// Implements the `Overlay` trait for a struct that implements `PartialEq`.
///
/// Same syntax as [`impl_annotation`].
#[macro_export]
macro_rules! impl_overlay {
    (
        $(#[$attr:meta])*
        $struct:ty;
        $($items:tt)*
    ) => {
        $(#[$attr])*
        impl $crate::Overlay for $struct {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn eq(&self, other: &dyn $crate::Overlay) -> bool {
                if let Some(other) = other.as_any().downcast_ref::<$struct>() {
                    self == other
                } else {
                    false
                }
            }

            $($items)*
        }
    };
}

/// A point of interest pinned to a coordinate.
///
/// Should probably be implemented using the [`impl_annotation`] macro.
pub trait Annotation: Any + fmt::Debug + Send + Sync {
    /// The annotated coordinate.
    fn coordinate(&self) -> Coordinate;

    fn title(&self) -> Option<&str> {
        None
    }

    fn subtitle(&self) -> Option<&str> {
        None
    }

    /// Structural comparison against any other annotation; used for diffing.
    fn eq(&self, other: &dyn Annotation) -> bool;

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A shape drawn on top of the map.
///
/// Should probably be implemented using the [`impl_overlay`] macro.
pub trait Overlay: Any + fmt::Debug + Send + Sync {
    /// The approximate center of the overlay.
    fn coordinate(&self) -> Coordinate;

    /// The region covered by the overlay.
    fn bounding_region(&self) -> Region;

    /// Structural comparison against any other overlay; used for diffing.
    fn eq(&self, other: &dyn Overlay) -> bool;

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Annotation drag states, as reported by the native map.
///
/// Passed through to the drag handler verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragState {
    None,
    Starting,
    Dragging,
    Ending,
    Canceling,
}

/// A plain annotation with optional callout text.
#[derive(Debug, Clone, PartialEq)]
pub struct PointAnnotation {
    pub coordinate: Coordinate,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl PointAnnotation {
    pub fn new(coordinate: Coordinate) -> PointAnnotation {
        PointAnnotation {
            coordinate,
            title: None,
            subtitle: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> PointAnnotation {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> PointAnnotation {
        self.subtitle = Some(subtitle.into());
        self
    }
}

impl_annotation! {
    PointAnnotation;
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }
}

/// The user's own location, as published by the native map.
///
/// The native map hands out a fresh object whenever the fix changes, so this compares every
/// field rather than identity.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLocation {
    pub is_updating: bool,
    /// None until the first fix arrives.
    pub location: Option<Coordinate>,
    /// Heading in degrees, if the device reports one.
    pub heading: Option<f64>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Default for UserLocation {
    fn default() -> UserLocation {
        UserLocation {
            is_updating: false,
            location: None,
            heading: None,
            title: Some("My Location".into()),
            subtitle: None,
        }
    }
}

impl_annotation! {
    UserLocation;
    fn coordinate(&self) -> Coordinate {
        self.location.unwrap_or_default()
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }
}

/// An open path through a list of coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub coordinates: Vec<Coordinate>,
}

impl_overlay! {
    Polyline;
    fn coordinate(&self) -> Coordinate {
        self.bounding_region().center
    }
    fn bounding_region(&self) -> Region {
        Region::bounding(&self.coordinates).unwrap_or_default()
    }
}

/// A closed shape; the last coordinate connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub coordinates: Vec<Coordinate>,
}

impl_overlay! {
    Polygon;
    fn coordinate(&self) -> Coordinate {
        self.bounding_region().center
    }
    fn bounding_region(&self) -> Region {
        Region::bounding(&self.coordinates).unwrap_or_default()
    }
}

/// A circle around a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Coordinate,
    /// Radius in meters.
    pub radius: f64,
}

/// Rough meters per degree of latitude; only used for bounding regions, not for rendering.
const METERS_PER_DEGREE: f64 = 111_320.;

impl_overlay! {
    Circle;
    fn coordinate(&self) -> Coordinate {
        self.center
    }
    fn bounding_region(&self) -> Region {
        let lat_delta = 2. * self.radius / METERS_PER_DEGREE;
        let cos = self.center.latitude.to_radians().cos().max(1e-9);
        let lon_delta = (lat_delta / cos).min(360.);
        Region::new(self.center, crate::geo::CoordinateSpan::new(lat_delta, lon_delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn annotations_compare_structurally() {
        let a: Arc<dyn Annotation> =
            Arc::new(PointAnnotation::new(Coordinate::new(1., 2.)).with_title("a"));
        let b: Arc<dyn Annotation> =
            Arc::new(PointAnnotation::new(Coordinate::new(1.00000001, 2.)).with_title("a"));
        let c: Arc<dyn Annotation> =
            Arc::new(PointAnnotation::new(Coordinate::new(1., 2.)).with_title("c"));
        assert!(Annotation::eq(&*a, &*b), "rebuilt annotation with the same fields should be equal");
        assert!(!Annotation::eq(&*a, &*c));
        assert_eq!(a.title(), Some("a"));
    }

    #[test]
    fn different_types_are_never_equal() {
        let point: Arc<dyn Annotation> = Arc::new(PointAnnotation::new(Coordinate::new(1., 2.)));
        let user: Arc<dyn Annotation> = Arc::new(UserLocation {
            location: Some(Coordinate::new(1., 2.)),
            ..UserLocation::default()
        });
        assert_eq!(point.coordinate(), user.coordinate());
        assert!(!Annotation::eq(&*point, &*user));
        assert!(!Annotation::eq(&*user, &*point));
    }

    #[test]
    fn user_location_compares_every_field() {
        let fix = UserLocation {
            is_updating: true,
            location: Some(Coordinate::new(37.33759, -122.01423)),
            ..UserLocation::default()
        };
        let mut turned = fix.clone();
        turned.heading = Some(90.);
        assert!(Annotation::eq(&fix, &fix.clone()));
        assert!(!Annotation::eq(&fix, &turned));
    }

    #[test]
    fn overlays() {
        let line: Arc<dyn Overlay> = Arc::new(Polyline {
            coordinates: vec![Coordinate::new(0., 0.), Coordinate::new(2., 4.)],
        });
        assert_eq!(line.coordinate(), Coordinate::new(1., 2.));
        let polygon: Arc<dyn Overlay> = Arc::new(Polygon {
            coordinates: vec![Coordinate::new(0., 0.), Coordinate::new(2., 4.)],
        });
        assert!(!Overlay::eq(&*line, &*polygon), "same points, different shape");

        let circle = Circle {
            center: Coordinate::new(0., 0.),
            radius: METERS_PER_DEGREE / 2.,
        };
        let region = circle.bounding_region();
        assert_eq!(region.span.latitude_delta, 1.);
        assert_eq!(region.span.longitude_delta, 1.);
    }
}
