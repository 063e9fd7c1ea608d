//! What part of the map is visible, and how the engine talks about it in both directions.

use crate::backend::MapBackend;
use crate::element::Annotation;
use crate::geo::{Camera, Coordinate, MapRect, Region};
use core::fmt;
use std::sync::Arc;

/// Controls what is currently visible on the map.
///
/// The map writes back in whichever variant it last received; if nothing was ever set it
/// writes `CenterCoordinate`. `FitAnnotations` only goes one way: it is never written back.
#[derive(Clone)]
pub enum MapVisibility {
    Region(Region),
    CenterCoordinate(Coordinate),
    VisibleMapRect(MapRect),
    /// Zoom and pan so that all of these annotations are visible.
    FitAnnotations(Vec<Arc<dyn Annotation>>),
    Camera(Camera),
}

/// The variant of a [`MapVisibility`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityKind {
    Region,
    CenterCoordinate,
    VisibleMapRect,
    FitAnnotations,
    Camera,
}

impl MapVisibility {
    pub fn kind(&self) -> VisibilityKind {
        match self {
            MapVisibility::Region(_) => VisibilityKind::Region,
            MapVisibility::CenterCoordinate(_) => VisibilityKind::CenterCoordinate,
            MapVisibility::VisibleMapRect(_) => VisibilityKind::VisibleMapRect,
            MapVisibility::FitAnnotations(_) => VisibilityKind::FitAnnotations,
            MapVisibility::Camera(_) => VisibilityKind::Camera,
        }
    }
}

/// Annotation lists are equal if they contain the same elements in any order.
pub(crate) fn same_annotations(a: &[Arc<dyn Annotation>], b: &[Arc<dyn Annotation>]) -> bool {
    let contains = |list: &[Arc<dyn Annotation>], x: &Arc<dyn Annotation>| {
        list.iter().any(|y| Annotation::eq(&**x, &**y))
    };
    a.iter().all(|x| contains(b, x)) && b.iter().all(|y| contains(a, y))
}

impl PartialEq for MapVisibility {
    fn eq(&self, other: &MapVisibility) -> bool {
        match (self, other) {
            (MapVisibility::Region(a), MapVisibility::Region(b)) => a == b,
            (MapVisibility::CenterCoordinate(a), MapVisibility::CenterCoordinate(b)) => a == b,
            (MapVisibility::VisibleMapRect(a), MapVisibility::VisibleMapRect(b)) => a == b,
            (MapVisibility::FitAnnotations(a), MapVisibility::FitAnnotations(b)) => {
                same_annotations(a, b)
            }
            (MapVisibility::Camera(a), MapVisibility::Camera(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for MapVisibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MapVisibility::Region(r) => write!(f, "Region({:?})", r),
            MapVisibility::CenterCoordinate(c) => write!(f, "CenterCoordinate({:?})", c),
            MapVisibility::VisibleMapRect(r) => write!(f, "VisibleMapRect({:?})", r),
            MapVisibility::FitAnnotations(a) => write!(f, "FitAnnotations({} items)", a.len()),
            MapVisibility::Camera(c) => write!(f, "Camera({:?})", c),
        }
    }
}

/// How the map follows the user's location.
///
/// Anything but `None` takes precedence over declared visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingMode {
    None,
    Follow,
    FollowWithHeading,
}

impl Default for TrackingMode {
    fn default() -> TrackingMode {
        TrackingMode::None
    }
}

/// Whether the native map is in the middle of a region change (user gesture or animation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionChangeState {
    Idle,
    Changing,
}

/// A snapshot of everything the native map reports about its viewport.
///
/// Captured while handling a notification so that the write-back can happen later without
/// touching the map again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapGeometry {
    pub region: Region,
    pub center: Coordinate,
    pub visible_map_rect: MapRect,
    pub camera: Camera,
}

impl MapGeometry {
    pub fn capture<B: MapBackend>(map: &B) -> MapGeometry {
        MapGeometry {
            region: map.region(),
            center: map.center_coordinate(),
            visible_map_rect: map.visible_map_rect(),
            camera: map.camera(),
        }
    }

    /// Expresses this geometry as the given visibility variant.
    ///
    /// Returns None for `FitAnnotations`, which can't be reconstructed from the map.
    pub fn as_visibility(&self, kind: VisibilityKind) -> Option<MapVisibility> {
        match kind {
            VisibilityKind::Region => Some(MapVisibility::Region(self.region)),
            VisibilityKind::CenterCoordinate => Some(MapVisibility::CenterCoordinate(self.center)),
            VisibilityKind::VisibleMapRect => {
                Some(MapVisibility::VisibleMapRect(self.visible_map_rect))
            }
            VisibilityKind::Camera => Some(MapVisibility::Camera(self.camera)),
            VisibilityKind::FitAnnotations => None,
        }
    }

    /// The value to write back into a visibility binding currently holding `current`.
    pub fn echo(&self, current: Option<&MapVisibility>) -> Option<MapVisibility> {
        let kind = current.map_or(VisibilityKind::CenterCoordinate, MapVisibility::kind);
        self.as_visibility(kind)
    }
}
