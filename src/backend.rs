//! The native map, as seen by the engine.

use crate::element::{Annotation, Overlay};
use crate::geo::{Camera, Coordinate, MapRect, Region};
use crate::options::{EdgeInsets, MapConfiguration, MapFlag};
use crate::rect::Rect;
use crate::visibility::TrackingMode;
use cgmath::Point2;
use core::fmt;
use std::sync::Arc;

/// Custom gesture recognizers the engine can install on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Tap on touch platforms, click on pointer platforms.
    TapOrClick,
    LongPress,
}

/// Kinds of views found in the native map's subview tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubviewKind {
    ZoomControl,
    PitchControl,
    Compass,
    /// The visual representation of an annotation.
    Annotation,
    /// Tiles, overlays, attribution and anything else the map doesn't want taps for.
    Other,
}

impl SubviewKind {
    /// Returns true if the native map handles taps on this kind of view itself.
    pub fn is_interactive(&self) -> bool {
        match self {
            SubviewKind::ZoomControl
            | SubviewKind::PitchControl
            | SubviewKind::Compass
            | SubviewKind::Annotation => true,
            SubviewKind::Other => false,
        }
    }
}

/// A node in a snapshot of the native map's view hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Subview {
    pub kind: SubviewKind,
    /// Frame in the superview's coordinate system.
    pub frame: Rect,
    pub subviews: Vec<Subview>,
}

impl Subview {
    pub fn new(kind: SubviewKind, frame: Rect) -> Subview {
        Subview {
            kind,
            frame,
            subviews: Vec::new(),
        }
    }

    pub fn with_subviews(mut self, subviews: Vec<Subview>) -> Subview {
        self.subviews = subviews;
        self
    }
}

/// A native map view implementation.
///
/// Every setter is assumed to have side effects (snapping the viewport, restarting
/// animations), so the engine only calls them when the getter disagrees with the declared
/// value. Element collections have set semantics.
pub trait MapBackend: 'static {
    /// A view displayed for an annotation.
    type AnnotationView;

    /// Draws an overlay; the default value must be an empty renderer.
    type OverlayRenderer: Default;

    /// A reusable annotation view class that can be registered with the map.
    type ViewClass: Clone + fmt::Debug + Send + Sync + 'static;

    // viewport
    fn region(&self) -> Region;
    fn set_region(&mut self, region: Region, animated: bool);
    fn center_coordinate(&self) -> Coordinate;
    fn set_center_coordinate(&mut self, center: Coordinate, animated: bool);
    fn visible_map_rect(&self) -> MapRect;
    /// The map may show more than `rect` once `edge_padding` is applied; what it reports
    /// afterwards is remembered, so re-rendering the same rect doesn't set it again.
    fn set_visible_map_rect(&mut self, rect: MapRect, edge_padding: EdgeInsets, animated: bool);
    fn camera(&self) -> Camera;
    fn set_camera(&mut self, camera: Camera, animated: bool);
    /// Zooms and pans until all given annotations are visible.
    fn show_annotations(&mut self, annotations: &[Arc<dyn Annotation>], animated: bool);

    fn tracking_mode(&self) -> TrackingMode;
    fn set_tracking_mode(&mut self, mode: TrackingMode, animated: bool);

    // appearance and interaction
    fn flag(&self, flag: MapFlag) -> bool;
    fn set_flag(&mut self, flag: MapFlag, value: bool);

    /// Returns false for flags this platform doesn't have (or that misbehave when set).
    fn supports(&self, flag: MapFlag) -> bool {
        let _ = flag;
        true
    }

    fn configuration(&self) -> Option<MapConfiguration>;
    fn set_configuration(&mut self, configuration: MapConfiguration);
    fn edge_insets(&self) -> EdgeInsets;
    fn set_edge_insets(&mut self, insets: EdgeInsets);

    // elements
    fn annotations(&self) -> Vec<Arc<dyn Annotation>>;
    fn add_annotation(&mut self, annotation: Arc<dyn Annotation>);
    fn remove_annotation(&mut self, annotation: &Arc<dyn Annotation>);
    fn overlays(&self) -> Vec<Arc<dyn Overlay>>;
    fn add_overlay(&mut self, overlay: Arc<dyn Overlay>);
    fn remove_overlay(&mut self, overlay: &Arc<dyn Overlay>);
    fn selected_annotations(&self) -> Vec<Arc<dyn Annotation>>;
    fn deselect_annotation(&mut self, annotation: &Arc<dyn Annotation>, animated: bool);

    // annotation views
    fn register_annotation_view(&mut self, class: &Self::ViewClass, reuse_identifier: &str);
    fn dequeue_annotation_view(
        &mut self,
        reuse_identifier: &str,
        annotation: &Arc<dyn Annotation>,
    ) -> Option<Self::AnnotationView>;

    // gestures
    fn add_gesture_recognizer(&mut self, gesture: GestureKind);
    /// `gesture` may only begin once `other` has failed.
    fn require_gesture_to_fail(&mut self, gesture: GestureKind, other: GestureKind);
    /// A snapshot of the map's live view hierarchy, frames relative to the map view.
    fn subviews(&self) -> Vec<Subview>;
    /// Converts a point in the map view to the coordinate under it.
    fn convert_to_coordinate(&self, point: Point2<f64>) -> Coordinate;
}
