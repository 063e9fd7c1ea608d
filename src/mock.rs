//! A recording in-memory map for tests.

use crate::backend::{GestureKind, MapBackend, Subview};
use crate::element::{Annotation, Overlay};
use crate::geo::{Camera, Coordinate, CoordinateSpan, MapRect, Region};
use crate::options::{EdgeInsets, MapConfiguration, MapFlag, MapOptions};
use crate::visibility::TrackingMode;
use cgmath::{Point2, Vector2};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct MockView(pub String);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockRenderer(pub String);

#[derive(Debug)]
pub struct MockMap {
    pub region: Region,
    pub visible_map_rect: MapRect,
    pub camera: Camera,
    pub tracking_mode: TrackingMode,
    pub flags: MapOptions,
    pub unsupported: HashSet<MapFlag>,
    pub configuration: Option<MapConfiguration>,
    pub edge_insets: EdgeInsets,
    pub annotations: Vec<Arc<dyn Annotation>>,
    pub overlays: Vec<Arc<dyn Overlay>>,
    pub selected: Vec<Arc<dyn Annotation>>,
    pub registered: Vec<String>,
    pub gestures: Vec<GestureKind>,
    pub failure_requirements: Vec<(GestureKind, GestureKind)>,
    pub subviews: Vec<Subview>,
    pub fitted: Vec<Arc<dyn Annotation>>,
    /// Grow visible map rects by their edge padding, one map point per view point.
    pub pads_visible_rect: bool,
    /// Every mutating call, by name.
    pub calls: Vec<String>,
}

impl MockMap {
    pub fn new() -> MockMap {
        MockMap {
            region: Region::new(
                Coordinate::new(37.33759, -122.01423),
                CoordinateSpan::new(0.1, 0.1),
            ),
            visible_map_rect: MapRect::new(Point2::new(1000., 2000.), Vector2::new(300., 200.)),
            camera: Camera {
                center: Coordinate::new(37.33759, -122.01423),
                altitude: 1000.,
                pitch: 0.,
                heading: 0.,
            },
            tracking_mode: TrackingMode::None,
            flags: MapOptions::default(),
            unsupported: HashSet::new(),
            configuration: None,
            edge_insets: EdgeInsets::default(),
            annotations: Vec::new(),
            overlays: Vec::new(),
            selected: Vec::new(),
            registered: Vec::new(),
            gestures: Vec::new(),
            failure_requirements: Vec::new(),
            subviews: Vec::new(),
            fitted: Vec::new(),
            pads_visible_rect: false,
            calls: Vec::new(),
        }
    }

    pub fn take_calls(&mut self) -> Vec<String> {
        std::mem::replace(&mut self.calls, Vec::new())
    }

    fn record(&mut self, call: &str) {
        self.calls.push(call.to_owned());
    }
}

impl MapBackend for MockMap {
    type AnnotationView = MockView;
    type OverlayRenderer = MockRenderer;
    type ViewClass = &'static str;

    fn region(&self) -> Region {
        self.region
    }
    fn set_region(&mut self, region: Region, _animated: bool) {
        self.record("set_region");
        self.region = region;
        self.camera.center = region.center;
    }
    fn center_coordinate(&self) -> Coordinate {
        self.region.center
    }
    fn set_center_coordinate(&mut self, center: Coordinate, _animated: bool) {
        self.record("set_center_coordinate");
        self.region.center = center;
        self.camera.center = center;
    }
    fn visible_map_rect(&self) -> MapRect {
        self.visible_map_rect
    }
    fn set_visible_map_rect(&mut self, rect: MapRect, edge_padding: EdgeInsets, _animated: bool) {
        self.record("set_visible_map_rect");
        self.visible_map_rect = if self.pads_visible_rect {
            MapRect::new(
                Point2::new(rect.origin.x - edge_padding.left, rect.origin.y - edge_padding.top),
                Vector2::new(
                    rect.size.x + edge_padding.left + edge_padding.right,
                    rect.size.y + edge_padding.top + edge_padding.bottom,
                ),
            )
        } else {
            rect
        };
    }
    fn camera(&self) -> Camera {
        self.camera
    }
    fn set_camera(&mut self, camera: Camera, _animated: bool) {
        self.record("set_camera");
        self.camera = camera;
        self.region.center = camera.center;
    }
    fn show_annotations(&mut self, annotations: &[Arc<dyn Annotation>], _animated: bool) {
        self.record("show_annotations");
        self.fitted = annotations.to_vec();
    }

    fn tracking_mode(&self) -> TrackingMode {
        self.tracking_mode
    }
    fn set_tracking_mode(&mut self, mode: TrackingMode, _animated: bool) {
        self.record("set_tracking_mode");
        self.tracking_mode = mode;
    }

    fn flag(&self, flag: MapFlag) -> bool {
        self.flags.flag(flag)
    }
    fn set_flag(&mut self, flag: MapFlag, value: bool) {
        self.record(&format!("set_flag({:?})", flag));
        self.flags.set_flag(flag, value);
    }
    fn supports(&self, flag: MapFlag) -> bool {
        !self.unsupported.contains(&flag)
    }

    fn configuration(&self) -> Option<MapConfiguration> {
        self.configuration.clone()
    }
    fn set_configuration(&mut self, configuration: MapConfiguration) {
        self.record("set_configuration");
        self.configuration = Some(configuration);
    }
    fn edge_insets(&self) -> EdgeInsets {
        self.edge_insets
    }
    fn set_edge_insets(&mut self, insets: EdgeInsets) {
        self.record("set_edge_insets");
        self.edge_insets = insets;
    }

    fn annotations(&self) -> Vec<Arc<dyn Annotation>> {
        self.annotations.clone()
    }
    fn add_annotation(&mut self, annotation: Arc<dyn Annotation>) {
        self.record("add_annotation");
        self.annotations.push(annotation);
    }
    fn remove_annotation(&mut self, annotation: &Arc<dyn Annotation>) {
        self.record("remove_annotation");
        self.annotations.retain(|a| !Arc::ptr_eq(a, annotation));
    }
    fn overlays(&self) -> Vec<Arc<dyn Overlay>> {
        self.overlays.clone()
    }
    fn add_overlay(&mut self, overlay: Arc<dyn Overlay>) {
        self.record("add_overlay");
        self.overlays.push(overlay);
    }
    fn remove_overlay(&mut self, overlay: &Arc<dyn Overlay>) {
        self.record("remove_overlay");
        self.overlays.retain(|o| !Arc::ptr_eq(o, overlay));
    }
    fn selected_annotations(&self) -> Vec<Arc<dyn Annotation>> {
        self.selected.clone()
    }
    fn deselect_annotation(&mut self, annotation: &Arc<dyn Annotation>, _animated: bool) {
        self.record("deselect_annotation");
        self.selected.retain(|a| !Arc::ptr_eq(a, annotation));
    }

    fn register_annotation_view(&mut self, _class: &&'static str, reuse_identifier: &str) {
        self.record("register_annotation_view");
        self.registered.push(reuse_identifier.to_owned());
    }
    fn dequeue_annotation_view(
        &mut self,
        reuse_identifier: &str,
        _annotation: &Arc<dyn Annotation>,
    ) -> Option<MockView> {
        if self.registered.iter().any(|r| r == reuse_identifier) {
            Some(MockView(reuse_identifier.to_owned()))
        } else {
            None
        }
    }

    fn add_gesture_recognizer(&mut self, gesture: GestureKind) {
        self.record("add_gesture_recognizer");
        self.gestures.push(gesture);
    }
    fn require_gesture_to_fail(&mut self, gesture: GestureKind, other: GestureKind) {
        self.record("require_gesture_to_fail");
        self.failure_requirements.push((gesture, other));
    }
    fn subviews(&self) -> Vec<Subview> {
        self.subviews.clone()
    }
    fn convert_to_coordinate(&self, point: Point2<f64>) -> Coordinate {
        // one degree per hundred points from the region center
        Coordinate::new(
            self.region.center.latitude - point.y / 100.,
            self.region.center.longitude + point.x / 100.,
        )
    }
}
