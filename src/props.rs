//! The declared state of a map, rebuilt by the caller on every render.

use crate::backend::MapBackend;
use crate::binding::Binding;
use crate::element::{Annotation, DragState, Overlay};
use crate::factory::{AnnotationViewFactory, OverlayRendererFactory};
use crate::geo::Coordinate;
use crate::options::{EdgeInsets, MapConfiguration, MapFlag, MapOptions};
use crate::visibility::{MapVisibility, TrackingMode};
use core::fmt;
use std::sync::Arc;

/// Called with the coordinate under a tap/click or long press.
pub type CoordinateHandler = Arc<dyn Fn(Coordinate) + Send + Sync>;

/// Called when an annotation's drag state changes: `(annotation, coordinate, old, new)`.
pub type DragHandler =
    Arc<dyn Fn(&Arc<dyn Annotation>, Coordinate, DragState, DragState) + Send + Sync>;

/// Called when the map starts or stops changing its region: `(changing, animated)`.
pub type RegionChangingHandler = Arc<dyn Fn(bool, bool) + Send + Sync>;

/// Caller callbacks. All optional.
#[derive(Clone, Default)]
pub struct Handlers {
    pub tap_or_click: Option<CoordinateHandler>,
    pub long_press: Option<CoordinateHandler>,
    pub annotation_drag: Option<DragHandler>,
    pub region_changing: Option<RegionChangingHandler>,
}

/// Everything the caller declares about a map.
///
/// Cheap to build; the builder methods mirror the individual declarative modifiers.
pub struct MapProps<B: MapBackend> {
    pub visibility: Binding<Option<MapVisibility>>,
    pub tracking_mode: Binding<TrackingMode>,
    pub options: MapOptions,
    pub annotations: Vec<Arc<dyn Annotation>>,
    pub annotation_view_factory: Option<AnnotationViewFactory<B>>,
    pub overlays: Vec<Arc<dyn Overlay>>,
    pub overlay_renderer_factory: Option<OverlayRendererFactory<B>>,
    pub handlers: Handlers,
}

impl<B: MapBackend> MapProps<B> {
    /// Creates props with default options; tracking is off and not written back.
    pub fn new(visibility: Binding<Option<MapVisibility>>) -> Self {
        MapProps {
            visibility,
            tracking_mode: Binding::constant(TrackingMode::None),
            options: MapOptions::default(),
            annotations: Vec::new(),
            annotation_view_factory: None,
            overlays: Vec::new(),
            overlay_renderer_factory: None,
            handlers: Handlers::default(),
        }
    }

    pub fn tracking_mode(mut self, tracking_mode: Binding<TrackingMode>) -> Self {
        self.tracking_mode = tracking_mode;
        self
    }

    pub fn options(mut self, options: MapOptions) -> Self {
        self.options = options;
        self
    }

    pub fn configuration(mut self, configuration: MapConfiguration) -> Self {
        self.options.configuration = Some(configuration);
        self
    }

    pub fn edge_insets(mut self, insets: EdgeInsets) -> Self {
        self.options.edge_insets = insets;
        self
    }

    pub fn flag(mut self, flag: MapFlag, value: bool) -> Self {
        self.options.set_flag(flag, value);
        self
    }

    pub fn annotations(
        mut self,
        annotations: Vec<Arc<dyn Annotation>>,
        factory: AnnotationViewFactory<B>,
    ) -> Self {
        self.annotations = annotations;
        self.annotation_view_factory = Some(factory);
        self
    }

    pub fn overlays(
        mut self,
        overlays: Vec<Arc<dyn Overlay>>,
        factory: OverlayRendererFactory<B>,
    ) -> Self {
        self.overlays = overlays;
        self.overlay_renderer_factory = Some(factory);
        self
    }

    pub fn on_tap_or_click(mut self, handler: impl Fn(Coordinate) + Send + Sync + 'static) -> Self {
        self.handlers.tap_or_click = Some(Arc::new(handler));
        self
    }

    pub fn on_long_press(mut self, handler: impl Fn(Coordinate) + Send + Sync + 'static) -> Self {
        self.handlers.long_press = Some(Arc::new(handler));
        self
    }

    pub fn on_annotation_drag(
        mut self,
        handler: impl Fn(&Arc<dyn Annotation>, Coordinate, DragState, DragState)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.handlers.annotation_drag = Some(Arc::new(handler));
        self
    }

    pub fn on_region_changing(mut self, handler: impl Fn(bool, bool) + Send + Sync + 'static) -> Self {
        self.handlers.region_changing = Some(Arc::new(handler));
        self
    }

    /// The declared element equal to `annotation`, if any.
    pub fn declared_annotation(&self, annotation: &Arc<dyn Annotation>) -> Option<&Arc<dyn Annotation>> {
        self.annotations
            .iter()
            .find(|declared| Annotation::eq(&***declared, &**annotation))
    }
}

impl<B: MapBackend> Clone for MapProps<B> {
    fn clone(&self) -> Self {
        MapProps {
            visibility: self.visibility.clone(),
            tracking_mode: self.tracking_mode.clone(),
            options: self.options.clone(),
            annotations: self.annotations.clone(),
            annotation_view_factory: self.annotation_view_factory.clone(),
            overlays: self.overlays.clone(),
            overlay_renderer_factory: self.overlay_renderer_factory.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

impl<B: MapBackend> fmt::Debug for MapProps<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MapProps")
            .field("visibility", &self.visibility)
            .field("tracking_mode", &self.tracking_mode)
            .field("options", &self.options)
            .field("annotations", &self.annotations)
            .field("overlays", &self.overlays)
            .field("tap_or_click", &self.handlers.tap_or_click.is_some())
            .field("long_press", &self.handlers.long_press.is_some())
            .finish()
    }
}
