//! Keeps a declaratively described map in sync with a native map view.
//!
//! The caller describes the map as a [`MapProps`] value on every render and hands it to a
//! [`MapHost`], which writes whatever differs into the native map through the [`MapBackend`]
//! trait. Changes the user makes on the map come back as notifications and are written into
//! the caller's [`Binding`]s one turn later, through a [`Scheduler`], so the two directions
//! never fight each other.

mod backend;
mod binding;
mod coordinator;
mod diff;
#[macro_use]
mod element;
mod engine;
mod factory;
pub mod geo;
mod gesture;
mod host;
#[cfg(test)]
mod mock;
pub mod options;
mod props;
mod rect;
mod scheduler;
mod visibility;

pub use backend::{GestureKind, MapBackend, Subview, SubviewKind};
pub use binding::Binding;
pub use coordinator::{Coordinator, EventSender, MapDelegate, NativeEvent};
pub use diff::{diff, CollectionDiff};
pub use element::{
    Annotation, Circle, DragState, Overlay, PointAnnotation, Polygon, Polyline, UserLocation,
};
pub use engine::{ReconcileStats, Reconciler};
pub use factory::{AnnotationViewFactory, OverlayRendererFactory, Registrar};
pub use gesture::{hit_test, GestureArbiter, GesturePhase};
pub use host::MapHost;
pub use props::{CoordinateHandler, DragHandler, Handlers, MapProps, RegionChangingHandler};
pub use rect::Rect;
pub use scheduler::{Job, Scheduler, TurnQueue};
pub use visibility::{MapGeometry, MapVisibility, RegionChangeState, TrackingMode, VisibilityKind};
