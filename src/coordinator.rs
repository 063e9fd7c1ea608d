//! Native map notifications, and writing what they report back into declarative state.
//!
//! The native map tells us about viewport changes while they happen, including changes we
//! caused ourselves during reconciliation. Writing those straight into the bindings would
//! re-enter the render pass that caused them, so every write-back is deferred to the next turn
//! and carries a geometry snapshot taken when the notification arrived.

use crate::backend::{GestureKind, MapBackend};
use crate::binding::Binding;
use crate::element::{Annotation, DragState, Overlay};
use crate::geo::Coordinate;
use crate::gesture::{GestureArbiter, GesturePhase};
use crate::props::MapProps;
use crate::scheduler::Scheduler;
use crate::visibility::{MapGeometry, MapVisibility, RegionChangeState, TrackingMode};
use cgmath::Point2;
use crossbeam::channel::Sender;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Receives notifications from a native map. One method per kind of notification.
pub trait MapDelegate<B: MapBackend> {
    /// The map is about to change its region, by gesture or program.
    fn region_will_change(&mut self, map: &B, animated: bool);

    /// The map finished changing its region.
    fn region_did_change(&mut self, map: &B, animated: bool);

    /// The visible region changed; sent continuously during gestures and animations.
    fn visible_region_did_change(&mut self, map: &B);

    fn tracking_mode_did_change(&mut self, map: &B, mode: TrackingMode, animated: bool);

    /// Returns the view to display for an annotation, or None for the map's default view.
    fn view_for_annotation(
        &mut self,
        map: &mut B,
        annotation: &Arc<dyn Annotation>,
    ) -> Option<B::AnnotationView>;

    /// Returns the renderer that draws an overlay.
    fn renderer_for_overlay(&mut self, map: &B, overlay: &Arc<dyn Overlay>) -> B::OverlayRenderer;

    fn annotation_drag_state_did_change(
        &mut self,
        map: &B,
        annotation: &Arc<dyn Annotation>,
        coordinate: Coordinate,
        old_state: DragState,
        new_state: DragState,
    );
}

/// A native notification in message form, for backends that report through a channel.
#[derive(Debug, Clone)]
pub enum NativeEvent {
    RegionWillChange {
        animated: bool,
    },
    RegionDidChange {
        animated: bool,
    },
    VisibleRegionDidChange,
    TrackingModeDidChange {
        mode: TrackingMode,
        animated: bool,
    },
    AnnotationDragStateDidChange {
        annotation: Arc<dyn Annotation>,
        coordinate: Coordinate,
        old_state: DragState,
        new_state: DragState,
    },
    Gesture {
        gesture: GestureKind,
        phase: GesturePhase,
        /// In the map view's coordinate system.
        point: Point2<f64>,
    },
}

/// Sends native notifications to a [`MapHost`](crate::MapHost).
pub type EventSender = Sender<NativeEvent>;

/// The bindings write-backs go to; replaced on every update.
#[derive(Debug, Clone)]
struct BindingSlot {
    visibility: Binding<Option<MapVisibility>>,
    tracking_mode: Binding<TrackingMode>,
}

/// Handles notifications for one bound map.
pub struct Coordinator<B: MapBackend> {
    props: MapProps<B>,
    region_state: RegionChangeState,
    first_settle_pending: bool,
    /// Deferred jobs only hold weak references to this; None once unbound.
    slot: Option<Arc<Mutex<BindingSlot>>>,
    scheduler: Scheduler,
}

impl<B: MapBackend> Coordinator<B> {
    pub fn new(props: MapProps<B>, scheduler: Scheduler) -> Coordinator<B> {
        let slot = BindingSlot {
            visibility: props.visibility.clone(),
            tracking_mode: props.tracking_mode.clone(),
        };
        Coordinator {
            props,
            region_state: RegionChangeState::Idle,
            first_settle_pending: true,
            slot: Some(Arc::new(Mutex::new(slot))),
            scheduler,
        }
    }

    pub fn props(&self) -> &MapProps<B> {
        &self.props
    }

    /// Replaces the declared state; pending write-backs go to the new bindings.
    pub fn set_props(&mut self, props: MapProps<B>) {
        if let Some(slot) = &self.slot {
            let mut slot = slot.lock();
            slot.visibility = props.visibility.clone();
            slot.tracking_mode = props.tracking_mode.clone();
        }
        self.props = props;
    }

    pub fn region_state(&self) -> RegionChangeState {
        self.region_state
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// Detaches from the bindings. Write-backs that are still queued will do nothing.
    pub fn unbind(&mut self) {
        self.slot = None;
    }

    /// Defers a write into the bindings to the next turn.
    fn defer_write(&self, write: impl FnOnce(&BindingSlot) + Send + 'static) {
        let slot = match &self.slot {
            Some(slot) => Arc::downgrade(slot),
            None => return,
        };
        self.scheduler.defer(move || {
            let bindings = match Weak::upgrade(&slot) {
                Some(slot) => slot.lock().clone(),
                None => {
                    tracing::trace!("map was unbound; dropping write-back");
                    return;
                }
            };
            write(&bindings);
        });
    }

    /// Defers writing the map's geometry into the visibility binding.
    fn defer_echo(&self, map: &B) {
        let geometry = MapGeometry::capture(map);
        self.defer_write(move |bindings| {
            let current = bindings.visibility.get();
            let echo = match geometry.echo(current.as_ref()) {
                Some(echo) => echo,
                // fitted annotations can't be read back
                None => return,
            };
            if current.as_ref() == Some(&echo) {
                return;
            }
            tracing::trace!(?echo, "writing back visibility");
            bindings.visibility.set(Some(echo));
        });
    }

    /// Fires the tap or long press handler if the recognizer reached its firing phase.
    ///
    /// Returns true if a handler was called.
    pub fn gesture_did_update(
        &mut self,
        map: &B,
        gesture: GestureKind,
        phase: GesturePhase,
        point: Point2<f64>,
    ) -> bool {
        if !GestureArbiter::fires(gesture, phase) {
            return false;
        }
        let handler = match gesture {
            GestureKind::TapOrClick => &self.props.handlers.tap_or_click,
            GestureKind::LongPress => &self.props.handlers.long_press,
        };
        let handler = match handler {
            Some(handler) => handler,
            None => return false,
        };
        let coordinate = map.convert_to_coordinate(point);
        tracing::debug!(?gesture, ?coordinate, "gesture recognized");
        handler(coordinate);
        true
    }
}

impl<B: MapBackend> MapDelegate<B> for Coordinator<B> {
    fn region_will_change(&mut self, _map: &B, animated: bool) {
        tracing::debug!(animated, "region will change");
        self.region_state = RegionChangeState::Changing;
        if let Some(handler) = &self.props.handlers.region_changing {
            handler(true, animated);
        }
    }

    fn region_did_change(&mut self, map: &B, animated: bool) {
        tracing::debug!(animated, "region did change");
        self.region_state = RegionChangeState::Idle;
        if let Some(handler) = &self.props.handlers.region_changing {
            handler(false, animated);
        }
        if self.first_settle_pending {
            self.first_settle_pending = false;
            self.defer_echo(map);
        }
    }

    fn visible_region_did_change(&mut self, map: &B) {
        self.defer_echo(map);
    }

    fn tracking_mode_did_change(&mut self, _map: &B, mode: TrackingMode, animated: bool) {
        tracing::debug!(?mode, animated, "tracking mode did change");
        if self.props.tracking_mode.is_constant() {
            return;
        }
        self.defer_write(move |bindings| bindings.tracking_mode.set(mode));
    }

    fn view_for_annotation(
        &mut self,
        map: &mut B,
        annotation: &Arc<dyn Annotation>,
    ) -> Option<B::AnnotationView> {
        let view = self
            .props
            .annotation_view_factory
            .as_ref()
            .and_then(|factory| factory.lookup(map, annotation));
        if view.is_none() {
            tracing::trace!(?annotation, "no annotation view; using the map's default");
        }
        view
    }

    fn renderer_for_overlay(&mut self, _map: &B, overlay: &Arc<dyn Overlay>) -> B::OverlayRenderer {
        let renderer = self
            .props
            .overlay_renderer_factory
            .as_ref()
            .and_then(|factory| factory.lookup(overlay));
        renderer.unwrap_or_else(|| {
            tracing::trace!(?overlay, "no overlay renderer; using an empty one");
            Default::default()
        })
    }

    fn annotation_drag_state_did_change(
        &mut self,
        _map: &B,
        annotation: &Arc<dyn Annotation>,
        coordinate: Coordinate,
        old_state: DragState,
        new_state: DragState,
    ) {
        let handler = match &self.props.handlers.annotation_drag {
            Some(handler) => handler,
            None => return,
        };
        // hand the caller its own instance when there is one
        let declared = self
            .props
            .annotations
            .iter()
            .find(|declared| Arc::ptr_eq(declared, annotation))
            .or_else(|| self.props.declared_annotation(annotation))
            .unwrap_or(annotation);
        tracing::debug!(?old_state, ?new_state, "annotation drag state did change");
        handler(declared, coordinate, old_state, new_state);
    }
}
