use crate::backend::MapBackend;
use crate::coordinator::{Coordinator, EventSender, MapDelegate, NativeEvent};
use crate::element::{Annotation, Overlay};
use crate::engine::{ReconcileStats, Reconciler};
use crate::factory::Registrar;
use crate::gesture::{hit_test, GestureArbiter};
use crate::props::MapProps;
use crate::scheduler::Scheduler;
use crate::visibility::RegionChangeState;
use cgmath::Point2;
use crossbeam::channel::{self, Receiver, TryRecvError};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Connects declared map state to one native map, from bind to teardown.
pub struct MapHost<B: MapBackend> {
    id: Uuid,
    span: tracing::Span,
    map: Option<B>,
    reconciler: Reconciler,
    coordinator: Coordinator<B>,
    arbiter: GestureArbiter,
    /// Reuse identifiers already registered with the map.
    registered: HashSet<String>,
    event_sender: EventSender,
    event_recv: Receiver<NativeEvent>,
}

impl<B: MapBackend> MapHost<B> {
    /// Binds a native map and applies the initial props without animation.
    ///
    /// Write-backs into the props' bindings are deferred through the scheduler.
    pub fn bind(map: B, props: MapProps<B>, scheduler: Scheduler) -> MapHost<B> {
        let id = Uuid::new_v4();
        let span = tracing::debug_span!("map_host", %id);
        let (event_sender, event_recv) = channel::unbounded();

        let mut host = MapHost {
            id,
            span,
            map: Some(map),
            reconciler: Reconciler::new(),
            coordinator: Coordinator::new(props.clone(), scheduler),
            arbiter: GestureArbiter::new(),
            registered: HashSet::new(),
            event_sender,
            event_recv,
        };
        host.span.in_scope(|| tracing::debug!("binding map"));
        host.update(props, false);
        host
    }

    /// Identifies this binding in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Applies new declared state to the map.
    ///
    /// Only what differs from the map's current state is written. Declared visibility is
    /// left alone while the map is changing its region or tracking the user.
    pub fn update(&mut self, props: MapProps<B>, animated: bool) -> ReconcileStats {
        let _entered = self.span.enter();
        let map = bound_mut(&mut self.map);

        self.arbiter.install(map, &props.handlers);
        if let Some(factory) = &props.annotation_view_factory {
            factory.register(&mut Registrar::new(map, &mut self.registered));
        }
        let region_state = self.coordinator.region_state();
        let stats = self.reconciler.reconcile(&props, map, region_state, animated);
        self.coordinator.set_props(props);
        stats
    }

    /// Returns a sender for native notifications; they are handled in [`MapHost::poll`].
    pub fn event_sender(&self) -> EventSender {
        self.event_sender.clone()
    }

    /// Handles all native notifications sent since the last poll.
    pub fn poll(&mut self) {
        loop {
            match self.event_recv.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => panic!("event receiver has been disconnected"),
            }
        }
    }

    /// Handles one native notification.
    ///
    /// # Panics
    /// If the map was torn down.
    pub fn dispatch(&mut self, event: NativeEvent) {
        let _entered = self.span.enter();
        let map = bound_mut(&mut self.map);
        let coordinator = &mut self.coordinator;

        match event {
            NativeEvent::RegionWillChange { animated } => {
                coordinator.region_will_change(map, animated)
            }
            NativeEvent::RegionDidChange { animated } => {
                coordinator.region_did_change(map, animated)
            }
            NativeEvent::VisibleRegionDidChange => coordinator.visible_region_did_change(map),
            NativeEvent::TrackingModeDidChange { mode, animated } => {
                coordinator.tracking_mode_did_change(map, mode, animated)
            }
            NativeEvent::AnnotationDragStateDidChange {
                annotation,
                coordinate,
                old_state,
                new_state,
            } => coordinator.annotation_drag_state_did_change(
                map,
                &annotation,
                coordinate,
                old_state,
                new_state,
            ),
            NativeEvent::Gesture {
                gesture,
                phase,
                point,
            } => {
                // points over native controls belong to the map, even if a recognizer reports
                if let Some(kind) = hit_test(&map.subviews(), point) {
                    tracing::trace!(?gesture, ?kind, "ignoring gesture over native view");
                    return;
                }
                coordinator.gesture_did_update(map, gesture, phase, point);
            }
        }
    }

    /// Returns the view the map should display for an annotation.
    pub fn view_for_annotation(&mut self, annotation: &Arc<dyn Annotation>) -> Option<B::AnnotationView> {
        let _entered = self.span.enter();
        let map = bound_mut(&mut self.map);
        self.coordinator.view_for_annotation(map, annotation)
    }

    /// Returns the renderer the map should draw an overlay with.
    pub fn renderer_for_overlay(&mut self, overlay: &Arc<dyn Overlay>) -> B::OverlayRenderer {
        let _entered = self.span.enter();
        let map = bound_mut(&mut self.map);
        self.coordinator.renderer_for_overlay(map, overlay)
    }

    /// Asked by the map before a tap or long press recognizer begins at a point.
    pub fn gesture_should_begin(&mut self, point: Point2<f64>) -> bool {
        let _entered = self.span.enter();
        let map = bound_mut(&mut self.map);
        self.arbiter.should_begin(map, point)
    }

    pub fn region_state(&self) -> RegionChangeState {
        self.coordinator.region_state()
    }

    pub fn map(&self) -> Option<&B> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut B> {
        self.map.as_mut()
    }

    /// Releases the map. Pending write-backs and unhandled notifications are dropped.
    pub fn tear_down(&mut self) -> Option<B> {
        let _entered = self.span.enter();
        self.coordinator.unbind();
        let dropped = self.event_recv.try_iter().count();
        tracing::debug!(dropped, "tearing down map");
        self.map.take()
    }
}

fn bound_mut<B>(map: &mut Option<B>) -> &mut B {
    match map {
        Some(map) => map,
        None => panic!("no bound map view"),
    }
}
