//! Arbitration between the engine's own gestures and the native map's controls.
//!
//! The engine installs a tap/click and a long press recognizer on the map. Those must not
//! steal touches from the map's zoom and pitch controls, its compass or annotation views, so
//! before a recognizer begins, the point is hit-tested against a snapshot of the native view
//! hierarchy.

use crate::backend::{GestureKind, MapBackend, Subview, SubviewKind};
use crate::props::Handlers;
use cgmath::Point2;
use std::collections::HashSet;

/// Recognizer states reported by the native gesture system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Returns the kind of the first interactive view under the point.
///
/// Depth first, parents before children, siblings in order. Subview frames are relative to
/// their parent; children are visited even if they overflow their parent's frame.
pub fn hit_test(subviews: &[Subview], point: Point2<f64>) -> Option<SubviewKind> {
    hit_test_at(subviews, point, Point2::new(0., 0.))
}

fn hit_test_at(
    subviews: &[Subview],
    point: Point2<f64>,
    offset: Point2<f64>,
) -> Option<SubviewKind> {
    for subview in subviews {
        let frame = subview.frame + offset;
        if subview.kind.is_interactive() && frame.contains(point) {
            return Some(subview.kind);
        }
        if let Some(kind) = hit_test_at(&subview.subviews, point, frame.origin) {
            return Some(kind);
        }
    }
    None
}

/// Tracks which recognizers a map has and decides whether they may begin.
#[derive(Debug, Default)]
pub struct GestureArbiter {
    installed: HashSet<GestureKind>,
}

impl GestureArbiter {
    pub fn new() -> GestureArbiter {
        GestureArbiter::default()
    }

    pub fn is_installed(&self, gesture: GestureKind) -> bool {
        self.installed.contains(&gesture)
    }

    /// Installs recognizers for the handlers that exist and haven't got one yet.
    ///
    /// Once both are installed, a tap only begins after the long press has failed.
    pub fn install<B: MapBackend>(&mut self, map: &mut B, handlers: &Handlers) {
        let mut added = false;
        if handlers.tap_or_click.is_some() {
            added |= self.install_one(map, GestureKind::TapOrClick);
        }
        if handlers.long_press.is_some() {
            added |= self.install_one(map, GestureKind::LongPress);
        }
        if added
            && self.is_installed(GestureKind::TapOrClick)
            && self.is_installed(GestureKind::LongPress)
        {
            map.require_gesture_to_fail(GestureKind::TapOrClick, GestureKind::LongPress);
        }
    }

    fn install_one<B: MapBackend>(&mut self, map: &mut B, gesture: GestureKind) -> bool {
        if !self.installed.insert(gesture) {
            return false;
        }
        tracing::debug!(?gesture, "installing gesture recognizer");
        map.add_gesture_recognizer(gesture);
        true
    }

    /// Decides whether one of our recognizers may begin at the point.
    ///
    /// Vetoes if the point is over a native control or annotation view. Otherwise the touch
    /// is ours: every selected annotation is deselected and the recognizer may begin.
    pub fn should_begin<B: MapBackend>(&self, map: &mut B, point: Point2<f64>) -> bool {
        if let Some(kind) = hit_test(&map.subviews(), point) {
            tracing::trace!(?kind, x = point.x, y = point.y, "gesture vetoed");
            return false;
        }
        for annotation in map.selected_annotations() {
            map.deselect_annotation(&annotation, true);
        }
        true
    }

    /// Returns true if a recognizer in this phase should fire its handler.
    ///
    /// Taps fire once they end; long presses fire as soon as they are recognized.
    pub fn fires(gesture: GestureKind, phase: GesturePhase) -> bool {
        match gesture {
            GestureKind::TapOrClick => phase == GesturePhase::Ended,
            GestureKind::LongPress => phase == GesturePhase::Began,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Annotation, PointAnnotation};
    use crate::geo::Coordinate;
    use crate::mock::MockMap;
    use crate::rect::Rect;
    use cgmath::Vector2;
    use std::sync::Arc;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(Point2::new(x, y), Vector2::new(w, h))
    }

    fn controls() -> Vec<Subview> {
        vec![
            Subview::new(SubviewKind::Other, rect(0., 0., 400., 400.)),
            Subview::new(SubviewKind::Other, rect(300., 300., 100., 100.)).with_subviews(vec![
                Subview::new(SubviewKind::ZoomControl, rect(10., 10., 40., 20.)),
                Subview::new(SubviewKind::PitchControl, rect(10., 40., 40., 20.)),
            ]),
        ]
    }

    #[test]
    fn nested_frames_are_offset() {
        let subviews = controls();
        assert_eq!(
            hit_test(&subviews, Point2::new(315., 315.)),
            Some(SubviewKind::ZoomControl)
        );
        assert_eq!(
            hit_test(&subviews, Point2::new(315., 345.)),
            Some(SubviewKind::PitchControl)
        );
        // inside the container, outside both controls
        assert_eq!(hit_test(&subviews, Point2::new(380., 380.)), None);
        // where the zoom control would be without the offset
        assert_eq!(hit_test(&subviews, Point2::new(15., 15.)), None);
    }

    #[test]
    fn veto_over_controls() {
        let mut map = MockMap::new();
        map.subviews = controls();
        let selected: Arc<dyn Annotation> = Arc::new(PointAnnotation::new(Coordinate::new(0., 0.)));
        map.selected.push(selected);

        let arbiter = GestureArbiter::new();
        assert!(!arbiter.should_begin(&mut map, Point2::new(320., 320.)));
        assert_eq!(map.selected.len(), 1, "a vetoed gesture leaves selection alone");
    }

    #[test]
    fn veto_over_annotation_view() {
        let mut map = MockMap::new();
        map.subviews = vec![Subview::new(SubviewKind::Other, rect(50., 50., 200., 200.))
            .with_subviews(vec![Subview::new(
                SubviewKind::Annotation,
                rect(20., 20., 30., 30.),
            )])];
        map.selected.push(Arc::new(PointAnnotation::new(Coordinate::new(0., 0.))));

        let point = Point2::new(75., 75.);
        assert_eq!(hit_test(&map.subviews, point), Some(SubviewKind::Annotation));
        let arbiter = GestureArbiter::new();
        assert!(!arbiter.should_begin(&mut map, point));
        assert_eq!(map.selected.len(), 1);
        assert!(map.take_calls().is_empty());

        // just outside the annotation view, still inside its container
        assert!(arbiter.should_begin(&mut map, Point2::new(110., 110.)));
        assert!(map.selected.is_empty());
    }

    #[test]
    fn permit_clears_selection() {
        let mut map = MockMap::new();
        map.subviews = controls();
        map.selected.push(Arc::new(PointAnnotation::new(Coordinate::new(0., 0.))));
        map.selected.push(Arc::new(PointAnnotation::new(Coordinate::new(1., 1.))));

        let arbiter = GestureArbiter::new();
        assert!(arbiter.should_begin(&mut map, Point2::new(100., 100.)));
        assert!(map.selected.is_empty());
    }

    #[test]
    fn recognizers_installed_once_with_failure_dependency() {
        let mut map = MockMap::new();
        let mut arbiter = GestureArbiter::new();
        let tap_only = Handlers {
            tap_or_click: Some(Arc::new(|_: Coordinate| ())),
            ..Handlers::default()
        };
        arbiter.install(&mut map, &tap_only);
        arbiter.install(&mut map, &tap_only);
        assert_eq!(map.gestures, vec![GestureKind::TapOrClick]);
        assert!(map.failure_requirements.is_empty());

        // long press handler appears on a later update
        let both = Handlers {
            long_press: Some(Arc::new(|_: Coordinate| ())),
            ..tap_only
        };
        arbiter.install(&mut map, &both);
        arbiter.install(&mut map, &both);
        assert_eq!(map.gestures, vec![GestureKind::TapOrClick, GestureKind::LongPress]);
        assert_eq!(
            map.failure_requirements,
            vec![(GestureKind::TapOrClick, GestureKind::LongPress)]
        );
    }

    #[test]
    fn no_handlers_no_recognizers() {
        let mut map = MockMap::new();
        GestureArbiter::new().install(&mut map, &Handlers::default());
        assert!(map.gestures.is_empty());
    }

    #[test]
    fn firing_phases() {
        assert!(GestureArbiter::fires(GestureKind::TapOrClick, GesturePhase::Ended));
        assert!(!GestureArbiter::fires(GestureKind::TapOrClick, GesturePhase::Began));
        assert!(GestureArbiter::fires(GestureKind::LongPress, GesturePhase::Began));
        assert!(!GestureArbiter::fires(GestureKind::LongPress, GesturePhase::Ended));
        assert!(!GestureArbiter::fires(GestureKind::LongPress, GesturePhase::Cancelled));
    }
}
