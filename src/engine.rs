//! Applies declared map state to the native map.
//!
//! Every property is compared against what the map currently reports, and its setter is only
//! called on a mismatch: native setters have side effects (a visibility setter snaps the
//! viewport and cancels animations), so blindly re-applying a whole snapshot on every render
//! would fight the user. Nothing in here writes to declarative state; that only ever happens
//! from the coordinator, one turn later.

use crate::backend::MapBackend;
use crate::diff::diff;
use crate::element::{Annotation, Overlay};
use crate::geo::MapRect;
use crate::options::{EdgeInsets, MapFlag};
use crate::props::MapProps;
use crate::visibility::{same_annotations, MapVisibility, RegionChangeState, TrackingMode};
use std::sync::Arc;

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub annotations_removed: usize,
    pub annotations_added: usize,
    pub overlays_removed: usize,
    pub overlays_added: usize,
    /// Scalar setter calls, visibility included.
    pub property_writes: usize,
    /// True if declared visibility was skipped because of tracking or an in-flight change.
    pub visibility_suppressed: bool,
}

impl ReconcileStats {
    /// Total number of calls made into the map.
    pub fn writes(&self) -> usize {
        self.annotations_removed
            + self.annotations_added
            + self.overlays_removed
            + self.overlays_added
            + self.property_writes
    }
}

/// Per-map reconciliation state.
#[derive(Debug, Default)]
pub struct Reconciler {
    /// The annotation list last passed to `show_annotations`; fitting can't be read back from
    /// the map, so this is what a declared `FitAnnotations` is compared against.
    last_fitted: Option<Vec<Arc<dyn Annotation>>>,
    /// The last visible map rect set, with its padding and the rect the map reported after.
    last_rect: Option<AppliedRect>,
}

/// A map that honours edge padding reports a larger rect than the one it was given.
#[derive(Debug, Clone, Copy)]
struct AppliedRect {
    declared: MapRect,
    padding: EdgeInsets,
    observed: MapRect,
}

impl Reconciler {
    pub fn new() -> Reconciler {
        Reconciler::default()
    }

    /// Makes the map match the declared props.
    ///
    /// - `region_state`: whether the map is mid region change; visibility is left alone if so
    /// - `animated`: whether visibility changes may animate
    pub fn reconcile<B: MapBackend>(
        &mut self,
        props: &MapProps<B>,
        map: &mut B,
        region_state: RegionChangeState,
        animated: bool,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();

        // collections
        let annotations = diff(&props.annotations, &map.annotations(), |a, b| {
            Annotation::eq(a, b)
        });
        stats.annotations_removed = annotations.to_remove.len();
        stats.annotations_added = annotations.to_add.len();
        annotations.apply(
            map,
            |map, a| map.remove_annotation(a),
            |map, a| map.add_annotation(a),
        );

        let overlays = diff(&props.overlays, &map.overlays(), |a, b| Overlay::eq(a, b));
        stats.overlays_removed = overlays.to_remove.len();
        stats.overlays_added = overlays.to_add.len();
        overlays.apply(
            map,
            |map, o| map.remove_overlay(o),
            |map, o| map.add_overlay(o),
        );

        // scalars
        let options = &props.options;
        if let Some(configuration) = &options.configuration {
            if map.configuration().as_ref() != Some(configuration) {
                map.set_configuration(configuration.clone());
                stats.property_writes += 1;
            }
        }

        if map.edge_insets() != options.edge_insets {
            map.set_edge_insets(options.edge_insets);
            stats.property_writes += 1;
        }

        for flag in MapFlag::ALL.iter().copied() {
            if !map.supports(flag) {
                continue;
            }
            let value = options.flag(flag);
            if map.flag(flag) != value {
                map.set_flag(flag, value);
                stats.property_writes += 1;
            }
        }

        let tracking_mode = props.tracking_mode.get();
        if map.tracking_mode() != tracking_mode {
            map.set_tracking_mode(tracking_mode, false);
            stats.property_writes += 1;
        }

        // visibility
        if let Some(visibility) = props.visibility.get() {
            if region_state != RegionChangeState::Idle || tracking_mode != TrackingMode::None {
                tracing::trace!(?region_state, ?tracking_mode, "visibility write suppressed");
                stats.visibility_suppressed = true;
            } else if self.apply_visibility(visibility, props, map, animated) {
                stats.property_writes += 1;
            }
        }

        if stats.writes() > 0 {
            tracing::debug!(?stats, "reconciled map");
        }
        stats
    }

    /// Sets the visibility if the map disagrees. Returns true if a setter was called.
    fn apply_visibility<B: MapBackend>(
        &mut self,
        visibility: MapVisibility,
        props: &MapProps<B>,
        map: &mut B,
        animated: bool,
    ) -> bool {
        match visibility {
            MapVisibility::Region(region) => {
                if map.region() == region {
                    return false;
                }
                map.set_region(region, animated);
            }
            MapVisibility::CenterCoordinate(center) => {
                if map.center_coordinate() == center {
                    return false;
                }
                map.set_center_coordinate(center, animated);
            }
            MapVisibility::VisibleMapRect(rect) => {
                let padding = props.options.edge_insets;
                let current = map.visible_map_rect();
                let settled = self.last_rect.map_or(false, |last| {
                    last.declared == rect && last.padding == padding && last.observed == current
                });
                if current == rect || settled {
                    return false;
                }
                map.set_visible_map_rect(rect, padding, animated);
                self.last_fitted = None;
                self.last_rect = Some(AppliedRect {
                    declared: rect,
                    padding,
                    observed: map.visible_map_rect(),
                });
                return true;
            }
            MapVisibility::Camera(camera) => {
                if map.camera() == camera {
                    return false;
                }
                map.set_camera(camera, animated);
            }
            MapVisibility::FitAnnotations(annotations) => {
                let unchanged = self
                    .last_fitted
                    .as_ref()
                    .map_or(false, |last| same_annotations(last, &annotations));
                if unchanged {
                    return false;
                }
                map.show_annotations(&annotations, animated);
                self.last_fitted = Some(annotations);
                self.last_rect = None;
                return true;
            }
        }
        // the viewport moved elsewhere, so a later fit or rect must be applied again
        self.last_fitted = None;
        self.last_rect = None;
        true
    }
}
