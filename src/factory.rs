//! Annotation view and overlay renderer lookup.
//!
//! Factories are chains of responsibility: a combined factory asks each of its parts in order
//! and returns the first result. Annotation view factories additionally register reusable view
//! classes with the map before any lookup; that goes through a [`Registrar`] so each reuse
//! identifier reaches the map at most once, however often the caller rebuilds its factories.

use crate::backend::MapBackend;
use crate::element::{Annotation, Overlay, UserLocation};
use std::any::type_name;
use std::collections::HashSet;
use std::sync::Arc;

/// Registers annotation view classes with a map, once per reuse identifier.
pub struct Registrar<'a, B: MapBackend> {
    map: &'a mut B,
    registered: &'a mut HashSet<String>,
}

impl<'a, B: MapBackend> Registrar<'a, B> {
    pub(crate) fn new(map: &'a mut B, registered: &'a mut HashSet<String>) -> Self {
        Registrar { map, registered }
    }

    /// Registers a view class under a reuse identifier, unless that identifier was already
    /// registered with this map.
    pub fn register(&mut self, class: &B::ViewClass, reuse_identifier: &str) {
        if self.registered.contains(reuse_identifier) {
            return;
        }
        tracing::debug!(reuse_identifier, ?class, "registering annotation view class");
        self.map.register_annotation_view(class, reuse_identifier);
        self.registered.insert(reuse_identifier.to_owned());
    }
}

type RegisterFn<B> = dyn Fn(&mut Registrar<'_, B>) + Send + Sync;
type ViewFn<B> = dyn Fn(&mut B, &Arc<dyn Annotation>) -> Option<<B as MapBackend>::AnnotationView>
    + Send
    + Sync;
type RendererFn<B> =
    dyn Fn(&Arc<dyn Overlay>) -> Option<<B as MapBackend>::OverlayRenderer> + Send + Sync;

/// Provides the view displayed for an annotation.
pub struct AnnotationViewFactory<B: MapBackend> {
    register: Arc<RegisterFn<B>>,
    view: Arc<ViewFn<B>>,
}

impl<B: MapBackend> Clone for AnnotationViewFactory<B> {
    fn clone(&self) -> Self {
        AnnotationViewFactory {
            register: Arc::clone(&self.register),
            view: Arc::clone(&self.view),
        }
    }
}

impl<B: MapBackend> AnnotationViewFactory<B> {
    /// - `register`: registers the view classes this factory dequeues
    /// - `view`: returns the view for an annotation, or None if this factory doesn't handle it
    pub fn new(
        register: impl Fn(&mut Registrar<'_, B>) + Send + Sync + 'static,
        view: impl Fn(&mut B, &Arc<dyn Annotation>) -> Option<B::AnnotationView>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        AnnotationViewFactory {
            register: Arc::new(register),
            view: Arc::new(view),
        }
    }

    /// A factory that registers nothing and never returns a view.
    pub fn empty() -> Self {
        AnnotationViewFactory::new(|_| (), |_, _| None)
    }

    /// Combines factories; the result returns the first view any of them returns.
    pub fn combine(factories: Vec<Self>) -> Self {
        let factories = Arc::new(factories);
        let register_factories = Arc::clone(&factories);
        AnnotationViewFactory::new(
            move |registrar| {
                for factory in register_factories.iter() {
                    factory.register(registrar);
                }
            },
            move |map, annotation| {
                factories
                    .iter()
                    .find_map(|factory| factory.lookup(map, annotation))
            },
        )
    }

    /// A factory that dequeues views of the given class for annotations of type `A`.
    pub fn for_type<A: Annotation>(class: B::ViewClass) -> Self {
        let reuse_identifier = format!("{}___{:?}", type_name::<A>(), class);
        let lookup_identifier = reuse_identifier.clone();
        AnnotationViewFactory::new(
            move |registrar: &mut Registrar<'_, B>| registrar.register(&class, &reuse_identifier),
            move |map: &mut B, annotation: &Arc<dyn Annotation>| {
                annotation.as_any().downcast_ref::<A>()?;
                map.dequeue_annotation_view(&lookup_identifier, annotation)
            },
        )
    }

    /// A factory for the map's own user location annotation.
    pub fn user_location(class: B::ViewClass) -> Self {
        AnnotationViewFactory::for_type::<UserLocation>(class)
    }

    pub fn register(&self, registrar: &mut Registrar<'_, B>) {
        (self.register)(registrar)
    }

    pub fn lookup(&self, map: &mut B, annotation: &Arc<dyn Annotation>) -> Option<B::AnnotationView> {
        (self.view)(map, annotation)
    }
}

/// Provides the renderer that draws an overlay.
pub struct OverlayRendererFactory<B: MapBackend> {
    renderer: Arc<RendererFn<B>>,
}

impl<B: MapBackend> Clone for OverlayRendererFactory<B> {
    fn clone(&self) -> Self {
        OverlayRendererFactory {
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl<B: MapBackend> OverlayRendererFactory<B> {
    pub fn new(
        renderer: impl Fn(&Arc<dyn Overlay>) -> Option<B::OverlayRenderer> + Send + Sync + 'static,
    ) -> Self {
        OverlayRendererFactory {
            renderer: Arc::new(renderer),
        }
    }

    /// A factory that never returns a renderer.
    pub fn empty() -> Self {
        OverlayRendererFactory::new(|_| None)
    }

    /// Combines factories; the result returns the first renderer any of them returns.
    pub fn combine(factories: Vec<Self>) -> Self {
        OverlayRendererFactory::new(move |overlay| {
            factories.iter().find_map(|factory| factory.lookup(overlay))
        })
    }

    /// A factory that renders overlays of type `O` with the given function.
    pub fn for_type<O: Overlay>(
        renderer: impl Fn(&O) -> B::OverlayRenderer + Send + Sync + 'static,
    ) -> Self {
        OverlayRendererFactory::new(move |overlay| {
            overlay.as_any().downcast_ref::<O>().map(&renderer)
        })
    }

    pub fn lookup(&self, overlay: &Arc<dyn Overlay>) -> Option<B::OverlayRenderer> {
        (self.renderer)(overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Circle, PointAnnotation, Polyline};
    use crate::geo::Coordinate;
    use crate::mock::{MockMap, MockRenderer, MockView};

    fn point() -> Arc<dyn Annotation> {
        Arc::new(PointAnnotation::new(Coordinate::new(1., 2.)))
    }

    #[test]
    fn first_matching_factory_wins() {
        let mut map = MockMap::new();
        let mut registered = HashSet::new();
        let factory = AnnotationViewFactory::<MockMap>::combine(vec![
            AnnotationViewFactory::empty(),
            AnnotationViewFactory::user_location("UserLocationView"),
            AnnotationViewFactory::for_type::<PointAnnotation>("PinView"),
            AnnotationViewFactory::new(|_| (), |_, _| Some(MockView("fallback".into()))),
        ]);
        factory.register(&mut Registrar::new(&mut map, &mut registered));

        let view = factory.lookup(&mut map, &point()).unwrap();
        assert!(view.0.ends_with("PointAnnotation___\"PinView\""), "{}", view.0);

        let user: Arc<dyn Annotation> = Arc::new(UserLocation::default());
        let view = factory.lookup(&mut map, &user).unwrap();
        assert!(view.0.contains("UserLocation"), "{}", view.0);
    }

    #[test]
    fn miss_returns_none() {
        let mut map = MockMap::new();
        let factory = AnnotationViewFactory::<MockMap>::for_type::<UserLocation>("View");
        assert!(factory.lookup(&mut map, &point()).is_none());
        assert!(AnnotationViewFactory::<MockMap>::empty()
            .lookup(&mut map, &point())
            .is_none());
    }

    #[test]
    fn registration_reaches_the_map_once() {
        let mut map = MockMap::new();
        let mut registered = HashSet::new();
        let build = || {
            AnnotationViewFactory::<MockMap>::combine(vec![
                AnnotationViewFactory::for_type::<PointAnnotation>("PinView"),
                AnnotationViewFactory::for_type::<PointAnnotation>("PinView"),
            ])
        };
        // recomposed on every render
        for _ in 0..3 {
            build().register(&mut Registrar::new(&mut map, &mut registered));
        }
        assert_eq!(map.registered.len(), 1);
    }

    #[test]
    fn overlay_renderers() {
        let factory = OverlayRendererFactory::<MockMap>::combine(vec![
            OverlayRendererFactory::empty(),
            OverlayRendererFactory::for_type::<Polyline>(|line| {
                MockRenderer(format!("line of {}", line.coordinates.len()))
            }),
        ]);
        let line: Arc<dyn Overlay> = Arc::new(Polyline {
            coordinates: vec![Coordinate::new(0., 0.), Coordinate::new(1., 1.)],
        });
        let circle: Arc<dyn Overlay> = Arc::new(Circle {
            center: Coordinate::new(0., 0.),
            radius: 10.,
        });
        assert_eq!(factory.lookup(&line), Some(MockRenderer("line of 2".into())));
        assert_eq!(factory.lookup(&circle), None);
    }
}
