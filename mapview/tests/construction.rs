use std::{cell::RefCell, rc::Rc};

use approx::assert_relative_eq;
use enginemocker::{Call, MockEngine, MockError, MockLayer};
use mapview::{
    Error, Interactions, MapHandle as _, MapProps, MapView, Ownership, SWISS_LV03,
    VIEW_ZOOM_RANGE, View as _, ViewOptions, extent, layers, register_projections, xy,
};

fn default_interactions() -> Call {
    Call::CreateMap {
        controls: false,
        interactions: vec!["default".to_owned()],
    }
}

#[test]
fn centered_and_zoomed_without_layers() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let map_view = MapView::builder(MapProps::default().with_center(xy(5., 10.)).with_zoom(19.))
        .build(&engine)
        .unwrap();

    let state = map_view.view_state().unwrap();
    assert_eq!(Some(19.), state.zoom);
    let center = state.center.unwrap();
    assert_relative_eq!(5., center.x);
    assert_relative_eq!(10., center.y);
    assert_eq!("EPSG:21781", state.projection);

    let handle = map_view.handle();
    let map = handle.borrow();
    assert_eq!(VIEW_ZOOM_RANGE, map.view().zoom_range());
    assert!(map.layers().is_empty());
    assert_eq!(
        vec![
            default_interactions(),
            Call::SetView(ViewOptions {
                center: xy(5., 10.),
                zoom_range: VIEW_ZOOM_RANGE,
                projection: SWISS_LV03.code,
            }),
            Call::SetZoom(19.),
            Call::On(mapview::EventKind::MoveEnd),
        ],
        map.calls()
    );
}

#[test]
fn resolution_is_used_only_without_zoom() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let map_view = MapView::builder(MapProps::default().with_zoom(None).with_resolution(2.5))
        .build(&engine)
        .unwrap();

    let calls = map_view.handle().borrow().calls();
    assert!(calls.contains(&Call::SetResolution(2.5)));
    assert!(!calls.iter().any(|call| matches!(call, Call::SetZoom(_))));

    // Zoom wins when both are given.
    let map_view = MapView::builder(MapProps::default().with_zoom(18.).with_resolution(2.5))
        .build(&engine)
        .unwrap();

    let calls = map_view.handle().borrow().calls();
    assert!(calls.contains(&Call::SetZoom(18.)));
    assert!(!calls.iter().any(|call| matches!(call, Call::SetResolution(_))));
}

#[test]
fn layers_are_initialized_in_order() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let props = MapProps::default().with_layers(layers([
        MockLayer::new("base"),
        MockLayer::new("lines"),
        MockLayer::new("stations"),
    ]));
    let map_view = MapView::builder(props).build(&engine).unwrap();

    let handle = map_view.handle();
    let map = handle.borrow();
    assert_eq!(["base", "lines", "stations"], map.layers());

    let layer_calls: Vec<_> = map
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::ClearLayers | Call::InitLayer(_)))
        .collect();
    assert_eq!(
        vec![
            Call::ClearLayers,
            Call::InitLayer("base".to_owned()),
            Call::InitLayer("lines".to_owned()),
            Call::InitLayer("stations".to_owned()),
        ],
        layer_calls
    );
}

#[test]
fn no_layers_no_clearing() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let map_view = MapView::builder(MapProps::default()).build(&engine).unwrap();

    let calls = map_view.handle().borrow().calls();
    assert!(!calls.contains(&Call::ClearLayers));
    assert!(!calls.iter().any(|call| matches!(call, Call::InitLayer(_))));
}

#[test]
fn extent_is_fitted_with_engine_defaults() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let map_view = MapView::builder(MapProps::default().with_extent(extent(0., 0., 100., 100.)))
        .build(&engine)
        .unwrap();

    let calls = map_view.handle().borrow().calls();
    assert!(calls.contains(&Call::Fit(extent(0., 0., 100., 100.), None)));

    // Fitting comes last.
    assert_eq!(
        Some(&Call::Fit(extent(0., 0., 100., 100.), None)),
        calls.iter().rev().nth(1)
    );
}

#[test]
fn interactions_are_passed_through() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let map_view = MapView::builder(MapProps::default())
        .with_interactions(Interactions::List(vec![
            "drag-pan".to_owned(),
            "mouse-wheel-zoom".to_owned(),
        ]))
        .build(&engine)
        .unwrap();

    assert_eq!(
        ["drag-pan", "mouse-wheel-zoom"],
        map_view.handle().borrow().interactions()
    );
}

#[test]
fn projection_has_to_be_registered() {
    let _ = env_logger::try_init();

    let mut engine = MockEngine::default();
    let result = MapView::builder(MapProps::default()).build(&engine);
    assert!(matches!(
        result,
        Err(Error::View(MockError::UnknownProjection(_)))
    ));

    assert!(register_projections(&mut engine).unwrap());
    assert!(!register_projections(&mut engine).unwrap());
    assert_eq!(
        vec![Call::RegisterProjection("EPSG:21781")],
        engine.calls()
    );

    assert!(MapView::builder(MapProps::default()).build(&engine).is_ok());
}

#[test]
fn broken_layer_fails_construction() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let props = MapProps::default().with_layers(layers([
        MockLayer::new("base"),
        MockLayer::broken("overlay"),
        MockLayer::new("labels"),
    ]));

    let Err(err) = MapView::builder(props).build(&engine) else {
        panic!("construction should fail");
    };

    assert!(matches!(err, Error::Layer { index: 1, .. }));
    assert_eq!(
        Some(&MockError::BrokenLayer("overlay".to_owned())),
        err.engine_error()
    );

    // Created for nothing, so released right away.
    assert_eq!(1, engine.disposed_maps());
}

#[test]
fn injected_map_is_not_disposed_when_construction_fails() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let external = engine.external_map();
    let props = MapProps::default().with_layers(layers([MockLayer::broken("overlay")]));

    let result = MapView::builder(props)
        .with_map(Rc::clone(&external))
        .build(&engine);

    assert!(matches!(result, Err(Error::Layer { index: 0, .. })));
    assert!(!external.borrow().disposed());
    assert_eq!(0, engine.disposed_maps());
}

#[test]
fn refused_projection_is_reported_as_such() {
    let _ = env_logger::try_init();

    let mut engine = MockEngine::refusing_projections();
    let err = register_projections(&mut engine).unwrap_err();

    assert!(matches!(
        err,
        Error::Projection {
            code: "EPSG:21781",
            ..
        }
    ));
    assert_eq!(
        Some(&MockError::RefusedProjection("EPSG:21781".to_owned())),
        err.engine_error()
    );
    assert_eq!(
        "engine could not register projection EPSG:21781",
        err.to_string()
    );
}

#[test]
fn owned_map_is_disposed() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let map_view = MapView::builder(MapProps::default()).build(&engine).unwrap();
    assert_eq!(Ownership::Owned, map_view.ownership());

    let handle = map_view.handle();
    drop(map_view);

    assert!(handle.borrow().disposed());
    assert!(handle.borrow().target().is_none());
}

#[test]
fn injected_map_is_reused_and_never_disposed() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let external = engine.external_map();
    external.borrow().take_calls();

    let map_view = MapView::builder(MapProps::default())
        .with_map(Rc::clone(&external))
        .build(&engine)
        .unwrap();
    assert_eq!(Ownership::Injected, map_view.ownership());
    assert!(!map_view.owns_handle());
    assert!(Rc::ptr_eq(&external, &map_view.handle()));

    drop(map_view);

    let map = external.borrow();
    assert!(!map.disposed());
    assert!(!map.calls().contains(&Call::Dispose));
    assert!(
        !map.calls()
            .iter()
            .any(|call| matches!(call, Call::CreateMap { .. }))
    );
}

#[test]
fn map_moved_callback_gets_raw_event() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let events = Rc::new(RefCell::new(Vec::new()));
    let events_clone = Rc::clone(&events);

    let map_view = MapView::builder(MapProps::default())
        .on_map_moved(move |event| events_clone.borrow_mut().push(event.clone()))
        .build(&engine)
        .unwrap();

    let event = mapview::MapEvent::new(mapview::EventKind::MoveEnd);
    map_view.handle().borrow_mut().fire(&event);

    assert_eq!(vec![event], *events.borrow());
}
