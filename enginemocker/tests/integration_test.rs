use std::{cell::RefCell, rc::Rc};

use egui::pos2;
use enginemocker::{Call, MockEngine, MockError, MockLayer};
use mapview::{
    EventKind, Interactions, Layer as _, MapEngine as _, MapEvent, MapHandle as _, MapOptions,
    SWISS_LV03, VIEW_ZOOM_RANGE, ViewOptions, xy,
};

#[test]
fn listeners_receive_events_of_their_kind() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let mut map = engine.create_map(MapOptions {
        controls: false,
        interactions: Interactions::List(vec!["drag-pan".to_owned()]),
    });
    assert_eq!(["drag-pan"], map.interactions());

    let clicks = Rc::new(RefCell::new(Vec::new()));
    let clicks_clone = Rc::clone(&clicks);
    map.on(
        EventKind::SingleClick,
        Box::new(move |_, event| clicks_clone.borrow_mut().push(event.pixel)),
    );

    map.fire(&MapEvent::at(EventKind::SingleClick, pos2(1., 2.)));
    map.fire(&MapEvent::new(EventKind::MoveEnd));

    assert_eq!(vec![Some(pos2(1., 2.))], *clicks.borrow());
    assert!(map.listens_to(EventKind::SingleClick));
    assert!(!map.listens_to(EventKind::PointerMove));
}

#[test]
fn unknown_projection() {
    let _ = env_logger::try_init();

    let engine = MockEngine::default();
    let mut map = engine.create_map(MapOptions {
        controls: false,
        interactions: Interactions::Default,
    });

    let result = map.set_view(ViewOptions {
        center: xy(0., 0.),
        zoom_range: VIEW_ZOOM_RANGE,
        projection: SWISS_LV03.code,
    });

    assert_eq!(
        Err(MockError::UnknownProjection("EPSG:21781".to_owned())),
        result
    );
}

#[test]
fn broken_layer_is_recorded_but_not_attached() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let mut map = engine.create_map(MapOptions {
        controls: false,
        interactions: Interactions::Default,
    });
    map.take_calls();

    MockLayer::new("base").init(&mut map).unwrap();
    assert!(MockLayer::broken("overlay").init(&mut map).is_err());

    assert_eq!(["base"], map.layers());
    assert_eq!(
        vec![
            Call::InitLayer("base".to_owned()),
            Call::InitLayer("overlay".to_owned())
        ],
        map.calls()
    );
}
