use std::{cell::RefCell, rc::Rc};

use egui::{Id, Pos2, Rect, Vec2, pos2};
use enginemocker::{Call, MockEngine, MockMap};
use mapview::{EventKind, MapEvent, MapHandle as _, MapProps, MapView, PointerInput};

fn rect() -> Rect {
    Rect::from_min_size(Pos2::ZERO, Vec2::new(640., 480.))
}

type Received = Rc<RefCell<Vec<Vec<String>>>>;

fn mounted_map_view(with_hover: bool) -> (MapView<MockMap>, Received, Received) {
    let engine = MockEngine::with_projections();
    let clicked = Received::default();
    let hovered = Received::default();

    let clicked_clone = Rc::clone(&clicked);
    let mut builder = MapView::builder::<MockEngine>(MapProps::default())
        .on_features_click(move |features| clicked_clone.borrow_mut().push(features.to_vec()));

    if with_hover {
        let hovered_clone = Rc::clone(&hovered);
        builder = builder
            .on_features_hover(move |features| hovered_clone.borrow_mut().push(features.to_vec()));
    }

    let mut map_view = builder.build(&engine).unwrap();
    let surface = map_view.surface(Id::new("map"), rect());
    map_view.mount(surface).unwrap();

    (map_view, clicked, hovered)
}

#[test]
fn mounting_binds_target_with_surface_style() {
    let _ = env_logger::try_init();

    let (map_view, _, _) = mounted_map_view(false);
    assert!(map_view.is_mounted());

    let handle = map_view.handle();
    let map = handle.borrow();
    let target = map.target().unwrap();
    assert_eq!("tm-map", target.class_name);
    assert_eq!(-1, target.tab_index);
    assert_eq!(rect(), target.rect);
}

#[test]
fn click_without_features_gives_empty_list() {
    let _ = env_logger::try_init();

    let (map_view, clicked, _) = mounted_map_view(false);
    map_view
        .handle()
        .borrow_mut()
        .fire(&MapEvent::at(EventKind::SingleClick, pos2(10., 10.)));

    assert_eq!(vec![Vec::<String>::new()], *clicked.borrow());
}

#[test]
fn click_gives_features_under_the_pointer() {
    let _ = env_logger::try_init();

    let (map_view, clicked, _) = mounted_map_view(false);
    let handle = map_view.handle();
    handle
        .borrow_mut()
        .set_features(vec!["Bern".to_owned(), "Thun".to_owned()]);
    handle.borrow_mut().handle_input(PointerInput::Click(pos2(5., 5.)));

    assert_eq!(
        vec![vec!["Bern".to_owned(), "Thun".to_owned()]],
        *clicked.borrow()
    );
}

#[test]
fn clicks_are_not_reported_before_mounting() {
    let _ = env_logger::try_init();

    let engine = MockEngine::with_projections();
    let clicked = Received::default();
    let clicked_clone = Rc::clone(&clicked);
    let map_view = MapView::builder::<MockEngine>(MapProps::default())
        .on_features_click(move |features| clicked_clone.borrow_mut().push(features.to_vec()))
        .build(&engine)
        .unwrap();

    let handle = map_view.handle();
    assert!(!handle.borrow().listens_to(EventKind::SingleClick));
    handle
        .borrow_mut()
        .fire(&MapEvent::at(EventKind::SingleClick, pos2(1., 1.)));
    assert!(clicked.borrow().is_empty());
}

#[test]
fn no_hover_callback_no_pointer_move_listener() {
    let _ = env_logger::try_init();

    let (map_view, clicked, hovered) = mounted_map_view(false);
    let handle = map_view.handle();
    assert!(!handle.borrow().listens_to(EventKind::PointerMove));

    handle.borrow_mut().handle_input(PointerInput::Move(pos2(3., 3.)));
    assert!(hovered.borrow().is_empty());
    assert!(clicked.borrow().is_empty());
}

#[test]
fn hover_callback_gets_features() {
    let _ = env_logger::try_init();

    let (map_view, _, hovered) = mounted_map_view(true);
    let handle = map_view.handle();
    assert!(handle.borrow().listens_to(EventKind::PointerMove));

    handle.borrow_mut().handle_input(PointerInput::Move(pos2(3., 3.)));
    handle.borrow_mut().set_features(vec!["Olten".to_owned()]);
    handle.borrow_mut().handle_input(PointerInput::Move(pos2(4., 3.)));

    assert_eq!(
        vec![Vec::new(), vec!["Olten".to_owned()]],
        *hovered.borrow()
    );
}

#[test]
fn mounting_again_only_rebinds() {
    let _ = env_logger::try_init();

    let (mut map_view, clicked, _) = mounted_map_view(true);
    let larger = Rect::from_min_size(Pos2::ZERO, Vec2::new(800., 600.));
    let surface = map_view.surface(Id::new("map"), larger);
    map_view.mount(surface).unwrap();

    let handle = map_view.handle();
    let calls = handle.borrow().calls();
    let registrations = |kind| {
        calls
            .iter()
            .filter(|call| **call == Call::On(kind))
            .count()
    };
    assert_eq!(1, registrations(EventKind::SingleClick));
    assert_eq!(1, registrations(EventKind::PointerMove));
    assert_eq!(Some(&Call::SetTarget(Some(larger))), calls.last());
    assert_eq!(Some(larger), map_view.bound_surface().map(|surface| surface.rect));

    handle
        .borrow_mut()
        .fire(&MapEvent::at(EventKind::SingleClick, pos2(1., 1.)));
    assert_eq!(1, clicked.borrow().len());
}
