use std::time::Duration;

use egui::{Align2, RichText, Ui, Window};
use mapview::{AnimationOptions, Extent, VIEW_ZOOM_RANGE, layers, xy};

use crate::{MyApp, places as stations};

/// Simple GUI to zoom in and out.
pub fn zoom(ui: &Ui, app: &mut MyApp) {
    Window::new("Map")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_BOTTOM, [10., -10.])
        .show(ui.ctx(), |ui| {
            let current = app
                .map_view
                .view_state()
                .ok()
                .and_then(|state| state.zoom)
                .unwrap_or(VIEW_ZOOM_RANGE.min());

            ui.horizontal(|ui| {
                if ui.button(RichText::new("➕").heading()).clicked() {
                    let zoom = VIEW_ZOOM_RANGE.clamp(current.round() + 1.);
                    app.update_props(|props| props.with_zoom(zoom));
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    let zoom = VIEW_ZOOM_RANGE.clamp(current.round() - 1.);
                    app.update_props(|props| props.with_zoom(zoom));
                }
            });
        });
}

/// Fly to one of the stations.
pub fn places(ui: &Ui, app: &mut MyApp) {
    Window::new("Stations")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_BOTTOM, [-10., -10.])
        .show(ui.ctx(), |ui| {
            for (name, position) in stations::all() {
                if ui.button(name).clicked() {
                    app.update_props(|props| {
                        props.with_animation(AnimationOptions {
                            center: Some(position),
                            zoom: Some(18.),
                            duration: Some(Duration::from_millis(800)),
                            ..Default::default()
                        })
                    });
                }
            }
        });
}

/// Smallest extent containing every station.
fn network_extent() -> Extent {
    let (min, max) = stations::all().into_iter().fold(
        (xy(f64::MAX, f64::MAX), xy(f64::MIN, f64::MIN)),
        |(min, max), (_, position)| {
            (
                xy(min.x.min(position.x), min.y.min(position.y)),
                xy(max.x.max(position.x), max.y.max(position.y)),
            )
        },
    );
    Extent::new(min, max)
}

pub fn controls(ui: &Ui, app: &mut MyApp) {
    Window::new("Controls")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_TOP, [-10., 10.])
        .fixed_size([150., 150.])
        .show(ui.ctx(), |ui| {
            if ui.checkbox(&mut app.show_stations, "Stations").changed() {
                let shown = if app.show_stations {
                    app.stations.clone()
                } else {
                    layers([])
                };
                app.update_props(|props| props.with_layers(shown));
            }

            if ui.button("Whole network").clicked() {
                app.update_props(|props| props.with_extent(network_extent()));
            }

            ui.separator();

            match app.map_view.view_state() {
                Ok(state) => {
                    if let Some(center) = state.center {
                        ui.label(format!("center {:.0} {:.0}", center.x, center.y));
                    }
                    if let Some(zoom) = state.zoom {
                        ui.label(format!("zoom {zoom:.2}"));
                    }
                    ui.label(state.projection);
                }
                Err(err) => {
                    ui.label(err.to_string());
                }
            }
        });
}

/// What the map reported recently.
pub fn events(ui: &Ui, app: &mut MyApp) {
    Window::new("Events")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_TOP, [10., 10.])
        .show(ui.ctx(), |ui| {
            match app.hovered.borrow().as_deref() {
                Some(hovered) => ui.label(RichText::new(hovered).strong()),
                None => ui.label("hover over a station"),
            };

            for event in app.events.borrow().iter() {
                ui.label(event);
            }
        });
}
