mod places;
pub mod sketch;
mod windows;

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use egui::Color32;
use mapview::{Error, Layer, LayerList, MapProps, MapView, layers};
use sketch::{SketchEngine, SketchError, SketchMap, Station, StationsLayer};

/// How many events the "Events" window keeps.
const EVENTS_SHOWN: usize = 8;

/// Most recent things reported by the map, newest last.
#[derive(Default)]
pub struct Events(VecDeque<String>);

impl Events {
    fn push(&mut self, event: String) {
        log::info!("{event}");
        self.0.push_back(event);
        if self.0.len() > EVENTS_SHOWN {
            self.0.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

fn describe(stations: &[Station]) -> String {
    stations
        .iter()
        .map(|station| station.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct MyApp {
    map_view: MapView<SketchMap>,
    stations: LayerList<SketchMap>,
    show_stations: bool,
    hovered: Rc<RefCell<Option<String>>>,
    events: Rc<RefCell<Events>>,
}

impl MyApp {
    pub fn new() -> Result<Self, Error<SketchError>> {
        let mut engine = SketchEngine::default();
        mapview::register_projections(&mut engine)?;

        let stations: Rc<dyn Layer<SketchMap>> = Rc::new(StationsLayer::new(
            "stations",
            Color32::from_rgb(235, 0, 0),
            places::all()
                .into_iter()
                .map(|(name, position)| Station {
                    name: name.to_owned(),
                    position,
                })
                .collect(),
        ));
        let stations = layers([stations]);

        let events = Rc::new(RefCell::new(Events::default()));
        let hovered = Rc::new(RefCell::new(None));

        let map_view = MapView::builder::<SketchEngine>(
            MapProps::default()
                .with_center(places::olten())
                .with_zoom(16.5)
                .with_layers(Rc::clone(&stations))
                .with_class_name("network-map"),
        )
        .on_features_click({
            let events = Rc::clone(&events);
            move |stations: &[Station]| {
                if !stations.is_empty() {
                    events
                        .borrow_mut()
                        .push(format!("Clicked {}.", describe(stations)));
                }
            }
        })
        .on_features_hover({
            let hovered = Rc::clone(&hovered);
            move |stations: &[Station]| {
                *hovered.borrow_mut() = (!stations.is_empty()).then(|| describe(stations));
            }
        })
        .on_map_moved({
            let events = Rc::clone(&events);
            move |event| {
                let how = if event.dragging { "dragged" } else { "moved" };
                events.borrow_mut().push(format!("Map {how}."));
            }
        })
        .build(&engine)?;

        Ok(Self {
            map_view,
            stations,
            show_stations: true,
            hovered,
            events,
        })
    }

    /// Pass a new revision of the properties to the map.
    fn update_props(&mut self, change: impl FnOnce(MapProps<SketchMap>) -> MapProps<SketchMap>) {
        let props = change(self.map_view.props().clone());
        match self.map_view.update(props) {
            Ok(reconciliation) => log::debug!("Applied {:?}.", reconciliation.applied()),
            Err(err) => log::warn!("Map could not be updated: {err}."),
        }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                ui.add(&mut self.map_view);

                {
                    use windows::*;

                    zoom(ui, self);
                    places(ui, self);
                    controls(ui, self);
                    events(ui, self);
                }
            });
    }
}
