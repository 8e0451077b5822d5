//! Tiny engine drawing stations on a blank canvas. It is just enough to show the `MapView` in
//! action: no tiles, no real projections, the plane is simply scaled and shifted.

use std::time::Duration;

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, vec2};
use mapview::{
    AnimationOptions, Coordinate, EventKind, Extent, FitOptions, Interactions, Layer, Listener,
    MapEngine, MapEvent, MapHandle, MapOptions, PointerInput, Projection, Surface, View,
    ViewOptions, ZoomRange, xy,
};

/// Meters per pixel at zoom 16, the lowest one views allow. Whole Switzerland fits the screen.
const RESOLUTION_AT_ZOOM_16: f64 = 350.;

/// How far from a station a click still hits it.
const PICK_RADIUS: f32 = 8.;

const DEFAULT_ANIMATION: Duration = Duration::from_millis(250);

fn resolution_for(zoom: f64) -> f64 {
    RESOLUTION_AT_ZOOM_16 * 2f64.powf(16. - zoom)
}

fn zoom_for(resolution: f64) -> f64 {
    16. - (resolution / RESOLUTION_AT_ZOOM_16).log2()
}

#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    #[error("projection {0} is not registered")]
    UnknownProjection(String),

    #[error("cannot fit an empty extent")]
    EmptyExtent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    DragPan,
    WheelZoom,
}

#[derive(Default)]
pub struct SketchEngine {
    projections: Vec<String>,
}

impl MapEngine for SketchEngine {
    type Map = SketchMap;
    type Interaction = Interaction;
    type InteractionCollection = Vec<Interaction>;

    fn register_projection(&mut self, projection: &Projection) -> Result<(), SketchError> {
        log::info!("Registering {} ({}).", projection.code, projection.definition);
        self.projections.push(projection.code.to_owned());
        Ok(())
    }

    fn has_projection(&self, code: &str) -> bool {
        self.projections.iter().any(|known| known == code)
    }

    fn create_map(&self, options: MapOptions<Self>) -> SketchMap {
        let interactions = match options.interactions {
            Interactions::Default => vec![Interaction::DragPan, Interaction::WheelZoom],
            Interactions::List(list) => list,
            Interactions::Native(collection) => collection,
        };

        SketchMap {
            projections: self.projections.clone(),
            controls: options.controls,
            interactions,
            view: SketchView::default(),
            layers: Vec::new(),
            listeners: Vec::new(),
            target: None,
        }
    }
}

/// What the sketch engine can draw, and what clicks and hovers report.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub position: Coordinate,
}

struct Animation {
    from: (Coordinate, f64),
    to: (Coordinate, f64),
    duration: f32,
    elapsed: f32,
}

impl Animation {
    /// Center and resolution at this point of the animation.
    fn current(&self) -> (Coordinate, f64) {
        let t = if self.finished() {
            1.
        } else {
            (self.elapsed / self.duration) as f64
        };
        let eased = t * (2. - t);

        let (from_center, from_resolution) = self.from;
        let (to_center, to_resolution) = self.to;
        let center = from_center + (to_center - from_center) * eased;
        let resolution = from_resolution * (to_resolution / from_resolution).powf(eased);
        (center, resolution)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

pub struct SketchView {
    center: Coordinate,
    resolution: f64,
    zoom_range: ZoomRange,
    projection: String,
    size: Vec2,
    animation: Option<Animation>,
}

impl Default for SketchView {
    fn default() -> Self {
        Self {
            center: xy(0., 0.),
            resolution: RESOLUTION_AT_ZOOM_16,
            zoom_range: ZoomRange::default(),
            projection: "EPSG:3857".to_owned(),
            size: vec2(800., 600.),
            animation: None,
        }
    }
}

impl SketchView {
    /// Keep the resolution within the zoom range.
    fn constrain(&self, resolution: f64) -> f64 {
        resolution_for(self.zoom_range.clamp(zoom_for(resolution)))
    }

    fn local_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size)
    }

    /// Position relative to the surface.
    fn to_pixel(&self, position: Coordinate) -> Pos2 {
        let offset = (position - self.center) / self.resolution;
        self.local_rect().center() + vec2(offset.x as f32, -offset.y as f32)
    }

    fn from_pixel(&self, pixel: Pos2) -> Coordinate {
        let offset = pixel - self.local_rect().center();
        self.center
            + xy(
                offset.x as f64 * self.resolution,
                -offset.y as f64 * self.resolution,
            )
    }

    fn start_animation(&mut self, to: (Coordinate, f64), duration: Duration) {
        self.animation = Some(Animation {
            from: (self.center, self.resolution),
            to,
            duration: duration.as_secs_f32(),
            elapsed: 0.,
        });
    }

    /// Move the animation forward. Returns `true` if it just finished.
    fn advance(&mut self, delta_time: f32) -> bool {
        let Some(animation) = &mut self.animation else {
            return false;
        };

        animation.elapsed += delta_time;
        (self.center, self.resolution) = animation.current();

        if animation.finished() {
            self.animation = None;
            true
        } else {
            false
        }
    }
}

impl View for SketchView {
    type Error = SketchError;

    fn center(&self) -> Option<Coordinate> {
        Some(self.center)
    }

    fn zoom(&self) -> Option<f64> {
        Some(zoom_for(self.resolution))
    }

    fn resolution(&self) -> Option<f64> {
        Some(self.resolution)
    }

    fn projection(&self) -> &str {
        &self.projection
    }

    fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    fn set_center(&mut self, center: Coordinate) {
        self.animation = None;
        self.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.animation = None;
        self.resolution = resolution_for(self.zoom_range.clamp(zoom));
    }

    fn set_resolution(&mut self, resolution: f64) {
        self.animation = None;
        self.resolution = self.constrain(resolution);
    }

    fn fit(&mut self, extent: Extent, options: Option<&FitOptions>) -> Result<(), SketchError> {
        if extent.width() <= 0. || extent.height() <= 0. {
            return Err(SketchError::EmptyExtent);
        }

        let [top, right, bottom, left] = options.map(|options| options.padding).unwrap_or_default();
        let available = (self.size - vec2(left + right, top + bottom)).max(Vec2::splat(1.));

        let max_zoom = options.map_or(self.zoom_range.max(), |options| options.max_zoom);
        let resolution = (extent.width() / available.x as f64)
            .max(extent.height() / available.y as f64)
            .max(resolution_for(max_zoom));
        let target = (extent.center(), self.constrain(resolution));

        match options.map(|options| options.duration) {
            Some(duration) if !duration.is_zero() => self.start_animation(target, duration),
            _ => {
                self.animation = None;
                (self.center, self.resolution) = target;
            }
        }

        Ok(())
    }

    fn animate(&mut self, options: &AnimationOptions) {
        let resolution = options
            .resolution
            .or(options.zoom.map(resolution_for))
            .map_or(self.resolution, |resolution| self.constrain(resolution));
        let center = options.center.unwrap_or(self.center);

        self.start_animation(
            (center, resolution),
            options.duration.unwrap_or(DEFAULT_ANIMATION),
        );
    }
}

struct Points {
    color: Color32,
    stations: Vec<Station>,
}

pub struct SketchMap {
    projections: Vec<String>,
    controls: bool,
    interactions: Vec<Interaction>,
    view: SketchView,
    layers: Vec<Points>,
    listeners: Vec<(EventKind, Listener<SketchMap>)>,
    target: Option<Surface>,
}

impl SketchMap {
    pub fn add_points(&mut self, color: Color32, stations: Vec<Station>) {
        self.layers.push(Points { color, stations });
    }

    fn enabled(&self, interaction: Interaction) -> bool {
        self.interactions.contains(&interaction)
    }

    fn fire(&mut self, event: &MapEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (kind, listener) in &mut listeners {
            if *kind == event.kind {
                listener(&*self, event);
            }
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }

    fn stations(&self) -> impl Iterator<Item = (Color32, &Station)> {
        self.layers
            .iter()
            .flat_map(|points| points.stations.iter().map(|station| (points.color, station)))
    }
}

impl MapHandle for SketchMap {
    type Feature = Station;
    type View = SketchView;
    type Error = SketchError;

    fn set_view(&mut self, options: ViewOptions) -> Result<(), SketchError> {
        if !self.projections.iter().any(|known| known == options.projection) {
            return Err(SketchError::UnknownProjection(options.projection.to_owned()));
        }

        self.view = SketchView {
            center: options.center,
            zoom_range: options.zoom_range,
            projection: options.projection.to_owned(),
            size: self.view.size,
            ..Default::default()
        };
        Ok(())
    }

    fn view(&self) -> &SketchView {
        &self.view
    }

    fn view_mut(&mut self) -> &mut SketchView {
        &mut self.view
    }

    fn clear_layers(&mut self) {
        self.layers.clear();
    }

    fn set_target(&mut self, target: Option<Surface>) {
        if let Some(surface) = &target {
            self.view.size = surface.rect.size();
        }
        self.target = target;
    }

    fn on(&mut self, kind: EventKind, listener: Listener<Self>) {
        self.listeners.push((kind, listener));
    }

    fn features_at_pixel(&self, pixel: Pos2) -> Option<Vec<Station>> {
        let hit: Vec<Station> = self
            .stations()
            .filter(|(_, station)| self.view.to_pixel(station.position).distance(pixel) <= PICK_RADIUS)
            .map(|(_, station)| station.clone())
            .collect();

        (!hit.is_empty()).then_some(hit)
    }

    fn handle_input(&mut self, input: PointerInput) {
        match input {
            PointerInput::Click(pixel) => self.fire(&MapEvent::at(EventKind::SingleClick, pixel)),
            PointerInput::Move(pixel) => self.fire(&MapEvent::at(EventKind::PointerMove, pixel)),
            PointerInput::Drag(delta) if self.enabled(Interaction::DragPan) => {
                let view = &mut self.view;
                view.animation = None;
                view.center = view.center
                    + xy(
                        -delta.x as f64 * view.resolution,
                        delta.y as f64 * view.resolution,
                    );
            }
            PointerInput::DragEnd if self.enabled(Interaction::DragPan) => {
                self.fire(&MapEvent {
                    kind: EventKind::MoveEnd,
                    pixel: None,
                    dragging: true,
                });
            }
            PointerInput::Scroll { at, delta } if self.enabled(Interaction::WheelZoom) => {
                // Keep the position under the pointer in place.
                let view = &mut self.view;
                let anchor = view.from_pixel(at);
                let resolution = view.constrain(view.resolution * 2f64.powf(-delta as f64 / 100.));
                view.center = anchor + (view.center - anchor) * (resolution / view.resolution);
                view.resolution = resolution;
                view.animation = None;
                self.fire(&MapEvent::new(EventKind::MoveEnd));
            }
            PointerInput::Drag(_) | PointerInput::DragEnd | PointerInput::Scroll { .. } => {}
        }
    }

    fn render(&mut self, painter: &Painter) {
        let delta_time = painter.ctx().input(|input| input.stable_dt);
        if self.view.advance(delta_time) {
            self.fire(&MapEvent::new(EventKind::MoveEnd));
        }
        if self.view.animation.is_some() {
            painter.ctx().request_repaint();
        }

        let rect = painter.clip_rect();
        painter.rect_filled(rect, 0., Color32::from_rgb(242, 239, 233));

        let origin = rect.min.to_vec2();
        for (color, station) in self.stations() {
            let position = self.view.to_pixel(station.position) + origin;
            painter.circle(position, 6., color, Stroke::new(1.5, Color32::WHITE));
            painter.text(
                position + vec2(10., 0.),
                Align2::LEFT_CENTER,
                &station.name,
                FontId::proportional(13.),
                Color32::from_gray(40),
            );
        }

        if self.controls {
            painter.text(
                rect.left_bottom() + vec2(10., -10.),
                Align2::LEFT_BOTTOM,
                format!(
                    "zoom {:.1}, {:.1} m/px",
                    zoom_for(self.view.resolution),
                    self.view.resolution
                ),
                FontId::monospace(12.),
                Color32::from_gray(80),
            );
        }
    }

    fn dispose(&mut self) {
        log::debug!("Sketch map disposed.");
        self.layers.clear();
        self.listeners.clear();
        self.target = None;
    }
}

/// Stations drawn in a single color.
pub struct StationsLayer {
    name: String,
    color: Color32,
    stations: Vec<Station>,
}

impl StationsLayer {
    pub fn new(name: &str, color: Color32, stations: Vec<Station>) -> Self {
        Self {
            name: name.to_owned(),
            color,
            stations,
        }
    }
}

impl Layer<SketchMap> for StationsLayer {
    fn init(&self, map: &mut SketchMap) -> Result<(), SketchError> {
        map.add_points(self.color, self.stations.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
