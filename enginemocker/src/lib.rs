//! Map engine which does nothing but remembering what it was asked to do. Used to test
//! `mapview` without a real engine.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use egui::{Painter, Pos2, Rect};
use mapview::{
    AnimationOptions, Coordinate, EventKind, Extent, FitOptions, Interactions, Layer, Listener,
    MapEngine, MapEvent, MapHandle, MapOptions, PointerInput, Projection, Surface, View,
    ViewOptions, ZoomRange,
};

/// Everything the engine was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RegisterProjection(&'static str),
    CreateMap {
        controls: bool,
        interactions: Vec<String>,
    },
    SetView(ViewOptions),
    SetCenter(Coordinate),
    SetZoom(f64),
    SetResolution(f64),
    Fit(Extent, Option<FitOptions>),
    Animate(AnimationOptions),
    ClearLayers,
    InitLayer(String),
    SetTarget(Option<Rect>),
    On(EventKind),
    Dispose,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("unknown projection {0}")]
    UnknownProjection(String),

    #[error("cannot fit empty extent")]
    EmptyExtent,

    #[error("layer {0} is broken")]
    BrokenLayer(String),

    #[error("projection {0} was refused")]
    RefusedProjection(String),
}

type Calls = Rc<RefCell<Vec<Call>>>;

fn record(calls: &Calls, call: Call) {
    log::debug!("Recording {call:?}.");
    calls.borrow_mut().push(call);
}

#[derive(Default)]
pub struct MockEngine {
    projections: Vec<String>,
    calls: Calls,
    refuse_projections: bool,
    disposals: Rc<Cell<usize>>,
}

impl MockEngine {
    /// Engine which already knows about `mapview`'s projections.
    pub fn with_projections() -> Self {
        Self {
            projections: mapview::PROJECTIONS
                .iter()
                .map(|projection| projection.code.to_owned())
                .collect(),
            ..Default::default()
        }
    }

    /// Engine failing to register any projection.
    pub fn refusing_projections() -> Self {
        Self {
            refuse_projections: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// How many maps created by this engine were disposed.
    pub fn disposed_maps(&self) -> usize {
        self.disposals.get()
    }

    /// Map not created by a `MapView`, as if the application made it itself.
    pub fn external_map(&self) -> Rc<RefCell<MockMap>> {
        Rc::new(RefCell::new(self.create_map(MapOptions {
            controls: true,
            interactions: Interactions::Default,
        })))
    }
}

impl MapEngine for MockEngine {
    type Map = MockMap;
    type Interaction = String;
    type InteractionCollection = Vec<String>;

    fn register_projection(&mut self, projection: &Projection) -> Result<(), MockError> {
        record(&self.calls, Call::RegisterProjection(projection.code));
        if self.refuse_projections {
            return Err(MockError::RefusedProjection(projection.code.to_owned()));
        }
        self.projections.push(projection.code.to_owned());
        Ok(())
    }

    fn has_projection(&self, code: &str) -> bool {
        self.projections.iter().any(|known| known == code)
    }

    fn create_map(&self, options: MapOptions<Self>) -> MockMap {
        let interactions = match options.interactions {
            Interactions::Default => vec!["default".to_owned()],
            Interactions::List(list) => list,
            Interactions::Native(collection) => collection,
        };

        let map = MockMap::new(self.projections.clone());
        record(
            &map.calls,
            Call::CreateMap {
                controls: options.controls,
                interactions: interactions.clone(),
            },
        );

        MockMap {
            interactions,
            disposals: Rc::clone(&self.disposals),
            ..map
        }
    }
}

pub struct MockView {
    calls: Calls,
    center: Option<Coordinate>,
    zoom: Option<f64>,
    resolution: Option<f64>,
    projection: String,
    zoom_range: ZoomRange,
    animations: Vec<AnimationOptions>,
}

impl MockView {
    fn new(calls: Calls) -> Self {
        Self {
            calls,
            center: None,
            zoom: None,
            resolution: None,
            projection: "EPSG:3857".to_owned(),
            zoom_range: ZoomRange::default(),
            animations: Vec::new(),
        }
    }

    /// Change the resolution like the engine would on its own, e.g. when the user zooms.
    /// Not recorded.
    pub fn drift_resolution(&mut self, resolution: f64) {
        self.resolution = Some(resolution);
    }

    pub fn animations(&self) -> &[AnimationOptions] {
        &self.animations
    }
}

impl View for MockView {
    type Error = MockError;

    fn center(&self) -> Option<Coordinate> {
        self.center
    }

    fn zoom(&self) -> Option<f64> {
        self.zoom
    }

    fn resolution(&self) -> Option<f64> {
        self.resolution
    }

    fn projection(&self) -> &str {
        &self.projection
    }

    fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    fn set_center(&mut self, center: Coordinate) {
        record(&self.calls, Call::SetCenter(center));
        self.center = Some(center);
    }

    fn set_zoom(&mut self, zoom: f64) {
        record(&self.calls, Call::SetZoom(zoom));
        self.zoom = Some(zoom);
    }

    fn set_resolution(&mut self, resolution: f64) {
        record(&self.calls, Call::SetResolution(resolution));
        self.resolution = Some(resolution);
    }

    fn fit(&mut self, extent: Extent, options: Option<&FitOptions>) -> Result<(), MockError> {
        record(&self.calls, Call::Fit(extent, options.cloned()));
        if extent.width() == 0. || extent.height() == 0. {
            return Err(MockError::EmptyExtent);
        }
        self.center = Some(extent.center());
        Ok(())
    }

    fn animate(&mut self, options: &AnimationOptions) {
        record(&self.calls, Call::Animate(options.clone()));
        self.animations.push(options.clone());
    }
}

pub struct MockMap {
    calls: Calls,
    projections: Vec<String>,
    interactions: Vec<String>,
    view: MockView,
    layers: Vec<String>,
    listeners: Vec<(EventKind, Listener<MockMap>)>,
    features: Vec<String>,
    target: Option<Surface>,
    inputs: Vec<PointerInput>,
    disposed: bool,
    disposals: Rc<Cell<usize>>,
}

impl MockMap {
    pub fn new(projections: Vec<String>) -> Self {
        let calls = Calls::default();
        Self {
            view: MockView::new(Rc::clone(&calls)),
            calls,
            projections,
            interactions: Vec::new(),
            layers: Vec::new(),
            listeners: Vec::new(),
            features: Vec::new(),
            target: None,
            inputs: Vec::new(),
            disposed: false,
            disposals: Rc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Forget calls made so far.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Names of attached layers, bottom first.
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Used by [`MockLayer`].
    pub fn add_layer(&mut self, name: &str) {
        self.layers.push(name.to_owned());
    }

    pub fn interactions(&self) -> &[String] {
        &self.interactions
    }

    /// Features found at any pixel.
    pub fn set_features(&mut self, features: Vec<String>) {
        self.features = features;
    }

    pub fn target(&self) -> Option<&Surface> {
        self.target.as_ref()
    }

    pub fn inputs(&self) -> &[PointerInput] {
        &self.inputs
    }

    pub fn listens_to(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(listened, _)| *listened == kind)
    }

    pub fn disposed(&self) -> bool {
        self.disposed
    }

    pub fn mock_view_mut(&mut self) -> &mut MockView {
        &mut self.view
    }

    /// Raise `event`, calling listeners registered for its kind.
    pub fn fire(&mut self, event: &MapEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (kind, listener) in &mut listeners {
            if *kind == event.kind {
                listener(&*self, event);
            }
        }
        // Keep the ones registered in the meantime.
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

impl MapHandle for MockMap {
    type Feature = String;
    type View = MockView;
    type Error = MockError;

    fn set_view(&mut self, options: ViewOptions) -> Result<(), MockError> {
        record(&self.calls, Call::SetView(options.clone()));
        if !self.projections.iter().any(|known| known == options.projection) {
            return Err(MockError::UnknownProjection(options.projection.to_owned()));
        }

        let mut view = MockView::new(Rc::clone(&self.calls));
        view.center = Some(options.center);
        view.projection = options.projection.to_owned();
        view.zoom_range = options.zoom_range;
        self.view = view;
        Ok(())
    }

    fn view(&self) -> &MockView {
        &self.view
    }

    fn view_mut(&mut self) -> &mut MockView {
        &mut self.view
    }

    fn clear_layers(&mut self) {
        record(&self.calls, Call::ClearLayers);
        self.layers.clear();
    }

    fn set_target(&mut self, target: Option<Surface>) {
        record(
            &self.calls,
            Call::SetTarget(target.as_ref().map(|surface| surface.rect)),
        );
        self.target = target;
    }

    fn on(&mut self, kind: EventKind, listener: Listener<Self>) {
        record(&self.calls, Call::On(kind));
        self.listeners.push((kind, listener));
    }

    fn features_at_pixel(&self, _pixel: Pos2) -> Option<Vec<String>> {
        (!self.features.is_empty()).then(|| self.features.clone())
    }

    fn handle_input(&mut self, input: PointerInput) {
        self.inputs.push(input);
        match input {
            PointerInput::Click(pixel) => self.fire(&MapEvent::at(EventKind::SingleClick, pixel)),
            PointerInput::Move(pixel) => self.fire(&MapEvent::at(EventKind::PointerMove, pixel)),
            PointerInput::DragEnd => self.fire(&MapEvent::new(EventKind::MoveEnd)),
            PointerInput::Drag(_) | PointerInput::Scroll { .. } => {}
        }
    }

    fn render(&mut self, _painter: &Painter) {}

    fn dispose(&mut self) {
        record(&self.calls, Call::Dispose);
        self.disposed = true;
        self.disposals.set(self.disposals.get() + 1);
    }
}

/// Layer attaching nothing but its name. A broken one fails to initialize.
pub struct MockLayer {
    name: String,
    broken: bool,
}

impl MockLayer {
    pub fn new(name: &str) -> Rc<dyn Layer<MockMap>> {
        Rc::new(Self {
            name: name.to_owned(),
            broken: false,
        })
    }

    pub fn broken(name: &str) -> Rc<dyn Layer<MockMap>> {
        Rc::new(Self {
            name: name.to_owned(),
            broken: true,
        })
    }
}

impl Layer<MockMap> for MockLayer {
    fn init(&self, map: &mut MockMap) -> Result<(), MockError> {
        record(&map.calls, Call::InitLayer(self.name.clone()));
        if self.broken {
            return Err(MockError::BrokenLayer(self.name.clone()));
        }
        map.add_layer(&self.name);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
