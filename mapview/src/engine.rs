//! Contract between [`crate::MapView`] and the map engine doing the actual work: rendering,
//! projections, hit-testing and so on. Engine bindings implement these traits.

use egui::{Painter, Pos2, Vec2};

use crate::{AnimationOptions, Coordinate, Extent, FitOptions, Projection, Surface, ZoomRange};

/// Creates map instances and keeps track of known projections.
pub trait MapEngine {
    type Map: MapHandle;

    /// Single user interaction handler, e.g. drag-pan.
    type Interaction;

    /// Engine's own collection of interactions.
    type InteractionCollection;

    /// Make `projection` usable by views. Registering is global to the engine.
    fn register_projection(
        &mut self,
        projection: &Projection,
    ) -> Result<(), <Self::Map as MapHandle>::Error>;

    fn has_projection(&self, code: &str) -> bool;

    fn create_map(&self, options: MapOptions<Self>) -> Self::Map;
}

/// Parameters of [`MapEngine::create_map`].
pub struct MapOptions<E: MapEngine + ?Sized> {
    /// Whether the engine should add its built-in UI controls (zoom buttons, attribution...).
    pub controls: bool,
    pub interactions: Interactions<E>,
}

/// Interactions given to a newly created map.
pub enum Interactions<E: MapEngine + ?Sized> {
    /// Engine's standard set.
    Default,
    /// Exactly these handlers, in this order.
    List(Vec<E::Interaction>),
    /// Collection prepared by the engine itself.
    Native(E::InteractionCollection),
}

impl<E: MapEngine + ?Sized> Default for Interactions<E> {
    fn default() -> Self {
        Self::Default
    }
}

impl<E: MapEngine + ?Sized> std::fmt::Debug for Interactions<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::List(list) => write!(f, "List({})", list.len()),
            Self::Native(_) => f.write_str("Native"),
        }
    }
}

/// Camera of the map.
pub trait View {
    type Error;

    fn center(&self) -> Option<Coordinate>;
    fn zoom(&self) -> Option<f64>;
    fn resolution(&self) -> Option<f64>;
    fn projection(&self) -> &str;
    fn zoom_range(&self) -> ZoomRange;

    fn set_center(&mut self, center: Coordinate);
    fn set_zoom(&mut self, zoom: f64);
    fn set_resolution(&mut self, resolution: f64);

    /// Fit the view to `extent`. `None` means engine's default options.
    fn fit(&mut self, extent: Extent, options: Option<&FitOptions>) -> Result<(), Self::Error>;

    /// Start an animated transition.
    fn animate(&mut self, options: &AnimationOptions);
}

/// Parameters of a new [`View`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub center: Coordinate,
    pub zoom_range: ZoomRange,
    pub projection: &'static str,
}

/// Events raised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Click which is not a part of a double click.
    SingleClick,
    PointerMove,
    /// View stopped moving.
    MoveEnd,
}

/// Event raised by the engine, handed to listeners as is.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEvent {
    pub kind: EventKind,
    /// Position relative to the surface's top-left corner, if the event comes from a pointer.
    pub pixel: Option<Pos2>,
    pub dragging: bool,
}

impl MapEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            pixel: None,
            dragging: false,
        }
    }

    pub fn at(kind: EventKind, pixel: Pos2) -> Self {
        Self {
            kind,
            pixel: Some(pixel),
            dragging: false,
        }
    }
}

/// Raw pointer input fed to the engine, which turns it into [`MapEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Click(Pos2),
    Move(Pos2),
    Drag(Vec2),
    DragEnd,
    Scroll { at: Pos2, delta: f32 },
}

/// Listener registered with [`MapHandle::on`]. Receives the map which raised the event.
pub type Listener<M> = Box<dyn FnMut(&M, &MapEvent)>;

/// Engine's map instance.
pub trait MapHandle {
    type Feature: Clone + 'static;
    type View: View<Error = Self::Error>;
    type Error: std::error::Error + 'static;

    /// Replace the view. Fails if the engine does not know the projection.
    fn set_view(&mut self, options: ViewOptions) -> Result<(), Self::Error>;
    fn view(&self) -> &Self::View;
    fn view_mut(&mut self) -> &mut Self::View;

    /// Remove all layers. Adding them is up to the [`Layer`]s.
    fn clear_layers(&mut self);

    /// Bind to the surface the map is rendered into, or detach with `None`.
    fn set_target(&mut self, target: Option<Surface>);

    fn on(&mut self, kind: EventKind, listener: Listener<Self>)
    where
        Self: Sized;

    /// Features rendered at `pixel`. `None` if there is nothing.
    fn features_at_pixel(&self, pixel: Pos2) -> Option<Vec<Self::Feature>>;

    fn handle_input(&mut self, input: PointerInput);

    /// Paint the map. Called each frame with the painter clipped to the surface.
    fn render(&mut self, painter: &Painter);

    /// Release everything the map holds. Not called for maps injected into a
    /// [`crate::MapView`].
    fn dispose(&mut self) {}
}

/// Knows how to attach its data to a map.
pub trait Layer<M: MapHandle> {
    fn init(&self, map: &mut M) -> Result<(), M::Error>;

    /// Used for logging only.
    fn name(&self) -> &str {
        "unnamed"
    }
}
