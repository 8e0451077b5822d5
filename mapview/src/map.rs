use std::{
    cell::{RefCell, RefMut},
    rc::Rc,
};

use crate::{
    Error, EventKind, Interactions, MapEngine, MapEvent, MapHandle, MapOptions, MapProps,
    SWISS_LV03, Surface, VIEW_ZOOM_RANGE, View as _, ViewOptions, ViewState,
    reconcile::{Reconciliation, reconcile, replace_layers},
};

/// Called with the features found under the pointer. The list is empty if there are none.
pub type FeaturesCallback<F> = Box<dyn FnMut(&[F])>;

/// Called with the engine's event once the view stops moving.
pub type MoveCallback = Box<dyn FnMut(&MapEvent)>;

/// Who is responsible for the map handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Created by the [`MapView`], disposed together with it.
    Owned,
    /// Given by the caller, never disposed by the [`MapView`].
    Injected,
}

/// Declarative view of an engine's map. It owns (or shares) a single map handle and keeps it
/// in line with [`MapProps`] passed to [`MapView::update`].
///
/// # Examples
///
/// ```ignore
/// let mut map_view = MapView::builder(MapProps::default().with_zoom(18.))
///     .on_features_click(|features| println!("{} features clicked", features.len()))
///     .build(&engine)?;
///
/// // Later, when something changes.
/// map_view.update(map_view.props().clone().with_center(xy(600_000., 200_000.)))?;
/// ```
pub struct MapView<M: MapHandle> {
    handle: Rc<RefCell<M>>,
    ownership: Ownership,
    props: MapProps<M>,

    /// Taken when mounting, to be owned by the engine's listeners.
    on_features_click: Option<FeaturesCallback<M::Feature>>,
    on_features_hover: Option<FeaturesCallback<M::Feature>>,

    mounted: bool,
    surface: Option<Surface>,
}

/// Collects everything needed to build a [`MapView`].
pub struct MapViewBuilder<E: MapEngine> {
    props: MapProps<E::Map>,
    map: Option<Rc<RefCell<E::Map>>>,
    interactions: Interactions<E>,
    on_features_click: FeaturesCallback<<E::Map as MapHandle>::Feature>,
    on_features_hover: Option<FeaturesCallback<<E::Map as MapHandle>::Feature>>,
    on_map_moved: MoveCallback,
}

impl<M: MapHandle> MapView<M> {
    pub fn builder<E: MapEngine<Map = M>>(props: MapProps<M>) -> MapViewBuilder<E> {
        MapViewBuilder::new(props)
    }
}

impl<E: MapEngine> MapViewBuilder<E> {
    pub fn new(props: MapProps<E::Map>) -> Self {
        Self {
            props,
            map: None,
            interactions: Interactions::Default,
            on_features_click: Box::new(|_| {}),
            on_features_hover: None,
            on_map_moved: Box::new(|_| {}),
        }
    }

    /// Use an existing map instead of creating one. It will not be disposed by the
    /// [`MapView`], and interactions passed to [`Self::with_interactions`] are ignored.
    pub fn with_map(mut self, map: Rc<RefCell<E::Map>>) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_interactions(mut self, interactions: Interactions<E>) -> Self {
        self.interactions = interactions;
        self
    }

    pub fn on_features_click(
        mut self,
        callback: impl FnMut(&[<E::Map as MapHandle>::Feature]) + 'static,
    ) -> Self {
        self.on_features_click = Box::new(callback);
        self
    }

    /// Hit-testing on every pointer move is not free, so it happens only if this callback
    /// is given.
    pub fn on_features_hover(
        mut self,
        callback: impl FnMut(&[<E::Map as MapHandle>::Feature]) + 'static,
    ) -> Self {
        self.on_features_hover = Some(Box::new(callback));
        self
    }

    pub fn on_map_moved(mut self, callback: impl FnMut(&MapEvent) + 'static) -> Self {
        self.on_map_moved = Box::new(callback);
        self
    }

    /// Create (or take) the map handle and bring it to the initial state. Errors from the
    /// engine are returned as they are. A map created here is disposed before returning the
    /// error, an injected one is left in whatever state the engine left it.
    pub fn build(self, engine: &E) -> Result<MapView<E::Map>, Error<<E::Map as MapHandle>::Error>> {
        let Self {
            props,
            map,
            interactions,
            on_features_click,
            on_features_hover,
            mut on_map_moved,
        } = self;

        let (handle, ownership) = match map {
            Some(map) => (map, Ownership::Injected),
            None => {
                log::debug!("Creating a map with {interactions:?} interactions.");
                let map = engine.create_map(MapOptions {
                    controls: false,
                    interactions,
                });
                (Rc::new(RefCell::new(map)), Ownership::Owned)
            }
        };

        {
            let mut map = borrow_mut(&handle)?;
            if let Err(err) = initialize(&mut *map, &props) {
                if ownership == Ownership::Owned {
                    log::debug!("Disposing the map which failed to initialize.");
                    map.dispose();
                }
                return Err(err);
            }
            map.on(
                EventKind::MoveEnd,
                Box::new(move |_, event| on_map_moved(event)),
            );
        }

        Ok(MapView {
            handle,
            ownership,
            props,
            on_features_click: Some(on_features_click),
            on_features_hover,
            mounted: false,
            surface: None,
        })
    }
}

/// Initial synchronization. Unlike [`reconcile`], there is nothing to compare with.
fn initialize<M: MapHandle>(map: &mut M, props: &MapProps<M>) -> Result<(), Error<M::Error>> {
    map.set_view(ViewOptions {
        center: props.center,
        zoom_range: VIEW_ZOOM_RANGE,
        projection: SWISS_LV03.code,
    })
    .map_err(Error::View)?;

    if let Some(zoom) = props.zoom {
        map.view_mut().set_zoom(zoom);
    } else if let Some(resolution) = props.resolution {
        map.view_mut().set_resolution(resolution);
    }

    if !props.layers.is_empty() {
        replace_layers(map, &props.layers)?;
    }

    if let Some(extent) = props.extent {
        // Fit options are only for extents changed later on.
        map.view_mut()
            .fit(extent, None)
            .map_err(|source| Error::Fit { extent, source })?;
    }

    Ok(())
}

fn borrow_mut<M: MapHandle>(handle: &RefCell<M>) -> Result<RefMut<'_, M>, Error<M::Error>> {
    handle.try_borrow_mut().map_err(|err| {
        log::warn!("Cannot access the map: {err}.");
        Error::HandleBusy
    })
}

fn features_at<M: MapHandle>(map: &M, event: &MapEvent) -> Vec<M::Feature> {
    event
        .pixel
        .and_then(|pixel| map.features_at_pixel(pixel))
        .unwrap_or_default()
}

impl<M: MapHandle> MapView<M> {
    /// Bind the map to the surface it is rendered into, and start listening for clicks (and
    /// pointer moves, if there is a hover callback). Mounting again only rebinds the target.
    pub fn mount(&mut self, surface: Surface) -> Result<(), Error<M::Error>> {
        let handle = Rc::clone(&self.handle);
        let mut map = borrow_mut(&handle)?;

        log::debug!("Binding the map to {:?}.", surface.rect);
        map.set_target(Some(surface.clone()));
        self.surface = Some(surface);

        if self.mounted {
            return Ok(());
        }
        self.mounted = true;

        if let Some(mut on_features_click) = self.on_features_click.take() {
            map.on(
                EventKind::SingleClick,
                Box::new(move |map, event| on_features_click(&features_at(map, event))),
            );
        }

        if let Some(mut on_features_hover) = self.on_features_hover.take() {
            map.on(
                EventKind::PointerMove,
                Box::new(move |map, event| on_features_hover(&features_at(map, event))),
            );
        }

        Ok(())
    }

    /// Bring the engine in line with `props`. Only what changed since the previous revision is
    /// touched, see [`crate::PIPELINE`]. The new revision becomes current even if the engine
    /// fails half-way.
    pub fn update(&mut self, props: MapProps<M>) -> Result<Reconciliation, Error<M::Error>> {
        let handle = Rc::clone(&self.handle);
        let mut map = borrow_mut(&handle)?;

        let previous = std::mem::replace(&mut self.props, props);
        reconcile(&previous, &self.props, &mut map)
    }

    /// Current revision of the properties.
    pub fn props(&self) -> &MapProps<M> {
        &self.props
    }

    /// The engine's map. Meant for debugging or for reaching engine features this crate does
    /// not cover.
    pub fn handle(&self) -> Rc<RefCell<M>> {
        Rc::clone(&self.handle)
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Whether the handle will be disposed together with this view.
    pub fn owns_handle(&self) -> bool {
        self.ownership == Ownership::Owned
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Surface the map is currently bound to.
    pub fn bound_surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Describe a surface occupying `rect`, styled by [`MapProps::class_name`].
    pub fn surface(&self, id: egui::Id, rect: egui::Rect) -> Surface {
        Surface::new(id, rect, self.props.class_name.as_str())
    }

    pub fn view_state(&self) -> Result<ViewState, Error<M::Error>> {
        let map = self.handle.try_borrow().map_err(|err| {
            log::warn!("Cannot access the map: {err}.");
            Error::HandleBusy
        })?;
        Ok(ViewState::of(map.view()))
    }

    pub(crate) fn handle_ref(&self) -> &RefCell<M> {
        &self.handle
    }
}

impl<M: MapHandle> Drop for MapView<M> {
    fn drop(&mut self) {
        if self.ownership == Ownership::Injected {
            return;
        }

        match self.handle.try_borrow_mut() {
            Ok(mut map) => {
                log::debug!("Disposing the map.");
                map.set_target(None);
                map.dispose();
            }
            Err(err) => log::warn!("Map could not be disposed: {err}."),
        }
    }
}
