//! Properties driving the [`crate::MapView`].

use std::{rc::Rc, time::Duration};

use crate::{Coordinate, Extent, Layer, MapHandle, position::xy};

/// How the view is fitted to [`MapProps::extent`] when it changes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FitOptions {
    /// Length of the fitting animation.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub duration: Duration,

    /// Pixels kept free around the extent, as `[top, right, bottom, left]`.
    pub padding: [f32; 4],

    /// Fitting never zooms in further than this.
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            padding: [20., 20., 20., 20.],
            max_zoom: 23.,
        }
    }
}

/// Target of an animated view transition. Fields left as `None` are not animated. Easing and
/// the default duration are up to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationOptions {
    pub center: Option<Coordinate>,
    pub resolution: Option<f64>,
    pub zoom: Option<f64>,
    #[cfg_attr(feature = "serde", serde(with = "millis::option"))]
    pub duration: Option<Duration>,
}

/// Ordered layers, first one at the bottom. Compared by identity, so cloning the list keeps
/// it "unchanged", while building a new one (even with the same layers) replaces all of them.
pub type LayerList<M> = Rc<[Rc<dyn Layer<M>>]>;

/// Build a [`LayerList`].
pub fn layers<M: MapHandle>(layers: impl IntoIterator<Item = Rc<dyn Layer<M>>>) -> LayerList<M> {
    layers.into_iter().collect()
}

/// Whether the two lists should be treated as the same one. Empty lists are all the same list.
pub(crate) fn same_layers<M: MapHandle>(a: &LayerList<M>, b: &LayerList<M>) -> bool {
    Rc::ptr_eq(a, b) || (a.is_empty() && b.is_empty())
}

/// Declared state of the map. Pass a new revision to [`crate::MapView::update`] and the
/// engine will be brought in line with it.
pub struct MapProps<M: MapHandle> {
    pub center: Coordinate,
    pub zoom: Option<f64>,
    pub resolution: Option<f64>,
    pub extent: Option<Extent>,
    pub fit_options: FitOptions,
    pub layers: LayerList<M>,
    pub animation: Option<Rc<AnimationOptions>>,
    /// Style class of the rendering surface.
    pub class_name: String,
}

impl<M: MapHandle> Default for MapProps<M> {
    fn default() -> Self {
        Self {
            center: xy(0., 0.),
            zoom: Some(19.),
            resolution: None,
            extent: None,
            fit_options: FitOptions::default(),
            layers: layers([]),
            animation: None,
            class_name: "tm-map".to_owned(),
        }
    }
}

// Derived `Clone` would require `M: Clone`.
impl<M: MapHandle> Clone for MapProps<M> {
    fn clone(&self) -> Self {
        Self {
            center: self.center,
            zoom: self.zoom,
            resolution: self.resolution,
            extent: self.extent,
            fit_options: self.fit_options.clone(),
            layers: Rc::clone(&self.layers),
            animation: self.animation.clone(),
            class_name: self.class_name.clone(),
        }
    }
}

impl<M: MapHandle> std::fmt::Debug for MapProps<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapProps")
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("resolution", &self.resolution)
            .field("extent", &self.extent)
            .field("fit_options", &self.fit_options)
            .field("layers", &self.layers.len())
            .field("animation", &self.animation)
            .field("class_name", &self.class_name)
            .finish()
    }
}

impl<M: MapHandle> MapProps<M> {
    pub fn with_center(mut self, center: Coordinate) -> Self {
        self.center = center;
        self
    }

    /// Set the zoom level, `None` leaves it to resolution or the engine.
    pub fn with_zoom(mut self, zoom: impl Into<Option<f64>>) -> Self {
        self.zoom = zoom.into();
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<Option<f64>>) -> Self {
        self.resolution = resolution.into();
        self
    }

    pub fn with_extent(mut self, extent: impl Into<Option<Extent>>) -> Self {
        self.extent = extent.into();
        self
    }

    pub fn with_fit_options(mut self, fit_options: FitOptions) -> Self {
        self.fit_options = fit_options;
        self
    }

    pub fn with_layers(mut self, layers: LayerList<M>) -> Self {
        self.layers = layers;
        self
    }

    /// Request an animated transition. Each call starts a new one, even with equal options.
    pub fn with_animation(mut self, animation: AnimationOptions) -> Self {
        self.animation = Some(Rc::new(animation));
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

#[cfg(feature = "serde")]
mod millis {
    use serde::{Deserialize as _, Deserializer, Serializer};
    use std::time::Duration;

    /// Durations too long for `u64` milliseconds are refused rather than truncated.
    fn to_millis<E: serde::ser::Error>(duration: &Duration) -> Result<u64, E> {
        u64::try_from(duration.as_millis()).map_err(E::custom)
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(to_millis::<S::Error>(duration)?)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod option {
        use serde::{Deserialize as _, Deserializer, Serializer};
        use std::time::Duration;

        use super::to_millis;

        pub fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match duration {
                Some(duration) => serializer.serialize_some(&to_millis::<S::Error>(duration)?),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(deserializer).map(|millis| millis.map(Duration::from_millis))
        }
    }
}
