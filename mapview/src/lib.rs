#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

mod engine;
mod error;
mod map;
mod options;
mod position;
mod projection;
mod reconcile;
mod surface;
mod view_state;
mod widget;
mod zoom;

pub use engine::{
    EventKind, Interactions, Layer, Listener, MapEngine, MapEvent, MapHandle, MapOptions,
    PointerInput, View, ViewOptions,
};
pub use error::Error;
pub use map::{FeaturesCallback, MapView, MapViewBuilder, MoveCallback, Ownership};
pub use options::{AnimationOptions, FitOptions, LayerList, MapProps, layers};
pub use position::{Coordinate, Extent, extent, extent_bounds, xy};
pub use projection::{PROJECTIONS, Projection, SWISS_LV03, register_projections};
pub use reconcile::{PIPELINE, Reconciliation, Step};
pub use surface::{SURFACE_TAB_INDEX, Surface};
pub use view_state::ViewState;
pub use zoom::{InvalidZoomRange, VIEW_ZOOM_RANGE, ZoomRange};
