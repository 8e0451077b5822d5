use crate::{Coordinate, View};

/// Snapshot of the engine's view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ViewState {
    pub center: Option<Coordinate>,
    pub zoom: Option<f64>,
    pub resolution: Option<f64>,
    pub projection: String,
}

impl ViewState {
    pub fn of(view: &impl View) -> Self {
        Self {
            center: view.center(),
            zoom: view.zoom(),
            resolution: view.resolution(),
            projection: view.projection().to_owned(),
        }
    }
}
