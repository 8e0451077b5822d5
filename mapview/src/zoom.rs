#[derive(thiserror::Error, Debug, PartialEq)]
#[error("invalid zoom range {min}..={max}")]
pub struct InvalidZoomRange {
    pub min: f64,
    pub max: f64,
}

/// Zoom levels a view is allowed to reach.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ZoomRange {
    min: f64,
    max: f64,
}

/// Bounds given to every view created by [`crate::MapView`]. They do not follow the zoom, or
/// the fit options' `max_zoom`, passed by the caller.
pub const VIEW_ZOOM_RANGE: ZoomRange = ZoomRange {
    min: 16.,
    max: 22.,
};

impl ZoomRange {
    pub fn new(min: f64, max: f64) -> Result<Self, InvalidZoomRange> {
        if !min.is_finite() || !max.is_finite() || min > max {
            Err(InvalidZoomRange { min, max })
        } else {
            Ok(Self { min, max })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, zoom: f64) -> bool {
        (self.min..=self.max).contains(&zoom)
    }

    /// Bring `zoom` within the range.
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        VIEW_ZOOM_RANGE
    }
}
