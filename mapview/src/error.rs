use crate::Extent;

/// Failure while driving the engine. Engine errors are kept intact as the source.
#[derive(thiserror::Error, Debug)]
pub enum Error<E: std::error::Error + 'static> {
    #[error("engine could not register projection {code}")]
    Projection {
        code: &'static str,
        #[source]
        source: E,
    },

    #[error("engine could not create the view")]
    View(#[source] E),

    #[error("engine could not fit the view to {extent:?}")]
    Fit {
        extent: Extent,
        #[source]
        source: E,
    },

    /// Layers before `index` stay attached, the rest were not initialized.
    #[error("layer #{index} ({name}) failed to initialize")]
    Layer {
        index: usize,
        name: String,
        #[source]
        source: E,
    },

    /// Map handle is already borrowed, most likely by the engine dispatching an event.
    #[error("map handle is busy")]
    HandleBusy,
}

impl<E: std::error::Error + 'static> Error<E> {
    /// The engine's own error, if this is one.
    pub fn engine_error(&self) -> Option<&E> {
        match self {
            Error::Projection { source, .. }
            | Error::View(source)
            | Error::Fit { source, .. }
            | Error::Layer { source, .. } => Some(source),
            Error::HandleBusy => None,
        }
    }
}
