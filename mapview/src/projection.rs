use crate::{Error, MapEngine, MapHandle};

/// Coordinate reference system known to the engine under `code`, defined by a proj4 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// EPSG-style identifier, e.g. `EPSG:21781`.
    pub code: &'static str,

    /// proj4 transformation string.
    pub definition: &'static str,
}

/// Swiss CH1903 / LV03. All views created by [`crate::MapView`] use it.
pub const SWISS_LV03: Projection = Projection {
    code: "EPSG:21781",
    definition: "+proj=somerc +lat_0=46.95240555555556 \
        +lon_0=7.439583333333333 +k_0=1 +x_0=600000 +y_0=200000 +ellps=bessel \
        +towgs84=674.4,15.1,405.3,0,0,0,0 +units=m +no_defs",
};

/// Projections the map views rely on.
pub const PROJECTIONS: &[Projection] = &[SWISS_LV03];

/// Make the engine aware of [`PROJECTIONS`]. Meant to be called once by the application,
/// before any [`crate::MapView`] is built, but calling it again is harmless. Returns `true` if
/// anything was registered.
pub fn register_projections<E: MapEngine>(
    engine: &mut E,
) -> Result<bool, Error<<E::Map as MapHandle>::Error>> {
    let mut registered = false;
    for projection in PROJECTIONS {
        if engine.has_projection(projection.code) {
            log::trace!("{} is already registered.", projection.code);
            continue;
        }

        log::debug!("Registering {}.", projection.code);
        engine
            .register_projection(projection)
            .map_err(|source| Error::Projection {
                code: projection.code,
                source,
            })?;
        registered = true;
    }
    Ok(registered)
}
