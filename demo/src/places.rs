//! Few railway stations of the Swiss network, in LV03 coordinates, used in the example app.

use mapview::{Coordinate, xy};

/// Bern, also the origin of the LV03 grid is nearby.
pub fn bern() -> Coordinate {
    xy(600_020., 199_830.)
}

pub fn olten() -> Coordinate {
    xy(635_260., 244_600.)
}

pub fn zurich_hb() -> Coordinate {
    xy(683_180., 248_060.)
}

pub fn basel_sbb() -> Coordinate {
    xy(611_320., 266_560.)
}

pub fn luzern() -> Coordinate {
    xy(666_170., 211_260.)
}

pub fn lausanne() -> Coordinate {
    xy(537_860., 152_220.)
}

pub fn all() -> [(&'static str, Coordinate); 6] {
    [
        ("Bern", bern()),
        ("Olten", olten()),
        ("Zürich HB", zurich_hb()),
        ("Basel SBB", basel_sbb()),
        ("Luzern", luzern()),
        ("Lausanne", lausanne()),
    ]
}
