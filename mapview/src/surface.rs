use egui::{Id, Rect};

/// Tab index of the surface. Negative means it can be focused from code or by clicking, but
/// tabbing skips it.
pub const SURFACE_TAB_INDEX: i32 = -1;

/// Area of the UI the engine renders into.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub id: Id,
    pub rect: Rect,
    /// Style class, [`crate::MapProps::class_name`].
    pub class_name: String,
    pub tab_index: i32,
}

impl Surface {
    pub fn new(id: Id, rect: Rect, class_name: impl Into<String>) -> Self {
        Self {
            id,
            rect,
            class_name: class_name.into(),
            tab_index: SURFACE_TAB_INDEX,
        }
    }

    /// Reachable with the tab key.
    pub fn tabbable(&self) -> bool {
        self.tab_index >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Vec2};

    #[test]
    fn surface_is_not_tabbable() {
        let surface = Surface::new(
            Id::new("map"),
            Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.)),
            "tm-map",
        );
        assert_eq!(-1, surface.tab_index);
        assert!(!surface.tabbable());
    }
}
