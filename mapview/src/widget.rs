use egui::{Rect, Response, Sense, Ui, Vec2, Widget};

use crate::{MapHandle, MapView, PointerInput};

/// Shows the map in the remaining space of the `ui`, mounting it on first use.
///
/// The surface reacts to clicks and drags and takes focus when clicked, but it is not
/// focusable with the tab key.
impl<M: MapHandle> Widget for &mut MapView<M> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::CLICK | Sense::DRAG);

        if response.clicked() {
            response.request_focus();
        }

        let surface = self.surface(response.id, rect);
        if self.bound_surface() != Some(&surface) {
            if let Err(err) = self.mount(surface) {
                log::warn!("Could not mount the map: {err}.");
                return response;
            }
        }

        let Ok(mut map) = self.handle_ref().try_borrow_mut() else {
            log::warn!("Map is busy, skipping the frame.");
            return response;
        };

        for input in pointer_input(ui, &response, rect) {
            map.handle_input(input);
        }

        map.render(&ui.painter().with_clip_rect(rect));

        response
    }
}

/// Translate egui's input into what the engine understands. Positions are relative to the
/// top-left corner of `rect`.
fn pointer_input(ui: &Ui, response: &Response, rect: Rect) -> Vec<PointerInput> {
    let mut input = Vec::new();

    if response.dragged() {
        input.push(PointerInput::Drag(response.drag_delta()));
    }

    if response.drag_stopped() {
        input.push(PointerInput::DragEnd);
    }

    if let Some(position) = response.hover_pos() {
        let pixel = position - rect.min.to_vec2();

        if response.clicked() {
            input.push(PointerInput::Click(pixel));
        }

        if ui.input(|input| input.pointer.delta()) != Vec2::ZERO {
            input.push(PointerInput::Move(pixel));
        }

        let scroll = ui.input(|input| input.smooth_scroll_delta.y);
        if scroll != 0.0 {
            input.push(PointerInput::Scroll {
                at: pixel,
                delta: scroll,
            });
        }
    }

    input
}
