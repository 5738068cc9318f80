use super::frame::InputFrame;
use super::types::InputEvent;

/// Input state that outlives a frame.
///
/// The pointer position is tracked so button events can be stamped with it;
/// winit reports presses without coordinates.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels. `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    /// Folds `ev` into the state and queues it on `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => self.focused = *f,
            InputEvent::PointerMoved { x, y } | InputEvent::PointerButton { x, y, .. } => {
                self.pointer_pos = Some((*x, *y));
            }
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Key { .. } => {}
        }
        frame.push_event(ev);
    }
}
