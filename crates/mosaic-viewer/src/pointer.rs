use mosaic_core::{SceneEvent, ShapeId};

/// Turns "shape under the pointer" samples into hover enter/exit events.
///
/// When the topmost shape changes, the exit for the old shape is always
/// emitted before the enter for the new one, so the highlight follows the
/// shape the pointer is actually over.
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<ShapeId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ShapeId> {
        self.current.as_ref()
    }

    /// Records the shape now under the pointer (`None` for background).
    pub fn update(&mut self, hit: Option<ShapeId>) -> Vec<SceneEvent> {
        if hit == self.current {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(old) = self.current.take() {
            events.push(SceneEvent::HoverExit(old));
        }
        if let Some(new) = hit {
            events.push(SceneEvent::HoverEnter(new.clone()));
            self.current = Some(new);
        }
        events
    }

    /// Pointer left the window.
    pub fn leave(&mut self) -> Vec<SceneEvent> {
        self.update(None)
    }
}
