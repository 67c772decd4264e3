//! Selection state: the single entity being manipulated, plus its advisory
//! collision flag.

use shared::ObjectId;

#[derive(Default)]
pub struct SelectionState {
    selected: Option<ObjectId>,
    /// Advisory flag refreshed by collision checks; never blocks manipulation
    pub colliding: bool,
}

impl SelectionState {
    pub fn select(&mut self, id: ObjectId) {
        self.selected = Some(id);
        self.colliding = false;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.colliding = false;
    }

    pub fn current(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }
}
