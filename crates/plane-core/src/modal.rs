use crate::registry::{PlaneId, Transform};
use crate::transition::TransitionHandle;
use std::time::Duration;

/// Which plane, if any, is detached from layout sync and animated toward
/// the modal rectangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModalState {
    pub owner: Option<PlaneId>,
    /// Owner transform captured when the modal opened.
    pub home: Transform,
    pub opening: Option<TransitionHandle>,
    pub closing: Option<TransitionHandle>,
    pub since_poll: Duration,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_closing(&self) -> bool {
        self.closing.is_some()
    }

    pub fn owns(&self, plane: PlaneId) -> bool {
        self.owner == Some(plane)
    }

    pub fn open(&mut self, owner: PlaneId, home: Transform, handle: TransitionHandle) {
        *self = Self {
            owner: Some(owner),
            home,
            opening: Some(handle),
            closing: None,
            since_poll: Duration::ZERO,
        };
    }

    pub fn release(&mut self) -> Option<PlaneId> {
        let owner = self.owner.take();
        *self = Self::default();
        owner
    }
}
