//! Enabled-state bridge
//!
//! Property holders do not own their loader. Once a loader is attached the
//! holder's `enabled` flag reads through a [`StateBridge`], and writes turn
//! into requests the loader drains on its next frame or `sync`.

use std::cell::Cell;
use std::rc::Rc;

/// Read/write access to a loader's enabled flag
pub trait StateBridge {
    fn enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

/// The bridge a loader hands to its properties
///
/// `enabled` reports the pending request if there is one, otherwise the
/// loader's committed state.
#[derive(Debug, Default)]
pub struct EnabledSignal {
    current: Cell<bool>,
    requested: Cell<Option<bool>>,
}

impl EnabledSignal {
    pub fn new(initial: bool) -> Rc<Self> {
        Rc::new(Self {
            current: Cell::new(initial),
            requested: Cell::new(None),
        })
    }

    /// Committed state, ignoring any pending request
    pub fn current(&self) -> bool {
        self.current.get()
    }

    pub fn has_request(&self) -> bool {
        self.requested.get().is_some()
    }

    /// Commit and return the pending request
    pub fn take_request(&self) -> Option<bool> {
        let request = self.requested.take()?;
        self.current.set(request);
        Some(request)
    }

    /// Record the state the loader actually reached
    pub fn commit(&self, enabled: bool) {
        self.current.set(enabled);
        self.requested.set(None);
    }
}

impl StateBridge for EnabledSignal {
    fn enabled(&self) -> bool {
        self.requested.get().unwrap_or(self.current.get())
    }

    fn set_enabled(&self, enabled: bool) {
        if enabled == self.current.get() {
            self.requested.set(None);
        } else {
            self.requested.set(Some(enabled));
        }
    }
}
