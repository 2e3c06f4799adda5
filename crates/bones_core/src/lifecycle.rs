//! Loader lifecycle
//!
//! Every loader (a whole skeleton or a single bone) moves through the same
//! states:
//!
//! ```text
//!            Enable                 BeginFade
//! Disabled ─────────▶ Enabled ─────────────────▶ Disabling
//!    ▲  ◀───────────────┘  ▲   Enable                 │
//!    │      Disable        └──────────────────────────┤
//!    └────────────────────────────────────────────────┘
//!              FadeComplete / Disable
//!
//! any live state ── Dispose ──▶ Disposed ── Reset ──▶ Disabled
//! ```

use crate::fsm::StateMachine;

/// Where a loader is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoaderState {
    /// Nothing rendered, real content visible
    Disabled,
    /// Placeholder rendered and shimmering, content hidden
    Enabled,
    /// Fade-out running, content fading back in
    Disabling,
    /// Torn down for good, every operation is a no-op
    Disposed,
}

/// Inputs that move a loader between states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoaderEvent {
    Enable,
    /// Disable without a fade
    Disable,
    /// Disable with a fade-out
    BeginFade,
    FadeComplete,
    Dispose,
    Reset,
}

/// Lifecycle state machine shared by the bone and skeleton managers
pub struct LoaderLifecycle {
    label: &'static str,
    machine: StateMachine<LoaderState, LoaderEvent>,
}

impl LoaderLifecycle {
    pub fn new(label: &'static str) -> Self {
        use LoaderEvent::*;
        use LoaderState::*;

        let machine = StateMachine::builder(Disabled)
            .on(Disabled, Enable, Enabled)
            .on(Enabled, Disable, Disabled)
            .on(Enabled, BeginFade, Disabling)
            .on(Disabling, FadeComplete, Disabled)
            .on(Disabling, Disable, Disabled)
            .on(Disabling, Enable, Enabled)
            .on_any(&[Disabled, Enabled, Disabling], Dispose, Disposed)
            .on(Disposed, Reset, Disabled)
            .build();

        Self { label, machine }
    }

    pub fn state(&self) -> LoaderState {
        self.machine.current_state()
    }

    /// Feed an event; returns true when the state changed
    pub fn send(&mut self, event: LoaderEvent) -> bool {
        let from = self.machine.current_state();
        match self.machine.send(event) {
            Some(to) => {
                tracing::debug!(loader = self.label, ?from, ?event, ?to, "lifecycle transition");
                true
            }
            None => {
                tracing::trace!(loader = self.label, ?from, ?event, "lifecycle event ignored");
                false
            }
        }
    }

    pub fn can_send(&self, event: LoaderEvent) -> bool {
        self.machine.can_send(event)
    }

    pub fn is_disposed(&self) -> bool {
        self.machine.is_in(LoaderState::Disposed)
    }

    /// Enabled or fading out
    pub fn is_active(&self) -> bool {
        matches!(self.state(), LoaderState::Enabled | LoaderState::Disabling)
    }

    pub fn history(&self) -> &[(LoaderState, LoaderEvent, LoaderState)] {
        self.machine.history()
    }
}

impl std::fmt::Debug for LoaderLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderLifecycle")
            .field("label", &self.label)
            .field("state", &self.state())
            .finish()
    }
}
