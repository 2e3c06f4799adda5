//! Bones Core
//!
//! Shared building blocks for the skeleton loader crates.
//!
//! # Features
//!
//! - **Element identity**: stable integer ids handed out by the host
//! - **Errors**: the small set of misuse conditions a loader can report
//! - **State machines**: a flat state machine plus the loader lifecycle built on it

pub mod error;
pub mod fsm;
pub mod id;
pub mod lifecycle;

pub use error::{LoaderError, Result};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use id::{ElementId, ElementIdGenerator};
pub use lifecycle::{LoaderEvent, LoaderLifecycle, LoaderState};
