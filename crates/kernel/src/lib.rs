//! Viewer Kernel: the one state object the frame loop owns.
//!
//! # Invariants
//! - All camera and projection mutations flow through [`ViewerState::step`].
//! - A step applies its intents in the order given; the mapper hands them
//!   out pointer first, then scroll, then keys.

pub mod state;

pub use state::{StepOutcome, ViewerState};
