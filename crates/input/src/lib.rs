//! Input mapping: raw key state and pointer/scroll deltas become camera
//! intents.
//!
//! # Invariants
//! - Window callbacks only enqueue; nothing here touches camera state.
//! - A frame's intents come out in a fixed order: pointer, scroll, keys.
//! - The first pointer event only records a baseline.

pub mod action;
pub mod mapper;

pub use action::Intent;
pub use mapper::{InputMapper, Key, PIXELS_PER_LINE};

pub fn crate_info() -> &'static str {
    "cartonview-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
