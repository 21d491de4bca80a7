//! Controller layer: UI events, effect-to-command mapping, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
