//! Gesture layer on top of the match-3 core.
//!
//! Maps player gestures (swipe, double tap) onto [`GameState`](match3_core::GameState)
//! requests and reports why a gesture was refused.

pub mod gesture;

pub use match3_core as core;
pub use match3_types as types;

pub use gesture::{apply_gesture, play_gesture, Direction, Gesture, GestureError};
