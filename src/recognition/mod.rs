//! Landmark geometry to gesture label.
//!
//! Both stages are pure: `classify` turns one hand into per-finger states and
//! `recognize` maps those states onto the closed gesture set.

pub mod classifier;
pub mod gesture;

pub use classifier::classify;
pub use gesture::{recognize, Gesture};
