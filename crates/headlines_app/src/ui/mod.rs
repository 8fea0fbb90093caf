//! Line-oriented terminal front end: command parsing and text rendering.
pub mod input;
pub mod render;
