//! Terminal UI rendering and input handling.

pub mod auth_screens;
pub mod input;
pub mod overlays;
pub mod render;
pub mod styles;
pub mod tabs;
