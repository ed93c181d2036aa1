//! HTTP handlers for the Studio domain

pub mod artifacts;
pub mod export;
pub mod storyboard;
