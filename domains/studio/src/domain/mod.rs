//! Studio domain layer: sessions, prompts, generation, export, storyboards

pub mod entities;
pub mod export;
pub mod pipeline;
pub mod prompts;
pub mod storyboard;
