//! Studio domain: screenplay artifacts, sessions, export, storyboards

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ArtifactKind, DerivedKind, Prerequisite, ScreenplayParams, Session};
pub use domain::export::{ExportError, ExportFormat, Exporter, LongLinePolicy, PdfLayout};
pub use domain::pipeline::{Generated, StudioPipeline};
pub use domain::storyboard::{StoryboardFrame, StoryboardSettings, Storyboarder, StyleHints};

pub use config::StudioConfig;
pub use error::StudioError;

// Re-export repository types
pub use repository::{InMemorySessionStore, SessionStore, StoreError};

// Re-export API types
pub use api::routes;
pub use api::StudioState;
