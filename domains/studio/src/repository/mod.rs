//! Session persistence for the Studio domain

pub mod sessions;

pub use sessions::{InMemorySessionStore, SessionStore, StoreError};
