//! API layer for the Studio domain
//!
//! Contains HTTP handlers, routes, the session cookie extractor and domain state.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;

pub use middleware::StudioState;
pub use routes::routes;
pub use session::CurrentSession;
