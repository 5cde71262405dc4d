//! Quill web layer - route handlers, forms, sessions and HTML rendering.
//!
//! Every response is server-rendered HTML or a redirect; there is no
//! JSON surface.
//!
//! # Architecture
//!
//! - **Routes**: one module per area (home, auth, account, posts,
//!   comments), handlers orchestrating validation, persistence and
//!   rendering
//! - **Session**: signed cookies carrying the logged-in user id, with
//!   `AuthUser`/`MaybeUser` extractors as the request-scoped context
//! - **Forms**: typed structs validated up front, with per-field error
//!   messages re-rendered into the originating form
//! - **Render**: maud components (compile-time templates), shared
//!   layout and CSS
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - Session and flash cookies are signed; forging requires the key
//! - Post-login redirect targets are restricted to local paths

pub mod error;
pub mod forms;
pub mod pagination;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

pub use routes::router;
pub use state::{AppState, AppStateInner};
