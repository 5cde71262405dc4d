//! Application state shared across all request handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use quill_db::Database;
use quill_media::PictureStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub pictures: PictureStore,
    /// Signs session and flash cookies.
    pub cookie_key: Key,
    /// Posts per listing page.
    pub page_size: u32,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
