//! Route definitions.
//!
//! ## Routes
//!
//! - `GET /`, `GET /home` - paginated post listing
//! - `GET /about`, `GET /about0` - informational pages
//! - `GET|POST /register`, `GET|POST /login`, `GET /logout`
//! - `GET|POST /account` - profile view/update (picture upload)
//! - `GET|POST /post/new`, `GET /post/{id}`,
//!   `GET|POST /post/{id}/update`, `POST /post/{id}/delete`
//! - `GET|POST /comment` - comment form and submission
//! - `GET /user/{username}` - paginated per-user listing
//!
//! Static files (`/static`) and the trace layer are wired up by the
//! server binary.

mod about;
mod account;
mod auth;
mod comments;
mod home;
mod posts;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/home", get(home::index))
        .route("/about", get(about::about))
        .route("/about0", get(about::about0))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/account", get(account::edit_form).post(account::update))
        .route("/post/new", get(posts::new_form).post(posts::create))
        .route("/post/{id}", get(posts::detail))
        .route("/post/{id}/update", get(posts::edit_form).post(posts::update))
        .route("/post/{id}/delete", post(posts::delete))
        .route("/comment", get(comments::page).post(comments::submit))
        .route("/user/{username}", get(home::user_posts))
        .with_state(state)
}
