//! The post listings: front page and per-user pages.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum_extra::extract::SignedCookieJar;
use maud::html;

use crate::error::WebError;
use crate::pagination::{Page, PageQuery, offset};
use crate::render::components::{layout, pagination_nav, post_card};
use crate::session::{MaybeUser, take_flash};
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<PageQuery>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, WebError> {
    let number = query.number();
    let page = Page {
        items: state.db.list_posts(state.page_size, offset(number, state.page_size))?,
        number,
        per_page: state.page_size,
        total: state.db.count_posts()?,
    };

    let (jar, flash) = take_flash(jar);
    let content = html! {
        @for post in &page.items {
            (post_card(post))
        }
        @if page.items.is_empty() {
            p class="muted" { "No posts here yet." }
        }
        (pagination_nav(&page, "/"))
    };

    Ok((jar, layout("Home", user.as_ref(), flash.as_ref(), content)))
}

pub async fn user_posts(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, WebError> {
    let author = state
        .db
        .get_user_by_username(&username)?
        .ok_or_else(|| WebError::NotFound(format!("no user named {username}")))?;

    let number = query.number();
    let page = Page {
        items: state.db.list_posts_by_author(
            &author.id,
            state.page_size,
            offset(number, state.page_size),
        )?,
        number,
        per_page: state.page_size,
        total: state.db.count_posts_by_author(&author.id)?,
    };

    let (jar, flash) = take_flash(jar);
    let title = format!("Posts by {}", author.username);
    let content = html! {
        h1 { (title) " (" (page.total) ")" }
        @for post in &page.items {
            (post_card(post))
        }
        @if page.items.is_empty() {
            p class="muted" { "No posts here yet." }
        }
        (pagination_nav(&page, &format!("/user/{}", author.username)))
    };

    Ok((jar, layout(&title, user.as_ref(), flash.as_ref(), content)))
}
