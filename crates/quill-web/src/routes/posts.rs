//! Post create, view, update and delete.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use quill_db::models::{PostRow, UserRow};
use tracing::info;
use uuid::Uuid;

use crate::error::WebError;
use crate::forms::{FormErrors, PostForm};
use crate::render::components::{layout, post_card, text_field, textarea_field};
use crate::session::{AuthUser, Flash, MaybeUser, flash, take_flash};
use crate::state::AppState;

pub async fn new_form(AuthUser(user): AuthUser, jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, notice) = take_flash(jar);
    let page = form_page("New Post", &user, notice.as_ref(), "", "", &FormErrors::default());
    (jar, page)
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, WebError> {
    let errors = FormErrors::of(&form);
    if !errors.is_empty() {
        let page = form_page("New Post", &user, None, &form.title, &form.content, &errors);
        return Ok(page.into_response());
    }

    let post_id = Uuid::new_v4().to_string();
    state
        .db
        .create_post(&post_id, &form.title, &form.content, &user.id)?;

    info!(post_id = %post_id, author = %user.username, "post created");
    let jar = flash(jar, Flash::success("Your post has been created!"));
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, WebError> {
    let post = state
        .db
        .get_post(&id)?
        .ok_or_else(|| WebError::NotFound(format!("no post with id {id}")))?;

    let is_author = user.as_ref().map(|u| u.id == post.author_id).unwrap_or(false);
    let (jar, notice) = take_flash(jar);
    let content = html! {
        (post_card(&post))
        @if is_author {
            div class="post-actions" {
                a href={ "/post/" (post.id) "/update" } { "Update" }
                form method="post" action={ "/post/" (post.id) "/delete" } {
                    button type="submit" class="danger" { "Delete" }
                }
            }
        }
    };

    Ok((jar, layout(&post.title, user.as_ref(), notice.as_ref(), content)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, WebError> {
    let post = owned_post(&state, &id, &user)?;
    let (jar, notice) = take_flash(jar);
    let page = form_page(
        "Update Post",
        &user,
        notice.as_ref(),
        &post.title,
        &post.content,
        &FormErrors::default(),
    );
    Ok((jar, page))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, WebError> {
    let post = owned_post(&state, &id, &user)?;

    let errors = FormErrors::of(&form);
    if !errors.is_empty() {
        let page = form_page("Update Post", &user, None, &form.title, &form.content, &errors);
        return Ok(page.into_response());
    }

    // Title and content only; id and date_posted stay as they were.
    state.db.update_post(&post.id, &form.title, &form.content)?;

    info!(post_id = %post.id, "post updated");
    let jar = flash(jar, Flash::success("Your post has been updated!"));
    Ok((jar, Redirect::to(&format!("/post/{}", post.id))).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let post = owned_post(&state, &id, &user)?;
    state.db.delete_post(&post.id)?;

    info!(post_id = %post.id, "post deleted");
    let jar = flash(jar, Flash::success("Your post has been deleted!"));
    Ok((jar, Redirect::to("/")).into_response())
}

/// Fetch a post and require that `user` wrote it.
fn owned_post(state: &AppState, id: &str, user: &UserRow) -> Result<PostRow, WebError> {
    let post = state
        .db
        .get_post(id)?
        .ok_or_else(|| WebError::NotFound(format!("no post with id {id}")))?;

    if post.author_id != user.id {
        return Err(WebError::Forbidden(
            "only the author can change this post".to_string(),
        ));
    }
    Ok(post)
}

fn form_page(
    legend: &str,
    user: &UserRow,
    notice: Option<&Flash>,
    title: &str,
    content: &str,
    errors: &FormErrors,
) -> Markup {
    let body = html! {
        h1 { (legend) }
        form class="stacked" method="post" {
            (text_field("Title", "title", "text", title, errors))
            (textarea_field("Content", "content", content, errors))
            button type="submit" { "Post" }
        }
    };
    layout(legend, Some(user), notice, body)
}
