//! The shared comment board.
//!
//! Comments have no update or delete; once posted they stay.

use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use quill_db::models::{CommentRow, UserRow};
use uuid::Uuid;

use crate::error::WebError;
use crate::forms::{CommentForm, FormErrors};
use crate::render::components::{comment_card, layout, textarea_field};
use crate::session::{AuthUser, Flash, flash, take_flash};
use crate::state::AppState;

const COMMENTS_SHOWN: u32 = 50;

pub async fn page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, WebError> {
    let comments = state.db.recent_comments(COMMENTS_SHOWN)?;
    let (jar, notice) = take_flash(jar);
    Ok((
        jar,
        comments_page(&user, notice.as_ref(), "", &FormErrors::default(), &comments),
    ))
}

pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: SignedCookieJar,
    Form(form): Form<CommentForm>,
) -> Result<Response, WebError> {
    let errors = FormErrors::of(&form);
    if !errors.is_empty() {
        let comments = state.db.recent_comments(COMMENTS_SHOWN)?;
        let page = comments_page(&user, None, &form.content, &errors, &comments);
        return Ok(page.into_response());
    }

    state
        .db
        .create_comment(&Uuid::new_v4().to_string(), &form.content, &user.id)?;

    let jar = flash(jar, Flash::success("Your comment has been posted"));
    Ok((jar, Redirect::to("/comment")).into_response())
}

fn comments_page(
    user: &UserRow,
    notice: Option<&Flash>,
    draft: &str,
    errors: &FormErrors,
    comments: &[CommentRow],
) -> Markup {
    let content = html! {
        h1 { "Comments" }
        form class="stacked" method="post" action="/comment" {
            (textarea_field("Leave a comment", "content", draft, errors))
            button type="submit" { "Comment" }
        }
        @if comments.is_empty() {
            p class="muted" { "Nothing here yet. Say something." }
        }
        @for comment in comments {
            (comment_card(comment))
        }
    };
    layout("Comments", Some(user), notice, content)
}
