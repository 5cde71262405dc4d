//! Profile viewing and updating.
//!
//! The update form is multipart so the profile picture rides along with
//! the username/email fields. Both kinds of change may land in a single
//! submission; "No changes" is reported only when neither applies.

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use quill_db::models::UserRow;
use quill_db::queries::{UserConflict, user_conflict};
use tracing::info;
use validator::Validate;

use crate::error::WebError;
use crate::forms::{AccountForm, FormErrors};
use crate::render::components::{avatar_url, layout, text_field};
use crate::session::{AuthUser, Flash, flash, take_flash};
use crate::state::AppState;

pub async fn edit_form(AuthUser(user): AuthUser, jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, notice) = take_flash(jar);
    let page = account_page(
        &user,
        notice.as_ref(),
        &user.username,
        &user.email,
        &FormErrors::default(),
    );
    (jar, page)
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut username = String::new();
    let mut email = String::new();
    let mut picture: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name() {
            Some("username") => username = field.text().await.map_err(bad_multipart)?,
            Some("email") => email = field.text().await.map_err(bad_multipart)?,
            Some("picture") => {
                let original_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(bad_multipart)?;
                if let Some(name) = original_name {
                    if !data.is_empty() {
                        picture = Some((name, data.to_vec()));
                    }
                }
            }
            _ => {}
        }
    }

    let form = AccountForm { username, email };
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(e) => e.into(),
    };

    // Save the picture first; a later conflict on the name fields may
    // orphan the file on disk, which is accepted.
    let mut new_image: Option<String> = None;
    if let Some((original_name, data)) = picture {
        match state.pictures.save_picture(&original_name, data).await {
            Ok(filename) => new_image = Some(filename),
            Err(err) => errors.add("picture", err.to_string()),
        }
    }

    if !errors.is_empty() {
        return Ok(account_page(&user, None, &form.username, &form.email, &errors).into_response());
    }

    let fields_changed = form.username != user.username || form.email != user.email;
    if fields_changed {
        if let Err(err) = state
            .db
            .update_user_fields(&user.id, &form.username, &form.email)
        {
            match user_conflict(&err) {
                Some(UserConflict::Username) => errors.add("username", "That username is taken"),
                Some(UserConflict::Email) => {
                    errors.add("email", "That email is already registered")
                }
                None => return Err(err.into()),
            }
            return Ok(
                account_page(&user, None, &form.username, &form.email, &errors).into_response()
            );
        }
    }

    let picture_changed = new_image.is_some();
    if let Some(filename) = new_image {
        state.db.update_user_image(&user.id, &filename)?;
    }

    let jar = if fields_changed || picture_changed {
        info!(user_id = %user.id, "account updated");
        flash(jar, Flash::success("Your account has been updated"))
    } else {
        flash(jar, Flash::success("No changes"))
    };
    Ok((jar, Redirect::to("/account")).into_response())
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> WebError {
    WebError::BadRequest(err.to_string())
}

fn account_page(
    user: &UserRow,
    notice: Option<&Flash>,
    username: &str,
    email: &str,
    errors: &FormErrors,
) -> Markup {
    let content = html! {
        h1 { "Account" }
        div class="card" {
            div class="card-head" {
                img class="avatar-lg" src=(avatar_url(&user.image_file)) alt=(user.username);
            }
            form class="stacked" method="post" action="/account" enctype="multipart/form-data" {
                (text_field("Username", "username", "text", username, errors))
                (text_field("Email", "email", "email", email, errors))
                div class="form-field" {
                    label for="picture" { "Profile picture" }
                    input type="file" id="picture" name="picture" accept="image/*";
                    @for message in errors.field("picture") {
                        div class="field-error" { (message) }
                    }
                }
                button type="submit" { "Update" }
            }
        }
    };
    layout("Account", Some(user), notice, content)
}
