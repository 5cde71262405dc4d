//! Registration, login and logout.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use maud::{Markup, html};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::WebError;
use crate::forms::{FormErrors, LoginForm, RegisterForm};
use crate::render::components::{layout, text_field};
use crate::session::{Flash, MaybeUser, flash, log_in, log_out, take_flash};
use crate::state::AppState;
use quill_db::queries::{UserConflict, user_conflict};

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// -- Registration --------------------------------------------------------

pub async fn register_form(
    MaybeUser(user): MaybeUser,
    jar: SignedCookieJar,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    let (jar, notice) = take_flash(jar);
    (jar, register_page(notice.as_ref(), "", "", &FormErrors::default())).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let mut errors = FormErrors::of(&form);
    if errors.field("username").is_empty()
        && state.db.get_user_by_username(&form.username)?.is_some()
    {
        errors.add("username", "That username is taken");
    }
    if errors.field("email").is_empty() && state.db.get_user_by_email(&form.email)?.is_some() {
        errors.add("email", "That email is already registered");
    }
    if !errors.is_empty() {
        return Ok(register_page(None, &form.username, &form.email, &errors).into_response());
    }

    let password_hash = hash_password(&form.password)?;
    let user_id = Uuid::new_v4().to_string();

    if let Err(err) = state
        .db
        .create_user(&user_id, &form.username, &form.email, &password_hash)
    {
        // the advisory checks above can race; the constraint is authoritative
        match user_conflict(&err) {
            Some(UserConflict::Username) => errors.add("username", "That username is taken"),
            Some(UserConflict::Email) => errors.add("email", "That email is already registered"),
            None => return Err(err.into()),
        }
        return Ok(register_page(None, &form.username, &form.email, &errors).into_response());
    }

    info!(username = %form.username, "new user registered");
    let jar = flash(
        jar,
        Flash::success("Your account has been created! You are now able to log in"),
    );
    Ok((jar, Redirect::to("/login")).into_response())
}

fn register_page(
    notice: Option<&Flash>,
    username: &str,
    email: &str,
    errors: &FormErrors,
) -> Markup {
    let content = html! {
        h1 { "Join Quill" }
        form class="stacked" method="post" action="/register" {
            (text_field("Username", "username", "text", username, errors))
            (text_field("Email", "email", "email", email, errors))
            (text_field("Password", "password", "password", "", errors))
            (text_field("Confirm password", "confirm_password", "password", "", errors))
            button type="submit" { "Sign Up" }
        }
        p class="muted" {
            "Already have an account? " a href="/login" { "Log in" }
        }
    };
    layout("Register", None, notice, content)
}

// -- Login / logout ------------------------------------------------------

pub async fn login_form(
    MaybeUser(user): MaybeUser,
    jar: SignedCookieJar,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    let (jar, notice) = take_flash(jar);
    (jar, login_page(notice.as_ref(), "", &FormErrors::default())).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<NextQuery>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let errors = FormErrors::of(&form);
    if !errors.is_empty() {
        return Ok(login_page(None, &form.email, &errors).into_response());
    }

    // One generic failure path: never reveal whether the email or the
    // password was the wrong half.
    let stored = state.db.get_user_by_email(&form.email)?;
    let verified = stored
        .as_ref()
        .map(|u| verify_password(&u.password, &form.password))
        .unwrap_or(false);

    let Some(account) = stored.filter(|_| verified) else {
        let notice = Flash::danger("Login unsuccessful. Please check email and password");
        return Ok(login_page(Some(&notice), &form.email, &FormErrors::default()).into_response());
    };

    info!(username = %account.username, "user logged in");
    let jar = log_in(jar, &account.id, form.remember_me());
    let target = query.next.as_deref().and_then(safe_next).unwrap_or("/");
    Ok((jar, Redirect::to(target)).into_response())
}

pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    (log_out(jar), Redirect::to("/"))
}

fn login_page(notice: Option<&Flash>, email: &str, errors: &FormErrors) -> Markup {
    let content = html! {
        h1 { "Log In" }
        form class="stacked" method="post" {
            (text_field("Email", "email", "email", email, errors))
            (text_field("Password", "password", "password", "", errors))
            div class="check-field" {
                input type="checkbox" id="remember" name="remember";
                label for="remember" { "Remember me" }
            }
            button type="submit" { "Log In" }
        }
        p class="muted" {
            "Need an account? " a href="/register" { "Sign up" }
        }
    };
    layout("Login", None, notice, content)
}

// -- Helpers -------------------------------------------------------------

/// Post-login redirect targets must be local paths; anything else would
/// be an open redirect.
fn safe_next(next: &str) -> Option<&str> {
    (next.starts_with('/') && !next.starts_with("//")).then_some(next)
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
