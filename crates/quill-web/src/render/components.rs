//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for
//! composition into full pages.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use quill_db::models::{CommentRow, PostRow, UserRow};

use crate::forms::FormErrors;
use crate::pagination::Page;
use crate::session::Flash;

/// Inline CSS for all pages. Flat design, spacing over borders.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#1a1a1a;--fg2:#555;--fg3:#999;--accent:#3d6ea5;--accent2:#2c5282;--surface:#fff;--border:#e2e5ea;--danger:#b03030;--success:#2d7a46}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column}
main{max-width:680px;width:100%;margin:0 auto;flex:1;padding:1.5rem 1rem}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
nav{background:var(--surface);border-bottom:1px solid var(--border);padding:.75rem 1rem}
.nav-inner{max-width:680px;margin:0 auto;display:flex;align-items:center;gap:1rem}
.nav-brand{font-weight:700;font-size:1.15rem;color:var(--fg)}
.nav-spacer{flex:1}
footer{text-align:center;color:var(--fg3);font-size:.85rem;padding:1.5rem}
.flash{padding:.7rem 1rem;border-radius:8px;margin-bottom:1.25rem;font-size:.95rem}
.flash-success{background:#e7f4ec;color:var(--success)}
.flash-danger{background:#fbeaea;color:var(--danger)}
.card{background:var(--surface);border:1px solid var(--border);border-radius:10px;padding:1.25rem;margin-bottom:1rem}
.card-head{display:flex;align-items:center;gap:.75rem;margin-bottom:.75rem}
.avatar{width:44px;height:44px;border-radius:50%;object-fit:cover;flex-shrink:0}
.avatar-lg{width:125px;height:125px;border-radius:50%;object-fit:cover}
.byline{font-size:.85rem;color:var(--fg3)}
.byline a{font-weight:600;color:var(--fg)}
.card h2{font-size:1.25rem;margin-bottom:.35rem}
.card h2 a{color:var(--fg)}
.post-content{white-space:pre-wrap;word-break:break-word;color:var(--fg2)}
.muted{color:var(--fg3)}
form.stacked{background:var(--surface);border:1px solid var(--border);border-radius:10px;padding:1.25rem}
.form-field{margin-bottom:1rem}
.form-field label{display:block;font-weight:600;font-size:.9rem;margin-bottom:.3rem}
.form-field input[type=text],.form-field input[type=email],.form-field input[type=password],.form-field textarea{width:100%;padding:.5rem .65rem;border:1px solid var(--border);border-radius:6px;font:inherit}
.form-field textarea{min-height:8rem;resize:vertical}
.form-field .field-error{color:var(--danger);font-size:.85rem;margin-top:.25rem}
.check-field{display:flex;align-items:center;gap:.5rem;margin-bottom:1rem}
button[type=submit]{background:var(--accent);color:#fff;border:none;border-radius:6px;padding:.55rem 1.1rem;font:inherit;font-weight:600;cursor:pointer}
button[type=submit]:hover{background:var(--accent2)}
button.danger{background:var(--danger)}
.pagination{display:flex;gap:.4rem;justify-content:center;margin:1.25rem 0}
.pagination a,.pagination strong,.pagination span{padding:.3rem .7rem;border-radius:6px}
.pagination a{border:1px solid var(--border);background:var(--surface)}
.pagination strong{background:var(--accent);color:#fff}
.pagination span{color:var(--fg3)}
.post-actions{display:flex;gap:.6rem;margin-top:1rem}
.error-page{text-align:center;padding:4rem 1rem}
.error-page h1{margin-bottom:.5rem}
.error-page p{color:var(--fg2);margin-bottom:1.25rem}
"#;

/// Full page shell: doctype, head, nav bar, flash banner, content,
/// footer.
pub fn layout(
    title: &str,
    user: Option<&UserRow>,
    flash: Option<&Flash>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - Quill" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (navbar(user))
                main {
                    @if let Some(flash) = flash {
                        (flash_banner(flash))
                    }
                    (content)
                }
                footer { "Quill" }
            }
        }
    }
}

fn navbar(user: Option<&UserRow>) -> Markup {
    html! {
        nav {
            div class="nav-inner" {
                a class="nav-brand" href="/" { "Quill" }
                a href="/" { "Home" }
                a href="/about" { "About" }
                div class="nav-spacer" {}
                @match user {
                    Some(user) => {
                        a href="/post/new" { "New Post" }
                        a href="/comment" { "Comments" }
                        a href="/account" { (user.username) }
                        a href="/logout" { "Logout" }
                    },
                    None => {
                        a href="/login" { "Login" }
                        a href="/register" { "Register" }
                    },
                }
            }
        }
    }
}

pub fn flash_banner(flash: &Flash) -> Markup {
    html! {
        div class={ "flash flash-" (flash.category) } { (flash.message) }
    }
}

pub fn avatar_url(image_file: &str) -> String {
    format!("/static/profile_pics/{image_file}")
}

/// Human-readable form of a stored timestamp; falls back to the raw
/// value if it does not parse.
pub fn display_date(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.fZ")
        .map(|dt| dt.format("%B %e, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn post_card(post: &PostRow) -> Markup {
    html! {
        article class="card" {
            div class="card-head" {
                img class="avatar" src=(avatar_url(&post.author_image)) alt=(post.author_username);
                div class="byline" {
                    a href={ "/user/" (post.author_username) } { (post.author_username) }
                    " on " (display_date(&post.date_posted))
                }
            }
            h2 { a href={ "/post/" (post.id) } { (post.title) } }
            div class="post-content" { (post.content) }
        }
    }
}

pub fn comment_card(comment: &CommentRow) -> Markup {
    html! {
        article class="card" {
            div class="card-head" {
                img class="avatar" src=(avatar_url(&comment.author_image)) alt=(comment.author_username);
                div class="byline" {
                    a href={ "/user/" (comment.author_username) } { (comment.author_username) }
                    " on " (display_date(&comment.created_at))
                }
            }
            div class="post-content" { (comment.content) }
        }
    }
}

pub fn text_field(
    label: &str,
    name: &str,
    kind: &str,
    value: &str,
    errors: &FormErrors,
) -> Markup {
    html! {
        div class="form-field" {
            label for=(name) { (label) }
            input type=(kind) id=(name) name=(name) value=(value);
            @for message in errors.field(name) {
                div class="field-error" { (message) }
            }
        }
    }
}

pub fn textarea_field(label: &str, name: &str, value: &str, errors: &FormErrors) -> Markup {
    html! {
        div class="form-field" {
            label for=(name) { (label) }
            textarea id=(name) name=(name) { (value) }
            @for message in errors.field(name) {
                div class="field-error" { (message) }
            }
        }
    }
}

pub fn pagination_nav<T>(page: &Page<T>, base: &str) -> Markup {
    if page.total_pages() <= 1 {
        return html! {};
    }

    html! {
        div class="pagination" {
            @for link in page.links() {
                @match link {
                    Some(n) => {
                        @if n == page.number {
                            strong { (n) }
                        } @else {
                            a href={ (base) "?page=" (n) } { (n) }
                        }
                    },
                    None => span { "…" },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_formats_db_timestamps() {
        assert_eq!(display_date("2026-08-04T10:15:30.123Z"), "August  4, 2026");
    }

    #[test]
    fn display_date_passes_junk_through() {
        assert_eq!(display_date("yesterday"), "yesterday");
    }

    #[test]
    fn post_card_escapes_content() {
        let post = PostRow {
            id: "p1".to_string(),
            title: "<script>alert(1)</script>".to_string(),
            content: "body".to_string(),
            date_posted: "2026-08-04T10:15:30.123Z".to_string(),
            author_id: "u1".to_string(),
            author_username: "alice".to_string(),
            author_image: "default.png".to_string(),
        };

        let rendered = post_card(&post).into_string();
        assert!(rendered.contains("&lt;script&gt;"));
        assert!(!rendered.contains("<script>alert"));
        assert!(rendered.contains("/static/profile_pics/default.png"));
    }

    #[test]
    fn text_field_shows_errors() {
        let mut errors = FormErrors::default();
        errors.add("username", "That username is taken");

        let rendered = text_field("Username", "username", "text", "alice", &errors).into_string();
        assert!(rendered.contains("That username is taken"));
        assert!(rendered.contains("value=\"alice\""));
    }

    #[test]
    fn pagination_nav_marks_current_page() {
        let page = Page::<u32> {
            items: Vec::new(),
            number: 2,
            per_page: 2,
            total: 6,
        };

        let rendered = pagination_nav(&page, "/").into_string();
        assert!(rendered.contains("<strong>2</strong>"));
        assert!(rendered.contains("?page=1"));
        assert!(rendered.contains("?page=3"));
    }
}
