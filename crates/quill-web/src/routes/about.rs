//! Static informational pages.

use axum::response::IntoResponse;
use maud::html;

use crate::render::components::layout;
use crate::session::MaybeUser;

pub async fn about(MaybeUser(user): MaybeUser) -> impl IntoResponse {
    let content = html! {
        h1 { "About" }
        div class="card" {
            p {
                "Quill is a small multi-user blog. Anyone can read; "
                "registered writers can post, comment, and put a face "
                "to their byline."
            }
        }
    };
    layout("About", user.as_ref(), None, content)
}

pub async fn about0(MaybeUser(user): MaybeUser) -> impl IntoResponse {
    let names = ["John", "Jane", "Jack"];
    let content = html! {
        h1 { "About" }
        div class="card" {
            p { "Some of the people writing here:" }
            ul {
                @for name in names {
                    li { (name) }
                }
            }
        }
    };
    layout("About", user.as_ref(), None, content)
}
