//! Landing page with the upload form.

use axum::response::Html;

use crate::render;

pub async fn home_page() -> Html<String> {
    Html(render::idle_page())
}
