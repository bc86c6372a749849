use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Upload page served for every request that is not an upload
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
