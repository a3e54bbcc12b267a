//! Landing page.
//!
//! The full dashboard UI is hosted separately; this page only points at the endpoints.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Simulator Automation Dashboard</title></head>
<body>
<h1>Simulator Automation Dashboard</h1>
<ul>
<li><a href="/api/state">/api/state</a> current state</li>
<li><a href="/api/health">/api/health</a> health</li>
<li><a href="/screenshot">/screenshot</a> last screenshot</li>
<li><code>/ws</code> live event feed</li>
</ul>
</body>
</html>
"#;

/// Handler for `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
