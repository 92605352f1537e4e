use axum::{Json, Router, routing::get};
use utoipa::openapi::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

/// Scalar page template; `$spec` is replaced with the serialized document.
const HELP_PAGE: &str = r#"<!doctype html>
<html>
<head>
    <title>Coffee API reference</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1"/>
</head>
<body>
<script id="api-reference" type="application/json">
$spec
</script>
<script src="https://cdn.jsdelivr.net/npm/@scalar/api-reference"></script>
</body>
</html>
"#;

/// Routes serving the generated API document: raw JSON at `/`, rendered at `/help`.
pub fn router(api: OpenApi) -> Router {
    let document = api.clone();
    Router::new()
        .route(
            "/",
            get(move || {
                let document = document.clone();
                async move { Json(document) }
            }),
        )
        .merge(Scalar::with_url("/help", api).custom_html(HELP_PAGE))
}
