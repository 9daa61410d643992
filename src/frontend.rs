use std::path::Path;

use axum::body::{boxed, Body};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::err::{handler404, Error};
use crate::state::AppState;

fn is_api(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Handles every request no API route matched.
///
/// Unknown API paths get a JSON 404. Anything else is looked up in the
/// frontend bundle, and paths with no file behind them get `index.html` so
/// the client-side router can take over.
pub async fn fallback(Extension(state): Extension<AppState>, req: Request<Body>) -> Response {
    if is_api(req.uri().path()) {
        return handler404(req.uri().clone()).await.into_response();
    }
    match serve_bundle(&state.frontend_dir, req).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn serve_bundle(dir: &Path, req: Request<Body>) -> Result<Response, Error> {
    let uri = req.uri().clone();
    let file = ServeDir::new(dir)
        .oneshot(req)
        .await
        .map_err(|err| Error::unknown(err.to_string()))?;
    if file.status() != StatusCode::NOT_FOUND {
        return Ok(file.map(boxed));
    }

    let index = ServeFile::new(dir.join("index.html"))
        .oneshot(Request::new(Body::empty()))
        .await
        .map_err(|err| Error::unknown(err.to_string()))?;
    if index.status() == StatusCode::NOT_FOUND {
        return Err(handler404(uri).await);
    }
    Ok(index.map(boxed))
}

#[cfg(test)]
mod tests {
    use super::is_api;

    #[test]
    fn api_prefix_is_matched_on_segments() {
        assert!(is_api("/api"));
        assert!(is_api("/api/v0/unknown"));
        assert!(!is_api("/apiary"));
        assert!(!is_api("/assets/index.js"));
    }
}
