use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::header::{self, HeaderName};
use axum::http::request::Parts;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, async_trait};
use chrono::Utc;
use serde_json::json;

use crate::config::{RenderRequest, validate_output_name};
use crate::foundation::error::CountdownError;
use crate::server::error::ApiError;
use crate::session::{RenderOutcome, render_countdown};
use crate::text::fonts::FontLibrary;

/// Shared, read-only state of every route.
#[derive(Clone)]
pub struct AppState {
    pub fonts: Arc<FontLibrary>,
    pub scratch_dir: Arc<PathBuf>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/countdown", get(handle_countdown))
        .route("/get", get(handle_download))
        .route("/status", get(handle_status))
        .route("/:file", get(handle_scratch_file))
        .with_state(state)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Countdown GIF</title>
  </head>
  <body>
    <input type="date">
    <button>Generate</button>
    <iframe width="520" height="170" style="border:0"></iframe>
    <script>
      document.querySelector("button").addEventListener("click", () => {
        const value = document.querySelector("input").value;
        if (!value) return;
        document.querySelector("iframe").src = `/countdown?time=${value}`;
      });
    </script>
  </body>
</html>
"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_status() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_countdown(
    State(state): State<AppState>,
    Query(request): Query<RenderRequest>,
) -> Result<Response, ApiError> {
    let (_, bytes) = render(&state, request).await?;
    Ok((gif_headers(), bytes).into_response())
}

async fn handle_download(
    State(state): State<AppState>,
    Query(request): Query<RenderRequest>,
) -> Result<Response, ApiError> {
    let (outcome, bytes) = render(&state, request).await?;
    let file_name = outcome
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok((
        gif_headers(),
        [(header::CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response())
}

/// Previously rendered files stay reachable by name until overwritten.
async fn handle_scratch_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let stem = file
        .strip_suffix(".gif")
        .ok_or_else(|| ApiError::not_found(format!("no such file: {file}")))?;
    validate_output_name(stem)?;

    let path = state.scratch_dir.join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((gif_headers(), bytes).into_response()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::not_found(format!("no such file: {file}")))
        }
        Err(err) => Err(CountdownError::filesystem(&path, err).into()),
    }
}

fn gif_headers() -> [(HeaderName, &'static str); 2] {
    [
        (header::CONTENT_TYPE, "image/gif"),
        (header::CACHE_CONTROL, "no-cache"),
    ]
}

/// Run one render on the blocking pool and read the finished file back.
async fn render(
    state: &AppState,
    request: RenderRequest,
) -> Result<(RenderOutcome, Vec<u8>), ApiError> {
    tracing::debug!(?request, "received render request");
    let fonts = state.fonts.clone();
    let scratch_dir = state.scratch_dir.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        render_countdown(&request, &fonts, &scratch_dir, Utc::now())
    })
    .await
    .map_err(|err| ApiError::internal(format!("render task failed: {err}")))??;

    let bytes = tokio::fs::read(&outcome.path)
        .await
        .map_err(|err| CountdownError::filesystem(&outcome.path, err))?;
    Ok((outcome, bytes))
}

/// Wrap axum's `Query` to return parse errors as JSON.
struct Query<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Query<T>
where
    axum::extract::Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(ApiError::malformed_request(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt as _;

    use super::*;

    struct TestApp {
        router: Router,
        scratch: tempfile::TempDir,
    }

    fn app() -> Option<TestApp> {
        let fonts = FontLibrary::system_shared().ok()?;
        let scratch = tempfile::tempdir().ok()?;
        let router = routes(AppState {
            fonts,
            scratch_dir: Arc::new(scratch.path().to_path_buf()),
        });
        Some(TestApp { router, scratch })
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    fn json_body(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn countdown_without_time_is_a_validation_error() {
        let Some(app) = app() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let (status, _, body) = get(&app.router, "/countdown?frames=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = json_body(&body);
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Time parameter is required.");
        assert!(std::fs::read_dir(app.scratch.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn countdown_serves_gif_bytes() {
        let Some(app) = app() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let (status, headers, body) =
            get(&app.router, "/countdown?time=2099-01-01&frames=2&name=served").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/gif");
        assert!(body.starts_with(b"GIF89a"));
        assert_eq!(
            std::fs::read(app.scratch.path().join("served.gif")).unwrap(),
            body
        );
    }

    #[tokio::test]
    async fn download_sets_attachment_disposition() {
        let Some(app) = app() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let (status, headers, body) =
            get(&app.router, "/get?time=2099-01-01&frames=1&name=launch").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"launch.gif\""
        );
        assert!(body.starts_with(b"GIF89a"));

        let (status, _, again) = get(&app.router, "/launch.gif").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, body);
    }

    #[tokio::test]
    async fn absent_scratch_file_is_not_found() {
        let Some(app) = app() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let (status, _, body) = get(&app.router, "/absent.gif").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body)["error_code"], "NOT_FOUND");

        let (status, _, _) = get(&app.router, "/notes.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_query_value_is_malformed_request() {
        let Some(app) = app() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let (status, _, body) = get(&app.router, "/countdown?time=2099-01-01&width=wide").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error_code"], "MALFORMED_REQUEST");
    }

    #[tokio::test]
    async fn bad_name_is_rejected_before_rendering() {
        let Some(app) = app() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let (status, _, body) = get(&app.router, "/countdown?time=2099-01-01&name=..%2Fx").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error_code"], "VALIDATION_ERROR");
    }

    async fn query(uri: &str) -> Result<RenderRequest, ApiError> {
        let (mut parts, _) = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
            .into_parts();
        Query::<RenderRequest>::from_request_parts(&mut parts, &())
            .await
            .map(|q| q.0)
    }

    #[tokio::test]
    async fn query_maps_renamed_fields() {
        let req = query("/countdown?time=2030-01-01&color=FF0000&bg=000000&frames=3&width=400")
            .await
            .unwrap();
        assert_eq!(req.time.as_deref(), Some("2030-01-01"));
        assert_eq!(req.text_color.as_deref(), Some("FF0000"));
        assert_eq!(req.background_color.as_deref(), Some("000000"));
        assert_eq!(req.frames, Some(3));
        assert_eq!(req.width, Some(400));
        assert_eq!(req.height, None);
    }

    #[tokio::test]
    async fn malformed_numbers_are_json_bad_requests() {
        let err = query("/countdown?time=2030-01-01&width=wide").await.unwrap_err();
        assert_eq!(err.http_status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code, "MALFORMED_REQUEST");
    }

    #[tokio::test]
    async fn status_reports_version() {
        let Json(body) = handle_status().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn index_links_to_countdown() {
        let Html(page) = index().await;
        assert!(page.contains("/countdown?time="));
    }
}
