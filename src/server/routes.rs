//! HTTP routes.

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::deck::ExportRequest;
use crate::ooxml::opc::constants::content_type as ct;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

/// Create the application router.
pub fn create_router(state: AppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/pptx", post(export_pptx))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn export_pptx(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Response> {
    let generator = state.generator.clone();
    let deck = tokio::task::spawn_blocking(move || generator.export(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(&deck.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, ct::PPTX_FILE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        deck.bytes,
    )
        .into_response())
}

/// Replace characters that cannot appear in a quoted header parameter.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckGenerator, ExportSettings};
    use crate::ooxml::pptx::{Presentation, fixtures};
    use crate::template::{TemplateMaps, mapper::describe_presentation, write_template_maps};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir) -> Router {
        let pres = Presentation::from_bytes(&fixtures::template_pptx()).unwrap();
        let mut maps = TemplateMaps::new();
        maps.insert("bell-enterprise".to_string(), describe_presentation(&pres, "bell.pptx"));
        maps.insert("gone".to_string(), describe_presentation(&pres, "missing.pptx"));

        let maps_path = dir.path().join("template-maps.json");
        write_template_maps(&maps_path, &maps).unwrap();
        std::fs::write(dir.path().join("bell.pptx"), fixtures::template_pptx()).unwrap();

        let generator = DeckGenerator::new(dir.path().to_path_buf(), maps_path, ExportSettings::default());
        create_router(AppState::with_generator(generator), 1024 * 1024)
    }

    fn export(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/pptx")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_unknown_template() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(export(json!({ "templateId": "does-not-exist", "deck": { "slides": [] } })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("UNKNOWN_TEMPLATE"));
    }

    #[tokio::test]
    async fn test_missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(export(json!({ "templateId": "gone", "deck": { "slides": [] } })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], json!("TEMPLATE_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_missing_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = DeckGenerator::new(
            dir.path().to_path_buf(),
            dir.path().join("template-maps.json"),
            ExportSettings::default(),
        );
        let response = create_router(AppState::with_generator(generator), 1024)
            .oneshot(export(json!({ "templateId": "bell-enterprise", "deck": { "slides": [] } })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_export_deck() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&dir)
            .oneshot(export(json!({
                "templateId": "bell-enterprise",
                "deck": {
                    "title": "Q3 \"Review\"",
                    "slides": [
                        { "title": "Opening", "subtitle": "Quarter three" },
                        { "title": "Results", "bullets": ["Revenue up", "Costs flat"] }
                    ]
                }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], ct::PPTX_FILE);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Q3 _Review_.pptx\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let pres = Presentation::from_bytes(&bytes).unwrap();
        assert_eq!(pres.slide_count(), 2);
    }

    #[test]
    fn test_header_safe_file_name() {
        assert_eq!(header_safe_file_name("Plan.pptx"), "Plan.pptx");
        assert_eq!(header_safe_file_name("Résumé \"v2\".pptx"), "R_sum_ _v2_.pptx");
    }
}
