use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

const ALLOWED_SECTIONS: [&str; 6] = [
    "summary",
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ai-enhance", post(enhance_content))
        .route("/ai-status", get(ai_status))
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub section: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub section: String,
    pub enhanced_content: String,
}

#[derive(Debug, Serialize)]
pub struct AiStatusResponse {
    pub backend_configured: bool,
    pub using_mock: bool,
}

async fn enhance_content(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, (StatusCode, String)> {
    if req.content.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Content cannot be empty".to_string()));
    }

    let section = req.section.to_lowercase();
    if !ALLOWED_SECTIONS.contains(&section.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Unknown section '{}'. Valid sections: {}",
                req.section,
                ALLOWED_SECTIONS.join(", ")
            ),
        ));
    }

    let enhanced_content = state.enhancer.enhance(&section, &req.content).await;

    Ok(Json(EnhanceResponse {
        section,
        enhanced_content,
    }))
}

async fn ai_status(State(state): State<AppState>) -> Json<AiStatusResponse> {
    let backend_configured = state.enhancer.backend_configured();
    Json(AiStatusResponse {
        backend_configured,
        using_mock: !backend_configured,
    })
}
