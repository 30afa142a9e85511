use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;
use vitae_core::render::RenderError;
use vitae_core::{Resume, ResumeSummary};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_resumes))
        .route("/{id}", get(get_resume))
        .route("/{id}/pdf", get(download_pdf))
}

async fn list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, (StatusCode, String)> {
    let summaries = state
        .storage
        .list()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(summaries))
}

async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, (StatusCode, String)> {
    let resume = load_resume(&state, id).await?;
    Ok(Json(resume))
}

async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let resume = load_resume(&state, id).await?;

    let bytes = state.renderer.render(&resume).map_err(|e| match e {
        RenderError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        RenderError::AllBackendsFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    let filename = format!("{}.pdf", resume.display_name().replace(' ', "_"));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

async fn load_resume(state: &AppState, id: Uuid) -> Result<Resume, (StatusCode, String)> {
    state
        .storage
        .get(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "Resume not found".to_string()))
}
