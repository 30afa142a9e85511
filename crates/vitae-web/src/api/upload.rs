use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use uuid::Uuid;
use vitae_core::{ProcessingInfo, RawDocument, Resume};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/upload-resume", post(upload_resume))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub resume_id: Option<Uuid>,
    pub original_filename: Option<String>,
    pub file_size: Option<u64>,
    pub ai_enhanced: bool,
    pub parsed_resume: Resume,
    pub processing_info: ProcessingInfo,
}

async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or((StatusCode::BAD_REQUEST, "Uploaded file has no filename".to_string()))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            document = Some(RawDocument::new(filename, bytes.to_vec()));
        }
    }

    let document = document.ok_or((
        StatusCode::BAD_REQUEST,
        "No file field in upload".to_string(),
    ))?;

    let output = state
        .pipeline
        .process(&document)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let resume = state
        .storage
        .save(output.resume)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(UploadResponse {
        message: "Resume uploaded and parsed successfully".to_string(),
        resume_id: resume.id,
        original_filename: resume.original_filename.clone(),
        file_size: resume.file_size,
        ai_enhanced: resume.is_enhanced(),
        parsed_resume: resume,
        processing_info: output.info,
    }))
}
