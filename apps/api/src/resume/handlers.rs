use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{extract_text, is_supported};
use crate::listings::{JobListing, LetterExtras};
use crate::providers::Provider;
use crate::resume::models::{Confidence, StructuredResume};
use crate::resume::prompts::{build_compare_prompt, build_extraction_prompt, build_letter_prompt};
use crate::resume::recovery::recover;
use crate::session::ResumeRecord;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub chars: usize,
    pub preview: String,
}

/// POST /api/v1/resume/upload
///
/// Multipart form: a `user_id` text field and a `file` field. Stores the
/// extracted plain text on the user's record; a new upload fully replaces the
/// previous raw text and file name.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut user_id: Option<String> = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id field: {e}")))?;
                user_id = Some(value);
            }
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("File field has no file name".into()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file field: {e}")))?;
                file = Some((name, bytes));
            }
            _ => {}
        }
    }

    let user_id =
        user_id.ok_or_else(|| AppError::Validation("Missing user_id field".to_string()))?;
    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing file field".to_string()))?;

    if !is_supported(&file_name) {
        return Err(AppError::Validation(format!(
            "Unsupported format '{file_name}'. Upload a PDF, DOCX or TXT file."
        )));
    }

    let text = extract_text(&bytes, &file_name)?;
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    let chars = text.chars().count();

    state.store.set_raw_text(&user_id, text, file_name.clone()).await;
    info!(%user_id, %file_name, chars, "resume uploaded");

    Ok(Json(UploadResponse {
        file_name,
        chars,
        preview,
    }))
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub user_id: String,
    pub provider: Provider,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub resume: StructuredResume,
    pub confidence: Confidence,
}

/// POST /api/v1/resume/extract
///
/// Runs prompt → provider → recovery against the user's current raw text and
/// stores the result. On any error the previously stored structured résumé is
/// left untouched.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let record = state.store.get(&req.user_id).await;
    let raw_text = record.raw_text.ok_or_else(|| {
        AppError::Validation("No resume uploaded yet. Upload one first.".to_string())
    })?;

    let prompt = build_extraction_prompt(&raw_text);
    let completion = state.llm.complete(req.provider, &prompt).await?;
    let recovered = recover(&completion)?;

    info!(
        user_id = %req.user_id,
        provider = %req.provider,
        confidence = ?recovered.confidence,
        "resume extraction completed"
    );

    state
        .store
        .set_structured(&req.user_id, recovered.resume.clone())
        .await;

    Ok(Json(ExtractResponse {
        resume: recovered.resume,
        confidence: recovered.confidence,
    }))
}

/// GET /api/v1/resume?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(state.store.get(&params.user_id).await))
}

#[derive(Deserialize)]
pub struct CompareRequest {
    pub user_id: String,
    pub provider: Provider,
    pub listing: JobListing,
}

#[derive(Serialize)]
pub struct CompareResponse {
    pub analysis: String,
}

/// POST /api/v1/resume/compare
///
/// Free-text compatibility analysis between the stored structured résumé and
/// a listing supplied by the search collaborator.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    let resume = require_structured(&state, &req.user_id).await?;
    let prompt = build_compare_prompt(&resume, &req.listing);
    let analysis = state.llm.complete(req.provider, &prompt).await?;
    Ok(Json(CompareResponse { analysis }))
}

#[derive(Deserialize)]
pub struct LetterRequest {
    pub user_id: String,
    pub provider: Provider,
    pub listing: JobListing,
    #[serde(default)]
    pub extras: Option<LetterExtras>,
}

#[derive(Serialize)]
pub struct LetterResponse {
    pub letter: String,
}

/// POST /api/v1/resume/letter
///
/// Drafts a cover letter as plain text. Turning it into a downloadable
/// document is the render collaborator's job.
pub async fn handle_letter(
    State(state): State<AppState>,
    Json(req): Json<LetterRequest>,
) -> Result<Json<LetterResponse>, AppError> {
    let resume = require_structured(&state, &req.user_id).await?;
    let prompt = build_letter_prompt(&resume, &req.listing, req.extras.as_ref());
    let letter = state.llm.complete(req.provider, &prompt).await?;
    Ok(Json(LetterResponse { letter }))
}

async fn require_structured(
    state: &AppState,
    user_id: &str,
) -> Result<StructuredResume, AppError> {
    state
        .store
        .get(user_id)
        .await
        .structured
        .ok_or_else(|| {
            AppError::Validation(
                "No structured resume available. Run extraction first.".to_string(),
            )
        })
}
