//! # Data Management Handlers
//!
//! Dataset upload and metadata retrieval. Uploaded files are stored verbatim
//! in the object store under `reference/`, with sniffed column metadata
//! stored beside them as `<name>.meta.json` for later inspection.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::Bytes;
use tracing::info;

use crate::data::{self, DataFormat};
use crate::models::{FeedbackRecord, FeedbackResponse, FileMetadataResponse, UploadResponse};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Object-store prefix for reference datasets.
const REFERENCE_PREFIX: &str = "reference";

/// Object-store prefix for reported true labels.
const FEEDBACK_PREFIX: &str = "feedback";

/// `POST /api/data-management/upload/file` - store a reference dataset.
///
/// Expects one multipart field named `file` with a filename whose extension
/// identifies the format. The raw bytes and the extracted metadata are
/// persisted in the same request; the upload is acknowledged only after both
/// writes succeed.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let format = DataFormat::from_filename(&filename)?;
    let metadata = data::extract_metadata(format, &bytes)?;
    let metadata_json = serde_json::to_vec(&metadata).map_err(|_| ApiError::Internal)?;

    let object_key = format!("{REFERENCE_PREFIX}/{filename}");
    state
        .object_store
        .put(&object_key, bytes, format.content_type())
        .await?;
    state
        .object_store
        .put(
            &format!("{object_key}.meta.json"),
            Bytes::from(metadata_json),
            "application/json",
        )
        .await?;

    info!(filename = %filename, columns = metadata.columns.len(), "Reference dataset stored");
    Ok(Json(UploadResponse {
        status: "stored".to_string(),
        reference_data_filename: filename,
    }))
}

/// `GET /api/data-management/metadata/{filename}` - column metadata of a
/// previously uploaded dataset.
pub async fn file_metadata(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<FileMetadataResponse>> {
    let key = format!("{REFERENCE_PREFIX}/{filename}.meta.json");
    let bytes = state
        .object_store
        .get(&key)
        .await?
        .ok_or(ApiError::NotFound)?;

    let metadata: data::DatasetMetadata =
        serde_json::from_slice(&bytes).map_err(|_| ApiError::Internal)?;
    Ok(Json(FileMetadataResponse {
        columns: metadata.columns,
    }))
}

/// `POST /api/data-management/feedback` - record the true label for a past
/// prediction.
///
/// The record is keyed by the originating task id, so resubmitting feedback
/// for the same prediction overwrites the earlier label.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(record): Json<FeedbackRecord>,
) -> ApiResult<Json<FeedbackResponse>> {
    record.validate()?;

    let payload = serde_json::to_vec(&record).map_err(|_| ApiError::Internal)?;
    let key = format!("{FEEDBACK_PREFIX}/{}.json", record.task_id);
    state
        .object_store
        .put(&key, Bytes::from(payload), "application/json")
        .await?;

    info!(task_id = %record.task_id, "Feedback label recorded");
    Ok(Json(FeedbackResponse {
        status: "recorded".to_string(),
        task_id: record.task_id,
    }))
}

/// Pull the `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(String, Bytes)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .ok_or_else(|| ApiError::bad_request("file field is missing a filename"))?
            .to_string();
        if filename.contains('/') || filename.contains("..") {
            return Err(ApiError::bad_request("filename must not contain path separators"));
        }
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::bad_request("uploaded file is empty"));
        }
        return Ok((filename, bytes));
    }
    Err(ApiError::bad_request("multipart body has no file field"))
}
