//! Image upload.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use circle_core::ports::MediaError;
use circle_shared::dto::UploadResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn bad_upload(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed upload: {err}"))
}

/// POST /api/profiles/upload
///
/// Stores the first `image/*` part of a `multipart/form-data` body. Plain
/// form fields and parts of other types are skipped.
pub async fn upload(
    state: web::Data<AppState>,
    identity: Identity,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let limit = state.media.max_bytes();
    let mut skipped: Option<String> = None;

    while let Some(mut field) = payload.try_next().await.map_err(bad_upload)? {
        let Some(mime) = field.content_type() else {
            continue;
        };
        let content_type = mime.essence_str().to_string();
        if mime.type_().as_str() != "image" {
            tracing::debug!(%content_type, "Skipping non-image part");
            skipped.get_or_insert(content_type);
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_upload)? {
            if bytes.len() + chunk.len() > limit {
                return Err(MediaError::TooLarge(limit).into());
            }
            bytes.extend_from_slice(&chunk);
        }

        let stored = state.media.store(&content_type, bytes).await?;
        tracing::info!(user_id = %identity.user_id, url = %stored.url, "Image uploaded");

        return Ok(HttpResponse::Ok().json(UploadResponse {
            url: stored.url,
            file_name: stored.file_name,
            size: stored.size,
        }));
    }

    match skipped {
        Some(content_type) => Err(MediaError::UnsupportedType(content_type).into()),
        None => Err(AppError::BadRequest("No file uploaded".to_string())),
    }
}
