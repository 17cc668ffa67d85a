// POST /api/upload handler

use bytes::BufMut;
use futures::TryStreamExt;
use warp::multipart::{FormData, Part};

use crate::error::AppError;
use crate::models::UploadResponse;
use crate::state::AppState;
use crate::upload::{check_extension, UploadError};

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";

pub async fn upload_handler(
    _username: String,
    state: AppState,
    form: FormData,
) -> Result<impl warp::Reply, warp::Rejection> {
    let uploader = state
        .uploader
        .clone()
        .ok_or_else(|| AppError::from(UploadError::NotConfigured))?;

    let (filename, bytes) = read_image(form).await?;
    check_extension(&filename).map_err(AppError::from)?;

    let url = uploader
        .upload(bytes, &filename)
        .await
        .map_err(AppError::from)?;

    Ok(warp::reply::json(&UploadResponse { url }))
}

/// Pull the first non-empty `image` part out of the form
async fn read_image(form: FormData) -> Result<(String, Vec<u8>), AppError> {
    let mut form = Box::pin(form);
    while let Some(part) = form.try_next().await.map_err(bad_form)? {
        if part.name() != IMAGE_FIELD {
            continue;
        }

        let filename = part.filename().unwrap_or_default().to_string();
        let bytes = read_part(part).await?;
        if bytes.is_empty() {
            break;
        }
        return Ok((filename, bytes));
    }

    Err(UploadError::MissingFile.into())
}

async fn read_part(part: Part) -> Result<Vec<u8>, AppError> {
    part.stream()
        .try_fold(Vec::new(), |mut acc, buf| async move {
            acc.put(buf);
            Ok(acc)
        })
        .await
        .map_err(bad_form)
}

fn bad_form(err: warp::Error) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err))
}
