use thiserror::Error;

/// Failures while relaying an image upload
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Unsupported image format: {0} (allowed: jpg, jpeg, png, webp)")]
    UnsupportedFormat(String),

    #[error("upload not configured")]
    NotConfigured,

    #[error("Invalid CLOUDINARY_URL: {0}")]
    InvalidUrl(String),

    #[error("Upload failed (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Upload response did not include a URL")]
    MissingUrl,
}
