//! Image upload relay

pub mod cloudinary;
pub mod error;

pub use cloudinary::{check_extension, CloudinaryClient, CloudinaryConfig, FOLDER, MAX_UPLOAD_BYTES};
pub use error::UploadError;
