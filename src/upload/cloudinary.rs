//! Signed uploads to Cloudinary

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::now_secs;

use super::error::UploadError;

/// Folder every upload lands in
pub const FOLDER: &str = "gatitu-blog";

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Credentials parsed from a `cloudinary://<key>:<secret>@<cloud_name>` URL
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl CloudinaryConfig {
    pub fn from_url(url: &str) -> Result<Self, UploadError> {
        let invalid = || {
            UploadError::InvalidUrl("expected cloudinary://<key>:<secret>@<cloud_name>".to_string())
        };

        let rest = url.trim().strip_prefix("cloudinary://").ok_or_else(invalid)?;
        let (credentials, cloud_name) = rest.rsplit_once('@').ok_or_else(invalid)?;
        let (api_key, api_secret) = credentials.split_once(':').ok_or_else(invalid)?;
        // Extra options after the cloud name are ignored
        let cloud_name = cloud_name.split(['?', '/']).next().unwrap_or_default();

        if api_key.is_empty() || api_secret.is_empty() || cloud_name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the Cloudinary upload API
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http_client: Client,
    config: CloudinaryConfig,
    base_url: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, UploadError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| UploadError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
            base_url: DEFAULT_API_BASE.to_string(),
        })
    }

    pub fn from_url(url: &str) -> Result<Self, UploadError> {
        Self::new(CloudinaryConfig::from_url(url)?)
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/auto/upload", self.base_url, self.config.cloud_name)
    }

    /// Signature over the alphabetically ordered parameters followed by the secret
    pub fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let digest = Sha256::digest(format!("{}{}", to_sign, self.config.api_secret).as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Upload a file and return its public HTTPS URL
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, UploadError> {
        let timestamp = now_secs().to_string();
        let public_id = Uuid::new_v4().to_string();
        let signature = self.sign(&[
            ("folder", FOLDER),
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);

        let size = bytes.len();
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", FOLDER)
            .text("public_id", public_id.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        debug!(filename, size, %public_id, "uploading image");

        let response = self
            .http_client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(UploadError::Http {
                status: status.as_u16(),
                body: message,
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;
        let url = uploaded.secure_url.ok_or(UploadError::MissingUrl)?;

        info!(%url, "image uploaded");
        Ok(url)
    }
}

/// Reject files whose extension is not an accepted image format
pub fn check_extension(filename: &str) -> Result<(), UploadError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedFormat(filename.to_string()))
    }
}
