use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// MIME types the menu image endpoints accept.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// MediaUploader
///
/// Abstract contract for the external media host. The real client
/// (CloudinaryUploader) performs a synchronous, on-the-critical-path HTTP
/// upload; the mock stands in during tests so handler logic can be exercised
/// without a network. Only the returned reference URI is ever persisted.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Uploads raw image bytes and returns the hosted URI.
    async fn upload_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String>;
}

/// UploadResponse
///
/// Minimal struct to deserialize the media host's upload reply, capturing
/// only the hosted URI.
#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// CloudinaryUploader
///
/// The concrete implementation: an unsigned-preset multipart POST against the
/// host's upload endpoint. The preset name is configuration, so local and
/// production targets differ only in AppConfig.
#[derive(Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryUploader {
    pub fn new(upload_url: &str, upload_preset: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.to_string(),
            upload_preset: upload_preset.to_string(),
        }
    }
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| e.to_string())?;

        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("media host returned {}", response.status()));
        }

        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| e.to_string())?;

        Ok(body.secure_url)
    }
}

/// sanitize_filename
///
/// Strips directory components from a client-provided filename so it can be
/// embedded in a deterministic mock URI.
fn sanitize_filename(filename: &str) -> String {
    filename
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .next_back()
        .unwrap_or("image")
        .to_string()
}

/// MockUploader
///
/// A mock implementation of `MediaUploader` used exclusively for tests.
/// Returns a deterministic URI derived from the filename, or a simulated
/// failure when `should_fail` is set, so the abort-before-write behavior of
/// the menu handlers can be asserted.
#[derive(Clone, Default)]
pub struct MockUploader {
    pub should_fail: bool,
}

impl MockUploader {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl MediaUploader for MockUploader {
    async fn upload_image(
        &self,
        filename: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock upload error: simulation requested".to_string());
        }

        Ok(format!(
            "https://media.test/menu/{}",
            sanitize_filename(filename)
        ))
    }
}

/// UploaderState
///
/// The concrete type used to share the media uploader across the application
/// state.
pub type UploaderState = Arc<dyn MediaUploader>;
