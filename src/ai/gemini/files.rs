use super::client::GeminiHttpClient;
use crate::ai::mime::detect_image_mime;
use crate::ai::FileService;
use crate::models::UploadedFile;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Uploads local images through the Gemini File API.
pub struct GeminiFileClient {
    http: GeminiHttpClient,
}

impl GeminiFileClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl FileService for GeminiFileClient {
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile> {
        let bytes = tokio::fs::read(path).await?;
        let mime_type = detect_image_mime(&bytes);
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let file = self.http.upload_file(bytes, mime_type, &display_name).await?;
        tracing::info!("Uploaded {} as {} ({})", path.display(), file.uri, file.mime_type);
        Ok(file)
    }
}
