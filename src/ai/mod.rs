//! AI service integration for room analysis
//!
//! Abstracts the three Gemini capabilities the analyzer needs: storing the
//! room photo with the File API, generating text from a prompt plus file
//! reference, and rendering an edited version of the photo.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiContentClient, GeminiFileClient, GeminiHttpClient, GeminiImageEditClient};
pub use mock::{MockContentClient, MockFileClient, MockImageEditClient};

use crate::models::UploadedFile;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait FileService: Send + Sync {
    /// Upload a local file and return the remote reference.
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile>;
}

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Send `prompt` followed by a reference to `file` as one user turn and
    /// return the generated text.
    async fn generate_text(&self, prompt: &str, file: &UploadedFile) -> Result<String>;
}

#[async_trait]
pub trait ImageEditService: Send + Sync {
    /// Generate a new image from `prompt` and the source image bytes.
    async fn edit_image(&self, prompt: &str, image: &[u8]) -> Result<Vec<u8>>;
}
