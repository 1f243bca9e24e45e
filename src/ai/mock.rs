use super::{ContentService, FileService, ImageEditService};
use crate::models::UploadedFile;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the File API.
#[derive(Clone)]
pub struct MockFileClient {
    uploads: Arc<Mutex<Vec<PathBuf>>>,
    fail_with: Option<String>,
}

impl MockFileClient {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for MockFileClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileService for MockFileClient {
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile> {
        if let Some(message) = &self.fail_with {
            return Err(Error::AiProvider(message.clone()));
        }

        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(path.to_path_buf());
        let id = uploads.len();

        Ok(UploadedFile {
            name: format!("files/mock-{}", id),
            uri: format!("https://mock.invalid/v1beta/files/mock-{}", id),
            mime_type: "image/png".to_string(),
        })
    }
}

/// Replays canned model replies in order, cycling when exhausted.
#[derive(Clone)]
pub struct MockContentClient {
    responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockContentClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Ok(response.to_string()));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockContentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentService for MockContentClient {
    async fn generate_text(&self, prompt: &str, _file: &UploadedFile) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok("```json\n{\"score\": 50}\n```".to_string());
        }

        let index = (*count - 1) % responses.len();
        match &responses[index] {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}

/// Returns fixed image bytes for every edit request.
#[derive(Clone)]
pub struct MockImageEditClient {
    image: Option<Vec<u8>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageEditClient {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image: Some(image),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client whose responses never contain an image.
    pub fn without_image() -> Self {
        Self {
            image: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageEditService for MockImageEditClient {
    async fn edit_image(&self, prompt: &str, _image: &[u8]) -> Result<Vec<u8>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.image
            .clone()
            .ok_or_else(|| Error::AiProvider("No image data in mock response".to_string()))
    }
}
