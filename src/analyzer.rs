//! The room analysis pipeline.
//!
//! Upload the photo, read the prompt, ask the model, strip the code fence and
//! parse the reply as a JSON object. Each call is independent; nothing is
//! cached between runs.

use crate::ai::{
    ContentService, FileService, GeminiContentClient, GeminiFileClient, GeminiHttpClient,
};
use crate::fence::{parse_analysis, strip_json_fence};
use crate::models::{Analysis, Config};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Failure of a single analysis run, tagged by pipeline stage.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("failed to upload image: {0}")]
    Upload(#[source] crate::Error),

    #[error("failed to read prompt: {0}")]
    PromptRead(#[source] std::io::Error),

    #[error("failed to generate content: {0}")]
    Generation(#[source] crate::Error),

    #[error("failed to parse model output: {source}")]
    Parse {
        raw: String,
        #[source]
        source: crate::Error,
    },
}

/// Injectable service bundle used to construct [`Analyzer`] in tests.
pub struct AnalyzerServices {
    pub files: Box<dyn FileService>,
    pub content: Box<dyn ContentService>,
}

pub struct Analyzer {
    files: Box<dyn FileService>,
    content: Box<dyn ContentService>,
    image_path: PathBuf,
    prompt_path: PathBuf,
}

impl Analyzer {
    pub fn with_services(
        services: AnalyzerServices,
        image_path: PathBuf,
        prompt_path: PathBuf,
    ) -> Self {
        Self {
            files: services.files,
            content: services.content,
            image_path,
            prompt_path,
        }
    }

    /// Wire the Gemini-backed services from configuration.
    pub fn from_config(config: &Config, http: GeminiHttpClient) -> Self {
        info!("Analysis model: {}", config.model);
        Self::with_services(
            AnalyzerServices {
                files: Box::new(GeminiFileClient::new(http.clone())),
                content: Box::new(GeminiContentClient::new(http, config.model.clone())),
            },
            config.image_path.clone(),
            config.prompt_path.clone(),
        )
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Run the full pipeline once.
    pub async fn analyze(&self) -> Result<Analysis, AnalyzeError> {
        let file = self
            .files
            .upload_file(&self.image_path)
            .await
            .map_err(AnalyzeError::Upload)?;

        let prompt = tokio::fs::read_to_string(&self.prompt_path)
            .await
            .map_err(AnalyzeError::PromptRead)?;

        let raw = self
            .content
            .generate_text(&prompt, &file)
            .await
            .map_err(AnalyzeError::Generation)?;

        match parse_analysis(strip_json_fence(&raw)) {
            Ok(analysis) => Ok(analysis),
            Err(source) => {
                warn!(
                    "Model output is not a JSON object: {}\nRaw response text: {}",
                    source, raw
                );
                Err(AnalyzeError::Parse { raw, source })
            }
        }
    }
}
