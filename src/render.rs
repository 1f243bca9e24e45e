//! Rendering a tidied-up version of the analyzed room.

use crate::ai::{GeminiHttpClient, GeminiImageEditClient, ImageEditService};
use crate::models::{Analysis, Config};
use crate::{prompts, Error, Result};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_OUTPUT_PATH: &str = "image/after_image.png";

pub struct CleanupRenderer {
    image_edit: Box<dyn ImageEditService>,
}

impl CleanupRenderer {
    pub fn new(image_edit: Box<dyn ImageEditService>) -> Self {
        Self { image_edit }
    }

    pub fn from_config(config: &Config, http: GeminiHttpClient) -> Self {
        info!("Image model: {}", config.image_model);
        Self::new(Box::new(GeminiImageEditClient::new(
            http,
            config.image_model.clone(),
        )))
    }

    fn save_png_sync(image: DynamicImage, output: PathBuf) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        image.save_with_format(output, ImageFormat::Png)?;
        Ok(())
    }

    /// Ask the image model to apply the analysis' suggestions to `source` and
    /// save the result as PNG at `output`.
    pub async fn render(&self, analysis: &Analysis, source: &Path, output: &Path) -> Result<()> {
        let prompt = prompts::cleanup_prompt(analysis);
        info!("Generated prompt: {}", prompt);

        let source_bytes = tokio::fs::read(source).await?;
        let generated = self.image_edit.edit_image(&prompt, &source_bytes).await?;
        let image = image::load_from_memory(&generated)?;

        tokio::task::spawn_blocking({
            let output = output.to_path_buf();
            move || Self::save_png_sync(image, output)
        })
        .await
        .map_err(|e| Error::Generic(format!("Image save task join error: {}", e)))??;

        info!("Saved cleaned image to {}", output.display());
        Ok(())
    }
}
