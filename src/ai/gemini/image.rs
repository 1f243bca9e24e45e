use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerationConfig, InlineData, Part};
use crate::ai::mime::detect_image_mime;
use crate::ai::ImageEditService;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;

/// Image-to-image generation with a Gemini image model.
pub struct GeminiImageEditClient {
    http: GeminiHttpClient,
    model: String,
}

impl GeminiImageEditClient {
    pub fn new(http: GeminiHttpClient, model: String) -> Self {
        Self { http, model }
    }
}

#[async_trait]
impl ImageEditService for GeminiImageEditClient {
    async fn edit_image(&self, prompt: &str, image: &[u8]) -> Result<Vec<u8>> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::text(prompt),
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: detect_image_mime(image).to_string(),
                        data: base64::engine::general_purpose::STANDARD.encode(image),
                    },
                },
            ])],
            // The image-generation models reject IMAGE-only modality lists.
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
                temperature: Some(0.7),
            }),
        };

        let response = self.http.generate_content(&self.model, &request).await?;
        let parts = response
            .candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default();

        let mut image_data = None;
        for part in parts {
            match part {
                Part::Text { text } => tracing::info!("Image model text output: {}", text),
                Part::InlineData { inline_data } if image_data.is_none() => {
                    image_data = Some(inline_data)
                }
                _ => {}
            }
        }

        let image_data = image_data
            .ok_or_else(|| Error::AiProvider("No image data in Gemini response".to_string()))?;

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image_data.mime_type
        );

        base64::engine::general_purpose::STANDARD
            .decode(&image_data.data)
            .map_err(|e| Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e)))
    }
}
