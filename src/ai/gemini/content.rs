use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, Part};
use crate::ai::ContentService;
use crate::models::UploadedFile;
use crate::{Error, Result};
use async_trait::async_trait;

/// Text generation against a single Gemini model.
pub struct GeminiContentClient {
    http: GeminiHttpClient,
    model: String,
}

impl GeminiContentClient {
    pub fn new(http: GeminiHttpClient, model: String) -> Self {
        Self { http, model }
    }
}

#[async_trait]
impl ContentService for GeminiContentClient {
    async fn generate_text(&self, prompt: &str, file: &UploadedFile) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt), Part::file(file)])],
            generation_config: None,
        };

        tracing::debug!("Requesting analysis from {}", self.model);
        let response = self.http.generate_content(&self.model, &request).await?;

        response
            .text()
            .ok_or_else(|| Error::AiProvider("No text in Gemini response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    fn make_client(server: &MockServer, model: &str) -> GeminiContentClient {
        let http = GeminiHttpClient::new("test-key".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri());
        GeminiContentClient::new(http, model.to_string())
    }

    fn room_photo() -> UploadedFile {
        UploadedFile {
            name: "files/room".to_string(),
            uri: "https://example.com/v1beta/files/room".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sends_prompt_then_file_reference_without_config() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(body_json(serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "rate this room" },
                        { "fileData": {
                            "mimeType": "image/png",
                            "fileUri": "https://example.com/v1beta/files/room"
                        } }
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "```json\n{\"score\": 5}\n```" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = make_client(&server, DEFAULT_MODEL)
            .generate_text("rate this room", &room_photo())
            .await
            .unwrap();
        assert_eq!(text, "```json\n{\"score\": 5}\n```");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let err = make_client(&server, DEFAULT_MODEL)
            .generate_text("rate this room", &room_photo())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_is_an_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = make_client(&server, DEFAULT_MODEL)
            .generate_text("rate this room", &room_photo())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
