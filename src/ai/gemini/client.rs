use super::types::{GenerateContentRequest, GenerateContentResponse, UploadFileResponse};
use crate::models::{UploadedFile, DEFAULT_BASE_URL};
use crate::{Error, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Build the shared HTTP client used for every Gemini call.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Lightweight Gemini REST client used by the content, file and image modules.
#[derive(Clone)]
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await?;
        tracing::error!("Gemini API error (status {}): {}", status, error_text);
        Err(Error::AiProvider(format!(
            "Gemini API error (status {}): {}",
            status, error_text
        )))
    }

    async fn parse_body<Resp: DeserializeOwned>(response: Response) -> Result<Resp> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }

    async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: String,
        request: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        Self::parse_body(Self::ensure_success(response).await?).await
    }

    /// Calls `generateContent` on `model`.
    ///
    /// `model` may be given bare (`gemini-2.5-flash`) or with a `models/` prefix.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        self.post_json(url, request).await
    }

    /// Store `bytes` with the File API using the resumable protocol.
    ///
    /// The first request opens an upload session and returns its URL in the
    /// `x-goog-upload-url` header; the second sends the bytes and finalizes.
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFile> {
        let start_url = format!("{}/upload/v1beta/files", self.base_url);
        let response = self
            .client
            .post(&start_url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to start Gemini file upload: {}", e);
                e
            })?;
        let response = Self::ensure_success(response).await?;

        let upload_url = response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::AiProvider("Gemini upload session returned no upload URL".to_string())
            })?;

        tracing::debug!("Uploading {} bytes ({}) to Gemini", bytes.len(), mime_type);

        let response = self
            .client
            .post(&upload_url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload file bytes to Gemini: {}", e);
                e
            })?;

        let uploaded: UploadFileResponse =
            Self::parse_body(Self::ensure_success(response).await?).await?;
        Ok(uploaded.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::ai::gemini::types::{Content, Part};
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiHttpClient {
        GeminiHttpClient::new("test-key".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_content_sends_api_key_header() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "hi" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("hello")])],
            generation_config: None,
        };
        let response = make_client(&server)
            .generate_content("models/gemini-2.5-flash", &request)
            .await
            .unwrap();
        assert_eq!(response.text().as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_generate_content_surfaces_api_errors() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let request = GenerateContentRequest {
            contents: vec![],
            generation_config: None,
        };
        let err = make_client(&server)
            .generate_content("gemini-2.5-flash", &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn test_upload_file_runs_resumable_protocol() {
        let server = MockServer::start().await;
        let session_url = format!("{}/upload-session/123", server.uri());

        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .and(header("X-Goog-Upload-Protocol", "resumable"))
            .and(header("X-Goog-Upload-Command", "start"))
            .and(header("X-Goog-Upload-Header-Content-Length", "4"))
            .and(header("X-Goog-Upload-Header-Content-Type", "image/png"))
            .respond_with(
                ResponseTemplate::new(200).insert_header(UPLOAD_URL_HEADER, session_url.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/upload-session/123"))
            .and(header("X-Goog-Upload-Offset", "0"))
            .and(body_bytes(vec![0x89, 0x50, 0x4E, 0x47]))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "file": {
                    "name": "files/abc",
                    "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc",
                    "mimeType": "image/png",
                    "sizeBytes": "4",
                    "state": "ACTIVE"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = make_client(&server)
            .upload_file(vec![0x89, 0x50, 0x4E, 0x47], "image/png", "img2.png")
            .await
            .unwrap();

        assert_eq!(file.name, "files/abc");
        assert_eq!(file.mime_type, "image/png");
        assert!(file.uri.ends_with("/v1beta/files/abc"));

        let requests = server.received_requests().await.unwrap();
        let finalize = requests
            .iter()
            .find(|r| r.url.path() == "/upload-session/123")
            .unwrap();
        assert_eq!(
            finalize.headers.get("X-Goog-Upload-Command").unwrap(),
            "upload, finalize"
        );
    }

    #[tokio::test]
    async fn test_upload_file_requires_session_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .upload_file(vec![1, 2, 3], "image/png", "room.png")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref msg) if msg.contains("upload URL")));
    }
}
