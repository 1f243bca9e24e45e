use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed model output. Always a JSON object.
pub type Analysis = serde_json::Map<String, serde_json::Value>;

/// Reference to a file stored by the Gemini File API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub name: String,
    pub uri: String,
    pub mime_type: String,
}

/// One entry of the `improvement_suggestions` array returned by the scoring prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImprovementSuggestion {
    #[serde(default)]
    pub target_area: String,
    #[serde(default)]
    pub suggestion: String,
}

// Configuration
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_IMAGE_PATH: &str = "./image/img2.png";
pub const DEFAULT_PROMPT_PATH: &str = "./prompt/get_score_and_solve.txt";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub image_model: String,
    pub image_path: PathBuf,
    pub prompt_path: PathBuf,
    pub base_url: String,
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_key = lookup("API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("API_KEY not set".to_string()))?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("Invalid REQUEST_TIMEOUT_SECS '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| crate::Error::Config(format!("Invalid PORT '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            model: var("GEMINI_MODEL", DEFAULT_MODEL),
            image_model: var("GEMINI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            image_path: PathBuf::from(var("ANALYZE_IMAGE_PATH", DEFAULT_IMAGE_PATH)),
            prompt_path: PathBuf::from(var("ANALYZE_PROMPT_PATH", DEFAULT_PROMPT_PATH)),
            base_url: var("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            request_timeout: Duration::from_secs(request_timeout),
            host: var("HOST", DEFAULT_HOST),
            port,
        })
    }

    /// Check that the image and prompt files exist.
    ///
    /// Run once at startup; a failure here should stop the process before it
    /// accepts any request.
    pub fn validate(&self) -> crate::Result<()> {
        for (label, path) in [("image", &self.image_path), ("prompt", &self.prompt_path)] {
            if !path.is_file() {
                return Err(crate::Error::Config(format!(
                    "{} file not found: {}",
                    label,
                    path.display()
                )));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
