pub mod client;
pub mod content;
pub mod files;
pub mod image;
pub mod types;

pub use client::{build_http_client, GeminiHttpClient};
pub use content::GeminiContentClient;
pub use files::GeminiFileClient;
pub use image::GeminiImageEditClient;
