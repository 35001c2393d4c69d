//! Image description through a multimodal model.

pub mod gemini;
pub mod image;
pub mod prompt;

use async_trait::async_trait;

use crate::error::Result;

pub use gemini::GeminiClient;
pub use image::{mime_from_path, ImageInput};
pub use prompt::{build_follow_up_prompt, build_initial_prompt};

/// Send a prompt, optionally with an image, and get text back
#[async_trait]
pub trait Describer: Send + Sync {
    async fn describe(&self, prompt: &str, image: Option<&ImageInput>) -> Result<String>;
}
