use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Describer, ImageInput};
use crate::config::constants::{GEMINI_API_BASE, MAX_ERROR_BODY_LEN, MODEL};
use crate::error::{Error, Result};
use crate::utils::body::truncate_body;

// Wire types for models/{model}:generateContent

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, image: Option<&'a ImageInput>) -> Self {
        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: STANDARD.encode(&image.data),
                },
            });
        }
        Self {
            contents: vec![Content { parts }],
        }
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::EmptyResponse);
    }
    Ok(text)
}

/// Gemini `generateContent` over REST, authenticated by API key
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key: api_key.into(),
            model: MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point at a different API root, e.g. a local stub
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Describer for GeminiClient {
    #[tracing::instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn describe(&self, prompt: &str, image: Option<&ImageInput>) -> Result<String> {
        let body = GenerateContentRequest::new(prompt, image);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Model(format!(
                "{}: {}",
                status,
                truncate_body(&text, MAX_ERROR_BODY_LEN)
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = extract_text(parsed)?;

        tracing::debug!(response_len = text.len(), "Description generated");
        Ok(text)
    }
}
