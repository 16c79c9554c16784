//! Ollama adapter for keyword generation.
//!
//! Talks to a locally running Ollama daemon over its blocking HTTP API:
//! `/api/chat` for the vision-language keyword call and `/api/tags` for
//! the model inventory backing the preflight check.

use std::io::Cursor;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use photo_tagger_core::{KeywordProvider, PhotoInfo};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default daemon endpoint.
pub const DEFAULT_URL: &str = "http://localhost:11434";
/// Default vision-language model.
pub const DEFAULT_MODEL: &str = "llava:7b";

/// Fixed keyword prompt sent with every photo.
const KEYWORD_PROMPT: &str = "Analyze this image and provide exactly 6-8 essential keywords only. \
    Focus on the most important elements: main subject, key action, setting, mood. \
    Use single words or simple phrases. Separate with commas. Be concise and avoid \
    overly specific details. Example: 'woman, portrait, smiling, indoor, casual, natural'.";

/// Longest image edge sent to the model.
const MAX_IMAGE_EDGE: u32 = 1024;
/// JPEG quality for the model payload.
const JPEG_QUALITY: u8 = 85;
/// Keyword length bounds after cleaning.
const KEYWORD_LEN: std::ops::RangeInclusive<usize> = 2..=24;

/// Blocking Ollama API client.
pub struct OllamaClient {
    base_url: String,
    model: String,
    http: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
    images: Vec<String>,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    name: String,
}

impl OllamaClient {
    /// Creates a client for the given daemon URL and model name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            http,
        })
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns true when the daemon answers its inventory endpoint.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.list_models().is_ok()
    }

    /// Lists the models installed in the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon is unreachable or answers garbage.
    pub fn list_models(&self) -> Result<Vec<String>> {
        let response: TagsResponse = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .context("Ollama daemon not reachable")?
            .error_for_status()
            .context("Ollama daemon returned an error")?
            .json()
            .context("Failed to parse model inventory")?;

        Ok(response.models.into_iter().map(|m| m.name).collect())
    }

    /// Returns true when the configured model is installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory cannot be fetched.
    pub fn has_model(&self) -> Result<bool> {
        let models = self.list_models()?;
        Ok(models.iter().any(|name| *name == self.model))
    }

    /// Downscales and JPEG-encodes the photo for the model payload.
    fn encode_image(photo: &PhotoInfo) -> Result<String> {
        let image = if photo.width.max(photo.height) > MAX_IMAGE_EDGE {
            photo.image.thumbnail(MAX_IMAGE_EDGE, MAX_IMAGE_EDGE)
        } else {
            photo.image.clone()
        };

        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
        image
            .to_rgb8()
            .write_with_encoder(encoder)
            .context("Failed to encode image payload")?;

        Ok(BASE64.encode(&buffer))
    }
}

impl KeywordProvider for OllamaClient {
    fn keywords(&self, photo: &PhotoInfo) -> Result<Vec<String>> {
        let payload = Self::encode_image(photo)?;
        trace!("Encoded {} ({} bytes base64)", photo.path, payload.len());

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: KEYWORD_PROMPT,
                images: vec![payload],
            }],
            stream: false,
            options: ChatOptions {
                temperature: 0.3,
                num_predict: 50,
            },
        };

        let response: ChatResponse = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .with_context(|| format!("Keyword request failed for {}", photo.path))?
            .error_for_status()
            .context("Ollama returned an error")?
            .json()
            .context("Failed to parse keyword response")?;

        let keywords = clean_keywords(&response.message.content);
        debug!("{}: {} keywords", photo.path, keywords.len());
        Ok(keywords)
    }
}

/// Splits a model response on commas and normalizes each fragment.
///
/// Fragments are trimmed and lowercased; empties and anything outside
/// the 2..=24 character window are dropped.
#[must_use]
pub fn clean_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|fragment| fragment.trim().to_lowercase())
        .filter(|keyword| KEYWORD_LEN.contains(&keyword.chars().count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_keywords_normalizes() {
        let raw = "Woman, PORTRAIT ,  smiling,indoor";
        assert_eq!(
            clean_keywords(raw),
            vec!["woman", "portrait", "smiling", "indoor"]
        );
    }

    #[test]
    fn test_clean_keywords_drops_out_of_range_fragments() {
        let raw = "a, ok, , this keyword fragment is far too long to keep around";
        assert_eq!(clean_keywords(raw), vec!["ok"]);
    }

    #[test]
    fn test_clean_keywords_empty_response() {
        assert!(clean_keywords("").is_empty());
        assert!(clean_keywords(", ,,").is_empty());
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            model: "llava:7b",
            messages: vec![ChatMessage {
                role: "user",
                content: "prompt",
                images: vec!["aGk=".to_string()],
            }],
            stream: false,
            options: ChatOptions {
                temperature: 0.3,
                num_predict: 50,
            },
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["model"], "llava:7b");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["images"][0], "aGk=");
        assert_eq!(value["options"]["num_predict"], 50);
    }

    #[test]
    fn test_chat_response_parses() {
        let json = r#"{"model":"llava:7b","message":{"role":"assistant","content":"dog, park"},"done":true}"#;
        let response: ChatResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(clean_keywords(&response.message.content), vec!["dog", "park"]);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/", "llava:7b").expect("client");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_encode_image_produces_base64_jpeg() {
        let img = image::RgbImage::from_fn(8, 8, |x, y| image::Rgb([x as u8, y as u8, 128]));
        let photo = PhotoInfo::new("synthetic://rgb", image::DynamicImage::ImageRgb8(img));
        let payload = OllamaClient::encode_image(&photo).expect("encode");
        let bytes = BASE64.decode(payload).expect("valid base64");
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
