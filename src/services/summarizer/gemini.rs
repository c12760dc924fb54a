//! Gemini summarization provider.
//!
//! Text content is sent inline with the instruction prompt. Native content
//! (provider-side extraction) is first uploaded through the Files API; the
//! transient file is deleted after the completion returns, on success and
//! failure alike.

use super::{SummarizeError, Summarizer, SUMMARY_PROMPT};
use crate::config::GeminiConfig;
use crate::services::extractor::ExtractedContent;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_UPLOAD_BASE: &str = "https://generativelanguage.googleapis.com/upload/v1beta";

/// Ceiling on one provider call; summarization of large documents is slow.
const REQUEST_TIMEOUT_SECS: u64 = 600;

pub struct GeminiSummarizer {
    config: GeminiConfig,
    client: Client,
}

impl GeminiSummarizer {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE, self.config.model, method, self.config.api_key
        )
    }

    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, SummarizeError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.3),
                top_k: Some(32),
                top_p: Some(0.8),
            }),
        };

        let url = self.api_url("generateContent");

        tracing::debug!(model = %self.config.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Api(format!("Failed to parse response: {}", e)))?;

        if let Some("SAFETY") = api_response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            return Err(SummarizeError::Api(
                "completion blocked by provider safety filters".to_string(),
            ));
        }

        let text = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| match p {
                ContentPart::Text { text } => Some(text.clone()),
                _ => None,
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or(SummarizeError::EmptyCompletion)?;

        Ok(text)
    }

    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<UploadedFile, SummarizeError> {
        let url = format!("{}/files?key={}", GEMINI_UPLOAD_BASE, self.config.api_key);

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, media_type.to_string())
            .body(bytes)
            .send()
            .await
            .map_err(|e| SummarizeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api(format!(
                "Gemini file upload failed {}: {}",
                status, error_text
            )));
        }

        let created: CreateFileResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Api(format!("Failed to parse upload response: {}", e)))?;

        tracing::debug!(file = %created.file.name, "Uploaded transient file to Gemini");

        Ok(created.file)
    }

    /// Transient files count against provider-side storage; a failed delete
    /// is logged but never turned into a request failure.
    async fn delete_file(&self, name: &str) {
        let url = format!("{}/{}?key={}", GEMINI_API_BASE, name, self.config.api_key);

        match self.client.delete(&url).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    file = %name,
                    status = %response.status(),
                    "Failed to delete transient Gemini file"
                );
            }
            Ok(_) => {
                tracing::debug!(file = %name, "Deleted transient Gemini file");
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Failed to delete transient Gemini file");
            }
        }
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, content: ExtractedContent) -> Result<String, SummarizeError> {
        match content {
            ExtractedContent::Text(text) => {
                let parts = vec![
                    ContentPart::Text {
                        text: SUMMARY_PROMPT.to_string(),
                    },
                    ContentPart::Text { text },
                ];
                self.generate(parts).await
            }
            ExtractedContent::Native { bytes, media_type } => {
                let file = self.upload_file(bytes, &media_type).await?;

                let parts = vec![
                    ContentPart::Text {
                        text: SUMMARY_PROMPT.to_string(),
                    },
                    ContentPart::FileData {
                        file_data: FileData {
                            mime_type: media_type,
                            file_uri: file.uri.clone(),
                        },
                    },
                ];

                let result = self.generate(parts).await;
                self.delete_file(&file.name).await;
                result
            }
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    FileData { file_data: FileData },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateFileResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    name: String,
    uri: String,
}
