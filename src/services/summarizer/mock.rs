//! Mock summarizer for tests and provider-less local runs.

use super::{SummarizeError, Summarizer};
use crate::services::extractor::ExtractedContent;
use async_trait::async_trait;

pub struct MockSummarizer {
    fail: bool,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A summarizer whose every call fails, for exercising the FAILED path.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, content: ExtractedContent) -> Result<String, SummarizeError> {
        if self.fail {
            return Err(SummarizeError::Api(
                "mock provider failure".to_string(),
            ));
        }

        // Simulate provider latency; also keeps the two store writes of one
        // analysis on distinct timestamps.
        tokio::time::sleep(tokio::time::Duration::from_millis(25)).await;

        let source = match content {
            ExtractedContent::Text(text) => text,
            ExtractedContent::Native { media_type, .. } => media_type,
        };

        Ok(format!(
            "Кратко обобщение на документа: основни точки, цели и заключения. ({})",
            source.chars().take(40).collect::<String>()
        ))
    }
}
