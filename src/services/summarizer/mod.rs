pub mod gemini;
pub mod mock;

pub use gemini::GeminiSummarizer;
pub use mock::MockSummarizer;

use crate::services::extractor::ExtractedContent;
use async_trait::async_trait;
use thiserror::Error;

/// Fixed instruction for the model. The output language (Bulgarian) and the
/// point-form, ~200 word shape are part of the product contract, not caller
/// input.
pub const SUMMARY_PROMPT: &str = "Обобщи този документ на български език, като извлечеш \
основните точки, цели и ключови заключения. Отговори в сбити точки, в рамките на \
около 200 думи.";

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The provider call nominally succeeded but returned no usable text.
    #[error("provider returned an empty completion")]
    EmptyCompletion,

    #[error("provider request failed: {0}")]
    Network(String),

    #[error("provider error: {0}")]
    Api(String),
}

/// One call to the generative-model provider. No retries, no caching; a
/// failure is reported once to the orchestrator.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: ExtractedContent) -> Result<String, SummarizeError>;
}
