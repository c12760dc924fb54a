//! The document-analysis workflow.
//!
//! Every submission is bracketed by two store writes: a PENDING record
//! before any processing, and exactly one terminal record (COMPLETED or
//! FAILED) when processing ends. An operator can therefore tell "never
//! started", "stuck processing" and "finished" apart purely from stored
//! state.

use crate::dtos::AnalyzeDocumentResponse;
use crate::error::AppError;
use crate::models::DocumentStatus;
use crate::services::extractor::{resolve_media_type, ContentExtractor};
use crate::services::store::DocumentStore;
use crate::services::summarizer::Summarizer;
use std::sync::Arc;
use uuid::Uuid;

const FALLBACK_NAME: &str = "unnamed";

pub struct AnalysisService {
    store: Arc<dyn DocumentStore>,
    summarizer: Arc<dyn Summarizer>,
    extractor: ContentExtractor,
}

impl AnalysisService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        summarizer: Arc<dyn Summarizer>,
        extractor: ContentExtractor,
    ) -> Self {
        Self {
            store,
            summarizer,
            extractor,
        }
    }

    pub async fn analyze(
        &self,
        bytes: Vec<u8>,
        declared_type: Option<&str>,
        filename: Option<&str>,
        owner_id: &str,
    ) -> Result<AnalyzeDocumentResponse, AppError> {
        let id = Uuid::new_v4().to_string();
        let name = filename
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string();
        let media_type = resolve_media_type(declared_type, &name);

        // The PENDING write must land before any processing, so a crash
        // mid-processing still leaves a discoverable record.
        self.store
            .put(&id, &name, None, DocumentStatus::Pending, owner_id)
            .await?;

        tracing::info!(
            document_id = %id,
            owner = %owner_id,
            name = %name,
            media_type = %media_type,
            size = bytes.len(),
            "Document analysis started"
        );

        let content = match self.extractor.extract(&bytes, &media_type) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    document_id = %id,
                    owner = %owner_id,
                    stage = "extract",
                    error = %e,
                    "Content extraction failed"
                );
                self.record_failure(&id, &name, owner_id, "extract").await;
                return Err(AppError::UnprocessableEntity(anyhow::anyhow!(
                    "Failed to extract document content: {}",
                    e
                )));
            }
        };

        let summary = match self.summarizer.summarize(content).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(
                    document_id = %id,
                    owner = %owner_id,
                    stage = "summarize",
                    error = %e,
                    "Summarization failed"
                );
                self.record_failure(&id, &name, owner_id, "summarize").await;
                return Err(AppError::InternalError(anyhow::anyhow!(
                    "Failed to summarize document: {}",
                    e
                )));
            }
        };

        if let Err(e) = self
            .store
            .put(
                &id,
                &name,
                Some(summary.clone()),
                DocumentStatus::Completed,
                owner_id,
            )
            .await
        {
            tracing::error!(
                document_id = %id,
                owner = %owner_id,
                stage = "persist",
                error = %e,
                "Failed to persist completed document"
            );
            self.record_failure(&id, &name, owner_id, "persist").await;
            return Err(AppError::from(e));
        }

        tracing::info!(document_id = %id, owner = %owner_id, "Document analysis completed");

        Ok(AnalyzeDocumentResponse {
            document_id: id,
            summary,
            status: DocumentStatus::Completed,
        })
    }

    /// Best-effort terminal write. Its own failure is logged with enough
    /// context to correlate with the stored record, and never masks the
    /// error being surfaced to the caller.
    async fn record_failure(&self, id: &str, name: &str, owner_id: &str, stage: &str) {
        if let Err(e) = self
            .store
            .put(id, name, None, DocumentStatus::Failed, owner_id)
            .await
        {
            tracing::error!(
                document_id = %id,
                owner = %owner_id,
                stage = %stage,
                error = %e,
                "Failed to record FAILED status"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionMode;
    use crate::services::store::MemoryStore;
    use crate::services::summarizer::MockSummarizer;

    fn service_with(summarizer: MockSummarizer) -> (Arc<MemoryStore>, AnalysisService) {
        let store = Arc::new(MemoryStore::new());
        let service = AnalysisService::new(
            store.clone(),
            Arc::new(summarizer),
            ContentExtractor::new(ExtractionMode::Local),
        );
        (store, service)
    }

    #[tokio::test]
    async fn successful_analysis_ends_completed_with_a_summary() {
        let (store, service) = service_with(MockSummarizer::new());

        let response = service
            .analyze(
                b"Q3 revenue grew 12%.".to_vec(),
                Some("text/plain"),
                Some("report.txt"),
                "u1",
            )
            .await
            .unwrap();

        assert_eq!(response.status, DocumentStatus::Completed);
        assert!(!response.summary.is_empty());

        let stored = store.get(&response.document_id, "u1").await.unwrap();
        assert_eq!(stored.status, DocumentStatus::Completed);
        assert_eq!(stored.summary.as_deref(), Some(response.summary.as_str()));
        assert_eq!(stored.name, "report.txt");
    }

    #[tokio::test]
    async fn extraction_failure_records_failed_without_a_summary() {
        let (store, service) = service_with(MockSummarizer::new());

        let err = service
            .analyze(Vec::new(), Some("text/plain"), Some("empty.txt"), "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let documents = store.list("u1").await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].status, DocumentStatus::Failed);
        assert!(documents[0].summary.is_none());
    }

    #[tokio::test]
    async fn provider_failure_records_failed_and_reports_server_error() {
        let (store, service) = service_with(MockSummarizer::failing());

        let err = service
            .analyze(
                b"some content".to_vec(),
                Some("text/plain"),
                Some("report.txt"),
                "u1",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));

        let documents = store.list("u1").await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].status, DocumentStatus::Failed);
        assert!(documents[0].summary.is_none());
    }

    #[tokio::test]
    async fn missing_filename_falls_back_to_a_placeholder() {
        let (store, service) = service_with(MockSummarizer::new());

        let response = service
            .analyze(b"content".to_vec(), Some("text/plain"), None, "u1")
            .await
            .unwrap();

        let stored = store.get(&response.document_id, "u1").await.unwrap();
        assert_eq!(stored.name, "unnamed");
    }
}
