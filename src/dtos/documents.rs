use crate::models::{Document, DocumentStatus};
use serde::{Deserialize, Serialize};

/// Returned by `POST /documents/analyze` once the document reached a
/// terminal successful state.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeDocumentResponse {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub summary: String,
    pub status: DocumentStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    pub name: String,
    pub summary: Option<String>,
    pub status: DocumentStatus,
    pub timestamp: String,
    pub owner_id: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            summary: doc.summary,
            status: doc.status,
            timestamp: doc.timestamp.to_rfc3339(),
            owner_id: doc.owner_id,
        }
    }
}
