//! Vector store abstraction
//!
//! The pipeline talks to a store through [`VectorStore`]: bulk insertion
//! of documents with metadata, filtered similarity search, and a count of
//! stored documents. Qdrant backs the real deployment; an in-memory store
//! backs tests and offline runs.

pub mod memory;
pub mod qdrant;

use crate::errors::Result;
use crate::retrieval::SearchRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub use memory::InMemoryVectorStore;
pub use qdrant::QdrantVectorStore;

/// A document owned by the store once ingested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A document returned from similarity search, ranked by score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Boundary to the vector store collaborator
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Number of documents currently stored
    async fn count(&self) -> Result<u64>;

    /// Bulk-insert documents
    async fn add(&self, documents: Vec<Document>) -> Result<()>;

    /// Similarity search honoring the request's filter, limit, and
    /// threshold; results ordered by descending score
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ScoredDocument>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("1", "Francis was elected in 2013")
            .with_metadata(HashMap::from([("pontiffNumber".to_string(), json!(266))]));

        assert_eq!(doc.id, "1");
        assert_eq!(doc.metadata["pontiffNumber"], 266);
    }

    #[test]
    fn test_document_defaults_to_empty_metadata() {
        let doc = Document::new("1", "text");
        assert!(doc.metadata.is_empty());
    }
}
