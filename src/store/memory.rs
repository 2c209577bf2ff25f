//! In-memory vector store
//!
//! Scores documents by term overlap with the query instead of embeddings,
//! which is enough for tests and offline demo runs. Filter semantics are
//! identical to the Qdrant store's.

use crate::errors::Result;
use crate::retrieval::SearchRequest;
use crate::store::{Document, ScoredDocument, VectorStore};
use async_trait::async_trait;
use std::sync::Mutex;

/// Vector store backed by a plain in-process list
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    documents: Mutex<Vec<Document>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fraction of query terms that occur in the document content
fn term_overlap(query: &str, content: &str) -> f32 {
    let content = content.to_lowercase();
    let terms: Vec<String> = query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if terms.is_empty() {
        return 0.0;
    }

    let hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
    hits as f32 / terms.len() as f32
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn count(&self) -> Result<u64> {
        let documents = self.documents.lock().expect("store lock poisoned");
        Ok(documents.len() as u64)
    }

    async fn add(&self, mut new_documents: Vec<Document>) -> Result<()> {
        let mut documents = self.documents.lock().expect("store lock poisoned");
        documents.append(&mut new_documents);
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ScoredDocument>> {
        let documents = self.documents.lock().expect("store lock poisoned");

        let mut results: Vec<ScoredDocument> = documents
            .iter()
            .filter(|doc| match &request.filter {
                Some(filter) => filter.matches(&doc.metadata),
                None => true,
            })
            .map(|doc| ScoredDocument {
                document: doc.clone(),
                score: term_overlap(&request.query, &doc.content),
            })
            .filter(|scored| scored.score >= request.threshold)
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(request.top_k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{FilterExpression, FilterOperator};
    use serde_json::json;
    use std::collections::HashMap;

    fn pope_doc(id: &str, number: u32, content: &str) -> Document {
        Document::new(id, content).with_metadata(HashMap::from([(
            "pontiffNumber".to_string(),
            json!(number),
        )]))
    }

    #[tokio::test]
    async fn test_count_tracks_adds() {
        let store = InMemoryVectorStore::new();
        assert_eq!(store.count().await.unwrap(), 0);

        store
            .add(vec![pope_doc("1", 266, "Francis"), pope_doc("2", 267, "Leo XIV")])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_filter_excludes_non_matching_documents() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![
                pope_doc("1", 200, "An early pope"),
                pope_doc("2", 267, "Leo XIV, elected in 2025"),
            ])
            .await
            .unwrap();

        let request = SearchRequest::builder()
            .query("pope")
            .filter(FilterExpression::new(
                "pontiffNumber",
                FilterOperator::Gte,
                267,
            ))
            .build();

        let results = store.search(&request).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "2");
    }

    #[tokio::test]
    async fn test_results_ranked_by_overlap() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![
                Document::new("1", "Unrelated trivia about councils"),
                Document::new("2", "Leo XIV became pope in 2025"),
            ])
            .await
            .unwrap();

        let request = SearchRequest::builder().query("pope 2025").build();
        let results = store.search(&request).await.unwrap();
        assert_eq!(results[0].document.id, "2");
    }

    #[tokio::test]
    async fn test_top_k_truncates() {
        let store = InMemoryVectorStore::new();
        store
            .add((0..10).map(|i| Document::new(i.to_string(), "pope")).collect())
            .await
            .unwrap();

        let request = SearchRequest::builder().query("pope").top_k(3).build();
        assert_eq!(store.search(&request).await.unwrap().len(), 3);
    }
}
