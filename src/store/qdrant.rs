//! Qdrant-backed vector store
//!
//! Documents are embedded through the [`Embedder`] collaborator and stored
//! as points whose payload carries the content plus queryable metadata.
//! Filter expressions translate to Qdrant range/match conditions.

use crate::chat::Embedder;
use crate::errors::{PipelineError, Result};
use crate::retrieval::{FilterExpression, FilterOperator, SearchRequest};
use crate::store::{Document, ScoredDocument, VectorStore};
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        condition::ConditionOneOf, r#match::MatchValue, value::Kind,
        vectors_config::Config, with_payload_selector::SelectorOptions, Condition,
        CreateCollection, Distance, FieldCondition, Filter, Match, PointStruct, Range,
        SearchPoints, Value as QdrantValue, VectorParams, VectorsConfig, WithPayloadSelector,
    },
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Payload key holding the document text
const CONTENT_KEY: &str = "content";

/// Default embedding dimension (nomic-embed-text)
pub const DEFAULT_EMBEDDING_DIM: u64 = 768;

/// Vector store backed by a Qdrant collection
pub struct QdrantVectorStore {
    client: QdrantClient,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantVectorStore {
    /// Connect to Qdrant and make sure the collection exists
    pub async fn connect(
        url: &str,
        collection: &str,
        embedding_dim: u64,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        let store = Self {
            client,
            collection: collection.to_string(),
            embedder,
        };
        store.ensure_collection(embedding_dim).await?;

        Ok(store)
    }

    async fn ensure_collection(&self, embedding_dim: u64) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(&CreateCollection {
                    collection_name: self.collection.clone(),
                    vectors_config: Some(VectorsConfig {
                        config: Some(Config::Params(VectorParams {
                            size: embedding_dim,
                            distance: Distance::Cosine.into(),
                            ..Default::default()
                        })),
                    }),
                    ..Default::default()
                })
                .await
                .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;
        }

        Ok(())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn count(&self) -> Result<u64> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }

    async fn add(&self, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(documents.len());
        for doc in documents {
            let embedding = self.embedder.embed(&doc.content).await?;

            let mut payload: HashMap<String, QdrantValue> = HashMap::new();
            for (key, value) in doc.metadata {
                payload.insert(key, json_to_qdrant_value(value));
            }
            payload.insert(CONTENT_KEY.to_string(), QdrantValue::from(doc.content));

            points.push(PointStruct::new(doc.id, embedding, payload));
        }

        self.client
            .upsert_points_blocking(&self.collection, None, points, None)
            .await
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ScoredDocument>> {
        let query_embedding = self.embedder.embed(&request.query).await?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector: query_embedding,
                limit: request.top_k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                score_threshold: Some(request.threshold),
                filter: request.filter.as_ref().map(to_qdrant_filter),
                ..Default::default()
            })
            .await
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        let results = search_result
            .result
            .into_iter()
            .map(|point| {
                let mut payload = point.payload;
                let content = payload
                    .remove(CONTENT_KEY)
                    .and_then(|v| qdrant_value_to_string(&v))
                    .unwrap_or_default();

                let mut metadata = HashMap::new();
                for (key, value) in payload {
                    if let Some(json) = qdrant_to_json_value(&value) {
                        metadata.insert(key, json);
                    }
                }

                ScoredDocument {
                    document: Document {
                        id: point_id_to_string(&point.id),
                        content,
                        metadata,
                    },
                    score: point.score,
                }
            })
            .collect();

        Ok(results)
    }
}

/// Translate a typed predicate into a Qdrant filter
fn to_qdrant_filter(expression: &FilterExpression) -> Filter {
    let condition = match expression.operator {
        FilterOperator::Eq => FieldCondition {
            key: expression.field.clone(),
            r#match: Some(Match {
                match_value: Some(json_to_match_value(&expression.value)),
            }),
            ..Default::default()
        },
        _ => {
            let bound = expression.value.as_f64().unwrap_or_default();
            let range = match expression.operator {
                FilterOperator::Gt => Range {
                    gt: Some(bound),
                    ..Default::default()
                },
                FilterOperator::Gte => Range {
                    gte: Some(bound),
                    ..Default::default()
                },
                FilterOperator::Lt => Range {
                    lt: Some(bound),
                    ..Default::default()
                },
                FilterOperator::Lte => Range {
                    lte: Some(bound),
                    ..Default::default()
                },
                FilterOperator::Eq => unreachable!(),
            };
            FieldCondition {
                key: expression.field.clone(),
                range: Some(range),
                ..Default::default()
            }
        }
    };

    Filter {
        must: vec![Condition {
            condition_one_of: Some(ConditionOneOf::Field(condition)),
        }],
        ..Default::default()
    }
}

fn json_to_match_value(value: &JsonValue) -> MatchValue {
    match value {
        JsonValue::Bool(b) => MatchValue::Boolean(*b),
        JsonValue::Number(n) if n.is_i64() => MatchValue::Integer(n.as_i64().unwrap_or(0)),
        JsonValue::Number(n) => MatchValue::Integer(n.as_f64().unwrap_or(0.0) as i64),
        other => MatchValue::Keyword(other.as_str().unwrap_or_default().to_string()),
    }
}

fn json_to_qdrant_value(json: JsonValue) -> QdrantValue {
    match json {
        JsonValue::String(s) => QdrantValue::from(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                QdrantValue::from(i)
            } else if let Some(f) = n.as_f64() {
                QdrantValue::from(f)
            } else {
                QdrantValue::from(0)
            }
        }
        JsonValue::Bool(b) => QdrantValue::from(b),
        _ => QdrantValue::from(""),
    }
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
        Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
        Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
        Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
        _ => None,
    })
}

fn qdrant_value_to_string(value: &QdrantValue) -> Option<String> {
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(s.clone()),
        _ => None,
    })
}

fn point_id_to_string(point_id: &Option<qdrant_client::qdrant::PointId>) -> String {
    use qdrant_client::qdrant::point_id::PointIdOptions;
    point_id
        .as_ref()
        .map(|id| match &id.point_id_options {
            Some(PointIdOptions::Num(n)) => n.to_string(),
            Some(PointIdOptions::Uuid(u)) => u.clone(),
            None => "unknown".to_string(),
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gte_translates_to_range() {
        let filter = to_qdrant_filter(&FilterExpression::new(
            "pontiffNumber",
            FilterOperator::Gte,
            267,
        ));

        let Some(ConditionOneOf::Field(field)) = &filter.must[0].condition_one_of else {
            panic!("expected field condition");
        };
        assert_eq!(field.key, "pontiffNumber");
        assert_eq!(field.range.as_ref().unwrap().gte, Some(267.0));
        assert!(field.r#match.is_none());
    }

    #[test]
    fn test_eq_on_string_translates_to_keyword_match() {
        let filter = to_qdrant_filter(&FilterExpression::new(
            "englishName",
            FilterOperator::Eq,
            "Francis",
        ));

        let Some(ConditionOneOf::Field(field)) = &filter.must[0].condition_one_of else {
            panic!("expected field condition");
        };
        assert_eq!(
            field.r#match.as_ref().unwrap().match_value,
            Some(MatchValue::Keyword("Francis".to_string()))
        );
    }

    #[test]
    fn test_json_qdrant_value_roundtrip() {
        let original = json!(267);
        let qdrant = json_to_qdrant_value(original.clone());
        assert_eq!(qdrant_to_json_value(&qdrant), Some(original));
    }

    #[tokio::test]
    #[ignore] // Integration test - requires Qdrant and Ollama
    async fn test_connect_and_count() {
        use crate::chat::OllamaChatClient;

        let embedder = Arc::new(OllamaChatClient::new().unwrap());
        let store = QdrantVectorStore::connect(
            "http://localhost:6334",
            "popes_test",
            DEFAULT_EMBEDDING_DIM,
            embedder,
        )
        .await
        .unwrap();

        assert_eq!(store.collection(), "popes_test");
        store.count().await.unwrap();
    }
}
