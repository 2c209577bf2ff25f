//! Corpus ingestion
//!
//! Reads a JSON array of records from a file into [`Document`]s and loads
//! them into a vector store in one bulk insertion, but only when the store
//! is empty. This keeps ingestion idempotent across process restarts.
//!
//! The count-check and the insert are not one transaction, so two
//! processes starting at the same time can both observe an empty store and
//! double-load. A production deployment should take an advisory lock on
//! the collection before the check.

use crate::errors::{PipelineError, Result};
use crate::store::{Document, VectorStore};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Extracts queryable metadata from a source record. Fields absent from a
/// record yield empty metadata, not an error.
pub type MetadataExtractor = Box<dyn Fn(&Map<String, Value>) -> HashMap<String, Value> + Send + Sync>;

/// Extractor that copies the named fields verbatim when present
pub fn field_extractor(fields: &[&str]) -> MetadataExtractor {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    Box::new(move |record| {
        fields
            .iter()
            .filter_map(|field| {
                record
                    .get(field)
                    .map(|value| (field.clone(), value.clone()))
            })
            .collect()
    })
}

/// A file-backed corpus of JSON records
pub struct JsonCorpus {
    path: PathBuf,
    extractor: MetadataExtractor,
}

impl JsonCorpus {
    pub fn new(path: impl Into<PathBuf>, extractor: MetadataExtractor) -> Self {
        Self {
            path: path.into(),
            extractor,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record into a document. The document text is the whole
    /// record serialized back to JSON, so all fields stay searchable.
    /// Ids are fresh UUIDs; Qdrant only accepts unsigned integers or
    /// UUIDs as point ids.
    pub fn read(&self) -> Result<Vec<Document>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let records: Vec<Map<String, Value>> = serde_json::from_str(&contents)?;

        let documents = records
            .into_iter()
            .map(|record| {
                let metadata = (self.extractor)(&record);
                let content = serde_json::to_string(&Value::Object(record))?;
                Ok(Document::new(Uuid::new_v4().to_string(), content).with_metadata(metadata))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(documents)
    }
}

/// Loads a corpus into a store exactly once
pub struct DocumentIngestor;

impl DocumentIngestor {
    /// If the store is empty, read the corpus and bulk-insert it,
    /// returning the number of documents loaded. Otherwise a no-op
    /// returning 0.
    pub async fn ingest_if_empty(corpus: &JsonCorpus, store: &dyn VectorStore) -> Result<usize> {
        let stored = store.count().await?;
        if stored > 0 {
            info!(stored, "Corpus already loaded into vector store");
            return Ok(0);
        }

        let documents = corpus.read()?;
        if documents.is_empty() {
            return Err(PipelineError::Config(format!(
                "Corpus {} holds no records",
                corpus.path().display()
            )));
        }

        let loaded = documents.len();
        info!(loaded, "Loading corpus into vector store");
        store.add(documents).await?;

        Ok(loaded)
    }
}
