//! Typed metadata filters and search requests
//!
//! Translates a typed predicate over document metadata into a request the
//! vector store can consume. No fuzzy logic lives here; similarity ranking
//! belongs to the store. Building a request is deterministic and has no
//! side effects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Comparison operator for a metadata predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A predicate over one metadata field, e.g. `pontiffNumber >= 267`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterExpression {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Evaluate the predicate against a document's metadata. Numeric
    /// comparisons go through f64; non-numeric values only support Eq.
    /// A missing field never matches.
    pub fn matches(&self, metadata: &HashMap<String, Value>) -> bool {
        let Some(actual) = metadata.get(&self.field) else {
            return false;
        };

        match (actual.as_f64(), self.value.as_f64()) {
            (Some(actual), Some(expected)) => match self.operator {
                FilterOperator::Eq => actual == expected,
                FilterOperator::Gt => actual > expected,
                FilterOperator::Gte => actual >= expected,
                FilterOperator::Lt => actual < expected,
                FilterOperator::Lte => actual <= expected,
            },
            _ => self.operator == FilterOperator::Eq && actual == &self.value,
        }
    }
}

/// A similarity-search request: free-text query plus optional metadata
/// filter, result limit, and score threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub filter: Option<FilterExpression>,
    pub top_k: usize,
    pub threshold: f32,
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    /// Same request with a different query text
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self.clone()
        }
    }
}

/// Builder for [`SearchRequest`]
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    query: String,
    filter: Option<FilterExpression>,
    top_k: usize,
    threshold: f32,
}

impl Default for SearchRequestBuilder {
    fn default() -> Self {
        Self {
            query: String::new(),
            filter: None,
            top_k: 4,
            threshold: 0.0,
        }
    }
}

impl SearchRequestBuilder {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn build(self) -> SearchRequest {
        SearchRequest {
            query: self.query,
            filter: self.filter,
            top_k: self.top_k,
            threshold: self.threshold,
        }
    }
}
