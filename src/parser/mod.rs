//! Structured output conversion
//!
//! Turns raw completion text into a typed record. The converter also
//! produces the "format instructions" string handed to the model so its
//! answer maps onto the target schema; generating that string is pure and
//! deterministic given the schema.

use crate::errors::{PipelineError, Result};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Schema description of a target record shape, derived once per type
pub trait OutputSchema {
    /// JSON-schema description of the record
    fn schema() -> serde_json::Value;
}

/// Converts raw LLM text into a typed record
pub struct OutputConverter<T> {
    format: String,
    _target: PhantomData<T>,
}

impl<T: OutputSchema + DeserializeOwned> OutputConverter<T> {
    pub fn new() -> Self {
        let schema = serde_json::to_string_pretty(&T::schema())
            .unwrap_or_else(|_| T::schema().to_string());

        let format = format!(
            "Your response should be in JSON format.\n\
             Do not include any explanations, only provide a RFC8259 compliant JSON response.\n\
             Do not include markdown code blocks in your response.\n\
             Here is the JSON Schema instance your output must adhere to:\n{schema}"
        );

        Self {
            format,
            _target: PhantomData,
        }
    }

    /// Format instructions for the model
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse the raw completion text into the target record. Failures
    /// carry the raw text for diagnostics.
    pub fn parse(&self, raw: &str) -> Result<T> {
        let payload = strip_code_fences(raw);
        serde_json::from_str(payload).map_err(|e| PipelineError::ParseFailure {
            message: e.to_string(),
            raw: raw.to_string(),
        })
    }
}

impl<T: OutputSchema + DeserializeOwned> Default for OutputConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Models often wrap JSON in markdown fences despite instructions; strip a
/// single leading/trailing fence pair if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
