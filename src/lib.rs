//! popefinder - RAG chat pipeline demos
//!
//! Small demonstration of calling chat-oriented LLM backends and parsing
//! their answers into typed records. The reusable piece is the pipeline:
//! conditional corpus ingestion into a vector store, filtered semantic
//! retrieval, per-session conversation memory, system-first message
//! ordering, and structured-output parsing.

pub mod errors;
pub mod types;

pub mod chat;
pub mod ingest;
pub mod memory;
pub mod ordering;
pub mod parser;
pub mod pipeline;
pub mod retrieval;
pub mod store;

pub mod cli;
pub mod config;
pub mod prompts;

// Re-export commonly used types
pub use errors::{PipelineError, Result};
pub use pipeline::ChatPipeline;
