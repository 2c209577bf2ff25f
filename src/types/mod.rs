//! Core value types shared across the pipeline

pub mod messages;
pub mod pope;

pub use messages::{Message, Role};
pub use pope::Pope;
