//! File-backed prompt templates
//!
//! Templates use `{variable}` placeholders. Rendering is a straight
//! substitution pass; an unknown placeholder left in the output is a
//! configuration error so typos fail loudly instead of reaching the model.

use crate::errors::{PipelineError, Result};
use std::collections::HashMap;
use std::path::Path;

/// A prompt template with `{variable}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Load a template from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let template = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::new(template.trim_end()))
    }

    /// Placeholder names appearing in the template
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            rest = &rest[start + 1..];
            if let Some(end) = rest.find('}') {
                let name = &rest[..end];
                if !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    names.push(name);
                }
                rest = &rest[end + 1..];
            }
        }
        names
    }

    /// Render with the given variables. Every placeholder in the template
    /// must be bound; substituted values are inserted verbatim.
    pub fn render(&self, variables: &HashMap<&str, String>) -> Result<String> {
        for name in self.placeholders() {
            if !variables.contains_key(name) {
                return Err(PipelineError::Config(format!(
                    "Unbound template placeholder: {{{name}}}"
                )));
            }
        }

        let mut rendered = self.template.clone();
        for (name, value) in variables {
            rendered = rendered.replace(&format!("{{{name}}}"), value);
        }

        Ok(rendered)
    }

    /// Render a template that takes no variables
    pub fn render_plain(&self) -> Result<String> {
        self.render(&HashMap::new())
    }
}
