//! Prompt templates loaded from disk, with built-in fallbacks.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Built-in report-synthesis prompt used when no file is provided.
pub const DEFAULT_REPORT_PROMPT: &str = "\
შენ ხარ სამედიცინო ინფორმაციის ანალიტიკოსი. შეადგინე სტრუქტურირებული, \
გასაგები ანგარიში ქართულ ენაზე მოწოდებული მონაცემების საფუძველზე. \
გამოიყენე მხოლოდ მოწოდებული ფაქტები, არ გამოიგონო ახალი ინფორმაცია. \
არ დასვა დიაგნოზი და არ გასცე მკურნალობის რეკომენდაცია.";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt not found: {0}")]
    NotFound(String),
    #[error("failed to read prompt {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads named prompt templates from a directory of `.txt` files.
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load `<dir>/<name>.txt`, trimmed.
    pub fn load(&self, name: &str) -> Result<String, PromptError> {
        let path = self.dir.join(format!("{name}.txt"));
        if !path.is_file() {
            return Err(PromptError::NotFound(name.to_string()));
        }
        let text = std::fs::read_to_string(&path).map_err(|source| PromptError::Io {
            name: name.to_string(),
            source,
        })?;
        Ok(text.trim().to_string())
    }

    /// Load a prompt, falling back to `default` when the file is absent.
    pub fn load_or(&self, name: &str, default: &str) -> String {
        match self.load(name) {
            Ok(text) => text,
            Err(err) => {
                debug!(prompt = name, error = %err, "using built-in prompt");
                default.to_string()
            }
        }
    }
}
