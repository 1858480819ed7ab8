use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, YomitoriError};

/// Saved words, persisted as a JSON array on disk.
///
/// Loaded once at startup; `save_word` appends and writes through. The list
/// behaves as an ordered set: insertion order is kept, duplicates are
/// skipped.
#[derive(Debug)]
pub struct WordStore {
    path: PathBuf,
    words: Vec<String>,
}

impl WordStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let words = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| YomitoriError::Store(format!("Failed to parse saved words: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(count = words.len(), "Loaded saved words");
        Ok(Self { path, words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn save_word(&mut self, word: &str) -> Result<()> {
        if self.words.iter().any(|w| w == word) {
            return Ok(());
        }
        self.words.push(word.to_string());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.words)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
