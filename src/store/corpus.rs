use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::kv::KeyValue;

const PLAIN_KEY: &str = "custom_texts";
const RESUMABLE_KEY: &str = "custom_texts_long";

/// Plain texts restart from the beginning every time; resumable ones keep a
/// word offset so long texts can be typed across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextVariant {
    Plain,
    Resumable,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResumableEntry {
    pub text: String,
    #[serde(default)]
    pub progress: u32,
}

/// Named practice texts over a key-value store. Each variant keeps its whole
/// namespace as one map under a single storage key.
pub struct CorpusStore<S: KeyValue> {
    store: S,
}

impl<S: KeyValue> CorpusStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Words are joined with single spaces before storage. Saving a
    /// resumable text resets its progress to the start.
    pub fn save(&mut self, variant: TextVariant, name: &str, words: &[String]) -> Result<()> {
        let text = words.join(" ");
        match variant {
            TextVariant::Plain => {
                let mut texts = self.load_plain()?;
                texts.insert(name.to_string(), text);
                self.save_plain(&texts)?;
            }
            TextVariant::Resumable => {
                let mut texts = self.load_resumable()?;
                texts.insert(name.to_string(), ResumableEntry { text, progress: 0 });
                self.save_resumable(&texts)?;
            }
        }
        tracing::debug!(name = %name, ?variant, "Saved custom text");
        Ok(())
    }

    pub fn load(&self, variant: TextVariant, name: &str) -> Result<Vec<String>> {
        let text = match variant {
            TextVariant::Plain => self.load_plain()?.remove(name),
            TextVariant::Resumable => self.load_resumable()?.remove(name).map(|e| e.text),
        };
        match text {
            Some(text) => Ok(split_words(&text)),
            None => Err(Error::NotFound(name.to_string())),
        }
    }

    /// Removing a name that was never saved is fine.
    pub fn delete(&mut self, variant: TextVariant, name: &str) -> Result<()> {
        match variant {
            TextVariant::Plain => {
                let mut texts = self.load_plain()?;
                if texts.remove(name).is_some() {
                    self.save_plain(&texts)?;
                }
            }
            TextVariant::Resumable => {
                let mut texts = self.load_resumable()?;
                if texts.remove(name).is_some() {
                    self.save_resumable(&texts)?;
                }
            }
        }
        Ok(())
    }

    /// Saved names, sorted.
    pub fn list(&self, variant: TextVariant) -> Result<Vec<String>> {
        Ok(match variant {
            TextVariant::Plain => self.load_plain()?.into_keys().collect(),
            TextVariant::Resumable => self.load_resumable()?.into_keys().collect(),
        })
    }

    pub fn progress(&self, name: &str) -> Result<u32> {
        self.load_resumable()?
            .get(name)
            .map(|entry| entry.progress)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn set_progress(&mut self, name: &str, progress: u32) -> Result<()> {
        let mut texts = self.load_resumable()?;
        match texts.get_mut(name) {
            Some(entry) => entry.progress = progress,
            None => return Err(Error::NotFound(name.to_string())),
        }
        self.save_resumable(&texts)
    }

    fn load_plain(&self) -> Result<BTreeMap<String, String>> {
        match self.store.get(PLAIN_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save_plain(&mut self, texts: &BTreeMap<String, String>) -> Result<()> {
        self.store
            .set(PLAIN_KEY, &serde_json::to_vec_pretty(texts)?)
    }

    fn load_resumable(&self) -> Result<BTreeMap<String, ResumableEntry>> {
        match self.store.get(RESUMABLE_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save_resumable(&mut self, texts: &BTreeMap<String, ResumableEntry>) -> Result<()> {
        self.store
            .set(RESUMABLE_KEY, &serde_json::to_vec_pretty(texts)?)
    }
}

fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Limit applied when drawing words from the active text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitMode {
    Word,
    Time,
    Section,
}

/// The in-memory working text. Session state only; named texts go through
/// `CorpusStore`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveText {
    words: Vec<String>,
    pub limit_value: u32,
    pub limit_mode: LimitMode,
    /// Split input on `|` into sections instead of on whitespace.
    pub pipe_delimiter: bool,
}

impl Default for ActiveText {
    fn default() -> Self {
        Self {
            words: split_words("The quick brown fox jumps over the lazy dog"),
            limit_value: 1,
            limit_mode: LimitMode::Word,
            pipe_delimiter: false,
        }
    }
}

impl ActiveText {
    pub fn set_text(&mut self, text: &str) {
        self.words = if self.pipe_delimiter {
            text.split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            split_words(text)
        };
    }

    pub fn set_words(&mut self, words: Vec<String>) {
        self.words = words;
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}
