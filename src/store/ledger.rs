use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::funbox::FunboxRegistry;
use crate::mode::{Difficulty, Mode, ModeRule};
use crate::result::TestResult;
use crate::store::kv::KeyValue;

/// The test configuration a record is scoped to. Two results compete for
/// the same record only when every component matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub mode: Mode,
    pub submode: String,
    pub punctuation: bool,
    pub language: String,
    pub difficulty: Difficulty,
    pub lazy_mode: bool,
    /// Active funbox identifiers joined with `#`, or `none`.
    pub funbox: String,
}

impl Fingerprint {
    pub fn of(result: &TestResult) -> Self {
        Self {
            mode: result.mode,
            submode: result.submode.clone(),
            punctuation: result.punctuation,
            language: result.language.clone(),
            difficulty: result.difficulty,
            lazy_mode: result.lazy_mode,
            funbox: join_funbox(&result.funbox),
        }
    }

    fn storage_key(&self) -> String {
        format!(
            "pb:{}:{}:{}:{}:{}:{}:{}",
            self.mode.as_key(),
            escape_component(&self.submode),
            self.punctuation,
            escape_component(&self.language),
            self.difficulty.as_key(),
            self.lazy_mode,
            escape_component(&self.funbox)
        )
    }

    /// Tag records drop the funbox component, so a tag record is comparable
    /// across funbox variations.
    fn tag_storage_key(&self, tag_id: &str) -> String {
        format!(
            "tagpb:{}:{}:{}:{}:{}:{}:{}",
            escape_component(tag_id),
            self.mode.as_key(),
            escape_component(&self.submode),
            self.punctuation,
            escape_component(&self.language),
            self.difficulty.as_key(),
            self.lazy_mode
        )
    }
}

/// Submodes, languages and tag ids are free-form and may contain the key
/// separator; escape it so two distinct fingerprints never share a slot.
fn escape_component(raw: &str) -> String {
    raw.replace('%', "%25").replace(':', "%3a")
}

pub fn join_funbox(funbox: &[String]) -> String {
    if funbox.is_empty() {
        "none".to_string()
    } else {
        funbox.join("#")
    }
}

/// The measurements a record keeps, all canonical (wpm / percent).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordMetrics {
    pub speed: f64,
    pub raw_speed: f64,
    pub accuracy: f64,
    pub consistency: f64,
}

impl RecordMetrics {
    pub fn of(result: &TestResult) -> Self {
        Self {
            speed: result.speed,
            raw_speed: result.raw_speed,
            accuracy: result.accuracy,
            consistency: result.consistency,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BestRecord {
    pub fingerprint: Fingerprint,
    pub metrics: RecordMetrics,
    pub timestamp: DateTime<Utc>,
}

/// Per-tag record. The fingerprint documents the run that set it; the
/// lookup key ignores its funbox component.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagBestRecord {
    pub tag_id: String,
    pub fingerprint: Fingerprint,
    pub metrics: RecordMetrics,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateOutcome {
    pub is_new_best: bool,
    /// Stored speed before the update, 0.0 when there was no record.
    pub previous: f64,
}

/// Gate for ledger writes. Lookups for display happen regardless; only
/// updates are blocked for quote mode, discarded results, and runs under a
/// modifier that is not record-eligible (or not registered at all).
pub fn update_eligible(result: &TestResult, funbox: &FunboxRegistry, dont_save: bool) -> bool {
    if dont_save {
        return false;
    }
    if !ModeRule::for_test(result.mode, &result.submode).can_set_records() {
        return false;
    }
    funbox.all_can_get_pb(&result.funbox)
}

/// Best-record ledger over a key-value store. Updates are read-modify-write;
/// `&mut self` keeps them exclusive within the process.
pub struct Ledger<S: KeyValue> {
    store: S,
}

impl<S: KeyValue> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored best speed for the fingerprint, 0.0 when absent.
    pub fn lookup_best(&self, fingerprint: &Fingerprint) -> Result<f64> {
        let record = self.read_record(&fingerprint.storage_key())?;
        Ok(record.map(|r| r.metrics.speed).unwrap_or(0.0))
    }

    pub fn lookup_tag_best(&self, tag_id: &str, fingerprint: &Fingerprint) -> Result<f64> {
        let record = self.read_tag_record(&fingerprint.tag_storage_key(tag_id))?;
        Ok(record.map(|r| r.metrics.speed).unwrap_or(0.0))
    }

    /// Compare-and-set: replace the record only on strict improvement.
    /// An equal speed keeps the earlier record.
    pub fn consider_update(
        &mut self,
        fingerprint: &Fingerprint,
        metrics: RecordMetrics,
        timestamp: DateTime<Utc>,
    ) -> Result<UpdateOutcome> {
        let key = fingerprint.storage_key();
        let previous = self
            .read_record(&key)?
            .map(|r| r.metrics.speed)
            .unwrap_or(0.0);
        if metrics.speed > previous {
            let record = BestRecord {
                fingerprint: fingerprint.clone(),
                metrics,
                timestamp,
            };
            self.store.set(&key, &serde_json::to_vec_pretty(&record)?)?;
            tracing::debug!(key = %key, speed = metrics.speed, previous, "New best record");
            Ok(UpdateOutcome {
                is_new_best: true,
                previous,
            })
        } else {
            Ok(UpdateOutcome {
                is_new_best: false,
                previous,
            })
        }
    }

    pub fn consider_tag_update(
        &mut self,
        tag_id: &str,
        fingerprint: &Fingerprint,
        metrics: RecordMetrics,
        timestamp: DateTime<Utc>,
    ) -> Result<UpdateOutcome> {
        let key = fingerprint.tag_storage_key(tag_id);
        let previous = self
            .read_tag_record(&key)?
            .map(|r| r.metrics.speed)
            .unwrap_or(0.0);
        if metrics.speed > previous {
            let record = TagBestRecord {
                tag_id: tag_id.to_string(),
                fingerprint: fingerprint.clone(),
                metrics,
                timestamp,
            };
            self.store.set(&key, &serde_json::to_vec_pretty(&record)?)?;
            tracing::debug!(key = %key, speed = metrics.speed, previous, "New tag record");
            Ok(UpdateOutcome {
                is_new_best: true,
                previous,
            })
        } else {
            Ok(UpdateOutcome {
                is_new_best: false,
                previous,
            })
        }
    }

    fn read_record(&self, key: &str) -> Result<Option<BestRecord>> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn read_tag_record(&self, key: &str) -> Result<Option<TagBestRecord>> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
