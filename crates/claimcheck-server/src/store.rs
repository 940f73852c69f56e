//! In-memory quiz record store.
//!
//! Write-once, read-many: a record is created exactly once at
//! quiz-creation time and never mutated afterwards, so readers only need
//! the store's own insertion atomicity. Identifier generation is an
//! injected capability so tests can supply deterministic ids.
//!
//! Retention is TTL-based rather than unbounded: a record older than the
//! configured TTL reads as absent, and expired entries are swept on every
//! insert, so memory is bounded by the creation rate within one TTL
//! window.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use claimcheck_quiz::{QuizDraft, QuizRecord};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A source of fresh quiz identifiers.
///
/// The default implementation uses UUID v4, whose collision probability
/// is low enough to treat as zero; the store still inserts under a write
/// lock so id generation and insertion appear atomic.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    /// Returns a fresh identifier.
    fn generate(&self) -> String;
}

/// UUID v4 identifier generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Keyed store of immutable quiz records.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct QuizStore {
    records: Arc<RwLock<HashMap<String, Arc<QuizRecord>>>>,
    ids: Arc<dyn IdGenerator>,
    ttl: Duration,
}

impl QuizStore {
    /// Creates a store with UUID v4 identifiers and the given retention.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_id_generator(ttl, Arc::new(UuidGenerator))
    }

    /// Creates a store with a caller-supplied identifier generator.
    #[must_use]
    pub fn with_id_generator(ttl: Duration, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            ids,
            ttl,
        }
    }

    /// Completes `draft` with a fresh identifier and creation timestamp,
    /// stores the finished record, and returns its id.
    ///
    /// The record is fully built before insertion; no partially-written
    /// record is ever observable. Expired records are swept as part of
    /// the same write.
    pub async fn create(&self, draft: QuizDraft) -> String {
        let now = Utc::now();
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|_, record| !self.is_expired(record, now));
        let swept = before - records.len();
        if swept > 0 {
            debug!(swept, "Swept expired quiz records");
        }

        let quiz_id = self.ids.generate();
        let record = Arc::new(draft.into_record(quiz_id.clone(), now));
        records.insert(quiz_id.clone(), record);

        quiz_id
    }

    /// Looks up a record by id. Pure read: expired records read as
    /// absent but are not removed here.
    pub async fn get(&self, quiz_id: &str) -> Option<Arc<QuizRecord>> {
        let records = self.records.read().await;
        records
            .get(quiz_id)
            .filter(|record| !self.is_expired(record, Utc::now()))
            .cloned()
    }

    /// Number of records currently held, including expired ones not yet
    /// swept.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn is_expired(&self, record: &QuizRecord, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(record.created_at) > self.ttl
    }
}
