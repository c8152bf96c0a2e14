//! Persistent score store seam
//!
//! The leaderboard engine reads scores through exactly one query primitive,
//! defined here. The real store lives behind the transport/database layer;
//! [`InMemoryScoreStore`] implements the same contract for tests and for
//! running the backend without a database attached.

use parking_lot::Mutex;
use shared::{GameVersion, Platform, ScoreRecord};
use std::cmp::Ordering;
use thiserror::Error;

/// Parameters of the single query primitive the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreQuery {
    pub level_id: u32,
    pub platform: Platform,
    pub game: GameVersion,
    /// Player-count bucket, 1..=4. Validated at the boundary layer.
    pub bucket: u8,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    #[error("score query failed: {0}")]
    Query(String),
}

/// Read side of the persistent score store
///
/// Implementations must return records already ordered by [`ranking_cmp`];
/// the engine does no sorting of its own. Failures surface as [`StoreError`]
/// and are propagated unchanged, never mapped to an empty result.
pub trait ScoreStore {
    fn query(&self, query: &ScoreQuery) -> Result<Vec<ScoreRecord>, StoreError>;
}

/// Authoritative leaderboard ordering
///
/// Higher score first, then earlier submission (rewards whoever got there
/// first), then record id so true ties still have a total order and repeated
/// queries page identically.
pub fn ranking_cmp(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.value
        .cmp(&a.value)
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Score store backed by a plain in-memory vector
///
/// Honors the same ordering and filtering contract as the persistent store.
/// Used by the test suites and by the binary when no database is wired in.
#[derive(Default)]
pub struct InMemoryScoreStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, record: ScoreRecord) {
        self.records.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn query(&self, query: &ScoreQuery) -> Result<Vec<ScoreRecord>, StoreError> {
        let records = self.records.lock();
        let mut matching: Vec<ScoreRecord> = records
            .iter()
            .filter(|r| {
                r.level_id == query.level_id
                    && r.platform == query.platform
                    && r.game == query.game
                    && r.bucket == query.bucket
            })
            .cloned()
            .collect();
        matching.sort_by(ranking_cmp);

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(value: i64, submitted_at: u64) -> ScoreRecord {
        ScoreRecord {
            id: Uuid::new_v4(),
            level_id: 5,
            platform: Platform::Ps3,
            game: GameVersion::Lbp2,
            participant_ids: vec![Uuid::new_v4()],
            value,
            bucket: 1,
            submitted_at,
        }
    }

    fn query() -> ScoreQuery {
        ScoreQuery {
            level_id: 5,
            platform: Platform::Ps3,
            game: GameVersion::Lbp2,
            bucket: 1,
            offset: 0,
            limit: 10,
        }
    }

    #[test]
    fn test_ranking_cmp_value_descending() {
        let high = record(300, 50);
        let low = record(100, 10);
        assert_eq!(ranking_cmp(&high, &low), Ordering::Less);
        assert_eq!(ranking_cmp(&low, &high), Ordering::Greater);
    }

    #[test]
    fn test_ranking_cmp_earlier_submission_wins_ties() {
        let early = record(300, 10);
        let late = record(300, 20);
        assert_eq!(ranking_cmp(&early, &late), Ordering::Less);
    }

    #[test]
    fn test_ranking_cmp_true_ties_are_totally_ordered() {
        let a = record(300, 10);
        let b = record(300, 10);
        let ab = ranking_cmp(&a, &b);
        assert_ne!(ab, Ordering::Equal);
        assert_eq!(ranking_cmp(&b, &a), ab.reverse());
    }

    #[test]
    fn test_query_filters_and_orders() {
        let store = InMemoryScoreStore::new();
        store.submit(record(100, 1));
        store.submit(record(300, 2));
        store.submit(record(300, 3));
        store.submit(record(50, 4));

        let mut off_level = record(999, 5);
        off_level.level_id = 6;
        store.submit(off_level);

        let mut wrong_bucket = record(999, 6);
        wrong_bucket.bucket = 2;
        store.submit(wrong_bucket);

        let results = store.query(&query()).unwrap();
        let values: Vec<i64> = results.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![300, 300, 100, 50]);
        // Of the tied 300s, the earlier submission comes first.
        assert_eq!(results[0].submitted_at, 2);
    }

    #[test]
    fn test_query_offset_and_limit() {
        let store = InMemoryScoreStore::new();
        for i in 0..5 {
            store.submit(record(100 - i, i as u64));
        }

        let mut q = query();
        q.offset = 1;
        q.limit = 2;

        let results = store.query(&q).unwrap();
        let values: Vec<i64> = results.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![99, 98]);
    }

    #[test]
    fn test_query_unknown_level_is_empty_not_error() {
        let store = InMemoryScoreStore::new();
        let mut q = query();
        q.level_id = 404;
        assert!(store.query(&q).unwrap().is_empty());
    }
}
