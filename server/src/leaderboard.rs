//! Leaderboard ranking engine
//!
//! Turns raw score rows from the persistent store into ranked pages, per
//! level and player-count bucket. The store returns rows already ordered
//! (see [`crate::score_store::ranking_cmp`]); this engine only assigns rank
//! numbers, finds the requester's own entry, and fans out across buckets.

use crate::score_store::{ScoreQuery, ScoreStore, StoreError};
use serde::Serialize;
use shared::{GameVersion, Platform, ScoreRecord};
use std::collections::HashMap;
use uuid::Uuid;

/// One row of a ranked page. Ranks are 1-based within the bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: u32,
    pub record: ScoreRecord,
}

/// A page of ranked scores
///
/// `requesting_player` is only populated when the requester's score sits
/// among this page's candidates; see
/// [`LeaderboardEngine::top_scores_for_requester`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedPage {
    pub entries: Vec<RankedEntry>,
    pub requesting_player: Option<RankedEntry>,
}

/// Computes ranked views over scores read from a [`ScoreStore`].
pub struct LeaderboardEngine<S> {
    store: S,
}

impl<S: ScoreStore> LeaderboardEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Top N scores for a level and bucket
    ///
    /// One store query; ranks are assigned `offset + 1` onwards in the
    /// store's order. An unknown level legitimately yields an empty page; a
    /// failed query propagates as an error, never as an empty page.
    pub fn top_scores(&self, query: &ScoreQuery) -> Result<RankedPage, StoreError> {
        let records = self.store.query(query)?;
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| RankedEntry {
                rank: (query.offset + i) as u32 + 1,
                record,
            })
            .collect();

        Ok(RankedPage {
            entries,
            requesting_player: None,
        })
    }

    /// Same page as [`top_scores`](Self::top_scores), plus the requester's
    /// own entry when it appears among the fetched candidates
    ///
    /// The scan covers only the page just fetched. A requester whose score
    /// ranks outside this page gets `requesting_player = None`; no second
    /// query is made to find their true rank.
    pub fn top_scores_for_requester(
        &self,
        query: &ScoreQuery,
        requester_id: Uuid,
    ) -> Result<RankedPage, StoreError> {
        let mut page = self.top_scores(query)?;
        page.requesting_player = page
            .entries
            .iter()
            .find(|e| e.record.participant_ids.contains(&requester_id))
            .cloned();
        Ok(page)
    }

    /// One top-scores page per player-count bucket valid for the game
    ///
    /// Games without online multiplayer only ever produce bucket 1, so the
    /// result carries no keys for buckets 2..=4 for those.
    pub fn multi_bucket_view(
        &self,
        level_id: u32,
        platform: Platform,
        game: GameVersion,
        per_bucket_page_size: usize,
    ) -> Result<HashMap<u8, RankedPage>, StoreError> {
        let mut pages = HashMap::new();
        for bucket in 1..=game.max_party_size() {
            let query = ScoreQuery {
                level_id,
                platform,
                game,
                bucket,
                offset: 0,
                limit: per_bucket_page_size,
            };
            pages.insert(bucket, self.top_scores(&query)?);
        }
        Ok(pages)
    }
}
