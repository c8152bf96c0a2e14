//! Session directory: the authoritative registry of active game rooms
//!
//! This module tracks which players are online and what room they are in:
//! - Session lifecycle (announce, heartbeat, disconnect, timeout)
//! - Lookups by id, by member, by username, by level, by platform/game
//! - Aggregate statistics for dashboards and telemetry
//!
//! The directory is deliberately not persisted. Sessions are ephemeral and
//! re-announced periodically by connected clients, so a process restart
//! simply clears the map and clients repopulate it.
//!
//! Expiry is sweep-on-access: every public operation purges timed-out
//! sessions before it proceeds, so stale rooms are never observable and no
//! background sweeper thread is needed. The backing map sits behind a single
//! coarse mutex; churn is bounded by concurrently connected clients, so
//! contention on one lock is a non-issue in practice.

use crate::clock::Clock;
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use shared::{GameVersion, LevelKind, Platform, Session, SESSION_TIMEOUT_SECS};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Aggregate counts over the directory's current contents
///
/// Computed in one pass by [`SessionDirectory::statistics`]; a snapshot,
/// not a live view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryStatistics {
    /// Number of live sessions.
    pub total_sessions: usize,
    /// Sum of member counts across all live sessions.
    pub total_members: usize,
    /// Member count per game version.
    pub per_game: HashMap<GameVersion, usize>,
    /// Member count per platform.
    pub per_platform: HashMap<Platform, usize>,
}

/// Thread-safe, in-memory registry of active sessions
///
/// All operations take `&self`: the backing map is guarded by a single
/// mutex, which serializes mutations and enumerations. Reads return clones
/// so callers can iterate without holding the lock.
pub struct SessionDirectory {
    /// Live sessions indexed by session id.
    sessions: Mutex<HashMap<Uuid, Session>>,
    /// Injected time source; expiry math uses this, never the system clock.
    clock: Arc<dyn Clock>,
    /// How long a session may go without contact before it is swept.
    timeout: Duration,
}

impl SessionDirectory {
    /// Creates a directory with the default session timeout.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_timeout(clock, Duration::from_secs(SESSION_TIMEOUT_SECS))
    }

    /// Creates a directory with an explicit session timeout.
    pub fn with_timeout(clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
            timeout,
        }
    }

    /// Purges expired sessions from the map. Caller holds the lock.
    fn sweep(&self, sessions: &mut HashMap<Uuid, Session>) -> usize {
        let now = self.clock.now_millis();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Swept {} expired session(s)", removed);
        }
        removed
    }

    /// Inserts or replaces the session keyed by its id
    ///
    /// Stamps `last_contact` with the current time. Remove-then-insert
    /// rather than upsert-in-place, so duplicate ids cannot accumulate even
    /// under malformed re-announcements.
    pub fn register(&self, mut session: Session) {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);

        session.last_contact = self.clock.now_millis();

        if sessions.remove(&session.id).is_some() {
            debug!("Session {} re-registered", session.id);
        } else {
            info!(
                "Session {} registered ({} member(s), {:?}/{:?})",
                session.id,
                session.members.len(),
                session.platform,
                session.game
            );
        }
        sessions.insert(session.id, session);
    }

    /// Heartbeat path: identical semantics to [`register`](Self::register)
    ///
    /// Kept as a distinct name because callers think of it as "pushing a
    /// heartbeat for a room I already have", not "creating a room".
    pub fn update(&self, session: Session) {
        self.register(session);
    }

    /// Removes the session with that id, if present
    ///
    /// Returns true if a session was removed, false if it was already gone.
    /// Covers both explicit disconnects and teardown.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);

        if sessions.remove(&id).is_some() {
            info!("Session {} removed", id);
            true
        } else {
            false
        }
    }

    /// Looks up a session by its id.
    pub fn get_by_id(&self, id: Uuid) -> Option<Session> {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions.get(&id).cloned()
    }

    /// First session containing a member with this user id
    ///
    /// Optional platform/game filters are AND-composed; `None` matches
    /// anything. Which session wins when a player somehow appears in several
    /// is unspecified.
    pub fn get_by_member_id(
        &self,
        user_id: Uuid,
        platform: Option<Platform>,
        game: Option<GameVersion>,
    ) -> Option<Session> {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions
            .values()
            .find(|s| s.has_member_id(user_id) && matches_filters(s, platform, game))
            .cloned()
    }

    /// Same as [`get_by_member_id`](Self::get_by_member_id) but keyed by
    /// username, which also covers guest members that have no user id.
    pub fn get_by_username(
        &self,
        username: &str,
        platform: Option<Platform>,
        game: Option<GameVersion>,
    ) -> Option<Session> {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions
            .values()
            .find(|s| s.has_member_named(username) && matches_filters(s, platform, game))
            .cloned()
    }

    /// Snapshot of all live sessions.
    pub fn list_all(&self) -> Vec<Session> {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions.values().cloned().collect()
    }

    /// All sessions currently scoped to the given level.
    pub fn list_by_level(&self, level_kind: LevelKind, level_id: u32) -> Vec<Session> {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions
            .values()
            .filter(|s| s.level_kind == level_kind && s.level_id == level_id)
            .cloned()
            .collect()
    }

    /// All sessions for the given platform/game combination.
    pub fn list_by_platform_and_game(
        &self,
        platform: Platform,
        game: GameVersion,
    ) -> Vec<Session> {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions
            .values()
            .filter(|s| s.platform == platform && s.game == game)
            .cloned()
            .collect()
    }

    /// Total member count across live sessions on the given platform.
    pub fn count_members_on_platform(&self, platform: Platform) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions
            .values()
            .filter(|s| s.platform == platform)
            .map(|s| s.members.len())
            .sum()
    }

    /// Total member count across live sessions in the given game.
    pub fn count_members_in_game(&self, game: GameVersion) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions
            .values()
            .filter(|s| s.game == game)
            .map(|s| s.members.len())
            .sum()
    }

    /// One aggregation pass over the live map.
    pub fn statistics(&self) -> DirectoryStatistics {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);

        let mut stats = DirectoryStatistics::default();
        for session in sessions.values() {
            let members = session.members.len();
            stats.total_sessions += 1;
            stats.total_members += members;
            *stats.per_game.entry(session.game).or_insert(0) += members;
            *stats.per_platform.entry(session.platform).or_insert(0) += members;
        }
        stats
    }

    /// Housekeeping entry point for the worker loop
    ///
    /// Sweeping already happens on every access; this exists so a periodic
    /// job can bound staleness during idle stretches. Returns how many
    /// sessions were purged, for logging.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions);
        sessions.len()
    }

    /// True if no live sessions exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn matches_filters(
    session: &Session,
    platform: Option<Platform>,
    game: Option<GameVersion>,
) -> bool {
    platform.map_or(true, |p| session.platform == p) && game.map_or(true, |g| session.game == g)
}
