use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const SESSION_TIMEOUT_SECS: u64 = 90;
pub const MAX_PARTY_SIZE: u8 = 4;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ps3,
    Rpcs3,
    Vita,
    Psp,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVersion {
    Lbp1,
    Lbp2,
    Lbp3,
    LbpVita,
    LbpPsp,
}

impl GameVersion {
    /// Largest player-count bucket this game can produce. PSP has no
    /// online multiplayer, so only solo scores exist for it.
    pub fn max_party_size(&self) -> u8 {
        match self {
            GameVersion::LbpPsp => 1,
            _ => MAX_PARTY_SIZE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    Developer,
    User,
}

// Lifecycle/readiness markers announced by clients. The directory stores
// and returns them verbatim; no behavior hangs off them server-side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    WaitingForPlayers,
    DivingIn,
    DivingInWaiting,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SessionMood {
    RejectingAll,
    RejectingOnlyFriends,
    AllowingFriendsOfFriends,
    AllowingAll,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionMember {
    /// None for guest members who are present only by name.
    pub user_id: Option<Uuid>,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub members: Vec<SessionMember>,
    pub platform: Platform,
    pub game: GameVersion,
    pub level_kind: LevelKind,
    /// 0 when the session is not scoped to a level.
    pub level_id: u32,
    pub state: SessionState,
    pub mood: SessionMood,
    /// Unix milliseconds, stamped by the directory on every registration.
    /// Clients never supply it.
    #[serde(default)]
    pub last_contact: u64,
}

impl Session {
    pub fn is_expired(&self, now_millis: u64, timeout: Duration) -> bool {
        now_millis.saturating_sub(self.last_contact) > timeout.as_millis() as u64
    }

    pub fn has_member_id(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.user_id == Some(user_id))
    }

    pub fn has_member_named(&self, username: &str) -> bool {
        self.members.iter().any(|m| m.username == username)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: Uuid,
    pub level_id: u32,
    pub platform: Platform,
    pub game: GameVersion,
    /// Everyone who contributed to this score; up to MAX_PARTY_SIZE entries.
    pub participant_ids: Vec<Uuid>,
    /// Higher is always better, whatever the in-game unit.
    pub value: i64,
    /// Player-count bucket, 1..=4. The persistent store guarantees this
    /// equals participant_ids.len() at submission time.
    pub bucket: u8,
    /// Unix milliseconds; used only as a tie-break (earlier wins).
    pub submitted_at: u64,
}
