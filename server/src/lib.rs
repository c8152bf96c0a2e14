//! # Matchmaking & Leaderboard Backend
//!
//! This library is the backend runtime for a multiplayer game server. It
//! answers two questions for the transport layer sitting in front of it:
//! who is online and in which room (matchmaking), and who holds the best
//! scores on a level (leaderboards).
//!
//! ## Core Responsibilities
//!
//! ### Session Directory
//! An authoritative, in-memory registry of active game rooms:
//! - Registration, heartbeat refresh, and explicit removal
//! - TTL-based expiry, swept on every access rather than by a timer thread
//! - Lookups by session id, member, username, level, and platform/game
//! - Aggregate statistics for dashboards and telemetry
//!
//! The directory is intentionally volatile. Sessions are re-announced
//! periodically by connected clients, so a restart clears the map and the
//! world re-converges within one announcement interval.
//!
//! ### Leaderboard Engine
//! Ranked top-N score views per level and player-count bucket (1-4
//! players), with a fan-out across all buckets and a narrow own-score
//! lookup for the requesting player. Scores are read through a single query
//! seam ([`score_store::ScoreStore`]); the engine owns ranking, not
//! persistence.
//!
//! ## Architecture Design
//!
//! ### Coarse locking
//! The directory guards its whole map with one mutex. Session churn is
//! bounded by concurrently connected players, so a single lock stays cheap
//! and every operation is trivially atomic. Reads hand back clones, never
//! references into the guarded map.
//!
//! ### Injected time
//! Expiry math runs against a [`clock::Clock`] rather than the system
//! clock, which makes timeout behavior deterministic in tests.
//!
//! ### I/O boundaries
//! Nothing in this crate blocks except the score-store query, and that is
//! opaque here: a failed query propagates to the caller unchanged. "Not
//! found" is an ordinary empty result throughout, never an error.
//!
//! ## Module Organization
//!
//! - [`directory`]: session registry, expiry sweeping, statistics
//! - [`leaderboard`]: ranked pages and per-bucket fan-out
//! - [`score_store`]: the store seam, ordering contract, in-memory store
//! - [`clock`]: injected time source
//! - [`counters`]: process-wide request tally drained by telemetry

pub mod clock;
pub mod counters;
pub mod directory;
pub mod leaderboard;
pub mod score_store;
