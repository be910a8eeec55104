//! # ListenBrainz Integration Module
//!
//! Thin client for the one ListenBrainz endpoint this tool needs:
//! `GET /1/user/{user}/listens?max_ts={timestamp}`. The service answers
//! newest first with every listen at or before `max_ts`, so walking a month
//! means repeatedly moving the cursor back to the oldest listen seen.
//!
//! ```text
//! management::HistoryCollector (cursor, tally, stop condition)
//!          ↓
//! listenbrainz::ListenClient (pacing, request, decode)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! The client pauses before every request, including the first one, to stay
//! well inside the service's rate limit. Rate-limit headers are only logged.
//! Nothing is retried: transport failures and non-2xx answers surface as
//! [`Error::Fetch`](crate::error::Error::Fetch) /
//! [`Error::Status`](crate::error::Error::Status), malformed bodies as
//! [`Error::Decode`](crate::error::Error::Decode).

pub mod listens;

pub use listens::{ListenClient, ListenSource, RateLimit, USER_AGENT};
