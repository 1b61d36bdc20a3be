/// Fire-and-forget usage analytics.
pub mod analytics;
/// HTTP client for the backend API.
pub mod api;
/// Sign-in, session restoration, and logout.
pub mod auth;
/// Real-time contest channel and its in-process transport.
pub mod channel;
/// Live contest play and the routes into the ended state.
pub mod play;
/// Locally graded practice tests.
pub mod practice;
/// Standings snapshots, live and final.
pub mod standings;
/// Waiting-room roster and start gating.
pub mod waiting_room;
