//! Client library for the MindMuse quiz platform.
//!
//! Covers the whole contest lifecycle from the participant's side: the
//! waiting room, live play with server-acknowledged answers, standings,
//! the on-device completion ledger, and locally graded practice tests.
//! Embedding views drive the services in [`services`] and render the state
//! they expose; no UI lives here.

/// Runtime configuration from environment variables.
pub mod config;
/// Wire and persistence data types.
pub mod dto;
/// Error taxonomy.
pub mod error;
/// View-level services over the HTTP API and the real-time channel.
pub mod services;
/// Per-contest state: lifecycle, play session, countdown.
pub mod state;
/// Local persistence: session, completion ledger, practice history.
pub mod store;
/// Tracing setup.
pub mod telemetry;
