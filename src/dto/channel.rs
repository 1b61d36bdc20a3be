//! Typed events for the real-time contest channel.
//!
//! The join/submit/lifecycle protocol is expressed as tagged unions so it can
//! be exercised against an in-process transport without a live server.

use serde::{Deserialize, Serialize};

use crate::dto::contest::{AnswerSelection, Participant, Standing};

/// Requests the client emits to the server. Every request is acknowledged
/// with an [`AckPayload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter the contest room for roster and lifecycle pushes.
    #[serde(rename_all = "camelCase")]
    JoinContest {
        /// Contest to join.
        contest_id: String,
    },
    /// Admin-only request to start the contest for everyone in the room.
    #[serde(rename_all = "camelCase")]
    StartContest {
        /// Contest to start.
        contest_id: String,
    },
    /// Submit one answer; the acknowledgement carries the verdict.
    #[serde(rename_all = "camelCase")]
    SubmitAnswer {
        /// Contest being played.
        contest_id: String,
        /// Question being answered.
        question_id: String,
        /// Selected option(s), or blank for backfill.
        answer: AnswerSelection,
    },
    /// Ask for the current standings snapshot.
    #[serde(rename_all = "camelCase")]
    GetStandings {
        /// Contest whose standings are requested.
        contest_id: String,
    },
}

/// Unsolicited events pushed by the server while a view is mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Full roster replacement after a join or leave.
    UpdateParticipants {
        /// The complete new roster.
        participants: Vec<Participant>,
    },
    /// Full standings replacement; rank is array position.
    UpdateStandings {
        /// The complete new standings, ranked by array position.
        standings: Vec<Standing>,
    },
    /// The admin started the contest; carries the authoritative start time.
    #[serde(rename_all = "camelCase")]
    ContestStarted {
        /// Start instant in epoch milliseconds.
        start_time: u64,
    },
    /// The server ended the contest.
    ContestEnded,
    /// Forward-compatible catch-all for event types this client ignores.
    #[serde(other)]
    Unknown,
}

/// Synchronous acknowledgement returned for every [`ClientEvent`].
///
/// Mirrors the server's ack object: only the fields relevant to the request
/// are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckPayload {
    /// Whether the request was accepted.
    pub success: bool,
    /// Human-readable rejection reason on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Verdict for submit acknowledgements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// Snapshot for standings acknowledgements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standings: Option<Vec<Standing>>,
    /// Start instant for start acknowledgements, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
}

impl AckPayload {
    /// Successful ack with no extra payload.
    pub fn ok() -> Self {
        AckPayload {
            success: true,
            ..AckPayload::default()
        }
    }

    /// Failed ack carrying a rejection reason.
    pub fn rejected(message: impl Into<String>) -> Self {
        AckPayload {
            success: false,
            message: Some(message.into()),
            ..AckPayload::default()
        }
    }

    /// Successful submit ack with the server's verdict.
    pub fn verdict(is_correct: bool) -> Self {
        AckPayload {
            success: true,
            is_correct: Some(is_correct),
            ..AckPayload::default()
        }
    }

    /// Successful standings ack carrying a snapshot.
    pub fn with_standings(standings: Vec<Standing>) -> Self {
        AckPayload {
            success: true,
            standings: Some(standings),
            ..AckPayload::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_carry_type_tags() {
        let event = ClientEvent::SubmitAnswer {
            contest_id: "c1".into(),
            question_id: "q1".into(),
            answer: AnswerSelection::Single("42".into()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "submitAnswer");
        assert_eq!(value["answer"], "42");
    }

    #[test]
    fn unknown_server_events_are_tolerated() {
        let event: ServerEvent =
            serde_json::from_value(serde_json::json!({ "type": "somethingNew" })).unwrap();
        assert_eq!(event, ServerEvent::Unknown);
    }

    #[test]
    fn contest_started_round_trips_start_time() {
        let event = ServerEvent::ContestStarted {
            start_time: 1_714_000_000_000,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["startTime"], 1_714_000_000_000_u64);
        let back: ServerEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }
}
