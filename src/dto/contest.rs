//! Contest-facing wire types mirrored from the backend's JSON conventions.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Milliseconds in one minute, used to convert contest durations.
pub const MINUTE_MS: u64 = 60 * 1000;

/// Contest mode, which also fixes the roster capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestMode {
    /// Head-to-head, exactly two participants.
    Duel,
    /// Solo run against the clock.
    Practice,
    /// Open roster, any number of participants.
    Multiplayer,
}

impl ContestMode {
    /// Number of participants required before the contest can start, if the
    /// mode fixes one.
    pub fn required_participants(self) -> Option<usize> {
        match self {
            ContestMode::Duel => Some(2),
            ContestMode::Practice => Some(1),
            ContestMode::Multiplayer => None,
        }
    }
}

/// Lifecycle status as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    /// Participants are gathering; the contest has not started.
    Waiting,
    /// The contest is running.
    Live,
    /// The contest is over.
    End,
}

/// Descriptive contest metadata resolved from a contest id or join code.
///
/// The server owns every field; the client only refreshes this snapshot on
/// fetch or push. The one local mutation is [`ContestMeta::topic`], derived
/// from the first question for display and invitations.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestMeta {
    /// Join code participants type in to find the contest.
    pub code: String,
    /// Stable contest identifier.
    pub id: String,
    /// Contest mode (also encodes roster capacity).
    pub mode: ContestMode,
    /// Whether the server considers the contest live right now.
    pub is_live: bool,
    /// Coarse lifecycle status, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContestStatus>,
    /// Contest duration in minutes.
    pub duration: u64,
    /// Authoritative start instant, epoch milliseconds. The backend encodes
    /// this as a decimal string.
    #[serde_as(as = "DisplayFromStr")]
    pub start_time: u64,
    /// IANA time zone name the contest was scheduled in.
    pub time_zone: String,
    /// User id of the contest creator; only they may start the contest.
    pub admin_id: String,
    /// Topic derived from the first question, filled in client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// A single contest question. Immutable once fetched for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Server-side question identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Question statement shown to the participant.
    pub statement: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Topic label for the question.
    pub topic: String,
    /// Course week the question belongs to, for curriculum contests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    /// How many options are correct; absent means one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_count: Option<u32>,
}

impl Question {
    /// Whether the question accepts more than one selected option.
    pub fn is_multi_select(&self) -> bool {
        self.correct_answer_count.unwrap_or(1) > 1
    }
}

/// The participant's choice for one question, as sent over the wire.
///
/// Single-answer questions submit a bare string, multi-answer questions an
/// array, and end-of-test backfill submits an empty string the server scores
/// as wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerSelection {
    /// One selected option (or `""` for a blank backfill submission).
    Single(String),
    /// Several selected options for multi-answer questions.
    Multiple(Vec<String>),
}

impl AnswerSelection {
    /// Blank submission used to close out unanswered questions.
    pub fn blank() -> Self {
        AnswerSelection::Single(String::new())
    }

    /// Collapse a picked set into the wire shape: one element submits as a
    /// bare string, several as an array.
    pub fn from_picked(mut picked: Vec<String>) -> Self {
        if picked.len() == 1 {
            AnswerSelection::Single(picked.remove(0))
        } else {
            AnswerSelection::Multiple(picked)
        }
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerSelection::Single(answer) => answer.is_empty(),
            AnswerSelection::Multiple(answers) => answers.is_empty(),
        }
    }
}

/// Locally recorded outcome of one acknowledged answer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// Question the answer belongs to.
    pub question_id: String,
    /// What the participant selected.
    pub selected_answer: AnswerSelection,
    /// Server verdict from the submission acknowledgement.
    pub is_correct: bool,
}

/// Previously recorded answer returned by the contest summary endpoint,
/// used to rebuild an in-progress session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    /// Question the answer belongs to.
    pub question_id: String,
    /// The recorded selection.
    pub answer: AnswerSelection,
    /// Whether the server scored it correct.
    pub is_correct: bool,
}

/// Roster entry pushed by the server on join/leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// User identifier.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub profile_picture: String,
}

/// One row of the standings snapshot. Rank is the array position as
/// delivered by the server; the client never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// User identifier.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Final or running score.
    pub score: u32,
    /// Questions attempted so far.
    pub attempted: u32,
    /// Total answering time in milliseconds.
    pub time_taken: u64,
}

/// Authenticated user record persisted for the browser-tab session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// User identifier, matched against [`ContestMeta::admin_id`].
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Avatar URL.
    pub profile_picture: String,
}
