//! Request and response envelopes for the MindMuse HTTP API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::contest::{AuthUser, ContestMeta, Question, Standing, UserAnswer};

/// `GET /api/contest/{id}/questions` (and the join-code variant).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResponse {
    /// Whether the contest was found.
    pub success: bool,
    /// Question batch for the contest, in play order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Contest metadata, when the contest exists.
    #[serde(default)]
    pub meta: Option<ContestMeta>,
    /// Error detail when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/contest/{id}/summary` — resume data for the current user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Whether a summary exists for this user.
    pub success: bool,
    /// Answers the user has already submitted, in submission order.
    #[serde(default)]
    pub user_answers: Vec<UserAnswer>,
}

/// `GET /api/contest/{id}/standings` — one-shot standings read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    /// Whether standings are available.
    pub success: bool,
    /// Ranked standings snapshot.
    #[serde(default)]
    pub standings: Vec<Standing>,
}

/// Body for `POST /api/quiz/createContest` (AI-generated question set).
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContestRequest {
    /// Topic the questions are generated from.
    #[validate(length(min = 1, message = "topic must not be empty"))]
    pub topic: String,
    /// Requested difficulty label.
    pub difficulty: String,
    /// Number of questions to generate.
    #[validate(range(min = 1, message = "a contest needs at least one question"))]
    pub num_questions: u32,
    /// Contest mode.
    pub mode: crate::dto::contest::ContestMode,
    /// Duration in minutes.
    #[validate(range(min = 1, message = "duration must be at least one minute"))]
    pub duration: u64,
    /// Scheduled start, epoch seconds as a decimal string.
    pub start_time: String,
    /// Time zone the contest is scheduled in.
    pub time_zone: String,
}

/// Body for `POST /api/quiz/createNptelContest` (curriculum question bank).
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNptelContestRequest {
    /// Course the questions are drawn from.
    #[validate(length(min = 1, message = "course code must not be empty"))]
    pub course_code: String,
    /// Course weeks to include.
    #[validate(length(min = 1, message = "select at least one week"))]
    pub weeks: Vec<u32>,
    /// Number of questions to draw.
    #[validate(range(min = 1, message = "a contest needs at least one question"))]
    pub num_questions: u32,
    /// Contest mode.
    pub mode: crate::dto::contest::ContestMode,
    /// Duration in minutes.
    #[validate(range(min = 1, message = "duration must be at least one minute"))]
    pub duration: u64,
    /// Scheduled start, epoch seconds as a decimal string.
    pub start_time: String,
    /// Time zone the contest is scheduled in.
    pub time_zone: String,
}

/// Response for both contest creation endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContestResponse {
    /// Whether the contest was created.
    pub success: bool,
    /// Join code for the new contest.
    #[serde(default)]
    pub code: Option<String>,
    /// Error detail when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/auth/verify` — session check on app start.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Whether the session cookie is still valid.
    pub success: bool,
    /// The authenticated user when the session is valid.
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// One contest entry in the paginated profile history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestHistoryEntry {
    /// Contest identifier, for jumping to its standings.
    pub contest_id: String,
    /// Join code of the contest.
    pub code: String,
    /// Topic the contest covered.
    #[serde(default)]
    pub topic: Option<String>,
    /// Mode the contest was played in.
    pub mode: crate::dto::contest::ContestMode,
    /// Score the user finished with.
    pub score: u32,
    /// Total number of questions.
    pub total_questions: u32,
    /// When the contest was played, epoch milliseconds.
    pub played_at: u64,
}

/// Aggregate insights shown on the profile page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInsights {
    /// Contests the user has played.
    pub total_contests: u32,
    /// Questions answered across all contests.
    pub total_questions: u32,
    /// Questions answered correctly across all contests.
    pub total_correct: u32,
}

/// `GET /api/profile?page=&limit=` — paginated contest history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePage {
    /// Whether the profile was resolved.
    pub success: bool,
    /// Contest history entries for the requested page.
    #[serde(default)]
    pub contests: Vec<ContestHistoryEntry>,
    /// Aggregate insights across the whole history.
    #[serde(default)]
    pub insights: ProfileInsights,
    /// Requested page number.
    #[serde(default)]
    pub page: u32,
    /// Total number of pages available.
    #[serde(default)]
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::dto::contest::ContestMode;

    #[test]
    fn empty_topic_fails_validation() {
        let request = CreateContestRequest {
            topic: String::new(),
            difficulty: "medium".into(),
            num_questions: 5,
            mode: ContestMode::Duel,
            duration: 10,
            start_time: "1714000000".into(),
            time_zone: "UTC".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn questions_response_tolerates_missing_fields() {
        let response: QuestionsResponse = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "Contest not found",
        }))
        .unwrap();
        assert!(!response.success);
        assert!(response.questions.is_empty());
        assert!(response.meta.is_none());
    }
}
