//! Practice-mode types: course catalogue, locally graded questions, and the
//! append-only result history kept on this device.

use serde::{Deserialize, Serialize};

/// A course in the practice catalogue (`GET /api/course/courses`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course code used in question-bank paths.
    pub code: String,
    /// Human-readable course name.
    pub name: String,
    /// Number of weeks of material the course has.
    pub duration_in_weeks: u32,
}

/// `GET /api/course/courses`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursesResponse {
    /// The available courses.
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// A practice question. Unlike contest questions these carry the correct
/// options, because practice sessions are graded locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    /// Question identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Question statement.
    pub statement: String,
    /// Answer options.
    pub options: Vec<String>,
    /// The correct option(s). More than one makes the question multi-select.
    pub correct: Vec<String>,
    /// Topic label.
    #[serde(default)]
    pub topic: Option<String>,
    /// Course week the question belongs to.
    #[serde(default)]
    pub week: Option<u32>,
}

impl PracticeQuestion {
    /// Whether the question accepts more than one selected option.
    pub fn is_multi_select(&self) -> bool {
        self.correct.len() > 1
    }
}

/// `GET /api/nptel/questions/{code}?weeks=csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeQuestionsResponse {
    /// Question bank slice for the requested weeks.
    #[serde(default)]
    pub questions: Vec<PracticeQuestion>,
}

/// Graded answer for one question of a finished practice test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeAnswer {
    /// Question identifier.
    pub question_id: String,
    /// Options the user selected, possibly none.
    pub selected_options: Vec<String>,
    /// Whether the selection matched the correct set exactly.
    pub is_correct: bool,
    /// Seconds spent on this question across visits.
    pub time_taken: u64,
}

/// Summary of a finished practice test, appended to the local history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    /// Course the test was drawn from.
    pub course_code: String,
    /// Course display name.
    pub course_name: String,
    /// Weeks included in the test.
    pub weeks: Vec<u32>,
    /// Configured duration in minutes.
    pub duration: u64,
    /// Graded answers in question order.
    pub answers: Vec<PracticeAnswer>,
    /// Number of questions in the test.
    pub total_questions: u32,
    /// Questions answered correctly.
    pub correct_answers: u32,
    /// Questions answered but wrong.
    pub wrong_answers: u32,
    /// Questions left unanswered.
    pub unanswered: u32,
    /// Seconds actually spent before the test ended.
    pub total_time_taken: u64,
    /// Score as a rounded percentage of correct answers.
    pub score: u32,
    /// When the test finished, epoch milliseconds.
    pub timestamp: u64,
}
