//! Practice mode: locally graded tests drawn from a course question bank.
//!
//! Unlike contests there is no channel and no server-side scoring: the
//! question bank ships the correct options, navigation is free in both
//! directions, answers stay revisable until the test ends, and the result
//! is appended to the on-device history.

use rand::seq::SliceRandom;
use tracing::info;

use crate::{
    dto::practice::{Course, PracticeAnswer, PracticeQuestion, PracticeResult},
    error::{ClientError, ClientResult},
    services::{analytics, api::ApiClient},
    state::countdown::{Countdown, now_ms},
    store::practice_log::PracticeLog,
};

/// Parameters for one practice test.
#[derive(Debug, Clone)]
pub struct PracticeConfig {
    /// Course the questions are drawn from.
    pub course: Course,
    /// Weeks of material to include.
    pub weeks: Vec<u32>,
    /// Test duration in minutes.
    pub duration_minutes: u64,
    /// Cap on the number of questions, applied after shuffling.
    pub question_limit: Option<usize>,
    /// Whether to shuffle the bank slice before the cap.
    pub shuffle: bool,
}

/// Entry point for practice mode: catalogue, test assembly, and history.
pub struct PracticeService {
    api: ApiClient,
    log: PracticeLog,
}

impl PracticeService {
    /// Bind practice mode to the backend client and the local history.
    pub fn new(api: ApiClient, log: PracticeLog) -> Self {
        PracticeService { api, log }
    }

    /// Course catalogue.
    pub async fn courses(&self) -> ClientResult<Vec<Course>> {
        self.api.courses().await
    }

    /// Fetch the question bank slice and assemble a test from it.
    pub async fn start(
        &self,
        config: PracticeConfig,
        user_id: Option<&str>,
    ) -> ClientResult<PracticeTest> {
        let questions = self
            .api
            .practice_questions(&config.course.code, &config.weeks)
            .await?;
        if questions.is_empty() {
            return Err(ClientError::NotFound(
                "no questions available for the selected weeks".into(),
            ));
        }

        let started_at = now_ms();
        analytics::track_practice_session(&self.api, &config.course.code, started_at);
        if let Some(user_id) = user_id {
            analytics::track_user_practice(&self.api, user_id, 1, 0);
        }

        info!(
            course = %config.course.code,
            weeks = ?config.weeks,
            questions = questions.len(),
            "practice test started"
        );
        Ok(PracticeTest::begin(config, questions, started_at))
    }

    /// Grade a finished test, append it to the history, and return the
    /// summary.
    pub async fn complete(
        &self,
        test: PracticeTest,
        user_id: Option<&str>,
    ) -> ClientResult<PracticeResult> {
        let result = test.finish(now_ms());
        self.log.record(result.clone()).await?;
        if let Some(user_id) = user_id {
            analytics::track_user_practice(&self.api, user_id, 0, 1);
        }
        Ok(result)
    }

    /// Past results, oldest first.
    pub async fn history(&self) -> ClientResult<Vec<PracticeResult>> {
        Ok(self.log.history().await?)
    }
}

/// One in-progress practice test.
///
/// Timestamps come in as arguments so per-question time can be accounted
/// deterministically; callers pass the current wall clock.
pub struct PracticeTest {
    config: PracticeConfig,
    questions: Vec<PracticeQuestion>,
    selections: Vec<Vec<String>>,
    time_spent_ms: Vec<u64>,
    current: usize,
    entered_at_ms: u64,
    countdown: Countdown,
}

impl PracticeTest {
    /// Assemble a test over a fetched bank slice, shuffling and capping per
    /// the configuration.
    pub fn begin(
        config: PracticeConfig,
        mut questions: Vec<PracticeQuestion>,
        started_at_ms: u64,
    ) -> Self {
        if config.shuffle {
            questions.shuffle(&mut rand::rng());
        }
        if let Some(limit) = config.question_limit {
            questions.truncate(limit.max(1));
        }

        let count = questions.len();
        let countdown = Countdown::new(started_at_ms, config.duration_minutes);
        PracticeTest {
            config,
            questions,
            selections: vec![Vec::new(); count],
            time_spent_ms: vec![0; count],
            current: 0,
            entered_at_ms: started_at_ms,
            countdown,
        }
    }

    /// Questions in presentation order.
    pub fn questions(&self) -> &[PracticeQuestion] {
        &self.questions
    }

    /// The question currently presented, if the test has any.
    pub fn current_question(&self) -> Option<&PracticeQuestion> {
        self.questions.get(self.current)
    }

    /// Zero-based index of the current question.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Selection for the current question, possibly empty.
    pub fn selection(&self) -> &[String] {
        self.selections
            .get(self.current)
            .map_or(&[], Vec::as_slice)
    }

    /// The countdown clock for the remaining-time display.
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Replace the selection for the current question. Selections stay
    /// revisable until the test ends.
    pub fn select(&mut self, options: Vec<String>) {
        if let Some(slot) = self.selections.get_mut(self.current) {
            *slot = options;
        }
    }

    /// Move to the next question, accounting time spent on the current one.
    pub fn next(&mut self, at_ms: u64) {
        if self.current + 1 < self.questions.len() {
            self.leave(at_ms);
            self.current += 1;
        }
    }

    /// Move back to the previous question.
    pub fn previous(&mut self, at_ms: u64) {
        if self.current > 0 {
            self.leave(at_ms);
            self.current -= 1;
        }
    }

    fn leave(&mut self, at_ms: u64) {
        let spent = at_ms.saturating_sub(self.entered_at_ms);
        if let Some(slot) = self.time_spent_ms.get_mut(self.current) {
            *slot += spent;
        }
        self.entered_at_ms = at_ms;
    }

    /// Grade every question against its correct set and summarize.
    ///
    /// A selection matches when it equals the correct set regardless of
    /// pick order; an empty selection counts as unanswered, not wrong.
    pub fn finish(mut self, at_ms: u64) -> PracticeResult {
        self.leave(at_ms);

        let mut correct_answers = 0;
        let mut wrong_answers = 0;
        let mut unanswered = 0;
        let mut answers = Vec::with_capacity(self.questions.len());

        for (index, question) in self.questions.iter().enumerate() {
            let selected = &self.selections[index];
            let is_correct = !selected.is_empty() && matches_correct(selected, &question.correct);
            if selected.is_empty() {
                unanswered += 1;
            } else if is_correct {
                correct_answers += 1;
            } else {
                wrong_answers += 1;
            }
            answers.push(PracticeAnswer {
                question_id: question.id.clone(),
                selected_options: selected.clone(),
                is_correct,
                time_taken: self.time_spent_ms[index] / 1_000,
            });
        }

        let total_questions = self.questions.len() as u32;
        let score = if total_questions == 0 {
            0
        } else {
            (f64::from(correct_answers) / f64::from(total_questions) * 100.0).round() as u32
        };

        PracticeResult {
            course_code: self.config.course.code,
            course_name: self.config.course.name,
            weeks: self.config.weeks,
            duration: self.config.duration_minutes,
            answers,
            total_questions,
            correct_answers,
            wrong_answers,
            unanswered,
            total_time_taken: self.time_spent_ms.iter().sum::<u64>() / 1_000,
            score,
            timestamp: at_ms,
        }
    }
}

fn matches_correct(selected: &[String], correct: &[String]) -> bool {
    let mut selected: Vec<&str> = selected.iter().map(String::as_str).collect();
    let mut correct: Vec<&str> = correct.iter().map(String::as_str).collect();
    selected.sort_unstable();
    correct.sort_unstable();
    selected == correct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            code: "cs101".into(),
            name: "Algorithms".into(),
            duration_in_weeks: 12,
        }
    }

    fn config(shuffle: bool, limit: Option<usize>) -> PracticeConfig {
        PracticeConfig {
            course: course(),
            weeks: vec![0, 1],
            duration_minutes: 10,
            question_limit: limit,
            shuffle,
        }
    }

    fn question(id: &str, correct: &[&str]) -> PracticeQuestion {
        PracticeQuestion {
            id: id.into(),
            statement: format!("statement {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: correct.iter().map(|s| s.to_string()).collect(),
            topic: None,
            week: Some(0),
        }
    }

    #[test]
    fn multi_select_grading_ignores_pick_order() {
        let mut test = PracticeTest::begin(
            config(false, None),
            vec![question("q1", &["b", "d"]), question("q2", &["a"])],
            0,
        );
        test.select(vec!["d".into(), "b".into()]);
        test.next(1_000);
        test.select(vec!["a".into(), "b".into()]);

        let result = test.finish(2_000);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.wrong_answers, 1);
        assert!(result.answers[0].is_correct);
        assert!(!result.answers[1].is_correct);
    }

    #[test]
    fn blank_selection_counts_as_unanswered_not_wrong() {
        let mut test = PracticeTest::begin(
            config(false, None),
            vec![question("q1", &["a"]), question("q2", &["a"]), question("q3", &["b"])],
            0,
        );
        test.select(vec!["a".into()]);
        // q2 and q3 are never answered.

        let result = test.finish(5_000);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.wrong_answers, 0);
        assert_eq!(result.unanswered, 2);
    }

    #[test]
    fn score_is_a_rounded_percentage() {
        let mut test = PracticeTest::begin(
            config(false, None),
            vec![question("q1", &["a"]), question("q2", &["a"]), question("q3", &["a"])],
            0,
        );
        test.select(vec!["a".into()]);
        test.next(0);
        test.select(vec!["a".into()]);
        test.next(0);
        test.select(vec!["b".into()]);

        // 2 of 3 rounds to 67.
        assert_eq!(test.finish(0).score, 67);
    }

    #[test]
    fn navigation_is_free_and_selections_stay_revisable() {
        let mut test = PracticeTest::begin(
            config(false, None),
            vec![question("q1", &["a"]), question("q2", &["b"])],
            0,
        );
        test.select(vec!["c".into()]);
        test.next(1_000);
        test.previous(2_000);
        assert_eq!(test.current_index(), 0);

        // Revising the earlier answer replaces it outright.
        test.select(vec!["a".into()]);
        test.next(3_000);
        test.select(vec!["b".into()]);

        let result = test.finish(4_000);
        assert_eq!(result.correct_answers, 2);
    }

    #[test]
    fn time_accumulates_across_revisits() {
        let mut test = PracticeTest::begin(
            config(false, None),
            vec![question("q1", &["a"]), question("q2", &["b"])],
            0,
        );
        test.next(5_000);
        test.previous(8_000);
        let result = test.finish(9_500);

        // q1: 5s on the first visit plus 1.5s on the second, floored.
        assert_eq!(result.answers[0].time_taken, 6);
        assert_eq!(result.answers[1].time_taken, 3);
        assert_eq!(result.total_time_taken, 9);
    }

    #[test]
    fn empty_bank_yields_an_empty_result_without_panicking() {
        let mut test = PracticeTest::begin(config(false, None), Vec::new(), 0);
        assert!(test.current_question().is_none());
        assert!(test.selection().is_empty());
        test.select(vec!["a".into()]);
        test.next(1_000);

        let result = test.finish(2_000);
        assert_eq!(result.total_questions, 0);
        assert_eq!(result.score, 0);
        assert!(result.answers.is_empty());
    }

    #[test]
    fn question_limit_caps_the_test() {
        let bank: Vec<_> = (1..=10)
            .map(|i| question(&format!("q{i}"), &["a"]))
            .collect();
        let test = PracticeTest::begin(config(false, Some(4)), bank.clone(), 0);
        assert_eq!(test.questions().len(), 4);
        // Without shuffling the bank order is preserved.
        assert_eq!(test.questions()[0].id, "q1");

        let shuffled = PracticeTest::begin(config(true, None), bank, 0);
        let mut ids: Vec<_> = shuffled.questions().iter().map(|q| q.id.clone()).collect();
        ids.sort();
        let expected: Vec<String> = {
            let mut v: Vec<_> = (1..=10).map(|i| format!("q{i}")).collect();
            v.sort();
            v
        };
        // Shuffling permutes but never drops or duplicates.
        assert_eq!(ids, expected);
    }
}
