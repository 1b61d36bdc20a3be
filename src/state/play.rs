//! In-memory play session: question batch, ordered answer records, resume
//! reconstruction, and the one-submission-in-flight guard.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::info;

use crate::dto::contest::{AnswerRecord, AnswerSelection, Question, UserAnswer};

/// Where a session stands after reconstructing previous answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Questions remain; play continues at `next_index` (zero-based, in
    /// original question order).
    InProgress {
        /// Index of the first unanswered question.
        next_index: usize,
        /// Score rebuilt from the recorded answers.
        score: u32,
    },
    /// Every question was already answered; the view should go straight to
    /// standings with the recorded score.
    Completed {
        /// Score rebuilt from the recorded answers.
        score: u32,
    },
}

/// Result of a completed, acknowledged submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// More questions remain; the session advanced to `next_index`.
    Advanced {
        /// Index of the next question to present.
        next_index: usize,
    },
    /// That was the last question; the session is finished.
    Finished {
        /// Final score including this submission.
        final_score: u32,
    },
}

/// Why a submission attempt was not started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Nothing is selected.
    #[error("no answer selected")]
    NothingSelected,
    /// A previous submission has not been acknowledged yet.
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    /// Every question has already been answered.
    #[error("no question left to answer")]
    SessionFinished,
}

/// A submission handed to the channel, to be completed or aborted with the
/// server's acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Question being answered.
    pub question_id: String,
    /// Selection to put on the wire.
    pub answer: AnswerSelection,
}

/// One participant's in-memory state for a live contest.
///
/// Answer records are append-only and never reordered; the server remains
/// authoritative for correctness and scoring.
#[derive(Debug, Clone)]
pub struct PlaySession {
    questions: Vec<Question>,
    answers: IndexMap<String, AnswerRecord>,
    current_index: usize,
    in_flight: Option<String>,
}

impl PlaySession {
    /// Fresh session over a question batch.
    pub fn new(questions: Vec<Question>) -> Self {
        PlaySession {
            questions,
            answers: IndexMap::new(),
            current_index: 0,
            in_flight: None,
        }
    }

    /// Rebuild a session from previously recorded answers.
    ///
    /// Score and history come from the records; play resumes at the first
    /// question (in original order) without a recorded answer. When none
    /// remains the outcome is [`ResumeOutcome::Completed`] and no question
    /// is ever re-prompted.
    pub fn resume(questions: Vec<Question>, previous: Vec<UserAnswer>) -> (Self, ResumeOutcome) {
        let mut answers = IndexMap::with_capacity(previous.len());
        for recorded in previous {
            answers.insert(
                recorded.question_id.clone(),
                AnswerRecord {
                    question_id: recorded.question_id,
                    selected_answer: recorded.answer,
                    is_correct: recorded.is_correct,
                },
            );
        }

        let next = questions
            .iter()
            .position(|question| !answers.contains_key(&question.id));

        let mut session = PlaySession {
            questions,
            answers,
            current_index: next.unwrap_or(0),
            in_flight: None,
        };
        let score = session.score();

        let outcome = match next {
            Some(next_index) => {
                info!(next_index, score, "resuming contest in progress");
                session.current_index = next_index;
                ResumeOutcome::InProgress { next_index, score }
            }
            None => ResumeOutcome::Completed { score },
        };

        (session, outcome)
    }

    /// Questions in play order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question currently presented, if any remain.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Zero-based index of the current question.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Count of correct answers so far.
    pub fn score(&self) -> u32 {
        self.answers
            .values()
            .filter(|record| record.is_correct)
            .count() as u32
    }

    /// Acknowledged answers in submission order.
    pub fn answers(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.answers.values()
    }

    /// How many questions have an acknowledged answer.
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Whether every question has an acknowledged answer.
    pub fn is_finished(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }

    /// Whether a submission is awaiting acknowledgement.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Questions without a recorded answer, in original order. Used to
    /// backfill blanks when the test ends early.
    pub fn unanswered(&self) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|question| !self.answers.contains_key(&question.id))
            .cloned()
            .collect()
    }

    /// Start a submission for the current question.
    ///
    /// At most one submission can be in flight: a second attempt before the
    /// first acknowledgement returns is rejected here, which is what keeps
    /// a double click down to a single network submission.
    pub fn begin_submit(
        &mut self,
        picked: Vec<String>,
    ) -> Result<PendingSubmission, SubmitError> {
        if picked.is_empty() {
            return Err(SubmitError::NothingSelected);
        }
        if self.in_flight.is_some() {
            return Err(SubmitError::SubmissionInFlight);
        }
        let question = self
            .current_question()
            .ok_or(SubmitError::SessionFinished)?;

        let pending = PendingSubmission {
            question_id: question.id.clone(),
            answer: AnswerSelection::from_picked(picked),
        };
        self.in_flight = Some(pending.question_id.clone());
        Ok(pending)
    }

    /// Record the acknowledgement for an in-flight submission and advance.
    pub fn complete_submit(&mut self, pending: PendingSubmission, is_correct: bool) -> SubmitOutcome {
        self.in_flight = None;
        self.answers.insert(
            pending.question_id.clone(),
            AnswerRecord {
                question_id: pending.question_id,
                selected_answer: pending.answer,
                is_correct,
            },
        );

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            SubmitOutcome::Advanced {
                next_index: self.current_index,
            }
        } else {
            SubmitOutcome::Finished {
                final_score: self.score(),
            }
        }
    }

    /// Drop an in-flight submission whose acknowledgement failed, re-enabling
    /// input without recording anything.
    pub fn abort_submit(&mut self) {
        self.in_flight = None;
    }

    /// Record a blank backfill submission for a question, scored wrong.
    pub fn record_backfill(&mut self, question_id: String) {
        self.answers.insert(
            question_id.clone(),
            AnswerRecord {
                question_id,
                selected_answer: AnswerSelection::blank(),
                is_correct: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        Question {
            id: id.into(),
            statement: format!("statement {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            topic: "general".into(),
            week: None,
            correct_answer_count: None,
        }
    }

    fn questions(n: usize) -> Vec<Question> {
        (1..=n).map(|i| question(&format!("q{i}"))).collect()
    }

    fn recorded(id: &str, is_correct: bool) -> UserAnswer {
        UserAnswer {
            question_id: id.into(),
            answer: AnswerSelection::Single("a".into()),
            is_correct,
        }
    }

    #[test]
    fn resume_lands_on_first_unanswered_in_order() {
        let previous = vec![recorded("q1", true), recorded("q2", false), recorded("q3", true)];
        let (session, outcome) = PlaySession::resume(questions(5), previous);

        assert_eq!(
            outcome,
            ResumeOutcome::InProgress {
                next_index: 3,
                score: 2
            }
        );
        assert_eq!(session.current_question().unwrap().id, "q4");
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn resume_skips_gaps_in_answer_order() {
        // q2 answered but q1 not: resume must land on q1, the first
        // unanswered in original question order.
        let previous = vec![recorded("q2", true)];
        let (session, outcome) = PlaySession::resume(questions(3), previous);

        assert_eq!(
            outcome,
            ResumeOutcome::InProgress {
                next_index: 0,
                score: 1
            }
        );
        assert_eq!(session.current_question().unwrap().id, "q1");
    }

    #[test]
    fn resume_with_everything_answered_is_completed() {
        let previous = vec![recorded("q1", true), recorded("q2", true), recorded("q3", false)];
        let (session, outcome) = PlaySession::resume(questions(3), previous);

        assert_eq!(outcome, ResumeOutcome::Completed { score: 2 });
        assert!(session.is_finished());
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut session = PlaySession::new(questions(2));
        let pending = session.begin_submit(vec!["a".into()]).unwrap();

        // Second click before the ack returns.
        assert_eq!(
            session.begin_submit(vec!["a".into()]).unwrap_err(),
            SubmitError::SubmissionInFlight
        );

        let outcome = session.complete_submit(pending, true);
        assert_eq!(outcome, SubmitOutcome::Advanced { next_index: 1 });

        // Input is re-enabled after the acknowledgement.
        assert!(session.begin_submit(vec!["b".into()]).is_ok());
    }

    #[test]
    fn aborted_submit_re_enables_input_without_recording() {
        let mut session = PlaySession::new(questions(2));
        session.begin_submit(vec!["a".into()]).unwrap();
        session.abort_submit();

        assert_eq!(session.answered_count(), 0);
        assert!(session.begin_submit(vec!["a".into()]).is_ok());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut session = PlaySession::new(questions(1));
        assert_eq!(
            session.begin_submit(Vec::new()).unwrap_err(),
            SubmitError::NothingSelected
        );
    }

    #[test]
    fn last_answer_finishes_with_final_score() {
        let mut session = PlaySession::new(questions(2));

        let pending = session.begin_submit(vec!["a".into()]).unwrap();
        session.complete_submit(pending, true);

        let pending = session.begin_submit(vec!["b".into()]).unwrap();
        let outcome = session.complete_submit(pending, true);
        assert_eq!(outcome, SubmitOutcome::Finished { final_score: 2 });
        assert!(session.is_finished());
    }

    #[test]
    fn backfill_marks_remaining_questions_wrong() {
        let mut session = PlaySession::new(questions(3));
        let pending = session.begin_submit(vec!["a".into()]).unwrap();
        session.complete_submit(pending, true);

        for question in session.unanswered() {
            session.record_backfill(question.id);
        }

        assert!(session.is_finished());
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered_count(), 3);
    }
}
