//! Live contest play: entry and resume, guarded submission, and the four
//! routes into the ended state.
//!
//! Ending is funnelled through one idempotent routine no matter which
//! trigger fires first: the last answer, the early-exit control, the local
//! countdown, or the server's `contestEnded` push. The completion ledger is
//! marked exactly once.

use tracing::{info, warn};

use crate::{
    dto::{channel::ServerEvent, contest::{AnswerSelection, Question, UserAnswer}},
    error::ClientResult,
    services::{api::ApiClient, channel::ContestChannel},
    state::{
        countdown::{Countdown, now_ms},
        lifecycle::{ContestLifecycle, ContestPhase, EndReason, LifecycleEvent},
        play::{PlaySession, ResumeOutcome, SubmitOutcome},
    },
    store::ledger::CompletionLedger,
};

/// Where entering the play view leads.
pub enum PlayEntry {
    /// This device already finished the contest: go straight to standings.
    AlreadyComplete,
    /// The server already has an answer for every question; the ledger has
    /// been marked and the view should show standings with this score.
    Completed {
        /// Score rebuilt from the recorded answers.
        score: u32,
    },
    /// Play continues, fresh or resumed mid-contest.
    Active(Box<ContestPlay>),
}

/// What a server event changed, for the embedding view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayUpdate {
    /// The contest ended; navigate to standings with this score.
    Ended {
        /// Score at the moment the contest ended.
        final_score: u32,
    },
    /// Nothing this view cares about.
    None,
}

/// One participant's live contest, driving a [`PlaySession`] through the
/// channel and the lifecycle machine.
pub struct ContestPlay {
    contest_id: String,
    ledger: CompletionLedger,
    session: PlaySession,
    lifecycle: ContestLifecycle,
    countdown: Countdown,
}

impl ContestPlay {
    /// Run the play-view entry sequence: ledger short-circuit, question
    /// fetch, then best-effort resume from the server's answer summary.
    ///
    /// A summary that cannot be fetched degrades to a fresh session; losing
    /// resume is better than losing the contest.
    pub async fn enter(
        api: &ApiClient,
        ledger: &CompletionLedger,
        contest_id: &str,
        start_time: u64,
    ) -> ClientResult<PlayEntry> {
        if ledger.is_complete(contest_id).await {
            return Ok(PlayEntry::AlreadyComplete);
        }

        let bundle = api.contest_questions(contest_id).await?;
        let previous = match api.contest_summary(contest_id).await {
            Ok(previous) => previous,
            Err(err) => {
                warn!(contest_id, error = %err, "answer summary fetch failed, starting fresh");
                Vec::new()
            }
        };

        let (play, outcome) = ContestPlay::start(
            ledger.clone(),
            contest_id,
            bundle.questions,
            previous,
            start_time,
            bundle.meta.duration,
        );

        match outcome {
            ResumeOutcome::Completed { score } => {
                ledger.mark_complete(contest_id).await?;
                Ok(PlayEntry::Completed { score })
            }
            ResumeOutcome::InProgress { .. } => Ok(PlayEntry::Active(Box::new(play))),
        }
    }

    /// Assemble a play view over an already-fetched question batch.
    pub fn start(
        ledger: CompletionLedger,
        contest_id: impl Into<String>,
        questions: Vec<Question>,
        previous: Vec<UserAnswer>,
        start_time: u64,
        duration_minutes: u64,
    ) -> (Self, ResumeOutcome) {
        let (session, outcome) = PlaySession::resume(questions, previous);
        let play = ContestPlay {
            contest_id: contest_id.into(),
            ledger,
            session,
            lifecycle: ContestLifecycle::in_play(start_time),
            countdown: Countdown::new(start_time, duration_minutes),
        };
        (play, outcome)
    }

    /// Submit the current selection through the channel.
    ///
    /// A second call while an acknowledgement is pending fails locally
    /// without producing a second network submission. A failed
    /// acknowledgement records nothing and re-enables input. Answering the
    /// last question finishes the contest and marks the ledger.
    pub async fn submit(
        &mut self,
        channel: &ContestChannel,
        picked: Vec<String>,
    ) -> ClientResult<SubmitOutcome> {
        let pending = self.session.begin_submit(picked)?;
        let verdict = channel
            .submit_answer(&self.contest_id, &pending.question_id, pending.answer.clone())
            .await;

        match verdict {
            Ok(is_correct) => {
                let outcome = self.session.complete_submit(pending, is_correct);
                if let SubmitOutcome::Finished { .. } = outcome {
                    self.finish(EndReason::AllAnswered).await?;
                }
                Ok(outcome)
            }
            Err(err) => {
                self.session.abort_submit();
                Err(err)
            }
        }
    }

    /// End the test early: every unanswered question gets a blank
    /// submission, recorded as wrong, then the contest finishes.
    ///
    /// Blanks go out sequentially so the server's records line up with the
    /// local ones; a failed blank is logged and recorded locally anyway.
    pub async fn end_early(&mut self, channel: &ContestChannel) -> ClientResult<u32> {
        for question in self.session.unanswered() {
            if let Err(err) = channel
                .submit_answer(&self.contest_id, &question.id, AnswerSelection::blank())
                .await
            {
                warn!(
                    contest_id = %self.contest_id,
                    question_id = %question.id,
                    error = %err,
                    "blank submission failed"
                );
            }
            self.session.record_backfill(question.id);
        }
        self.finish(EndReason::EndedEarly).await
    }

    /// Drive the countdown. Returns the final score on the tick that first
    /// crosses the end instant, `None` on every other tick.
    pub async fn on_tick(&mut self, now_ms: u64) -> ClientResult<Option<u32>> {
        if self.lifecycle.end_reason().is_some() || !self.countdown.is_expired_at(now_ms) {
            return Ok(None);
        }
        let score = self.finish(EndReason::TimerExpired).await?;
        Ok(Some(score))
    }

    /// Fold one server event into the play state.
    pub async fn apply_event(&mut self, event: ServerEvent) -> ClientResult<PlayUpdate> {
        match event {
            ServerEvent::ContestEnded => {
                if self.lifecycle.end_reason().is_some() {
                    return Ok(PlayUpdate::None);
                }
                let final_score = self.finish(EndReason::ServerPush).await?;
                Ok(PlayUpdate::Ended { final_score })
            }
            _ => Ok(PlayUpdate::None),
        }
    }

    /// The single exit path: records the end reason once and marks the
    /// completion ledger. Later triggers collapse into no-ops.
    async fn finish(&mut self, reason: EndReason) -> ClientResult<u32> {
        if self.lifecycle.end_reason().is_none() {
            self.lifecycle.apply(LifecycleEvent::Ended(reason))?;
            self.ledger.mark_complete(&self.contest_id).await?;
            info!(
                contest_id = %self.contest_id,
                ?reason,
                score = self.session.score(),
                "contest finished"
            );
        }
        Ok(self.session.score())
    }

    /// Contest this view is playing.
    pub fn contest_id(&self) -> &str {
        &self.contest_id
    }

    /// The in-memory answer session.
    pub fn session(&self) -> &PlaySession {
        &self.session
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ContestPhase {
        self.lifecycle.phase()
    }

    /// The countdown clock for the remaining-time display.
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Remaining time against the wall clock.
    pub fn remaining(&self) -> std::time::Duration {
        self.countdown.remaining_at(now_ms())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::ClientConfig,
        dto::{
            channel::{AckPayload, ClientEvent},
            contest::MINUTE_MS,
        },
        services::channel::memory,
        store::memory::MemoryStore,
    };

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

    async fn ledger() -> CompletionLedger {
        CompletionLedger::load(Arc::new(MemoryStore::new()))
            .await
            .unwrap()
    }

    fn grade_a(event: ClientEvent) -> AckPayload {
        match event {
            ClientEvent::SubmitAnswer { answer, .. } => {
                AckPayload::verdict(answer == AnswerSelection::Single("a".into()))
            }
            _ => AckPayload::ok(),
        }
    }

    #[tokio::test]
    async fn answering_every_question_finishes_and_marks_the_ledger() {
        let ledger = ledger().await;
        let (mut play, _) =
            ContestPlay::start(ledger.clone(), "c1", questions(2), Vec::new(), 0, 10);

        let (channel, server) = memory::pair();
        tokio::spawn(server.serve(grade_a));

        let outcome = play.submit(&channel, vec!["a".into()]).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Advanced { next_index: 1 });
        assert!(!ledger.is_complete("c1").await);

        let outcome = play.submit(&channel, vec!["b".into()]).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Finished { final_score: 1 });
        assert!(ledger.is_complete("c1").await);
        assert_eq!(play.phase(), ContestPhase::Ended(EndReason::AllAnswered));
    }

    #[tokio::test]
    async fn failed_acknowledgement_records_nothing_and_allows_retry() {
        let ledger = ledger().await;
        let (mut play, _) = ContestPlay::start(ledger, "c1", questions(1), Vec::new(), 0, 10);

        let (channel, mut server) = memory::pair();
        let flaky = tokio::spawn(async move {
            // First acknowledgement is lost; the second succeeds.
            let (_, responder) = server.next_request().await.unwrap();
            drop(responder);
            let (_, responder) = server.next_request().await.unwrap();
            responder.ack(AckPayload::verdict(true));
        });

        assert!(play.submit(&channel, vec!["a".into()]).await.is_err());
        assert_eq!(play.session().answered_count(), 0);

        let outcome = play.submit(&channel, vec!["a".into()]).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Finished { final_score: 1 });
        flaky.await.unwrap();
    }

    #[tokio::test]
    async fn end_early_backfills_one_blank_per_unanswered_question() {
        let ledger = ledger().await;
        let (mut play, _) =
            ContestPlay::start(ledger.clone(), "c1", questions(3), Vec::new(), 0, 10);

        let (channel, mut server) = memory::pair();
        let server_task = tokio::spawn(async move {
            let mut submissions = Vec::new();
            while let Some((event, responder)) = server.next_request().await {
                if let ClientEvent::SubmitAnswer { question_id, answer, .. } = &event {
                    submissions.push((question_id.clone(), answer.clone()));
                }
                responder.ack(grade_a(event));
            }
            submissions
        });

        play.submit(&channel, vec!["a".into()]).await.unwrap();
        let final_score = play.end_early(&channel).await.unwrap();
        drop(channel);

        assert_eq!(final_score, 1);
        assert_eq!(play.session().answered_count(), 3);
        assert!(ledger.is_complete("c1").await);
        assert_eq!(play.phase(), ContestPhase::Ended(EndReason::EndedEarly));

        let submissions = server_task.await.unwrap();
        assert_eq!(submissions.len(), 3);
        // The two backfills went out blank, in question order.
        assert_eq!(submissions[1], ("q2".into(), AnswerSelection::blank()));
        assert_eq!(submissions[2], ("q3".into(), AnswerSelection::blank()));
    }

    #[tokio::test]
    async fn server_push_ends_once() {
        let ledger = ledger().await;
        let (mut play, _) =
            ContestPlay::start(ledger.clone(), "c1", questions(2), Vec::new(), 0, 10);

        let update = play.apply_event(ServerEvent::ContestEnded).await.unwrap();
        assert_eq!(update, PlayUpdate::Ended { final_score: 0 });
        assert!(ledger.is_complete("c1").await);

        // The losing trigger arrives late and must change nothing.
        let update = play.apply_event(ServerEvent::ContestEnded).await.unwrap();
        assert_eq!(update, PlayUpdate::None);
        assert_eq!(play.phase(), ContestPhase::Ended(EndReason::ServerPush));
    }

    #[tokio::test]
    async fn countdown_expiry_finishes_exactly_once() {
        let ledger = ledger().await;
        let (mut play, _) =
            ContestPlay::start(ledger.clone(), "c1", questions(2), Vec::new(), 0, 1);

        assert_eq!(play.on_tick(MINUTE_MS - 1).await.unwrap(), None);
        assert_eq!(play.on_tick(MINUTE_MS).await.unwrap(), Some(0));
        assert!(ledger.is_complete("c1").await);

        // Later ticks stay quiet.
        assert_eq!(play.on_tick(MINUTE_MS + 1_000).await.unwrap(), None);
        assert_eq!(play.phase(), ContestPhase::Ended(EndReason::TimerExpired));
    }

    #[tokio::test]
    async fn already_complete_contest_short_circuits_entry() {
        let ledger = ledger().await;
        ledger.mark_complete("c1").await.unwrap();

        // Unroutable backend: the ledger hit must return before any request
        // or submission goes out.
        let api = ApiClient::new(ClientConfig::with_base_url("http://127.0.0.1:9", "unused"))
            .unwrap();
        let entry = ContestPlay::enter(&api, &ledger, "c1", 0).await.unwrap();
        assert!(matches!(entry, PlayEntry::AlreadyComplete));
    }

    #[tokio::test]
    async fn resume_mid_contest_lands_on_first_unanswered() {
        let ledger = ledger().await;
        let previous = vec![UserAnswer {
            question_id: "q1".into(),
            answer: AnswerSelection::Single("a".into()),
            is_correct: true,
        }];
        let (play, outcome) = ContestPlay::start(ledger, "c1", questions(3), previous, 0, 10);

        assert_eq!(
            outcome,
            ResumeOutcome::InProgress {
                next_index: 1,
                score: 1
            }
        );
        assert_eq!(play.session().current_question().unwrap().id, "q2");
    }
}
