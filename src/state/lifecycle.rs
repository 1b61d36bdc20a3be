//! Per-participant contest lifecycle state machine.
//!
//! Tracks one contest from the participant's perspective: waiting for the
//! admin, playing, ended. Ending is deliberately idempotent because two
//! independent signals race for it (the local countdown and the server's
//! `contestEnded` push): whichever fires first wins and the loser becomes a
//! no-op.

use thiserror::Error;

/// Why the contest ended from this participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The server pushed `contestEnded`.
    ServerPush,
    /// The local countdown reached zero.
    TimerExpired,
    /// The participant answered every question.
    AllAnswered,
    /// The participant ended the test early.
    EndedEarly,
    /// The completion ledger already had this contest on entry.
    AlreadyComplete,
}

/// High-level phases a contest view can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestPhase {
    /// In the waiting room, roster still forming.
    Waiting,
    /// Contest is live and questions are being answered.
    Playing,
    /// Contest is over; standings are the only destination left.
    Ended(EndReason),
}

/// Events that can be applied to the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The admin started the contest; carries the authoritative start time
    /// in epoch milliseconds.
    Started {
        /// Server-provided start instant.
        start_time: u64,
    },
    /// One of the end triggers fired.
    Ended(EndReason),
}

/// Error returned when an event cannot be applied from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the lifecycle was in when the invalid event arrived.
    pub from: ContestPhase,
    /// The event that cannot be applied from this phase.
    pub event: LifecycleEvent,
}

/// Lifecycle state machine for a single contest and participant.
#[derive(Debug, Clone)]
pub struct ContestLifecycle {
    phase: ContestPhase,
    start_time: Option<u64>,
    version: usize,
}

impl ContestLifecycle {
    /// Lifecycle beginning in the waiting room.
    pub fn in_waiting() -> Self {
        ContestLifecycle {
            phase: ContestPhase::Waiting,
            start_time: None,
            version: 0,
        }
    }

    /// Lifecycle beginning directly in play, for views mounted on a contest
    /// that is already live.
    pub fn in_play(start_time: u64) -> Self {
        ContestLifecycle {
            phase: ContestPhase::Playing,
            start_time: Some(start_time),
            version: 0,
        }
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> ContestPhase {
        self.phase
    }

    /// Authoritative start time, once known.
    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    /// Why the contest ended, once it has.
    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            ContestPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Apply an event, returning the phase afterwards.
    ///
    /// A second end event while already ended is accepted and ignored; the
    /// first recorded reason stands.
    pub fn apply(&mut self, event: LifecycleEvent) -> Result<ContestPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (ContestPhase::Waiting, LifecycleEvent::Started { start_time }) => {
                self.start_time = Some(start_time);
                ContestPhase::Playing
            }
            (ContestPhase::Waiting | ContestPhase::Playing, LifecycleEvent::Ended(reason)) => {
                ContestPhase::Ended(reason)
            }
            (ContestPhase::Ended(_), LifecycleEvent::Ended(_)) => return Ok(self.phase),
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.phase = next;
        self.version += 1;
        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_to_playing_records_start_time() {
        let mut lifecycle = ContestLifecycle::in_waiting();
        let phase = lifecycle
            .apply(LifecycleEvent::Started {
                start_time: 1_714_000_000_000,
            })
            .unwrap();
        assert_eq!(phase, ContestPhase::Playing);
        assert_eq!(lifecycle.start_time(), Some(1_714_000_000_000));
    }

    #[test]
    fn end_race_first_trigger_wins() {
        let mut lifecycle = ContestLifecycle::in_play(0);
        lifecycle
            .apply(LifecycleEvent::Ended(EndReason::TimerExpired))
            .unwrap();
        let version = lifecycle.version();

        // The losing trigger arrives late and must be a no-op.
        let phase = lifecycle
            .apply(LifecycleEvent::Ended(EndReason::ServerPush))
            .unwrap();
        assert_eq!(phase, ContestPhase::Ended(EndReason::TimerExpired));
        assert_eq!(lifecycle.end_reason(), Some(EndReason::TimerExpired));
        assert_eq!(lifecycle.version(), version);
    }

    #[test]
    fn ended_while_waiting_is_valid() {
        let mut lifecycle = ContestLifecycle::in_waiting();
        let phase = lifecycle
            .apply(LifecycleEvent::Ended(EndReason::AlreadyComplete))
            .unwrap();
        assert_eq!(phase, ContestPhase::Ended(EndReason::AlreadyComplete));
    }

    #[test]
    fn start_after_end_is_rejected() {
        let mut lifecycle = ContestLifecycle::in_play(0);
        lifecycle
            .apply(LifecycleEvent::Ended(EndReason::AllAnswered))
            .unwrap();

        let err = lifecycle
            .apply(LifecycleEvent::Started { start_time: 1 })
            .unwrap_err();
        assert_eq!(err.from, ContestPhase::Ended(EndReason::AllAnswered));
    }

    #[test]
    fn start_while_playing_is_rejected() {
        let mut lifecycle = ContestLifecycle::in_play(0);
        assert!(
            lifecycle
                .apply(LifecycleEvent::Started { start_time: 1 })
                .is_err()
        );
    }
}
