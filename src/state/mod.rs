//! Pure client-side state: the contest lifecycle machine, the play session,
//! and the countdown clock. Nothing in this module performs I/O.

pub mod countdown;
pub mod lifecycle;
pub mod play;

pub use countdown::{Countdown, TICK};
pub use lifecycle::{ContestLifecycle, ContestPhase, EndReason, InvalidTransition, LifecycleEvent};
pub use play::{PendingSubmission, PlaySession, ResumeOutcome, SubmitError, SubmitOutcome};
