//! Waiting-room orchestration: roster, admin gating, and the hand-off into
//! contest play.

use tracing::warn;

use crate::{
    dto::{
        channel::ServerEvent,
        contest::{ContestMeta, Participant},
    },
    error::{ClientError, ClientResult},
    services::{api::ApiClient, channel::ContestChannel},
    store::{ledger::CompletionLedger, session::SessionStore},
};

/// Where entering the waiting room leads.
#[derive(Debug, Clone, PartialEq)]
pub enum EnterOutcome {
    /// This device already finished the contest: go straight to standings.
    AlreadyComplete,
    /// The contest is live and the user has recorded answers: resume play.
    ResumePlay(ContestMeta),
    /// Stay in the waiting room (joined, or showing a join error).
    Stay,
}

/// What a server event changed, for the embedding view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomUpdate {
    /// The roster snapshot was replaced.
    Roster,
    /// The contest started; navigate to play with this start time.
    Started {
        /// Authoritative start instant, epoch milliseconds.
        start_time: u64,
    },
    /// Nothing this view cares about.
    None,
}

/// One participant's waiting-room state for a contest.
pub struct WaitingRoom {
    contest_id: String,
    meta: Option<ContestMeta>,
    participants: Vec<Participant>,
    is_admin: bool,
    joined: bool,
    error: Option<String>,
}

impl WaitingRoom {
    /// Fresh waiting room, optionally seeded with metadata carried over
    /// from navigation.
    pub fn new(contest_id: impl Into<String>, initial_meta: Option<ContestMeta>) -> Self {
        WaitingRoom {
            contest_id: contest_id.into(),
            meta: initial_meta,
            participants: Vec::new(),
            is_admin: false,
            joined: false,
            error: None,
        }
    }

    /// Run the entry sequence: ledger short-circuit, meta refresh, resume
    /// check, admin detection, and the room join.
    ///
    /// A join rejection is recorded as the room error and suppresses
    /// interaction; it does not force navigation.
    pub async fn enter(
        &mut self,
        api: &ApiClient,
        ledger: &CompletionLedger,
        session: &SessionStore,
        channel: &ContestChannel,
    ) -> ClientResult<EnterOutcome> {
        if ledger.is_complete(&self.contest_id).await {
            return Ok(EnterOutcome::AlreadyComplete);
        }

        // Refresh metadata; a failure here keeps whatever was carried in.
        match api.contest_questions(&self.contest_id).await {
            Ok(bundle) => {
                self.meta = Some(bundle.meta);
            }
            Err(err) => {
                warn!(contest_id = %self.contest_id, error = %err, "contest status check failed");
            }
        }

        if let Some(meta) = self.meta.clone()
            && meta.is_live
        {
            // Live contest and recorded answers: the participant belongs in
            // the play view, not here.
            match api.contest_summary(&self.contest_id).await {
                Ok(previous) if !previous.is_empty() => {
                    return Ok(EnterOutcome::ResumePlay(meta));
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(contest_id = %self.contest_id, error = %err, "resume check failed");
                }
            }
        }

        self.detect_admin(session).await;

        match channel.join(&self.contest_id).await {
            Ok(()) => {
                self.joined = true;
                self.error = None;
            }
            Err(ClientError::Rejected(message)) => {
                self.joined = false;
                self.error = Some(message);
            }
            Err(err) => return Err(err),
        }

        Ok(EnterOutcome::Stay)
    }

    async fn detect_admin(&mut self, session: &SessionStore) {
        let user = session.user().await;
        self.is_admin = match (&user, &self.meta) {
            (Some(user), Some(meta)) => user.id == meta.admin_id,
            _ => false,
        };
    }

    /// Fold one server event into the room state.
    pub fn apply_event(&mut self, event: ServerEvent) -> RoomUpdate {
        match event {
            ServerEvent::UpdateParticipants { participants } => {
                // Replace-on-event: the latest snapshot wins outright.
                self.participants = participants;
                RoomUpdate::Roster
            }
            ServerEvent::ContestStarted { start_time } => {
                self.error = None;
                RoomUpdate::Started { start_time }
            }
            _ => RoomUpdate::None,
        }
    }

    /// Whether the start control should be enabled: admin only, joined, and
    /// the mode's participant threshold met.
    pub fn can_start(&self) -> bool {
        if !self.is_admin || !self.joined {
            return false;
        }
        let required = self
            .meta
            .as_ref()
            .and_then(|meta| meta.mode.required_participants());
        match required {
            Some(required) => self.participants.len() >= required,
            None => !self.participants.is_empty(),
        }
    }

    /// Ask the server to start the contest. A business-rule rejection is
    /// recorded and keeps the control disabled.
    pub async fn start(&mut self, channel: &ContestChannel) -> ClientResult<()> {
        if !self.can_start() {
            return Err(ClientError::Rejected(
                "waiting for enough participants".into(),
            ));
        }
        match channel.start_contest(&self.contest_id).await {
            Ok(_) => Ok(()),
            Err(ClientError::Rejected(message)) => {
                self.error = Some(message.clone());
                Err(ClientError::Rejected(message))
            }
            Err(err) => Err(err),
        }
    }

    /// Invitation text with the join code and derived topic.
    pub fn invite_message(&self, origin: &str) -> Option<String> {
        let meta = self.meta.as_ref()?;
        let topic = meta.topic.as_deref().unwrap_or("Quiz Contest");
        Some(format!(
            "Hey! Join me in a contest on \"{topic}\"!\n\n{origin}/join-contest?code={}",
            meta.code
        ))
    }

    /// Latest roster snapshot.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Contest metadata, as last synced.
    pub fn meta(&self) -> Option<&ContestMeta> {
        self.meta.as_ref()
    }

    /// Whether the current user administers this contest.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether the room join succeeded.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// The error currently shown in the room, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
