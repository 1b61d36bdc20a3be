//! Real-time contest channel.
//!
//! One channel is opened per mounted view and torn down on unmount; a
//! remounted view re-fetches current state instead of trusting any buffered
//! history. The wire transport is behind [`ChannelTransport`] so the
//! join/submit/lifecycle protocol can be exercised against the in-process
//! [`memory`] pair without a live server.

pub mod memory;

use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    dto::{
        channel::{AckPayload, ClientEvent, ServerEvent},
        contest::{AnswerSelection, Standing},
    },
    error::{ClientError, ClientResult},
};

/// Result alias for transport operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Transport-level channel failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The channel is gone; the view should surface a connection error.
    #[error("channel disconnected")]
    Disconnected,
    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Bidirectional event transport scoped to one contest view.
pub trait ChannelTransport: Send + Sync {
    /// Emit a request and await the server's synchronous acknowledgement.
    fn request(&self, event: ClientEvent) -> BoxFuture<'static, ChannelResult<AckPayload>>;
}

/// Typed facade over the contest channel protocol.
///
/// Requests return the server's acknowledgement; unsolicited pushes arrive
/// through [`ContestChannel::next_event`]. Dropping the channel disconnects.
pub struct ContestChannel {
    transport: Arc<dyn ChannelTransport>,
    events: mpsc::UnboundedReceiver<ServerEvent>,
}

impl ContestChannel {
    /// Wrap a connected transport and its inbound event stream.
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        events: mpsc::UnboundedReceiver<ServerEvent>,
    ) -> Self {
        ContestChannel { transport, events }
    }

    /// Join the contest room. A rejection is surfaced as
    /// [`ClientError::Rejected`]; the caller displays it and suppresses
    /// further interaction rather than navigating away.
    pub async fn join(&self, contest_id: &str) -> ClientResult<()> {
        let ack = self
            .transport
            .request(ClientEvent::JoinContest {
                contest_id: contest_id.to_string(),
            })
            .await?;
        if ack.success {
            debug!(contest_id, "joined contest room");
            Ok(())
        } else {
            Err(ClientError::Rejected(
                ack.message.unwrap_or_else(|| "failed to join contest".into()),
            ))
        }
    }

    /// Ask the server to start the contest (admin only). Returns the
    /// authoritative start time when the acknowledgement carries one.
    pub async fn start_contest(&self, contest_id: &str) -> ClientResult<Option<u64>> {
        let ack = self
            .transport
            .request(ClientEvent::StartContest {
                contest_id: contest_id.to_string(),
            })
            .await?;
        if ack.success {
            Ok(ack.start_time)
        } else {
            Err(ClientError::Rejected(
                ack.message
                    .unwrap_or_else(|| "failed to start contest".into()),
            ))
        }
    }

    /// Submit one answer and return the server's verdict.
    pub async fn submit_answer(
        &self,
        contest_id: &str,
        question_id: &str,
        answer: AnswerSelection,
    ) -> ClientResult<bool> {
        let ack = self
            .transport
            .request(ClientEvent::SubmitAnswer {
                contest_id: contest_id.to_string(),
                question_id: question_id.to_string(),
                answer,
            })
            .await?;
        if ack.success {
            Ok(ack.is_correct.unwrap_or(false))
        } else {
            Err(ClientError::Rejected(
                ack.message
                    .unwrap_or_else(|| "answer submission rejected".into()),
            ))
        }
    }

    /// Request the current standings snapshot.
    pub async fn standings(&self, contest_id: &str) -> ClientResult<Vec<Standing>> {
        let ack = self
            .transport
            .request(ClientEvent::GetStandings {
                contest_id: contest_id.to_string(),
            })
            .await?;
        match (ack.success, ack.standings) {
            (true, Some(standings)) => Ok(standings),
            _ => Err(ClientError::Rejected(
                ack.message
                    .unwrap_or_else(|| "standings unavailable".into()),
            )),
        }
    }

    /// Next unsolicited server event, or `None` once the channel closed.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }
}
