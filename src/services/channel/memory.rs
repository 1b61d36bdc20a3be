//! In-process channel transport: a connected client/server pair.
//!
//! The server half hands out inbound requests with a one-shot responder and
//! can push unsolicited events, which is all the protocol needs to be
//! driven end to end inside a test.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};

use crate::{
    dto::channel::{AckPayload, ClientEvent, ServerEvent},
    services::channel::{ChannelError, ChannelResult, ChannelTransport, ContestChannel},
};

type PendingRequest = (ClientEvent, Responder);

/// Client half of the in-process pair.
#[derive(Clone)]
pub struct MemoryTransport {
    requests: mpsc::UnboundedSender<PendingRequest>,
}

impl ChannelTransport for MemoryTransport {
    fn request(&self, event: ClientEvent) -> BoxFuture<'static, ChannelResult<AckPayload>> {
        let requests = self.requests.clone();
        Box::pin(async move {
            let (ack_tx, ack_rx) = oneshot::channel();
            requests
                .send((event, Responder { ack: ack_tx }))
                .map_err(|_| ChannelError::Disconnected)?;
            ack_rx.await.map_err(|_| ChannelError::Disconnected)
        })
    }
}

/// One-shot acknowledgement slot for a single inbound request.
pub struct Responder {
    ack: oneshot::Sender<AckPayload>,
}

impl Responder {
    /// Acknowledge the request. A dropped responder surfaces as a
    /// disconnect on the client side.
    pub fn ack(self, payload: AckPayload) {
        let _ = self.ack.send(payload);
    }
}

/// Server half of the in-process pair.
pub struct MemoryServer {
    requests: mpsc::UnboundedReceiver<PendingRequest>,
    events: mpsc::UnboundedSender<ServerEvent>,
}

impl MemoryServer {
    /// Next request emitted by the client, or `None` once it disconnected.
    pub async fn next_request(&mut self) -> Option<(ClientEvent, Responder)> {
        self.requests.recv().await
    }

    /// Push an unsolicited event to the client.
    pub fn push(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }

    /// Answer every request with `handler` until the client disconnects.
    /// Pushes are still possible from a clone of [`MemoryServer::pusher`]
    /// taken before spawning this loop.
    pub async fn serve(mut self, mut handler: impl FnMut(ClientEvent) -> AckPayload + Send) {
        while let Some((event, responder)) = self.requests.recv().await {
            responder.ack(handler(event));
        }
    }

    /// Handle for pushing events independently of the request loop.
    pub fn pusher(&self) -> EventPusher {
        EventPusher {
            events: self.events.clone(),
        }
    }
}

/// Push-only handle to the client's event stream.
#[derive(Clone)]
pub struct EventPusher {
    events: mpsc::UnboundedSender<ServerEvent>,
}

impl EventPusher {
    /// Push an unsolicited event to the client.
    pub fn push(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }
}

/// Build a connected channel/server pair.
pub fn pair() -> (ContestChannel, MemoryServer) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let channel = ContestChannel::new(
        Arc::new(MemoryTransport {
            requests: request_tx,
        }),
        event_rx,
    );
    let server = MemoryServer {
        requests: request_rx,
        events: event_tx,
    };
    (channel, server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dto::contest::AnswerSelection, error::ClientError};

    #[tokio::test]
    async fn join_round_trips_through_the_pair() {
        let (channel, mut server) = pair();

        let server_task = tokio::spawn(async move {
            let (event, responder) = server.next_request().await.unwrap();
            assert_eq!(
                event,
                ClientEvent::JoinContest {
                    contest_id: "c1".into()
                }
            );
            responder.ack(AckPayload::ok());
        });

        channel.join("c1").await.unwrap();
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn rejection_carries_the_server_message() {
        let (channel, server) = pair();
        tokio::spawn(server.serve(|_| AckPayload::rejected("Contest is full")));

        let err = channel.join("c1").await.unwrap_err();
        match err {
            ClientError::Rejected(message) => assert_eq!(message, "Contest is full"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_returns_the_verdict() {
        let (channel, server) = pair();
        tokio::spawn(server.serve(|event| match event {
            ClientEvent::SubmitAnswer { answer, .. } => {
                AckPayload::verdict(answer == AnswerSelection::Single("42".into()))
            }
            _ => AckPayload::rejected("unexpected"),
        }));

        assert!(
            channel
                .submit_answer("c1", "q1", AnswerSelection::Single("42".into()))
                .await
                .unwrap()
        );
        assert!(
            !channel
                .submit_answer("c1", "q2", AnswerSelection::Single("41".into()))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn pushed_events_reach_the_client() {
        let (mut channel, server) = pair();
        let pusher = server.pusher();
        tokio::spawn(server.serve(|_| AckPayload::ok()));

        pusher.push(ServerEvent::ContestEnded);
        assert_eq!(channel.next_event().await, Some(ServerEvent::ContestEnded));
    }

    #[tokio::test]
    async fn dropped_server_surfaces_as_disconnect() {
        let (channel, server) = pair();
        drop(server);

        let err = channel.join("c1").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Channel(ChannelError::Disconnected)
        ));
    }
}
