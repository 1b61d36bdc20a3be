//! Standings view: live snapshots over the channel with a bounded HTTP
//! fallback, and one-shot reads for finished contests.

use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::{
    dto::{channel::ServerEvent, contest::Standing},
    error::{ClientError, ClientResult},
    services::{api::ApiClient, channel::ContestChannel},
};

/// How long to wait for a live snapshot before falling back to the one-shot
/// HTTP read.
pub const FALLBACK_WINDOW: Duration = Duration::from_secs(3);

/// Standings snapshot for one contest.
pub struct StandingsBoard {
    contest_id: String,
    standings: Vec<Standing>,
    live: bool,
}

impl StandingsBoard {
    /// One-shot standings read for an ended contest or a history entry.
    /// No channel is opened and nothing refreshes.
    pub async fn load_final(api: &ApiClient, contest_id: &str) -> ClientResult<Self> {
        let standings = api.contest_standings(contest_id).await?;
        Ok(StandingsBoard {
            contest_id: contest_id.to_string(),
            standings,
            live: false,
        })
    }

    /// Open live standings: join the contest room and request a snapshot.
    ///
    /// If nothing arrives over the channel within [`FALLBACK_WINDOW`], one
    /// HTTP read fills the board instead. The fallback fires at most once;
    /// later pushes still refresh the board as usual.
    pub async fn open_live(
        api: &ApiClient,
        channel: &mut ContestChannel,
        contest_id: &str,
    ) -> ClientResult<Self> {
        channel.join(contest_id).await?;

        let standings = match Self::live_snapshot(channel, contest_id).await? {
            Some(snapshot) => snapshot,
            None => {
                warn!(contest_id, "no live standings within the window, falling back");
                api.contest_standings(contest_id).await?
            }
        };

        Ok(StandingsBoard {
            contest_id: contest_id.to_string(),
            standings,
            live: true,
        })
    }

    /// Request a snapshot over the channel and wait out the fallback window
    /// for it. `Ok(None)` means the window elapsed with nothing usable.
    async fn live_snapshot(
        channel: &mut ContestChannel,
        contest_id: &str,
    ) -> ClientResult<Option<Vec<Standing>>> {
        let wait = async {
            match channel.standings(contest_id).await {
                // The acknowledgement itself carried the snapshot.
                Ok(snapshot) => Ok(Some(snapshot)),
                // Acknowledged without data: the snapshot arrives as an
                // `updateStandings` push instead.
                Err(ClientError::Rejected(_)) => loop {
                    match channel.next_event().await {
                        Some(ServerEvent::UpdateStandings { standings }) => {
                            break Ok(Some(standings));
                        }
                        Some(_) => continue,
                        None => break Ok(None),
                    }
                },
                Err(err) => Err(err),
            }
        };

        match timeout(FALLBACK_WINDOW, wait).await {
            Ok(result) => result,
            Err(_) => Ok(None),
        }
    }

    /// Fold one server event into the board. Returns `true` when the
    /// snapshot was replaced.
    pub fn apply_event(&mut self, event: ServerEvent) -> bool {
        match event {
            ServerEvent::UpdateStandings { standings } => {
                // Replace-on-event: the latest snapshot wins outright.
                self.standings = standings;
                true
            }
            _ => false,
        }
    }

    /// Contest the board belongs to.
    pub fn contest_id(&self) -> &str {
        &self.contest_id
    }

    /// Current snapshot, in server rank order.
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    /// Whether the board refreshes from channel pushes.
    pub fn is_live(&self) -> bool {
        self.live
    }
}
