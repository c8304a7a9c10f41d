//! Room actor: an isolated Tokio task that owns one match.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. The mailbox serializes every precondition
//! check, mutation, and broadcast for the room, which is the per-room
//! exclusion scope: operations on distinct rooms never contend.
//!
//! Broadcasts are fire-and-forget unbounded sends; a participant whose
//! outbox is gone is silently skipped, so one dead peer never stalls
//! delivery to the other or blocks the next mutation.

use gridlock_protocol::{Mark, ServerMessage};
use tokio::sync::{mpsc, oneshot};

use crate::{MatchState, MoveError, RoomCode, RoomError, StateSnapshot};

/// Channel sender delivering outbound messages to one participant's
/// connection writer.
pub type ParticipantSender = mpsc::UnboundedSender<ServerMessage>;

/// Command channel size per room. Two participants submitting one-shot
/// requests never come close to this.
const CHANNEL_SIZE: usize = 64;

/// Commands sent to a room actor through its mailbox.
///
/// The `oneshot::Sender` in most variants is a reply channel: rejections
/// travel back to the requesting connection alone, while accepted
/// mutations are broadcast to every participant by the actor itself.
pub(crate) enum RoomCommand {
    /// Seat a second participant.
    Join {
        outbox: ParticipantSender,
        reply: oneshot::Sender<Result<Mark, RoomError>>,
    },

    /// Validate and apply a move for the given mark.
    Play {
        mark: Mark,
        index: i64,
        reply: oneshot::Sender<Result<(), MoveError>>,
    },

    /// Re-initialize the match in place.
    Reset { reply: oneshot::Sender<()> },

    /// A participant's connection closed: evict everyone and halt.
    Leave { mark: Mark },
}

/// Handle to a running room actor. Cheap to clone — it's an
/// `mpsc::Sender` wrapper plus the room code.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The code this room is registered under.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Returns `true` once the room actor has halted. A closed handle's
    /// seat assignment is stale and must be discarded.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Returns `true` if both handles address the same room actor, as
    /// opposed to a later room that recirculated the same code.
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Seats a participant in the free seat and returns their mark.
    ///
    /// On success the joiner's `room_joined` acknowledgment and the
    /// `start` broadcast are queued to the outboxes before this returns,
    /// in that order.
    ///
    /// # Errors
    /// [`RoomError::Full`] when both seats are taken; [`RoomError::NotFound`]
    /// when the room has already halted.
    pub async fn join(
        &self,
        outbox: ParticipantSender,
    ) -> Result<Mark, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                outbox,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::NotFound)?;
        reply_rx.await.map_err(|_| RoomError::NotFound)?
    }

    /// Submits a move. The outer `Err` means the room is gone; the inner
    /// `Err` is a game-rule rejection for the requester alone. On
    /// `Ok(Ok(()))` the resulting state has already been broadcast.
    pub async fn play(
        &self,
        mark: Mark,
        index: i64,
    ) -> Result<Result<(), MoveError>, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Play {
                mark,
                index,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::NotFound)?;
        reply_rx.await.map_err(|_| RoomError::NotFound)
    }

    /// Re-initializes the match and broadcasts the fresh state.
    pub async fn reset(&self) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Reset { reply: reply_tx })
            .await
            .map_err(|_| RoomError::NotFound)?;
        reply_rx.await.map_err(|_| RoomError::NotFound)
    }

    /// Reports that the participant holding `mark` disconnected. The
    /// actor notifies everyone else and halts; errors are meaningless
    /// here (the room may already be gone) and are swallowed.
    pub async fn leave(&self, mark: Mark) {
        let _ = self.sender.send(RoomCommand::Leave { mark }).await;
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    match_state: MatchState,
    /// Seats in join order: X first, O second.
    seats: Vec<(Mark, ParticipantSender)>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until a participant leaves or every handle
    /// is dropped.
    async fn run(mut self) {
        tracing::debug!(code = %self.code, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { outbox, reply } => {
                    let result = self.handle_join(outbox);
                    let _ = reply.send(result);
                }
                RoomCommand::Play { mark, index, reply } => {
                    let result = self.handle_play(mark, index);
                    let _ = reply.send(result);
                }
                RoomCommand::Reset { reply } => {
                    self.match_state.reset();
                    self.broadcast_state(self.match_state.snapshot());
                    tracing::debug!(code = %self.code, "match reset");
                    let _ = reply.send(());
                }
                RoomCommand::Leave { mark } => {
                    self.handle_leave(mark);
                    break;
                }
            }
        }

        tracing::debug!(code = %self.code, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        outbox: ParticipantSender,
    ) -> Result<Mark, RoomError> {
        if self.seats.len() >= 2 {
            return Err(RoomError::Full);
        }

        let mark = Mark::O;
        self.seats.push((mark, outbox));

        // The joiner's ack goes through their outbox ahead of the start
        // broadcast, so the client always sees room_joined before start.
        self.send_to(
            mark,
            ServerMessage::RoomJoined {
                room_code: self.code.to_string(),
                symbol: mark,
            },
        );

        // Both seats filled — the only point at which a match starts.
        let snapshot = self.match_state.snapshot();
        self.broadcast(ServerMessage::Start {
            board: snapshot.board,
            current_turn: snapshot.current_turn,
        });
        tracing::info!(code = %self.code, "match started");

        Ok(mark)
    }

    fn handle_play(
        &mut self,
        mark: Mark,
        index: i64,
    ) -> Result<(), MoveError> {
        // A rejection reaches only the requester via the reply channel;
        // nothing is broadcast and nothing was mutated.
        let snapshot = self.match_state.apply_move(mark, index)?;

        self.broadcast_state(snapshot);
        if let Some(winner) = snapshot.winner {
            tracing::info!(code = %self.code, %winner, "match won");
        } else if snapshot.draw {
            tracing::info!(code = %self.code, "match drawn");
        }
        Ok(())
    }

    fn handle_leave(&mut self, mark: Mark) {
        self.seats.retain(|(seated, _)| *seated != mark);
        for (_, outbox) in &self.seats {
            let _ = outbox.send(ServerMessage::OpponentLeft);
        }
        tracing::info!(code = %self.code, left = %mark, "participant left, room closing");
    }

    fn broadcast_state(&self, snapshot: StateSnapshot) {
        self.broadcast(ServerMessage::State {
            board: snapshot.board,
            current_turn: snapshot.current_turn,
            winner: snapshot.winner,
            line: snapshot.line,
            draw: snapshot.draw,
        });
    }

    /// Queues a message to every seated participant. Closed outboxes are
    /// silently skipped.
    fn broadcast(&self, msg: ServerMessage) {
        for (_, outbox) in &self.seats {
            let _ = outbox.send(msg.clone());
        }
    }

    fn send_to(&self, mark: Mark, msg: ServerMessage) {
        if let Some((_, outbox)) =
            self.seats.iter().find(|(seated, _)| *seated == mark)
        {
            let _ = outbox.send(msg);
        }
    }
}

/// Spawns a room actor with the owner seated as [`Mark::X`] and returns
/// a handle to it.
///
/// The owner's `room_created` acknowledgment is queued before the actor
/// processes any command, so it always precedes the `start` broadcast
/// triggered by a joiner.
pub(crate) fn spawn_room(
    code: RoomCode,
    owner: ParticipantSender,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let _ = owner.send(ServerMessage::RoomCreated {
        room_code: code.to_string(),
        symbol: Mark::X,
    });

    let actor = RoomActor {
        code: code.clone(),
        match_state: MatchState::new(),
        seats: vec![(Mark::X, owner)],
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
