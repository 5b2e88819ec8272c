//! Per-match actor.
//!
//! Each live match is one tokio task that owns its [`Match`] outright.
//! Everything that mutates the match (human requests, the turn timer,
//! automated decisions) arrives through the task's mailbox or its `select!`
//! loop, so mutations of one match never interleave.
//!
//! Automated seats think on the blocking pool against a private copy of the
//! board and post the decision back into the same mailbox, tagged with the
//! clock epoch it was computed for. A decision for a stale epoch is dropped.
//!
//! The task exits, and removes itself from the registry, when the match
//! finishes, when every human seat has left, or when the last handle is
//! dropped. A quarantined match keeps answering with
//! [`EngineError::Quarantined`] until it is removed or every human seat has
//! left it.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashSet;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::ai::{AiConfig, AiPlayer, Strategy};
use crate::core::{
    Coord, EngineError, GameRng, MatchId, ParticipantId, Result, SeatId, TurnAction,
};
use crate::game::{Match, MatchStatus, MoveRecord};

use super::messages::{
    BoardSnapshotEvent, BurnSuccess, MatchEvent, MatchFinished, MoveSuccess, TurnTimedOut,
};
use super::registry::MatchTable;

/// Requests a match actor understands.
#[derive(Debug)]
pub(crate) enum Command {
    Move {
        participant: ParticipantId,
        from: Coord,
        to: Coord,
        reply: oneshot::Sender<Result<MoveSuccess>>,
    },
    Burn {
        participant: ParticipantId,
        tile: Coord,
        reply: oneshot::Sender<Result<BurnSuccess>>,
    },
    Leave {
        participant: ParticipantId,
        reply: oneshot::Sender<Result<()>>,
    },
    View {
        reply: oneshot::Sender<BoardSnapshotEvent>,
    },
    History {
        reply: oneshot::Sender<Vector<MoveRecord>>,
    },
    AiDecision {
        epoch: u64,
        seat: SeatId,
        result: Result<TurnAction>,
    },
}

/// Cloneable sender side of a match actor.
#[derive(Clone, Debug)]
pub struct MatchHandle {
    id: MatchId,
    tx: mpsc::Sender<Command>,
}

impl MatchHandle {
    #[must_use]
    pub fn id(&self) -> MatchId {
        self.id
    }

    pub async fn attempt_move(
        &self,
        participant: ParticipantId,
        from: Coord,
        to: Coord,
    ) -> Result<MoveSuccess> {
        self.request(|reply| Command::Move {
            participant,
            from,
            to,
            reply,
        })
        .await?
    }

    pub async fn attempt_burn(&self, participant: ParticipantId, tile: Coord) -> Result<BurnSuccess> {
        self.request(|reply| Command::Burn {
            participant,
            tile,
            reply,
        })
        .await?
    }

    pub async fn leave(&self, participant: ParticipantId) -> Result<()> {
        self.request(|reply| Command::Leave { participant, reply })
            .await?
    }

    pub async fn view(&self) -> Result<BoardSnapshotEvent> {
        self.request(|reply| Command::View { reply }).await
    }

    pub async fn history(&self) -> Result<Vector<MoveRecord>> {
        self.request(|reply| Command::History { reply }).await
    }

    /// Send a command and wait for its reply. A closed mailbox or a dropped
    /// reply both mean the match is gone.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| EngineError::UnknownMatch(self.id))?;
        response.await.map_err(|_| EngineError::UnknownMatch(self.id))
    }
}

/// Spawn the actor for an already begun match.
pub(crate) fn spawn(
    game: Match,
    mailbox_capacity: usize,
    ai: AiConfig,
    strategy: Option<Arc<dyn Strategy>>,
    events: broadcast::Sender<MatchEvent>,
    table: MatchTable,
) -> MatchHandle {
    let id = game.id();
    let (tx, rx) = mpsc::channel(mailbox_capacity.max(1));
    let actor = MatchActor {
        ai_rng: GameRng::new(ai.seed),
        ai,
        strategy,
        armed_epoch: 0,
        deadline: None,
        ai_requested: None,
        quarantined: None,
        left_while_halted: FxHashSet::default(),
        abandoned: false,
        announced: false,
        self_tx: tx.downgrade(),
        rx,
        events,
        game,
    };

    tokio::spawn(async move {
        actor.run().await;
        table.write().await.remove(&id);
        debug!(match_id = %id, "match removed from registry");
    });

    MatchHandle { id, tx }
}

struct MatchActor {
    game: Match,
    rx: mpsc::Receiver<Command>,
    self_tx: mpsc::WeakSender<Command>,
    events: broadcast::Sender<MatchEvent>,

    ai: AiConfig,
    strategy: Option<Arc<dyn Strategy>>,
    ai_rng: GameRng,
    ai_requested: Option<u64>,

    armed_epoch: u64,
    deadline: Option<Instant>,

    quarantined: Option<String>,
    /// Departures recorded after quarantine, when the match itself is frozen.
    left_while_halted: FxHashSet<SeatId>,
    abandoned: bool,
    announced: bool,
}

impl MatchActor {
    #[instrument(skip_all, fields(match_id = %self.game.id()))]
    async fn run(mut self) {
        self.publish_snapshot();
        self.after_change();

        while !self.is_done() {
            let deadline = self.deadline;
            tokio::select! {
                command = self.rx.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command);
                }
                () = sleep_until(deadline) => self.on_timer(),
            }
        }

        info!(
            status = %self.game.status(),
            abandoned = self.abandoned,
            "match torn down"
        );
    }

    fn is_done(&self) -> bool {
        self.abandoned || self.game.status() == MatchStatus::Finished
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::View { reply } => {
                let _ = reply.send(BoardSnapshotEvent::of(&self.game));
            }
            Command::History { reply } => {
                let _ = reply.send(self.game.history().clone());
            }
            Command::Move {
                participant,
                from,
                to,
                reply,
            } => {
                let result = self.guard().and_then(|()| {
                    let seat = self.game.seat_of(&participant)?;
                    self.game.attempt_move(seat, from, to)
                });
                let result = self.settle(result).map(|_| MoveSuccess { to });
                let _ = reply.send(result);
            }
            Command::Burn {
                participant,
                tile,
                reply,
            } => {
                let result = self.guard().and_then(|()| {
                    let seat = self.game.seat_of(&participant)?;
                    self.game.attempt_burn(seat, tile)
                });
                let result = self.settle(result).map(|_| BurnSuccess {
                    finished: self.game.status() == MatchStatus::Finished,
                });
                let _ = reply.send(result);
            }
            Command::Leave { participant, reply } if self.quarantined.is_some() => {
                let _ = reply.send(self.leave_halted(&participant));
            }
            Command::Leave { participant, reply } => {
                let result = self.guard().and_then(|()| {
                    let seat = self.game.seat_of(&participant)?;
                    self.game.leave(seat)
                });
                let result = match result {
                    // Already gone or match over: nothing to publish.
                    Ok(false) => Ok(()),
                    other => self.settle(other).map(|_| ()),
                };
                let _ = reply.send(result);
            }
            Command::AiDecision {
                epoch,
                seat,
                result,
            } => self.apply_ai_decision(epoch, seat, result),
        }
    }

    fn guard(&self) -> Result<()> {
        match self.quarantined {
            Some(_) => Err(EngineError::Quarantined(self.game.id())),
            None => Ok(()),
        }
    }

    /// Common tail of every request: publish on success, log and possibly
    /// quarantine on failure, then re-arm timer and AI.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                self.publish_snapshot();
                if self.all_humans_left() {
                    info!("every human seat has left");
                    self.abandoned = true;
                }
            }
            Err(err) if err.is_internal() && self.quarantined.is_none() => {
                self.quarantine(err.to_string());
            }
            Err(err) => warn!(%err, "request rejected"),
        }
        self.after_change();
        result
    }

    fn all_humans_left(&self) -> bool {
        let mut humans = self.game.players().human_seats().peekable();
        humans.peek().is_some()
            && humans.all(|seat| {
                self.game.is_departed(seat) || self.left_while_halted.contains(&seat)
            })
    }

    /// A quarantined match is never mutated again, but it still has to go
    /// away once nobody is watching it.
    fn leave_halted(&mut self, participant: &ParticipantId) -> Result<()> {
        let seat = self.game.seat_of(participant)?;
        self.left_while_halted.insert(seat);
        info!(%seat, "seat left a halted match");
        if self.all_humans_left() {
            info!("every human seat has left");
            self.abandoned = true;
        }
        Ok(())
    }

    fn on_timer(&mut self) {
        self.deadline = None;
        match self.game.expire_turn(self.armed_epoch) {
            Ok(Some(outcome)) => {
                self.publish(MatchEvent::TimedOut(TurnTimedOut {
                    match_id: self.game.id(),
                    seat: outcome.seat,
                    action: outcome.action,
                }));
                self.publish_snapshot();
            }
            Ok(None) => {}
            Err(err) => self.quarantine(err.to_string()),
        }
        self.after_change();
    }

    fn apply_ai_decision(&mut self, epoch: u64, seat: SeatId, result: Result<TurnAction>) {
        self.ai_requested = None;
        if self.quarantined.is_some()
            || self.game.status() != MatchStatus::Active
            || epoch != self.game.clock_epoch()
            || seat != self.game.turn()
        {
            debug!(epoch, %seat, "dropping stale automated decision");
            self.after_change();
            return;
        }

        let applied = result.and_then(|action| {
            self.game.attempt_move(seat, action.from, action.to)?;
            self.publish_snapshot();
            self.game.attempt_burn(seat, action.burn)?;
            self.publish_snapshot();
            Ok(())
        });

        if let Err(err) = applied {
            // Any rejection of an automated turn is a defect on our side.
            self.quarantine(format!("automated {seat}: {err}"));
        }
        self.after_change();
    }

    /// Re-arm the timer for a new clock epoch and kick off automated seats.
    fn after_change(&mut self) {
        if self.game.status() == MatchStatus::Finished {
            self.deadline = None;
            self.publish_finished();
            return;
        }
        if self.quarantined.is_some() || self.game.status() != MatchStatus::Active {
            self.deadline = None;
            return;
        }

        let epoch = self.game.clock_epoch();
        if epoch != self.armed_epoch {
            self.armed_epoch = epoch;
            self.deadline = Some(Instant::now() + self.game.turn_budget());
        }

        if self.game.automated_on_turn() && self.ai_requested != Some(epoch) {
            self.request_ai(epoch);
        }
    }

    fn request_ai(&mut self, epoch: u64) {
        let Some(tx) = self.self_tx.upgrade() else {
            return;
        };
        self.ai_requested = Some(epoch);

        let board = self.game.board().clone();
        let seat = self.game.turn();
        let config = self.ai.clone().with_seed(self.ai_rng.fork().seed());
        let mut ai = AiPlayer::new(*self.game.validator(), config).with_departed(
            SeatId::all(self.game.players().seat_count()).filter(|&s| self.game.is_departed(s)),
        );
        if let Some(strategy) = &self.strategy {
            ai = ai.with_strategy(Arc::clone(strategy));
        }
        let deadline = std::time::Instant::now() + self.ai.think_time(self.game.turn_budget());
        debug!(%seat, epoch, "automated seat thinking");

        tokio::task::spawn_blocking(move || {
            let result = ai.choose_action(&board, seat, deadline);
            // The actor may be gone by now; nothing to report to.
            let _ = tx.blocking_send(Command::AiDecision {
                epoch,
                seat,
                result,
            });
        });
    }

    fn quarantine(&mut self, reason: String) {
        error!(%reason, "match quarantined");
        self.deadline = None;
        self.quarantined = Some(reason.clone());
        self.publish(MatchEvent::Quarantined {
            match_id: self.game.id(),
            reason,
        });
    }

    fn publish_snapshot(&self) {
        self.publish(MatchEvent::Snapshot(BoardSnapshotEvent::of(&self.game)));
    }

    fn publish_finished(&mut self) {
        if self.announced {
            return;
        }
        self.announced = true;
        let winner_seat = self.game.winner();
        info!(winner = ?winner_seat, "match finished");
        self.publish(MatchEvent::Finished(MatchFinished {
            match_id: self.game.id(),
            winner_seat,
            winner: winner_seat.and_then(|seat| self.game.players().participant(seat).cloned()),
        }));
    }

    fn publish(&self, event: MatchEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
