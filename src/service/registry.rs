//! Owned registry of live matches.
//!
//! `MatchRegistry` replaces process-wide shared maps: it is constructed
//! explicitly, cloned cheaply, and handed to whatever collaborator needs to
//! reach a match. Each entry is a [`MatchHandle`] to that match's actor; the
//! lock only guards the table, never a match's state.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, instrument, warn};

use crate::ai::Strategy;
use crate::core::{
    EngineConfig, EngineError, IdGenerator, MatchId, MatchSetup, ParticipantId, Result,
    StartMatch, UuidIds,
};
use crate::game::{Match, MoveRecord};

use super::actor::{self, MatchHandle};
use super::messages::{
    AttemptBurn, AttemptMove, BoardSnapshotEvent, BurnSuccess, MatchEvent, MoveSuccess,
};

pub(crate) type MatchTable = Arc<RwLock<FxHashMap<MatchId, MatchHandle>>>;

/// Live matches, keyed by id.
#[derive(Clone)]
pub struct MatchRegistry {
    matches: MatchTable,
    ids: Arc<dyn IdGenerator>,
    config: EngineConfig,
    strategy: Option<Arc<dyn Strategy>>,
    events: broadcast::Sender<MatchEvent>,
}

impl std::fmt::Debug for MatchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchRegistry")
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Arc::new(UuidIds))
    }
}

impl MatchRegistry {
    /// Create an empty registry.
    pub fn new(config: EngineConfig, ids: Arc<dyn IdGenerator>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            matches: Arc::new(RwLock::new(FxHashMap::default())),
            ids,
            config,
            strategy: None,
            events,
        }
    }

    /// Drive every automated seat of matches started from now on with
    /// `strategy` instead of the one named in the AI configuration.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Receive every event of every match from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.events.subscribe()
    }

    /// Validate a wire request, then create and begin the match.
    #[instrument(skip_all)]
    pub async fn start_match(&self, request: &StartMatch) -> Result<MatchId> {
        let setup = MatchSetup::from_request(request, self.ids.as_ref()).map_err(|err| {
            warn!(%err, "start request rejected");
            err
        })?;
        self.start(setup).await
    }

    /// Create and begin a match from a validated setup.
    #[instrument(skip_all)]
    pub async fn start(&self, setup: MatchSetup) -> Result<MatchId> {
        let id = self.ids.next_match_id();
        let game = Match::from_setup(id, &setup)?;

        // Insert before the actor runs: a match that finishes immediately
        // removes itself, and that removal must find the entry.
        let mut table = self.matches.write().await;
        let handle = actor::spawn(
            game,
            self.config.mailbox_capacity,
            self.config.ai.clone(),
            self.strategy.clone(),
            self.events.clone(),
            Arc::clone(&self.matches),
        );
        table.insert(id, handle);
        drop(table);

        info!(match_id = %id, seats = setup.seats.len(), "match registered");
        Ok(id)
    }

    pub async fn attempt_move(&self, request: AttemptMove) -> Result<MoveSuccess> {
        self.handle(request.match_id)
            .await?
            .attempt_move(request.external_id, request.from, request.to)
            .await
    }

    pub async fn attempt_burn(&self, request: AttemptBurn) -> Result<BurnSuccess> {
        self.handle(request.match_id)
            .await?
            .attempt_burn(request.external_id, request.tile)
            .await
    }

    /// Tell the match that `participant` has left.
    pub async fn leave(&self, match_id: MatchId, participant: ParticipantId) -> Result<()> {
        self.handle(match_id).await?.leave(participant).await
    }

    /// Current public state of a match.
    pub async fn view(&self, match_id: MatchId) -> Result<BoardSnapshotEvent> {
        self.handle(match_id).await?.view().await
    }

    /// Every accepted mutation of a match so far.
    pub async fn history(&self, match_id: MatchId) -> Result<Vector<MoveRecord>> {
        self.handle(match_id).await?.history().await
    }

    /// Drop a match, stopping its actor once in-flight requests drain.
    /// Returns whether it was live.
    pub async fn remove(&self, match_id: MatchId) -> bool {
        let removed = self.matches.write().await.remove(&match_id).is_some();
        if removed {
            info!(%match_id, "match removed");
        }
        removed
    }

    pub async fn contains(&self, match_id: MatchId) -> bool {
        self.matches.read().await.contains_key(&match_id)
    }

    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clone the handle out so the table lock is not held across the request.
    async fn handle(&self, match_id: MatchId) -> Result<MatchHandle> {
        self.matches
            .read()
            .await
            .get(&match_id)
            .cloned()
            .ok_or(EngineError::UnknownMatch(match_id))
    }
}
