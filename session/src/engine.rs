use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::{Stream, StreamExt, future};
use memorito_core::{
    Deck, DeckGenerator, GameConfig, IndexPair, PendingPhase, PlayEngine, RandomDeckGenerator, RevealOutcome, Tile,
    TileIndex, reconcile_best,
};
use memorito_protocol::{GameEvent, Snapshot};
use rand::prelude::*;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::events::EventHub;
use crate::*;

/// Handle to a running game. Clones share the same session.
///
/// Commands apply synchronously and never wait on the score service or on timers; those run as tasks on the tokio
/// runtime the engine was created in. Every task is keyed to the generation of the deck it was scheduled for, so
/// work left over from a replaced deck cannot touch the current one.
pub struct GameEngine<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for GameEngine<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

struct Inner<S> {
    config: EngineConfig,
    game_config: GameConfig,
    service: S,
    runtime: Handle,
    session: Mutex<Session>,
}

struct Session {
    engine: PlayEngine,
    generation: u64,
    personal_best: Option<u32>,
    auth: AuthState,
    seeds: SmallRng,
    hide_task: Option<AbortHandle>,
    events: EventHub,
}

impl Session {
    fn apply_best(&mut self, incoming: Option<u32>) {
        let best = reconcile_best(self.personal_best, incoming);
        if best == self.personal_best {
            return;
        }
        self.personal_best = best;
        if let Some(value) = best {
            log::info!("personal best is now {}", value);
            self.events.emit(GameEvent::PersonalBest { value });
        }
    }
}

impl<S: ScoreService> GameEngine<S> {
    /// Starts the first game and signs in to `service` in the background.
    ///
    /// Fails when the pair count is out of range or when called outside a tokio runtime.
    pub fn new(config: EngineConfig, service: S) -> Result<Self, SessionError> {
        let runtime = Handle::try_current()?;
        let game_config = GameConfig::try_new(config.pairs)?;

        let mut seeds = SmallRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let deck = RandomDeckGenerator::new(seeds.random()).generate(game_config);
        log::info!("starting game 1 with {} pairs on leaderboard {}", game_config.pairs, config.leaderboard);

        let session = Session {
            engine: PlayEngine::new(deck),
            generation: 1,
            personal_best: None,
            auth: AuthState::Unauthenticated,
            seeds,
            hide_task: None,
            events: EventHub::default(),
        };
        let engine =
            Self { inner: Arc::new(Inner { config, game_config, service, runtime, session: Mutex::new(session) }) };
        engine.authenticate();
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Replaces the deck with a freshly shuffled one. The personal best carries over.
    pub fn new_game(&self) {
        let mut session = self.inner.lock();
        let seed = session.seeds.random();
        let deck = RandomDeckGenerator::new(seed).generate(self.inner.game_config);
        self.install_deck(&mut session, deck);
    }

    /// Replaces the deck with the given layout.
    pub fn new_game_with_deck(&self, deck: Deck) {
        let mut session = self.inner.lock();
        self.install_deck(&mut session, deck);
    }

    /// Reveals the tile at `index`. Mis-taps are routine, so rejected reveals are a silent
    /// [`RevealOutcome::NoChange`].
    pub fn reveal(&self, index: TileIndex) -> RevealOutcome {
        let mut session = self.inner.lock();
        let outcome = match session.engine.reveal(index) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("reveal {} rejected: {}", index, err);
                return RevealOutcome::NoChange;
            }
        };
        log::trace!("reveal {} -> {:?}, {} moves", index, outcome, session.engine.move_count());

        match outcome {
            RevealOutcome::Matched { pair, won } => {
                session.events.emit(GameEvent::Matched { indices: pair });
                if won {
                    self.finish_game(&mut session);
                }
            }
            RevealOutcome::Mismatched { pair } => {
                session.events.emit(GameEvent::Mismatched { indices: pair });
                self.schedule_hide(&mut session, pair);
            }
            RevealOutcome::FirstUp(_) | RevealOutcome::NoChange => {}
        }
        outcome
    }

    /// Signs in again, e.g. after the platform reported an account change.
    pub fn authenticate(&self) {
        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(inner.sign_in());
    }

    /// Fetches the leaderboard best in the background and folds it into the personal best.
    pub fn refresh_personal_best(&self) {
        let generation = self.inner.lock().generation;
        self.spawn_refresh(generation);
    }

    pub fn subscribe(&self) -> EventStream {
        self.inner.lock().events.subscribe()
    }

    /// Index pairs that just matched.
    pub fn on_matched(&self) -> impl Stream<Item = IndexPair> + Send + 'static {
        self.subscribe().filter_map(|event| future::ready(event.matched_indices()))
    }

    /// Index pairs that just mismatched, still face up until the grace period ends.
    pub fn on_mismatched(&self) -> impl Stream<Item = IndexPair> + Send + 'static {
        self.subscribe().filter_map(|event| future::ready(event.mismatched_indices()))
    }

    pub fn snapshot(&self) -> Snapshot {
        let session = self.inner.lock();
        Snapshot::from_engine(
            &session.engine,
            session.generation,
            session.personal_best,
            session.auth.is_authenticated(),
        )
    }

    pub fn tiles(&self) -> Vec<Tile> {
        self.inner.lock().engine.tiles().to_vec()
    }

    pub fn move_count(&self) -> u32 {
        self.inner.lock().engine.move_count()
    }

    pub fn pending_indices(&self) -> Vec<TileIndex> {
        self.inner.lock().engine.pending_indices().to_vec()
    }

    pub fn phase(&self) -> PendingPhase {
        self.inner.lock().engine.phase()
    }

    pub fn is_won(&self) -> bool {
        self.inner.lock().engine.is_won()
    }

    pub fn personal_best(&self) -> Option<u32> {
        self.inner.lock().personal_best
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().auth.is_authenticated()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    fn install_deck(&self, session: &mut Session, deck: Deck) {
        if let Some(hide_task) = session.hide_task.take() {
            hide_task.abort();
        }

        session.generation += 1;
        let pairs = deck.pair_count();
        session.engine = PlayEngine::new(deck);
        log::info!("starting game {} with {} pairs", session.generation, pairs);
        session.events.emit(GameEvent::NewGame { generation: session.generation, pairs });

        if session.auth.is_authenticated() {
            self.spawn_refresh(session.generation);
        }
    }

    fn schedule_hide(&self, session: &mut Session, pair: IndexPair) {
        let inner = Arc::clone(&self.inner);
        let generation = session.generation;
        let grace_period = self.inner.config.grace_period;

        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep(grace_period).await;
            inner.hide_mismatch(generation, pair);
        });
        if let Some(stale) = session.hide_task.replace(task.abort_handle()) {
            stale.abort();
        }
    }

    fn finish_game(&self, session: &mut Session) {
        let moves = session.engine.move_count();
        let generation = session.generation;
        log::info!("game {} won in {} moves", generation, moves);
        session.events.emit(GameEvent::Won { moves });

        let previous_best = session.personal_best;
        session.apply_best(Some(moves));

        let submit = if !session.auth.is_authenticated() {
            log::info!("not signed in, keeping score {} locally", moves);
            false
        } else if !self.inner.config.submit_policy.should_submit(previous_best, moves) {
            log::info!("score {} does not beat personal best {:?}, not submitting", moves, previous_best);
            false
        } else {
            true
        };

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(inner.report_win(generation, moves, submit));
    }

    fn spawn_refresh(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            inner.refresh_best(generation).await;
        });
    }
}

impl<S: ScoreService> Inner<S> {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hide_mismatch(&self, generation: u64, pair: IndexPair) {
        let mut session = self.lock();
        if session.generation != generation {
            log::debug!("hide timer of game {} fired during game {}, ignored", generation, session.generation);
            return;
        }

        session.hide_task = None;
        match session.engine.resolve_mismatch() {
            Some(hidden) => {
                debug_assert_eq!(hidden, pair);
                session.events.emit(GameEvent::MismatchHidden { indices: hidden });
            }
            None => log::debug!("tiles {:?} already resolved", pair),
        }
    }

    async fn sign_in(self: Arc<Self>) {
        let auth = match self.service.authenticate().await {
            Ok(auth) => auth,
            Err(err) => {
                log::warn!("authentication failed: {}", err);
                AuthState::Unauthenticated
            }
        };

        let authenticated = auth.is_authenticated();
        let generation = {
            let mut session = self.lock();
            match &auth {
                AuthState::Authenticated { player } => log::info!("signed in as {}", player),
                AuthState::Unauthenticated => log::info!("playing signed out"),
            }
            session.auth = auth;
            session.events.emit(GameEvent::AuthChanged { authenticated });
            session.generation
        };

        if authenticated {
            self.refresh_best(generation).await;
        }
    }

    async fn report_win(self: Arc<Self>, generation: u64, moves: u32, submit: bool) {
        if submit {
            match self.service.submit_score(moves, &self.config.leaderboard).await {
                Ok(()) => log::info!("submitted {} moves to {}", moves, self.config.leaderboard),
                Err(err) => log::warn!("failed to submit {} moves: {}", moves, err),
            }
        }
        self.refresh_best(generation).await;
    }

    /// Only ever writes the personal best, which is valid across games.
    async fn refresh_best(&self, generation: u64) {
        if !self.lock().auth.is_authenticated() {
            log::debug!("not signed in, skipping personal best refresh");
            return;
        }

        let incoming = match self.service.load_personal_best(&self.config.leaderboard).await {
            Ok(incoming) => incoming,
            Err(err) => {
                log::warn!("failed to load personal best: {}", err);
                return;
            }
        };

        let mut session = self.lock();
        if session.generation != generation {
            log::debug!("personal best requested in game {} arrived during game {}", generation, session.generation);
        }
        session.apply_best(incoming);
    }
}
