//! Game controller: owns the live session and writes every change through
//! the persistence gateway.

use crate::catalog::Catalog;
use crate::date_key::DateKey;
use crate::error::{GameError, GameResult};
use crate::gateway::{CompletionHistory, PersistenceGateway};
use crate::puzzle::{Position, PuzzleDefinition};
use crate::session::{CompletionRecord, Session, Transition};
use crate::share;
use crate::source::CatalogSource;

/// The hosting context for one player's daily puzzle
pub struct Game {
    session: Session,
    gateway: PersistenceGateway,
    source: Box<dyn CatalogSource>,
    /// The player's calendar day; later puzzles stay locked
    today: DateKey,
    /// Fetched lazily; only successful fetches are kept
    catalog: Option<Catalog>,
}

impl Game {
    /// Resume the saved session for `today`, or start today's puzzle
    pub fn start(
        today: &DateKey,
        source: Box<dyn CatalogSource>,
        gateway: PersistenceGateway,
    ) -> GameResult<Self> {
        match gateway.load(today) {
            Ok(Some(session)) => {
                log::info!(
                    "resuming puzzle {} ({} moves, {}s)",
                    session.puzzle_id(),
                    session.move_log().len(),
                    session.elapsed_time_seconds()
                );
                return Ok(Self {
                    session,
                    gateway,
                    source,
                    today: today.clone(),
                    catalog: None,
                });
            }
            Ok(None) => {}
            Err(e) => log::warn!("could not read saved session: {}", e),
        }

        let catalog = source.fetch()?;
        let puzzle = catalog.puzzle_for(today)?.clone();
        let session = Self::session_for(&gateway, puzzle);
        log::info!("starting puzzle {} from {}", today, source.source_name());

        let game = Self {
            session,
            gateway,
            source,
            today: today.clone(),
            catalog: Some(catalog),
        };
        game.persist();
        Ok(game)
    }

    /// Read-only view of the live session
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn today(&self) -> &DateKey {
        &self.today
    }

    pub fn source_name(&self) -> String {
        self.source.source_name()
    }

    pub fn select_cell(&mut self, pos: Position) -> Transition {
        self.apply(|session| session.select_cell(pos))
    }

    pub fn enter_value(&mut self, value: u8) -> Transition {
        self.apply(|session| session.enter_value(Some(value)))
    }

    pub fn clear_value(&mut self) -> Transition {
        self.apply(Session::clear_value)
    }

    pub fn reveal(&mut self) -> Transition {
        self.apply(Session::reveal)
    }

    pub fn reset(&mut self) -> Transition {
        self.apply(Session::reset)
    }

    /// One second of wall-clock time passed
    pub fn tick(&mut self) -> bool {
        let advanced = self.session.tick();
        if advanced {
            self.persist();
        }
        advanced
    }

    /// Replace the live session with the puzzle for `date_key`.
    ///
    /// Dates after today have no puzzle yet. On a lookup miss or source
    /// failure the current session stays as is.
    pub fn load_for_date(&mut self, date_key: &DateKey) -> GameResult<&Session> {
        if *date_key > self.today {
            log::info!("refusing to load {}, today is {}", date_key, self.today);
            return Err(GameError::NoPuzzleForDate(date_key.clone()));
        }
        let puzzle = self.catalog()?.puzzle_for(date_key)?.clone();
        let session = Self::session_for(&self.gateway, puzzle);

        self.session.release_clock();
        self.session = session;
        log::info!(
            "loaded puzzle {} (completed: {})",
            date_key,
            self.session.is_completed()
        );
        self.persist();
        Ok(&self.session)
    }

    /// Every completion recorded so far; storage failures read as empty
    pub fn completion_history(&self) -> CompletionHistory {
        self.gateway.load_completion_history().unwrap_or_else(|e| {
            log::warn!("could not read completion history: {}", e);
            CompletionHistory::new()
        })
    }

    pub fn share_text(&self) -> Option<String> {
        share::share_session(&self.session)
    }

    fn session_for(gateway: &PersistenceGateway, puzzle: PuzzleDefinition) -> Session {
        let record = gateway
            .load_completion_history()
            .map(|mut history| history.remove(&puzzle.id))
            .unwrap_or_else(|e| {
                log::warn!("could not read completion history: {}", e);
                None
            });
        match record {
            Some(record) => Session::from_completion(puzzle, &record),
            None => Session::new(puzzle),
        }
    }

    fn catalog(&mut self) -> GameResult<&Catalog> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => self.source.fetch().map_err(|e| {
                log::warn!("catalog fetch from {} failed: {}", self.source.source_name(), e);
                e
            })?,
        };
        Ok(self.catalog.insert(catalog))
    }

    fn apply(&mut self, transition: impl FnOnce(&mut Session) -> Transition) -> Transition {
        let outcome = transition(&mut self.session);
        if let Transition::Completed(record) = &outcome {
            self.record_completion(record);
        }
        if outcome.changed() {
            self.persist();
        }
        outcome
    }

    fn record_completion(&self, record: &CompletionRecord) {
        if let Err(e) = self.gateway.record_completion(&record.puzzle_id, record) {
            log::warn!("could not record completion of {}: {}", record.puzzle_id, e);
        }
    }

    fn persist(&self) {
        if let Err(e) = self.gateway.save(&self.session) {
            log::warn!("could not save session: {}", e);
        }
    }
}
