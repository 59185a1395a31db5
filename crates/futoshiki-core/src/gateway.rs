//! Persistence gateway between sessions and durable storage.

use crate::date_key::DateKey;
use crate::error::{StoreError, StoreResult};
use crate::session::{CompletionRecord, Session};
use crate::store::StateBackend;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage key of the current-session slot
pub const SESSION_KEY: &str = "futoshiki_session";
/// Storage key of the completion history
pub const COMPLETED_KEY: &str = "futoshiki_completed";

/// Completion records keyed by puzzle id
pub type CompletionHistory = BTreeMap<String, CompletionRecord>;

/// Saves and restores sessions and the lifetime completion history
#[derive(Clone)]
pub struct PersistenceGateway {
    backend: Arc<dyn StateBackend>,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl PersistenceGateway {
    pub fn new(backend: Arc<dyn StateBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Replace the stored session wholesale
    pub fn save(&self, session: &Session) -> StoreResult<()> {
        let json = serde_json::to_string(session)?;
        self.backend.write(SESSION_KEY, &json)
    }

    /// The stored session for `date_key`, ready to continue.
    ///
    /// A session stored for any other date is a miss, as is unreadable data.
    pub fn load(&self, date_key: &DateKey) -> StoreResult<Option<Session>> {
        let Some(json) = self.backend.read(SESSION_KEY)? else {
            return Ok(None);
        };

        let mut session: Session = match serde_json::from_str(&json) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("discarding unreadable saved session: {}", e);
                return Ok(None);
            }
        };

        if !date_key.matches(session.puzzle_id()) {
            log::debug!(
                "saved session is for {}, not {}; ignoring it",
                session.puzzle_id(),
                date_key
            );
            return Ok(None);
        }

        session.resume();
        Ok(Some(session))
    }

    /// Store `record` under `puzzle_id`, replacing any earlier one.
    ///
    /// Refuses to write over a stored history it cannot read.
    pub fn record_completion(&self, puzzle_id: &str, record: &CompletionRecord) -> StoreResult<()> {
        let mut history = self.read_history()?;
        history.insert(puzzle_id.to_string(), record.clone());
        let json = serde_json::to_string_pretty(&history)?;
        self.backend.write(COMPLETED_KEY, &json)
    }

    /// Every recorded completion; an unreadable history reads as empty
    pub fn load_completion_history(&self) -> StoreResult<CompletionHistory> {
        match self.read_history() {
            Err(StoreError::Serialize(e)) => {
                log::warn!("completion history unreadable: {}", e);
                Ok(CompletionHistory::new())
            }
            other => other,
        }
    }

    fn read_history(&self) -> StoreResult<CompletionHistory> {
        match self.backend.read(COMPLETED_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(CompletionHistory::new()),
        }
    }

    /// The completion recorded for `date_key`, if any
    pub fn completion_for(&self, date_key: &DateKey) -> StoreResult<Option<CompletionRecord>> {
        Ok(self.load_completion_history()?.remove(date_key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MoveTag;
    use crate::store::{FileStore, MemoryStore};
    use crate::test_support::{enter_at, sample_puzzle, SAMPLE_ID};
    use chrono::Utc;

    fn memory_gateway() -> (Arc<MemoryStore>, PersistenceGateway) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PersistenceGateway::new(store))
    }

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn record(moves: Vec<MoveTag>, secs: u64) -> CompletionRecord {
        CompletionRecord {
            puzzle_id: SAMPLE_ID.to_string(),
            completion_timestamp: Utc::now(),
            time_spent_seconds: secs,
            move_log: moves,
        }
    }

    #[test]
    fn test_empty_store_is_a_miss() {
        let (_, gateway) = memory_gateway();
        assert!(gateway.load(&key(SAMPLE_ID)).unwrap().is_none());
        assert!(gateway.load_completion_history().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_same_date() {
        let (_, gateway) = memory_gateway();
        let mut session = Session::new(sample_puzzle());
        enter_at(&mut session, 0, 1, 2);
        session.tick();
        gateway.save(&session).unwrap();

        let restored = gateway.load(&key(SAMPLE_ID)).unwrap().unwrap();
        assert_eq!(restored.grid(), session.grid());
        assert_eq!(restored.move_log(), &[MoveTag::Correct]);
        assert_eq!(restored.elapsed_time_seconds(), 1);
        assert!(restored.is_clock_running());
    }

    #[test]
    fn test_next_day_is_a_miss() {
        let (_, gateway) = memory_gateway();
        gateway.save(&Session::new(sample_puzzle())).unwrap();
        assert!(gateway.load(&key("20250103")).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_is_a_miss() {
        let (store, gateway) = memory_gateway();
        store.put_raw(SESSION_KEY, "{ not json");
        assert!(gateway.load(&key(SAMPLE_ID)).unwrap().is_none());
    }

    #[test]
    fn test_unavailable_store_reports_error() {
        let (store, gateway) = memory_gateway();
        store.set_available(false);
        assert!(gateway.save(&Session::new(sample_puzzle())).is_err());
        assert!(gateway.load(&key(SAMPLE_ID)).is_err());
    }

    #[test]
    fn test_completion_history_last_write_wins() {
        let (_, gateway) = memory_gateway();
        gateway
            .record_completion(SAMPLE_ID, &record(vec![MoveTag::Incorrect], 90))
            .unwrap();
        gateway
            .record_completion("20250101", &record(vec![MoveTag::Perfect], 30))
            .unwrap();
        gateway
            .record_completion(SAMPLE_ID, &record(vec![MoveTag::Correct], 45))
            .unwrap();

        let history = gateway.load_completion_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[SAMPLE_ID].time_spent_seconds, 45);

        let found = gateway.completion_for(&key(SAMPLE_ID)).unwrap().unwrap();
        assert_eq!(found.move_log, vec![MoveTag::Correct]);
        assert!(gateway.completion_for(&key("20250109")).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_history_is_never_overwritten() {
        let (store, gateway) = memory_gateway();
        let stored = r#"{"20240102":{"puzzle_id":"20240102","completion_timestamp":"2024-01-02T10:00:00Z","time_spent_seconds":60,"move_log":["BOGUS"]}}"#;
        store.put_raw(COMPLETED_KEY, stored);

        let result = gateway.record_completion(SAMPLE_ID, &record(vec![MoveTag::Perfect], 30));
        assert!(matches!(result, Err(StoreError::Serialize(_))));
        assert_eq!(store.read(COMPLETED_KEY).unwrap().as_deref(), Some(stored));
        assert!(gateway.load_completion_history().unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_gateway_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(sample_puzzle());
        session.reveal();
        PersistenceGateway::new(Arc::new(FileStore::new(dir.path())))
            .save(&session)
            .unwrap();

        let reopened = PersistenceGateway::new(Arc::new(FileStore::new(dir.path())));
        let restored = reopened.load(&key(SAMPLE_ID)).unwrap().unwrap();
        assert!(restored.is_revealed());
        assert_eq!(reopened.backend_name(), "Local");
    }
}
