// 🗂️ Session Store - Owns the session state and keeps it durable
//
// Every operation builds the next state from a clone of the current one and
// swaps it in whole, so snapshots handed out earlier never change.
//
// Lifecycle:
//   new()  → uninitialized, default state, saves suppressed
//   load() → read + repair + reconcile, then initialized and saved once
//            (a failed read skips the save; the next change writes)
//   ops    → each change is written to the backend (best effort)

use crate::error::ValidationError;
use crate::partners::{self, MoneyTransfer, PartnerEntry, PartnerId};
use crate::pricing::{BowlerType, PricingTable, SidePotKey, TotalsBreakdown};
use crate::state::{parse_saved_state, SessionState, STORAGE_KEY};
use crate::storage::DocumentStore;
use std::sync::Arc;

// ============================================================================
// CONFIRMATION GATE
// ============================================================================

/// Destructive operations that need an explicit confirm step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetSession,
    ClearFavorites,
}

impl ConfirmAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            ConfirmAction::ResetSession => {
                "Start a new week? Selections and money exchanged will be cleared; partners stay."
            }
            ConfirmAction::ClearFavorites => {
                "Clear all favorites? Their partner entries will be removed too."
            }
        }
    }
}

/// How the startup load went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing saved yet
    Fresh,
    /// Saved state read and repaired
    Restored,
    /// Saved state unreadable, started from defaults
    Recovered,
    /// Backend read failed; defaults in memory, saved document left alone
    ReadFailed,
    /// `load` already ran for this store
    AlreadyLoaded,
}

// ============================================================================
// SESSION STORE
// ============================================================================

pub struct SessionStore<S: DocumentStore> {
    storage: S,
    pricing: PricingTable,
    state: Arc<SessionState>,
    initialized: bool,
    pending: Option<ConfirmAction>,
}

impl<S: DocumentStore> SessionStore<S> {
    /// Uninitialized store holding the default state
    pub fn new(storage: S, pricing: PricingTable) -> Self {
        SessionStore {
            storage,
            pricing,
            state: Arc::new(SessionState::default()),
            initialized: false,
            pending: None,
        }
    }

    /// Create and load in one step
    pub fn open(storage: S, pricing: PricingTable) -> Self {
        let mut store = Self::new(storage, pricing);
        store.load();
        store
    }

    /// Read the saved session from the backend, exactly once
    pub fn load(&mut self) -> LoadOutcome {
        if self.initialized {
            return LoadOutcome::AlreadyLoaded;
        }

        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("failed to read saved state, leaving it untouched: {}", e);
                self.state = Arc::new(SessionState::default());
                self.initialized = true;
                return LoadOutcome::ReadFailed;
            }
        };

        let (state, outcome) = match raw.as_deref().map(str::trim) {
            None | Some("") => (SessionState::default(), LoadOutcome::Fresh),
            Some(document) => match parse_saved_state(document) {
                Ok(state) => (state, LoadOutcome::Restored),
                Err(e) => {
                    log::warn!("failed to parse saved state, starting fresh: {}", e);
                    (SessionState::default(), LoadOutcome::Recovered)
                }
            },
        };

        log::debug!(
            "session loaded ({:?}): {} partners, {} favorites",
            outcome,
            state.doubles_entries.len(),
            state.favorites.len()
        );

        self.state = Arc::new(state);
        self.initialized = true;
        self.save();
        outcome
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Totals are derived on demand, never stored
    pub fn totals(&self) -> TotalsBreakdown {
        self.state.totals(&self.pricing)
    }

    /// Autocomplete candidates not yet added as partners
    pub fn available_partner_names(&self) -> Vec<&'static str> {
        partners::available_partner_names(&self.state.doubles_entries)
    }

    // ========================================================================
    // SELECTIONS
    // ========================================================================

    pub fn set_bowler_type(&mut self, bowler_type: BowlerType) {
        self.modify(|state| state.bowler_type = bowler_type);
    }

    /// Select a tier by its persisted name (`"regular"` / `"sub"`)
    pub fn select_bowler_type(&mut self, value: &str) -> Result<(), ValidationError> {
        let bowler_type = value.parse::<BowlerType>()?;
        self.set_bowler_type(bowler_type);
        Ok(())
    }

    pub fn set_side_pot(&mut self, key: SidePotKey, value: bool) {
        self.modify(|state| state.side_pots = state.side_pots.with(key, value));
    }

    pub fn toggle_side_pot(&mut self, key: SidePotKey) {
        let value = !self.state.side_pots.get(key);
        self.set_side_pot(key, value);
    }

    pub fn select_side_pot(&mut self, key: &str, value: bool) -> Result<(), ValidationError> {
        let key = key.parse::<SidePotKey>()?;
        self.set_side_pot(key, value);
        Ok(())
    }

    pub fn set_active_tab(&mut self, tab: Option<&str>) {
        if let Some(tab) = tab {
            self.modify(|state| state.active_tab = tab.to_string());
        }
    }

    // ========================================================================
    // PARTNERS
    // ========================================================================

    /// Append a partner; names are trimmed and unique ignoring case
    pub fn add_partner(&mut self, name: &str) -> Result<PartnerId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.state.has_partner_named(name) {
            return Err(ValidationError::DuplicatePartner(name.to_string()));
        }

        let entry = PartnerEntry::new(name);
        let id = entry.id.clone();
        self.modify(|state| state.doubles_entries.push(entry));
        log::debug!("added partner {} ({})", name, id);
        Ok(id)
    }

    /// Unknown ids are ignored
    pub fn update_partner_money_state(&mut self, id: &str, money_transfer: MoneyTransfer) {
        if self.state.entry(id).is_none() {
            return;
        }
        self.modify(|state| {
            if let Some(entry) = state.doubles_entries.iter_mut().find(|e| e.id == id) {
                entry.money_transfer = money_transfer;
            }
        });
    }

    /// Unknown ids are ignored; favorites are left as they are
    pub fn remove_partner(&mut self, id: &str) {
        if self.state.entry(id).is_none() {
            return;
        }
        self.modify(|state| state.doubles_entries.retain(|e| e.id != id));
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    /// Flip a favorite; returns whether `name` is a favorite afterwards
    ///
    /// Un-favoriting deletes the partner entry with exactly that name.
    /// Favoriting creates an entry unless one matches ignoring case.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        if self.state.is_favorite(name) {
            self.modify(|state| {
                state.favorites.retain(|f| f != name);
                state.doubles_entries.retain(|e| e.partner_name != name);
            });
            false
        } else {
            self.modify(|state| {
                state.favorites.push(name.to_string());
                if !state.has_partner_named(name) {
                    state.doubles_entries.push(PartnerEntry::new(name));
                }
            });
            true
        }
    }

    /// Drop every favorite along with its partner entry
    pub fn clear_all_favorites(&mut self) {
        if self.state.favorites.is_empty() {
            return;
        }
        self.modify(|state| {
            let favorites = std::mem::take(&mut state.favorites);
            state
                .doubles_entries
                .retain(|e| !favorites.contains(&e.partner_name));
        });
    }

    // ========================================================================
    // RESETS
    // ========================================================================

    /// New week: default selections, same partners, no money exchanged
    pub fn reset_for_new_session(&mut self) {
        self.modify(|state| {
            state.bowler_type = BowlerType::default();
            state.side_pots = Default::default();
            for entry in &mut state.doubles_entries {
                entry.money_transfer = MoneyTransfer::NoMoneyYet;
            }
        });
    }

    /// Delete the saved document and start over from defaults
    pub fn forget_saved_state(&mut self) {
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            log::error!("failed to remove saved state: {}", e);
        }
        self.state = Arc::new(SessionState::default());
        self.pending = None;
    }

    // ========================================================================
    // CONFIRMATION GATE
    // ========================================================================

    /// Park a destructive action until `confirm` or `cancel`
    pub fn request_confirmation(&mut self, action: ConfirmAction) {
        self.pending = Some(action);
    }

    pub fn pending_confirmation(&self) -> Option<ConfirmAction> {
        self.pending
    }

    /// Run the pending action, if any
    pub fn confirm(&mut self) -> Option<ConfirmAction> {
        let action = self.pending.take()?;
        match action {
            ConfirmAction::ResetSession => self.reset_for_new_session(),
            ConfirmAction::ClearFavorites => self.clear_all_favorites(),
        }
        Some(action)
    }

    pub fn cancel(&mut self) -> Option<ConfirmAction> {
        self.pending.take()
    }

    // ========================================================================
    // COMMIT + SAVE
    // ========================================================================

    fn modify(&mut self, change: impl FnOnce(&mut SessionState)) {
        let mut next = SessionState::clone(&self.state);
        change(&mut next);
        if next == *self.state {
            return;
        }
        self.state = Arc::new(next);
        self.save();
    }

    /// Fire-and-forget write; failures are logged, never returned
    fn save(&self) {
        if !self.initialized {
            log::debug!("save suppressed until saved state is loaded");
            return;
        }

        let document = match self.state.to_document() {
            Ok(document) => document,
            Err(e) => {
                log::error!("failed to serialize session state: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(STORAGE_KEY, &document) {
            log::error!("failed to save session state: {}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Money, SidePots};
    use crate::storage::MemoryDocumentStore;

    fn loaded(backend: &MemoryDocumentStore) -> SessionStore<&MemoryDocumentStore> {
        SessionStore::open(backend, PricingTable::default())
    }

    fn names(store: &SessionStore<&MemoryDocumentStore>) -> Vec<String> {
        store
            .state()
            .doubles_entries
            .iter()
            .map(|e| e.partner_name.clone())
            .collect()
    }

    #[test]
    fn test_load_blank_document_gives_defaults() {
        let backend = MemoryDocumentStore::with_document(STORAGE_KEY, "   ");
        let mut store = SessionStore::new(&backend, PricingTable::default());

        assert_eq!(store.load(), LoadOutcome::Fresh);
        assert_eq!(*store.state(), SessionState::default());
        assert_eq!(store.load(), LoadOutcome::AlreadyLoaded);
    }

    #[test]
    fn test_load_garbage_recovers() {
        let backend = MemoryDocumentStore::with_document(STORAGE_KEY, "{{{ nope");
        let mut store = SessionStore::new(&backend, PricingTable::default());

        assert_eq!(store.load(), LoadOutcome::Recovered);
        assert_eq!(*store.state(), SessionState::default());
        assert!(store.is_initialized());
    }

    #[test]
    fn test_failed_read_keeps_saved_document() {
        let saved = r#"{"bowlerType":"sub","doublesEntries":[{"id":"a1","partnerName":"Glen Lim","moneyTransfer":"iGave"}],"favorites":["Glen Lim"]}"#;
        let backend = MemoryDocumentStore::with_document(STORAGE_KEY, saved);
        backend.fail_next_reads(1);
        let mut store = SessionStore::new(&backend, PricingTable::default());

        assert_eq!(store.load(), LoadOutcome::ReadFailed);
        assert_eq!(*store.state(), SessionState::default());
        assert!(store.is_initialized());
        assert_eq!(backend.write_count(), 0);
        assert_eq!(backend.get(STORAGE_KEY).unwrap().as_deref(), Some(saved));
    }

    #[test]
    fn test_change_after_failed_read_is_saved() {
        let backend = MemoryDocumentStore::with_document(STORAGE_KEY, "{}");
        backend.fail_next_reads(1);
        let mut store = SessionStore::open(&backend, PricingTable::default());

        store.set_bowler_type(BowlerType::Sub);

        assert_eq!(backend.write_count(), 1);
        let saved = backend.get(STORAGE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"bowlerType\":\"sub\""));
    }

    #[test]
    fn test_saves_suppressed_until_loaded() {
        let backend = MemoryDocumentStore::new();
        let mut store = SessionStore::new(&backend, PricingTable::default());

        store.set_bowler_type(BowlerType::Sub);
        store.add_partner("Micah Grune").unwrap();
        assert_eq!(backend.write_count(), 0);
        assert!(!backend.contains(STORAGE_KEY));

        store.load();
        assert_eq!(store.state().bowler_type, BowlerType::Regular);
        assert_eq!(backend.write_count(), 1);

        store.set_bowler_type(BowlerType::Sub);
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn test_add_partner_rejects_empty_and_duplicates() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);

        assert_eq!(store.add_partner("   "), Err(ValidationError::EmptyName));

        let id = store.add_partner("  Jane Doe ").unwrap();
        assert_eq!(store.state().entry(&id).unwrap().partner_name, "Jane Doe");

        let writes = backend.write_count();
        assert_eq!(
            store.add_partner("jane doe"),
            Err(ValidationError::DuplicatePartner("jane doe".to_string()))
        );
        assert_eq!(store.state().doubles_entries.len(), 1);
        assert_eq!(backend.write_count(), writes);
    }

    #[test]
    fn test_add_then_remove_restores_sequence() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.add_partner("Guy Fujimoto").unwrap();
        store.add_partner("JR Viado").unwrap();
        let before = store.state().doubles_entries.clone();

        let id = store.add_partner("Mydee Viado").unwrap();
        store.remove_partner(&id);

        assert_eq!(store.state().doubles_entries, before);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.add_partner("Kelli Kirio").unwrap();
        let before = store.snapshot();

        store.update_partner_money_state("missing", MoneyTransfer::IGave);
        store.remove_partner("missing");

        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn test_update_money_state_keeps_order() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.add_partner("A").unwrap();
        let b = store.add_partner("B").unwrap();
        store.add_partner("C").unwrap();

        store.update_partner_money_state(&b, MoneyTransfer::TheyGaveMe);

        assert_eq!(names(&store), vec!["A", "B", "C"]);
        let states: Vec<MoneyTransfer> = store
            .state()
            .doubles_entries
            .iter()
            .map(|e| e.money_transfer)
            .collect();
        assert_eq!(
            states,
            vec![MoneyTransfer::NoMoneyYet, MoneyTransfer::TheyGaveMe, MoneyTransfer::NoMoneyYet]
        );
        assert_eq!(store.totals().total_owed_to_captain, Money::from_dollars(23));
    }

    #[test]
    fn test_snapshots_are_not_mutated() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        let before = store.snapshot();

        store.add_partner("Rachel Iha").unwrap();

        assert!(before.doubles_entries.is_empty());
        assert_eq!(store.snapshot().doubles_entries.len(), 1);
    }

    #[test]
    fn test_favorite_creates_and_unfavorite_removes_entry() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);

        assert!(store.toggle_favorite("Kaili Takara"));
        assert_eq!(names(&store), vec!["Kaili Takara"]);
        assert_eq!(
            store.state().doubles_entries[0].money_transfer,
            MoneyTransfer::NoMoneyYet
        );

        assert!(!store.toggle_favorite("Kaili Takara"));
        assert!(store.state().doubles_entries.is_empty());
        assert!(store.state().favorites.is_empty());
    }

    #[test]
    fn test_favorite_keeps_existing_entry_untouched() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        let id = store.add_partner("Logan Murakami").unwrap();
        store.update_partner_money_state(&id, MoneyTransfer::IGave);

        store.toggle_favorite("logan murakami");

        assert_eq!(store.state().doubles_entries.len(), 1);
        assert_eq!(store.state().doubles_entries[0].money_transfer, MoneyTransfer::IGave);

        // exact-name match only when un-favoriting
        store.toggle_favorite("logan murakami");
        assert_eq!(store.state().doubles_entries.len(), 1);
        assert!(store.state().favorites.is_empty());
    }

    #[test]
    fn test_direct_delete_leaves_dangling_favorite_until_reload() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.toggle_favorite("Celeste You");
        let id = store.state().doubles_entries[0].id.clone();

        store.remove_partner(&id);
        assert_eq!(store.state().dangling_favorites(), vec!["Celeste You"]);

        let reloaded = loaded(&backend);
        assert_eq!(names(&reloaded), vec!["Celeste You"]);
    }

    #[test]
    fn test_clear_all_favorites_removes_their_entries() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.add_partner("Bob Magallano").unwrap();
        store.toggle_favorite("John Frazier");
        store.toggle_favorite("Allan Quiocho");

        store.clear_all_favorites();

        assert!(store.state().favorites.is_empty());
        assert_eq!(names(&store), vec!["Bob Magallano"]);
    }

    #[test]
    fn test_reset_for_new_session_keeps_partners() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.set_bowler_type(BowlerType::Sub);
        store.set_side_pot(SidePotKey::Handicap, true);
        store.toggle_favorite("Ralstan Tanaka");
        let id = store.add_partner("Juan Limasa").unwrap();
        store.update_partner_money_state(&id, MoneyTransfer::TheyGaveMe);

        store.reset_for_new_session();

        let state = store.state();
        assert_eq!(state.bowler_type, BowlerType::Regular);
        assert_eq!(state.side_pots, SidePots::default());
        assert_eq!(state.favorites, vec!["Ralstan Tanaka"]);
        assert_eq!(names(&store), vec!["Ralstan Tanaka", "Juan Limasa"]);
        assert!(store
            .state()
            .doubles_entries
            .iter()
            .all(|e| e.money_transfer == MoneyTransfer::NoMoneyYet));
    }

    #[test]
    fn test_confirmation_gate() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.toggle_favorite("Iris Umeihra");

        store.request_confirmation(ConfirmAction::ClearFavorites);
        assert_eq!(store.state().favorites.len(), 1);
        assert_eq!(store.cancel(), Some(ConfirmAction::ClearFavorites));
        assert_eq!(store.confirm(), None);
        assert_eq!(store.state().favorites.len(), 1);

        store.request_confirmation(ConfirmAction::ClearFavorites);
        assert_eq!(store.confirm(), Some(ConfirmAction::ClearFavorites));
        assert!(store.state().favorites.is_empty());
        assert_eq!(store.pending_confirmation(), None);
    }

    #[test]
    fn test_validation_rejections_leave_state() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        let before = store.snapshot();

        assert!(store.select_bowler_type("bumper").is_err());
        assert!(store.select_side_pot("jackpot", true).is_err());
        assert_eq!(*store.snapshot(), *before);

        store.select_bowler_type("sub").unwrap();
        store.select_side_pot("scratch", true).unwrap();
        assert_eq!(store.totals().grand_total, Money::from_dollars(15));
    }

    #[test]
    fn test_active_tab_ignores_none() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);

        store.set_active_tab(None);
        assert_eq!(store.state().active_tab, "calculator");

        store.set_active_tab(Some("favorites"));
        assert_eq!(store.state().active_tab, "favorites");
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        backend.set_fail_writes(true);

        store.add_partner("Corey Adams").unwrap();
        store.forget_saved_state();
        store.add_partner("Corey Adams Jr").unwrap();

        assert_eq!(names(&store), vec!["Corey Adams Jr"]);
    }

    #[test]
    fn test_forget_saved_state() {
        let backend = MemoryDocumentStore::new();
        let mut store = loaded(&backend);
        store.add_partner("Blake Masaaki").unwrap();
        assert!(backend.contains(STORAGE_KEY));

        store.forget_saved_state();

        assert!(!backend.contains(STORAGE_KEY));
        assert_eq!(*store.state(), SessionState::default());
    }
}
