// 📋 Session State - Root aggregate + schema-versioned load path
//
// Persisted shape (field names are a compatibility surface):
//
//   {
//     "schemaVersion": 2,
//     "bowlerType": "regular" | "sub",
//     "sidePots": { "scratch", "handicap", "optionalSideHandicap" },
//     "doublesEntries": [{ "id", "partnerName", "moneyTransfer" }],
//     "favorites": ["name", ...],
//     "activeTab": "calculator"
//   }
//
// Schema history:
//   v1 - no schemaVersion, no favorites, no activeTab
//   v2 - current
//
// Loading never trusts the document: it is read as loose JSON and `repair`
// rebuilds a state that satisfies every invariant.

use crate::error::StateError;
use crate::partners::{names_match, new_partner_id, MoneyTransfer, PartnerEntry};
use crate::pricing::{
    compute_totals, BowlerType, PricingTable, SidePotKey, SidePots, TotalsBreakdown,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the single session document in the durable store
pub const STORAGE_KEY: &str = "bowling-calculator-state";

pub const SCHEMA_VERSION: u64 = 2;

/// Documents without a version predate favorites
const LEGACY_SCHEMA_VERSION: u64 = 1;

pub const DEFAULT_TAB: &str = "calculator";

// ============================================================================
// SESSION STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub schema_version: u64,
    pub bowler_type: BowlerType,
    pub side_pots: SidePots,
    /// Insertion order is display order
    pub doubles_entries: Vec<PartnerEntry>,
    /// Set semantics, insertion ordered
    pub favorites: Vec<String>,
    pub active_tab: String,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            schema_version: SCHEMA_VERSION,
            bowler_type: BowlerType::default(),
            side_pots: SidePots::default(),
            doubles_entries: Vec::new(),
            favorites: Vec::new(),
            active_tab: DEFAULT_TAB.to_string(),
        }
    }
}

impl SessionState {
    pub fn totals(&self, pricing: &PricingTable) -> TotalsBreakdown {
        compute_totals(self.bowler_type, &self.side_pots, &self.doubles_entries, pricing)
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|favorite| favorite == name)
    }

    pub fn entry(&self, id: &str) -> Option<&PartnerEntry> {
        self.doubles_entries.iter().find(|entry| entry.id == id)
    }

    pub fn has_partner_named(&self, name: &str) -> bool {
        self.doubles_entries.iter().any(|entry| entry.has_name(name))
    }

    /// Favorites with no matching partner entry
    pub fn dangling_favorites(&self) -> Vec<&str> {
        self.favorites
            .iter()
            .filter(|favorite| !self.has_partner_named(favorite))
            .map(String::as_str)
            .collect()
    }

    /// Serialize for the durable store (derived totals are never stored)
    pub fn to_document(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Give every favorite a partner entry, appended in favorites order
///
/// Returns how many entries were created.
pub fn reconcile_favorites(state: &mut SessionState) -> usize {
    let missing: Vec<String> = state
        .dangling_favorites()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut created = 0;
    for name in missing {
        // Two favorites differing only by case share one entry
        if !state.has_partner_named(&name) {
            state.doubles_entries.push(PartnerEntry::new(name));
            created += 1;
        }
    }

    created
}

// ============================================================================
// LOAD PATH
// ============================================================================

/// Parse a saved document into a repaired, reconciled state
pub fn parse_saved_state(raw: &str) -> Result<SessionState, StateError> {
    let value: Value = serde_json::from_str(raw)?;
    let document = value.as_object().ok_or(StateError::NotAnObject)?;
    Ok(repair(document))
}

/// Rebuild a valid state from any older or partial document shape
pub fn repair(document: &Map<String, Value>) -> SessionState {
    let version = document
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(LEGACY_SCHEMA_VERSION);

    if version < SCHEMA_VERSION {
        log::info!("upgrading saved state from schema v{} to v{}", version, SCHEMA_VERSION);
    } else if version > SCHEMA_VERSION {
        log::warn!(
            "saved state has newer schema v{} (expected v{}), reading known fields only",
            version,
            SCHEMA_VERSION
        );
    }

    let bowler_type = document
        .get("bowlerType")
        .and_then(Value::as_str)
        .and_then(|tier| tier.parse::<BowlerType>().ok())
        .unwrap_or_default();

    let mut state = SessionState {
        schema_version: SCHEMA_VERSION,
        bowler_type,
        side_pots: repair_side_pots(document.get("sidePots")),
        doubles_entries: repair_entries(document.get("doublesEntries")),
        favorites: repair_favorites(document.get("favorites")),
        active_tab: document
            .get("activeTab")
            .and_then(Value::as_str)
            .filter(|tab| !tab.trim().is_empty())
            .unwrap_or(DEFAULT_TAB)
            .to_string(),
    };

    let created = reconcile_favorites(&mut state);
    if created > 0 {
        log::info!("restored {} partner entries for favorites", created);
    }

    state
}

fn repair_side_pots(value: Option<&Value>) -> SidePots {
    let Some(pots) = value.and_then(Value::as_object) else {
        return SidePots::default();
    };

    SidePotKey::ALL.into_iter().fold(SidePots::default(), |acc, key| {
        let on = pots.get(key.as_str()).and_then(Value::as_bool).unwrap_or(false);
        acc.with(key, on)
    })
}

fn repair_entries(value: Option<&Value>) -> Vec<PartnerEntry> {
    let Some(items) = value.and_then(Value::as_array) else {
        if value.is_some_and(|v| !v.is_null()) {
            log::warn!("saved doublesEntries is not a list, starting with no partners");
        }
        return Vec::new();
    };

    let mut entries: Vec<PartnerEntry> = Vec::with_capacity(items.len());
    for item in items {
        let Some(fields) = item.as_object() else {
            log::warn!("dropping malformed partner entry: {}", item);
            continue;
        };

        let name = fields
            .get("partnerName")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        if name.is_empty() {
            log::warn!("dropping partner entry without a name");
            continue;
        }
        if entries.iter().any(|existing| names_match(&existing.partner_name, name)) {
            log::warn!("dropping duplicate partner entry for {}", name);
            continue;
        }

        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty() && !entries.iter().any(|e| e.id == *id))
            .map(str::to_string)
            .unwrap_or_else(new_partner_id);

        let money_transfer = fields
            .get("moneyTransfer")
            .and_then(Value::as_str)
            .and_then(MoneyTransfer::parse)
            .unwrap_or_default();

        entries.push(PartnerEntry {
            id,
            partner_name: name.to_string(),
            money_transfer,
        });
    }

    entries
}

fn repair_favorites(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut favorites: Vec<String> = Vec::with_capacity(items.len());
    for name in items.iter().filter_map(Value::as_str).map(str::trim) {
        if !name.is_empty() && !favorites.iter().any(|f| f == name) {
            favorites.push(name.to_string());
        }
    }
    favorites
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repair_json(value: Value) -> SessionState {
        repair(value.as_object().unwrap())
    }

    #[test]
    fn test_default_state() {
        let state = SessionState::default();

        assert_eq!(state.bowler_type, BowlerType::Regular);
        assert_eq!(state.side_pots, SidePots::default());
        assert!(state.doubles_entries.is_empty());
        assert!(state.favorites.is_empty());
        assert_eq!(state.active_tab, DEFAULT_TAB);
    }

    #[test]
    fn test_document_round_trip_keeps_wire_names() {
        let mut state = SessionState::default();
        state.favorites.push("Kevin Enomoto".to_string());
        state.doubles_entries.push(PartnerEntry::new("Kevin Enomoto"));

        let raw = state.to_document().unwrap();
        assert!(raw.contains("\"bowlerType\":\"regular\""));
        assert!(raw.contains("\"optionalSideHandicap\":false"));
        assert!(raw.contains("\"doublesEntries\""));
        assert!(!raw.contains("grandTotal"));

        assert_eq!(parse_saved_state(&raw).unwrap(), state);
    }

    #[test]
    fn test_legacy_document_without_favorites() {
        let state = repair_json(json!({
            "bowlerType": "sub",
            "sidePots": { "scratch": true, "handicap": false, "optionalSideHandicap": true },
            "doublesEntries": [
                { "id": "a1", "partnerName": "Chad Oasay", "moneyTransfer": "iGave" }
            ]
        }));

        assert_eq!(state.schema_version, SCHEMA_VERSION);
        assert_eq!(state.bowler_type, BowlerType::Sub);
        assert!(state.side_pots.scratch);
        assert!(state.side_pots.optional_side_handicap);
        assert!(state.favorites.is_empty());
        assert_eq!(state.active_tab, DEFAULT_TAB);
        assert_eq!(state.doubles_entries.len(), 1);
        assert_eq!(state.doubles_entries[0].id, "a1");
        assert_eq!(state.doubles_entries[0].money_transfer, MoneyTransfer::IGave);
    }

    #[test]
    fn test_wrong_types_coerced_to_empty() {
        let state = repair_json(json!({
            "bowlerType": "captain",
            "sidePots": "all of them",
            "doublesEntries": { "not": "a list" },
            "favorites": 42,
            "activeTab": null
        }));

        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_invalid_money_transfer_becomes_no_money_yet() {
        let state = repair_json(json!({
            "doublesEntries": [
                { "id": "a", "partnerName": "Eric Zotter", "moneyTransfer": "paidDouble" },
                { "id": "b", "partnerName": "Ray Takara" }
            ]
        }));

        assert!(state
            .doubles_entries
            .iter()
            .all(|entry| entry.money_transfer == MoneyTransfer::NoMoneyYet));
    }

    #[test]
    fn test_bad_entries_dropped_individually() {
        let state = repair_json(json!({
            "doublesEntries": [
                "Eric Zotter",
                { "id": "a", "partnerName": "   " },
                { "id": "b", "partnerName": "Mike Mallon", "moneyTransfer": "theyGaveMe" },
                { "id": "c", "partnerName": "MIKE MALLON", "moneyTransfer": "iGave" },
                { "partnerName": "Patti Inoue" }
            ]
        }));

        let names: Vec<&str> = state
            .doubles_entries
            .iter()
            .map(|entry| entry.partner_name.as_str())
            .collect();
        assert_eq!(names, vec!["Mike Mallon", "Patti Inoue"]);
        assert_eq!(state.doubles_entries[0].money_transfer, MoneyTransfer::TheyGaveMe);
        assert!(!state.doubles_entries[1].id.is_empty());
    }

    #[test]
    fn test_favorites_reconciled_in_order_after_existing() {
        let state = repair_json(json!({
            "schemaVersion": 2,
            "doublesEntries": [
                { "id": "x", "partnerName": "Blaine Endo", "moneyTransfer": "iGave" }
            ],
            "favorites": ["Kelly Endo", "blaine endo", "Kelly Endo", "Juan Limasa"]
        }));

        assert_eq!(state.favorites, vec!["Kelly Endo", "blaine endo", "Juan Limasa"]);
        let names: Vec<&str> = state
            .doubles_entries
            .iter()
            .map(|entry| entry.partner_name.as_str())
            .collect();
        assert_eq!(names, vec!["Blaine Endo", "Kelly Endo", "Juan Limasa"]);
        assert_eq!(state.doubles_entries[0].money_transfer, MoneyTransfer::IGave);
        assert_eq!(state.doubles_entries[1].money_transfer, MoneyTransfer::NoMoneyYet);
        assert!(state.dangling_favorites().is_empty());
    }

    #[test]
    fn test_reconcile_counts_created_entries() {
        let mut state = SessionState::default();
        state.favorites = vec![
            "Kelly Endo".to_string(),
            "kelly endo".to_string(),
            "Juan Limasa".to_string(),
        ];

        assert_eq!(reconcile_favorites(&mut state), 2);
        assert_eq!(state.doubles_entries.len(), 2);
        assert_eq!(reconcile_favorites(&mut state), 0);
    }

    #[test]
    fn test_non_object_document_rejected() {
        assert!(matches!(parse_saved_state("[1, 2, 3]"), Err(StateError::NotAnObject)));
        assert!(matches!(parse_saved_state("{not json"), Err(StateError::Json(_))));
    }
}
