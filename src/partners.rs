// 🎳 Handicap Doubles Partners
//
// A partner entry is identified by its UUID, never by its name. Names are
// unique case-insensitively, which is checked by the session store when an
// entry is created.

use serde::{Deserialize, Serialize};

pub type PartnerId = String;

// ============================================================================
// MONEY TRANSFER STATE
// ============================================================================

/// Who fronted the doubles team fee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoneyTransfer {
    /// Nothing exchanged yet
    #[default]
    #[serde(rename = "noMoneyYet")]
    NoMoneyYet,

    /// I paid my partner their share
    #[serde(rename = "iGave")]
    IGave,

    /// My partner paid me; I owe the team cost to the captain
    #[serde(rename = "theyGaveMe")]
    TheyGaveMe,
}

impl MoneyTransfer {
    pub const ALL: [MoneyTransfer; 3] = [
        MoneyTransfer::NoMoneyYet,
        MoneyTransfer::IGave,
        MoneyTransfer::TheyGaveMe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoneyTransfer::NoMoneyYet => "noMoneyYet",
            MoneyTransfer::IGave => "iGave",
            MoneyTransfer::TheyGaveMe => "theyGaveMe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoneyTransfer::NoMoneyYet => "No money yet",
            MoneyTransfer::IGave => "I gave",
            MoneyTransfer::TheyGaveMe => "They gave me",
        }
    }

    /// Parse a persisted value; unknown strings yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        MoneyTransfer::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
    }

    /// Cycle order used by the terminal UI
    pub fn next(&self) -> Self {
        match self {
            MoneyTransfer::NoMoneyYet => MoneyTransfer::IGave,
            MoneyTransfer::IGave => MoneyTransfer::TheyGaveMe,
            MoneyTransfer::TheyGaveMe => MoneyTransfer::NoMoneyYet,
        }
    }
}

// ============================================================================
// PARTNER ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerEntry {
    pub id: PartnerId,
    pub partner_name: String,
    pub money_transfer: MoneyTransfer,
}

impl PartnerEntry {
    /// New entry with a fresh UUID and nothing exchanged
    pub fn new(partner_name: impl Into<String>) -> Self {
        PartnerEntry {
            id: new_partner_id(),
            partner_name: partner_name.into(),
            money_transfer: MoneyTransfer::NoMoneyYet,
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.partner_name, name)
    }
}

pub fn new_partner_id() -> PartnerId {
    uuid::Uuid::new_v4().to_string()
}

/// Case-insensitive name comparison
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn find_by_name<'a>(entries: &'a [PartnerEntry], name: &str) -> Option<&'a PartnerEntry> {
    entries.iter().find(|entry| entry.has_name(name))
}

// ============================================================================
// PARTNER NAME SOURCE (autocomplete only, not authoritative)
// ============================================================================

pub const PARTNER_NAMES: &[&str] = &[
    "Landan Yoshida",
    "Iris Umeihra",
    "Shawn Harrison",
    "Mike Cavaggioni",
    "Jeffrey Kanada",
    "Nicholas Kidd",
    "Scott Shiira",
    "Justin Sumiye",
    "Keary Wilkinson",
    "Kevin Enomoto",
    "Micah Freitas",
    "Milo Wilkinson",
    "Weyland Kanada",
    "Raiden Yamashiro",
    "Vince Davis",
    "Micah Grune",
    "Chad Oasay",
    "Shelly Shiira",
    "Rebecca Iha",
    "Kaili Takara",
    "Rachel Iha",
    "Sheila Chamian",
    "Elizabeth Jimenez",
    "Kellina Murakami",
    "Patti Inoue",
    "Celeste You",
    "Blaine Endo",
    "Julian Balmore",
    "Kelly Endo",
    "Juan Limasa",
    "Daniel Toyooka-Lim",
    "Mike Mallon",
    "Ralstan Tanaka",
    "JR Viado",
    "Guy Fujimoto",
    "Randy O’Neal",
    "John Frazier",
    "Bob Magallano",
    "Glen Lim",
    "Ryan Chang",
    "Laura Nagata",
    "Eric Zotter",
    "Corey Adams",
    "Doc Shamoto",
    "Mydee Viado",
    "Kelli Kirio",
    "Allan Quiocho",
    "Logan Murakami",
    "Corey Adams Jr",
    "Ray Takara",
    "Blake Masaaki",
];

fn first_token(name: &str) -> String {
    name.split_whitespace().next().unwrap_or("").to_lowercase()
}

/// Candidate names sorted by first name, ties broken by the full name
pub fn sorted_partner_names() -> Vec<&'static str> {
    let mut names = PARTNER_NAMES.to_vec();
    names.sort_by(|a, b| {
        first_token(a)
            .cmp(&first_token(b))
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    });
    names
}

/// Candidate names not already added as a partner
pub fn available_partner_names(entries: &[PartnerEntry]) -> Vec<&'static str> {
    sorted_partner_names()
        .into_iter()
        .filter(|name| find_by_name(entries, name).is_none())
        .collect()
}

/// Candidates whose name contains `query` (case-insensitive)
pub fn suggest_partner_names(entries: &[PartnerEntry], query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    available_partner_names(entries)
        .into_iter()
        .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
        .collect()
}
