// 💵 Pricing Model - Fee table + totals breakdown
//
//   total_owed_to_captain = lineage + side_pots + (paid_me × team_cost)
//   grand_total = total_owed_to_captain + (i_paid × partner_payment)
//                                       - (paid_me × partner_payment)
//
// Amounts are whole cents so every sum above is exact.

use crate::error::{PricingError, ValidationError};
use crate::partners::{MoneyTransfer, PartnerEntry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

// ============================================================================
// MONEY
// ============================================================================

/// Currency amount in minor units (cents)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Round a decimal amount to the nearest cent; out-of-range input saturates
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by a head count (partners, pots)
    pub fn times(self, count: usize) -> Money {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Money(self.0.saturating_mul(count))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

// JSON carries plain decimal numbers (17, 12.5), never cents
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }
        Ok(Money::from_decimal(amount))
    }
}

/// Format an amount the way en-US currency display does: `$1,234.50`, `-$3.00`
pub fn format_currency(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let cents = amount.cents().unsigned_abs();
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

// ============================================================================
// SELECTIONS
// ============================================================================

/// Lineage fee tier - exactly one is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BowlerType {
    #[default]
    Regular,
    Sub,
}

impl BowlerType {
    pub const ALL: [BowlerType; 2] = [BowlerType::Regular, BowlerType::Sub];

    pub fn as_str(&self) -> &'static str {
        match self {
            BowlerType::Regular => "regular",
            BowlerType::Sub => "sub",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BowlerType::Regular => "Regular",
            BowlerType::Sub => "Sub",
        }
    }
}

impl FromStr for BowlerType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BowlerType::ALL
            .into_iter()
            .find(|tier| tier.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidBowlerType(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SidePotKey {
    Scratch,
    Handicap,
    OptionalSideHandicap,
}

impl SidePotKey {
    pub const ALL: [SidePotKey; 3] = [
        SidePotKey::Scratch,
        SidePotKey::Handicap,
        SidePotKey::OptionalSideHandicap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SidePotKey::Scratch => "scratch",
            SidePotKey::Handicap => "handicap",
            SidePotKey::OptionalSideHandicap => "optionalSideHandicap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SidePotKey::Scratch => "Scratch",
            SidePotKey::Handicap => "Handicap",
            SidePotKey::OptionalSideHandicap => "Optional Side Handicap",
        }
    }
}

impl FromStr for SidePotKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SidePotKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidSidePot(value.to_string()))
    }
}

/// Independent side pot toggles, all off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidePots {
    pub scratch: bool,
    pub handicap: bool,
    pub optional_side_handicap: bool,
}

impl SidePots {
    pub fn get(&self, key: SidePotKey) -> bool {
        match key {
            SidePotKey::Scratch => self.scratch,
            SidePotKey::Handicap => self.handicap,
            SidePotKey::OptionalSideHandicap => self.optional_side_handicap,
        }
    }

    pub fn with(mut self, key: SidePotKey, value: bool) -> Self {
        match key {
            SidePotKey::Scratch => self.scratch = value,
            SidePotKey::Handicap => self.handicap = value,
            SidePotKey::OptionalSideHandicap => self.optional_side_handicap = value,
        }
        self
    }

    pub fn selected(&self) -> impl Iterator<Item = SidePotKey> + '_ {
        SidePotKey::ALL.into_iter().filter(move |key| self.get(*key))
    }
}

// ============================================================================
// PRICING TABLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeKind {
    Regular,
    Sub,
    Scratch,
    Handicap,
    OptionalSideHandicap,
    DoublesTeamCost,
    DoublesPartnerPayment,
}

impl FeeKind {
    pub const ALL: [FeeKind; 7] = [
        FeeKind::Regular,
        FeeKind::Sub,
        FeeKind::Scratch,
        FeeKind::Handicap,
        FeeKind::OptionalSideHandicap,
        FeeKind::DoublesTeamCost,
        FeeKind::DoublesPartnerPayment,
    ];
}

impl From<BowlerType> for FeeKind {
    fn from(tier: BowlerType) -> Self {
        match tier {
            BowlerType::Regular => FeeKind::Regular,
            BowlerType::Sub => FeeKind::Sub,
        }
    }
}

impl From<SidePotKey> for FeeKind {
    fn from(key: SidePotKey) -> Self {
        match key {
            SidePotKey::Scratch => FeeKind::Scratch,
            SidePotKey::Handicap => FeeKind::Handicap,
            SidePotKey::OptionalSideHandicap => FeeKind::OptionalSideHandicap,
        }
    }
}

/// League fee table
///
/// Missing keys in a JSON override fall back to the standard league prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingTable {
    pub regular: Money,
    pub sub: Money,
    pub scratch: Money,
    pub handicap: Money,
    pub optional_side_handicap: Money,
    pub doubles_team_cost: Money,
    pub doubles_partner_payment: Money,
}

/// Largest fee a pricing table may carry
pub const MAX_FEE: Money = Money::from_dollars(10_000);

impl Default for PricingTable {
    fn default() -> Self {
        PricingTable {
            regular: Money::from_dollars(17),
            sub: Money::from_dollars(12),
            scratch: Money::from_dollars(3),
            handicap: Money::from_dollars(3),
            optional_side_handicap: Money::from_dollars(6),
            doubles_team_cost: Money::from_dollars(6),
            doubles_partner_payment: Money::from_dollars(3),
        }
    }
}

impl PricingTable {
    pub fn fee(&self, kind: FeeKind) -> Money {
        match kind {
            FeeKind::Regular => self.regular,
            FeeKind::Sub => self.sub,
            FeeKind::Scratch => self.scratch,
            FeeKind::Handicap => self.handicap,
            FeeKind::OptionalSideHandicap => self.optional_side_handicap,
            FeeKind::DoublesTeamCost => self.doubles_team_cost,
            FeeKind::DoublesPartnerPayment => self.doubles_partner_payment,
        }
    }

    pub fn lineage_fee(&self, tier: BowlerType) -> Money {
        self.fee(tier.into())
    }

    pub fn side_pot_fee(&self, key: SidePotKey) -> Money {
        self.fee(key.into())
    }

    /// Per-partner "Team Cost" column: only partners who paid me put a team
    /// fee on my tab with the captain
    pub fn team_cost(&self, entry: &PartnerEntry) -> Money {
        match entry.money_transfer {
            MoneyTransfer::TheyGaveMe => self.doubles_team_cost,
            MoneyTransfer::NoMoneyYet | MoneyTransfer::IGave => Money::ZERO,
        }
    }

    /// Reject tables carrying a negative fee or one above `MAX_FEE`
    pub fn validate(&self) -> Result<(), PricingError> {
        for kind in FeeKind::ALL {
            let fee = self.fee(kind);
            if fee.is_negative() {
                return Err(PricingError::NegativeFee(kind));
            }
            if fee > MAX_FEE {
                return Err(PricingError::FeeTooLarge {
                    kind,
                    ceiling: MAX_FEE,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBreakdown {
    pub lineage_fee: Money,
    pub side_pot_fee: Money,
    pub partners_who_paid_me_count: usize,
    pub partners_i_paid_count: usize,
    pub amount_owed_to_captain_for_doubles: Money,
    pub amount_paid_to_partners_direct: Money,
    pub amount_received_from_partners_direct: Money,
    pub total_owed_to_captain: Money,
    pub grand_total: Money,
}

/// Pure totals computation over a snapshot of the current selections
pub fn compute_totals(
    selection: BowlerType,
    side_pots: &SidePots,
    partner_entries: &[PartnerEntry],
    pricing: &PricingTable,
) -> TotalsBreakdown {
    let lineage_fee = pricing.lineage_fee(selection);
    let side_pot_fee: Money = side_pots
        .selected()
        .map(|key| pricing.side_pot_fee(key))
        .sum();

    let partners_who_paid_me_count = partner_entries
        .iter()
        .filter(|entry| entry.money_transfer == MoneyTransfer::TheyGaveMe)
        .count();
    let partners_i_paid_count = partner_entries
        .iter()
        .filter(|entry| entry.money_transfer == MoneyTransfer::IGave)
        .count();

    let amount_owed_to_captain_for_doubles =
        pricing.doubles_team_cost.times(partners_who_paid_me_count);
    let amount_paid_to_partners_direct =
        pricing.doubles_partner_payment.times(partners_i_paid_count);
    let amount_received_from_partners_direct =
        pricing.doubles_partner_payment.times(partners_who_paid_me_count);

    let total_owed_to_captain = lineage_fee + side_pot_fee + amount_owed_to_captain_for_doubles;
    let grand_total =
        total_owed_to_captain + amount_paid_to_partners_direct - amount_received_from_partners_direct;

    TotalsBreakdown {
        lineage_fee,
        side_pot_fee,
        partners_who_paid_me_count,
        partners_i_paid_count,
        amount_owed_to_captain_for_doubles,
        amount_paid_to_partners_direct,
        amount_received_from_partners_direct,
        total_owed_to_captain,
        grand_total,
    }
}

// ============================================================================
// TESTS
// ============================================================================
