//! Shared types for the BETSCOUT agent.
//!
//! These types form the data model used across all modules. Platform
//! adapters produce `Market`s, the strategy core turns them into
//! `OpportunityScore`s and `StakeRecommendation`s, and the API layer
//! serialises all of them as JSON.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BetRequestError;

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

/// A single bettable event with a fixed set of mutually exclusive outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Opaque condition id (Azuro) or market contract address (Overtime).
    pub id: String,
    /// Platform identifier: "azuro" | "overtime"
    pub platform: String,
    pub sport: String,
    /// Human-readable event name, e.g. "Lakers vs Warriors".
    pub event: String,
    pub outcomes: Vec<Outcome>,
    pub start_time: Option<DateTime<Utc>>,
}

/// One possible result of a market, carrying decimal odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    /// Payout multiple per unit staked.
    pub odds: Decimal,
    /// Position within the owning market's outcome list.
    pub index: usize,
}

impl Market {
    /// Build a market from ordered `(label, odds)` pairs. Outcome indices
    /// are assigned from the pair order.
    pub fn new(
        id: impl Into<String>,
        platform: impl Into<String>,
        sport: impl Into<String>,
        event: impl Into<String>,
        outcomes: Vec<(String, Decimal)>,
    ) -> Self {
        Self {
            id: id.into(),
            platform: platform.into(),
            sport: sport.into(),
            event: event.into(),
            outcomes: outcomes
                .into_iter()
                .enumerate()
                .map(|(index, (label, odds))| Outcome { label, odds, index })
                .collect(),
            start_time: None,
        }
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn outcome(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    /// Helper to build a two-way test market.
    #[cfg(test)]
    pub fn sample() -> Self {
        Market::new(
            "2",
            "azuro",
            "Basketball",
            "Lakers vs Warriors",
            vec![
                ("Lakers Win".to_string(), dec!(1.8)),
                ("Warriors Win".to_string(), dec!(2.1)),
            ],
        )
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let odds: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| format!("{} @ {}", o.label, o.odds))
            .collect();
        write!(
            f,
            "[{}] {} ({}) | {}",
            self.platform,
            self.event,
            self.sport,
            odds.join(" | "),
        )
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Coarse risk label derived from ROI thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// Betting position on a head-to-head market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Home,
    Away,
    Draw,
}

impl Position {
    /// Index of this position in an Overtime market's outcome list, which
    /// is ordered home, away, draw. Azuro three-way markets are ordered
    /// home, draw, away; resolve those through `MarketOdds::from_market`.
    pub fn outcome_index(&self) -> usize {
        match self {
            Position::Home => 0,
            Position::Away => 1,
            Position::Draw => 2,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Home => write!(f, "home"),
            Position::Away => write!(f, "away"),
            Position::Draw => write!(f, "draw"),
        }
    }
}

impl FromStr for Position {
    type Err = BetRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Position::Home),
            "away" => Ok(Position::Away),
            "draw" => Ok(Position::Draw),
            _ => Err(BetRequestError::InvalidPosition(s.to_string())),
        }
    }
}

/// Lifecycle label for a placed or simulated bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Simulated,
    Confirmed,
    Failed,
    Unverified,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Simulated => write!(f, "simulated"),
            BetStatus::Confirmed => write!(f, "confirmed"),
            BetStatus::Failed => write!(f, "failed"),
            BetStatus::Unverified => write!(f, "unverified"),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation results
// ---------------------------------------------------------------------------

/// Profitability metrics for one outcome at one stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityScore {
    /// Platform that owns `market_id`; ids are only unique per platform.
    pub platform: String,
    pub market_id: String,
    pub outcome_index: usize,
    pub stake: Decimal,
    pub expected_payout: Decimal,
    pub roi_percent: Decimal,
    pub risk_tier: RiskTier,
}

impl fmt::Display for OpportunityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}#{} stake={} payout={} roi={:.2}% [{}]",
            self.platform,
            self.market_id,
            self.outcome_index,
            self.stake,
            self.expected_payout,
            self.roi_percent,
            self.risk_tier,
        )
    }
}

/// Bounded stake recommendation for a bankroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecommendation {
    pub stake: Decimal,
    /// Fraction of bankroll used, after the cap.
    pub fraction: Decimal,
    /// Whether the safety cap reduced the fraction.
    pub capped: bool,
}

/// A ranked opportunity paired with its sized stake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRecommendation {
    pub score: OpportunityScore,
    pub outcome_label: String,
    pub odds: Decimal,
    pub event: String,
    pub sport: String,
    pub confidence: Decimal,
    pub stake: StakeRecommendation,
}

impl fmt::Display for BetRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} @ {} | roi={:.1}% [{}] | stake={:.4} ({:.1}% of bankroll)",
            self.event,
            self.outcome_label,
            self.odds,
            self.score.roi_percent,
            self.score.risk_tier,
            self.stake.stake,
            self.stake.fraction * dec!(100),
        )
    }
}

// ---------------------------------------------------------------------------
// Bet request & receipts
// ---------------------------------------------------------------------------

/// Home/away/draw odds for a single head-to-head market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOdds {
    pub market_id: String,
    pub home: Decimal,
    pub away: Decimal,
    pub draw: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl MarketOdds {
    /// Derive head-to-head odds from a market's outcomes. Any outcome
    /// labelled "draw" is the draw; the first two others are home and away.
    /// Returns `None` for markets with fewer than two non-draw outcomes.
    pub fn from_market(market: &Market) -> Option<Self> {
        let (draws, sides): (Vec<&Outcome>, Vec<&Outcome>) = market
            .outcomes
            .iter()
            .partition(|o| o.label.to_lowercase().contains("draw"));

        Some(Self {
            market_id: market.id.clone(),
            home: sides.first()?.odds,
            away: sides.get(1)?.odds,
            draw: draws
                .first()
                .map(|o| o.odds)
                .filter(|odds| *odds > Decimal::ZERO),
            timestamp: Utc::now(),
        })
    }

    pub fn for_position(&self, position: Position) -> Option<Decimal> {
        match position {
            Position::Home => Some(self.home),
            Position::Away => Some(self.away),
            Position::Draw => self.draw,
        }
        .filter(|odds| *odds > Decimal::ZERO)
    }
}

/// A request to place (or simulate) a bet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRequest {
    pub market_id: String,
    pub position: Position,
    pub amount: Decimal,
    /// Odds the caller expects; checked before submission when present.
    #[serde(default)]
    pub odds: Option<Decimal>,
}

impl BetRequest {
    /// Check amount and odds. Platform-specific id rules live with each
    /// adapter.
    pub fn validate(&self) -> Result<(), BetRequestError> {
        if self.amount <= Decimal::ZERO {
            return Err(BetRequestError::InvalidAmount(self.amount));
        }
        if let Some(odds) = self.odds {
            if odds <= Decimal::ONE {
                return Err(BetRequestError::InvalidOdds(odds));
            }
        }
        Ok(())
    }

    /// Same as `validate`, plus the `0x` contract-address prefix required by
    /// on-chain markets.
    pub fn validate_address(&self) -> Result<(), BetRequestError> {
        if !self.market_id.starts_with("0x") {
            return Err(BetRequestError::InvalidMarketAddress(self.market_id.clone()));
        }
        self.validate()
    }
}

/// Outcome of a simulated bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedBet {
    pub market_id: String,
    pub platform: String,
    pub position: Position,
    pub amount: Decimal,
    pub odds: Decimal,
    pub potential_payout: Decimal,
    pub tx_hash: String,
    pub status: BetStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for SimulatedBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} amount={} @ {} → payout={} [{}] {}",
            self.platform,
            self.position,
            self.market_id,
            self.amount,
            self.odds,
            self.potential_payout,
            self.status,
            self.tx_hash,
        )
    }
}

/// Result of checking a bet transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetVerification {
    pub tx_hash: String,
    pub verified: bool,
    pub status: BetStatus,
    pub message: String,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A bet recorded against the wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRecord {
    pub bet_id: u64,
    pub market_id: String,
    pub outcome_index: usize,
    pub amount: Decimal,
    pub odds: Decimal,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
}

/// Aggregate counts over a betting history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMetrics {
    pub total_bets: usize,
    pub pending_bets: usize,
    pub completed_bets: usize,
}

impl HistoryMetrics {
    pub fn from_records(records: &[BetRecord]) -> Self {
        let total_bets = records.len();
        let pending_bets = records
            .iter()
            .filter(|r| r.status == BetStatus::Pending)
            .count();
        Self {
            total_bets,
            pending_bets,
            completed_bets: total_bets - pending_bets,
        }
    }
}

/// History plus its metrics, as served to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingHistory {
    pub bets: Vec<BetRecord>,
    pub metrics: HistoryMetrics,
}

impl BettingHistory {
    pub fn new(bets: Vec<BetRecord>) -> Self {
        let metrics = HistoryMetrics::from_records(&bets);
        Self { bets, metrics }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
