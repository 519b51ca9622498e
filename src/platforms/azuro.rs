//! Azuro Protocol integration.
//!
//! Azuro conditions are not listed through a public API, so the agent works
//! from a catalog of known conditions (seeded with fixtures by default) and
//! a locally recorded betting history. Odds use Azuro's outcome order,
//! which for three-way football markets is home, draw, away.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use tracing::{debug, info};

use super::{simulate_against, SportsbookPlatform};
use crate::types::{
    BetRecord, BetRequest, BetStatus, BettingHistory, Market, MarketOdds, SimulatedBet,
};

const PLATFORM_NAME: &str = "azuro";

/// In-memory catalog of Azuro conditions.
pub struct AzuroCatalog {
    markets: Vec<Market>,
    history: Vec<BetRecord>,
    sport_filter: Option<String>,
}

impl AzuroCatalog {
    /// Catalog over explicit markets with an empty history.
    pub fn new(markets: Vec<Market>) -> Self {
        Self {
            markets,
            history: Vec::new(),
            sport_filter: None,
        }
    }

    /// Catalog seeded with the sample football and basketball conditions.
    pub fn with_sample_markets() -> Self {
        let football = Market::new(
            "1",
            PLATFORM_NAME,
            "Football",
            "Manchester United vs Liverpool",
            vec![
                ("Home Win".to_string(), dec!(2.5)),
                ("Draw".to_string(), dec!(3.2)),
                ("Away Win".to_string(), dec!(2.8)),
            ],
        )
        .with_start_time(utc(2025, 7, 26, 20));

        let basketball = Market::new(
            "2",
            PLATFORM_NAME,
            "Basketball",
            "Lakers vs Warriors",
            vec![
                ("Lakers Win".to_string(), dec!(1.8)),
                ("Warriors Win".to_string(), dec!(2.1)),
            ],
        )
        .with_start_time(utc(2025, 7, 26, 22));

        let history = vec![BetRecord {
            bet_id: 1,
            market_id: "1".to_string(),
            outcome_index: 0,
            amount: dec!(0.1),
            odds: dec!(2.5),
            status: BetStatus::Pending,
            placed_at: utc(2025, 7, 25, 14) + chrono::Duration::minutes(30),
        }];

        Self {
            markets: vec![football, basketball],
            history,
            sport_filter: None,
        }
    }

    /// Restrict `fetch_markets` to one sport (case-insensitive).
    pub fn with_sport_filter(mut self, sport: impl Into<String>) -> Self {
        self.sport_filter = Some(sport.into());
        self
    }

    /// Markets for a sport, or all markets when `sport` is `None`.
    pub fn markets_for_sport(&self, sport: Option<&str>) -> Vec<Market> {
        match sport {
            Some(s) => self
                .markets
                .iter()
                .filter(|m| m.sport.eq_ignore_ascii_case(s))
                .cloned()
                .collect(),
            None => self.markets.clone(),
        }
    }

    /// Recorded bets with pending/completed counts.
    pub fn history(&self) -> BettingHistory {
        BettingHistory::new(self.history.clone())
    }

    fn find(&self, market_id: &str) -> Result<&Market> {
        self.markets
            .iter()
            .find(|m| m.id == market_id)
            .ok_or_else(|| anyhow!("Unknown Azuro condition: {market_id}"))
    }
}

#[async_trait]
impl SportsbookPlatform for AzuroCatalog {
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        let markets = self.markets_for_sport(self.sport_filter.as_deref());
        info!(count = markets.len(), sport = ?self.sport_filter, "Azuro conditions loaded");
        Ok(markets)
    }

    async fn market_odds(&self, market_id: &str) -> Result<MarketOdds> {
        let market = self.find(market_id)?;
        MarketOdds::from_market(market)
            .with_context(|| format!("Azuro condition {market_id} is not a head-to-head market"))
    }

    async fn simulate_bet(&self, request: &BetRequest) -> Result<SimulatedBet> {
        request.validate()?;
        let odds = self.market_odds(&request.market_id).await?;
        debug!(market_id = %request.market_id, amount = %request.amount, "Simulating Azuro bet");
        simulate_against(PLATFORM_NAME, request, &odds)
    }

    async fn betting_history(&self) -> Result<BettingHistory> {
        Ok(self.history())
    }

    fn name(&self) -> &'static str {
        PLATFORM_NAME
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
