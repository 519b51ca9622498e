//! Mock sportsbook for integration testing.
//!
//! Provides a deterministic `SportsbookPlatform` implementation that
//! returns known markets, prices simulated bets, and can be forced to
//! fail, all in-memory with no external dependencies.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

use betscout::platforms::SportsbookPlatform;
use betscout::types::*;

/// A mock sportsbook for deterministic testing.
pub struct MockSportsbook {
    name: &'static str,
    markets: Vec<Market>,
    simulated: Arc<Mutex<Vec<SimulatedBet>>>,
    /// If set, all operations will return this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockSportsbook {
    pub fn new(name: &'static str) -> Self {
        Self::with_markets(name, Self::default_markets(name))
    }

    pub fn with_markets(name: &'static str, markets: Vec<Market>) -> Self {
        Self {
            name,
            markets,
            simulated: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Force all subsequent operations to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Handle to the simulated-bet log, usable after the mock is boxed.
    pub fn simulated_log(&self) -> Arc<Mutex<Vec<SimulatedBet>>> {
        Arc::clone(&self.simulated)
    }

    fn check_error(&self) -> Result<()> {
        match self.force_error.lock().unwrap().as_ref() {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }

    /// Three markets: a two-way favourite, a three-way football match and a
    /// long shot, so every risk tier is represented.
    fn default_markets(platform: &str) -> Vec<Market> {
        vec![
            Market::new(
                "tennis-1",
                platform,
                "Tennis",
                "Sinner vs Alcaraz",
                vec![("Sinner".into(), dec!(1.15)), ("Alcaraz".into(), dec!(5.5))],
            ),
            Market::new(
                "football-1",
                platform,
                "Football",
                "Arsenal vs Chelsea",
                vec![
                    ("Arsenal".into(), dec!(1.4)),
                    ("Chelsea".into(), dec!(6.0)),
                    ("Draw".into(), dec!(4.2)),
                ],
            ),
            Market::new(
                "mma-1",
                platform,
                "MMA",
                "Main Event",
                vec![("Red".into(), dec!(1.3)), ("Blue".into(), dec!(1.6))],
            ),
        ]
    }
}

#[async_trait]
impl SportsbookPlatform for MockSportsbook {
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        self.check_error()?;
        Ok(self.markets.clone())
    }

    async fn market_odds(&self, market_id: &str) -> Result<MarketOdds> {
        self.check_error()?;
        let market = self
            .markets
            .iter()
            .find(|m| m.id == market_id)
            .ok_or_else(|| anyhow!("Unknown market: {market_id}"))?;
        MarketOdds::from_market(market).ok_or_else(|| anyhow!("Not a head-to-head market"))
    }

    async fn simulate_bet(&self, request: &BetRequest) -> Result<SimulatedBet> {
        self.check_error()?;
        request.validate()?;
        let odds = self.market_odds(&request.market_id).await?;
        let price = odds
            .for_position(request.position)
            .ok_or_else(|| anyhow!("Position {} unavailable", request.position))?;

        let bet = SimulatedBet {
            market_id: request.market_id.clone(),
            platform: self.name.to_string(),
            position: request.position,
            amount: request.amount,
            odds: price,
            potential_payout: request.amount * price,
            tx_hash: format!("0xsimulated_{}", Utc::now().timestamp()),
            status: BetStatus::Simulated,
            message: "mock".into(),
            timestamp: Utc::now(),
        };
        self.simulated.lock().unwrap().push(bet.clone());
        Ok(bet)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
