//! Multi-platform market router.
//!
//! Aggregates markets from all enabled sportsbooks concurrently, drops
//! markets that cannot be evaluated, and routes per-market lookups to the
//! platform that owns them.

use anyhow::{anyhow, Result};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::platforms::SportsbookPlatform;
use crate::types::{BettingHistory, Market, MarketOdds};

/// Markets need at least this many outcomes to be worth scoring.
const MIN_OUTCOMES: usize = 2;

/// Unified market scanner over every enabled platform.
pub struct MarketRouter {
    platforms: Vec<Box<dyn SportsbookPlatform>>,
}

impl MarketRouter {
    pub fn new(platforms: Vec<Box<dyn SportsbookPlatform>>) -> Self {
        Self { platforms }
    }

    pub fn platform_names(&self) -> Vec<&'static str> {
        self.platforms.iter().map(|p| p.name()).collect()
    }

    pub fn platform(&self, name: &str) -> Option<&dyn SportsbookPlatform> {
        self.platforms
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Fetch from every platform concurrently and return the combined,
    /// filtered list in platform order.
    ///
    /// A failing platform is logged and skipped; the scan only fails when
    /// every platform fails.
    pub async fn scan_all(&self) -> Result<Vec<Market>> {
        info!(platforms = self.platforms.len(), "Starting market scan");

        let results = join_all(self.platforms.iter().map(|p| p.fetch_markets())).await;

        let mut all_markets = Vec::new();
        let mut failures = 0usize;
        for (platform, result) in self.platforms.iter().zip(results) {
            match result {
                Ok(markets) => {
                    debug!(platform = platform.name(), count = markets.len(), "Platform scanned");
                    all_markets.extend(markets);
                }
                Err(e) => {
                    failures += 1;
                    warn!(platform = platform.name(), error = %e, "Platform scan failed, continuing without");
                }
            }
        }

        if failures > 0 && failures == self.platforms.len() {
            return Err(anyhow!("All {failures} platforms failed to return markets"));
        }

        let before = all_markets.len();
        let markets = Self::filter_markets(all_markets);
        info!(before, after = markets.len(), "Market scan complete");

        Ok(markets)
    }

    /// Look up one market by id, optionally restricted to a platform.
    pub async fn find_market(&self, market_id: &str, platform: Option<&str>) -> Result<Option<Market>> {
        let markets = match platform {
            Some(name) => self
                .platform(name)
                .ok_or_else(|| anyhow!("Unknown platform: {name}"))?
                .fetch_markets()
                .await?,
            None => self.scan_all().await?,
        };
        Ok(markets.into_iter().find(|m| m.id == market_id))
    }

    /// Odds for one market from the named platform.
    pub async fn market_odds(&self, platform: &str, market_id: &str) -> Result<MarketOdds> {
        self.platform(platform)
            .ok_or_else(|| anyhow!("Unknown platform: {platform}"))?
            .market_odds(market_id)
            .await
    }

    /// Combined betting history across platforms, in platform order.
    pub async fn betting_history(&self) -> Result<BettingHistory> {
        let results = join_all(self.platforms.iter().map(|p| p.betting_history())).await;
        let mut bets = Vec::new();
        for (platform, result) in self.platforms.iter().zip(results) {
            match result {
                Ok(history) => bets.extend(history.bets),
                Err(e) => warn!(platform = platform.name(), error = %e, "History lookup failed"),
            }
        }
        Ok(BettingHistory::new(bets))
    }

    fn filter_markets(markets: Vec<Market>) -> Vec<Market> {
        markets
            .into_iter()
            .filter(|m| {
                let keep = m.outcomes.len() >= MIN_OUTCOMES;
                if !keep {
                    debug!(market_id = %m.id, outcomes = m.outcomes.len(), "Dropping market with too few outcomes");
                }
                keep
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
