//! Overtime Protocol v2 integration.
//!
//! Reads the public market list for a network and derives odds from it.
//! Bets are priced and simulated; nothing is signed or broadcast.
//!
//! API: `https://overtimemarketsv2.xyz/{network}/markets`
//! Auth: none.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{simulate_against, SportsbookPlatform};
use crate::types::{BetRequest, Market, MarketOdds, SimulatedBet};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://overtimemarketsv2.xyz";
pub const DEFAULT_NETWORK: &str = "arbitrum";
const PLATFORM_NAME: &str = "overtime";

/// Maximum open markets returned per fetch.
pub const ACTIVE_MARKET_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// API response types (Overtime JSON → Rust)
// ---------------------------------------------------------------------------

/// One entry of the `/markets` list. Only the fields we use.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OvertimeMarket {
    address: String,
    #[serde(default)]
    sport: String,
    home_team: String,
    away_team: String,
    #[serde(default)]
    home_odds: Decimal,
    #[serde(default)]
    away_odds: Decimal,
    /// Absent or zero for markets without a draw.
    #[serde(default)]
    draw_odds: Option<Decimal>,
    #[serde(default)]
    maturity_date: Option<DateTime<Utc>>,
    #[serde(default)]
    is_open: bool,
}

impl OvertimeMarket {
    /// Convert to the shared model, outcomes ordered home, away, draw.
    fn into_market(self) -> Market {
        let mut outcomes = vec![
            (self.home_team.clone(), self.home_odds),
            (self.away_team.clone(), self.away_odds),
        ];
        if let Some(draw) = self.draw_odds.filter(|d| *d > Decimal::ZERO) {
            outcomes.push(("Draw".to_string(), draw));
        }

        let event = format!("{} vs {}", self.home_team, self.away_team);
        let market = Market::new(self.address, PLATFORM_NAME, self.sport, event, outcomes);
        match self.maturity_date {
            Some(t) => market.with_start_time(t),
            None => market,
        }
    }

    fn odds(&self) -> MarketOdds {
        MarketOdds {
            market_id: self.address.clone(),
            home: self.home_odds,
            away: self.away_odds,
            draw: self.draw_odds.filter(|d| *d > Decimal::ZERO),
            timestamp: Utc::now(),
        }
    }
}

/// Keep open markets, in API order, up to the fetch limit.
fn select_open(raw: Vec<OvertimeMarket>) -> Vec<OvertimeMarket> {
    raw.into_iter()
        .filter(|m| m.is_open)
        .take(ACTIVE_MARKET_LIMIT)
        .collect()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Overtime Protocol market client.
pub struct OvertimeClient {
    http: Client,
    base_url: String,
    network: String,
}

impl OvertimeClient {
    /// Create a new client. `None` falls back to the public endpoint and
    /// the Arbitrum network.
    pub fn new(base_url: Option<String>, network: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("BETSCOUT/0.1.0")
            .build()
            .context("Failed to build HTTP client for Overtime")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            network: network.unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
        })
    }

    fn markets_url(&self) -> String {
        format!("{}/{}/markets", self.base_url, self.network)
    }

    /// Fetch the raw open-market list.
    async fn fetch_open(&self) -> Result<Vec<OvertimeMarket>> {
        let url = self.markets_url();
        debug!(url = %url, "Fetching Overtime markets");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Overtime API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Overtime API error {status}: {body}");
        }

        let raw: Vec<OvertimeMarket> = resp
            .json()
            .await
            .context("Failed to parse Overtime markets response")?;

        let total = raw.len();
        let open = select_open(raw);
        info!(total, open = open.len(), network = %self.network, "Overtime markets fetched");
        Ok(open)
    }
}

#[async_trait]
impl SportsbookPlatform for OvertimeClient {
    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        Ok(self
            .fetch_open()
            .await?
            .into_iter()
            .map(OvertimeMarket::into_market)
            .collect())
    }

    async fn market_odds(&self, market_id: &str) -> Result<MarketOdds> {
        let markets = self.fetch_open().await?;
        markets
            .iter()
            .find(|m| m.address.eq_ignore_ascii_case(market_id))
            .map(OvertimeMarket::odds)
            .ok_or_else(|| anyhow!("Overtime market not found or closed: {market_id}"))
    }

    async fn simulate_bet(&self, request: &BetRequest) -> Result<SimulatedBet> {
        request.validate_address()?;
        let odds = self.market_odds(&request.market_id).await?;

        if let (Some(expected), Some(current)) = (request.odds, odds.for_position(request.position)) {
            if expected != current {
                warn!(
                    market_id = %request.market_id,
                    expected = %expected,
                    current = %current,
                    "Odds moved since request; simulating at current odds"
                );
            }
        }

        simulate_against(PLATFORM_NAME, request, &odds)
    }

    fn name(&self) -> &'static str {
        PLATFORM_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
