//! CoinGecko market-data client.
//!
//! Trending coins, spot prices with 24h change, and symbol search. The
//! free tier needs no key; a pro key is sent as `x-cg-pro-api-key` when
//! configured.
//!
//! API: `https://api.coingecko.com/api/v3/`

use anyhow::{Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    /// Position in the trending list (0 = hottest).
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinPrice {
    pub coin_id: String,
    pub vs_currency: String,
    pub price: Decimal,
    pub change_24h_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSearchHit {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingItem,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    score: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

/// `/simple/price` body: `{ "<coin>": { "<vs>": price, "<vs>_24h_change": pct } }`
type SimplePriceResponse = HashMap<String, HashMap<String, Option<Decimal>>>;

fn parse_trending(body: TrendingResponse) -> Vec<TrendingCoin> {
    body.coins
        .into_iter()
        .map(|e| TrendingCoin {
            id: e.item.id,
            name: e.item.name,
            symbol: e.item.symbol,
            market_cap_rank: e.item.market_cap_rank,
            score: e.item.score,
        })
        .collect()
}

fn parse_price(body: &SimplePriceResponse, coin_id: &str, vs_currency: &str) -> Result<CoinPrice> {
    let fields = body
        .get(coin_id)
        .with_context(|| format!("CoinGecko returned no price for {coin_id}"))?;
    let price = fields
        .get(vs_currency)
        .copied()
        .flatten()
        .with_context(|| format!("CoinGecko returned no {vs_currency} price for {coin_id}"))?;
    let change_24h_pct = fields
        .get(&format!("{vs_currency}_24h_change"))
        .copied()
        .flatten();

    Ok(CoinPrice {
        coin_id: coin_id.to_string(),
        vs_currency: vs_currency.to_string(),
        price,
        change_24h_pct,
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl CoinGeckoClient {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("BETSCOUT/0.1.0")
            .build()
            .context("Failed to build CoinGecko HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.filter(|k| !k.is_empty()).map(SecretString::new),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(url = %url, "CoinGecko request");

        let mut req = self.http.get(&url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("x-cg-pro-api-key", key.expose_secret());
        }

        let resp = req.send().await.context("CoinGecko API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko API error {status}: {body}");
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse CoinGecko response from {path_and_query}"))
    }

    /// Coins trending on CoinGecko in the last 24h.
    pub async fn trending(&self) -> Result<Vec<TrendingCoin>> {
        let body: TrendingResponse = self.get("/search/trending").await?;
        let coins = parse_trending(body);
        info!(count = coins.len(), "Fetched trending coins");
        Ok(coins)
    }

    /// Spot price of `coin_id` in `vs_currency`, with 24h change.
    pub async fn coin_price(&self, coin_id: &str, vs_currency: &str) -> Result<CoinPrice> {
        let path = format!(
            "/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            urlencoding::encode(coin_id),
            urlencoding::encode(vs_currency),
        );
        let body: SimplePriceResponse = self.get(&path).await?;
        let price = parse_price(&body, coin_id, vs_currency)?;
        info!(coin = coin_id, price = %price.price, "Fetched coin price");
        Ok(price)
    }

    /// Search coins by name or symbol.
    pub async fn search(&self, query: &str) -> Result<Vec<CoinSearchHit>> {
        let path = format!("/search?query={}", urlencoding::encode(query));
        let body: SearchResponse = self.get(&path).await?;
        Ok(body
            .coins
            .into_iter()
            .map(|c| CoinSearchHit {
                id: c.id,
                name: c.name,
                symbol: c.symbol,
                market_cap_rank: c.market_cap_rank,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
