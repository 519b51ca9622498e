//! Sportsbook integrations.
//!
//! Defines the `SportsbookPlatform` trait and provides implementations for:
//! - Azuro: condition catalog served from fixtures, with wallet history
//! - Overtime: live market list and odds from the Overtime v2 API
//!
//! Transaction signing and broadcast stay outside this crate; both
//! platforms place bets in simulation only.

pub mod azuro;
pub mod overtime;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::types::{
    BetRequest, BetStatus, BetVerification, BettingHistory, Market, MarketOdds, SimulatedBet,
};

/// Prefix marking transaction hashes that never touched a chain.
pub const SIMULATED_TX_PREFIX: &str = "0xsimulated_";

/// Abstraction over sports-betting platforms.
///
/// Implementors provide market scanning, odds lookup, and bet simulation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SportsbookPlatform: Send + Sync {
    /// Fetch all open markets from this platform.
    async fn fetch_markets(&self) -> Result<Vec<Market>>;

    /// Current head-to-head odds for one market.
    async fn market_odds(&self, market_id: &str) -> Result<MarketOdds>;

    /// Price a bet without submitting it.
    async fn simulate_bet(&self, request: &BetRequest) -> Result<SimulatedBet>;

    /// Bets recorded for the agent's wallet on this platform.
    async fn betting_history(&self) -> Result<BettingHistory> {
        Ok(BettingHistory::new(Vec::new()))
    }

    /// Platform name for logging and identification.
    fn name(&self) -> &'static str;
}

/// Build a simulated bet from validated request and current odds.
///
/// Fails when the requested position has no (or zero) odds on this market.
pub(crate) fn simulate_against(
    platform: &str,
    request: &BetRequest,
    odds: &MarketOdds,
) -> Result<SimulatedBet> {
    let position_odds = odds.for_position(request.position).ok_or_else(|| {
        anyhow!(
            "Position {} not available for market {}",
            request.position,
            request.market_id
        )
    })?;

    let potential_payout = request
        .amount
        .checked_mul(position_odds)
        .ok_or_else(|| anyhow!("Payout overflow for amount {}", request.amount))?;

    let now = Utc::now();
    let bet = SimulatedBet {
        market_id: request.market_id.clone(),
        platform: platform.to_string(),
        position: request.position,
        amount: request.amount,
        odds: position_odds,
        potential_payout,
        tx_hash: format!("{SIMULATED_TX_PREFIX}{}", now.timestamp()),
        status: BetStatus::Simulated,
        message: "Simulated bet, not submitted on-chain".to_string(),
        timestamp: now,
    };

    info!(
        platform,
        market_id = %bet.market_id,
        position = %bet.position,
        amount = %bet.amount,
        odds = %bet.odds,
        payout = %bet.potential_payout,
        "Bet simulated"
    );

    Ok(bet)
}

/// Check a bet transaction hash.
///
/// Simulated hashes verify immediately. Anything else would need a chain
/// receipt lookup, which this crate does not perform.
pub fn verify_bet(tx_hash: &str) -> BetVerification {
    if tx_hash.starts_with(SIMULATED_TX_PREFIX) {
        BetVerification {
            tx_hash: tx_hash.to_string(),
            verified: true,
            status: BetStatus::Simulated,
            message: "This was a simulated bet, no on-chain transaction exists".to_string(),
        }
    } else {
        BetVerification {
            tx_hash: tx_hash.to_string(),
            verified: false,
            status: BetStatus::Unverified,
            message: "On-chain receipt lookup is not available".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn odds() -> MarketOdds {
        MarketOdds {
            market_id: "0xabc".into(),
            home: dec!(2.15),
            away: dec!(3.4),
            draw: None,
            timestamp: Utc::now(),
        }
    }

    fn request(position: Position, amount: Decimal) -> BetRequest {
        BetRequest {
            market_id: "0xabc".into(),
            position,
            amount,
            odds: None,
        }
    }

    #[test]
    fn test_simulate_computes_payout() {
        let bet = simulate_against("overtime", &request(Position::Home, dec!(10)), &odds()).unwrap();
        assert_eq!(bet.potential_payout, dec!(21.5));
        assert_eq!(bet.odds, dec!(2.15));
        assert_eq!(bet.status, BetStatus::Simulated);
        assert!(bet.tx_hash.starts_with(SIMULATED_TX_PREFIX));
    }

    #[test]
    fn test_simulate_unavailable_position() {
        let err = simulate_against("overtime", &request(Position::Draw, dec!(10)), &odds()).unwrap_err();
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn test_verify_simulated_hash() {
        let v = verify_bet("0xsimulated_1737850000");
        assert!(v.verified);
        assert_eq!(v.status, BetStatus::Simulated);
    }

    #[test]
    fn test_verify_real_hash_is_unverified() {
        let v = verify_bet("0xdeadbeef");
        assert!(!v.verified);
        assert_eq!(v.status, BetStatus::Unverified);
    }
}
