//! One scan → evaluate → rank → size pass.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::scanner::MarketRouter;
use crate::strategy::{OpportunityScanner, ScanDecision};
use crate::types::BetRecommendation;

/// Summary of a single cycle, logged by the agent loop and served by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub timestamp: DateTime<Utc>,
    pub markets_scanned: usize,
    pub outcomes_scored: usize,
    pub outcomes_rejected: usize,
    pub bankroll: Decimal,
    pub recommendations: Vec<BetRecommendation>,
}

impl CycleReport {
    /// Sum of all recommended stakes.
    pub fn total_recommended(&self) -> Decimal {
        self.recommendations.iter().map(|r| r.stake.stake).sum()
    }
}

/// Run a single cycle against the current bankroll.
pub async fn run_cycle(
    router: &MarketRouter,
    scanner: &OpportunityScanner,
    bankroll: Decimal,
    cycle_number: u64,
) -> Result<CycleReport> {
    info!(cycle = cycle_number, "Starting cycle");

    let markets = router.scan_all().await?;
    let (ranked, decisions) = scanner.scan(&markets);
    let outcomes_rejected = decisions
        .iter()
        .filter(|d| matches!(d, ScanDecision::Rejected { .. }))
        .count();

    let recommendations = scanner.recommend(&ranked, &markets, bankroll)?;

    Ok(CycleReport {
        cycle_number,
        timestamp: Utc::now(),
        markets_scanned: markets.len(),
        outcomes_scored: decisions.len() - outcomes_rejected,
        outcomes_rejected,
        bankroll,
        recommendations,
    })
}
