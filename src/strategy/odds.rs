//! Odds evaluation and opportunity ranking.
//!
//! Scores a single outcome at a given stake (expected payout, ROI, risk
//! tier) and ranks batches of scores by ROI. Every function here is pure:
//! identical inputs always produce identical output.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::EvaluationError;
use crate::types::{Market, OpportunityScore, RiskTier};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// ROI (percent) strictly above which an outcome is "high" risk.
pub const HIGH_RISK_ROI: Decimal = dec!(50);

/// ROI (percent) strictly above which an outcome is "medium" risk.
pub const MEDIUM_RISK_ROI: Decimal = dec!(20);

/// Maximum number of opportunities kept after ranking.
pub const RANK_LIMIT: usize = 10;

/// ROI thresholds used to classify risk tiers.
#[derive(Debug, Clone)]
pub struct TierThresholds {
    pub high: Decimal,
    pub medium: Decimal,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: HIGH_RISK_ROI,
            medium: MEDIUM_RISK_ROI,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Computes profitability metrics for a single market outcome.
#[derive(Debug, Clone, Default)]
pub struct OddsEvaluator {
    thresholds: TierThresholds,
}

impl OddsEvaluator {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Score `stake` placed on `market.outcomes[outcome_index]`.
    ///
    /// expected_payout = stake × odds
    /// roi_percent     = (odds − 1) × 100
    ///
    /// ROI is taken from the odds directly so that rounding of very small
    /// payouts cannot shift it.
    pub fn evaluate(
        &self,
        market: &Market,
        outcome_index: usize,
        stake: Decimal,
    ) -> Result<OpportunityScore, EvaluationError> {
        if stake <= Decimal::ZERO {
            return Err(EvaluationError::InvalidStake { stake });
        }

        let outcome = market
            .outcome(outcome_index)
            .ok_or_else(|| EvaluationError::InvalidOutcome {
                market_id: market.id.clone(),
                outcome_index,
                reason: format!("market has {} outcomes", market.outcomes.len()),
            })?;

        if outcome.odds <= Decimal::ZERO {
            return Err(EvaluationError::InvalidOutcome {
                market_id: market.id.clone(),
                outcome_index,
                reason: format!("odds must be positive, got {}", outcome.odds),
            });
        }

        self.score(&market.platform, &market.id, outcome_index, outcome.odds, stake)
    }

    /// Score a stake against raw odds. Callers are expected to have checked
    /// the outcome index already; `evaluate` is the checked entry point.
    pub fn score(
        &self,
        platform: &str,
        market_id: &str,
        outcome_index: usize,
        odds: Decimal,
        stake: Decimal,
    ) -> Result<OpportunityScore, EvaluationError> {
        if stake <= Decimal::ZERO {
            return Err(EvaluationError::InvalidStake { stake });
        }
        if odds <= Decimal::ZERO {
            return Err(EvaluationError::InvalidOutcome {
                market_id: market_id.to_string(),
                outcome_index,
                reason: format!("odds must be positive, got {odds}"),
            });
        }

        let expected_payout = stake
            .checked_mul(odds)
            .ok_or(EvaluationError::Overflow { operation: "expected payout" })?;

        let roi_percent = odds
            .checked_sub(Decimal::ONE)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or(EvaluationError::Overflow { operation: "roi" })?;

        let risk_tier = self.classify(roi_percent);

        debug!(
            market_id,
            outcome_index,
            stake = %stake,
            odds = %odds,
            roi = %format!("{:.2}%", roi_percent),
            tier = %risk_tier,
            "Outcome evaluated"
        );

        Ok(OpportunityScore {
            platform: platform.to_string(),
            market_id: market_id.to_string(),
            outcome_index,
            stake,
            expected_payout,
            roi_percent,
            risk_tier,
        })
    }

    /// Map an ROI percentage to a risk tier. Both thresholds are exclusive
    /// on the low side: exactly 50 is medium, exactly 20 is low.
    pub fn classify(&self, roi_percent: Decimal) -> RiskTier {
        if roi_percent > self.thresholds.high {
            RiskTier::High
        } else if roi_percent > self.thresholds.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// Evaluate an outcome with the default thresholds.
pub fn evaluate_opportunity(
    market: &Market,
    outcome_index: usize,
    stake: Decimal,
) -> Result<OpportunityScore, EvaluationError> {
    OddsEvaluator::default().evaluate(market, outcome_index, stake)
}

/// Risk tier for an ROI percentage under the default thresholds.
pub fn classify_risk(roi_percent: Decimal) -> RiskTier {
    OddsEvaluator::default().classify(roi_percent)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sort by ROI descending and keep the top `RANK_LIMIT`.
///
/// The sort is stable: scores with equal ROI keep their input order.
pub fn rank_opportunities(scores: Vec<OpportunityScore>) -> Vec<OpportunityScore> {
    rank_opportunities_with_limit(scores, RANK_LIMIT)
}

pub fn rank_opportunities_with_limit(
    mut scores: Vec<OpportunityScore>,
    limit: usize,
) -> Vec<OpportunityScore> {
    // `sort_by` is a stable merge sort
    scores.sort_by(|a, b| b.roi_percent.cmp(&a.roi_percent));
    scores.truncate(limit);
    scores
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
