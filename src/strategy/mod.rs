//! Strategy engine: odds evaluation, opportunity ranking and stake sizing.

pub mod odds;
pub mod stake;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};

use crate::error::EvaluationError;
use crate::types::{BetRecommendation, Market, OpportunityScore};
use odds::{rank_opportunities_with_limit, OddsEvaluator, RANK_LIMIT};
use stake::{StakeSizer, DEFAULT_RISK_TOLERANCE};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Scanner configuration. Defaults are overridden by config.toml at runtime.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Stake used to score every outcome before sizing.
    pub reference_stake: Decimal,
    pub risk_tolerance: Decimal,
    /// Confidence applied to every ranked opportunity when sizing.
    pub default_confidence: Decimal,
    pub rank_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            reference_stake: dec!(0.1),
            risk_tolerance: DEFAULT_RISK_TOLERANCE,
            default_confidence: dec!(0.75),
            rank_limit: RANK_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Decision log
// ---------------------------------------------------------------------------

/// Record of every outcome considered during a scan, including the ones
/// that could not be scored and why.
#[derive(Debug, Clone)]
pub enum ScanDecision {
    Scored(OpportunityScore),
    Rejected {
        market_id: String,
        outcome_index: usize,
        error: EvaluationError,
    },
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Pipelines evaluation → ranking → sizing over a batch of markets.
///
/// Holds only immutable configuration, so one instance can be shared
/// between the scan loop and the API handlers.
#[derive(Debug, Clone, Default)]
pub struct OpportunityScanner {
    evaluator: OddsEvaluator,
    sizer: StakeSizer,
    config: ScanConfig,
}

impl OpportunityScanner {
    pub fn new(evaluator: OddsEvaluator, sizer: StakeSizer, config: ScanConfig) -> Self {
        Self {
            evaluator,
            sizer,
            config,
        }
    }

    pub fn evaluator(&self) -> &OddsEvaluator {
        &self.evaluator
    }

    pub fn sizer(&self) -> &StakeSizer {
        &self.sizer
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Score every outcome of every market at the reference stake and rank
    /// the results.
    ///
    /// Outcomes that fail validation are logged in the decision list and
    /// skipped; they never abort the batch.
    pub fn scan(&self, markets: &[Market]) -> (Vec<OpportunityScore>, Vec<ScanDecision>) {
        let mut scores = Vec::new();
        let mut decisions = Vec::new();

        for market in markets {
            for outcome in &market.outcomes {
                match self
                    .evaluator
                    .evaluate(market, outcome.index, self.config.reference_stake)
                {
                    Ok(score) => {
                        decisions.push(ScanDecision::Scored(score.clone()));
                        scores.push(score);
                    }
                    Err(error) => {
                        debug!(
                            market_id = %market.id,
                            outcome = %outcome.label,
                            error = %error,
                            "Outcome skipped"
                        );
                        decisions.push(ScanDecision::Rejected {
                            market_id: market.id.clone(),
                            outcome_index: outcome.index,
                            error,
                        });
                    }
                }
            }
        }

        let scored = scores.len();
        let ranked = rank_opportunities_with_limit(scores, self.config.rank_limit);

        info!(
            markets = markets.len(),
            scored,
            ranked = ranked.len(),
            "Opportunity scan complete"
        );

        (ranked, decisions)
    }

    /// Size a stake for each ranked opportunity against `bankroll`.
    ///
    /// Markets are matched on platform and id. Scores whose market is
    /// missing from `markets` are skipped with a warning. A sizing failure (bad bankroll or configuration) fails the
    /// whole call since it would fail identically for every opportunity.
    pub fn recommend(
        &self,
        ranked: &[OpportunityScore],
        markets: &[Market],
        bankroll: Decimal,
    ) -> Result<Vec<BetRecommendation>, EvaluationError> {
        let stake = self.sizer.recommend(
            bankroll,
            self.config.default_confidence,
            self.config.risk_tolerance,
        )?;

        let mut recommendations = Vec::with_capacity(ranked.len());
        for score in ranked {
            let found = markets
                .iter()
                .find(|m| m.platform == score.platform && m.id == score.market_id)
                .and_then(|m| m.outcome(score.outcome_index).map(|o| (m, o)));

            let Some((market, outcome)) = found else {
                warn!(
                    platform = %score.platform,
                    market_id = %score.market_id,
                    outcome_index = score.outcome_index,
                    "Ranked opportunity has no matching market"
                );
                continue;
            };

            recommendations.push(BetRecommendation {
                score: score.clone(),
                outcome_label: outcome.label.clone(),
                odds: outcome.odds,
                event: market.event.clone(),
                sport: market.sport.clone(),
                confidence: self.config.default_confidence,
                stake,
            });
        }

        Ok(recommendations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskTier;

    fn make_market(id: &str, odds: &[Decimal]) -> Market {
        Market::new(
            id,
            "azuro",
            "Football",
            format!("Event {id}"),
            odds.iter()
                .enumerate()
                .map(|(i, o)| (format!("Outcome {i}"), *o))
                .collect(),
        )
    }

    #[test]
    fn test_no_markets_returns_empty() {
        let scanner = OpportunityScanner::default();
        let (ranked, decisions) = scanner.scan(&[]);
        assert!(ranked.is_empty());
        assert!(decisions.is_empty());
    }

    #[test]
    fn test_scan_ranks_all_outcomes_by_roi() {
        let scanner = OpportunityScanner::default();
        let markets = vec![
            make_market("1", &[dec!(2.5), dec!(3.2), dec!(2.8)]),
            make_market("2", &[dec!(1.8), dec!(2.1)]),
        ];
        let (ranked, decisions) = scanner.scan(&markets);
        assert_eq!(decisions.len(), 5);
        assert_eq!(ranked.len(), 5);

        let order: Vec<_> = ranked
            .iter()
            .map(|s| (s.market_id.as_str(), s.outcome_index))
            .collect();
        assert_eq!(order, vec![("1", 1), ("1", 2), ("1", 0), ("2", 1), ("2", 0)]);
        assert_eq!(ranked[0].roi_percent, dec!(220));
        assert_eq!(ranked[0].stake, dec!(0.1));
        assert_eq!(ranked[4].risk_tier, RiskTier::High);
    }

    #[test]
    fn test_bad_odds_logged_not_fatal() {
        let scanner = OpportunityScanner::default();
        let markets = vec![make_market("1", &[dec!(2.0), Decimal::ZERO])];
        let (ranked, decisions) = scanner.scan(&markets);
        assert_eq!(ranked.len(), 1);
        assert!(decisions.iter().any(|d| matches!(
            d,
            ScanDecision::Rejected { outcome_index: 1, .. }
        )));
    }

    #[test]
    fn test_scan_respects_rank_limit() {
        let scanner = OpportunityScanner::new(
            OddsEvaluator::default(),
            StakeSizer::default(),
            ScanConfig {
                rank_limit: 3,
                ..ScanConfig::default()
            },
        );
        let markets: Vec<_> = (0..4)
            .map(|i| make_market(&i.to_string(), &[dec!(1.5), dec!(2.5)]))
            .collect();
        let (ranked, decisions) = scanner.scan(&markets);
        assert_eq!(decisions.len(), 8);
        assert_eq!(ranked.len(), 3);
        // ties at 150% keep market order
        let ids: Vec<_> = ranked.iter().map(|s| s.market_id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_recommend_sizes_each_opportunity() {
        let scanner = OpportunityScanner::default();
        let markets = vec![make_market("1", &[dec!(2.5), dec!(3.2)])];
        let (ranked, _) = scanner.scan(&markets);
        let recs = scanner.recommend(&ranked, &markets, dec!(2)).unwrap();
        assert_eq!(recs.len(), 2);
        // 0.75 × 0.1 = 7.5% of 2
        assert_eq!(recs[0].stake.stake, dec!(0.15));
        assert_eq!(recs[0].outcome_label, "Outcome 1");
        assert_eq!(recs[0].odds, dec!(3.2));
        assert_eq!(recs[0].event, "Event 1");
    }

    #[test]
    fn test_recommend_skips_unknown_market() {
        let scanner = OpportunityScanner::default();
        let markets = vec![make_market("1", &[dec!(2.5)])];
        let (ranked, _) = scanner.scan(&markets);
        let recs = scanner.recommend(&ranked, &[], dec!(100)).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_recommend_matches_platform_for_shared_id() {
        let scanner = OpportunityScanner::default();
        let azuro = make_market("7", &[dec!(1.9), dec!(1.9)]);
        let overtime = Market::new(
            "7",
            "overtime",
            "Tennis",
            "Other Event",
            vec![("Player A".into(), dec!(4.0)), ("Player B".into(), dec!(1.2))],
        );
        let markets = vec![azuro, overtime];

        let (ranked, _) = scanner.scan(&markets);
        assert_eq!(ranked[0].platform, "overtime");

        let recs = scanner.recommend(&ranked, &markets, dec!(1)).unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].event, "Other Event");
        assert_eq!(recs[0].outcome_label, "Player A");
        assert_eq!(recs[1].event, "Event 7");
        assert_eq!(recs[1].odds, dec!(1.9));
    }

    #[test]
    fn test_recommend_rejects_negative_bankroll() {
        let scanner = OpportunityScanner::default();
        assert!(matches!(
            scanner.recommend(&[], &[], dec!(-5)),
            Err(EvaluationError::InvalidBankroll { .. })
        ));
    }

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert_eq!(config.reference_stake, dec!(0.1));
        assert_eq!(config.risk_tolerance, dec!(0.1));
        assert_eq!(config.default_confidence, dec!(0.75));
        assert_eq!(config.rank_limit, 10);
    }
}
