//! Stake sizing.
//!
//! Simplified Kelly-style rule: stake a fraction of bankroll equal to
//! `confidence × risk_tolerance`, capped at 10%. Win and loss probabilities
//! are not used.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::EvaluationError;
use crate::types::StakeRecommendation;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Hard ceiling on the fraction of bankroll recommended for one bet.
pub const MAX_STAKE_FRACTION: Decimal = dec!(0.1);

/// Risk tolerance used when the caller does not supply one.
pub const DEFAULT_RISK_TOLERANCE: Decimal = dec!(0.1);

/// Stake sizing configuration.
#[derive(Debug, Clone)]
pub struct SizingConfig {
    /// Maximum stake as a fraction of bankroll.
    pub max_fraction: Decimal,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            max_fraction: MAX_STAKE_FRACTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Sizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StakeSizer {
    config: SizingConfig,
}

impl StakeSizer {
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Recommend a stake for `bankroll` given a confidence in [0, 1].
    ///
    /// fraction = min(confidence × risk_tolerance, max_fraction)
    /// stake    = bankroll × fraction
    pub fn recommend(
        &self,
        bankroll: Decimal,
        confidence: Decimal,
        risk_tolerance: Decimal,
    ) -> Result<StakeRecommendation, EvaluationError> {
        if bankroll < Decimal::ZERO {
            return Err(EvaluationError::InvalidBankroll { bankroll });
        }
        if confidence < Decimal::ZERO || confidence > Decimal::ONE {
            return Err(EvaluationError::InvalidConfidence { confidence });
        }
        if risk_tolerance <= Decimal::ZERO {
            return Err(EvaluationError::InvalidRiskTolerance { risk_tolerance });
        }

        let raw = confidence
            .checked_mul(risk_tolerance)
            .ok_or(EvaluationError::Overflow { operation: "stake fraction" })?;
        let capped = raw > self.config.max_fraction;
        let fraction = raw.min(self.config.max_fraction);

        let stake = bankroll
            .checked_mul(fraction)
            .ok_or(EvaluationError::Overflow { operation: "stake" })?;

        debug!(
            bankroll = %bankroll,
            confidence = %confidence,
            risk_tolerance = %risk_tolerance,
            fraction = %format!("{:.2}%", fraction * dec!(100)),
            capped,
            stake = %stake,
            "Stake sized"
        );

        Ok(StakeRecommendation {
            stake,
            fraction,
            capped,
        })
    }
}

/// Recommended stake amount with the default 10% cap.
pub fn recommend_stake(
    bankroll: Decimal,
    confidence: Decimal,
    risk_tolerance: Decimal,
) -> Result<Decimal, EvaluationError> {
    StakeSizer::default()
        .recommend(bankroll, confidence, risk_tolerance)
        .map(|r| r.stake)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
