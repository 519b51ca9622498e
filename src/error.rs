//! Typed failures for the evaluation and sizing core.
//!
//! Everything else in the crate reports errors through `anyhow`; the pure
//! core returns these so callers can decide whether to skip, re-prompt, or
//! abort on a per-opportunity basis.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures from `OddsEvaluator` and `StakeSizer`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("stake must be positive, got {stake}")]
    InvalidStake { stake: Decimal },

    #[error("invalid outcome {outcome_index} for market {market_id}: {reason}")]
    InvalidOutcome {
        market_id: String,
        outcome_index: usize,
        reason: String,
    },

    #[error("confidence must be within [0, 1], got {confidence}")]
    InvalidConfidence { confidence: Decimal },

    #[error("risk tolerance must be positive, got {risk_tolerance}")]
    InvalidRiskTolerance { risk_tolerance: Decimal },

    #[error("bankroll must be non-negative, got {bankroll}")]
    InvalidBankroll { bankroll: Decimal },

    #[error("arithmetic overflow while computing {operation}")]
    Overflow { operation: &'static str },
}

/// Rejections for a bet request before it reaches a platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BetRequestError {
    #[error("invalid market address: {0}")]
    InvalidMarketAddress(String),

    #[error("invalid position '{0}', must be home, away, or draw")]
    InvalidPosition(String),

    #[error("bet amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("odds must be greater than 1, got {0}")]
    InvalidOdds(Decimal),
}
