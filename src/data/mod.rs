//! Market-data providers.
//!
//! Centralized crypto market data used alongside sportsbook odds.

pub mod coingecko;
