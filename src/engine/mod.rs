//! Core engine: market routing and the scan cycle.

pub mod cycle;
pub mod scanner;
