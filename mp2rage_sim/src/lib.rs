//! Closed-form MP2RAGE signal simulator.
//!
//! Protocol -> timing -> (steady state -> INV1/INV2) per tissue -> UNI.

pub mod config;
pub mod contrast;
pub mod error;
pub mod protocol;
pub mod report;
pub mod signal;
pub mod simulator;
pub mod steady_state;
pub mod sweep;
pub mod timing;
pub mod tissue;
