//! Estimate refinement.
//!
//! The flight data feed supplies rough feeder-fix and landing estimates. This
//! module refines them from the live trajectory and the preset arrival
//! intervals configured per feeder fix and STAR.

mod arrival;
mod provider;

pub use arrival::ArrivalLookup;
pub use provider::EstimateProvider;
