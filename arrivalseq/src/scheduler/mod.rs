//! Delay propagation and runway selection.
//!
//! The [`Scheduler`] turns estimates into a conflict-free landing schedule.
//!
//! # Pass structure
//!
//! 1. Pinned flights (Landed, Frozen, manual landing time) stay where they are
//!    and act as obstacles for everything else.
//! 2. NoDelay flights are placed next, against pinned flights only.
//! 3. The remaining flights are placed tier by tier (SuperStable, Stable,
//!    then Unstable and Overshoot) in sequence order, HighPriority flights
//!    first within a tier.
//!
//! Each flight lands at the earliest time clear of everything placed before
//! it: the landing rate on the same runway, the stagger rate across runways,
//! blockouts and slots on its runway, and the cutover gap of a runway mode
//! change. Stable and SuperStable flights also never land before the flight
//! placed ahead of them in their tier.
//!
//! Flights whose total delay exceeds their maximum delay are moved to the
//! front of their tier and the pass is repeated.

mod engine;
mod placement;

pub use engine::Scheduler;
