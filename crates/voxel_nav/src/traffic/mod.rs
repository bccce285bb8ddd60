//! Traffic reservations and route diversification.
//!
//! Agent queries reserve the first few leaves of their path. Later queries
//! pay an entry penalty for leaves reserved by other agents (optionally only
//! same-team agents) plus a small deterministic per-agent noise, so agents
//! heading the same way fan out instead of stacking on one route.

pub mod noise;
pub mod reservation;

pub use noise::tie_break_noise;
pub use reservation::{Reservation, ReservationTable};
