//! Adapters connecting the Yatra engine to the outside world.
//!
//! Responsibilities:
//! - Route ordered tours through an OSRM service ([`routing`]).
//! - Load temple catalogs over HTTP or from JSON exports ([`catalog`]).
//!
//! Boundaries:
//! - Do not encode domain rules (live in `yatra-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod catalog;
pub mod routing;
