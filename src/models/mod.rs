//! Network configuration models.
//!
//! Plain data describing a time-expanded capacity problem. The graph
//! builder consumes these; nothing in here knows about node ids.
//!
//! # Domain Mappings
//!
//! | u-timegraph | Drone routing | Rail | Logistics |
//! |-------------|---------------|------|-----------|
//! | Hub | Landing zone | Station track | Depot |
//! | Connection | Air corridor | Plain link | Road |
//! | RestrictedConnection | Restricted airspace | Single-track section | Ferry |
//! | Horizon | Turns | Timetable steps | Shifts |

mod connection;
mod hub;
mod network;

pub use connection::{Connection, RestrictedConnection, DEFAULT_RESTRICTED_DELAY};
pub use hub::Hub;
pub use network::NetworkConfig;

/// Index of a hub, `[0, H)`.
pub type HubId = usize;

/// Discrete time step, `[0, T]`.
pub type TimeStep = usize;

/// Integral edge capacity.
pub type Capacity = u32;
