//! A virtual pet with three decaying needs, kept alive by feeding, playing
//! and cleaning up after it.
//!
//! [`sim::GameState`] owns the whole simulation. A driver calls
//! [`sim::GameState::tick`] every cycle and forwards button presses and mess
//! clicks in between; the presentation layer only ever reads
//! [`sim::GameState::view`].

pub mod config;
pub mod error;
pub mod mess;
pub mod model;
pub mod sequence;
pub mod sim;
pub mod storage;
pub mod telemetry;
