//! Dispatch core for a response-team simulation.
//!
//! Incidents are queued by priority, each dispatch sends the nearest
//! available team, and missions complete as the simulation clock advances.

pub mod action_log;
pub mod clock;
pub mod config;
pub mod distance_cache;
pub mod engine;
pub mod error;
pub mod event;
pub mod point;
pub mod priority_queue;
pub mod region_graph;
pub mod rng;
pub mod selection;
pub mod snapshot;
pub mod team;
pub mod type_selector;
pub mod types;
