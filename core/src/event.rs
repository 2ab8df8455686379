//! Dispatch events, one per state change.
//!
//! RULE: Every mutating engine operation reports what it did as events.
//! Each event is also written to the action log under its
//! `event_type_name`.

use crate::{
    point::Priority,
    types::{PointId, Tick},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchEvent {
    IncidentSubmitted {
        tick: Tick,
        point_id: PointId,
        x: f64,
        y: f64,
        priority: Priority,
    },
    TeamDispatched {
        tick: Tick,
        point_id: PointId,
        team: String,
        incident_type: String,
        x: f64,
        y: f64,
        distance: f64,
    },
    DispatchDeferred {
        tick: Tick,
        point_id: PointId,
        priority: Priority,
    },
    MissionCompleted {
        tick: Tick,
        point_id: PointId,
        team: String,
        incident_type: String,
        x: f64,
        y: f64,
    },
    ActionRecorded {
        tick: Tick,
        text: String,
    },
}

impl DispatchEvent {
    pub fn tick(&self) -> Tick {
        match self {
            Self::IncidentSubmitted { tick, .. }
            | Self::TeamDispatched { tick, .. }
            | Self::DispatchDeferred { tick, .. }
            | Self::MissionCompleted { tick, .. }
            | Self::ActionRecorded { tick, .. } => *tick,
        }
    }

    /// Human-readable log line.
    pub fn describe(&self) -> String {
        match self {
            Self::IncidentSubmitted { x, y, priority, .. } => {
                format!("Incident submitted at ({x}, {y}) priority {priority}")
            }
            Self::TeamDispatched { team, incident_type, x, y, .. } => {
                format!("{team} responding to {incident_type} at ({x}, {y})")
            }
            Self::DispatchDeferred { point_id, priority, .. } => {
                format!("No team available for {point_id}; requeued at priority {priority}")
            }
            Self::MissionCompleted { team, incident_type, x, y, .. } => {
                format!("{team} completed {incident_type} at ({x}, {y})")
            }
            Self::ActionRecorded { text, .. } => text.clone(),
        }
    }
}

/// Stable string name for a DispatchEvent variant.
pub fn event_type_name(event: &DispatchEvent) -> &'static str {
    match event {
        DispatchEvent::IncidentSubmitted { .. } => "incident_submitted",
        DispatchEvent::TeamDispatched { .. }    => "team_dispatched",
        DispatchEvent::DispatchDeferred { .. }  => "dispatch_deferred",
        DispatchEvent::MissionCompleted { .. }  => "mission_completed",
        DispatchEvent::ActionRecorded { .. }    => "action_recorded",
    }
}
