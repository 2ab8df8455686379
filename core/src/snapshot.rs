//! Report snapshots: point-in-time aggregates for external renderers.
//!
//! Counters are maintained at each event site by the engine; nothing here
//! is derived from action-log text.

use crate::{
    team::{Team, TeamStatus},
    types::{RunId, Tick},
};
use serde::{Deserialize, Serialize};

/// Running event counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    pub incidents_submitted: u64,
    pub dispatches:          u64,
    pub deferred_dispatches: u64,
    pub completions:         u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub name:               String,
    pub x:                  f64,
    pub y:                  f64,
    pub status:             TeamStatus,
    pub current_incident:   Option<String>,
    pub missions_completed: usize,
}

impl From<&Team> for TeamReport {
    fn from(team: &Team) -> Self {
        Self {
            name:               team.name().to_string(),
            x:                  team.location().x(),
            y:                  team.location().y(),
            status:             team.status(),
            current_incident:   team.current_mission().map(|m| m.incident_type.clone()),
            missions_completed: team.history().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub run_id:                    RunId,
    pub sim_time:                  Tick,
    pub total_incidents_submitted: u64,
    pub total_dispatches:          u64,
    pub total_completions:         u64,
    pub active_incident_count:     usize,
    pub pending_queue_size:        usize,
    pub teams:                     Vec<TeamReport>,
}
