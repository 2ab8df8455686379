//! Response teams and their mission lifecycle.
//!
//! A team holds at most one mission. `assign_mission` and
//! `complete_mission` are the only mutators, and together they keep
//! `status == OnMission` exactly when `current_mission` is set.

use crate::{
    point::SpatialPoint,
    types::{TeamId, Tick},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Available,
    OnMission,
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("Available"),
            Self::OnMission => f.write_str("On Mission"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub point:         SpatialPoint,
    pub incident_type: String,
    pub started_at:    Tick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMission {
    pub mission:      Mission,
    pub completed_at: Tick,
}

impl CompletedMission {
    pub fn duration(&self) -> Tick {
        self.completed_at.saturating_sub(self.mission.started_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id:              TeamId,
    name:            String,
    /// Base position. Minted once so distance lookups key on a stable id.
    location:        SpatialPoint,
    status:          TeamStatus,
    current_mission: Option<Mission>,
    history:         Vec<CompletedMission>,
}

impl Team {
    pub fn new(id: TeamId, name: String, location: SpatialPoint) -> Self {
        Self {
            id,
            name,
            location,
            status: TeamStatus::Available,
            current_mission: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> TeamId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn location(&self) -> &SpatialPoint { &self.location }
    pub fn status(&self) -> TeamStatus { self.status }
    pub fn current_mission(&self) -> Option<&Mission> { self.current_mission.as_ref() }
    pub fn history(&self) -> &[CompletedMission] { &self.history }

    pub fn is_available(&self) -> bool {
        self.status == TeamStatus::Available
    }

    /// Overwrite the status without touching the mission.
    #[cfg(test)]
    pub(crate) fn force_status(&mut self, status: TeamStatus) {
        self.status = status;
    }

    /// Start a mission. Returns `false` and changes nothing if the team is
    /// already committed.
    pub fn assign_mission(&mut self, point: SpatialPoint, incident_type: String, now: Tick) -> bool {
        if self.current_mission.is_some() {
            return false;
        }
        self.current_mission = Some(Mission {
            point,
            incident_type,
            started_at: now,
        });
        self.status = TeamStatus::OnMission;
        true
    }

    /// Archive the current mission with `completed_at = now` and free the
    /// team. No-op when idle.
    pub fn complete_mission(&mut self, now: Tick) -> Option<&CompletedMission> {
        let mission = self.current_mission.take()?;
        self.status = TeamStatus::Available;
        self.history.push(CompletedMission {
            mission,
            completed_at: now,
        });
        self.history.last()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) - {}",
            self.name,
            self.location.x(),
            self.location.y(),
            self.status
        )
    }
}
