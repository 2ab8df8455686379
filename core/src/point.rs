//! Spatial points: incident locations and team positions.

use crate::{
    error::{DispatchError, SimResult},
    types::PointId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Incident urgency. Higher is served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = DispatchError;

    fn try_from(value: u8) -> SimResult<Self> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            _ => Err(DispatchError::InvalidPriority { value }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// An immutable located point. Fields are private so a point can only be
/// minted through `PointIdGen`, which keeps ids unique per engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialPoint {
    id:         PointId,
    x:          f64,
    y:          f64,
    priority:   Priority,
    created_at: DateTime<Utc>,
}

impl SpatialPoint {
    pub fn id(&self) -> PointId { self.id }
    pub fn x(&self) -> f64 { self.x }
    pub fn y(&self) -> f64 { self.y }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    /// Straight-line distance to `other`.
    pub fn distance_to(&self, other: &SpatialPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl fmt::Display for SpatialPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) priority {}", self.x, self.y, self.priority)
    }
}

/// Monotonic point id issuer. One per engine.
#[derive(Debug, Default)]
pub struct PointIdGen {
    next: u64,
}

impl PointIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, x: f64, y: f64, priority: Priority) -> SpatialPoint {
        let id = PointId(self.next);
        self.next += 1;
        SpatialPoint {
            id,
            x,
            y,
            priority,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ids = PointIdGen::new();
        let a = ids.mint(0.0, 0.0, Priority::Low);
        let b = ids.mint(0.0, 0.0, Priority::Low);
        assert!(a.id() < b.id());
        assert_eq!(b.id(), PointId(1));
    }

    #[test]
    fn euclidean_distance() {
        let mut ids = PointIdGen::new();
        let a = ids.mint(0.0, 0.0, Priority::Low);
        let b = ids.mint(3.0, 4.0, Priority::High);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn priority_rejects_out_of_range() {
        assert_eq!(Priority::try_from(3).unwrap(), Priority::High);
        assert!(matches!(
            Priority::try_from(0),
            Err(DispatchError::InvalidPriority { value: 0 })
        ));
        assert!(Priority::try_from(4).is_err());
    }
}
