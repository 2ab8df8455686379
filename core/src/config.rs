use crate::{
    error::{DispatchError, SimResult},
    types::Tick,
};
use serde::{Deserialize, Serialize};

// ── Teams ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    /// Fixed base position. `None` draws a position from the roster stream
    /// inside `SimConfig::team_spawn`.
    #[serde(default)]
    pub position: Option<(f64, f64)>,
}

impl TeamConfig {
    pub fn at(name: &str, x: f64, y: f64) -> Self {
        Self { name: name.into(), position: Some((x, y)) }
    }

    pub fn spawned(name: &str) -> Self {
        Self { name: name.into(), position: None }
    }
}

// ── Incident catalog ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentTypeConfig {
    pub name: String,
    /// Ticks a team stays committed once dispatched.
    pub duration: Tick,
    pub resource_cost: u32,
}

impl IncidentTypeConfig {
    fn new(name: &str, duration: Tick, resource_cost: u32) -> Self {
        Self { name: name.into(), duration, resource_cost }
    }
}

/// Read-only incident type lookup. Ordered, not HashMap, so that random
/// draws by index are reproducible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentCatalog {
    types: Vec<IncidentTypeConfig>,
}

impl IncidentCatalog {
    pub fn new(types: Vec<IncidentTypeConfig>) -> Self {
        Self { types }
    }

    pub fn get(&self, name: &str) -> Option<&IncidentTypeConfig> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn require(&self, name: &str) -> SimResult<&IncidentTypeConfig> {
        self.get(name).ok_or_else(|| DispatchError::UnknownIncidentType {
            name: name.to_string(),
        })
    }

    pub fn by_index(&self, index: usize) -> Option<&IncidentTypeConfig> {
        self.types.get(index)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ── Region ─────────────────────────────────────────────────────────

/// Largest bound magnitude a domain may have: 2^53, so every whole
/// coordinate inside it is exact as an `f64`.
pub const MAX_DOMAIN_MAGNITUDE: f64 = 9_007_199_254_740_992.0;

/// Square coordinate domain `[min, max]` on both axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// Smallest and largest whole coordinates inside the domain. `None` when
    /// no whole number fits or a bound exceeds `MAX_DOMAIN_MAGNITUDE`.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        let (lo, hi) = (self.min.ceil(), self.max.floor());
        let in_range = |v: f64| v.is_finite() && v.abs() <= MAX_DOMAIN_MAGNITUDE;
        if !(in_range(lo) && in_range(hi)) || lo > hi {
            return None;
        }
        Some((lo as i64, hi as i64))
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let axis = self.min..=self.max;
        axis.contains(&x) && axis.contains(&y)
    }
}

/// How team selection measures distance to an incident.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceStrategy {
    /// Straight-line distance between points.
    #[default]
    Euclidean,
    /// Route cost over the region graph between the cells holding each point.
    GraphShortestPath,
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub teams: Vec<TeamConfig>,
    pub incident_types: Vec<IncidentTypeConfig>,
    /// Side length of the region grid.
    pub grid_size: u32,
    /// Inclusive edge weight bounds for the region grid.
    pub edge_weight_range: (u32, u32),
    /// Coordinate domain for submitted incidents.
    pub domain: Domain,
    /// Range that randomly spawned teams are placed in.
    pub team_spawn: Domain,
    pub log_capacity: usize,
    /// Random incidents submitted when the engine is built.
    pub initial_incidents: usize,
    #[serde(default)]
    pub distance_strategy: DistanceStrategy,
}

impl Default for SimConfig {
    /// Five-team wildfire response setup.
    fn default() -> Self {
        Self {
            teams: ["Alpha", "Beta", "Gamma", "Delta", "Echo"]
                .iter()
                .map(|n| TeamConfig::spawned(&format!("Team {n}")))
                .collect(),
            incident_types: default_incident_types(),
            grid_size: 10,
            edge_weight_range: (1, 5),
            domain: Domain { min: 0.0, max: 100.0 },
            team_spawn: Domain { min: 10.0, max: 90.0 },
            log_capacity: 100,
            initial_incidents: 5,
            distance_strategy: DistanceStrategy::Euclidean,
        }
    }
}

fn default_incident_types() -> Vec<IncidentTypeConfig> {
    vec![
        IncidentTypeConfig::new("Small Fire", 5, 1),
        IncidentTypeConfig::new("Medium Fire", 10, 2),
        IncidentTypeConfig::new("Large Fire", 15, 3),
        IncidentTypeConfig::new("Suspicious Smoke", 3, 1),
        IncidentTypeConfig::new("Controlled Burn", 8, 2),
    ]
}

impl SimConfig {
    /// Load from `{data_dir}/dispatch.json`.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/dispatch.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Two teams at fixed positions, no initial incidents, default catalog.
    pub fn default_test() -> Self {
        Self {
            teams: vec![
                TeamConfig::at("Team Alpha", 0.0, 0.0),
                TeamConfig::at("Team Beta", 100.0, 100.0),
            ],
            initial_incidents: 0,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> IncidentCatalog {
        IncidentCatalog::new(self.incident_types.clone())
    }

    /// Reject parameters the engine cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(DispatchError::InvalidConfig(msg));

        if self.incident_types.is_empty() {
            return invalid("incident catalog is empty".into());
        }
        for (i, t) in self.incident_types.iter().enumerate() {
            if t.name.trim().is_empty() {
                return invalid(format!("incident type #{i} has no name"));
            }
            if self.incident_types[..i].iter().any(|o| o.name == t.name) {
                return invalid(format!("duplicate incident type '{}'", t.name));
            }
        }
        for (i, team) in self.teams.iter().enumerate() {
            if team.name.trim().is_empty() {
                return invalid(format!("team #{i} has no name"));
            }
            if self.teams[..i].iter().any(|o| o.name == team.name) {
                return invalid(format!("duplicate team name '{}'", team.name));
            }
        }
        if self.grid_size == 0 {
            return invalid("grid_size must be > 0".into());
        }
        let (lo, hi) = self.edge_weight_range;
        if lo > hi {
            return invalid(format!("edge_weight_range {lo}..={hi} is empty"));
        }
        if self.log_capacity == 0 {
            return invalid("log_capacity must be > 0".into());
        }
        for (label, d) in [("domain", self.domain), ("team_spawn", self.team_spawn)] {
            if !(d.min.is_finite() && d.max.is_finite()) || d.min > d.max {
                return invalid(format!("{label} [{}, {}] is not a valid range", d.min, d.max));
            }
            if d.integer_bounds().is_none() {
                return invalid(format!(
                    "{label} [{}, {}] holds no whole coordinate within ±2^53",
                    d.min, d.max
                ));
            }
        }
        Ok(())
    }
}
