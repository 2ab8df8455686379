//! The dispatch engine. Owns every piece of mutable simulation state.
//!
//! OPERATIONS (each runs to completion before the next):
//!   1. submit_incident:  mint a point, queue it by priority
//!   2. dispatch_next:    pop the top point, send the nearest free team
//!   3. advance_time:     tick the clock, complete every due mission
//!
//! RULES:
//!   - Time moves only through advance_time(). Nothing reads the wall clock
//!     to decide behaviour.
//!   - All randomness flows through the RngBank.
//!   - Every state change is emitted as a DispatchEvent and written to the
//!     action log; statistics are counted at the event site.
//!   - A point id maps to at most one active incident, and the team of an
//!     active incident is always OnMission.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    action_log::{ActionLog, ActionLogEntry},
    clock::SimClock,
    config::{Domain, IncidentCatalog, SimConfig},
    distance_cache::DistanceCache,
    error::{DispatchError, SimResult},
    event::{event_type_name, DispatchEvent},
    point::{PointIdGen, Priority, SpatialPoint},
    priority_queue::IncidentQueue,
    region_graph::RegionGraph,
    rng::{RngBank, StreamRng, StreamSlot},
    selection::{nearest_available, Region},
    snapshot::{DispatchStats, ReportSnapshot, TeamReport},
    team::Team,
    type_selector::{IncidentTypeSelector, UniformTypeSelector},
    types::{PointId, RunId, TeamId, Tick},
};

/// Default number of entries `history()` callers show.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// An incident currently being worked by a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveIncident {
    pub point:         SpatialPoint,
    pub team:          TeamId,
    pub incident_type: String,
    pub started_at:    Tick,
}

/// Result of a dispatch attempt. The two non-dispatch variants are expected
/// outcomes, not errors: the engine is unchanged (or restored) afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Dispatched {
        point_id:      PointId,
        team:          TeamId,
        team_name:     String,
        incident_type: String,
        distance:      f64,
    },
    /// The queue was empty.
    NoIncidentPending,
    /// Every team is busy; the point went back into the queue at its
    /// own priority.
    NoTeamAvailable { point_id: PointId },
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }
}

pub struct DispatchEngine {
    pub run_id:  RunId,
    pub clock:   SimClock,
    rng_bank:    RngBank,
    config:      SimConfig,
    catalog:     IncidentCatalog,
    ids:         PointIdGen,
    queue:       IncidentQueue<SpatialPoint>,
    teams:       Vec<Team>,
    /// Active incidents in dispatch order, keyed by dispatch sequence.
    active:      BTreeMap<u64, ActiveIncident>,
    /// Point id → dispatch sequence.
    active_by_point: HashMap<PointId, u64>,
    next_dispatch_seq: u64,
    region:      RegionGraph,
    cache:       DistanceCache,
    log:         ActionLog,
    stats:       DispatchStats,
    selector:    Box<dyn IncidentTypeSelector>,
    /// Every report handed out through `take_report`, oldest first.
    reports:     Vec<ReportSnapshot>,
}

impl DispatchEngine {
    /// Build an engine: validate the config, lay out the region grid,
    /// place the roster, and submit `initial_incidents` random incidents.
    pub fn new(run_id: RunId, seed: u64, config: SimConfig) -> SimResult<Self> {
        config.validate()?;

        let mut rng_bank = RngBank::new(seed);
        let (min_w, max_w) = config.edge_weight_range;
        let region = RegionGraph::grid(
            config.grid_size,
            min_w,
            max_w,
            rng_bank.stream(StreamSlot::Terrain),
        );

        let mut ids = PointIdGen::new();
        let mut teams = Vec::with_capacity(config.teams.len());
        for (i, team_cfg) in config.teams.iter().enumerate() {
            let (x, y) = match team_cfg.position {
                Some(pos) => pos,
                None => random_position(&config.team_spawn, rng_bank.stream(StreamSlot::Roster))?,
            };
            let location = ids.mint(x, y, Priority::Low);
            teams.push(Team::new(TeamId(i as u32), team_cfg.name.clone(), location));
        }

        let mut engine = Self {
            clock: SimClock::new(run_id.clone()),
            rng_bank,
            catalog: config.catalog(),
            log: ActionLog::with_capacity(config.log_capacity),
            ids,
            queue: IncidentQueue::new(),
            teams,
            active: BTreeMap::new(),
            active_by_point: HashMap::new(),
            next_dispatch_seq: 0,
            region,
            cache: DistanceCache::new(),
            stats: DispatchStats::default(),
            selector: Box::new(UniformTypeSelector),
            reports: Vec::new(),
            config,
            run_id,
        };

        for _ in 0..engine.config.initial_incidents {
            engine.submit_incident()?;
        }

        log::info!(
            "dispatch engine ready: run={} seed={seed} teams={} pending={}",
            engine.run_id,
            engine.teams.len(),
            engine.queue.len()
        );
        Ok(engine)
    }

    /// Engine over `SimConfig::default_test()`.
    pub fn build_test(run_id: String, seed: u64) -> SimResult<Self> {
        Self::new(run_id, seed, SimConfig::default_test())
    }

    /// Replace the incident type selector.
    pub fn set_type_selector(&mut self, selector: Box<dyn IncidentTypeSelector>) {
        log::debug!("incident type selector set to '{}'", selector.name());
        self.selector = selector;
    }

    // ── Intake ──────────────────────────────────────────────────

    /// Submit an incident at a random whole-number position inside the
    /// domain with a random priority.
    pub fn submit_incident(&mut self) -> SimResult<PointId> {
        let rng = self.rng_bank.stream(StreamSlot::Intake);
        let (x, y) = random_position(&self.config.domain, rng)?;
        let priority = rng.range_inclusive(1, 3) as u8;
        self.submit_incident_at(x, y, priority)
    }

    /// Submit an incident at `(x, y)`. Priority must be 1..=3.
    pub fn submit_incident_at(&mut self, x: f64, y: f64, priority: u8) -> SimResult<PointId> {
        let priority = Priority::try_from(priority)?;
        if !(x.is_finite() && y.is_finite()) {
            return Err(DispatchError::InvalidCoordinate { x, y });
        }

        let point = self.ids.mint(x, y, priority);
        let point_id = point.id();
        self.queue.insert(point, priority);
        self.stats.incidents_submitted += 1;

        log::debug!(
            "tick={} intake: {point_id} at ({x}, {y}) priority {priority}",
            self.clock.current_tick
        );
        self.record(DispatchEvent::IncidentSubmitted {
            tick: self.clock.current_tick,
            point_id,
            x,
            y,
            priority,
        });
        Ok(point_id)
    }

    // ── Dispatch ────────────────────────────────────────────────

    /// Dispatch the highest-priority pending incident, with its type picked
    /// by the engine's selector.
    pub fn dispatch_next(&mut self) -> SimResult<DispatchOutcome> {
        if self.queue.is_empty() {
            return Ok(DispatchOutcome::NoIncidentPending);
        }
        let incident_type = self
            .selector
            .select(&self.catalog, self.rng_bank.stream(StreamSlot::IncidentType));
        self.dispatch_next_as(&incident_type)
    }

    /// Dispatch the highest-priority pending incident as `incident_type`.
    /// Unknown types fail before anything leaves the queue.
    pub fn dispatch_next_as(&mut self, incident_type: &str) -> SimResult<DispatchOutcome> {
        let incident_type = self.catalog.require(incident_type)?.name.clone();

        let Some(point) = self.queue.remove_max() else {
            return Ok(DispatchOutcome::NoIncidentPending);
        };
        let now = self.clock.current_tick;
        let point_id = point.id();

        let region = Region {
            graph:  &self.region,
            domain: &self.config.domain,
        };
        let selection = nearest_available(
            &point,
            &self.teams,
            &mut self.cache,
            self.config.distance_strategy,
            &region,
        );

        let Some(selection) = selection else {
            let priority = point.priority();
            self.queue.insert(point, priority);
            self.stats.deferred_dispatches += 1;
            log::warn!("tick={now} dispatch: no team available for {point_id}, requeued");
            self.record(DispatchEvent::DispatchDeferred {
                tick: now,
                point_id,
                priority,
            });
            return Ok(DispatchOutcome::NoTeamAvailable { point_id });
        };

        debug_assert!(
            !self.active_by_point.contains_key(&point_id),
            "{point_id} already active"
        );

        let (x, y) = (point.x(), point.y());
        let team = &mut self.teams[selection.team.index()];
        if !team.assign_mission(point.clone(), incident_type.clone(), now) {
            let team_name = team.name().to_string();
            let priority = point.priority();
            self.queue.insert(point, priority);
            return Err(anyhow::anyhow!("selected team {team_name} is already on a mission").into());
        }
        let team_name = team.name().to_string();

        let seq = self.next_dispatch_seq;
        self.next_dispatch_seq += 1;
        self.active.insert(
            seq,
            ActiveIncident {
                point,
                team: selection.team,
                incident_type: incident_type.clone(),
                started_at: now,
            },
        );
        self.active_by_point.insert(point_id, seq);
        self.stats.dispatches += 1;

        log::info!(
            "tick={now} dispatch: {team_name} -> {incident_type} at ({x}, {y}), distance {:.2}",
            selection.distance
        );
        self.record(DispatchEvent::TeamDispatched {
            tick: now,
            point_id,
            team: team_name.clone(),
            incident_type: incident_type.clone(),
            x,
            y,
            distance: selection.distance,
        });

        Ok(DispatchOutcome::Dispatched {
            point_id,
            team: selection.team,
            team_name,
            incident_type,
            distance: selection.distance,
        })
    }

    // ── Time ────────────────────────────────────────────────────

    /// Advance one tick and complete every incident whose elapsed time has
    /// reached its type's duration. Completions run in dispatch order.
    pub fn advance_time(&mut self) -> SimResult<Vec<DispatchEvent>> {
        let now = self.clock.advance();

        let mut due = Vec::new();
        for (&seq, incident) in &self.active {
            let duration = self.catalog.require(&incident.incident_type)?.duration;
            if self.clock.elapsed_since(incident.started_at) >= duration {
                due.push(seq);
            }
        }

        let mut events = Vec::with_capacity(due.len());
        for seq in due {
            events.push(self.complete_incident(seq, now)?);
        }
        Ok(events)
    }

    /// Advance `n` ticks. Returns all completion events in order.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<Vec<DispatchEvent>> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.advance_time()?);
        }
        Ok(events)
    }

    fn complete_incident(&mut self, seq: u64, now: Tick) -> SimResult<DispatchEvent> {
        let incident = self
            .active
            .remove(&seq)
            .ok_or_else(|| anyhow::anyhow!("active incident #{seq} vanished mid-completion"))?;
        let point_id = incident.point.id();
        self.active_by_point.remove(&point_id);

        let team = &mut self.teams[incident.team.index()];
        team.complete_mission(now);
        let team_name = team.name().to_string();
        self.stats.completions += 1;

        log::info!(
            "tick={now} complete: {team_name} finished {} at ({}, {})",
            incident.incident_type,
            incident.point.x(),
            incident.point.y()
        );
        let event = DispatchEvent::MissionCompleted {
            tick: now,
            point_id,
            team: team_name,
            incident_type: incident.incident_type,
            x: incident.point.x(),
            y: incident.point.y(),
        };
        self.record(event.clone());
        Ok(event)
    }

    // ── Action log ──────────────────────────────────────────────

    /// Write a free-form operator note to the action log.
    pub fn record_action(&mut self, text: &str) {
        self.record(DispatchEvent::ActionRecorded {
            tick: self.clock.current_tick,
            text: text.to_string(),
        });
    }

    fn record(&mut self, event: DispatchEvent) {
        self.log
            .append(event.describe(), event.tick(), event_type_name(&event));
    }

    /// Newest-first action log entries whose text contains `filter`.
    pub fn history(&self, filter: Option<&str>, limit: usize) -> Vec<&ActionLogEntry> {
        self.log.recent(filter, limit)
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.log
    }

    // ── Read-only views ─────────────────────────────────────────

    pub fn sim_time(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn next_priority(&self) -> Option<Priority> {
        self.queue.peek_priority()
    }

    pub fn active_incident_count(&self) -> usize {
        self.active.len()
    }

    /// Active incidents in dispatch order.
    pub fn active_incidents(&self) -> impl Iterator<Item = &ActiveIncident> {
        self.active.values()
    }

    pub fn active_incident(&self, point_id: PointId) -> Option<&ActiveIncident> {
        self.active_by_point
            .get(&point_id)
            .and_then(|seq| self.active.get(seq))
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    pub fn team_by_name(&self, name: &str) -> SimResult<&Team> {
        self.teams
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| DispatchError::TeamNotFound { name: name.to_string() })
    }

    pub fn available_team_count(&self) -> usize {
        self.teams.iter().filter(|t| t.is_available()).count()
    }

    pub fn catalog(&self) -> &IncidentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn region_graph(&self) -> &RegionGraph {
        &self.region
    }

    pub fn distance_cache(&self) -> &DistanceCache {
        &self.cache
    }

    pub fn clear_distance_cache(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn team_reports(&self) -> Vec<TeamReport> {
        self.teams.iter().map(TeamReport::from).collect()
    }

    /// Build a report and keep it in the engine's report history.
    pub fn take_report(&mut self) -> ReportSnapshot {
        let report = self.report();
        self.reports.push(report.clone());
        report
    }

    /// Reports handed out by `take_report`, oldest first.
    pub fn reports(&self) -> &[ReportSnapshot] {
        &self.reports
    }

    pub fn report(&self) -> ReportSnapshot {
        ReportSnapshot {
            run_id:                    self.run_id.clone(),
            sim_time:                  self.clock.current_tick,
            total_incidents_submitted: self.stats.incidents_submitted,
            total_dispatches:          self.stats.dispatches,
            total_completions:         self.stats.completions,
            active_incident_count:     self.active.len(),
            pending_queue_size:        self.queue.len(),
            teams:                     self.team_reports(),
        }
    }
}

/// Whole-number position drawn uniformly from `domain` on both axes.
fn random_position(domain: &Domain, rng: &mut StreamRng) -> SimResult<(f64, f64)> {
    let (lo, hi) = domain.integer_bounds().ok_or_else(|| {
        DispatchError::InvalidConfig(format!(
            "domain [{}, {}] holds no whole coordinate",
            domain.min, domain.max
        ))
    })?;
    let x = rng.range_inclusive(lo, hi) as f64;
    let y = rng.range_inclusive(lo, hi) as f64;
    Ok((x, y))
}
