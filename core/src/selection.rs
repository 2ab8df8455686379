//! Nearest-available-team policy.
//!
//! A plain left-to-right scan over the roster: the roster carries no
//! ordering to exploit. A candidate replaces the current best only when
//! strictly closer, so the first of several equally close teams wins.

use crate::{
    config::{DistanceStrategy, Domain},
    distance_cache::DistanceCache,
    point::SpatialPoint,
    region_graph::RegionGraph,
    team::Team,
    types::TeamId,
};

/// The winning team and its distance under the active strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub team:     TeamId,
    pub distance: f64,
}

/// Everything a distance strategy may need besides the two points.
pub struct Region<'a> {
    pub graph:  &'a RegionGraph,
    pub domain: &'a Domain,
}

/// Pick the available team closest to `incident`.
///
/// Returns `None` when no team is available, or when every available team
/// is unreachable under the graph strategy.
pub fn nearest_available(
    incident: &SpatialPoint,
    teams: &[Team],
    cache: &mut DistanceCache,
    strategy: DistanceStrategy,
    region: &Region<'_>,
) -> Option<Selection> {
    let mut best: Option<Selection> = None;

    for team in teams.iter().filter(|t| t.is_available()) {
        let distance = measure(team.location(), incident, cache, strategy, region);
        if distance < best.map_or(f64::INFINITY, |b| b.distance) {
            best = Some(Selection {
                team: team.id(),
                distance,
            });
        }
    }
    best
}

fn measure(
    from: &SpatialPoint,
    to: &SpatialPoint,
    cache: &mut DistanceCache,
    strategy: DistanceStrategy,
    region: &Region<'_>,
) -> f64 {
    match strategy {
        DistanceStrategy::Euclidean => cache.distance_between(from, to),
        DistanceStrategy::GraphShortestPath => {
            let a = region.graph.cell_for(from.x(), from.y(), region.domain);
            let b = region.graph.cell_for(to.x(), to.y(), region.domain);
            cache
                .route_cost_between(region.graph, a, b)
                .map_or(f64::INFINITY, |cost| cost as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{PointIdGen, Priority};
    use crate::region_graph::Cell;

    fn roster(ids: &mut PointIdGen, positions: &[(f64, f64)]) -> Vec<Team> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                Team::new(TeamId(i as u32), format!("Team {i}"), ids.mint(x, y, Priority::Low))
            })
            .collect()
    }

    fn region() -> (RegionGraph, Domain) {
        (RegionGraph::new(10), Domain { min: 0.0, max: 100.0 })
    }

    #[test]
    fn picks_closest_available() {
        let mut ids = PointIdGen::new();
        let teams = roster(&mut ids, &[(0.0, 0.0), (100.0, 100.0)]);
        let incident = ids.mint(60.0, 70.0, Priority::High);
        let (graph, domain) = region();
        let mut cache = DistanceCache::new();

        let pick = nearest_available(
            &incident,
            &teams,
            &mut cache,
            DistanceStrategy::Euclidean,
            &Region { graph: &graph, domain: &domain },
        )
        .unwrap();
        assert_eq!(pick.team, TeamId(1));
        assert_eq!(pick.distance, 50.0);
    }

    #[test]
    fn skips_busy_teams_and_reports_none_when_all_busy() {
        let mut ids = PointIdGen::new();
        let mut teams = roster(&mut ids, &[(0.0, 0.0), (50.0, 50.0)]);
        let incident = ids.mint(1.0, 1.0, Priority::High);
        let (graph, domain) = region();
        let region = Region { graph: &graph, domain: &domain };
        let mut cache = DistanceCache::new();

        let busy = ids.mint(9.0, 9.0, Priority::Low);
        teams[0].assign_mission(busy.clone(), "Small Fire".into(), 0);
        let pick = nearest_available(&incident, &teams, &mut cache, DistanceStrategy::Euclidean, &region);
        assert_eq!(pick.map(|p| p.team), Some(TeamId(1)));

        teams[1].assign_mission(busy, "Small Fire".into(), 0);
        let pick = nearest_available(&incident, &teams, &mut cache, DistanceStrategy::Euclidean, &region);
        assert!(pick.is_none());
    }

    #[test]
    fn ties_go_to_first_in_roster() {
        let mut ids = PointIdGen::new();
        let teams = roster(&mut ids, &[(0.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
        let incident = ids.mint(10.0, 10.0, Priority::Medium);
        let (graph, domain) = region();
        let mut cache = DistanceCache::new();

        let pick = nearest_available(
            &incident,
            &teams,
            &mut cache,
            DistanceStrategy::Euclidean,
            &Region { graph: &graph, domain: &domain },
        )
        .unwrap();
        assert_eq!(pick.team, TeamId(0));
    }

    #[test]
    fn graph_strategy_uses_route_cost() {
        // Straight-line, team 0 is closer; by road, team 1 is.
        let mut graph = RegionGraph::new(10);
        graph.add_edge(Cell::new(0, 0), Cell::new(1, 0), 50);
        graph.add_edge(Cell::new(1, 0), Cell::new(3, 0), 1);
        let domain = Domain { min: 0.0, max: 100.0 };

        let mut ids = PointIdGen::new();
        let teams = roster(&mut ids, &[(5.0, 5.0), (35.0, 5.0)]);
        let incident = ids.mint(15.0, 5.0, Priority::High);
        let mut cache = DistanceCache::new();

        let pick = nearest_available(
            &incident,
            &teams,
            &mut cache,
            DistanceStrategy::GraphShortestPath,
            &Region { graph: &graph, domain: &domain },
        )
        .unwrap();
        assert_eq!(pick.team, TeamId(1));
        assert_eq!(pick.distance, 1.0);
    }
}
