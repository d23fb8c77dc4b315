//! Route planner façade: validation, route lookup, discovery, and
//! generation-tagged result publication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use sidetrip_core::{
    corridor_spine, flatten_route_path, sample_anchors, Candidate, NearbySearchProvider,
    RouteResponse, RoutingProvider, TravelMode,
};

use crate::discover::{discover, DiscoveryConfig};
use crate::error::PlanError;
use crate::event::{PlannerEvent, PlannerEventKind, PlannerPhase};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Externally visible state of the most recent run.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub generation: u64,
    pub phase: PlannerPhase,
    pub origin: String,
    pub destination: String,
    /// Accepted candidates in first-seen order. Rebuilt from empty on every
    /// new run.
    pub results: Vec<Candidate>,
    pub started_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Default for RunSnapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            phase: PlannerPhase::Idle,
            origin: String::new(),
            destination: String::new(),
            results: Vec::new(),
            started_at: None,
            error: None,
        }
    }
}

/// What a completed run handed back to its caller.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub generation: u64,
    pub route_distance_m: f64,
    pub anchor_count: usize,
    pub results: Vec<Candidate>,
}

/// End-to-end orchestrator for route-corridor POI discovery.
///
/// Every `plan` call starts a fresh generation. A newer call supersedes any
/// run still in flight: the old run's outstanding queries are left to
/// finish, but their results are discarded at the write boundary instead of
/// clobbering the newer run's state.
pub struct RoutePlanner<R, S> {
    routing: Arc<R>,
    search: Arc<S>,
    config: DiscoveryConfig,
    generation: AtomicU64,
    snapshot: Mutex<RunSnapshot>,
    events: broadcast::Sender<PlannerEvent>,
}

impl<R, S> RoutePlanner<R, S>
where
    R: RoutingProvider + 'static,
    S: NearbySearchProvider + 'static,
{
    pub fn new(routing: Arc<R>, search: Arc<S>, config: DiscoveryConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            routing,
            search,
            config,
            generation: AtomicU64::new(0),
            snapshot: Mutex::new(RunSnapshot::default()),
            events,
        }
    }

    /// Subscribe to run events. Only the active generation is published.
    pub fn subscribe(&self) -> broadcast::Receiver<PlannerEvent> {
        self.events.subscribe()
    }

    /// Current externally visible run state.
    pub fn snapshot(&self) -> RunSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True while a run is between validation and completion.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.snapshot().phase,
            PlannerPhase::Validating | PlannerPhase::RoutePending | PlannerPhase::Discovering
        )
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Mutate the snapshot, unless the run has been superseded.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut RunSnapshot)) {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(generation) {
            return;
        }
        f(&mut snapshot);
    }

    fn emit(&self, generation: u64, kind: PlannerEventKind) {
        if !self.is_current(generation) {
            return;
        }
        // Send fails only when no subscriber exists; discovery never blocks
        // on a lagging consumer either way.
        let _ = self.events.send(PlannerEvent { generation, kind });
    }

    fn set_phase(&self, generation: u64, phase: PlannerPhase) {
        self.apply(generation, |snapshot| snapshot.phase = phase);
        self.emit(generation, PlannerEventKind::PhaseChanged(phase));
    }

    fn fail(&self, generation: u64, error: &PlanError) {
        let message = error.to_string();
        self.apply(generation, |snapshot| {
            snapshot.phase = PlannerPhase::Failed;
            snapshot.error = Some(message.clone());
        });
        self.emit(generation, PlannerEventKind::RunFailed { message });
    }

    /// Run the full pipeline for one origin/destination pair.
    pub async fn plan(&self, origin: &str, destination: &str) -> Result<PlanSummary, PlanError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(generation, origin, destination, "route planning run started");

        // Fresh run: prior results (and the markers keyed off them) are
        // cleared before anything else happens.
        self.apply(generation, |snapshot| {
            *snapshot = RunSnapshot {
                generation,
                phase: PlannerPhase::Validating,
                origin: origin.to_string(),
                destination: destination.to_string(),
                results: Vec::new(),
                started_at: Some(Utc::now()),
                error: None,
            };
        });
        self.emit(
            generation,
            PlannerEventKind::RunStarted {
                origin: origin.to_string(),
                destination: destination.to_string(),
            },
        );

        if origin.trim().is_empty() || destination.trim().is_empty() {
            let error = PlanError::MissingEndpoints;
            self.fail(generation, &error);
            return Err(error);
        }

        self.set_phase(generation, PlannerPhase::RoutePending);
        let response = match self
            .routing
            .route(origin, destination, TravelMode::Walking)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let error = PlanError::Routing(e);
                self.fail(generation, &error);
                return Err(error);
            }
        };

        let RouteResponse { status, routes } = response;
        if !status.is_ok() {
            let error = PlanError::NoRoute { status };
            self.fail(generation, &error);
            return Err(error);
        }
        let Some(route) = routes.into_iter().next() else {
            let error = PlanError::NoRoute { status };
            self.fail(generation, &error);
            return Err(error);
        };

        self.set_phase(generation, PlannerPhase::Discovering);
        let total_distance_m = route.total_distance_m();
        let detailed = flatten_route_path(&route);
        let spine = corridor_spine(&route, &detailed);
        let anchors = sample_anchors(&detailed, total_distance_m);
        tracing::debug!(
            generation,
            path_points = detailed.len(),
            anchors = anchors.len(),
            "route received, starting discovery"
        );

        let results = discover(
            Arc::clone(&self.search),
            &anchors,
            spine,
            &self.config,
            |candidate| {
                self.apply(generation, |snapshot| {
                    snapshot.results.push(candidate.clone());
                });
                self.emit(generation, PlannerEventKind::PoiAccepted(candidate.clone()));
            },
        )
        .await;

        self.set_phase(generation, PlannerPhase::Done);
        self.emit(
            generation,
            PlannerEventKind::RunCompleted {
                total: results.len(),
            },
        );
        tracing::info!(generation, results = results.len(), "route planning run done");

        Ok(PlanSummary {
            generation,
            route_distance_m: total_distance_m,
            anchor_count: anchors.len(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use sidetrip_core::{
        LatLng, ProviderError, ProviderStatus, Route, RouteLeg, RouteStep, SearchResponse,
    };

    fn line_route(lat: f64, points: usize, distance_m: f64) -> Route {
        let path: Vec<LatLng> = (0..points)
            .map(|i| LatLng::new(lat, -74.0 + i as f64 * 0.001))
            .collect();
        Route {
            overview_path: path.clone(),
            legs: vec![RouteLeg {
                steps: vec![RouteStep { path }],
                distance_m,
            }],
        }
    }

    fn candidate_at(id: &str, location: LatLng) -> Candidate {
        Candidate {
            place_id: id.to_string(),
            name: format!("POI {id}"),
            vicinity: String::new(),
            rating: Some(4.0),
            rating_count: Some(10),
            icon: None,
            location: Some(location),
        }
    }

    /// Routing stub mapping origin text to a scripted response.
    struct ScriptedRouting {
        responses: HashMap<String, Result<RouteResponse, ()>>,
        calls: AtomicUsize,
    }

    impl ScriptedRouting {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_route(mut self, origin: &str, route: Route) -> Self {
            self.responses.insert(
                origin.to_string(),
                Ok(RouteResponse {
                    status: ProviderStatus::Ok,
                    routes: vec![route],
                }),
            );
            self
        }

        fn with_status(mut self, origin: &str, status: ProviderStatus) -> Self {
            self.responses.insert(
                origin.to_string(),
                Ok(RouteResponse {
                    status,
                    routes: Vec::new(),
                }),
            );
            self
        }
    }

    #[async_trait]
    impl RoutingProvider for ScriptedRouting {
        async fn route(
            &self,
            origin: &str,
            _destination: &str,
            _mode: TravelMode,
        ) -> Result<RouteResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(origin) {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(())) | None => {
                    Err(ProviderError::Transport("scripted failure".to_string()))
                }
            }
        }
    }

    /// Search stub keyed by query location. Queries at gated locations park
    /// on a semaphore so a run can be held in its discovery phase.
    struct ScriptedSearch {
        batches: HashMap<String, Vec<Candidate>>,
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
        gated_keys: std::collections::HashSet<String>,
    }

    impl ScriptedSearch {
        fn key(point: LatLng) -> String {
            format!("{:.6},{:.6}", point.lat, point.lng)
        }

        fn new() -> Self {
            Self {
                batches: HashMap::new(),
                calls: AtomicUsize::new(0),
                gate: None,
                gated_keys: std::collections::HashSet::new(),
            }
        }

        fn with_batch(mut self, at: LatLng, results: Vec<Candidate>) -> Self {
            self.batches.insert(Self::key(at), results);
            self
        }

        fn gated_at(mut self, gate: Arc<Semaphore>, locations: &[LatLng]) -> Self {
            self.gated_keys = locations.iter().map(|&p| Self::key(p)).collect();
            self.gate = Some(gate);
            self
        }
    }

    #[async_trait]
    impl NearbySearchProvider for ScriptedSearch {
        async fn nearby_search(
            &self,
            location: LatLng,
            _radius_m: f64,
            _category: &str,
        ) -> Result<SearchResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                if self.gated_keys.contains(&Self::key(location)) {
                    let permit = gate.acquire().await.expect("gate closed");
                    permit.forget();
                }
            }
            Ok(SearchResponse {
                status: ProviderStatus::Ok,
                results: self
                    .batches
                    .get(&Self::key(location))
                    .cloned()
                    .unwrap_or_default(),
            })
        }
    }

    fn planner(
        routing: ScriptedRouting,
        search: ScriptedSearch,
    ) -> RoutePlanner<ScriptedRouting, ScriptedSearch> {
        RoutePlanner::new(Arc::new(routing), Arc::new(search), DiscoveryConfig::default())
    }

    #[tokio::test]
    async fn empty_endpoints_fail_before_any_provider_call() {
        let planner = planner(ScriptedRouting::new(), ScriptedSearch::new());

        let result = planner.plan("", "Los Angeles").await;
        assert!(matches!(result, Err(PlanError::MissingEndpoints)));

        let snapshot = planner.snapshot();
        assert_eq!(snapshot.phase, PlannerPhase::Failed);
        assert!(snapshot.results.is_empty());
        assert_eq!(planner.routing.calls.load(Ordering::SeqCst), 0);
        assert_eq!(planner.search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn routing_failure_embeds_status_and_skips_discovery() {
        let routing =
            ScriptedRouting::new().with_status("Nowhere", ProviderStatus::Other("NOT_FOUND".into()));
        let planner = planner(routing, ScriptedSearch::new());

        let result = planner.plan("Nowhere", "Los Angeles").await;
        let error = result.expect_err("routing should fail");
        assert!(error.to_string().contains("NOT_FOUND"));

        let snapshot = planner.snapshot();
        assert_eq!(snapshot.phase, PlannerPhase::Failed);
        assert!(snapshot.results.is_empty());
        assert_eq!(planner.search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ok_status_with_zero_routes_is_a_routing_failure() {
        let routing = ScriptedRouting::new().with_status("Ghost", ProviderStatus::Ok);
        let planner = planner(routing, ScriptedSearch::new());

        let result = planner.plan("Ghost", "Los Angeles").await;
        assert!(matches!(result, Err(PlanError::NoRoute { .. })));
        assert_eq!(planner.search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fifty_km_route_yields_five_anchors_and_ten_pois() {
        // 12-point path, 50km total: 5 anchors at indices 0, 2, 5, 8, 11,
        // each returning a disjoint pair of on-path candidates.
        let route = line_route(40.0, 12, 50_000.0);
        let path = flatten_route_path(&route);

        let mut search = ScriptedSearch::new();
        for (n, idx) in [0usize, 2, 5, 8, 11].into_iter().enumerate() {
            let at = path[idx];
            search = search.with_batch(
                at,
                vec![
                    candidate_at(&format!("a{n}"), at),
                    candidate_at(&format!("b{n}"), at),
                ],
            );
        }

        let routing = ScriptedRouting::new().with_route("New York", route);
        let planner = planner(routing, search);
        let mut events = planner.subscribe();

        let summary = planner
            .plan("New York", "Los Angeles")
            .await
            .expect("plan should succeed");

        assert_eq!(summary.anchor_count, 5);
        assert_eq!(summary.results.len(), 10);
        assert_eq!(summary.route_distance_m, 50_000.0);

        let snapshot = planner.snapshot();
        assert_eq!(snapshot.phase, PlannerPhase::Done);
        assert_eq!(snapshot.results.len(), 10);

        // No duplicate identifiers survived the merge.
        let mut ids: Vec<&str> = snapshot.results.iter().map(|c| c.place_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);

        // Event stream: starts with RunStarted, ends with RunCompleted,
        // carries one PoiAccepted per result.
        let mut kinds = Vec::new();
        while let Ok(event) = events.try_recv() {
            assert_eq!(event.generation, summary.generation);
            kinds.push(event.kind);
        }
        assert!(matches!(kinds.first(), Some(PlannerEventKind::RunStarted { .. })));
        assert!(matches!(
            kinds.last(),
            Some(PlannerEventKind::RunCompleted { total: 10 })
        ));
        let accepted = kinds
            .iter()
            .filter(|k| matches!(k, PlannerEventKind::PoiAccepted(_)))
            .count();
        assert_eq!(accepted, 10);
    }

    #[tokio::test]
    async fn superseded_run_results_stay_invisible() {
        // G1's searches block on a gate; G2 completes while G1 is held,
        // then G1 is released and drains.
        let stale_route = line_route(40.0, 12, 0.0);
        let fresh_route = line_route(41.0, 12, 0.0);
        let stale_path = flatten_route_path(&stale_route);
        let fresh_path = flatten_route_path(&fresh_route);

        let gate = Arc::new(Semaphore::new(0));
        let stale_anchors = [stale_path[0], stale_path[5], stale_path[11]];
        let mut search = ScriptedSearch::new().gated_at(Arc::clone(&gate), &stale_anchors);
        for idx in [0usize, 5, 11] {
            search = search
                .with_batch(stale_path[idx], vec![candidate_at(&format!("stale{idx}"), stale_path[idx])])
                .with_batch(fresh_path[idx], vec![candidate_at(&format!("fresh{idx}"), fresh_path[idx])]);
        }
        let routing = ScriptedRouting::new()
            .with_route("Old Town", stale_route)
            .with_route("New Town", fresh_route);

        let planner = Arc::new(RoutePlanner::new(
            Arc::new(routing),
            Arc::new(search),
            DiscoveryConfig::default(),
        ));

        let stale_planner = Arc::clone(&planner);
        let stale_run =
            tokio::spawn(async move { stale_planner.plan("Old Town", "Someplace").await });

        // Give G1 time to issue its anchor queries and park on the gate.
        tokio::time::sleep(Duration::from_millis(50)).await;

        // G2's anchors are ungated; it runs to completion while G1 is held.
        let summary = planner
            .plan("New Town", "Someplace")
            .await
            .expect("fresh run should succeed");
        assert_eq!(summary.results.len(), 3);

        // Release G1 and let it drain.
        gate.add_permits(3);
        let stale_summary = stale_run
            .await
            .expect("stale task should not panic")
            .expect("stale run completes on its own");
        assert_eq!(stale_summary.generation, 1);

        // Externally visible state belongs to G2 alone.
        let snapshot = planner.snapshot();
        assert_eq!(snapshot.generation, summary.generation);
        assert_eq!(snapshot.phase, PlannerPhase::Done);
        let ids: Vec<&str> = snapshot.results.iter().map(|c| c.place_id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.starts_with("fresh")));
    }

    #[tokio::test]
    async fn new_run_clears_previous_results() {
        let route = line_route(40.0, 12, 0.0);
        let path = flatten_route_path(&route);
        let search =
            ScriptedSearch::new().with_batch(path[0], vec![candidate_at("only", path[0])]);
        let routing = ScriptedRouting::new().with_route("Home", route);
        let planner = planner(routing, search);

        planner.plan("Home", "Work").await.expect("first run");
        assert_eq!(planner.snapshot().results.len(), 1);

        // Second run fails validation; results must still have been reset.
        let _ = planner.plan("", "Work").await;
        let snapshot = planner.snapshot();
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.phase, PlannerPhase::Failed);
    }
}
