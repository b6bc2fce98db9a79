//! End-to-end session behaviour with test doubles for the resolver and the
//! position source.

use async_trait::async_trait;
use geolocator_core::config::StalePolicy;
use geolocator_geo::{Field, GeoPoint};
use geolocator_geocode::{GeocodeError, GeocodeResult, PlaceQuery, PlaceResolver, PlaceResponse};
use geolocator_session::{
    FixedPosition, PlaceDisplay, PositionError, PositionSource, Session, SessionController, Update,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers from a table, after a per-query delay, and records every query.
#[derive(Default)]
struct TableResolver {
    answers: HashMap<(String, String), (Duration, Option<&'static str>)>,
    seen: Mutex<Vec<PlaceQuery>>,
}

impl TableResolver {
    fn answer(mut self, lat: &str, lon: &str, delay_ms: u64, country: Option<&'static str>) -> Self {
        self.answers.insert(
            (lat.to_string(), lon.to_string()),
            (Duration::from_millis(delay_ms), country),
        );
        self
    }

    fn seen(&self) -> Vec<PlaceQuery> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceResolver for TableResolver {
    async fn resolve(&self, query: &PlaceQuery) -> GeocodeResult<PlaceResponse> {
        self.seen.lock().unwrap().push(query.clone());
        let key = (query.latitude.clone(), query.longitude.clone());
        let (delay, country) = self.answers.get(&key).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        Ok(PlaceResponse {
            country_name: country.map(str::to_string),
            ..Default::default()
        })
    }
}

struct FailingResolver;

#[async_trait]
impl PlaceResolver for FailingResolver {
    async fn resolve(&self, _query: &PlaceQuery) -> GeocodeResult<PlaceResponse> {
        Err(GeocodeError::ApiResponse {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    }
}

struct PanickingResolver;

#[async_trait]
impl PlaceResolver for PanickingResolver {
    async fn resolve(&self, query: &PlaceQuery) -> GeocodeResult<PlaceResponse> {
        panic!("resolver blew up on {}", query.latitude);
    }
}

struct PanickingPosition;

#[async_trait]
impl PositionSource for PanickingPosition {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn current_position(&self) -> Result<GeoPoint, PositionError> {
        panic!("position source blew up");
    }
}

struct DeniedPosition;

#[async_trait]
impl PositionSource for DeniedPosition {
    fn name(&self) -> &'static str {
        "denied"
    }

    async fn current_position(&self) -> Result<GeoPoint, PositionError> {
        Err(PositionError::Unavailable("permission denied".to_string()))
    }
}

async fn run_collecting<R: PlaceResolver + 'static>(
    controller: SessionController<R>,
) -> (Session, Vec<Update>) {
    let mut updates = Vec::new();
    let session = controller
        .run(|_, update| updates.push(update.clone()))
        .await;
    (session, updates)
}

#[tokio::test]
async fn position_yields_distances() {
    let resolver = Arc::new(TableResolver::default());
    let mut controller = SessionController::new(Session::default(), resolver);
    controller.locate(Arc::new(FixedPosition::new(10.543, 20.123).unwrap()));
    controller.handle().close();

    let (session, updates) = run_collecting(controller).await;

    assert_eq!(updates, vec![Update::Located]);
    assert!(!session.is_loading());
    assert_eq!(session.distances().unwrap().north_pole_km, 8835);
    assert!(session.distances().unwrap().moon_km > 350_000);
}

#[tokio::test]
async fn position_failure_stays_loading() {
    let resolver = Arc::new(TableResolver::default());
    let mut controller = SessionController::new(Session::default(), resolver);
    controller.locate(Arc::new(DeniedPosition));
    controller.handle().close();

    let (session, updates) = run_collecting(controller).await;

    assert_eq!(updates, vec![Update::PositionFailed]);
    assert!(session.is_loading());
    assert!(session.distances().is_none());
}

#[tokio::test]
async fn field_edits_resolve_the_place() {
    let resolver = Arc::new(TableResolver::default().answer("10", "20", 0, Some("Chad")));
    let controller = SessionController::new(Session::default(), Arc::clone(&resolver));
    let handle = controller.handle();

    handle.set_field(Field::Latitude, "10");
    handle.set_field(Field::Longitude, "20");
    handle.close();

    let (session, updates) = run_collecting(controller).await;

    assert_eq!(updates[0], Update::Input { ticket: None });
    assert!(matches!(updates[1], Update::Input { ticket: Some(_) }));
    assert_eq!(session.place(), &PlaceDisplay::Resolved(Some("Chad".to_string())));
    assert_eq!(resolver.seen(), vec![PlaceQuery::new("10", "20")]);
}

#[tokio::test]
async fn out_of_range_input_is_still_looked_up() {
    let resolver = Arc::new(TableResolver::default());
    let controller = SessionController::new(Session::default(), Arc::clone(&resolver));
    let handle = controller.handle();

    handle.set_manual("-100", "200");
    handle.close();

    let (session, _) = run_collecting(controller).await;

    assert_eq!(session.validation().errors().len(), 2);
    assert_eq!(resolver.seen(), vec![PlaceQuery::new("-100", "200")]);
    assert_eq!(session.place(), &PlaceDisplay::Resolved(None));
}

#[tokio::test]
async fn slow_older_response_wins_by_default() {
    let resolver = Arc::new(
        TableResolver::default()
            .answer("38", "35", 80, Some("Turkey"))
            .answer("10", "20", 0, Some("Chad")),
    );
    let controller = SessionController::new(Session::new(StalePolicy::LastWriteWins), resolver);
    let handle = controller.handle();

    handle.set_manual("38", "35");
    handle.set_manual("10", "20");
    handle.close();

    let (session, updates) = run_collecting(controller).await;

    assert_eq!(session.place().to_string(), "Turkey");
    let applied = updates
        .iter()
        .filter(|u| matches!(u, Update::Place { applied: true, .. }))
        .count();
    assert_eq!(applied, 2);
}

#[tokio::test]
async fn discard_stale_keeps_newest_input() {
    let resolver = Arc::new(
        TableResolver::default()
            .answer("38", "35", 80, Some("Turkey"))
            .answer("10", "20", 0, Some("Chad")),
    );
    let controller = SessionController::new(Session::new(StalePolicy::DiscardStale), resolver);
    let handle = controller.handle();

    handle.set_manual("38", "35");
    handle.set_manual("10", "20");
    handle.close();

    let (session, updates) = run_collecting(controller).await;

    assert_eq!(session.place().to_string(), "Chad");
    assert!(updates
        .iter()
        .any(|u| matches!(u, Update::Place { applied: false, .. })));
}

#[tokio::test]
async fn lookup_failure_keeps_previous_place() {
    let controller = SessionController::new(Session::default(), Arc::new(FailingResolver));
    let handle = controller.handle();

    handle.set_manual("10", "20");
    handle.close();

    let (session, updates) = run_collecting(controller).await;

    assert!(updates.iter().any(|u| matches!(u, Update::LookupFailed { .. })));
    assert_eq!(session.place(), &PlaceDisplay::Waiting);
    assert!(session.validation().is_valid());
}

#[tokio::test]
async fn panicking_lookup_is_reported_as_failure() {
    let controller = SessionController::new(Session::default(), Arc::new(PanickingResolver));
    let handle = controller.handle();

    handle.set_manual("10", "20");
    handle.close();

    let (session, updates) = tokio::time::timeout(Duration::from_secs(5), run_collecting(controller))
        .await
        .expect("loop should drain after a panicking lookup");

    assert!(updates.iter().any(|u| matches!(u, Update::LookupFailed { .. })));
    assert_eq!(session.place(), &PlaceDisplay::Waiting);
}

#[tokio::test]
async fn panicking_position_source_stays_loading() {
    let resolver = Arc::new(TableResolver::default());
    let mut controller = SessionController::new(Session::default(), resolver);
    controller.locate(Arc::new(PanickingPosition));
    controller.handle().close();

    let (session, updates) = tokio::time::timeout(Duration::from_secs(5), run_collecting(controller))
        .await
        .expect("loop should drain after a panicking position source");

    assert_eq!(updates, vec![Update::PositionFailed]);
    assert!(session.is_loading());
}

#[tokio::test]
async fn handle_reports_closed_loop() {
    let controller = SessionController::new(Session::default(), Arc::new(FailingResolver));
    let handle = controller.handle();
    handle.close();

    let _ = run_collecting(controller).await;

    assert!(!handle.set_manual("1", "2"));
}
