use axum::{
    routing::{get, post},
    Router,
};
use flog_core::config::FlogConfig;
use flog_core::{BookingWindow, Clock};
use flog_golfer::ReservationService;
use flog_queue::PendingQueue;
use flog_scheduler::{DailySchedule, SweepTrigger};
use std::sync::Arc;

/// Shared state handed to every handler as `Arc<AppState>`.
pub struct AppState {
    pub config: FlogConfig,
    pub queue: Arc<PendingQueue>,
    pub service: Arc<dyn ReservationService>,
    pub window: BookingWindow,
    pub schedule: DailySchedule,
    pub clock: Arc<dyn Clock>,
    /// Wakes the sweep engine after a request is queued.
    pub trigger: SweepTrigger,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::status::index_handler))
        .route("/status", get(crate::http::status::status_handler))
        .route("/health", get(crate::http::health::health_handler))
        .route("/reserve", post(crate::http::reserve::reserve_handler))
        .route("/cancel", post(crate::http::reserve::cancel_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use flog_core::types::parse_day;
    use flog_core::{FixedClock, PendingRequest};
    use flog_golfer::{
        Affiliation, Course, GolferError, Reservation, ReservationRequest, SessionInfo, TeeTime,
    };
    use flog_queue::QueueStore;
    use flog_scheduler::{Booker, SweepEngine, Sweeper};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::watch;
    use tower::ServiceExt;

    /// Only the upcoming list matters to the handlers; booking always fails
    /// so queued requests stay put. Each attempt starts with `session`, so
    /// its call count tells whether a sweep tried to book.
    struct FakeSite {
        upcoming: Option<Vec<Reservation>>,
        sessions: AtomicUsize,
    }

    #[async_trait]
    impl ReservationService for FakeSite {
        fn course_id(&self) -> i64 {
            17078
        }
        async fn session(&self) -> flog_golfer::Result<SessionInfo> {
            self.sessions.fetch_add(1, Ordering::SeqCst);
            Err(GolferError::Api {
                status: 503,
                body: "down".into(),
            })
        }
        async fn courses(&self) -> flog_golfer::Result<Vec<Course>> {
            Ok(Vec::new())
        }
        async fn tee_times(
            &self,
            _: &Affiliation,
            _: &Course,
            _: &str,
            _: u32,
        ) -> flog_golfer::Result<Vec<TeeTime>> {
            Ok(Vec::new())
        }
        async fn reservation_options(
            &self,
            _: &Affiliation,
            _: &Course,
            _: &TeeTime,
            _: u32,
        ) -> flog_golfer::Result<Vec<Reservation>> {
            Ok(Vec::new())
        }
        async fn reserve(&self, _: &ReservationRequest) -> flog_golfer::Result<Reservation> {
            Ok(Reservation::default())
        }
        async fn upcoming_reservations(&self) -> flog_golfer::Result<Vec<Reservation>> {
            self.upcoming.clone().ok_or(GolferError::Api {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    fn upcoming() -> Vec<Reservation> {
        vec![Reservation {
            id: Some(1),
            state: Some("confirmed".into()),
            teetime: Some(TeeTime {
                id: 101,
                date: "2018-05-18".into(),
                start_time: "07:10".into(),
                ..TeeTime::default()
            }),
            ..Reservation::default()
        }]
    }

    struct Fixture {
        router: Router,
        queue: Arc<PendingQueue>,
        dir: tempfile::TempDir,
        site: Arc<FakeSite>,
        _stop: watch::Sender<bool>,
    }

    fn fixture(upcoming: Option<Vec<Reservation>>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let queue = Arc::new(
            PendingQueue::open(QueueStore::new(dir.path().join("flog.data"))).unwrap(),
        );
        let site = Arc::new(FakeSite {
            upcoming,
            sessions: AtomicUsize::new(0),
        });
        let service: Arc<dyn ReservationService> = site.clone();
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock::new(parse_day("2018-05-10T12:00").unwrap()));
        let window = BookingWindow::default();
        let schedule = DailySchedule::midnight();
        let sweeper = Arc::new(Sweeper::new(
            queue.clone(),
            Booker::new(service.clone()),
            window,
            clock.clone(),
        ));
        // the fixed clock is hours before midnight, so only a trigger sweeps
        let (engine, trigger) = SweepEngine::new(sweeper, schedule, clock.clone());
        let (stop, stop_rx) = watch::channel(false);
        tokio::spawn(engine.run(stop_rx));
        let state = Arc::new(AppState {
            config: FlogConfig::default(),
            queue: queue.clone(),
            service,
            window,
            schedule,
            clock,
            trigger,
        });
        Fixture {
            router: build_router(state),
            queue,
            dir,
            site,
            _stop: stop,
        }
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn reserve_queues_and_redirects() {
        let f = fixture(Some(Vec::new()));
        let resp = f
            .router
            .oneshot(form("/reserve", "date=2018-05-19T07%3A10&players=4"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
        assert_eq!(
            f.queue.snapshot().await,
            vec![PendingRequest::new("2018-05-19T07:10", 4)]
        );
        assert!(f.dir.path().join("flog.data").exists());
    }

    #[tokio::test]
    async fn reserve_requests_a_sweep() {
        let f = fixture(Some(Vec::new()));
        // already inside the booking window on the fixture's clock
        let resp = f
            .router
            .oneshot(form("/reserve", "date=2018-05-18T07%3A10&players=2"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        tokio::time::timeout(Duration::from_secs(5), async {
            while f.site.sessions.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("no sweep after reserve");
        // the attempt failed, so the request is still queued
        assert_eq!(f.queue.len().await, 1);
    }

    #[tokio::test]
    async fn oversized_party_is_400() {
        let f = fixture(Some(Vec::new()));
        for players in ["5", "4294967295"] {
            let body = format!("date=2018-05-19T07%3A10&players={players}");
            let resp = f.router.clone().oneshot(form("/reserve", &body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "players={players}");
            assert!(body_string(resp).await.contains("party size"));
        }
        assert!(f.queue.is_empty().await);
        assert!(!f.dir.path().join("flog.data").exists());
    }

    #[tokio::test]
    async fn duplicate_reserve_is_400() {
        let f = fixture(Some(Vec::new()));
        let body = "date=2018-05-19T07%3A10&players=4";
        let first = f.router.clone().oneshot(form("/reserve", body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = f.router.oneshot(form("/reserve", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(second).await.contains("already"));
        assert_eq!(f.queue.len().await, 1);
    }

    #[tokio::test]
    async fn bad_date_is_400() {
        let f = fixture(Some(Vec::new()));
        let resp = f
            .router
            .oneshot(form("/reserve", "date=next+tuesday&players=4"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(f.queue.is_empty().await);
    }

    #[tokio::test]
    async fn zero_players_is_400() {
        let f = fixture(Some(Vec::new()));
        for players in ["0", "-1", "many", ""] {
            let body = format!("date=2018-05-19T07%3A10&players={players}");
            let resp = f.router.clone().oneshot(form("/reserve", &body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "players={players:?}");
        }
        assert!(f.queue.is_empty().await);
    }

    #[tokio::test]
    async fn reserve_requires_post() {
        let f = fixture(Some(Vec::new()));
        let resp = f
            .router
            .oneshot(Request::get("/reserve").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn cancel_clears_everything() {
        let f = fixture(Some(Vec::new()));
        f.queue
            .add(PendingRequest::new("2018-05-19T07:10", 4))
            .await
            .unwrap();
        f.queue
            .add(PendingRequest::new("2018-05-20T07:10", 2))
            .await
            .unwrap();

        let resp = f.router.oneshot(form("/cancel", "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(f.queue.is_empty().await);

        let on_disk = std::fs::read_to_string(f.dir.path().join("flog.data")).unwrap();
        assert_eq!(on_disk, r#"{"DataFormatVersion":1,"Pending":[]}"#);
    }

    #[tokio::test]
    async fn status_json_lists_everything() {
        let f = fixture(Some(upcoming()));
        f.queue
            .add(PendingRequest::new("2018-05-19T07:10", 4))
            .await
            .unwrap();

        let resp = f
            .router
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["reservations"][0]["date"], "2018-05-18");
        assert_eq!(v["reservations"][0]["start_time"], "07:10");
        assert_eq!(v["pending"][0]["day"], "2018-05-19T07:10");
        assert_eq!(v["pending"][0]["players"], 4);
        // 2018-05-10 + 9 days at the default tee time
        assert_eq!(v["default_day"], "2018-05-19T07:10");
    }

    #[tokio::test]
    async fn index_renders_html() {
        let f = fixture(Some(upcoming()));
        let resp = f
            .router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = body_string(resp).await;
        assert!(html.contains("<td>2018-05-18</td><td>07:10</td>"));
        assert!(html.contains(r#"value="2018-05-19T07:10""#));
    }

    #[tokio::test]
    async fn index_reports_remote_failure_as_502() {
        let f = fixture(None);
        let resp = f
            .router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(body_string(resp).await.contains("boom"));
    }

    #[tokio::test]
    async fn health_reports_pending_and_next_sweep() {
        let f = fixture(None);
        f.queue
            .add(PendingRequest::new("2018-05-19T07:10", 4))
            .await
            .unwrap();
        let resp = f
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["pending"], 1);
        assert_eq!(v["next_sweep"], "2018-05-11T00:00");
    }
}
