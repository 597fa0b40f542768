//! HTTP client for the Chronogolf private API.
//!
//! Session flow:
//!   1. `connect` fetches the club widget page and scrapes the CSRF token.
//!   2. It then logs in; the session cookie lives in the client's cookie jar.
//!   3. Before each call the cached session is checked and, once older than
//!      `login_every`, refreshed by logging in again.

use async_trait::async_trait;
use flog_core::config::GolferConfig;
use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::app_config::extract_app_config;
use crate::error::{GolferError, Result};
use crate::service::ReservationService;
use crate::types::{
    affiliation_type_ids, Affiliation, Course, Credentials, LoginRequest, Reservation,
    ReservationRequest, SessionInfo, TeeTime, DEFAULT_HOLES,
};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/65.0.3325.181 Safari/537.36";

/// Login session cached in memory.
struct CachedSession {
    info: SessionInfo,
    logged_in_at: Instant,
}

pub struct GolferClient {
    http: reqwest::Client,
    base_url: String,
    course_id: i64,
    credentials: Credentials,
    csrf_token: String,
    login_every: Duration,
    session: RwLock<Option<CachedSession>>,
}

impl GolferClient {
    /// Scrape the CSRF token and log in.
    pub async fn connect(cfg: &GolferConfig) -> Result<Self> {
        let credentials = match (cfg.username.as_deref(), cfg.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                }
            }
            _ => return Err(GolferError::Credentials),
        };

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        let base_url = cfg.base_url.trim_end_matches('/').to_string();

        let home = home_url(&base_url, cfg.course_id);
        debug!(url = %home, "GET");
        let resp = http
            .get(&home)
            .header(REFERER, &home)
            .header(ORIGIN, &base_url)
            .send()
            .await?;
        let html = read_body(resp, &[StatusCode::OK]).await?;
        let app_config = extract_app_config(&html)?;

        let client = Self {
            http,
            base_url,
            course_id: cfg.course_id,
            credentials,
            csrf_token: app_config.csrf_token.unwrap_or_default(),
            login_every: Duration::from_secs(cfg.login_every_hours * 60 * 60),
            session: RwLock::new(None),
        };

        let session = client.ensure_logged_in().await?;
        info!(user_id = session.id, course_id = client.course_id, "connected to reservation site");
        Ok(client)
    }

    /// Override how long a login is trusted before logging in again.
    pub fn with_login_every(mut self, login_every: Duration) -> Self {
        self.login_every = login_every;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(REFERER, home_url(&self.base_url, self.course_id))
            .header(ORIGIN, &self.base_url)
            .header("X-CSRF-Token", &self.csrf_token)
            .header(ACCEPT, "application/json")
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let resp = self.request(Method::GET, url).send().await?;
        let body = read_body(resp, &[StatusCode::OK]).await?;
        decode(url, &body)
    }

    /// POST a JSON body and return the raw response text.
    async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<String> {
        debug!(%url, "POST");
        let resp = self.request(Method::POST, url).json(body).send().await?;
        read_body(resp, &[StatusCode::OK, StatusCode::CREATED]).await
    }

    async fn login(&self) -> Result<SessionInfo> {
        let url = self.url("/private_api/sessions");
        let req = LoginRequest {
            session: self.credentials.clone(),
        };
        let body = self.post_json(&url, &req).await?;
        decode(&url, &body)
    }

    /// Return the cached session, logging in again once it is stale.
    async fn ensure_logged_in(&self) -> Result<SessionInfo> {
        // fast path: read lock
        {
            let cached = self.session.read().await;
            if let Some(ref c) = *cached {
                if c.logged_in_at.elapsed() < self.login_every {
                    return Ok(c.info.clone());
                }
            }
        }

        // slow path: write lock, re-check, then log in
        let mut cached = self.session.write().await;
        if let Some(ref c) = *cached {
            if c.logged_in_at.elapsed() < self.login_every {
                return Ok(c.info.clone());
            }
        }

        info!("logging in to reservation site");
        let info = self.login().await?;
        *cached = Some(CachedSession {
            info: info.clone(),
            logged_in_at: Instant::now(),
        });
        Ok(info)
    }
}

#[async_trait]
impl ReservationService for GolferClient {
    fn course_id(&self) -> i64 {
        self.course_id
    }

    async fn session(&self) -> Result<SessionInfo> {
        self.ensure_logged_in().await
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        self.ensure_logged_in().await?;
        let url = self.url(&format!("/private_api/clubs/{}/courses", self.course_id));
        self.get_json(&url).await
    }

    async fn tee_times(
        &self,
        af: &Affiliation,
        course: &Course,
        date: &str,
        players: u32,
    ) -> Result<Vec<TeeTime>> {
        self.ensure_logged_in().await?;
        let url = self.url(&format!(
            "/private_api/teetimes?affiliation_type_ids={}&date={}&course_id={}",
            affiliation_type_ids(af, players),
            date,
            course.id
        ));
        self.get_json(&url).await
    }

    async fn reservation_options(
        &self,
        af: &Affiliation,
        course: &Course,
        tt: &TeeTime,
        players: u32,
    ) -> Result<Vec<Reservation>> {
        self.ensure_logged_in().await?;
        let url = self.url(&format!(
            "/private_api/reservations/options?affiliation_type_ids={}&teetime_id={}&nb_holes={}",
            affiliation_type_ids(af, players),
            tt.id,
            course.holes.unwrap_or(DEFAULT_HOLES)
        ));
        self.get_json(&url).await
    }

    async fn reserve(&self, req: &ReservationRequest) -> Result<Reservation> {
        self.ensure_logged_in().await?;
        let url = self.url("/private_api/reservations");
        let body = self.post_json(&url, req).await?;
        // The site already accepted the booking; a body we cannot read must not
        // turn it into a failure that would be retried.
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable reservation response");
            Reservation::default()
        }))
    }

    async fn upcoming_reservations(&self) -> Result<Vec<Reservation>> {
        let session = self.ensure_logged_in().await?;
        let url = self.url(&format!(
            "/private_api/users/{id}/reservations?page=1&per_page=1000&status=upcoming&user_id={id}",
            id = session.id
        ));
        self.get_json(&url).await
    }
}

fn home_url(base_url: &str, course_id: i64) -> String {
    format!("{base_url}/en/club/{course_id}/widget?medium=widget&source=club")
}

/// Read the body, failing with [`GolferError::Api`] unless the status is accepted.
async fn read_body(resp: reqwest::Response, accepted: &[StatusCode]) -> Result<String> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp.text().await?;
    if !accepted.contains(&status) {
        warn!(status = status.as_u16(), %url, "reservation site error");
        return Err(GolferError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| GolferError::Parse(format!("{url}: {e}")))
}
