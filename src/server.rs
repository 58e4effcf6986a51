//! HTTP surface for the map and the filter controls.
//!
//! The map surface polls the derived view and posts site clicks; the filter
//! control surface posts toggles, period picks and building selections.
//! Both talk to the same [`Session`], which sits behind one mutex: each
//! request holds the lock for its whole transition, so transitions never
//! interleave.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (version and load state) |
//! | `GET`  | `/sites` | Derived view as GeoJSON, with `ETag` |
//! | `GET`  | `/options` | Option index per attribute |
//! | `GET`  | `/periods` | Period table and timeline extent |
//! | `GET`  | `/state` | Filters, selection and counts |
//! | `POST` | `/events` | Apply one control event |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "loading", "message": "dataset is still loading" } }
//! ```
//!
//! Error codes: `loading` (503), `no_data` (503), `bad_request` (400),
//! `internal` (500).

use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use site_atlas_core::controller::{ControlEvent, Controller, EventOutcome, ViewSnapshot};
use site_atlas_core::error::SessionError;
use site_atlas_core::options::OptionIndex;
use site_atlas_core::periods::{PeriodSegment, PeriodTable};
use site_atlas_core::session::Session;
use site_atlas_core::source::fetch_canonical;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::source_file::FileSource;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` against the controller under the session lock.
    fn with_controller<T>(&self, f: impl FnOnce(&mut Controller) -> T) -> Result<T, AppError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| internal("session lock poisoned"))?;
        let controller = session.controller_mut().map_err(AppError::from)?;
        Ok(f(controller))
    }
}

/// Starts the HTTP server.
///
/// The dataset is fetched on a background task; until it arrives, data
/// endpoints answer `503 loading`. If the fetch fails they answer
/// `503 no_data` for the rest of the process lifetime.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::new(Session::new());

    let loader_state = state.clone();
    let source = FileSource::new(config.data.path.clone());
    tokio::spawn(async move {
        let outcome = fetch_canonical(&source).await;
        match loader_state.session.lock() {
            Ok(mut session) => {
                if let Err(e) = session.complete(outcome) {
                    error!(error = %e, "could not record dataset load");
                }
            }
            Err(_) => error!("session lock poisoned before dataset load completed"),
        }
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "site atlas listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router. Exposed so tests can drive it without a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/sites", get(handle_sites))
        .route("/options", get(handle_options))
        .route("/periods", get(handle_periods))
        .route("/state", get(handle_state))
        .route("/events", post(handle_event))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let code = match err {
            SessionError::Loading => "loading",
            SessionError::NoData(_) => "no_data",
            SessionError::AlreadySettled => "internal",
        };
        let status = if code == "internal" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        AppError {
            status,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    /// `loading`, `ready` or `failed`.
    dataset: String,
}

async fn handle_health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let session = state
        .session
        .lock()
        .map_err(|_| internal("session lock poisoned"))?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset: session.status().to_string(),
    }))
}

// ============ GET /sites ============

/// Handler for `GET /sites`.
///
/// Returns the derived view as a GeoJSON `FeatureCollection`. The `ETag`
/// is the view's content fingerprint; a matching `If-None-Match` yields
/// `304 Not Modified` so the map can skip re-rendering.
async fn handle_sites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let view = state.with_controller(|c| c.render())?;
    let etag = format!("\"{}\"", view.fingerprint);
    let etag_value =
        HeaderValue::from_str(&etag).map_err(|e| internal(format!("bad etag: {}", e)))?;

    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|tag| tag.trim() == etag));
    if unchanged {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
    }

    Ok(([(header::ETAG, etag_value)], Json(view.document)).into_response())
}

// ============ GET /options ============

async fn handle_options(State(state): State<AppState>) -> Result<Json<OptionIndex>, AppError> {
    state.with_controller(|c| Json(c.options().clone()))
}

// ============ GET /periods ============

#[derive(Serialize)]
struct PeriodsResponse {
    segments: &'static [PeriodSegment],
    min_start: i32,
    max_end: i32,
    total_span: i32,
}

/// The period table is static, so this answers even while loading.
async fn handle_periods() -> Json<PeriodsResponse> {
    let table = PeriodTable::standard();
    Json(PeriodsResponse {
        segments: table.segments(),
        min_start: table.min_start(),
        max_end: table.max_end(),
        total_span: table.total_span(),
    })
}

// ============ GET /state ============

async fn handle_state(State(state): State<AppState>) -> Result<Json<ViewSnapshot>, AppError> {
    state.with_controller(|c| Json(c.snapshot()))
}

// ============ POST /events ============

#[derive(Serialize)]
struct EventResponse {
    outcome: EventOutcome,
    state: ViewSnapshot,
}

/// Handler for `POST /events`.
///
/// Applies one [`ControlEvent`]. Malformed events (including unknown
/// period ids) are `400`; events that refer to something not visible are
/// accepted with `outcome: "rejected"` and change nothing.
async fn handle_event(
    State(state): State<AppState>,
    payload: Result<Json<ControlEvent>, JsonRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let Json(event) = payload.map_err(|e| bad_request(e.body_text()))?;
    state.with_controller(|c| {
        let outcome = c.handle(event);
        Json(EventResponse {
            outcome,
            state: c.snapshot(),
        })
    })
}
