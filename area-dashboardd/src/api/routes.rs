use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use shared::protocol::{API_PREFIX, GRID_ID, MENU_ID, REFRESH_LABEL_ID};
use crate::page::Page;
use crate::refresher::RefreshState;
use crate::render::{format::format_time_ago, hash};

#[derive(Clone)]
pub struct AppState {
    pub page: Page,
    pub state_rx: watch::Receiver<RefreshState>,
    pub refresh_interval_secs: u64,
    pub label_tick_secs: u64,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub last_update: String,
    pub last_update_ago: String,
    pub refresh_interval_secs: u64,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    api_prefix: &'a str,
    refresh_ms: u64,
    label_ms: u64,
    grid_hash: String,
    menu_id: &'a str,
    label_id: &'a str,
    grid_id: &'a str,
    refresh_label: String,
    grid: String,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/grid", get(get_grid))
        .route("/grid/hash", get(get_grid_hash))
        .route("/refresh-label", get(get_refresh_label))
        .route("/status", get(get_status));

    Router::new()
        .route("/", get(get_page))
        .nest(API_PREFIX, api)
        .with_state(state)
}

async fn get_page(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let grid = state.page.contents(GRID_ID);
    let page = PageTemplate {
        title: "Area Occupancy",
        api_prefix: API_PREFIX,
        refresh_ms: state.refresh_interval_secs * 1000,
        label_ms: state.label_tick_secs * 1000,
        grid_hash: hash::compute_hash(&grid),
        menu_id: MENU_ID,
        label_id: REFRESH_LABEL_ID,
        grid_id: GRID_ID,
        refresh_label: state.page.contents(REFRESH_LABEL_ID),
        grid,
    };

    page.render().map(Html).map_err(|e| {
        tracing::error!("Failed to render page: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn get_grid(State(state): State<AppState>) -> Html<String> {
    Html(state.page.contents(GRID_ID))
}

async fn get_grid_hash(State(state): State<AppState>) -> String {
    hash::compute_hash(&state.page.contents(GRID_ID))
}

async fn get_refresh_label(State(state): State<AppState>) -> String {
    state.page.contents(REFRESH_LABEL_ID)
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let last_update_at = state.state_rx.borrow().last_update_at;

    Json(StatusResponse {
        last_update: last_update_at.to_rfc3339(),
        last_update_ago: format_time_ago(last_update_at, Utc::now()),
        refresh_interval_secs: state.refresh_interval_secs,
    })
}
