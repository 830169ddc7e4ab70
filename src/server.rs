//! HTTP surface: one image route plus a health check.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::fetch::PollingClient;
use crate::fonts::FontLibrary;
use crate::params::{self, QueryParams};
use crate::rendering::{self, raster, RenderedImage};
use crate::target::SubmissionState;
use crate::template;
use crate::{Error, Result, ServerConfig};

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub polling: PollingClient,
    pub fonts: FontLibrary,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let polling = PollingClient::new(&config)?;
        let fonts = FontLibrary::new(config.font_dir.clone());
        Ok(Self {
            config,
            polling,
            fonts,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(progress_png))
        .route("/progress.png", get(progress_png))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn progress_png(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    match render_progress(&state, query.as_deref().unwrap_or_default()).await {
        Ok(image) => (
            [(header::CONTENT_TYPE, "image/png")],
            image.png_data,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Run the full pipeline for one raw query string.
pub async fn render_progress(state: &AppState, query: &str) -> Result<RenderedImage> {
    let config = params::resolve(&QueryParams::parse(query))?;
    log::debug!(
        "rendering {} at {}x{}",
        config.requested_url,
        config.dimensions.width,
        config.dimensions.height
    );

    let total = state
        .polling
        .fetch_total(&config.action_url, &config.requested_url)
        .await?;
    let font_data = state.fonts.load(config.font.family, config.font.style).await?;
    let submissions = SubmissionState::from_total(total);
    let text = template::resolve_text(config.text.as_deref(), &submissions);
    let svg = rendering::compose_svg(&config, submissions.percentage, &text);

    let width = config.dimensions.width;
    let height = config.dimensions.height;
    let max_pixels = state.config.max_pixels;
    tokio::task::spawn_blocking(move || {
        raster::rasterize(&svg, width, height, Some(font_data), max_pixels)
    })
    .await
    .map_err(|e| Error::Render(format!("Render task failed: {}", e)))?
}
