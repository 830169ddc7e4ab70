//! Progress bar images for campaign actions
//!
//! Serves a PNG progress bar for a campaign action. The bar's fill and caption
//! come from the action's live submission count, read from the platform's
//! `<action-url>/polling` endpoint on every request.
//!
//! # Pipeline
//!
//! - [`params`]: query string -> [`params::RenderConfig`] (only `url` can fail)
//! - [`fetch`]: submission count from the polling endpoint
//! - [`target`]: milestone goal and derived figures
//! - [`template`]: caption text
//! - [`rendering`]: layout -> SVG -> PNG
//! - [`server`]: the axum route tying it together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use progressbar::{server, ServerConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig {
//!     font_dir: "public/fonts".into(),
//!     ..Default::default()
//! };
//! let bind = config.bind;
//! let app = server::router(Arc::new(server::AppState::new(config)?));
//! let listener = tokio::net::TcpListener::bind(bind).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod fetch;
pub mod fonts;
pub mod params;
pub mod rendering;
pub mod server;
pub mod target;
pub mod template;

pub use params::RenderConfig;
pub use target::{calculate_target, SubmissionState};

/// Service configuration
///
/// Defaults suit a local run from the repository root:
/// - fonts are read from `public/fonts`
/// - upstream fetches have no timeout beyond reqwest's own behaviour
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Directory holding `<family-id>/<file>.ttf` font files
    pub font_dir: PathBuf,
    /// User agent sent to polling endpoints
    pub user_agent: String,
    /// Timeout for polling requests in milliseconds (`None` => no timeout)
    pub fetch_timeout_ms: Option<u64>,
    /// Largest canvas, in pixels, the rasterizer will allocate
    pub max_pixels: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            font_dir: PathBuf::from("public/fonts"),
            user_agent: format!("progressbar/{}", env!("CARGO_PKG_VERSION")),
            fetch_timeout_ms: None,
            max_pixels: 4096 * 4096,
        }
    }
}
