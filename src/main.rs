use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use progressbar::{server, ServerConfig};

/// Serve PNG progress bars for campaign actions.
#[derive(Debug, Parser)]
#[command(name = "progressbar", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Directory holding `<family>/<file>.ttf` font files
    #[arg(long, default_value = "public/fonts")]
    font_dir: PathBuf,

    /// User agent sent to polling endpoints
    #[arg(long)]
    user_agent: Option<String>,

    /// Timeout for polling requests in milliseconds (default: none)
    #[arg(long)]
    fetch_timeout_ms: Option<u64>,

    /// Largest canvas in pixels that will be rendered
    #[arg(long, default_value_t = 4096 * 4096)]
    max_pixels: u64,

    /// Runtime worker threads (default: number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Log every request at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            bind: self.bind,
            font_dir: self.font_dir.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            fetch_timeout_ms: self.fetch_timeout_ms,
            max_pixels: self.max_pixels,
        }
    }
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let bind = config.bind;
    if !config.font_dir.is_dir() {
        log::warn!(
            "font directory {} does not exist; every render will fail",
            config.font_dir.display()
        );
    }

    let state = server::AppState::new(config)?;
    let app = server::router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    log::info!("listening on http://{}", bind);
    axum::serve(listener, app).await?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let workers = cli.workers.unwrap_or_else(num_cpus::get).max(1);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(serve(cli.server_config()))
}
