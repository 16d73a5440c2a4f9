use std::net::SocketAddr;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::config::ServerConfig;
use crate::data::registry::Registry;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the HTTP router around an already-loaded registry.
///
/// Anything outside `/data` falls through to `static_dir` when given.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut app: Router<Arc<AppState>> = Router::new()
        .route("/data", get(handlers::list_datasets))
        .route("/data/", get(handlers::list_datasets))
        .route("/data/:dataid/data", get(handlers::get_dataset))
        .route("/data/:dataid/axis", get(handlers::get_axis))
        .route("/data/:dataid/:spectrumid/data", get(handlers::get_spectrum));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive()).with_state(state)
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Bind the port, optionally open the browser, and serve until the process
/// is stopped. The registry must be fully loaded before this is called.
pub async fn run(registry: Registry, config: ServerConfig) -> anyhow::Result<()> {
    let static_dir = match config.static_dir.as_deref() {
        Some(dir) if dir.is_dir() => Some(dir),
        Some(dir) => {
            warn!(
                "Static directory {} not found, serving the data API only",
                dir.display()
            );
            None
        }
        None => None,
    };

    let app = router(Arc::new(AppState::new(registry)), static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding port {}", config.port))?;

    let url = format!("http://localhost:{}", config.port);
    if config.open_browser {
        open_browser(&url);
    }

    info!("Serving on {url}");
    axum::serve(listener, app).await?;

    Ok(())
}

fn browser_command(url: &str) -> Command {
    let mut cmd;
    if cfg!(target_os = "windows") {
        cmd = Command::new("cmd");
        cmd.args(["/c", "start"]);
    } else if cfg!(target_os = "macos") {
        cmd = Command::new("open");
    } else {
        cmd = Command::new("xdg-open");
    }
    cmd.arg(url);
    cmd
}

/// Best effort: a missing opener only costs a warning.
fn open_browser(url: &str) {
    match browser_command(url).spawn() {
        Ok(_) => info!("Opening browser at {url}"),
        Err(e) => warn!("Could not open browser at {url}: {e}"),
    }
}
