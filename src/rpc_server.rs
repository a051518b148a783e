//! CollectionBar RPC server: extension messages over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "message":{"type":"SYNC_COLLECTIONS"}}
//! Response: {"id":1, "response":{"success":true, "data":[...]}}
//!
//! Environment: `COLLECTIONBAR_DATA_DIR` (store location), `COLLECTIONBAR_BROWSER`
//! (`chromium` or `firefox` default folder layout), `RUST_LOG`.

use std::sync::Arc;
use std::time::Duration;

use collectionbar::app::{App, SYNC_INTERVAL, TOKEN_VALIDATION_INTERVAL};
use collectionbar::rpc_handler::handle_message;
use collectionbar::services::notifications::NotificationService;
use collectionbar::types::bookmark::BrowserLayout;

use log::{debug, error, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const BROWSER_ENV: &str = "COLLECTIONBAR_BROWSER";

fn browser_layout() -> BrowserLayout {
    match std::env::var(BROWSER_ENV) {
        Ok(value) => BrowserLayout::parse(&value).unwrap_or_else(|| {
            warn!("Unknown {} '{}', using chromium", BROWSER_ENV, value);
            BrowserLayout::Chromium
        }),
        Err(_) => BrowserLayout::Chromium,
    }
}

/// Runs `task` every `period`, skipping the immediate first tick.
fn spawn_periodic<F, Fut>(period: Duration, task: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            task().await;
        }
    });
}

/// Token checks and full syncs in the background, once initialized.
fn start_background_jobs(app: &Arc<App>) {
    let token_app = Arc::clone(app);
    spawn_periodic(TOKEN_VALIDATION_INTERVAL, move || {
        let app = Arc::clone(&token_app);
        async move {
            if let Err(e) = app.validate_token().await {
                error!("Failed to validate token: {}", e);
            }
        }
    });

    let sync_app = Arc::clone(app);
    spawn_periodic(SYNC_INTERVAL, move || {
        let app = Arc::clone(&sync_app);
        async move {
            match app.get_settings() {
                Ok(settings) if settings.is_initialized => {
                    if let Err(e) = app.sync_and_notify().await {
                        debug!("Periodic sync failed: {}", e);
                    }
                }
                Ok(_) => {}
                Err(e) => error!("Failed to read settings: {}", e),
            }
        }
    });
}

async fn write_line(stdout: &mut tokio::io::Stdout, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let app = Arc::new(App::open(None, browser_layout(), NotificationService::default())?);
    info!("CollectionBar RPC server started");

    if app.get_settings()?.is_initialized {
        if let Err(e) = app.sync_and_notify().await {
            debug!("Startup sync failed: {}", e);
        }
    }
    start_background_jobs(&app);

    let mut stdout = tokio::io::stdout();
    write_line(
        &mut stdout,
        &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}),
    )
    .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let reply = json!({"id": null, "response": {"success": false, "error": format!("parse error: {}", e)}});
                write_line(&mut stdout, &reply).await?;
                continue;
            }
        };

        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let message = request.get("message").cloned().unwrap_or(Value::Null);
        let response = handle_message(&app, &message).await;

        write_line(&mut stdout, &json!({"id": id, "response": response})).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
