use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use tokio::time;
use tracing_subscriber::EnvFilter;

use spypoint::{Config, SpypointApi};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = match Config::load_from_file() {
        Ok(config) => config,
        Err(e) => {
            log::debug!("No config file ({:#}), reading environment", e);
            Config::from_env()?
        }
    };
    log::info!("Starting with config: {:?}", config);

    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let mut api = SpypointApi::new(client, &config);

    let mut poll_interval = time::interval(Duration::from_secs(config.poll_interval_secs));
    // One listener for the whole run, so a Ctrl-C during a fetch is not lost.
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                let fetched = tokio::select! {
                    fetched = api.get_cameras() => fetched,
                    _ = &mut shutdown => {
                        log::info!("Received shutdown signal");
                        return Ok(());
                    }
                };
                match fetched {
                    Ok(cameras) => {
                        for camera in &cameras {
                            tracing::info!(
                                id = %camera.id,
                                name = %camera.name,
                                model = %camera.model,
                                last_update = %camera.last_update_time,
                                signal = ?camera.signal,
                                temperature = ?camera.temperature,
                                battery = ?camera.battery,
                                memory = ?camera.memory,
                                notifications = ?camera.notifications,
                                "Camera status"
                            );
                        }
                    }
                    Err(e) if e.is_invalid_credentials() => {
                        log::error!("Login rejected, check SPYPOINT_USERNAME / SPYPOINT_PASSWORD");
                        return Err(e.into());
                    }
                    Err(e) => {
                        log::error!("Failed to fetch cameras: {}", e);
                    }
                }
            }
            _ = &mut shutdown => {
                log::info!("Received shutdown signal");
                return Ok(());
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").map(|format| format == "json").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}
