mod config;
mod error;
mod presenter;

use config::FrameConfig;
use error::AppError;
use frame_client::{BackendClient, ReqwestTransport, Transport};
use presenter::Slideshow;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let path = FrameConfig::locate(std::env::args().skip(1));
    let config = FrameConfig::load(path.as_deref())?;
    config.validate()?;
    if let Ok(effective) = config.to_toml() {
        log::debug!("Effective config:\n{}", effective);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, run_frame(config))
}

async fn run_frame(config: FrameConfig) -> Result<(), AppError> {
    let transport = ReqwestTransport::new(&config.transport_config())?;
    let client = BackendClient::new(config.client_config(), transport)?;

    let slideshow = Slideshow::attach(client.model());
    watch_state(&client);

    client.refresh();

    let Some(refresh_interval) = config.refresh_interval() else {
        client.settled().await;
        if let Some(record) = slideshow.current() {
            log::info!("Single fetch done, first image: {}", record.filename());
        }
        return Ok(());
    };

    run_slideshow(&client, &slideshow, refresh_interval, config.slide_interval()).await;
    Ok(())
}

/// Refresh and advance on their own timers until Ctrl-C
async fn run_slideshow<T: Transport + 'static>(
    client: &BackendClient<T>,
    slideshow: &Slideshow,
    refresh_interval: Duration,
    slide_interval: Duration,
) {
    let mut refresh_timer = tokio::time::interval(refresh_interval);
    let mut slide_timer = tokio::time::interval(slide_interval);
    // Both fire immediately; the initial refresh already went out
    refresh_timer.tick().await;
    slide_timer.tick().await;

    log::info!(
        "Refreshing every {}s, next image every {}s",
        refresh_interval.as_secs(),
        slide_interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = refresh_timer.tick() => client.refresh(),
            _ = slide_timer.tick() => {
                slideshow.advance();
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
    }

    log::info!(
        "Shutting down at image {}, waiting for any running fetch",
        slideshow.position() + 1
    );
    client.settled().await;
}

/// Log loading and error transitions the way a status bar would show them
fn watch_state<T: Transport + 'static>(client: &BackendClient<T>) {
    let handle = client.downgrade();
    client.on_is_loading_changed(move || {
        let Some(client) = handle.upgrade() else {
            return;
        };
        if client.is_loading() {
            log::debug!(
                "Loading {} images ordered by '{}'",
                client.count(),
                client.ordering()
            );
        }
    });

    let handle = client.downgrade();
    client.on_error_changed(move || {
        let Some(client) = handle.upgrade() else {
            return;
        };
        let error = client.error();
        if !error.is_empty() {
            log::error!("Backend error: {}", error);
        }
    });

    let handle = client.downgrade();
    client.on_total_count_changed(move || {
        if let Some(client) = handle.upgrade() {
            log::info!("Backend holds {} images", client.total_count());
        }
    });
}
