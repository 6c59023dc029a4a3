use actix_web::{web, HttpServer};
use anyhow::Context;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use og_api::app::{create_app, AppState, DynOtpService};
use og_core::services::{Clock, OtpPolicy, OtpService, OtpStore, OtpSweeper, SystemClock};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables and configuration
    let config = og_infra::load_config();

    // Initialize logger
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.environment.default_log_level()),
    );

    info!("Starting OtpGate API Server ({})", config.environment);

    // Collaborators: user directory and delivery channel
    let infra = og_infra::initialize(&config)
        .await
        .context("initializing infrastructure")?;

    // OTP store and its background sweeper
    let policy = OtpPolicy::from(&config.otp);
    let sweep_interval = policy.sweep_interval;
    let store = Arc::new(OtpStore::new(policy));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sweeper = OtpSweeper::start(store.clone(), clock.clone(), sweep_interval);

    let otp_service: Arc<DynOtpService> = Arc::new(
        OtpService::new(infra.user_directory.clone(), infra.delivery_channel.clone(), store)
            .with_clock(clock),
    );
    let app_state = web::Data::new(AppState::new(otp_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || create_app(app_state.clone(), &cors_config))
        .client_request_timeout(Duration::from_secs(config.server.request_timeout));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("binding {}", bind_address))?
        .run()
        .await
        .context("running HTTP server")?;

    info!("Shutting down");
    sweeper.shutdown().await;
    #[cfg(feature = "mysql")]
    if let Some(database) = infra.database {
        database.close().await;
    }

    Ok(())
}
