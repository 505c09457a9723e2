use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::response::IntoResponse;
use cloud_auth_backend::{
    config::Config,
    db::file_settings_repository::FileSettingsRepository,
    logging::init_tracing,
    responses::JsonResponse,
    routes::{app_router, auth},
    services::oauth::cloud::client::CloudOAuthClient,
    state::AppState,
    utils::jwt::SessionKeys,
};
use reqwest::Client;
#[cfg(not(feature = "tls"))]
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::info;

#[cfg(feature = "tls")]
use axum_server::tls_rustls::RustlsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format)?;

    let session_keys =
        SessionKeys::from_secret(&config.session_secret).context("invalid SESSION_SECRET")?;

    let settings = FileSettingsRepository::open(&config.settings_path)
        .await
        .with_context(|| {
            format!(
                "failed to load settings from {}",
                config.settings_path.display()
            )
        })?;

    let cloud_oauth = CloudOAuthClient::new(Client::new(), config.auth_server_scheme.clone());

    // Stricter limiter for /api/auth/*
    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_auth_seconds)
            .burst_size(config.rate_limit_auth_burst)
            .use_headers()
            .error_handler(|_err| {
                JsonResponse::too_many_requests(
                    "Too many requests. Please wait a moment and try again.",
                )
                .into_response()
            })
            .finish()
            .context("invalid rate limiter configuration")?,
    );

    let governor_limiter = auth_governor_conf.limiter().clone();
    std::thread::spawn(move || {
        let interval = std::time::Duration::from_secs(60);
        loop {
            std::thread::sleep(interval);
            governor_limiter.retain_recent();
        }
    });

    let addr = config.bind_addr;
    info!(
        settings_path = %settings.path().display(),
        auth_server_scheme = %config.auth_server_scheme,
        "Configuration loaded"
    );

    let state = AppState {
        settings: Arc::new(settings),
        cloud_oauth: Arc::new(cloud_oauth),
        session_keys: Arc::new(session_keys),
        config: Arc::new(config),
    };

    let auth_routes = auth::router().layer(GovernorLayer {
        config: auth_governor_conf,
    });
    let app = app_router(state, auth_routes);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();

    #[cfg(feature = "tls")]
    {
        let tls_config = RustlsConfig::from_pem_file(
            std::env::var("TLS_CERT_LOCATION").context("TLS_CERT_LOCATION must be set")?,
            std::env::var("TLS_KEY_LOCATION").context("TLS_KEY_LOCATION must be set")?,
        )
        .await
        .context("failed to load TLS certs")?;

        info!(%addr, "Running with TLS");
        axum_server::bind_rustls(addr, tls_config)
            .serve(make_service)
            .await?;
    }

    #[cfg(not(feature = "tls"))]
    {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "Running without TLS");
        axum::serve(listener, make_service).await?;
    }

    Ok(())
}
