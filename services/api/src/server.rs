use crate::cli::ServeArgs;
use crate::infra::{load_guest_list, AppState, InMemoryRsvpStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wedding_rsvp::config::AppConfig;
use wedding_rsvp::error::AppError;
use wedding_rsvp::rsvp::{RouterSettings, RsvpService};
use wedding_rsvp::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let guest_list = Arc::new(load_guest_list(&config.rsvp)?);
    let store = Arc::new(InMemoryRsvpStore::default());
    let service = Arc::new(RsvpService::new(guest_list.clone(), store));
    let settings = RouterSettings::from(&config);

    let app = with_service_routes(service, settings)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        invited = guest_list.len(),
        "wedding rsvp service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
