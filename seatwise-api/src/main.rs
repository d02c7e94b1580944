use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use seatwise_api::{app, AppState};
use seatwise_booking::{BookingCoordinator, FlightManager, HttpPaymentGateway};
use seatwise_store::{DbClient, PostgresBookingLedger, PostgresFlightStore, PostgresSeatStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "seatwise_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = seatwise_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Seatwise API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let flight_store = Arc::new(PostgresFlightStore::new(db.pool.clone()));
    let seat_store = Arc::new(PostgresSeatStore::new(db.pool.clone()));
    let ledger = Arc::new(PostgresBookingLedger::new(db.pool.clone()));
    let gateway = Arc::new(
        HttpPaymentGateway::new(
            config.payment.base_url.clone(),
            config.payment.api_key.clone(),
            Duration::from_secs(config.payment.timeout_seconds),
        )
        .expect("Failed to build payment client"),
    );

    let app_state = AppState {
        coordinator: Arc::new(BookingCoordinator::new(
            flight_store.clone(),
            seat_store.clone(),
            ledger,
            gateway,
        )),
        flights: Arc::new(FlightManager::new(flight_store, seat_store)),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
