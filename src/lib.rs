//! Pantry inventory tracker backend.
//!
//! One shared collection of pantry items lives in a remote keyed document
//! store; this service mirrors it locally, applies the add/update/remove
//! mutations, projects filtered views out of the mirror, and can ask an
//! external completion endpoint for recipe ideas based on what is in stock.
//!
//!
//!
//! # General Infrastructure
//! - All persistence is delegated to the remote store (one Redis hash,
//!   item name → JSON document); nothing is written locally
//! - Auth is a pass-through to a hosted identity provider and gates nothing:
//!   every caller sees and mutates the same collection
//! - Recipe suggestions are a side branch off the inventory; their failure
//!   never blocks inventory work
//!
//!
//!
//! # Known Race
//!
//! Every mutation is a read-then-write pair against one document, with no
//! compare-and-swap. Two callers hitting the same name concurrently race and
//! the last write wins. Accepted for a single-tenant shared-collection tool;
//! see the notes in [`inventory`].
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 cargo run
//! ```
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod inventory;
pub mod recipes;
pub mod routes;
pub mod state;
pub mod store;

use routes::{
    add_handler, list_handler, recipes_handler, remove_handler, signin_handler, signout_handler,
    signup_handler, update_handler,
};
use state::State;

/// The full route table over a wired state. Exposed on its own so tests can
/// mount it on an ephemeral port.
pub fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/inventory", get(list_handler).post(add_handler))
        .route(
            "/inventory/:name",
            put(update_handler).delete(remove_handler),
        )
        .route("/recipes", get(recipes_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/signin", post(signin_handler))
        .route("/auth/signout", post(signout_handler))
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
