//! HTTP input layer. Quantity coercion lives here: whatever the original
//! input widgets produced (missing, non-numeric, non-positive) reaches the
//! tracker as a positive integer, defaulting to 1.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::{
    error::AppError,
    filter::{FilterState, filter_items},
    identity::Session,
    inventory::InventoryItem,
    state::State as AppState,
};

#[derive(Deserialize)]
pub struct AddItemRequest {
    name: String,
    #[serde(default)]
    quantity: Option<Value>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    vendor: String,
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    quantity: Option<Value>,
}

#[derive(Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct TokenRequest {
    token: String,
}

fn coerce_quantity(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.floor() as i64))
        }
        _ => None,
    };

    // Anything that does not land on a positive quantity that fits the
    // document field gets the default.
    match parsed {
        Some(q) if q > 0 => u32::try_from(q).unwrap_or(1),
        _ => 1,
    }
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FilterState>,
) -> Json<Vec<InventoryItem>> {
    state.tracker.refresh().await;
    let items = state.tracker.items().await;

    Json(filter_items(&items, &filter))
}

pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddItemRequest>,
) -> Result<StatusCode, AppError> {
    if payload.name.is_empty() {
        return Err(AppError::MalformedPayload);
    }
    let quantity = coerce_quantity(payload.quantity.as_ref());

    state
        .tracker
        .add_item(&payload.name, quantity, &payload.description, &payload.vendor)
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<StatusCode, AppError> {
    let quantity = coerce_quantity(payload.quantity.as_ref());

    state.tracker.update_item(&name, quantity).await?;

    Ok(StatusCode::OK)
}

pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.tracker.remove_item(&name).await?;

    Ok(StatusCode::OK)
}

/// Suggestion text for the current inventory, or the empty string when the
/// suggester is unconfigured or the call fails. Never an error response:
/// the panel is simply left empty.
pub async fn recipes_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(suggester) = &state.suggester else {
        warn!("Recipe suggester not configured, returning empty suggestions");
        return String::new();
    };

    let items = state.tracker.items().await;
    match suggester.suggest(&items).await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to fetch recipe suggestions: {e}");
            String::new()
        }
    }
}

pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<Session>, AppError> {
    let identity = state.identity.as_ref().ok_or(AppError::IdentityUnavailable)?;

    let session = identity.sign_up(&payload.email, &payload.password).await?;

    Ok(Json(session))
}

pub async fn signin_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<Session>, AppError> {
    let identity = state.identity.as_ref().ok_or(AppError::IdentityUnavailable)?;

    let session = identity.sign_in(&payload.email, &payload.password).await?;

    Ok(Json(session))
}

pub async fn signout_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TokenRequest>,
) -> Result<StatusCode, AppError> {
    let identity = state.identity.as_ref().ok_or(AppError::IdentityUnavailable)?;

    identity.sign_out(&payload.token).await?;

    Ok(StatusCode::OK)
}
