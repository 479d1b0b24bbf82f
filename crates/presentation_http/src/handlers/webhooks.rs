//! Inbound webhook handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::{error::ApiError, middleware::AuthenticatedUser, state::AppState};

/// `metadata.source` of action items produced from Affinity events
pub const AFFINITY_WEBHOOK_SOURCE: &str = "urn:mosaic-os:service:webhook:affinity";

/// Affinity webhook envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinityWebhookEvent {
    /// Event type, e.g. `reminder.created`
    #[serde(rename = "type")]
    pub event_type: String,
    /// The changed object
    #[serde(default)]
    pub body: Value,
}

impl AffinityWebhookEvent {
    fn is_reminder_event(&self) -> bool {
        self.event_type
            .split_once('.')
            .is_some_and(|(object, _)| object.eq_ignore_ascii_case("reminder"))
    }
}

/// Receive an Affinity webhook
///
/// Reminder events are mapped to an action item and returned. Every other
/// event type is acknowledged with `202 Accepted`.
///
/// POST /webhook/affinity
#[instrument(skip_all, fields(event_type = %event.event_type, caller = user.subject()))]
pub async fn affinity_webhook(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(event): Json<AffinityWebhookEvent>,
) -> Result<Response, ApiError> {
    if !event.is_reminder_event() {
        debug!("Acknowledging non-reminder event");
        let body = json!({ "accepted": true, "type": event.event_type });
        return Ok((StatusCode::ACCEPTED, Json(body)).into_response());
    }

    let reminder_id = event
        .body
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::BadRequest("reminder event without a numeric body.id".into()))?;

    let item = state
        .action_item_service
        .from_crm_reminder(reminder_id, &event.event_type)
        .await?;
    info!(reminder_id, "Reminder event mapped to action item");

    Ok(Json(item).into_response())
}
