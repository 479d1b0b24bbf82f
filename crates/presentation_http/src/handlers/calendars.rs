//! Calendar push-notification handlers

use axum::{
    Json,
    extract::{Path, State},
};
use domain::CalendarWebhook;
use tracing::instrument;

use crate::{error::ApiError, middleware::AuthenticatedUser, state::AppState};

/// Open (or renew) the notification channel of a calendar
///
/// POST /v1/calendars/{calendar_id}/subscription
#[instrument(skip(state, user), fields(caller = user.subject()))]
pub async fn subscribe_calendar(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(calendar_id): Path<String>,
) -> Result<Json<CalendarWebhook>, ApiError> {
    let webhook = state.calendar_service.subscribe_channel(&calendar_id).await?;
    Ok(Json(webhook))
}
