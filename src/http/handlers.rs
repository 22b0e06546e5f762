//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer or the repository for the actual work.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Weekday;

use super::dto::{
    AreaOfService, AutoFillRequest, BuildScheduleRequest, Event, GenerateRotationRequest,
    GenerateRotationResponse, HealthResponse, NotifierSettings, NotifyResponse, RotationResponse,
    SaveScheduleRequest, SavedSchedule, ScheduleListResponse, SlotsResponse, Team, UserPermission,
    Volunteer,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::YearMonth;
use crate::notify::{
    notify_volunteers, Channel, MailRelayTransport, MessageTransport, TwilioWhatsAppTransport,
};
use crate::services;
use crate::services::RotationOutcome;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_period(year: i32, month: u32) -> Result<YearMonth, AppError> {
    YearMonth::new(year, month)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid period {year}-{month}")))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the storage backend is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Volunteers
// =============================================================================

/// GET /v1/volunteers
pub async fn list_volunteers(State(state): State<AppState>) -> HandlerResult<Vec<Volunteer>> {
    Ok(Json(state.repository.list_volunteers().await?))
}

/// POST /v1/volunteers
pub async fn create_volunteer(
    State(state): State<AppState>,
    Json(volunteer): Json<Volunteer>,
) -> Result<(StatusCode, Json<Volunteer>), AppError> {
    let stored = state.repository.insert_volunteer(volunteer).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /v1/volunteers/{id}
pub async fn update_volunteer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut volunteer): Json<Volunteer>,
) -> HandlerResult<Volunteer> {
    volunteer.id = id;
    Ok(Json(state.repository.update_volunteer(volunteer).await?))
}

/// DELETE /v1/volunteers/{id}
pub async fn delete_volunteer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_volunteer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Events
// =============================================================================

/// GET /v1/events
pub async fn list_events(State(state): State<AppState>) -> HandlerResult<Vec<Event>> {
    Ok(Json(state.repository.list_events().await?))
}

/// POST /v1/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(event): Json<Event>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let stored = state.repository.insert_event(event).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /v1/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut event): Json<Event>,
) -> HandlerResult<Event> {
    event.id = id;
    Ok(Json(state.repository.update_event(event).await?))
}

/// DELETE /v1/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Teams
// =============================================================================

/// GET /v1/teams
pub async fn list_teams(State(state): State<AppState>) -> HandlerResult<Vec<Team>> {
    Ok(Json(state.repository.list_teams().await?))
}

/// POST /v1/teams
pub async fn create_team(
    State(state): State<AppState>,
    Json(team): Json<Team>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    let stored = state.repository.insert_team(team).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /v1/teams/{id}
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut team): Json<Team>,
) -> HandlerResult<Team> {
    team.id = id;
    Ok(Json(state.repository.update_team(team).await?))
}

/// DELETE /v1/teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_team(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Areas of Service
// =============================================================================

/// GET /v1/areas
pub async fn list_areas(State(state): State<AppState>) -> HandlerResult<Vec<AreaOfService>> {
    Ok(Json(state.repository.list_areas().await?))
}

/// POST /v1/areas
pub async fn create_area(
    State(state): State<AppState>,
    Json(area): Json<AreaOfService>,
) -> Result<(StatusCode, Json<AreaOfService>), AppError> {
    let stored = state.repository.insert_area(area).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /v1/areas/{id}
pub async fn update_area(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut area): Json<AreaOfService>,
) -> HandlerResult<AreaOfService> {
    area.id = id;
    Ok(Json(state.repository.update_area(area).await?))
}

/// DELETE /v1/areas/{id}
///
/// Deletes the area and strips it from volunteer qualifications.
pub async fn delete_area(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services::remove_area(state.repository.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Team Rotation
// =============================================================================

/// GET /v1/rotations/{year}/{month}
pub async fn get_rotation(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> HandlerResult<RotationResponse> {
    let period = parse_period(year, month)?;
    let weeks = state.repository.list_rotation(period).await?;
    let total = weeks.len();
    Ok(Json(RotationResponse { weeks, total }))
}

/// POST /v1/rotations/{year}/{month}
///
/// Regenerate the month's rotation, replacing whatever was stored.
pub async fn generate_rotation(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(request): Json<GenerateRotationRequest>,
) -> HandlerResult<GenerateRotationResponse> {
    let period = parse_period(year, month)?;
    let week_start = match request.week_start.as_deref() {
        Some(day) => Weekday::from_str(day)
            .map_err(|_| AppError::BadRequest(format!("Invalid week start day: {day}")))?,
        None => Weekday::Sun,
    };

    let outcome = services::regenerate_rotation(
        state.repository.as_ref(),
        period,
        &request.start_team,
        week_start,
    )
    .await?;

    let response = match outcome {
        RotationOutcome::Replaced(weeks) => GenerateRotationResponse {
            outcome: "replaced".to_string(),
            weeks,
        },
        RotationOutcome::NoTeamsConfigured => GenerateRotationResponse {
            outcome: "no-teams-configured".to_string(),
            weeks: 0,
        },
    };
    Ok(Json(response))
}

// =============================================================================
// Schedules
// =============================================================================

/// POST /v1/schedules/build
///
/// Expand the period's events into empty slots.
pub async fn build_schedule(
    State(state): State<AppState>,
    Json(request): Json<BuildScheduleRequest>,
) -> HandlerResult<SlotsResponse> {
    let period = parse_period(request.year, request.month)?;
    let slots = services::build_slots(state.repository.as_ref(), period, &request.area).await?;
    let total = slots.len();
    Ok(Json(SlotsResponse { slots, total }))
}

/// POST /v1/schedules/autofill
///
/// Run the greedy assigner over the posted slots. Pure: nothing is stored.
pub async fn auto_fill_schedule(
    State(state): State<AppState>,
    Json(request): Json<AutoFillRequest>,
) -> HandlerResult<SlotsResponse> {
    let slots = services::auto_fill_slots(state.repository.as_ref(), &request.slots).await?;
    let total = slots.len();
    Ok(Json(SlotsResponse { slots, total }))
}

/// POST /v1/schedules
///
/// Save a generation run, merging into the period's existing schedule.
pub async fn save_schedule(
    State(state): State<AppState>,
    Json(request): Json<SaveScheduleRequest>,
) -> Result<(StatusCode, Json<SavedSchedule>), AppError> {
    let period = parse_period(request.year, request.month)?;
    let stored = services::save_schedule(
        state.repository.as_ref(),
        period,
        request.area,
        &request.slots,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/schedules
pub async fn list_schedules(State(state): State<AppState>) -> HandlerResult<ScheduleListResponse> {
    let schedules = state.repository.list_schedules().await?;
    let total = schedules.len();
    Ok(Json(ScheduleListResponse { schedules, total }))
}

/// GET /v1/schedules/{year}/{month}
pub async fn get_schedule_by_period(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> HandlerResult<SavedSchedule> {
    let period = parse_period(year, month)?;
    match state.repository.find_schedule(period).await? {
        Some(schedule) => Ok(Json(schedule)),
        None => Err(AppError::NotFound(format!(
            "No schedule saved for {year}-{month:02}"
        ))),
    }
}

/// DELETE /v1/schedules/{id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_schedule(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/schedules/{id}/notify/{channel}
///
/// Send the schedule to every volunteer with assignments in it. A
/// misconfigured channel reports `success: false` in the body rather than
/// an HTTP error, so callers can distinguish it from a bad request.
pub async fn notify_schedule(
    State(state): State<AppState>,
    Path((id, channel)): Path<(String, String)>,
) -> HandlerResult<NotifyResponse> {
    let channel = Channel::from_str(&channel).map_err(AppError::BadRequest)?;
    let schedule = state.repository.get_schedule(&id).await?;
    let volunteers = state.repository.list_volunteers().await?;
    let settings = state.repository.get_notifier_settings().await?;

    let transport: Box<dyn MessageTransport> = match channel {
        Channel::Email => match MailRelayTransport::from_settings(&settings) {
            Ok(t) => Box::new(t),
            Err(e) => {
                return Ok(Json(NotifyResponse {
                    success: false,
                    sent_count: 0,
                    error: Some(e.to_string()),
                }))
            }
        },
        Channel::WhatsApp => match TwilioWhatsAppTransport::from_settings(&settings) {
            Ok(t) => Box::new(t),
            Err(e) => {
                return Ok(Json(NotifyResponse {
                    success: false,
                    sent_count: 0,
                    error: Some(e.to_string()),
                }))
            }
        },
    };

    let outcome = notify_volunteers(&schedule, &volunteers, channel, transport.as_ref()).await;
    Ok(Json(outcome.into()))
}

// =============================================================================
// Permissions & Settings
// =============================================================================

/// GET /v1/permissions
pub async fn list_permissions(State(state): State<AppState>) -> HandlerResult<Vec<UserPermission>> {
    Ok(Json(state.repository.list_permissions().await?))
}

/// PUT /v1/permissions
pub async fn put_permission(
    State(state): State<AppState>,
    Json(permission): Json<UserPermission>,
) -> HandlerResult<UserPermission> {
    Ok(Json(state.repository.upsert_permission(permission).await?))
}

/// DELETE /v1/permissions/{user_id}
pub async fn delete_permission(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_permission(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/settings/notifier
pub async fn get_notifier_settings(
    State(state): State<AppState>,
) -> HandlerResult<NotifierSettings> {
    Ok(Json(state.repository.get_notifier_settings().await?))
}

/// PUT /v1/settings/notifier
pub async fn put_notifier_settings(
    State(state): State<AppState>,
    Json(settings): Json<NotifierSettings>,
) -> Result<StatusCode, AppError> {
    state.repository.set_notifier_settings(settings).await?;
    Ok(StatusCode::NO_CONTENT)
}
