//! Data Transfer Objects for the HTTP API.
//!
//! The domain models already derive Serialize/Deserialize and travel as-is;
//! this module adds the request/response envelopes the endpoints need on
//! top of them.

use serde::{Deserialize, Serialize};

// Re-export the models that appear directly in request/response bodies.
pub use crate::models::{
    AreaOfService, Event, GenerationArea, NotifierSettings, SavedSchedule, ScheduleInfo, Slot,
    Team, TeamWeekAssignment, UserPermission, Volunteer,
};

/// Response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Request body for regenerating a month's rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRotationRequest {
    /// Team name the round-robin starts from.
    pub start_team: String,
    /// Week boundary day name; defaults to Sunday.
    #[serde(default)]
    pub week_start: Option<String>,
}

/// Response for rotation regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRotationResponse {
    /// "replaced" or "no-teams-configured".
    pub outcome: String,
    pub weeks: usize,
}

/// Response for rotation listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationResponse {
    pub weeks: Vec<TeamWeekAssignment>,
    pub total: usize,
}

/// Request body for expanding a month into empty slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildScheduleRequest {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub area: GenerationArea,
}

/// Request body for the auto-fill pass. Pure: slots in, slots out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFillRequest {
    pub slots: Vec<Slot>,
}

/// Response carrying a slot list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub slots: Vec<Slot>,
    pub total: usize,
}

/// Request body for saving (or merging) a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleRequest {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub area: GenerationArea,
    pub slots: Vec<Slot>,
}

/// Response for schedule listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleInfo>,
    pub total: usize,
}

/// Response for a notification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub sent_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<crate::notify::NotificationOutcome> for NotifyResponse {
    fn from(outcome: crate::notify::NotificationOutcome) -> Self {
        Self {
            success: outcome.success,
            sent_count: outcome.sent_count,
            error: outcome.error,
        }
    }
}
