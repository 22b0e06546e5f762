//! Directory types: volunteers, events, teams, and areas of service.
//!
//! These mirror the persisted document shapes. Ids are opaque strings
//! assigned by the repository on insert; referencing between documents is by
//! name (team name, area name, event name), matching the source data model.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Team membership of a volunteer.
///
/// `Unassigned` is the legacy "N/A" sentinel: such volunteers match any
/// slot's team context. The sentinel spelling is preserved on the wire so
/// existing documents round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TeamRef {
    Unassigned,
    Named(String),
}

impl TeamRef {
    pub const UNASSIGNED: &'static str = "N/A";

    /// Whether this membership is compatible with a slot's team.
    ///
    /// Unassigned volunteers match everything, and a slot without a
    /// responsible team accepts everyone.
    pub fn matches(&self, slot_team: Option<&str>) -> bool {
        match (self, slot_team) {
            (TeamRef::Unassigned, _) => true,
            (_, None) => true,
            (TeamRef::Named(name), Some(team)) => name == team,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TeamRef::Unassigned => Self::UNASSIGNED,
            TeamRef::Named(name) => name,
        }
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TeamRef {
    fn from(value: &str) -> Self {
        if value == Self::UNASSIGNED {
            TeamRef::Unassigned
        } else {
            TeamRef::Named(value.to_string())
        }
    }
}

impl Serialize for TeamRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TeamRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TeamRef::from(raw.as_str()))
    }
}

/// A volunteer in the directory.
///
/// Active volunteers are expected to carry at least one area qualification
/// and one availability entry; that is enforced at the edit boundary, not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub team: TeamRef,
    /// Areas of service the volunteer is qualified for.
    pub areas: Vec<String>,
    /// Event names the volunteer has declared availability for.
    pub availability: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// How often an event occurs.
///
/// The sum type makes the recurrence invariant structural: a weekly event
/// always has a day of week, a one-off always has a date, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "kebab-case")]
pub enum Recurrence {
    Weekly { day: Weekday },
    OneOff { date: NaiveDate },
}

/// One area requirement within an event definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArea {
    pub name: String,
    pub volunteers_needed: u32,
}

/// An event definition (weekly-recurring or one-off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    pub time: NaiveTime,
    pub areas: Vec<EventArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// A named team. Roster order (repository list order) defines the rotation
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// An area of service with optional leadership contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOfService {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_phone: Option<String>,
}

/// Capability map for one user, evaluated by the caller before invoking
/// operations; the core never consults it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPermission {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub can_manage_volunteers: bool,
    #[serde(default)]
    pub can_manage_events: bool,
    #[serde(default)]
    pub can_manage_areas: bool,
    #[serde(default)]
    pub can_manage_teams: bool,
    #[serde(default)]
    pub can_view_schedules: bool,
    #[serde(default)]
    pub can_generate_schedules: bool,
    #[serde(default)]
    pub can_manage_settings: bool,
}

/// Credentials and endpoints for the notification channels.
///
/// Stored as a single settings document; absent fields disable the
/// corresponding channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotifierSettings {
    /// HTTP mail-relay endpoint the email channel posts to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio_account_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio_auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio_whatsapp_number: Option<String>,
}
