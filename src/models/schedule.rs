//! Schedule types: rotation weeks, transient slots, and the persisted
//! day-grouped schedule projection.
//!
//! A [`Slot`] is one unit of required-volunteer work and only lives inside a
//! generation session; committing a save turns the slot list into a
//! [`SavedSchedule`], the day-grouped projection that is persisted and
//! edited afterwards. The two representations stay convertible in both
//! directions via [`days_from_slots`] and [`slots_from_schedule`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::roster::{Event, Volunteer};
use super::time::YearMonth;

/// Reason recorded on assignments no volunteer could be found for.
pub const UNFILLED_REASON: &str = "no volunteer assigned";

/// One calendar week of a month with its responsible team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamWeekAssignment {
    #[serde(default)]
    pub id: String,
    pub team: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    pub month: u32,
}

impl TeamWeekAssignment {
    /// Inclusive range test; the end date counts through end-of-day.
    pub fn covers(&self, date: NaiveDate) -> bool {
        super::time::in_range(date, self.start_date, self.end_date)
    }
}

/// Area selector for a generation run.
///
/// `All` is the legacy "all" sentinel; a named area restricts expansion and
/// makes the subsequent save merge area-surgically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenerationArea {
    All,
    Area(String),
}

impl GenerationArea {
    pub const ALL: &'static str = "all";

    pub fn includes(&self, area: &str) -> bool {
        match self {
            GenerationArea::All => true,
            GenerationArea::Area(name) => name == area,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GenerationArea::All => Self::ALL,
            GenerationArea::Area(name) => name,
        }
    }
}

impl Default for GenerationArea {
    fn default() -> Self {
        GenerationArea::All
    }
}

impl From<&str> for GenerationArea {
    fn from(value: &str) -> Self {
        if value == Self::ALL {
            GenerationArea::All
        } else {
            GenerationArea::Area(value.to_string())
        }
    }
}

impl Serialize for GenerationArea {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GenerationArea {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(GenerationArea::from(raw.as_str()))
    }
}

/// One unit of required-volunteer work within a generation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub event: String,
    pub event_id: String,
    pub area: String,
    /// Responsible team for the date, when one could be resolved.
    pub team: Option<String>,
    pub volunteer_id: Option<String>,
    /// Unique within one expansion: event, area, date, plus an ordinal
    /// distinguishing multiple openings in the same area.
    pub slot_key: String,
}

impl Slot {
    pub fn key_for(event_id: &str, area: &str, date: NaiveDate, ordinal: u32) -> String {
        format!("{event_id}-{area}-{date}-{ordinal}")
    }
}

/// Fill status of one persisted assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Filled,
    Failed,
}

/// One persisted assignment within a schedule day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub event: String,
    pub area: String,
    pub team: Option<String>,
    /// Volunteer display name; `None` when the slot went unfilled.
    pub volunteer: Option<String>,
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// All assignments of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub assignments: Vec<Assignment>,
}

/// Summary analytics attached to a saved schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub fill_rate: String,
    pub volunteer_distribution: String,
    pub bottlenecks: String,
    pub recommendations: String,
}

/// Payload of a saved schedule: report plus day-grouped assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleData {
    pub report: ScheduleReport,
    pub days: Vec<ScheduleDay>,
}

/// A persisted monthly schedule. At most one exists per (year, month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub generation_area: GenerationArea,
    pub data: ScheduleData,
}

/// Lightweight listing entry for saved schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub created_at: DateTime<Utc>,
}

impl SavedSchedule {
    pub fn info(&self) -> ScheduleInfo {
        ScheduleInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year,
            month: self.month,
            created_at: self.created_at,
        }
    }
}

/// Project a slot list into the persisted day-grouped form.
///
/// Slots are grouped by date in input order; volunteer ids are resolved to
/// display names against the roster. Unresolvable or absent assignments are
/// recorded as failed with [`UNFILLED_REASON`]. Days come out sorted by
/// date.
pub fn days_from_slots(slots: &[Slot], volunteers: &[Volunteer]) -> Vec<ScheduleDay> {
    let mut days: Vec<ScheduleDay> = Vec::new();

    for slot in slots {
        let volunteer = slot
            .volunteer_id
            .as_deref()
            .and_then(|id| volunteers.iter().find(|v| v.id == id))
            .map(|v| v.name.clone());

        let assignment = Assignment {
            event: slot.event.clone(),
            area: slot.area.clone(),
            team: slot.team.clone(),
            status: if volunteer.is_some() {
                AssignmentStatus::Filled
            } else {
                AssignmentStatus::Failed
            },
            reason: if volunteer.is_some() {
                None
            } else {
                Some(UNFILLED_REASON.to_string())
            },
            volunteer,
        };

        match days.iter_mut().find(|d| d.date == slot.date) {
            Some(day) => day.assignments.push(assignment),
            None => days.push(ScheduleDay {
                date: slot.date,
                day_of_week: slot.day_of_week.clone(),
                assignments: vec![assignment],
            }),
        }
    }

    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

/// Reconstruct editable slots from a saved schedule.
///
/// The inverse of [`days_from_slots`]: volunteer names are resolved back to
/// ids against the roster and event names to event ids against the event
/// list; ordinals are regenerated per (date, event, area) group so the slot
/// keys match a fresh expansion of the same assignments.
pub fn slots_from_schedule(
    schedule: &SavedSchedule,
    volunteers: &[Volunteer],
    events: &[Event],
) -> Vec<Slot> {
    let mut slots = Vec::new();

    for day in &schedule.data.days {
        for assignment in &day.assignments {
            let event_id = events
                .iter()
                .find(|e| e.name == assignment.event)
                .map(|e| e.id.clone())
                .unwrap_or_default();
            let volunteer_id = assignment
                .volunteer
                .as_deref()
                .and_then(|name| volunteers.iter().find(|v| v.name == name))
                .map(|v| v.id.clone());

            let ordinal = slots
                .iter()
                .filter(|s: &&Slot| {
                    s.date == day.date && s.event == assignment.event && s.area == assignment.area
                })
                .count() as u32;

            slots.push(Slot {
                date: day.date,
                day_of_week: day.day_of_week.clone(),
                event: assignment.event.clone(),
                slot_key: Slot::key_for(&event_id, &assignment.area, day.date, ordinal),
                event_id,
                area: assignment.area.clone(),
                team: assignment.team.clone(),
                volunteer_id,
            });
        }
    }

    slots
}

/// Build the default title for a period's schedule.
pub fn schedule_title(period: YearMonth) -> String {
    format!("Schedule for {} {}", period.month_name(), period.year())
}
