//! Domain model types shared across the repository, scheduler, and HTTP
//! layers.

pub mod roster;
pub mod schedule;
pub mod time;

pub use roster::{
    AreaOfService, Event, EventArea, NotifierSettings, Recurrence, Team, TeamRef, UserPermission,
    Volunteer,
};
pub use schedule::{
    days_from_slots, slots_from_schedule, Assignment, AssignmentStatus, GenerationArea,
    SavedSchedule, ScheduleData, ScheduleDay, ScheduleInfo, ScheduleReport, Slot,
    TeamWeekAssignment, UNFILLED_REASON,
};
pub use time::{weekday_label, week_starts, YearMonth};
