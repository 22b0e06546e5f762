//! Schedule generation lifecycle: expand, auto-fill, save/merge, reopen.

use chrono::Utc;
use log::{info, warn};

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::schedule::schedule_title;
use crate::models::{
    days_from_slots, slots_from_schedule, AssignmentStatus, GenerationArea, SavedSchedule,
    ScheduleData, ScheduleDay, ScheduleReport, Slot, Volunteer, YearMonth,
};
use crate::scheduler::{auto_fill, expand_slots, merge_days};

/// Expand the period's events into empty slots.
///
/// Missing configuration degrades instead of failing: no events yields an
/// empty slot list, no teams yields slots without a responsible team.
pub async fn build_slots(
    repo: &dyn FullRepository,
    period: YearMonth,
    area: &GenerationArea,
) -> RepositoryResult<Vec<Slot>> {
    let events = repo.list_events().await?;
    let teams = repo.list_teams().await?;
    let rotation = repo.list_rotation(period).await?;

    if events.is_empty() {
        warn!(
            "no events configured; {}-{:02} expands to an empty schedule",
            period.year(),
            period.month()
        );
    }

    let slots = expand_slots(period, &events, &rotation, &teams, area);
    info!(
        "expanded {} slots for {}-{:02} (area: {})",
        slots.len(),
        period.year(),
        period.month(),
        area.as_str()
    );
    Ok(slots)
}

/// Run the greedy assigner over the roster.
pub async fn auto_fill_slots(
    repo: &dyn FullRepository,
    slots: &[Slot],
) -> RepositoryResult<Vec<Slot>> {
    let volunteers = repo.list_volunteers().await?;
    let filled = auto_fill(slots, &volunteers);
    let unfilled = filled.iter().filter(|s| s.volunteer_id.is_none()).count();
    if unfilled > 0 {
        warn!("{unfilled} of {} slots left unfilled", filled.len());
    }
    Ok(filled)
}

/// Save a generation run, merging into the period's existing schedule.
///
/// At most one schedule exists per period: the first save inserts, later
/// saves merge into the stored days per the generation area and update in
/// place, refreshing `updated_at` and the report.
pub async fn save_schedule(
    repo: &dyn FullRepository,
    period: YearMonth,
    area: GenerationArea,
    slots: &[Slot],
) -> RepositoryResult<SavedSchedule> {
    let volunteers = repo.list_volunteers().await?;
    let new_days = days_from_slots(slots, &volunteers);

    match repo.find_schedule(period).await? {
        Some(mut existing) => {
            let days = merge_days(&existing.data.days, new_days, &area);
            existing.data = ScheduleData {
                report: build_report(&days, &volunteers),
                days,
            };
            existing.generation_area = area;
            existing.updated_at = Some(Utc::now());
            let stored = repo.update_schedule(existing).await?;
            info!("schedule {} updated for {}-{:02}", stored.id, period.year(), period.month());
            Ok(stored)
        }
        None => {
            let schedule = SavedSchedule {
                id: String::new(),
                title: schedule_title(period),
                created_at: Utc::now(),
                updated_at: None,
                year: period.year(),
                month: period.month(),
                generation_area: area,
                data: ScheduleData {
                    report: build_report(&new_days, &volunteers),
                    days: new_days,
                },
            };
            let stored = repo.insert_schedule(schedule).await?;
            info!("schedule {} created for {}-{:02}", stored.id, period.year(), period.month());
            Ok(stored)
        }
    }
}

/// Reopen the period's saved schedule as editable slots.
///
/// Returns `None` when the period has no schedule yet.
pub async fn schedule_slots(
    repo: &dyn FullRepository,
    period: YearMonth,
) -> RepositoryResult<Option<Vec<Slot>>> {
    let schedule = match repo.find_schedule(period).await? {
        Some(s) => s,
        None => return Ok(None),
    };
    let volunteers = repo.list_volunteers().await?;
    let events = repo.list_events().await?;
    Ok(Some(slots_from_schedule(&schedule, &volunteers, &events)))
}

/// Summarize fill rate, load distribution, and unfilled areas for the
/// report block of a saved schedule.
fn build_report(days: &[ScheduleDay], volunteers: &[Volunteer]) -> ScheduleReport {
    let total: usize = days.iter().map(|d| d.assignments.len()).sum();
    let filled: usize = days
        .iter()
        .flat_map(|d| &d.assignments)
        .filter(|a| a.status == AssignmentStatus::Filled)
        .count();
    let rate = if total > 0 {
        filled as f64 * 100.0 / total as f64
    } else {
        0.0
    };

    let mut loads: Vec<(String, usize)> = volunteers
        .iter()
        .map(|v| {
            let count = days
                .iter()
                .flat_map(|d| &d.assignments)
                .filter(|a| a.volunteer.as_deref() == Some(v.name.as_str()))
                .count();
            (v.name.clone(), count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();
    loads.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let distribution = if loads.is_empty() {
        "No volunteer received an assignment.".to_string()
    } else {
        let entries: Vec<String> = loads
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect();
        format!("Assignments per volunteer: {}.", entries.join(", "))
    };

    let mut unfilled_areas: Vec<String> = days
        .iter()
        .flat_map(|d| &d.assignments)
        .filter(|a| a.status == AssignmentStatus::Failed)
        .map(|a| a.area.clone())
        .collect();
    unfilled_areas.sort();
    unfilled_areas.dedup();

    let (bottlenecks, recommendations) = if unfilled_areas.is_empty() {
        (
            "All slots were filled.".to_string(),
            "No action needed.".to_string(),
        )
    } else {
        (
            format!("Unfilled slots in: {}.", unfilled_areas.join(", ")),
            format!(
                "Recruit or qualify more volunteers for: {}.",
                unfilled_areas.join(", ")
            ),
        )
    };

    ScheduleReport {
        fill_rate: format!("{filled}/{total} slots filled ({rate:.0}%)"),
        volunteer_distribution: distribution,
        bottlenecks,
        recommendations,
    }
}
