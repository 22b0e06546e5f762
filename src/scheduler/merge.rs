//! Area-surgical merge of a generation run into a saved schedule.

use crate::models::{GenerationArea, ScheduleDay};

/// Merge freshly generated days into the existing day list.
///
/// Assignments in the generated area are stripped from the existing days
/// (the new run replaces them); everything outside the area survives
/// untouched. Days emptied by the strip are dropped, then the new days are
/// folded in by date, extending a surviving day or inserting a new one.
/// Days come out sorted by date and assignments by (event, area), so a
/// full-area regeneration of identical inputs reproduces the stored
/// document byte for byte.
pub fn merge_days(
    existing: &[ScheduleDay],
    new_days: Vec<ScheduleDay>,
    area: &GenerationArea,
) -> Vec<ScheduleDay> {
    let mut merged: Vec<ScheduleDay> = existing
        .iter()
        .filter_map(|day| {
            let kept: Vec<_> = day
                .assignments
                .iter()
                .filter(|a| !area.includes(&a.area))
                .cloned()
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(ScheduleDay {
                    date: day.date,
                    day_of_week: day.day_of_week.clone(),
                    assignments: kept,
                })
            }
        })
        .collect();

    for day in new_days {
        match merged.iter_mut().find(|d| d.date == day.date) {
            Some(existing_day) => existing_day.assignments.extend(day.assignments),
            None => merged.push(day),
        }
    }

    merged.sort_by(|a, b| a.date.cmp(&b.date));
    for day in &mut merged {
        day.assignments
            .sort_by(|a, b| a.event.cmp(&b.event).then_with(|| a.area.cmp(&b.area)));
    }
    merged
}
