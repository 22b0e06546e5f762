//! Round-robin assignment of teams to the weeks of a month.

use chrono::{Duration, Weekday};

use crate::models::time::week_starts;
use crate::models::{Team, TeamWeekAssignment, YearMonth};

/// Assign teams to every week of the period, round-robin in roster order.
///
/// The cycle begins at `start_team` (falling back to the first team when the
/// name is unknown) and wraps around the roster as often as the month has
/// weeks. Ids are left empty; the repository assigns them on insert. An
/// empty roster yields an empty rotation.
pub fn generate_rotation(
    period: YearMonth,
    start_team: &str,
    teams: &[Team],
    week_start: Weekday,
) -> Vec<TeamWeekAssignment> {
    if teams.is_empty() {
        return Vec::new();
    }

    let mut idx = teams
        .iter()
        .position(|t| t.name == start_team)
        .unwrap_or(0);

    let mut assignments = Vec::new();
    for start in week_starts(period, week_start) {
        let team = &teams[idx % teams.len()];
        assignments.push(TeamWeekAssignment {
            id: String::new(),
            team: team.name.clone(),
            start_date: start,
            end_date: start + Duration::days(6),
            year: period.year(),
            month: period.month(),
        });
        idx += 1;
    }
    assignments
}
