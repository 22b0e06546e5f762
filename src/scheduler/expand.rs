//! Expansion of event definitions into dated, per-area slots.

use chrono::{Datelike, NaiveDate};

use crate::models::{
    weekday_label, Event, GenerationArea, Recurrence, Slot, TeamWeekAssignment, Team, YearMonth,
};

/// Resolve the responsible team for a date.
///
/// The rotation wins when a week covers the date; otherwise the first roster
/// team stands in, and with no teams at all the slot carries none.
pub fn team_for_date(
    date: NaiveDate,
    rotation: &[TeamWeekAssignment],
    teams: &[Team],
) -> Option<String> {
    rotation
        .iter()
        .find(|week| week.covers(date))
        .map(|week| week.team.clone())
        .or_else(|| teams.first().map(|t| t.name.clone()))
}

/// Expand every event occurrence in the period into empty slots.
///
/// Walks the month day by day, emitting weekly events on their weekday and
/// one-offs on their date, one slot per required volunteer per area (areas
/// outside `generation_area` are skipped). Each slot gets a key unique
/// within the expansion and the responsible team for its date. The result
/// is sorted by (date, event, area), with per-area ordinals preserving
/// emission order inside a group.
pub fn expand_slots(
    period: YearMonth,
    events: &[Event],
    rotation: &[TeamWeekAssignment],
    teams: &[Team],
    generation_area: &GenerationArea,
) -> Vec<Slot> {
    let mut slots = Vec::new();

    for day in 1..=period.days() {
        let date = match period.date(day) {
            Some(d) => d,
            None => continue,
        };
        let weekday = date.weekday();

        for event in events {
            let occurs = match event.recurrence {
                Recurrence::Weekly { day } => day == weekday,
                Recurrence::OneOff { date: d } => d == date,
            };
            if !occurs {
                continue;
            }

            let team = team_for_date(date, rotation, teams);
            for area in &event.areas {
                if !generation_area.includes(&area.name) {
                    continue;
                }
                for ordinal in 0..area.volunteers_needed {
                    slots.push(Slot {
                        date,
                        day_of_week: weekday_label(weekday).to_string(),
                        event: event.name.clone(),
                        event_id: event.id.clone(),
                        area: area.name.clone(),
                        team: team.clone(),
                        volunteer_id: None,
                        slot_key: Slot::key_for(&event.id, &area.name, date, ordinal),
                    });
                }
            }
        }
    }

    slots.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.event.cmp(&b.event))
            .then_with(|| a.area.cmp(&b.area))
    });
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventArea;
    use chrono::{NaiveTime, Weekday};
    use std::collections::HashSet;

    fn weekly_event(id: &str, name: &str, day: Weekday, areas: &[(&str, u32)]) -> Event {
        Event {
            id: id.to_string(),
            name: name.to_string(),
            recurrence: Recurrence::Weekly { day },
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            areas: areas
                .iter()
                .map(|(n, c)| EventArea {
                    name: n.to_string(),
                    volunteers_needed: *c,
                })
                .collect(),
            responsible: None,
            contact: None,
            observations: None,
        }
    }

    #[test]
    fn test_weekly_event_expands_per_occurrence_and_need() {
        let period = YearMonth::new(2025, 3).unwrap();
        let events = vec![weekly_event(
            "ev-1",
            "Sunday Service",
            Weekday::Sun,
            &[("Greeting", 2), ("Sound", 1)],
        )];

        let slots = expand_slots(period, &events, &[], &[], &GenerationArea::All);
        // 5 Sundays in March 2025, 3 openings each.
        assert_eq!(slots.len(), 15);
        assert!(slots.iter().all(|s| s.volunteer_id.is_none()));
        assert!(slots.iter().all(|s| s.day_of_week == "Sunday"));
    }

    #[test]
    fn test_slot_keys_are_unique() {
        let period = YearMonth::new(2025, 3).unwrap();
        let events = vec![weekly_event(
            "ev-1",
            "Sunday Service",
            Weekday::Sun,
            &[("Greeting", 3)],
        )];

        let slots = expand_slots(period, &events, &[], &[], &GenerationArea::All);
        let keys: HashSet<&str> = slots.iter().map(|s| s.slot_key.as_str()).collect();
        assert_eq!(keys.len(), slots.len());
    }

    #[test]
    fn test_one_off_only_inside_month() {
        let period = YearMonth::new(2025, 3).unwrap();
        let inside = Event {
            recurrence: Recurrence::OneOff {
                date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            },
            ..weekly_event("ev-2", "Conference", Weekday::Sun, &[("Greeting", 1)])
        };
        let outside = Event {
            recurrence: Recurrence::OneOff {
                date: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
            },
            ..weekly_event("ev-3", "Retreat", Weekday::Sun, &[("Greeting", 1)])
        };

        let slots = expand_slots(period, &[inside, outside], &[], &[], &GenerationArea::All);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].event, "Conference");
        assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }

    #[test]
    fn test_generation_area_filters_areas() {
        let period = YearMonth::new(2025, 3).unwrap();
        let events = vec![weekly_event(
            "ev-1",
            "Sunday Service",
            Weekday::Sun,
            &[("Greeting", 1), ("Sound", 1)],
        )];

        let area = GenerationArea::Area("Sound".to_string());
        let slots = expand_slots(period, &events, &[], &[], &area);
        assert!(slots.iter().all(|s| s.area == "Sound"));
        assert_eq!(slots.len(), 5);
    }

    #[test]
    fn test_team_resolution_prefers_rotation() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let rotation = vec![TeamWeekAssignment {
            id: "w1".to_string(),
            team: "Bravo".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
            year: 2025,
            month: 3,
        }];
        let teams = vec![Team {
            id: "t1".to_string(),
            name: "Alpha".to_string(),
        }];

        assert_eq!(
            team_for_date(date, &rotation, &teams),
            Some("Bravo".to_string())
        );
        // End date counts through its whole day.
        assert_eq!(
            team_for_date(
                NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
                &rotation,
                &teams
            ),
            Some("Bravo".to_string())
        );
        // Outside the rotation the first roster team stands in.
        assert_eq!(
            team_for_date(
                NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
                &rotation,
                &teams
            ),
            Some("Alpha".to_string())
        );
        assert_eq!(
            team_for_date(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), &rotation, &[]),
            None
        );
    }

    #[test]
    fn test_expansion_is_sorted_and_deterministic() {
        let period = YearMonth::new(2025, 3).unwrap();
        let events = vec![
            weekly_event("ev-2", "Prayer Meeting", Weekday::Wed, &[("Sound", 1)]),
            weekly_event(
                "ev-1",
                "Sunday Service",
                Weekday::Sun,
                &[("Sound", 1), ("Greeting", 1)],
            ),
        ];

        let first = expand_slots(period, &events, &[], &[], &GenerationArea::All);
        let second = expand_slots(period, &events, &[], &[], &GenerationArea::All);
        assert_eq!(first, second);

        for pair in first.windows(2) {
            let a = (&pair[0].date, &pair[0].event, &pair[0].area);
            let b = (&pair[1].date, &pair[1].event, &pair[1].area);
            assert!(a <= b);
        }
    }
}
