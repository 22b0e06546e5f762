//! End-to-end schedule lifecycle tests: rotation, expansion, auto-fill,
//! save/merge, and reopening, all against the in-memory repository.

use chrono::{NaiveTime, Weekday};
use rota_rust::db::{DirectoryRepository, LocalRepository, ScheduleStore};
use rota_rust::models::{
    Assignment, AssignmentStatus, Event, EventArea, GenerationArea, Recurrence, Team, TeamRef,
    Volunteer, YearMonth,
};
use rota_rust::services::{
    auto_fill_slots, build_slots, regenerate_rotation, save_schedule, schedule_slots,
    RotationOutcome,
};

fn team(name: &str) -> Team {
    Team {
        id: String::new(),
        name: name.to_string(),
    }
}

fn volunteer(name: &str, areas: &[&str]) -> Volunteer {
    Volunteer {
        id: String::new(),
        name: name.to_string(),
        team: TeamRef::Unassigned,
        areas: areas.iter().map(|a| a.to_string()).collect(),
        availability: vec!["Sunday Service".to_string()],
        phone: None,
        email: None,
    }
}

/// Seed a roster covering March 2025: one weekly Sunday event with two
/// areas, two rotating teams, and three volunteers.
async fn seed(repo: &LocalRepository) {
    repo.insert_event(Event {
        id: String::new(),
        name: "Sunday Service".to_string(),
        recurrence: Recurrence::Weekly { day: Weekday::Sun },
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        areas: vec![
            EventArea {
                name: "Greeting".to_string(),
                volunteers_needed: 1,
            },
            EventArea {
                name: "Sound".to_string(),
                volunteers_needed: 1,
            },
        ],
        responsible: None,
        contact: None,
        observations: None,
    })
    .await
    .unwrap();

    repo.insert_team(team("Alpha")).await.unwrap();
    repo.insert_team(team("Bravo")).await.unwrap();

    repo.insert_volunteer(volunteer("Ana", &["Greeting"])).await.unwrap();
    repo.insert_volunteer(volunteer("Bia", &["Greeting"])).await.unwrap();
    repo.insert_volunteer(volunteer("Carla", &["Sound"])).await.unwrap();
}

#[tokio::test]
async fn test_full_generation_lifecycle() {
    let repo = LocalRepository::new();
    let period = YearMonth::new(2025, 3).unwrap();
    seed(&repo).await;

    // Rotation covers every week touching March 2025
    let outcome = regenerate_rotation(&repo, period, "Alpha", Weekday::Sun)
        .await
        .unwrap();
    assert_eq!(outcome, RotationOutcome::Replaced(6));

    // Five Sundays, two areas each
    let slots = build_slots(&repo, period, &GenerationArea::All).await.unwrap();
    assert_eq!(slots.len(), 10);
    assert!(slots.iter().all(|s| s.team.is_some()));

    // Every slot has a qualified volunteer available
    let filled = auto_fill_slots(&repo, &slots).await.unwrap();
    assert!(filled.iter().all(|s| s.volunteer_id.is_some()));

    let saved = save_schedule(&repo, period, GenerationArea::All, &filled)
        .await
        .unwrap();
    assert_eq!(saved.title, "Schedule for March 2025");
    assert_eq!(saved.data.days.len(), 5);
    assert_eq!(saved.data.report.fill_rate, "10/10 slots filled (100%)");

    // Reopening yields the same editable slot list
    let reopened = schedule_slots(&repo, period).await.unwrap().unwrap();
    assert_eq!(reopened, filled);

    // Listing and deletion round out the lifecycle
    let listing = repo.list_schedules().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, saved.id);
    repo.delete_schedule(&saved.id).await.unwrap();
    assert!(repo.find_schedule(period).await.unwrap().is_none());
}

#[tokio::test]
async fn test_area_scoped_rerun_preserves_other_areas_exactly() {
    let repo = LocalRepository::new();
    let period = YearMonth::new(2025, 3).unwrap();
    seed(&repo).await;
    regenerate_rotation(&repo, period, "Alpha", Weekday::Sun)
        .await
        .unwrap();

    let slots = build_slots(&repo, period, &GenerationArea::All).await.unwrap();
    let filled = auto_fill_slots(&repo, &slots).await.unwrap();
    let first = save_schedule(&repo, period, GenerationArea::All, &filled)
        .await
        .unwrap();

    let greeting_before = greeting_assignments_json(&first);

    // Regenerate only the Sound area and merge it in
    let sound_area = GenerationArea::Area("Sound".to_string());
    let sound_slots = build_slots(&repo, period, &sound_area).await.unwrap();
    assert_eq!(sound_slots.len(), 5);
    let sound_filled = auto_fill_slots(&repo, &sound_slots).await.unwrap();
    let second = save_schedule(&repo, period, sound_area, &sound_filled)
        .await
        .unwrap();

    // Same document updated, not a second one
    assert_eq!(second.id, first.id);
    assert!(second.updated_at.is_some());
    assert_eq!(repo.list_schedules().await.unwrap().len(), 1);

    // Greeting assignments came through the merge byte-identical
    assert_eq!(greeting_assignments_json(&second), greeting_before);
}

#[tokio::test]
async fn test_unfilled_slots_survive_save_with_reason() {
    let repo = LocalRepository::new();
    let period = YearMonth::new(2025, 3).unwrap();
    seed(&repo).await;
    // Nobody is qualified for this area
    repo.insert_event(Event {
        id: String::new(),
        name: "Prayer Meeting".to_string(),
        recurrence: Recurrence::Weekly { day: Weekday::Wed },
        time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        areas: vec![EventArea {
            name: "Kitchen".to_string(),
            volunteers_needed: 1,
        }],
        responsible: None,
        contact: None,
        observations: None,
    })
    .await
    .unwrap();

    let slots = build_slots(&repo, period, &GenerationArea::All).await.unwrap();
    let filled = auto_fill_slots(&repo, &slots).await.unwrap();
    let saved = save_schedule(&repo, period, GenerationArea::All, &filled)
        .await
        .unwrap();

    let failed: Vec<&Assignment> = saved
        .data
        .days
        .iter()
        .flat_map(|d| &d.assignments)
        .filter(|a| a.status == AssignmentStatus::Failed)
        .collect();
    assert!(!failed.is_empty());
    assert!(failed.iter().all(|a| a.area == "Kitchen"));
    assert!(failed.iter().all(|a| a.reason.is_some()));
    assert!(saved.data.report.bottlenecks.contains("Kitchen"));
}

fn greeting_assignments_json(schedule: &rota_rust::models::SavedSchedule) -> String {
    let greeting: Vec<(String, &Assignment)> = schedule
        .data
        .days
        .iter()
        .flat_map(|d| {
            d.assignments
                .iter()
                .filter(|a| a.area == "Greeting")
                .map(move |a| (d.date.to_string(), a))
        })
        .collect();
    serde_json::to_string(&greeting).unwrap()
}
