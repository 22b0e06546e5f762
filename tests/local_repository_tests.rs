//! Integration tests for the in-memory repository implementation.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Weekday};
use rota_rust::db::{
    DirectoryRepository, FullRepository, LocalRepository, RepositoryError, RotationRepository,
    SettingsRepository,
};
use rota_rust::models::{
    AreaOfService, Event, EventArea, NotifierSettings, Recurrence, Team, TeamRef,
    TeamWeekAssignment, UserPermission, Volunteer, YearMonth,
};

fn volunteer(name: &str) -> Volunteer {
    Volunteer {
        id: String::new(),
        name: name.to_string(),
        team: TeamRef::Unassigned,
        areas: vec!["Greeting".to_string()],
        availability: vec!["Sunday Service".to_string()],
        phone: None,
        email: None,
    }
}

fn event(name: &str) -> Event {
    Event {
        id: String::new(),
        name: name.to_string(),
        recurrence: Recurrence::Weekly { day: Weekday::Sun },
        time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        areas: vec![EventArea {
            name: "Greeting".to_string(),
            volunteers_needed: 1,
        }],
        responsible: None,
        contact: None,
        observations: None,
    }
}

#[tokio::test]
async fn test_repository_health_check() {
    let repo: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
    let result = repo.health_check().await;
    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[tokio::test]
async fn test_volunteer_crud_lifecycle() {
    let repo = LocalRepository::new();

    // Insert assigns an id
    let stored = repo.insert_volunteer(volunteer("Ana")).await.unwrap();
    assert!(!stored.id.is_empty());

    // Update replaces the document
    let mut updated = stored.clone();
    updated.areas.push("Sound".to_string());
    let back = repo.update_volunteer(updated).await.unwrap();
    assert_eq!(back.areas.len(), 2);

    // List reflects the change
    let all = repo.list_volunteers().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].areas.len(), 2);

    // Delete empties the collection
    repo.delete_volunteer(&stored.id).await.unwrap();
    assert!(repo.list_volunteers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_unknown_volunteer_is_not_found() {
    let repo = LocalRepository::new();
    let mut ghost = volunteer("Ghost");
    ghost.id = "missing".to_string();

    let result = repo.update_volunteer(ghost).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_list_order_is_insertion_order() {
    let repo = LocalRepository::new();
    for name in ["Alpha", "Bravo", "Charlie"] {
        repo.insert_team(Team {
            id: String::new(),
            name: name.to_string(),
        })
        .await
        .unwrap();
    }

    let teams = repo.list_teams().await.unwrap();
    let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
}

#[tokio::test]
async fn test_event_and_area_crud() {
    let repo = LocalRepository::new();

    let ev = repo.insert_event(event("Sunday Service")).await.unwrap();
    assert!(!ev.id.is_empty());
    repo.delete_event(&ev.id).await.unwrap();
    assert!(repo.list_events().await.unwrap().is_empty());

    let area = repo
        .insert_area(AreaOfService {
            id: String::new(),
            name: "Greeting".to_string(),
            leader: Some("Ana".to_string()),
            leader_phone: None,
        })
        .await
        .unwrap();
    let fetched = repo.list_areas().await.unwrap();
    assert_eq!(fetched[0].leader.as_deref(), Some("Ana"));
    repo.delete_area(&area.id).await.unwrap();
    assert!(repo.list_areas().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rotation_replace_swaps_the_month() {
    let repo = LocalRepository::new();
    let period = YearMonth::new(2025, 3).unwrap();

    let week = |start: u32, team: &str| TeamWeekAssignment {
        id: String::new(),
        team: team.to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 3, start).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 3, start + 6).unwrap(),
        year: 2025,
        month: 3,
    };

    let stored = repo
        .replace_rotation(period, vec![week(2, "Alpha"), week(9, "Bravo")])
        .await
        .unwrap();
    assert_eq!(stored, 2);

    // A second replace discards the first set entirely
    let stored = repo.replace_rotation(period, vec![week(2, "Charlie")]).await.unwrap();
    assert_eq!(stored, 1);

    let weeks = repo.list_rotation(period).await.unwrap();
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].team, "Charlie");

    // Other periods are untouched
    let other = YearMonth::new(2025, 4).unwrap();
    assert!(repo.list_rotation(other).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_permission_upsert_keyed_by_user_id() {
    let repo = LocalRepository::new();

    let permission = UserPermission {
        user_id: "user-1".to_string(),
        display_name: "Ana".to_string(),
        can_view_schedules: true,
        ..Default::default()
    };
    repo.upsert_permission(permission.clone()).await.unwrap();

    // Upserting the same user replaces, not duplicates
    let mut escalated = permission;
    escalated.can_generate_schedules = true;
    repo.upsert_permission(escalated).await.unwrap();

    let all = repo.list_permissions().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].can_generate_schedules);

    repo.delete_permission("user-1").await.unwrap();
    assert!(repo.list_permissions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notifier_settings_default_until_set() {
    let repo = LocalRepository::new();

    let initial = repo.get_notifier_settings().await.unwrap();
    assert_eq!(initial, NotifierSettings::default());

    let settings = NotifierSettings {
        mail_endpoint: Some("https://relay.example.org/send".to_string()),
        mail_from: Some("rota@example.org".to_string()),
        ..Default::default()
    };
    repo.set_notifier_settings(settings.clone()).await.unwrap();

    let stored = repo.get_notifier_settings().await.unwrap();
    assert_eq!(stored, settings);
}
