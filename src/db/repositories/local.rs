//! In-memory repository implementation for unit testing and local
//! development.
//!
//! All collections live behind one `RwLock`; list order is insertion order,
//! which for teams doubles as the rotation roster order. The health flag
//! can be toggled to simulate an unreachable backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::{
    DirectoryRepository, RepositoryError, RepositoryResult, RotationRepository, ScheduleStore,
    SettingsRepository,
};
use crate::models::{
    AreaOfService, Event, NotifierSettings, SavedSchedule, ScheduleInfo, Team, TeamWeekAssignment,
    UserPermission, Volunteer, YearMonth,
};

#[derive(Default)]
struct LocalState {
    volunteers: Vec<Volunteer>,
    events: Vec<Event>,
    teams: Vec<Team>,
    areas: Vec<AreaOfService>,
    rotation: Vec<TeamWeekAssignment>,
    schedules: Vec<SavedSchedule>,
    permissions: Vec<UserPermission>,
    notifier: Option<NotifierSettings>,
}

/// In-memory implementation of the full repository interface.
pub struct LocalRepository {
    state: RwLock<LocalState>,
    healthy: AtomicBool,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LocalState::default()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Simulate backend availability in tests.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Drop every stored document.
    pub fn clear(&self) -> RepositoryResult<()> {
        *self.write()? = LocalState::default();
        Ok(())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, LocalState>> {
        self.state
            .read()
            .map_err(|_| RepositoryError::InternalError("state lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, LocalState>> {
        self.state
            .write()
            .map_err(|_| RepositoryError::InternalError("state lock poisoned".to_string()))
    }

    fn ensure_id(id: &mut String) {
        if id.is_empty() {
            *id = Uuid::new_v4().to_string();
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    async fn list_volunteers(&self) -> RepositoryResult<Vec<Volunteer>> {
        Ok(self.read()?.volunteers.clone())
    }

    async fn insert_volunteer(&self, mut volunteer: Volunteer) -> RepositoryResult<Volunteer> {
        Self::ensure_id(&mut volunteer.id);
        self.write()?.volunteers.push(volunteer.clone());
        Ok(volunteer)
    }

    async fn update_volunteer(&self, volunteer: Volunteer) -> RepositoryResult<Volunteer> {
        let mut state = self.write()?;
        match state.volunteers.iter_mut().find(|v| v.id == volunteer.id) {
            Some(existing) => {
                *existing = volunteer.clone();
                Ok(volunteer)
            }
            None => Err(RepositoryError::NotFound(format!(
                "Volunteer {} not found",
                volunteer.id
            ))),
        }
    }

    async fn delete_volunteer(&self, id: &str) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.volunteers.len();
        state.volunteers.retain(|v| v.id != id);
        if state.volunteers.len() == before {
            return Err(RepositoryError::NotFound(format!(
                "Volunteer {id} not found"
            )));
        }
        Ok(())
    }

    async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        Ok(self.read()?.events.clone())
    }

    async fn insert_event(&self, mut event: Event) -> RepositoryResult<Event> {
        Self::ensure_id(&mut event.id);
        self.write()?.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, event: Event) -> RepositoryResult<Event> {
        let mut state = self.write()?;
        match state.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => {
                *existing = event.clone();
                Ok(event)
            }
            None => Err(RepositoryError::NotFound(format!(
                "Event {} not found",
                event.id
            ))),
        }
    }

    async fn delete_event(&self, id: &str) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        if state.events.len() == before {
            return Err(RepositoryError::NotFound(format!("Event {id} not found")));
        }
        Ok(())
    }

    async fn list_teams(&self) -> RepositoryResult<Vec<Team>> {
        Ok(self.read()?.teams.clone())
    }

    async fn insert_team(&self, mut team: Team) -> RepositoryResult<Team> {
        Self::ensure_id(&mut team.id);
        self.write()?.teams.push(team.clone());
        Ok(team)
    }

    async fn update_team(&self, team: Team) -> RepositoryResult<Team> {
        let mut state = self.write()?;
        match state.teams.iter_mut().find(|t| t.id == team.id) {
            Some(existing) => {
                *existing = team.clone();
                Ok(team)
            }
            None => Err(RepositoryError::NotFound(format!(
                "Team {} not found",
                team.id
            ))),
        }
    }

    async fn delete_team(&self, id: &str) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.teams.len();
        state.teams.retain(|t| t.id != id);
        if state.teams.len() == before {
            return Err(RepositoryError::NotFound(format!("Team {id} not found")));
        }
        Ok(())
    }

    async fn list_areas(&self) -> RepositoryResult<Vec<AreaOfService>> {
        Ok(self.read()?.areas.clone())
    }

    async fn insert_area(&self, mut area: AreaOfService) -> RepositoryResult<AreaOfService> {
        Self::ensure_id(&mut area.id);
        self.write()?.areas.push(area.clone());
        Ok(area)
    }

    async fn update_area(&self, area: AreaOfService) -> RepositoryResult<AreaOfService> {
        let mut state = self.write()?;
        match state.areas.iter_mut().find(|a| a.id == area.id) {
            Some(existing) => {
                *existing = area.clone();
                Ok(area)
            }
            None => Err(RepositoryError::NotFound(format!(
                "Area {} not found",
                area.id
            ))),
        }
    }

    async fn delete_area(&self, id: &str) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.areas.len();
        state.areas.retain(|a| a.id != id);
        if state.areas.len() == before {
            return Err(RepositoryError::NotFound(format!("Area {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl RotationRepository for LocalRepository {
    async fn list_rotation(&self, period: YearMonth) -> RepositoryResult<Vec<TeamWeekAssignment>> {
        let state = self.read()?;
        let mut weeks: Vec<TeamWeekAssignment> = state
            .rotation
            .iter()
            .filter(|w| w.year == period.year() && w.month == period.month())
            .cloned()
            .collect();
        weeks.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(weeks)
    }

    async fn replace_rotation(
        &self,
        period: YearMonth,
        weeks: Vec<TeamWeekAssignment>,
    ) -> RepositoryResult<usize> {
        let mut state = self.write()?;
        state
            .rotation
            .retain(|w| !(w.year == period.year() && w.month == period.month()));
        let count = weeks.len();
        for mut week in weeks {
            Self::ensure_id(&mut week.id);
            state.rotation.push(week);
        }
        Ok(count)
    }
}

#[async_trait]
impl ScheduleStore for LocalRepository {
    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>> {
        Ok(self.read()?.schedules.iter().map(|s| s.info()).collect())
    }

    async fn get_schedule(&self, id: &str) -> RepositoryResult<SavedSchedule> {
        self.read()?
            .schedules
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Schedule {id} not found")))
    }

    async fn find_schedule(&self, period: YearMonth) -> RepositoryResult<Option<SavedSchedule>> {
        Ok(self
            .read()?
            .schedules
            .iter()
            .find(|s| s.year == period.year() && s.month == period.month())
            .cloned())
    }

    async fn insert_schedule(&self, mut schedule: SavedSchedule) -> RepositoryResult<SavedSchedule> {
        Self::ensure_id(&mut schedule.id);
        self.write()?.schedules.push(schedule.clone());
        Ok(schedule)
    }

    async fn update_schedule(&self, schedule: SavedSchedule) -> RepositoryResult<SavedSchedule> {
        let mut state = self.write()?;
        match state.schedules.iter_mut().find(|s| s.id == schedule.id) {
            Some(existing) => {
                *existing = schedule.clone();
                Ok(schedule)
            }
            None => Err(RepositoryError::NotFound(format!(
                "Schedule {} not found",
                schedule.id
            ))),
        }
    }

    async fn delete_schedule(&self, id: &str) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.schedules.len();
        state.schedules.retain(|s| s.id != id);
        if state.schedules.len() == before {
            return Err(RepositoryError::NotFound(format!(
                "Schedule {id} not found"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for LocalRepository {
    async fn list_permissions(&self) -> RepositoryResult<Vec<UserPermission>> {
        Ok(self.read()?.permissions.clone())
    }

    async fn upsert_permission(
        &self,
        mut permission: UserPermission,
    ) -> RepositoryResult<UserPermission> {
        Self::ensure_id(&mut permission.id);
        let mut state = self.write()?;
        match state
            .permissions
            .iter_mut()
            .find(|p| p.user_id == permission.user_id)
        {
            Some(existing) => {
                permission.id = existing.id.clone();
                *existing = permission.clone();
            }
            None => state.permissions.push(permission.clone()),
        }
        Ok(permission)
    }

    async fn delete_permission(&self, user_id: &str) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let before = state.permissions.len();
        state.permissions.retain(|p| p.user_id != user_id);
        if state.permissions.len() == before {
            return Err(RepositoryError::NotFound(format!(
                "Permission for user {user_id} not found"
            )));
        }
        Ok(())
    }

    async fn get_notifier_settings(&self) -> RepositoryResult<NotifierSettings> {
        Ok(self.read()?.notifier.clone().unwrap_or_default())
    }

    async fn set_notifier_settings(&self, settings: NotifierSettings) -> RepositoryResult<()> {
        self.write()?.notifier = Some(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRef;
    use chrono::{Duration, NaiveDate};

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

    #[tokio::test]
    async fn test_health_toggle() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_lists_in_order() {
        let repo = LocalRepository::new();
        let first = repo.insert_volunteer(volunteer("Ana")).await.unwrap();
        let second = repo.insert_volunteer(volunteer("Bia")).await.unwrap();
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);

        let listed = repo.list_volunteers().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Ana");
        assert_eq!(listed[1].name, "Bia");
    }

    #[tokio::test]
    async fn test_update_missing_volunteer_is_not_found() {
        let repo = LocalRepository::new();
        let mut v = volunteer("Ana");
        v.id = "missing".to_string();
        let err = repo.update_volunteer(v).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_replace_rotation_is_scoped_to_period() {
        let repo = LocalRepository::new();
        let march = YearMonth::new(2025, 3).unwrap();
        let april = YearMonth::new(2025, 4).unwrap();

        let week = |date: NaiveDate, team: &str, period: YearMonth| TeamWeekAssignment {
            id: String::new(),
            team: team.to_string(),
            start_date: date,
            end_date: date + Duration::days(6),
            year: period.year(),
            month: period.month(),
        };

        repo.replace_rotation(
            march,
            vec![week(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(), "Alpha", march)],
        )
        .await
        .unwrap();
        repo.replace_rotation(
            april,
            vec![week(NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(), "Bravo", april)],
        )
        .await
        .unwrap();

        // Replacing March must leave April untouched.
        let stored = repo
            .replace_rotation(
                march,
                vec![week(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), "Charlie", march)],
            )
            .await
            .unwrap();
        assert_eq!(stored, 1);

        let march_weeks = repo.list_rotation(march).await.unwrap();
        assert_eq!(march_weeks.len(), 1);
        assert_eq!(march_weeks[0].team, "Charlie");
        assert!(!march_weeks[0].id.is_empty());

        let april_weeks = repo.list_rotation(april).await.unwrap();
        assert_eq!(april_weeks.len(), 1);
        assert_eq!(april_weeks[0].team, "Bravo");
    }

    #[tokio::test]
    async fn test_permission_upsert_replaces_by_user_id() {
        let repo = LocalRepository::new();
        let mut perm = UserPermission {
            user_id: "u1".to_string(),
            display_name: "Ana".to_string(),
            can_view_schedules: true,
            ..Default::default()
        };
        let stored = repo.upsert_permission(perm.clone()).await.unwrap();

        perm.can_generate_schedules = true;
        let updated = repo.upsert_permission(perm).await.unwrap();
        assert_eq!(updated.id, stored.id);

        let listed = repo.list_permissions().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].can_generate_schedules);
    }

    #[tokio::test]
    async fn test_notifier_settings_default_and_round_trip() {
        let repo = LocalRepository::new();
        assert_eq!(
            repo.get_notifier_settings().await.unwrap(),
            NotifierSettings::default()
        );

        let settings = NotifierSettings {
            mail_endpoint: Some("https://mail.example/send".to_string()),
            ..Default::default()
        };
        repo.set_notifier_settings(settings.clone()).await.unwrap();
        assert_eq!(repo.get_notifier_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let repo = LocalRepository::new();
        repo.insert_volunteer(volunteer("Ana")).await.unwrap();
        repo.clear().unwrap();
        assert!(repo.list_volunteers().await.unwrap().is_empty());
    }
}
