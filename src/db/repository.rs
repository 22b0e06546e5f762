//! Repository traits for abstracting storage operations.
//!
//! The traits split by concern: directory documents, the monthly team
//! rotation, saved schedules, and settings. `FullRepository` bundles them
//! for callers that need the whole store behind one handle. Implementations
//! can use different backends (PostgreSQL, in-memory storage, etc.) and are
//! swapped via dependency injection.

use async_trait::async_trait;

use crate::models::{
    AreaOfService, Event, NotifierSettings, SavedSchedule, ScheduleInfo, Team, TeamWeekAssignment,
    UserPermission, Volunteer, YearMonth,
};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::InternalError(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::InternalError(s.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                RepositoryError::NotFound("Record not found".to_string())
            }
            diesel::result::Error::DeserializationError(e) => {
                RepositoryError::ValidationError(e.to_string())
            }
            other => RepositoryError::QueryError(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

/// Repository trait for the directory collections: volunteers, events,
/// teams, and areas of service.
///
/// Insert operations assign an id when the document carries none and return
/// the stored form. List order is stable insertion order; for teams it
/// doubles as the rotation roster order.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust and allow
/// sharing across threads.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Volunteers ====================

    async fn list_volunteers(&self) -> RepositoryResult<Vec<Volunteer>>;

    async fn insert_volunteer(&self, volunteer: Volunteer) -> RepositoryResult<Volunteer>;

    /// Replace a volunteer document by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no volunteer has the id
    async fn update_volunteer(&self, volunteer: Volunteer) -> RepositoryResult<Volunteer>;

    async fn delete_volunteer(&self, id: &str) -> RepositoryResult<()>;

    // ==================== Events ====================

    async fn list_events(&self) -> RepositoryResult<Vec<Event>>;

    async fn insert_event(&self, event: Event) -> RepositoryResult<Event>;

    async fn update_event(&self, event: Event) -> RepositoryResult<Event>;

    async fn delete_event(&self, id: &str) -> RepositoryResult<()>;

    // ==================== Teams ====================

    async fn list_teams(&self) -> RepositoryResult<Vec<Team>>;

    async fn insert_team(&self, team: Team) -> RepositoryResult<Team>;

    async fn update_team(&self, team: Team) -> RepositoryResult<Team>;

    async fn delete_team(&self, id: &str) -> RepositoryResult<()>;

    // ==================== Areas of Service ====================

    async fn list_areas(&self) -> RepositoryResult<Vec<AreaOfService>>;

    async fn insert_area(&self, area: AreaOfService) -> RepositoryResult<AreaOfService>;

    async fn update_area(&self, area: AreaOfService) -> RepositoryResult<AreaOfService>;

    async fn delete_area(&self, id: &str) -> RepositoryResult<()>;
}

/// Repository trait for the per-month team rotation.
#[async_trait]
pub trait RotationRepository: Send + Sync {
    /// Rotation weeks stored for the period, in week order.
    async fn list_rotation(&self, period: YearMonth) -> RepositoryResult<Vec<TeamWeekAssignment>>;

    /// Atomically replace the period's rotation with `weeks`.
    ///
    /// The previous rotation is deleted and the new weeks inserted as one
    /// operation; readers never observe a partially replaced month.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of weeks stored
    async fn replace_rotation(
        &self,
        period: YearMonth,
        weeks: Vec<TeamWeekAssignment>,
    ) -> RepositoryResult<usize>;
}

/// Repository trait for saved monthly schedules.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>>;

    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the schedule doesn't exist
    async fn get_schedule(&self, id: &str) -> RepositoryResult<SavedSchedule>;

    /// The schedule stored for a period, if any. At most one exists.
    async fn find_schedule(&self, period: YearMonth) -> RepositoryResult<Option<SavedSchedule>>;

    async fn insert_schedule(&self, schedule: SavedSchedule) -> RepositoryResult<SavedSchedule>;

    async fn update_schedule(&self, schedule: SavedSchedule) -> RepositoryResult<SavedSchedule>;

    async fn delete_schedule(&self, id: &str) -> RepositoryResult<()>;
}

/// Repository trait for user permissions and notifier settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn list_permissions(&self) -> RepositoryResult<Vec<UserPermission>>;

    /// Insert or replace the permission document keyed by `user_id`.
    async fn upsert_permission(
        &self,
        permission: UserPermission,
    ) -> RepositoryResult<UserPermission>;

    async fn delete_permission(&self, user_id: &str) -> RepositoryResult<()>;

    /// The notifier settings document; defaults when none was stored yet.
    async fn get_notifier_settings(&self) -> RepositoryResult<NotifierSettings>;

    async fn set_notifier_settings(&self, settings: NotifierSettings) -> RepositoryResult<()>;
}

/// Combined repository interface covering every collection.
pub trait FullRepository:
    DirectoryRepository + RotationRepository + ScheduleStore + SettingsRepository
{
}

impl<T> FullRepository for T where
    T: DirectoryRepository + RotationRepository + ScheduleStore + SettingsRepository
{
}
