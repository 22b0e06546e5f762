//! Postgres repository implementation using Diesel.
//!
//! Documents of every collection live in a single `documents` table keyed by
//! (collection, doc_id), with the payload stored as JSONB. A `seq` column
//! preserves insertion order (the team roster order depends on it), and
//! period-scoped documents (rotation weeks, schedules) carry their
//! year/month in dedicated columns for indexed period lookups.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::db::repository::{
    DirectoryRepository, RepositoryError, RepositoryResult, RotationRepository, ScheduleStore,
    SettingsRepository,
};
use crate::models::{
    AreaOfService, Event, NotifierSettings, SavedSchedule, ScheduleInfo, Team, TeamWeekAssignment,
    UserPermission, Volunteer, YearMonth,
};

mod models;
mod schema;

use models::{DocumentRow, NewDocumentRow};
use schema::documents::dsl as docs;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

const VOLUNTEERS: &str = "volunteers";
const EVENTS: &str = "events";
const TEAMS: &str = "teams";
const AREAS: &str = "areas_of_service";
const ROTATION: &str = "team_schedules";
const SCHEDULES: &str = "schedules";
const PERMISSIONS: &str = "user_permissions";
const SETTINGS: &str = "settings";

/// Fixed document id of the singleton notifier settings document.
const NOTIFIER_DOC: &str = "notifier";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        {
            let mut conn = pool.get()?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| RepositoryError::InternalError(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Run a blocking Diesel operation on a pooled connection.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| RepositoryError::InternalError(format!("Task join error: {e}")))?
    }
}

fn load_collection<T: DeserializeOwned>(
    conn: &mut PgConnection,
    name: &str,
) -> RepositoryResult<Vec<T>> {
    let rows: Vec<DocumentRow> = docs::documents
        .filter(docs::collection.eq(name))
        .order(docs::seq.asc())
        .select(DocumentRow::as_select())
        .load(conn)?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row.data).map_err(Into::into))
        .collect()
}

fn insert_document<T: Serialize>(
    conn: &mut PgConnection,
    name: &str,
    id: &str,
    period: Option<YearMonth>,
    value: &T,
) -> RepositoryResult<()> {
    let row = NewDocumentRow {
        collection: name.to_string(),
        doc_id: id.to_string(),
        doc_year: period.map(|p| p.year()),
        doc_month: period.map(|p| p.month() as i32),
        data: serde_json::to_value(value)?,
    };
    diesel::insert_into(docs::documents)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

fn upsert_document<T: Serialize>(
    conn: &mut PgConnection,
    name: &str,
    id: &str,
    period: Option<YearMonth>,
    value: &T,
) -> RepositoryResult<()> {
    let row = NewDocumentRow {
        collection: name.to_string(),
        doc_id: id.to_string(),
        doc_year: period.map(|p| p.year()),
        doc_month: period.map(|p| p.month() as i32),
        data: serde_json::to_value(value)?,
    };
    diesel::insert_into(docs::documents)
        .values(&row)
        .on_conflict((docs::collection, docs::doc_id))
        .do_update()
        .set((
            docs::data.eq(excluded(docs::data)),
            docs::doc_year.eq(excluded(docs::doc_year)),
            docs::doc_month.eq(excluded(docs::doc_month)),
            docs::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;
    Ok(())
}

fn update_document<T: Serialize>(
    conn: &mut PgConnection,
    name: &str,
    id: &str,
    value: &T,
) -> RepositoryResult<()> {
    let data = serde_json::to_value(value)?;
    let updated = diesel::update(
        docs::documents
            .filter(docs::collection.eq(name))
            .filter(docs::doc_id.eq(id)),
    )
    .set((docs::data.eq(data), docs::updated_at.eq(diesel::dsl::now)))
    .execute(conn)?;
    if updated == 0 {
        return Err(RepositoryError::NotFound(format!(
            "{name} document {id} not found"
        )));
    }
    Ok(())
}

fn delete_document(conn: &mut PgConnection, name: &str, id: &str) -> RepositoryResult<()> {
    let deleted = diesel::delete(
        docs::documents
            .filter(docs::collection.eq(name))
            .filter(docs::doc_id.eq(id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(RepositoryError::NotFound(format!(
            "{name} document {id} not found"
        )));
    }
    Ok(())
}

fn ensure_id(id: &mut String) {
    if id.is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

#[async_trait]
impl DirectoryRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn list_volunteers(&self) -> RepositoryResult<Vec<Volunteer>> {
        self.with_conn(|conn| load_collection(conn, VOLUNTEERS)).await
    }

    async fn insert_volunteer(&self, mut volunteer: Volunteer) -> RepositoryResult<Volunteer> {
        ensure_id(&mut volunteer.id);
        let stored = volunteer.clone();
        self.with_conn(move |conn| {
            insert_document(conn, VOLUNTEERS, &volunteer.id, None, &volunteer)
        })
        .await?;
        Ok(stored)
    }

    async fn update_volunteer(&self, volunteer: Volunteer) -> RepositoryResult<Volunteer> {
        let stored = volunteer.clone();
        self.with_conn(move |conn| update_document(conn, VOLUNTEERS, &volunteer.id, &volunteer))
            .await?;
        Ok(stored)
    }

    async fn delete_volunteer(&self, id: &str) -> RepositoryResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| delete_document(conn, VOLUNTEERS, &id))
            .await
    }

    async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        self.with_conn(|conn| load_collection(conn, EVENTS)).await
    }

    async fn insert_event(&self, mut event: Event) -> RepositoryResult<Event> {
        ensure_id(&mut event.id);
        let stored = event.clone();
        self.with_conn(move |conn| insert_document(conn, EVENTS, &event.id, None, &event))
            .await?;
        Ok(stored)
    }

    async fn update_event(&self, event: Event) -> RepositoryResult<Event> {
        let stored = event.clone();
        self.with_conn(move |conn| update_document(conn, EVENTS, &event.id, &event))
            .await?;
        Ok(stored)
    }

    async fn delete_event(&self, id: &str) -> RepositoryResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| delete_document(conn, EVENTS, &id))
            .await
    }

    async fn list_teams(&self) -> RepositoryResult<Vec<Team>> {
        self.with_conn(|conn| load_collection(conn, TEAMS)).await
    }

    async fn insert_team(&self, mut team: Team) -> RepositoryResult<Team> {
        ensure_id(&mut team.id);
        let stored = team.clone();
        self.with_conn(move |conn| insert_document(conn, TEAMS, &team.id, None, &team))
            .await?;
        Ok(stored)
    }

    async fn update_team(&self, team: Team) -> RepositoryResult<Team> {
        let stored = team.clone();
        self.with_conn(move |conn| update_document(conn, TEAMS, &team.id, &team))
            .await?;
        Ok(stored)
    }

    async fn delete_team(&self, id: &str) -> RepositoryResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| delete_document(conn, TEAMS, &id))
            .await
    }

    async fn list_areas(&self) -> RepositoryResult<Vec<AreaOfService>> {
        self.with_conn(|conn| load_collection(conn, AREAS)).await
    }

    async fn insert_area(&self, mut area: AreaOfService) -> RepositoryResult<AreaOfService> {
        ensure_id(&mut area.id);
        let stored = area.clone();
        self.with_conn(move |conn| insert_document(conn, AREAS, &area.id, None, &area))
            .await?;
        Ok(stored)
    }

    async fn update_area(&self, area: AreaOfService) -> RepositoryResult<AreaOfService> {
        let stored = area.clone();
        self.with_conn(move |conn| update_document(conn, AREAS, &area.id, &area))
            .await?;
        Ok(stored)
    }

    async fn delete_area(&self, id: &str) -> RepositoryResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| delete_document(conn, AREAS, &id))
            .await
    }
}

#[async_trait]
impl RotationRepository for PostgresRepository {
    async fn list_rotation(&self, period: YearMonth) -> RepositoryResult<Vec<TeamWeekAssignment>> {
        self.with_conn(move |conn| {
            let rows: Vec<DocumentRow> = docs::documents
                .filter(docs::collection.eq(ROTATION))
                .filter(docs::doc_year.eq(Some(period.year())))
                .filter(docs::doc_month.eq(Some(period.month() as i32)))
                .select(DocumentRow::as_select())
                .load(conn)?;
            let mut weeks: Vec<TeamWeekAssignment> = rows
                .into_iter()
                .map(|row| serde_json::from_value(row.data).map_err(RepositoryError::from))
                .collect::<RepositoryResult<_>>()?;
            weeks.sort_by(|a, b| a.start_date.cmp(&b.start_date));
            Ok(weeks)
        })
        .await
    }

    async fn replace_rotation(
        &self,
        period: YearMonth,
        mut weeks: Vec<TeamWeekAssignment>,
    ) -> RepositoryResult<usize> {
        for week in &mut weeks {
            ensure_id(&mut week.id);
        }
        self.with_conn(move |conn| {
            // Delete and insert in one transaction so readers never see a
            // partially replaced month.
            conn.transaction::<usize, RepositoryError, _>(|conn| {
                diesel::delete(
                    docs::documents
                        .filter(docs::collection.eq(ROTATION))
                        .filter(docs::doc_year.eq(Some(period.year())))
                        .filter(docs::doc_month.eq(Some(period.month() as i32))),
                )
                .execute(conn)?;
                for week in &weeks {
                    insert_document(conn, ROTATION, &week.id, Some(period), week)?;
                }
                Ok(weeks.len())
            })
        })
        .await
    }
}

#[async_trait]
impl ScheduleStore for PostgresRepository {
    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>> {
        self.with_conn(|conn| {
            let schedules: Vec<SavedSchedule> = load_collection(conn, SCHEDULES)?;
            Ok(schedules.iter().map(|s| s.info()).collect())
        })
        .await
    }

    async fn get_schedule(&self, id: &str) -> RepositoryResult<SavedSchedule> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row: Option<DocumentRow> = docs::documents
                .filter(docs::collection.eq(SCHEDULES))
                .filter(docs::doc_id.eq(&id))
                .select(DocumentRow::as_select())
                .first(conn)
                .optional()?;
            match row {
                Some(row) => serde_json::from_value(row.data).map_err(Into::into),
                None => Err(RepositoryError::NotFound(format!(
                    "Schedule {id} not found"
                ))),
            }
        })
        .await
    }

    async fn find_schedule(&self, period: YearMonth) -> RepositoryResult<Option<SavedSchedule>> {
        self.with_conn(move |conn| {
            let row: Option<DocumentRow> = docs::documents
                .filter(docs::collection.eq(SCHEDULES))
                .filter(docs::doc_year.eq(Some(period.year())))
                .filter(docs::doc_month.eq(Some(period.month() as i32)))
                .select(DocumentRow::as_select())
                .first(conn)
                .optional()?;
            row.map(|row| serde_json::from_value(row.data).map_err(Into::into))
                .transpose()
        })
        .await
    }

    async fn insert_schedule(&self, mut schedule: SavedSchedule) -> RepositoryResult<SavedSchedule> {
        ensure_id(&mut schedule.id);
        let stored = schedule.clone();
        self.with_conn(move |conn| {
            let period = YearMonth::new(schedule.year, schedule.month).ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "Invalid schedule period {}-{}",
                    schedule.year, schedule.month
                ))
            })?;
            insert_document(conn, SCHEDULES, &schedule.id, Some(period), &schedule)
        })
        .await?;
        Ok(stored)
    }

    async fn update_schedule(&self, schedule: SavedSchedule) -> RepositoryResult<SavedSchedule> {
        let stored = schedule.clone();
        self.with_conn(move |conn| update_document(conn, SCHEDULES, &schedule.id, &schedule))
            .await?;
        Ok(stored)
    }

    async fn delete_schedule(&self, id: &str) -> RepositoryResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| delete_document(conn, SCHEDULES, &id))
            .await
    }
}

#[async_trait]
impl SettingsRepository for PostgresRepository {
    async fn list_permissions(&self) -> RepositoryResult<Vec<UserPermission>> {
        self.with_conn(|conn| load_collection(conn, PERMISSIONS)).await
    }

    async fn upsert_permission(
        &self,
        mut permission: UserPermission,
    ) -> RepositoryResult<UserPermission> {
        ensure_id(&mut permission.id);
        let stored = permission.clone();
        // Keyed by user_id so a re-grant replaces the previous document.
        self.with_conn(move |conn| {
            upsert_document(conn, PERMISSIONS, &permission.user_id, None, &permission)
        })
        .await?;
        Ok(stored)
    }

    async fn delete_permission(&self, user_id: &str) -> RepositoryResult<()> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| delete_document(conn, PERMISSIONS, &user_id))
            .await
    }

    async fn get_notifier_settings(&self) -> RepositoryResult<NotifierSettings> {
        self.with_conn(|conn| {
            let row: Option<DocumentRow> = docs::documents
                .filter(docs::collection.eq(SETTINGS))
                .filter(docs::doc_id.eq(NOTIFIER_DOC))
                .select(DocumentRow::as_select())
                .first(conn)
                .optional()?;
            match row {
                Some(row) => serde_json::from_value(row.data).map_err(Into::into),
                None => Ok(NotifierSettings::default()),
            }
        })
        .await
    }

    async fn set_notifier_settings(&self, settings: NotifierSettings) -> RepositoryResult<()> {
        self.with_conn(move |conn| upsert_document(conn, SETTINGS, NOTIFIER_DOC, None, &settings))
            .await
    }
}
