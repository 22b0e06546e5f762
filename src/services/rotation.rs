//! Team rotation regeneration.

use chrono::Weekday;
use log::info;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::YearMonth;
use crate::scheduler::generate_rotation;

/// Result of a rotation regeneration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The month's rotation was replaced with this many weeks.
    Replaced(usize),
    /// No teams exist; nothing was written and the old rotation stands.
    NoTeamsConfigured,
}

/// Regenerate the rotation for a period, replacing whatever was stored.
///
/// With an empty team roster the request is a no-op signalled by
/// [`RotationOutcome::NoTeamsConfigured`]; partial operation stays valid and
/// no write is attempted.
pub async fn regenerate_rotation(
    repo: &dyn FullRepository,
    period: YearMonth,
    start_team: &str,
    week_start: Weekday,
) -> RepositoryResult<RotationOutcome> {
    let teams = repo.list_teams().await?;
    if teams.is_empty() {
        info!(
            "rotation for {}-{:02} skipped: no teams configured",
            period.year(),
            period.month()
        );
        return Ok(RotationOutcome::NoTeamsConfigured);
    }

    let weeks = generate_rotation(period, start_team, &teams, week_start);
    let stored = repo.replace_rotation(period, weeks).await?;
    info!(
        "rotation for {}-{:02} replaced with {stored} weeks starting from team '{start_team}'",
        period.year(),
        period.month()
    );
    Ok(RotationOutcome::Replaced(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{DirectoryRepository, RotationRepository};
    use crate::db::LocalRepository;
    use crate::models::Team;

    #[tokio::test]
    async fn test_no_teams_is_signalled_without_writing() {
        let repo = LocalRepository::new();
        let period = YearMonth::new(2025, 3).unwrap();

        let outcome = regenerate_rotation(&repo, period, "Alpha", Weekday::Sun)
            .await
            .unwrap();
        assert_eq!(outcome, RotationOutcome::NoTeamsConfigured);
        assert!(repo.list_rotation(period).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_replaces_previous_rotation() {
        let repo = LocalRepository::new();
        let period = YearMonth::new(2025, 3).unwrap();
        for name in ["Alpha", "Bravo"] {
            repo.insert_team(Team {
                id: String::new(),
                name: name.to_string(),
            })
            .await
            .unwrap();
        }

        let first = regenerate_rotation(&repo, period, "Alpha", Weekday::Sun)
            .await
            .unwrap();
        assert_eq!(first, RotationOutcome::Replaced(6));

        let second = regenerate_rotation(&repo, period, "Bravo", Weekday::Sun)
            .await
            .unwrap();
        assert_eq!(second, RotationOutcome::Replaced(6));

        let weeks = repo.list_rotation(period).await.unwrap();
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0].team, "Bravo");
    }
}
