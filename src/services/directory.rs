//! Directory maintenance with cross-document cleanup.

use log::info;

use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Delete an area of service and strip it from every volunteer's
/// qualifications.
///
/// Without the cascade, deleted areas would linger in volunteer documents
/// and keep matching future slots of a re-created area with the same name.
pub async fn remove_area(repo: &dyn FullRepository, area_id: &str) -> RepositoryResult<()> {
    let areas = repo.list_areas().await?;
    let area = areas
        .iter()
        .find(|a| a.id == area_id)
        .ok_or_else(|| RepositoryError::NotFound(format!("Area {area_id} not found")))?;
    let name = area.name.clone();

    repo.delete_area(area_id).await?;

    let mut touched = 0usize;
    for mut volunteer in repo.list_volunteers().await? {
        let before = volunteer.areas.len();
        volunteer.areas.retain(|a| a != &name);
        if volunteer.areas.len() != before {
            repo.update_volunteer(volunteer).await?;
            touched += 1;
        }
    }
    info!("area '{name}' removed; {touched} volunteers updated");
    Ok(())
}
