use crate::{
    error::{AppError, AppResult},
    models::DeveloperYearStats,
    store::{AggOp, JoinKind, Table},
};

use super::columns::{DEVELOPER, ITEM_ID, PRICE, RELEASE_YEAR};
use super::round2;

/// Yearly release counts and free-content share for one developer
///
/// The developer name must match exactly. Years are returned in ascending
/// order; a year without free items reports 0%.
pub fn developer_activity(games: &Table, developer: &str) -> AppResult<Vec<DeveloperYearStats>> {
    if !games.contains(DEVELOPER, |v| v.matches_key(developer))? {
        return Err(AppError::not_found("developer"));
    }

    let catalog = games.filter(|row| Ok(row.get(DEVELOPER)?.matches_key(developer)))?;

    let items = catalog.group_aggregate(&[RELEASE_YEAR], ITEM_ID, AggOp::Count)?;
    let free = catalog
        .filter(|row| Ok(row.number(PRICE)? == Some(0.0)))?
        .group_aggregate(&[RELEASE_YEAR], PRICE, AggOp::Count)?;

    // Years missing from `free` are zero-filled by the left join
    let per_year = items.merge(&free, RELEASE_YEAR, JoinKind::Left)?;

    let mut stats = Vec::with_capacity(per_year.len());
    for row in per_year.rows() {
        let item_count = row.integer(ITEM_ID)?.unwrap_or(0).max(0) as u64;
        let free_count = row.integer(PRICE)?.unwrap_or(0).max(0) as u64;
        let free_percentage = if item_count == 0 {
            0.0
        } else {
            round2(free_count as f64 / item_count as f64 * 100.0)
        };

        stats.push(DeveloperYearStats {
            release_year: row.integer(RELEASE_YEAR)?.unwrap_or_default(),
            item_count,
            free_percentage,
        });
    }

    tracing::debug!(
        developer = %developer,
        years = stats.len(),
        "Developer activity computed"
    );

    Ok(stats)
}
