use crate::{
    error::{AppError, AppResult},
    models::UserSummary,
    store::Table,
};

use super::columns::{ITEM_ID, PRICE, RECOMMEND, USER_ID};

/// Spend, recommendation rate and item count for one user
///
/// Every row counts: a user who reviewed the same item twice contributes two
/// rows to both the spend and the recommendation denominator.
pub fn user_summary(activity: &Table, user_id: &str) -> AppResult<UserSummary> {
    let rows = activity.filter(|row| Ok(row.get(USER_ID)?.matches_key(user_id)))?;
    if rows.is_empty() {
        return Err(AppError::not_found("user"));
    }

    let mut total_spend = 0.0;
    let mut recommended = 0usize;
    for row in rows.rows() {
        total_spend += row.number(PRICE)?.unwrap_or(0.0);
        if row.flag(RECOMMEND)? {
            recommended += 1;
        }
    }

    let summary = UserSummary {
        user_id: user_id.to_string(),
        total_spend,
        recommend_percentage: recommended as f64 / rows.len() as f64 * 100.0,
        distinct_item_count: rows.n_unique(ITEM_ID)?,
        record_count: rows.len(),
    };

    tracing::debug!(
        user_id = %user_id,
        records = summary.record_count,
        items = summary.distinct_item_count,
        "User summary computed"
    );

    Ok(summary)
}
