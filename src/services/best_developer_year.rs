use crate::{
    error::{AppError, AppResult},
    models::{Sentiment, TopDevelopers},
    store::{AggOp, Table},
};

use super::columns::{DEVELOPER, RECOMMEND, RELEASE_YEAR, SENTIMENT};

/// The three developers with the most positive, recommending reviews in `year`
///
/// Developers with equal counts are ranked by name.
pub fn best_developers(reviews: &Table, year: i64) -> AppResult<TopDevelopers> {
    if !reviews.contains(RELEASE_YEAR, |v| v.as_i64() == Some(year))? {
        return Err(AppError::NotFound("invalid year".to_string()));
    }

    let positive = reviews.filter(|row| {
        Ok(row.integer(RELEASE_YEAR)? == Some(year)
            && row.flag(RECOMMEND)?
            && row.integer(SENTIMENT)? == Some(Sentiment::Positive.code()))
    })?;

    let ranked = positive
        .group_aggregate(&[DEVELOPER], RECOMMEND, AggOp::Count)?
        .sort_by(RECOMMEND, true)?;

    let names: Vec<String> = ranked
        .column(DEVELOPER)?
        .values()
        .iter()
        .take(3)
        .map(ToString::to_string)
        .collect();

    let podium: [String; 3] = names.try_into().map_err(|_| AppError::InsufficientData {
        year,
        found: ranked.len(),
    })?;

    tracing::debug!(
        year,
        qualifying = ranked.len(),
        "Developer ranking computed"
    );

    Ok(TopDevelopers { year, podium })
}
