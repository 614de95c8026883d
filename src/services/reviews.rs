use crate::{
    error::{AppError, AppResult},
    models::{ReviewSummary, Sentiment},
    store::Table,
};

use super::columns::{DEVELOPER, SENTIMENT};

/// Positive and negative review counts for one developer
///
/// Neutral reviews are counted in `total` only.
pub fn review_summary(reviews: &Table, developer: &str) -> AppResult<ReviewSummary> {
    if !reviews.contains(DEVELOPER, |v| v.matches_key(developer))? {
        return Err(AppError::not_found("developer"));
    }

    let rows = reviews.filter(|row| Ok(row.get(DEVELOPER)?.matches_key(developer)))?;

    let mut summary = ReviewSummary {
        developer: developer.to_string(),
        negative: 0,
        positive: 0,
        total: rows.len(),
    };
    for row in rows.rows() {
        match row.integer(SENTIMENT)?.and_then(Sentiment::from_code) {
            Some(Sentiment::Positive) => summary.positive += 1,
            Some(Sentiment::Negative) => summary.negative += 1,
            _ => {}
        }
    }

    tracing::debug!(
        developer = %developer,
        positive = summary.positive,
        negative = summary.negative,
        "Review summary computed"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    fn reviews() -> Table {
        Table::from_rows(
            &["developer", "sentiment_analysis"],
            vec![
                vec!["Valve".into(), Value::Int(2)],
                vec!["Valve".into(), Value::Int(2)],
                vec!["Valve".into(), Value::Int(1)],
                vec!["Valve".into(), Value::Int(0)],
                vec!["Valve".into(), Value::Null],
                vec!["Ubisoft".into(), Value::Int(0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_review_summary() {
        let summary = review_summary(&reviews(), "Valve").unwrap();
        assert_eq!(
            summary,
            ReviewSummary {
                developer: "Valve".to_string(),
                negative: 1,
                positive: 2,
                total: 5,
            }
        );
        assert!(summary.positive + summary.negative <= summary.total);
    }

    #[test]
    fn test_only_negative_reviews() {
        let summary = review_summary(&reviews(), "Ubisoft").unwrap();
        assert_eq!(summary.positive, 0);
        assert_eq!(summary.negative, 1);
    }

    #[test]
    fn test_unknown_developer() {
        let result = review_summary(&reviews(), "Nintendo");
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "developer not found"));
    }
}
