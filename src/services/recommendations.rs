use crate::{
    error::{AppError, AppResult},
    models::GameRecommendations,
    store::Table,
};

use super::columns::{ITEM_ID, RECOMMENDATIONS};

/// Looks up the precomputed similar games for `item_id`
///
/// The similarity model runs offline; this only reads its output row.
pub fn similar_games(model: &Table, item_id: &str) -> AppResult<GameRecommendations> {
    let matches = model.filter(|row| Ok(row.get(ITEM_ID)?.matches_key(item_id)))?;
    let row = matches.row(0).ok_or_else(|| AppError::not_found("item"))?;

    let recommendations = row.list(RECOMMENDATIONS)?.to_vec();

    tracing::debug!(
        item_id = %item_id,
        count = recommendations.len(),
        "Recommendations found"
    );

    Ok(GameRecommendations {
        item_id: item_id.to_string(),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, Value};

    fn ids(ids: &[i64]) -> Value {
        Value::List(ids.iter().map(|i| Value::Int(*i)).collect())
    }

    fn model() -> Table {
        Table::from_rows(
            &["item_id", "recommendations"],
            vec![
                vec![Value::Int(10), ids(&[20, 30, 40, 50, 60])],
                vec![Value::Int(20), ids(&[10, 30, 70, 80, 90])],
                vec![Value::Int(99), "not a list".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_similar_games_in_stored_order() {
        let result = similar_games(&model(), "20").unwrap();
        assert_eq!(result.item_id, "20");
        assert_eq!(result.recommendations.len(), 5);
        assert_eq!(
            result.recommendations,
            vec![
                Value::Int(10),
                Value::Int(30),
                Value::Int(70),
                Value::Int(80),
                Value::Int(90),
            ]
        );
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let result = similar_games(&model(), "11");
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "item not found"));
    }

    #[test]
    fn test_malformed_recommendations_column() {
        let result = similar_games(&model(), "99");
        assert!(matches!(
            result,
            Err(AppError::Store(StoreError::TypeMismatch { .. }))
        ));
    }
}
